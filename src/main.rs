use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use cornerbot::campaign::{self, Level, LevelReport};
use cornerbot::config::Settings;
use cornerbot::mission::{Clock, FastrandTurns, ManualClock, MissionController, TurnSource};
use cornerbot::model::{GoalCorner, MissionResult};
use cornerbot::simulator::{DryRunSimulator, HttpSimulator, Simulator};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Drives the arena robot toward goal corners.
#[derive(Parser)]
#[command(name = "cornerbot")]
#[command(about = "Corner-seeking missions against the arena simulator", long_about = None)]
struct Cli {
    /// Use an in-process simulator and a simulated clock
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// All four corners with static obstacles (default)
    Level1,
    /// All four corners with moving obstacles
    Level2,
    /// All four corners at each obstacle speed of the sweep
    Level3,
    /// A single mission
    Mission {
        /// Goal corner: NE, NW, SE or SW
        #[arg(name = "CORNER")]
        corner: GoalCorner,
    },
}

enum Plan {
    Level(Level),
    Mission(GoalCorner),
}

impl Command {
    fn plan(self) -> Plan {
        match self {
            Command::Level1 => Plan::Level(Level::Static),
            Command::Level2 => Plan::Level(Level::moving()),
            Command::Level3 => Plan::Level(Level::sweep()),
            Command::Mission { corner } => Plan::Mission(corner),
        }
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")?;

    let cli = Cli::parse();
    let plan = cli.command.unwrap_or(Command::Level1).plan();
    let settings = Settings::load()?;

    if cli.dry_run {
        info!("dry run: no simulator will be contacted");
        let controller = MissionController::new(
            settings.mission,
            DryRunSimulator::new(),
            ManualClock::new(),
            FastrandTurns::new(),
        )?;
        execute(controller, plan);
    } else {
        info!(url = %settings.simulator.base_url, "connecting to simulator");
        let simulator = HttpSimulator::new(&settings.simulator)?;
        let controller = MissionController::with_system_clock(settings.mission, simulator)?;
        execute(controller, plan);
    }
    Ok(())
}

fn execute<S, C, R>(mut controller: MissionController<S, C, R>, plan: Plan)
where
    S: Simulator,
    C: Clock,
    R: TurnSource,
{
    match plan {
        Plan::Mission(corner) => print_mission(&controller.run(corner)),
        Plan::Level(level) => print_report(&campaign::run_level(&mut controller, &level)),
    }
}

fn print_mission(result: &MissionResult) {
    println!("{}", "--- MISSION COMPLETE ---".bold());
    println!("{}", result.summary());
}

fn print_report(report: &LevelReport) {
    println!("\n{}", format!("--- {} COMPLETE ---", report.level).to_uppercase().bold());
    for batch in &report.batches {
        if batch.obstacles_moving {
            println!("{}", format!("Obstacle speed {:.2}", batch.obstacle_speed).cyan());
        }
        for result in &batch.results {
            let collisions = match result.collisions.count() {
                Some(n) => n.to_string().normal(),
                None => "unknown".yellow(),
            };
            println!("  {}: {} collisions", result.corner, collisions);
        }
        let average = match batch.summary.average {
            Some(avg) => format!("{avg:.2}").green(),
            None => "n/a".red(),
        };
        println!("  Average collisions: {average}");
        if batch.summary.unknown_runs > 0 {
            println!(
                "  {}",
                format!(
                    "{} run(s) without a final count were left out",
                    batch.summary.unknown_runs
                )
                .yellow()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_of(args: &[&str]) -> Result<(Plan, bool), clap::Error> {
        let cli = Cli::try_parse_from(args)?;
        Ok((cli.command.unwrap_or(Command::Level1).plan(), cli.dry_run))
    }

    #[test]
    fn test_default_is_level_one() {
        let (plan, dry_run) = plan_of(&["cornerbot"]).unwrap();
        assert!(matches!(plan, Plan::Level(Level::Static)));
        assert!(!dry_run);
    }

    #[test]
    fn test_levels_map_to_obstacle_settings() {
        let (plan, _) = plan_of(&["cornerbot", "level2"]).unwrap();
        assert!(matches!(plan, Plan::Level(level) if level == Level::moving()));
        let (plan, _) = plan_of(&["cornerbot", "level3"]).unwrap();
        assert!(matches!(plan, Plan::Level(level) if level == Level::sweep()));
    }

    #[test]
    fn test_mission_with_dry_run() {
        let (plan, dry_run) = plan_of(&["cornerbot", "mission", "sw", "--dry-run"]).unwrap();
        assert!(matches!(plan, Plan::Mission(GoalCorner::SW)));
        assert!(dry_run);

        let (_, dry_run) = plan_of(&["cornerbot", "--dry-run", "level1"]).unwrap();
        assert!(dry_run);
    }

    #[test]
    fn test_rejects_bad_corner_before_running() {
        assert!(plan_of(&["cornerbot", "mission", "north"]).is_err());
        assert!(plan_of(&["cornerbot", "level9"]).is_err());
        assert!(plan_of(&["cornerbot", "mission"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
