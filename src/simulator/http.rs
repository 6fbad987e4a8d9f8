// src/simulator/http.rs

use crate::config::SimulatorConfig;
use crate::model::{CollisionReading, GoalCorner, MotionCommand};
use crate::simulator::{CallOutcome, SimError, Simulator};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};

const GOAL_PATH: &str = "/goal";
const RESET_PATH: &str = "/reset";
const MOVE_PATH: &str = "/move_rel";
const COLLISIONS_PATH: &str = "/collisions";
const OBSTACLE_MOTION_PATH: &str = "/obstacles/motion";

/// Simulator client speaking JSON over HTTP.
pub struct HttpSimulator {
    client: Client,
    base_url: String,
    move_timeout: Duration,
}

#[derive(Deserialize)]
struct CollisionResponse {
    #[serde(default)]
    count: Option<i64>,
}

impl HttpSimulator {
    pub fn new(config: &SimulatorConfig) -> Result<Self, SimError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|err| SimError::Transport {
                path: "<client>",
                reason: err.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            move_timeout: config.move_timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn send(&self, path: &'static str, request: RequestBuilder) -> Result<Response, SimError> {
        let response = request.send().map_err(|err| transport_error(path, &err))?;
        let status = response.status();
        if !status.is_success() {
            return Err(SimError::Status {
                path,
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    fn post_soft(&self, path: &'static str, request: RequestBuilder) -> CallOutcome {
        let outcome = CallOutcome::from(self.send(path, request).map(|_| ()));
        if let Some(err) = outcome.error() {
            warn!(%err, "simulator call failed, continuing");
        }
        outcome
    }

    fn read_collisions(&self) -> Result<u32, SimError> {
        let path = COLLISIONS_PATH;
        let response = self.send(path, self.client.get(self.url(path)))?;
        let body: CollisionResponse = response.json().map_err(|err| SimError::Decode {
            path,
            reason: err.to_string(),
        })?;
        let count = body.count.ok_or_else(|| SimError::Decode {
            path,
            reason: "missing field `count`".into(),
        })?;
        u32::try_from(count).map_err(|_| SimError::Decode {
            path,
            reason: format!("count out of range: {count}"),
        })
    }
}

fn transport_error(path: &'static str, err: &reqwest::Error) -> SimError {
    if err.is_timeout() {
        SimError::Timeout { path }
    } else {
        SimError::Transport {
            path,
            reason: err.to_string(),
        }
    }
}

impl Simulator for HttpSimulator {
    fn place_goal(&mut self, corner: GoalCorner) -> CallOutcome {
        info!(%corner, "placing goal");
        let payload = json!({ "corner": corner.label() });
        self.post_soft(GOAL_PATH, self.client.post(self.url(GOAL_PATH)).json(&payload))
    }

    fn reset(&mut self) -> CallOutcome {
        info!("resetting simulation and collision count");
        self.post_soft(RESET_PATH, self.client.post(self.url(RESET_PATH)))
    }

    fn move_relative(&mut self, command: MotionCommand) -> CallOutcome {
        let request = self
            .client
            .post(self.url(MOVE_PATH))
            .timeout(self.move_timeout)
            .json(&command);
        // Dropped moves are superseded by the next poll cycle.
        let outcome = CallOutcome::from(self.send(MOVE_PATH, request).map(|_| ()));
        if let Some(err) = outcome.error() {
            debug!(
                %err,
                turn = command.turn,
                distance = command.distance,
                "move possibly not delivered"
            );
        }
        outcome
    }

    fn collision_count(&mut self) -> CollisionReading {
        match self.read_collisions() {
            Ok(count) => CollisionReading::Count(count),
            Err(err) => {
                warn!(%err, "could not read collision count");
                CollisionReading::Unknown
            }
        }
    }

    fn set_obstacle_motion(&mut self, enabled: bool, speed: f64) -> CallOutcome {
        info!(enabled, speed, "setting obstacle motion");
        let payload = json!({ "enabled": enabled, "speed": speed });
        self.post_soft(
            OBSTACLE_MOTION_PATH,
            self.client.post(self.url(OBSTACLE_MOTION_PATH)).json(&payload),
        )
    }
}
