//! Blocking HTTP client for the simulation server
//!
//! Every request goes through a bounded retry loop with exponential
//! backoff; transient transport failures and 5xx/429 responses are retried,
//! anything else surfaces immediately as a [`CrosswayError::ServerError`].

use crossway_core::{CrosswayError, Result};
use crossway_scene::{
    AgentSnapshot, EnvironmentSnapshot, InitRequest, InitResponse, StatsResponse, StepResponse,
};
use serde::de::DeserializeOwned;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 10;
const MAX_RETRIES: usize = 3;
const RETRY_BASE_DELAY_MS: u64 = 250;

/// Client for one simulation server
#[derive(Clone)]
pub struct SimClient {
    base_url: String,
}

impl SimClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Initialize the simulation model; the response carries the grid
    /// extent used to center the camera.
    pub fn init(&self, request: &InitRequest) -> Result<InitResponse> {
        self.post_json("init", request)
    }

    /// Fetch the static environment (roads, buildings, destinations).
    /// Called once before the render loop starts.
    pub fn environment(&self) -> Result<EnvironmentSnapshot> {
        self.get_json("environment")
    }

    /// Fetch the current dynamic entity snapshot
    pub fn agents(&self) -> Result<AgentSnapshot> {
        self.get_json("getAgents")
    }

    /// Advance simulation time by one step
    pub fn step(&self) -> Result<StepResponse> {
        self.get_json("update")
    }

    /// Fetch aggregate simulation statistics
    pub fn stats(&self) -> Result<StatsResponse> {
        self.get_json("getStats")
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        for attempt in 0..MAX_RETRIES {
            let agent = build_agent();
            match agent.get(&url).call() {
                Ok(mut ok) => {
                    return ok.body_mut().read_json().map_err(|e| {
                        CrosswayError::ServerError(format!("bad response from {}: {}", url, e))
                    });
                }
                Err(e) => {
                    if attempt + 1 < MAX_RETRIES && is_retryable_error(&e) {
                        sleep_backoff(attempt);
                        continue;
                    }
                    return Err(CrosswayError::ServerError(format!(
                        "GET {} failed: {}",
                        url, e
                    )));
                }
            }
        }
        Err(CrosswayError::ServerError(format!(
            "GET {} failed after retries",
            url
        )))
    }

    fn post_json<T: DeserializeOwned>(&self, path: &str, body: &impl serde::Serialize) -> Result<T> {
        let url = self.url(path);
        for attempt in 0..MAX_RETRIES {
            let agent = build_agent();
            match agent.post(&url).send_json(body) {
                Ok(mut ok) => {
                    return ok.body_mut().read_json().map_err(|e| {
                        CrosswayError::ServerError(format!("bad response from {}: {}", url, e))
                    });
                }
                Err(e) => {
                    if attempt + 1 < MAX_RETRIES && is_retryable_error(&e) {
                        sleep_backoff(attempt);
                        continue;
                    }
                    return Err(CrosswayError::ServerError(format!(
                        "POST {} failed: {}",
                        url, e
                    )));
                }
            }
        }
        Err(CrosswayError::ServerError(format!(
            "POST {} failed after retries",
            url
        )))
    }
}

fn build_agent() -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .build();
    config.into()
}

fn is_retryable_error(e: &ureq::Error) -> bool {
    match e {
        ureq::Error::Timeout(_)
        | ureq::Error::Io(_)
        | ureq::Error::ConnectionFailed
        | ureq::Error::HostNotFound => true,
        ureq::Error::StatusCode(code) => matches!(code, 429 | 500 | 502 | 503 | 504),
        _ => false,
    }
}

fn sleep_backoff(attempt: usize) {
    let delay_ms = RETRY_BASE_DELAY_MS.saturating_mul(1u64 << attempt);
    std::thread::sleep(Duration::from_millis(delay_ms));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_trimmed() {
        let client = SimClient::new("http://localhost:8585///");
        assert_eq!(client.base_url(), "http://localhost:8585");
        assert_eq!(client.url("getAgents"), "http://localhost:8585/getAgents");
    }

    #[test]
    fn endpoint_paths_match_the_server_routes() {
        let client = SimClient::new("http://sim");
        assert_eq!(client.url("init"), "http://sim/init");
        assert_eq!(client.url("environment"), "http://sim/environment");
        assert_eq!(client.url("update"), "http://sim/update");
        assert_eq!(client.url("getStats"), "http://sim/getStats");
    }

    #[test]
    fn unreachable_server_surfaces_a_server_error() {
        // Port 9 (discard) refuses connections immediately
        let client = SimClient::new("http://127.0.0.1:9");
        let err = client.agents().unwrap_err();
        assert!(matches!(err, CrosswayError::ServerError(_)));
    }
}
