//! Snapshot wire types
//!
//! Field names mirror the simulation server's JSON payloads exactly
//! (camelCase). Heading and signal-state strings arrive in whatever case
//! the server model uses, so both parse case-insensitively.

use serde::{Deserialize, Deserializer, Serialize};

/// Discrete orientation hint used by roads, vehicles, and signals
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl<'de> Deserialize<'de> for Heading {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.to_ascii_lowercase().as_str() {
            "up" => Heading::Up,
            "down" => Heading::Down,
            "left" => Heading::Left,
            _ => Heading::Right,
        })
    }
}

/// Traffic signal state. Unknown strings map to Red so an extended server
/// state set fails safe instead of failing the whole snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalState {
    Red,
    Green,
}

impl<'de> Deserialize<'de> for SignalState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.to_ascii_lowercase().as_str() {
            "green" => SignalState::Green,
            _ => SignalState::Red,
        })
    }
}

/// Body of the model-initialization request
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitRequest {
    pub map_file: String,
    pub map_dict: String,
}

/// Response to the initialization request; width/height are the grid
/// extent used to center the camera target
#[derive(Clone, Debug, Deserialize)]
pub struct InitResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub width: u32,
    pub height: u32,
}

/// One polled vehicle record
#[derive(Clone, Debug, Deserialize)]
pub struct AgentRecord {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    #[serde(default)]
    pub orientation: Option<Heading>,
}

/// One polled traffic-signal record
#[derive(Clone, Debug, Deserialize)]
pub struct LightRecord {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    #[serde(default)]
    pub orientation: Option<Heading>,
    pub state: SignalState,
}

/// A point-in-time snapshot of all dynamic entities
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSnapshot {
    #[serde(default)]
    pub agent_positions: Vec<AgentRecord>,
    #[serde(default)]
    pub light_positions: Vec<LightRecord>,
}

/// One static environment record
#[derive(Clone, Debug, Deserialize)]
pub struct EnvRecord {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    #[serde(default)]
    pub direction: Option<Heading>,
}

/// Static environment, partitioned by kind
#[derive(Clone, Debug, Default, Deserialize)]
pub struct EnvironmentPositions {
    #[serde(default)]
    pub road: Vec<EnvRecord>,
    #[serde(default)]
    pub building: Vec<EnvRecord>,
    #[serde(default)]
    pub destination: Vec<EnvRecord>,
}

/// Response to the environment fetch, consumed once at startup
#[derive(Clone, Debug, Default, Deserialize)]
pub struct EnvironmentSnapshot {
    #[serde(default)]
    pub positions: EnvironmentPositions,
}

/// Response to the step/advance call
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub current_step: Option<u64>,
}

/// Aggregate simulation statistics
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentStats {
    #[serde(default)]
    pub active_cars: u32,
    #[serde(default)]
    pub cars_finished: u32,
    #[serde(default)]
    pub traffic_density: f32,
    #[serde(default)]
    pub current_step: u64,
}

/// Response to the stats fetch
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(default)]
    pub current_stats: CurrentStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_snapshot_parses_server_payload() {
        let json = r#"{
            "agentPositions": [{"id": "v7", "x": 4, "y": 1, "z": 9}],
            "lightPositions": [
                {"id": "l1", "x": 2, "y": 1, "z": 3, "orientation": "Left", "state": "red"},
                {"id": "l2", "x": 5, "y": 1, "z": 3, "orientation": "up", "state": "GREEN"}
            ]
        }"#;
        let snap: AgentSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.agent_positions.len(), 1);
        assert_eq!(snap.agent_positions[0].id, "v7");
        assert_eq!(snap.agent_positions[0].orientation, None);
        assert_eq!(snap.light_positions[0].state, SignalState::Red);
        assert_eq!(snap.light_positions[0].orientation, Some(Heading::Left));
        assert_eq!(snap.light_positions[1].state, SignalState::Green);
        assert_eq!(snap.light_positions[1].orientation, Some(Heading::Up));
    }

    #[test]
    fn unknown_signal_state_fails_safe_to_red() {
        let json = r#"{"id": "l9", "x": 0, "y": 0, "z": 0, "state": "yellow"}"#;
        let light: LightRecord = serde_json::from_str(json).unwrap();
        assert_eq!(light.state, SignalState::Red);
    }

    #[test]
    fn environment_parses_partitioned_positions() {
        let json = r#"{
            "positions": {
                "road": [{"id": "r1", "x": 0, "y": 1, "z": 0, "direction": "Down"}],
                "building": [{"id": "b1", "x": 3, "y": 1, "z": 4}],
                "destination": [{"id": "d1", "x": 7, "y": 1, "z": 2}]
            }
        }"#;
        let env: EnvironmentSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(env.positions.road[0].direction, Some(Heading::Down));
        assert_eq!(env.positions.building.len(), 1);
        assert_eq!(env.positions.destination[0].id, "d1");
    }

    #[test]
    fn init_request_serializes_camel_case() {
        let body = InitRequest {
            map_file: "maps/base.txt".to_string(),
            map_dict: "maps/dict.json".to_string(),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"mapFile\""));
        assert!(json.contains("\"mapDict\""));
    }

    #[test]
    fn stats_parse_with_defaults() {
        let stats: StatsResponse = serde_json::from_str(
            r#"{"currentStats": {"activeCars": 12, "carsFinished": 3,
                "trafficDensity": 0.4, "currentStep": 88}}"#,
        )
        .unwrap();
        assert_eq!(stats.current_stats.active_cars, 12);
        assert_eq!(stats.current_stats.current_step, 88);

        let empty: StatsResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.current_stats.active_cars, 0);
    }
}
