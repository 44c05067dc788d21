// Client configuration
//
// Named constants for timing, layout and the backend contract, plus the
// runtime ClientConfig read from the page query string.

use crate::model::AgentType;

// ============================================================================
// Constants
// ============================================================================

/// Default interval between auto-run steps
pub const DEFAULT_SPEED_MS: u32 = 500;

/// Fastest allowed auto-run interval
pub const MIN_SPEED_MS: u32 = 100;

/// Slowest allowed auto-run interval
pub const MAX_SPEED_MS: u32 = 2000;

/// Speed slider granularity
pub const SPEED_STEP_MS: u32 = 100;

/// Requests still pending after this long are aborted and reported as failures
pub const DEFAULT_REQUEST_TIMEOUT_MS: u32 = 10_000;

/// Side length of one grid cell on the canvas, in CSS pixels
pub const CELL_PX: f64 = 40.0;

pub const INIT_PATH: &str = "/init";
pub const STEP_PATH: &str = "/step";
pub const COMPARE_PATH: &str = "/compare";

// ============================================================================
// Runtime configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Prefix for endpoint paths; empty means same origin
    pub api_base: String,
    /// Initial auto-run interval
    pub speed_ms: u32,
    pub request_timeout_ms: u32,
    /// Agent type preselected in the selector
    pub agent_type: AgentType,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            speed_ms: DEFAULT_SPEED_MS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            agent_type: AgentType::Reflex,
        }
    }
}

impl ClientConfig {
    /// Applies overrides from a query string such as `?api=http://host:5000&speed=250`.
    /// Values are percent-decoded. Unknown keys and unparseable values are ignored.
    pub fn from_query(query: &str) -> Self {
        let mut config = Self::default();
        for pair in query.trim_start_matches('?').split('&') {
            let Some((key, raw)) = pair.split_once('=') else {
                continue;
            };
            let Ok(value) = urlencoding::decode(raw) else {
                continue;
            };
            match key {
                "api" => config.api_base = value.trim_end_matches('/').to_string(),
                "speed" => {
                    if let Ok(ms) = value.parse::<u32>() {
                        config.speed_ms = clamp_speed(ms);
                    }
                }
                "timeout" => {
                    if let Ok(ms) = value.parse::<u32>() {
                        config.request_timeout_ms = ms.max(1);
                    }
                }
                "agent" => {
                    if let Ok(agent) = value.parse() {
                        config.agent_type = agent;
                    }
                }
                _ => {}
            }
        }
        config
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}

/// Clamps an auto-run interval into the supported range.
pub fn clamp_speed(ms: u32) -> u32 {
    ms.clamp(MIN_SPEED_MS, MAX_SPEED_MS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_overrides_defaults() {
        let cfg = ClientConfig::from_query("?api=http://localhost:5000/&speed=250&agent=qlearning");
        assert_eq!(cfg.api_base, "http://localhost:5000");
        assert_eq!(cfg.speed_ms, 250);
        assert_eq!(cfg.agent_type, AgentType::QLearning);
        assert_eq!(cfg.endpoint(STEP_PATH), "http://localhost:5000/step");
    }

    #[test]
    fn bad_query_values_keep_defaults() {
        let cfg = ClientConfig::from_query("speed=fast&agent=random&timeout=&junk");
        assert_eq!(cfg, ClientConfig::default());
    }

    #[test]
    fn percent_encoded_values_are_decoded() {
        let cfg = ClientConfig::from_query("?api=http%3A%2F%2Fhost%3A5000%2F&agent=model");
        assert_eq!(cfg.api_base, "http://host:5000");
        assert_eq!(cfg.endpoint(INIT_PATH), "http://host:5000/init");
        assert_eq!(cfg.agent_type, AgentType::Model);
    }

    #[test]
    fn invalid_percent_encoding_is_ignored() {
        let cfg = ClientConfig::from_query("api=%FF%FE&speed=300");
        assert_eq!(cfg.api_base, "");
        assert_eq!(cfg.speed_ms, 300);
    }

    #[test]
    fn speed_is_clamped() {
        assert_eq!(ClientConfig::from_query("speed=5").speed_ms, MIN_SPEED_MS);
        assert_eq!(ClientConfig::from_query("speed=99999").speed_ms, MAX_SPEED_MS);
    }
}
