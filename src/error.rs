//! Error types for backend calls and snapshot decoding.

use thiserror::Error;

use crate::model::{AgentType, Position};

/// A snapshot body that could not be turned into a valid `SimulationSnapshot`.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("malformed response body: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unknown agent type {0:?}")]
    UnknownAgentType(String),

    #[error("response did not name an agent type")]
    MissingAgentType,

    #[error("grid has zero width or height")]
    EmptyGrid,

    #[error("grid has {found} rows, expected {expected}")]
    RowCount { expected: u32, found: usize },

    #[error("grid row {row} has {found} cells, expected {expected}")]
    RowWidth { row: usize, expected: u32, found: usize },

    #[error("agent {name} at {position} is outside the grid")]
    AgentOutOfBounds { name: String, position: Position },

    #[error("agent {name} at {position} is on an obstacle")]
    AgentOnObstacle { name: String, position: Position },

    #[error("value grid does not match the {width}x{height} cell grid")]
    ValueGridShape { width: u32, height: u32 },
}

/// Why a single request/response exchange with the backend failed.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("server responded with status {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {0} ms")]
    Timeout(u32),

    #[error(transparent)]
    Invalid(#[from] SnapshotError),

    #[error("browser window is not available")]
    NoWindow,
}

/// A failed backend call, tagged with the operation that issued it.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to initialize simulation: {0}")]
    Init(#[source] TransportError),

    #[error("Failed to step simulation: {0}")]
    Step(#[source] TransportError),

    #[error("Failed to compare agents: {0}")]
    Compare(#[source] TransportError),
}

/// An overlay mode was selected without data to show. Reported, never fatal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum OverlayNotice {
    #[error("No visit data available for the heatmap")]
    NoVisitData,

    #[error("No value data available for {} agents", .0.display_name())]
    NoValueData(AgentType),

    #[error("Policy overlay is not implemented for {} agents", .0.display_name())]
    PolicyNotImplemented(AgentType),

    #[error("No policy data available for {} agents", .0.display_name())]
    NoPolicyData(AgentType),
}
