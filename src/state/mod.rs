pub mod grid;
pub mod log;
pub mod metrics;
pub mod overlay;
pub mod session;
pub mod ticker;

pub use grid::CellVisual;
pub use log::LogEntry;
pub use overlay::OverlayMode;
pub use session::{Controls, Phase, RunController, StepOrigin, Ticket};
pub use ticker::IntervalTicker;
