//! Display surface seam. The controller pushes derived frames through
//! `Renderer`; the browser build draws them on canvases.

pub mod canvas;

pub use canvas::CanvasRenderer;

use crate::state::grid::GridLayout;
use crate::state::metrics::{ComparisonBar, SeriesPoint};
use crate::state::overlay::Annotation;

pub trait Renderer {
    /// Clears and redraws the grid; `None` leaves an empty surface.
    fn render_grid(&mut self, grid: Option<&GridLayout>);
    /// Draws annotations over the last grid. An empty slice clears the overlay.
    fn render_overlay(&mut self, annotations: &[Annotation]);
    fn render_series(&mut self, points: &[SeriesPoint]);
    fn render_comparison(&mut self, bars: &[ComparisonBar]);
}
