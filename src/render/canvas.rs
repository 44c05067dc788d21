use std::f64::consts::PI;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::Renderer;
use crate::config::CELL_PX;
use crate::model::{Action, CellKind, Position};
use crate::state::grid::{CellVisual, GridLayout};
use crate::state::metrics::{ComparisonBar, SeriesPoint};
use crate::state::overlay::{Annotation, Mark, ValueTier};

const BACKGROUND: &str = "#0e1116";
const EMPTY: &str = "#161b22";
const VISITED: &str = "#082235";
const OBSTACLE: &str = "#2a2f38";
const GOAL: &str = "#2ea043";
const AGENT: &str = "#58a6ff";
const AGENT_RING: &str = "#1f6feb";
const GRID_LINE: &str = "#2f3641";
const TEXT: &str = "#c9d1d9";
const MUTED: &str = "#8b949e";

pub fn cell_color(cell: CellVisual) -> &'static str {
    match cell {
        CellVisual::Empty => EMPTY,
        CellVisual::Visited => VISITED,
        CellVisual::Obstacle => OBSTACLE,
        CellVisual::Goal | CellVisual::Agent { base: CellKind::Goal } => GOAL,
        CellVisual::Agent { .. } => EMPTY,
    }
}

pub fn tier_color(tier: ValueTier) -> &'static str {
    match tier {
        ValueTier::High => "#3fb950",
        ValueTier::Medium => "#d29922",
        ValueTier::Low => "#f85149",
        ValueTier::Neutral => MUTED,
    }
}

/// Draws onto whichever of the three canvases are mounted.
pub struct CanvasRenderer {
    grid: Option<HtmlCanvasElement>,
    series: Option<HtmlCanvasElement>,
    bars: Option<HtmlCanvasElement>,
    /// Agent cells of the last grid; markers are redrawn above the overlay.
    agents: Vec<Position>,
}

impl CanvasRenderer {
    pub fn new(
        grid: Option<HtmlCanvasElement>,
        series: Option<HtmlCanvasElement>,
        bars: Option<HtmlCanvasElement>,
    ) -> Self {
        Self {
            grid,
            series,
            bars,
            agents: Vec::new(),
        }
    }
}

fn context(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    if !canvas.is_connected() {
        return None;
    }
    canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()
}

fn clear(ctx: &CanvasRenderingContext2d, canvas: &HtmlCanvasElement) {
    ctx.set_fill_style_str(BACKGROUND);
    ctx.fill_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
}

fn origin(pos: Position) -> (f64, f64) {
    (pos.x as f64 * CELL_PX, pos.y as f64 * CELL_PX)
}

fn draw_agent(ctx: &CanvasRenderingContext2d, pos: Position) {
    let (rx, ry) = origin(pos);
    ctx.begin_path();
    ctx.set_fill_style_str(AGENT);
    ctx.arc(rx + CELL_PX / 2.0, ry + CELL_PX / 2.0, CELL_PX * 0.3, 0.0, PI * 2.0)
        .ok();
    ctx.fill();
    ctx.set_stroke_style_str(AGENT_RING);
    ctx.set_line_width(2.0);
    ctx.stroke();
}

impl Renderer for CanvasRenderer {
    fn render_grid(&mut self, grid: Option<&GridLayout>) {
        self.agents = grid
            .map(|layout| {
                layout
                    .iter()
                    .filter(|(_, cell)| matches!(cell, CellVisual::Agent { .. }))
                    .map(|(pos, _)| pos)
                    .collect()
            })
            .unwrap_or_default();
        let Some(canvas) = &self.grid else { return };
        let Some(layout) = grid else {
            if let Some(ctx) = context(canvas) {
                clear(&ctx, canvas);
            }
            return;
        };
        canvas.set_width((layout.width as f64 * CELL_PX) as u32);
        canvas.set_height((layout.height as f64 * CELL_PX) as u32);
        let Some(ctx) = context(canvas) else { return };
        clear(&ctx, canvas);
        for (pos, cell) in layout.iter() {
            let (rx, ry) = origin(pos);
            ctx.set_fill_style_str(cell_color(cell));
            ctx.fill_rect(rx, ry, CELL_PX, CELL_PX);
        }
        ctx.set_stroke_style_str(GRID_LINE);
        ctx.set_line_width(1.0);
        let w = layout.width as f64 * CELL_PX;
        let h = layout.height as f64 * CELL_PX;
        for x in 0..=layout.width {
            ctx.begin_path();
            ctx.move_to(x as f64 * CELL_PX, 0.0);
            ctx.line_to(x as f64 * CELL_PX, h);
            ctx.stroke();
        }
        for y in 0..=layout.height {
            ctx.begin_path();
            ctx.move_to(0.0, y as f64 * CELL_PX);
            ctx.line_to(w, y as f64 * CELL_PX);
            ctx.stroke();
        }
    }

    fn render_overlay(&mut self, annotations: &[Annotation]) {
        let Some(canvas) = &self.grid else { return };
        let Some(ctx) = context(canvas) else { return };
        ctx.set_font("12px sans-serif");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        for a in annotations {
            let (rx, ry) = origin(a.position);
            let (cx, cy) = (rx + CELL_PX / 2.0, ry + CELL_PX / 2.0);
            match &a.mark {
                Mark::Heat { intensity, .. } => {
                    ctx.set_fill_style_str(&format!("rgba(248,81,73,{:.3})", 0.15 + 0.6 * intensity));
                    ctx.fill_rect(rx, ry, CELL_PX, CELL_PX);
                    ctx.set_fill_style_str(TEXT);
                    ctx.fill_text(&a.mark.label(), cx, cy).ok();
                }
                Mark::Value { tier, .. } => {
                    ctx.set_fill_style_str(tier_color(*tier));
                    ctx.fill_text(&a.mark.label(), cx, cy).ok();
                }
                Mark::Arrow { action, .. } => {
                    // Triangle in unit-cell coordinates, scaled to the cell.
                    let pts: [(f64, f64); 3] = match action {
                        Action::Right => [(0.25, 0.20), (0.25, 0.80), (0.80, 0.50)],
                        Action::Left => [(0.75, 0.20), (0.75, 0.80), (0.20, 0.50)],
                        Action::Up => [(0.20, 0.75), (0.80, 0.75), (0.50, 0.20)],
                        Action::Down => [(0.20, 0.25), (0.80, 0.25), (0.50, 0.80)],
                    };
                    ctx.set_fill_style_str("rgba(63,185,80,0.85)");
                    ctx.begin_path();
                    ctx.move_to(rx + pts[0].0 * CELL_PX, ry + pts[0].1 * CELL_PX);
                    for (px, py) in &pts[1..] {
                        ctx.line_to(rx + px * CELL_PX, ry + py * CELL_PX);
                    }
                    ctx.close_path();
                    ctx.fill();
                }
            }
        }
        ctx.set_text_align("start");
        ctx.set_text_baseline("alphabetic");
        for &pos in &self.agents {
            draw_agent(&ctx, pos);
        }
    }

    fn render_series(&mut self, points: &[SeriesPoint]) {
        let Some(canvas) = &self.series else { return };
        let Some(ctx) = context(canvas) else { return };
        clear(&ctx, canvas);
        let w = canvas.width() as f64;
        let h = canvas.height() as f64;
        let pad = 28.0;
        ctx.set_stroke_style_str(GRID_LINE);
        ctx.set_line_width(1.0);
        ctx.begin_path();
        ctx.move_to(pad, pad / 2.0);
        ctx.line_to(pad, h - pad);
        ctx.line_to(w - pad / 2.0, h - pad);
        ctx.stroke();
        ctx.set_font("11px sans-serif");
        ctx.set_fill_style_str(MUTED);
        ctx.fill_text("Performance", pad + 4.0, pad / 2.0 + 10.0).ok();
        if points.is_empty() {
            return;
        }
        let max_step = points.iter().map(|p| p.step).max().unwrap_or(0).max(1) as f64;
        let (lo, hi) = points.iter().fold((f64::MAX, f64::MIN), |(lo, hi), p| {
            (lo.min(p.performance), hi.max(p.performance))
        });
        let span = if hi > lo { hi - lo } else { 1.0 };
        let plot_w = w - pad * 1.5;
        let plot_h = h - pad * 1.5;
        let to_xy = |p: &SeriesPoint| {
            (
                pad + p.step as f64 / max_step * plot_w,
                h - pad - (p.performance - lo) / span * plot_h,
            )
        };
        ctx.fill_text(&format!("{hi:.0}"), 2.0, pad / 2.0 + 4.0).ok();
        ctx.fill_text(&format!("{lo:.0}"), 2.0, h - pad).ok();
        ctx.fill_text(&format!("{max_step:.0}"), w - pad, h - pad / 3.0).ok();
        ctx.set_stroke_style_str(AGENT);
        ctx.set_line_width(2.0);
        ctx.begin_path();
        let (x0, y0) = to_xy(&points[0]);
        ctx.move_to(x0, y0);
        for p in &points[1..] {
            let (x, y) = to_xy(p);
            ctx.line_to(x, y);
        }
        ctx.stroke();
    }

    fn render_comparison(&mut self, bars: &[ComparisonBar]) {
        let Some(canvas) = &self.bars else { return };
        let Some(ctx) = context(canvas) else { return };
        clear(&ctx, canvas);
        if bars.is_empty() {
            ctx.set_font("12px sans-serif");
            ctx.set_fill_style_str(MUTED);
            ctx.fill_text("Run a comparison to see results", 10.0, 20.0).ok();
            return;
        }
        let w = canvas.width() as f64;
        let h = canvas.height() as f64;
        let label_h = 20.0;
        let top = 20.0;
        let plot_h = h - label_h - top;
        let group_w = w / bars.len() as f64;
        let bar_w = (group_w * 0.35).min(40.0);
        let max_steps = bars
            .iter()
            .map(|b| b.steps_to_goal)
            .fold(0.0_f64, f64::max)
            .max(1.0);
        ctx.set_font("11px sans-serif");
        ctx.set_text_align("center");
        for (i, bar) in bars.iter().enumerate() {
            let gx = group_w * i as f64 + group_w / 2.0;
            let steps_h = bar.steps_to_goal / max_steps * plot_h;
            let success_h = bar.success_pct.clamp(0.0, 100.0) / 100.0 * plot_h;
            ctx.set_fill_style_str(AGENT);
            ctx.fill_rect(gx - bar_w - 2.0, top + plot_h - steps_h, bar_w, steps_h);
            ctx.set_fill_style_str(GOAL);
            ctx.fill_rect(gx + 2.0, top + plot_h - success_h, bar_w, success_h);
            ctx.set_fill_style_str(TEXT);
            ctx.fill_text(
                &format!("{:.0}", bar.steps_to_goal),
                gx - bar_w / 2.0 - 2.0,
                top + plot_h - steps_h - 4.0,
            )
            .ok();
            ctx.fill_text(
                &format!("{:.0}%", bar.success_pct),
                gx + bar_w / 2.0 + 2.0,
                top + plot_h - success_h - 4.0,
            )
            .ok();
            ctx.set_fill_style_str(MUTED);
            ctx.fill_text(bar.agent.display_name(), gx, h - 6.0).ok();
        }
        ctx.set_text_align("start");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AgentInfo;
    use crate::model::fixtures::snapshot;

    #[test]
    fn agent_keeps_goal_color_underneath() {
        assert_eq!(cell_color(CellVisual::Agent { base: CellKind::Goal }), GOAL);
        assert_eq!(cell_color(CellVisual::Agent { base: CellKind::Empty }), EMPTY);
        assert_ne!(cell_color(CellVisual::Visited), cell_color(CellVisual::Empty));
    }

    #[test]
    fn grid_pass_records_agent_cells_for_overlay() {
        let snap = snapshot(AgentInfo::Reflex);
        let mut r = CanvasRenderer::new(None, None, None);
        r.render_grid(Some(&GridLayout::from_snapshot(&snap)));
        assert_eq!(r.agents, vec![Position::new(0, 0)]);
        r.render_grid(None);
        assert!(r.agents.is_empty());
    }

    #[test]
    fn tiers_have_distinct_colors() {
        let colors = [ValueTier::High, ValueTier::Medium, ValueTier::Low, ValueTier::Neutral]
            .map(tier_color);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
