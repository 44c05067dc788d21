//! Overlay engine: turns a snapshot and the active mode into positioned
//! annotations drawn over the grid.
//!
//! Everything here is a pure function of `(snapshot, mode)`; the caller
//! recomputes whenever either changes.

use crate::error::OverlayNotice;
use crate::model::{Action, ActionValues, AgentInfo, Position, PositionMap, SimulationSnapshot};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverlayMode {
    #[default]
    None,
    Heatmap,
    Values,
    Policy,
}

impl OverlayMode {
    pub const ALL: [OverlayMode; 4] = [
        OverlayMode::None,
        OverlayMode::Heatmap,
        OverlayMode::Values,
        OverlayMode::Policy,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            OverlayMode::None => "None",
            OverlayMode::Heatmap => "Visit Heatmap",
            OverlayMode::Values => "Values",
            OverlayMode::Policy => "Policy",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueTier {
    High,
    Medium,
    Low,
    Neutral,
}

impl ValueTier {
    pub fn of(value: f64) -> Self {
        if value > 5.0 {
            ValueTier::High
        } else if value > 0.0 {
            ValueTier::Medium
        } else if value < 0.0 {
            ValueTier::Low
        } else {
            ValueTier::Neutral
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Mark {
    /// Visit count with `intensity` in `(0, 1]` relative to the busiest cell.
    Heat { count: u32, intensity: f64 },
    /// Value rounded to one decimal.
    Value { value: f64, tier: ValueTier },
    /// Best action and its value; only emitted for positive values.
    Arrow { action: Action, value: f64 },
}

impl Mark {
    pub fn label(&self) -> String {
        match self {
            Mark::Heat { count, .. } => count.to_string(),
            Mark::Value { value, .. } => format!("{value:.1}"),
            Mark::Arrow { action, .. } => action.label().to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    pub position: Position,
    pub mark: Mark,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverlayFrame {
    pub annotations: Vec<Annotation>,
    /// Set when the mode has nothing to show for this snapshot.
    pub notice: Option<OverlayNotice>,
}

impl OverlayFrame {
    fn missing(notice: OverlayNotice) -> Self {
        Self {
            annotations: Vec::new(),
            notice: Some(notice),
        }
    }
}

pub fn compute(snapshot: &SimulationSnapshot, mode: OverlayMode) -> OverlayFrame {
    match mode {
        OverlayMode::None => OverlayFrame::default(),
        OverlayMode::Heatmap => heatmap(snapshot),
        OverlayMode::Values => values(snapshot),
        OverlayMode::Policy => policy(snapshot),
    }
}

fn heatmap(s: &SimulationSnapshot) -> OverlayFrame {
    let visits = &s.simulation_data.visit_counts;
    if visits.is_empty() {
        return OverlayFrame::missing(OverlayNotice::NoVisitData);
    }
    let max_count = visits.values().copied().max().unwrap_or(0);
    if max_count == 0 {
        return OverlayFrame::default();
    }
    let annotations = visits
        .iter()
        .filter(|&(pos, &count)| count > 0 && s.is_open(*pos))
        .map(|(pos, &count)| Annotation {
            position: *pos,
            mark: Mark::Heat {
                count,
                intensity: f64::from(count) / f64::from(max_count),
            },
        })
        .collect();
    OverlayFrame {
        annotations,
        notice: None,
    }
}

fn values(s: &SimulationSnapshot) -> OverlayFrame {
    let cells: Vec<(Position, f64)> = match &s.agent_info {
        AgentInfo::Utility(info) => match &info.utilities {
            Some(utilities) => utilities.iter().map(|(p, v)| (*p, *v)).collect(),
            None => return OverlayFrame::missing(OverlayNotice::NoValueData(s.agent_type())),
        },
        AgentInfo::QLearning(info) => match &info.q_value_grid {
            Some(rows) => dense_cells(rows),
            None => return OverlayFrame::missing(OverlayNotice::NoValueData(s.agent_type())),
        },
        AgentInfo::Reflex | AgentInfo::Model(_) => {
            return OverlayFrame::missing(OverlayNotice::NoValueData(s.agent_type()));
        }
    };
    let annotations = cells
        .into_iter()
        .filter(|(pos, _)| s.is_open(*pos))
        .map(|(position, raw)| Annotation {
            position,
            mark: Mark::Value {
                value: (raw * 10.0).round() / 10.0,
                tier: ValueTier::of(raw),
            },
        })
        .collect();
    OverlayFrame {
        annotations,
        notice: None,
    }
}

fn dense_cells(rows: &[Vec<f64>]) -> Vec<(Position, f64)> {
    rows.iter()
        .enumerate()
        .flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, v)| (Position::new(x as u32, y as u32), *v))
        })
        .collect()
}

fn policy(s: &SimulationSnapshot) -> OverlayFrame {
    let q_values: &PositionMap<ActionValues> = match &s.agent_info {
        AgentInfo::QLearning(info) => match &info.q_values {
            Some(q) => q,
            None => return OverlayFrame::missing(OverlayNotice::NoPolicyData(s.agent_type())),
        },
        AgentInfo::Utility(_) => {
            return OverlayFrame::missing(OverlayNotice::PolicyNotImplemented(s.agent_type()));
        }
        AgentInfo::Reflex | AgentInfo::Model(_) => {
            return OverlayFrame::missing(OverlayNotice::NoPolicyData(s.agent_type()));
        }
    };
    let annotations = q_values
        .iter()
        .filter(|(pos, _)| s.is_open(**pos))
        .filter_map(|(pos, q)| {
            let (action, value) = best_action(q)?;
            (value > 0.0).then_some(Annotation {
                position: *pos,
                mark: Mark::Arrow { action, value },
            })
        })
        .collect();
    OverlayFrame {
        annotations,
        notice: None,
    }
}

/// Strictly greatest action value; ties keep the earlier action in `Action::ORDER`.
pub fn best_action(q: &ActionValues) -> Option<(Action, f64)> {
    let mut best: Option<(Action, f64)> = None;
    for action in Action::ORDER {
        let Some(v) = q.get(action) else { continue };
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((action, v)),
        }
    }
    best
}
