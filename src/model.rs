//! Core data models for the grid-world visualizer.
//! Snapshots arrive as JSON from the backend and are decoded once here into
//! structured types; position keys like `"(3, 4)"` never leak past this module.

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::SnapshotError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(u32, u32)", into = "(u32, u32)")]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

impl Position {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Parses a backend position key. Accepts `"(x, y)"` and `"(x,y)"`.
    pub fn from_key(key: &str) -> Option<Self> {
        let caps = key_pattern().captures(key)?;
        let x = caps.get(1)?.as_str().parse().ok()?;
        let y = caps.get(2)?.as_str().parse().ok()?;
        Some(Self { x, y })
    }

    /// The backend's textual key, always with a single comma-space separator.
    pub fn key(&self) -> String {
        format!("({}, {})", self.x, self.y)
    }

    /// Row-major index into a grid of the given width.
    pub fn index(&self, width: u32) -> usize {
        (self.y as usize) * (width as usize) + self.x as usize
    }
}

fn key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d+),\s*(\d+)").expect("position key pattern"))
}

impl From<(u32, u32)> for Position {
    fn from((x, y): (u32, u32)) -> Self {
        Self { x, y }
    }
}

impl From<Position> for (u32, u32) {
    fn from(p: Position) -> Self {
        (p.x, p.y)
    }
}

// Row-major order so sparse maps iterate the way the grid is drawn.
impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Sparse per-cell data keyed by position. Serialized with `"(x, y)"` keys.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionMap<T>(BTreeMap<Position, T>);

impl<T> Default for PositionMap<T> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<T> PositionMap<T> {
    pub fn get(&self, pos: &Position) -> Option<&T> {
        self.0.get(pos)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Position, &T)> {
        self.0.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.values()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> FromIterator<(Position, T)> for PositionMap<T> {
    fn from_iter<I: IntoIterator<Item = (Position, T)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T: Serialize> Serialize for PositionMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (pos, v) in &self.0 {
            map.serialize_entry(&pos.key(), v)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for PositionMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PositionMapVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for PositionMapVisitor<T> {
            type Value = PositionMap<T>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map keyed by \"(x, y)\" position strings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut out = BTreeMap::new();
                while let Some((key, value)) = access.next_entry::<String, T>()? {
                    let pos = Position::from_key(&key).ok_or_else(|| {
                        de::Error::custom(format!("invalid position key {key:?}"))
                    })?;
                    out.insert(pos, value);
                }
                Ok(PositionMap(out))
            }
        }

        deserializer.deserialize_map(PositionMapVisitor(PhantomData))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Empty,
    Obstacle,
    Goal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgentType {
    #[serde(rename = "reflex")]
    Reflex,
    #[serde(rename = "model")]
    Model,
    #[serde(rename = "utility")]
    Utility,
    #[serde(rename = "qlearning")]
    QLearning,
}

impl AgentType {
    /// Selector and comparison-chart order.
    pub const ALL: [AgentType; 4] = [
        AgentType::Reflex,
        AgentType::Model,
        AgentType::Utility,
        AgentType::QLearning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Reflex => "reflex",
            AgentType::Model => "model",
            AgentType::Utility => "utility",
            AgentType::QLearning => "qlearning",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AgentType::Reflex => "Simple Reflex",
            AgentType::Model => "Model-Based",
            AgentType::Utility => "Utility-Based",
            AgentType::QLearning => "Q-Learning",
        }
    }
}

impl FromStr for AgentType {
    type Err = SnapshotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| SnapshotError::UnknownAgentType(s.to_string()))
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Up,
    Right,
    Down,
    Left,
}

impl Action {
    /// Enumeration order for best-action selection; earlier wins ties.
    pub const ORDER: [Action; 4] = [Action::Up, Action::Right, Action::Down, Action::Left];

    pub fn label(&self) -> &'static str {
        match self {
            Action::Up => "up",
            Action::Right => "right",
            Action::Down => "down",
            Action::Left => "left",
        }
    }
}

/// Tabular action values for one cell; absent actions are `None`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionValues {
    pub up: Option<f64>,
    pub down: Option<f64>,
    pub left: Option<f64>,
    pub right: Option<f64>,
}

impl ActionValues {
    pub fn get(&self, action: Action) -> Option<f64> {
        match action {
            Action::Up => self.up,
            Action::Right => self.right,
            Action::Down => self.down,
            Action::Left => self.left,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub name: String,
    pub position: Position,
    #[serde(default)]
    pub performance: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModelInfo {
    pub model_size: u32,
    pub goal_position: Option<Position>,
    pub plan: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UtilityInfo {
    pub model_size: u32,
    pub exploration_rate: f64,
    pub utilities: Option<PositionMap<f64>>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct QLearningInfo {
    pub learning_rate: f64,
    pub discount_factor: f64,
    pub exploration_rate: f64,
    pub total_reward: f64,
    pub q_values: Option<PositionMap<ActionValues>>,
    /// Dense `[y][x]` grid of state values, same shape as the cell grid.
    pub q_value_grid: Option<Vec<Vec<f64>>>,
}

/// Agent-specific payload, keyed by the snapshot's `agent_type`.
#[derive(Clone, Debug, PartialEq)]
pub enum AgentInfo {
    Reflex,
    Model(ModelInfo),
    Utility(UtilityInfo),
    QLearning(QLearningInfo),
}

impl AgentInfo {
    pub fn agent_type(&self) -> AgentType {
        match self {
            AgentInfo::Reflex => AgentType::Reflex,
            AgentInfo::Model(_) => AgentType::Model,
            AgentInfo::Utility(_) => AgentType::Utility,
            AgentInfo::QLearning(_) => AgentType::QLearning,
        }
    }

    fn decode(agent_type: AgentType, raw: serde_json::Value) -> Result<Self, SnapshotError> {
        Ok(match agent_type {
            AgentType::Reflex => AgentInfo::Reflex,
            AgentType::Model => AgentInfo::Model(serde_json::from_value(raw)?),
            AgentType::Utility => AgentInfo::Utility(serde_json::from_value(raw)?),
            AgentType::QLearning => AgentInfo::QLearning(serde_json::from_value(raw)?),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationData {
    pub steps: Vec<u64>,
    pub performance: Vec<f64>,
    pub visit_counts: PositionMap<u32>,
}

/// One complete simulation state as returned by `/init` or `/step`.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationSnapshot {
    pub width: u32,
    pub height: u32,
    /// `height` rows of `width` cells.
    pub grid: Vec<Vec<CellKind>>,
    pub agents: Vec<AgentRecord>,
    pub agent_info: AgentInfo,
    pub simulation_data: SimulationData,
    pub step_count: u64,
    pub time_step: u64,
    pub goal_reached: bool,
}

#[derive(Deserialize)]
struct SnapshotWire {
    width: u32,
    height: u32,
    grid: Vec<Vec<CellKind>>,
    agents: Vec<AgentRecord>,
    #[serde(default)]
    agent_type: Option<String>,
    #[serde(default)]
    agent_info: Option<serde_json::Value>,
    #[serde(default)]
    simulation_data: Option<SimulationData>,
    #[serde(default)]
    step_count: u64,
    #[serde(default)]
    time_step: u64,
    #[serde(default)]
    goal_reached: bool,
}

impl SimulationSnapshot {
    /// Decodes and validates a snapshot body. `fallback` supplies the agent
    /// type when the backend omits `agent_type`.
    pub fn from_json(body: &str, fallback: Option<AgentType>) -> Result<Self, SnapshotError> {
        let wire: SnapshotWire = serde_json::from_str(body)?;
        let agent_type: AgentType = match wire.agent_type.as_deref() {
            Some(tag) => tag.parse()?,
            None => fallback.ok_or(SnapshotError::MissingAgentType)?,
        };
        let raw_info = match wire.agent_info {
            Some(v) if !v.is_null() => v,
            _ => serde_json::Value::Object(Default::default()),
        };
        let snapshot = Self {
            width: wire.width,
            height: wire.height,
            grid: wire.grid,
            agents: wire.agents,
            agent_info: AgentInfo::decode(agent_type, raw_info)?,
            simulation_data: wire.simulation_data.unwrap_or_default(),
            step_count: wire.step_count,
            time_step: wire.time_step,
            goal_reached: wire.goal_reached,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.width == 0 || self.height == 0 {
            return Err(SnapshotError::EmptyGrid);
        }
        if self.grid.len() != self.height as usize {
            return Err(SnapshotError::RowCount {
                expected: self.height,
                found: self.grid.len(),
            });
        }
        for (row, cells) in self.grid.iter().enumerate() {
            if cells.len() != self.width as usize {
                return Err(SnapshotError::RowWidth {
                    row,
                    expected: self.width,
                    found: cells.len(),
                });
            }
        }
        for agent in &self.agents {
            match self.cell(agent.position) {
                None => {
                    return Err(SnapshotError::AgentOutOfBounds {
                        name: agent.name.clone(),
                        position: agent.position,
                    });
                }
                Some(CellKind::Obstacle) => {
                    return Err(SnapshotError::AgentOnObstacle {
                        name: agent.name.clone(),
                        position: agent.position,
                    });
                }
                Some(_) => {}
            }
        }
        if let AgentInfo::QLearning(QLearningInfo { q_value_grid: Some(rows), .. }) = &self.agent_info {
            let shape_ok = rows.len() == self.height as usize
                && rows.iter().all(|r| r.len() == self.width as usize);
            if !shape_ok {
                return Err(SnapshotError::ValueGridShape {
                    width: self.width,
                    height: self.height,
                });
            }
        }
        Ok(())
    }

    pub fn agent_type(&self) -> AgentType {
        self.agent_info.agent_type()
    }

    pub fn cell(&self, pos: Position) -> Option<CellKind> {
        self.grid.get(pos.y as usize)?.get(pos.x as usize).copied()
    }

    /// True when the base cell at `pos` exists and is `Empty`.
    pub fn is_open(&self, pos: Position) -> bool {
        self.cell(pos) == Some(CellKind::Empty)
    }

    /// The agent the UI reports on; the backend only ever runs one.
    pub fn primary_agent(&self) -> Option<&AgentRecord> {
        self.agents.first()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ComparisonEntry {
    pub steps_to_goal: f64,
    pub success_rate: f64,
}

/// Result of `/compare`, keyed by agent type.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComparisonResult(BTreeMap<AgentType, ComparisonEntry>);

impl ComparisonResult {
    /// Decodes a `/compare` body; entries for unrecognised agent tags are dropped.
    pub fn from_json(body: &str) -> Result<Self, SnapshotError> {
        let raw: BTreeMap<String, ComparisonEntry> = serde_json::from_str(body)?;
        Ok(raw
            .into_iter()
            .filter_map(|(tag, entry)| tag.parse().ok().map(|t| (t, entry)))
            .collect())
    }

    pub fn get(&self, agent: AgentType) -> Option<&ComparisonEntry> {
        self.0.get(&agent)
    }
}

impl FromIterator<(AgentType, ComparisonEntry)> for ComparisonResult {
    fn from_iter<I: IntoIterator<Item = (AgentType, ComparisonEntry)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Serialize)]
pub struct InitRequest<'a> {
    pub agent_type: &'a str,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A 4x3 grid with obstacles along the bottom row and a goal at (3, 1).
    pub fn grid_4x3() -> Vec<Vec<CellKind>> {
        use CellKind::*;
        vec![
            vec![Empty, Empty, Empty, Empty],
            vec![Empty, Empty, Empty, Goal],
            vec![Obstacle, Obstacle, Obstacle, Obstacle],
        ]
    }

    pub fn snapshot(agent_info: AgentInfo) -> SimulationSnapshot {
        SimulationSnapshot {
            width: 4,
            height: 3,
            grid: grid_4x3(),
            agents: vec![AgentRecord {
                name: "Explorer".into(),
                position: Position::new(0, 0),
                performance: 0.0,
            }],
            agent_info,
            simulation_data: SimulationData::default(),
            step_count: 0,
            time_step: 0,
            goal_reached: false,
        }
    }

    pub fn snapshot_json(agent_type: &str, step_count: u64, goal_reached: bool) -> String {
        serde_json::json!({
            "width": 4,
            "height": 3,
            "grid": [
                ["empty", "empty", "empty", "empty"],
                ["empty", "empty", "empty", "goal"],
                ["obstacle", "obstacle", "obstacle", "obstacle"]
            ],
            "agents": [{"name": "Explorer", "position": [1, 1], "performance": -(step_count as f64)}],
            "agent_type": agent_type,
            "agent_info": {},
            "simulation_data": {
                "steps": (0..=step_count).collect::<Vec<_>>(),
                "performance": (0..=step_count).map(|s| -(s as f64)).collect::<Vec<_>>(),
                "visit_counts": {"(1, 1)": 1}
            },
            "step_count": step_count,
            "time_step": step_count,
            "goal_reached": goal_reached
        })
        .to_string()
    }
}
