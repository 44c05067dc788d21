// Cell layout derived from a snapshot. Rebuilt in full on every render.
use crate::model::{CellKind, Position, SimulationSnapshot};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellVisual {
    Empty,
    /// Empty cell the agent has been through at least once.
    Visited,
    Obstacle,
    Goal,
    /// Agent marker drawn over its base cell.
    Agent { base: CellKind },
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridLayout {
    pub width: u32,
    pub height: u32,
    /// Row-major; length = width * height.
    pub cells: Vec<CellVisual>,
}

impl GridLayout {
    pub fn from_snapshot(s: &SimulationSnapshot) -> Self {
        let mut cells = Vec::with_capacity((s.width * s.height) as usize);
        for (y, row) in s.grid.iter().enumerate() {
            for (x, kind) in row.iter().enumerate() {
                let pos = Position::new(x as u32, y as u32);
                let visited = s
                    .simulation_data
                    .visit_counts
                    .get(&pos)
                    .is_some_and(|&count| count > 0);
                cells.push(match kind {
                    CellKind::Obstacle => CellVisual::Obstacle,
                    CellKind::Goal => CellVisual::Goal,
                    CellKind::Empty if visited => CellVisual::Visited,
                    CellKind::Empty => CellVisual::Empty,
                });
            }
        }
        for agent in &s.agents {
            let Some(base) = s.cell(agent.position) else {
                continue;
            };
            let idx = agent.position.index(s.width);
            cells[idx] = CellVisual::Agent { base };
        }
        Self {
            width: s.width,
            height: s.height,
            cells,
        }
    }

    #[cfg(test)]
    pub fn cell(&self, pos: Position) -> Option<CellVisual> {
        if pos.x >= self.width || pos.y >= self.height {
            return None;
        }
        self.cells.get(pos.index(self.width)).copied()
    }

    /// Iterates cells with their grid position in scan order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, CellVisual)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (Position::new(i as u32 % width, i as u32 / width), *c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::snapshot;
    use crate::model::{AgentInfo, PositionMap};

    #[test]
    fn agent_marker_takes_priority_over_base() {
        let mut s = snapshot(AgentInfo::Reflex);
        s.agents[0].position = Position::new(3, 1);
        let layout = GridLayout::from_snapshot(&s);
        assert_eq!(
            layout.cell(Position::new(3, 1)),
            Some(CellVisual::Agent { base: CellKind::Goal })
        );
        assert_eq!(layout.cell(Position::new(0, 2)), Some(CellVisual::Obstacle));
    }

    #[test]
    fn visits_mark_only_empty_cells() {
        let mut s = snapshot(AgentInfo::Reflex);
        s.simulation_data.visit_counts = [
            (Position::new(1, 0), 2),
            (Position::new(2, 0), 0),
            (Position::new(3, 1), 5),
        ]
        .into_iter()
        .collect::<PositionMap<u32>>();
        let layout = GridLayout::from_snapshot(&s);
        assert_eq!(layout.cell(Position::new(1, 0)), Some(CellVisual::Visited));
        assert_eq!(layout.cell(Position::new(2, 0)), Some(CellVisual::Empty));
        assert_eq!(layout.cell(Position::new(3, 1)), Some(CellVisual::Goal));
    }

    #[test]
    fn scan_order_matches_row_major_index() {
        let s = snapshot(AgentInfo::Reflex);
        let layout = GridLayout::from_snapshot(&s);
        assert_eq!(layout.cells.len(), 12);
        for (i, (pos, _)) in layout.iter().enumerate() {
            assert_eq!(pos.index(layout.width), i);
        }
        assert_eq!(layout.cell(Position::new(4, 0)), None);
    }
}
