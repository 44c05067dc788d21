// Chart feeds: performance series per step and the agent comparison bars
use crate::model::{AgentType, ComparisonResult, SimulationData};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeriesPoint {
    pub step: u64,
    pub performance: f64,
}

/// Full performance series from the backend. Extra elements on either side are dropped.
pub fn performance_series(data: &SimulationData) -> Vec<SeriesPoint> {
    data.steps
        .iter()
        .zip(&data.performance)
        .map(|(&step, &performance)| SeriesPoint { step, performance })
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonBar {
    pub agent: AgentType,
    pub steps_to_goal: f64,
    /// Success rate on a 0-100 scale.
    pub success_pct: f64,
}

/// Bars in selector order; agents missing from the result are left out.
pub fn comparison_bars(result: &ComparisonResult) -> Vec<ComparisonBar> {
    AgentType::ALL
        .into_iter()
        .filter_map(|agent| {
            result.get(agent).map(|entry| ComparisonBar {
                agent,
                steps_to_goal: entry.steps_to_goal,
                success_pct: entry.success_rate * 100.0,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_zips_index_aligned_arrays() {
        let data = SimulationData {
            steps: vec![0, 1, 2, 3],
            performance: vec![0.0, -1.0, -2.0],
            ..Default::default()
        };
        let points = performance_series(&data);
        assert_eq!(points.len(), 3);
        assert_eq!(points[2], SeriesPoint { step: 2, performance: -2.0 });
    }

    #[test]
    fn bars_follow_fixed_order_and_percent_scale() {
        let body = r#"{
            "qlearning": {"steps_to_goal": 18, "success_rate": 0.95},
            "utility": {"steps_to_goal": 25, "success_rate": 0.8},
            "reflex": {"steps_to_goal": 60, "success_rate": 0.25},
            "model": {"steps_to_goal": 30, "success_rate": 0.7}
        }"#;
        let bars = comparison_bars(&ComparisonResult::from_json(body).unwrap());
        let order: Vec<AgentType> = bars.iter().map(|b| b.agent).collect();
        assert_eq!(order, AgentType::ALL.to_vec());
        assert_eq!(bars[0].success_pct, 25.0);
        assert_eq!(bars[2].success_pct, 80.0);
        assert_eq!(bars[3].steps_to_goal, 18.0);
    }
}
