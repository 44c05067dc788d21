use yew::prelude::*;

use crate::model::{AgentInfo, SimulationSnapshot};

#[derive(Properties, PartialEq, Clone)]
pub struct AgentInfoPanelProps {
    pub snapshot: Option<SimulationSnapshot>,
}

/// Label/value rows for the primary agent; `None` when there is nothing to show.
pub fn info_rows(snapshot: &SimulationSnapshot) -> Option<(String, Vec<(&'static str, String)>)> {
    let agent = snapshot.primary_agent()?;
    let mut rows = vec![
        ("Name", agent.name.clone()),
        ("Position", agent.position.to_string()),
        ("Performance", format!("{}", agent.performance)),
        ("Time Step", snapshot.time_step.to_string()),
    ];
    match &snapshot.agent_info {
        AgentInfo::Reflex => {}
        AgentInfo::Model(m) => {
            rows.push(("Model Size", m.model_size.to_string()));
            rows.push(("Goal Known", if m.goal_position.is_some() { "Yes" } else { "No" }.into()));
            let plan = if m.plan.is_empty() {
                "No plan".to_string()
            } else {
                m.plan.join(" → ")
            };
            rows.push(("Plan", plan));
        }
        AgentInfo::Utility(u) => {
            rows.push(("Model Size", u.model_size.to_string()));
            rows.push(("Exploration Rate", format!("{:.2}", u.exploration_rate)));
        }
        AgentInfo::QLearning(q) => {
            rows.push(("Learning Rate", format!("{:.2}", q.learning_rate)));
            rows.push(("Discount Factor", format!("{:.2}", q.discount_factor)));
            rows.push(("Exploration Rate", format!("{:.2}", q.exploration_rate)));
            rows.push(("Total Reward", format!("{:.2}", q.total_reward)));
        }
    }
    Some((snapshot.agent_type().display_name().to_string(), rows))
}

#[function_component]
pub fn AgentInfoPanel(props: &AgentInfoPanelProps) -> Html {
    let label_style = "flex:1; opacity:0.7;";
    let value_style = "text-align:right; font-variant-numeric:tabular-nums; font-weight:600;";
    let body = match props.snapshot.as_ref().and_then(info_rows) {
        None => html! {<div style="font-size:12px; opacity:0.7;">{"No agent information available"}</div>},
        Some((title, rows)) => html! {<>
            <div style="font-weight:600; color:#58a6ff;">{ title }</div>
            { for rows.into_iter().map(|(label, value)| html!{
                <div style="display:flex; align-items:center; gap:8px;">
                    <span style={label_style}>{ label }</span>
                    <span style={value_style}>{ value }</span>
                </div>
            }) }
        </>},
    };
    html! {
        <div style="background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:10px 14px; min-width:230px; display:flex; flex-direction:column; gap:6px; font-size:13px;">
            <div style="font-weight:600;">{"Agent"}</div>
            { body }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::snapshot;
    use crate::model::{ModelInfo, Position, QLearningInfo};

    fn value<'a>(rows: &'a [(&'static str, String)], label: &str) -> Option<&'a str> {
        rows.iter().find(|(l, _)| *l == label).map(|(_, v)| v.as_str())
    }

    #[test]
    fn model_plan_is_joined_with_arrows() {
        let snap = snapshot(AgentInfo::Model(ModelInfo {
            model_size: 5,
            goal_position: Some(Position::new(3, 1)),
            plan: vec!["right".into(), "down".into()],
        }));
        let (title, rows) = info_rows(&snap).unwrap();
        assert_eq!(title, "Model-Based");
        assert_eq!(value(&rows, "Plan"), Some("right → down"));
        assert_eq!(value(&rows, "Goal Known"), Some("Yes"));
    }

    #[test]
    fn empty_plan_reads_no_plan() {
        let snap = snapshot(AgentInfo::Model(ModelInfo::default()));
        let (_, rows) = info_rows(&snap).unwrap();
        assert_eq!(value(&rows, "Plan"), Some("No plan"));
        assert_eq!(value(&rows, "Goal Known"), Some("No"));
    }

    #[test]
    fn qlearning_rows_and_missing_agent() {
        let mut snap = snapshot(AgentInfo::QLearning(QLearningInfo {
            learning_rate: 0.1,
            total_reward: -4.5,
            ..Default::default()
        }));
        let (title, rows) = info_rows(&snap).unwrap();
        assert_eq!(title, "Q-Learning");
        assert_eq!(value(&rows, "Total Reward"), Some("-4.50"));
        assert_eq!(value(&rows, "Position"), Some("(0, 0)"));
        snap.agents.clear();
        assert!(info_rows(&snap).is_none());
    }
}
