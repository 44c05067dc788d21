use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct GoalOverlayProps {
    pub show: bool,
    pub steps: u64,
    pub agent_name: String,
    pub reset: Callback<()>,
}

#[function_component]
pub fn GoalOverlay(props: &GoalOverlayProps) -> Html {
    if !props.show {
        return html! {};
    }
    let reset_btn = {
        let cb = props.reset.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {
        <div style="position:absolute; top:50%; left:50%; transform:translate(-50%, -50%); background:rgba(0,0,0,0.85); border:2px solid #2ea043; padding:20px 28px; border-radius:12px; text-align:center; min-width:280px;">
            <h2 style="margin:0 0 12px 0; color:#2ea043;">{"Goal Reached"}</h2>
            <p style="margin:4px 0;">{ format!("{} agent reached the goal in {} steps", props.agent_name, props.steps) }</p>
            <div style="margin-top:16px; display:flex; gap:12px; justify-content:center;">
                <button onclick={reset_btn}>{"Reset"}</button>
            </div>
        </div>
    }
}
