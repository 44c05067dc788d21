use yew::prelude::*;

use crate::state::LogEntry;

#[derive(Properties, PartialEq, Clone)]
pub struct LogPanelProps {
    pub entries: Vec<LogEntry>,
    pub on_clear: Callback<()>,
}

#[function_component]
pub fn LogPanel(props: &LogPanelProps) -> Html {
    let clear_cb = {
        let cb = props.on_clear.clone();
        Callback::from(move |_| cb.emit(()))
    };
    html! {<div style="background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px 10px; display:flex; flex-direction:column; gap:6px; min-height:0;">
        <div style="display:flex; justify-content:space-between; align-items:center;">
            <span style="font-weight:600;">{"Simulation Log"}</span>
            <button onclick={clear_cb} style="padding:2px 8px; font-size:11px;">{"Clear"}</button>
        </div>
        <div style="font-family:monospace; font-size:12px; line-height:1.4; max-height:220px; overflow-y:auto; display:flex; flex-direction:column-reverse;">
            <div>
                { for props.entries.iter().map(|e| html!{
                    <div style={format!("color:{}; white-space:pre-wrap;", e.tag.color())}>{ e.line() }</div>
                }) }
            </div>
        </div>
    </div>}
}
