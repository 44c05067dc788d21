use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::config::{MAX_SPEED_MS, MIN_SPEED_MS, SPEED_STEP_MS};
use crate::model::AgentType;
use crate::state::{Controls, OverlayMode};

#[derive(Properties, PartialEq, Clone)]
pub struct ControlsPanelProps {
    /// Raw selector value; sent to the backend unvalidated.
    pub agent_type: String,
    pub controls: Controls,
    pub speed_ms: u32,
    pub overlay_mode: OverlayMode,
    pub on_agent_change: Callback<String>,
    pub on_initialize: Callback<()>,
    pub on_step: Callback<()>,
    pub on_toggle_auto: Callback<()>,
    pub on_reset: Callback<()>,
    pub on_compare: Callback<()>,
    pub on_speed: Callback<u32>,
    pub on_overlay: Callback<OverlayMode>,
}

fn relay(cb: &Callback<()>) -> Callback<MouseEvent> {
    let cb = cb.clone();
    Callback::from(move |_| cb.emit(()))
}

#[function_component]
pub fn ControlsPanel(props: &ControlsPanelProps) -> Html {
    let c = props.controls;
    let agent_cb = {
        let cb = props.on_agent_change.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            cb.emit(select.value());
        })
    };
    let speed_cb = {
        let cb = props.on_speed.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            if let Ok(ms) = input.value().parse::<u32>() {
                cb.emit(ms);
            }
        })
    };
    let init_label = if c.initializing { "Initializing..." } else { "Initialize" };
    let auto_label = if c.auto_running { "Stop Auto Run" } else { "Auto Run" };
    html! {<div style="background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:10px; min-width:220px; display:flex; flex-direction:column; gap:8px;">
        <label style="display:flex; flex-direction:column; gap:4px; font-size:12px;">
            <span style="opacity:0.7;">{"Agent Type"}</span>
            <select onchange={agent_cb}>
                { for AgentType::ALL.iter().map(|t| html!{
                    <option value={t.as_str()} selected={props.agent_type == t.as_str()}>{ t.display_name() }</option>
                }) }
            </select>
        </label>
        <button onclick={relay(&props.on_initialize)} disabled={!c.initialize}>{ init_label }</button>
        <div style="display:flex; gap:6px;">
            <button style="flex:1;" onclick={relay(&props.on_step)} disabled={!c.step}>{"Step"}</button>
            <button style="flex:1;" onclick={relay(&props.on_toggle_auto)} disabled={!c.auto_run}>{ auto_label }</button>
        </div>
        <button onclick={relay(&props.on_reset)} disabled={!c.reset}>{"Reset"}</button>
        <label style="display:flex; flex-direction:column; gap:4px; font-size:12px;">
            <span style="display:flex; justify-content:space-between;">
                <span style="opacity:0.7;">{"Speed"}</span>
                <span style="font-variant-numeric:tabular-nums;">{ format!("{} ms", props.speed_ms) }</span>
            </span>
            <input type="range"
                min={MIN_SPEED_MS.to_string()}
                max={MAX_SPEED_MS.to_string()}
                step={SPEED_STEP_MS.to_string()}
                value={props.speed_ms.to_string()}
                oninput={speed_cb} />
        </label>
        <div style="display:flex; flex-direction:column; gap:4px; font-size:12px;">
            <span style="opacity:0.7;">{"Overlay"}</span>
            { for OverlayMode::ALL.iter().map(|&mode| {
                let cb = props.on_overlay.clone();
                html!{
                    <label style="display:flex; align-items:center; gap:6px; cursor:pointer;">
                        <input type="radio" name="overlay-mode"
                            checked={props.overlay_mode == mode}
                            onchange={Callback::from(move |_: Event| cb.emit(mode))} />
                        <span>{ mode.label() }</span>
                    </label>
                }
            }) }
        </div>
        <button onclick={relay(&props.on_compare)} disabled={!c.compare}>{"Compare Agents"}</button>
    </div>}
}
