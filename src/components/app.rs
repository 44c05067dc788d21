use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlCanvasElement;
use yew::prelude::*;

use super::{
    agent_info_panel::AgentInfoPanel, controls_panel::ControlsPanel, goal_overlay::GoalOverlay,
    legend_panel::LegendPanel, log_panel::LogPanel,
};
use crate::config::ClientConfig;
use crate::gateway::HttpGateway;
use crate::render::CanvasRenderer;
use crate::state::{IntervalTicker, OverlayMode, Phase, RunController, StepOrigin, Ticket};

type Controller = RunController<IntervalTicker>;

fn page_config() -> ClientConfig {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .map(|q| ClientConfig::from_query(&q))
        .unwrap_or_default()
}

// Completion handlers only hold a weak ref so an unmounted app drops late responses.
fn spawn_step(
    ctrl: Weak<RefCell<Controller>>,
    gateway: HttpGateway,
    ticket: Ticket,
    redraw: Callback<()>,
) {
    spawn_local(async move {
        let result = gateway.step(ticket.agent_hint()).await;
        if let Some(ctrl) = ctrl.upgrade() {
            ctrl.borrow_mut().finish_step(ticket, result);
            redraw.emit(());
        }
    });
}

#[function_component(App)]
pub fn app() -> Html {
    let gateway = use_memo((), |_| HttpGateway::new(page_config()));
    let ctrl = {
        let speed = gateway.config().speed_ms;
        use_mut_ref(move || RunController::new(IntervalTicker::default(), speed))
    };
    let agent_type = {
        let initial = gateway.config().agent_type.as_str().to_string();
        use_state(move || initial)
    };
    let grid_ref = use_node_ref();
    let series_ref = use_node_ref();
    let bars_ref = use_node_ref();
    let redraw = {
        let force = use_force_update();
        Callback::from(move |_: ()| force.force_update())
    };

    // Bind the auto-run tick once; the ticker lives inside the controller.
    {
        let ctrl = ctrl.clone();
        let gateway = (*gateway).clone();
        let redraw = redraw.clone();
        use_effect_with((), move |_| {
            let weak = Rc::downgrade(&ctrl);
            let on_tick = Callback::from(move |_| {
                let Some(strong) = weak.upgrade() else { return };
                let ticket = strong.borrow_mut().on_tick();
                if let Some(ticket) = ticket {
                    redraw.emit(());
                    spawn_step(weak.clone(), gateway.clone(), ticket, redraw.clone());
                }
            });
            ctrl.borrow_mut().ticker_mut().bind(on_tick);
            move || ctrl.borrow_mut().stop_auto_run()
        });
    }
    // Repaint canvases after every render
    {
        let ctrl = ctrl.clone();
        let (grid_ref, series_ref, bars_ref) = (grid_ref.clone(), series_ref.clone(), bars_ref.clone());
        use_effect(move || {
            let mut renderer = CanvasRenderer::new(
                grid_ref.cast::<HtmlCanvasElement>(),
                series_ref.cast::<HtmlCanvasElement>(),
                bars_ref.cast::<HtmlCanvasElement>(),
            );
            ctrl.borrow().paint(&mut renderer);
            || ()
        });
    }

    let on_agent_change = {
        let agent_type = agent_type.clone();
        Callback::from(move |tag: String| agent_type.set(tag))
    };
    let on_initialize = {
        let ctrl = ctrl.clone();
        let gateway = gateway.clone();
        let agent_type = agent_type.clone();
        let redraw = redraw.clone();
        Callback::from(move |_| {
            let tag = (*agent_type).clone();
            let ticket = ctrl.borrow_mut().request_init(&tag);
            redraw.emit(());
            let Some(ticket) = ticket else { return };
            let weak = Rc::downgrade(&ctrl);
            let gateway = gateway.clone();
            let redraw = redraw.clone();
            spawn_local(async move {
                let result = gateway.initialize(&tag, ticket.agent_hint()).await;
                if let Some(ctrl) = weak.upgrade() {
                    ctrl.borrow_mut().finish_init(ticket, result);
                    redraw.emit(());
                }
            });
        })
    };
    let on_step = {
        let ctrl = ctrl.clone();
        let gateway = gateway.clone();
        let redraw = redraw.clone();
        Callback::from(move |_| {
            let ticket = ctrl.borrow_mut().request_step(StepOrigin::Manual);
            redraw.emit(());
            if let Some(ticket) = ticket {
                spawn_step(Rc::downgrade(&ctrl), (*gateway).clone(), ticket, redraw.clone());
            }
        })
    };
    let on_compare = {
        let ctrl = ctrl.clone();
        let gateway = gateway.clone();
        let redraw = redraw.clone();
        Callback::from(move |_| {
            let ticket = ctrl.borrow_mut().request_compare();
            redraw.emit(());
            let Some(ticket) = ticket else { return };
            let weak = Rc::downgrade(&ctrl);
            let gateway = gateway.clone();
            let redraw = redraw.clone();
            spawn_local(async move {
                let result = gateway.compare().await;
                if let Some(ctrl) = weak.upgrade() {
                    ctrl.borrow_mut().finish_compare(ticket, result);
                    redraw.emit(());
                }
            });
        })
    };
    let on_toggle_auto = {
        let ctrl = ctrl.clone();
        let redraw = redraw.clone();
        Callback::from(move |_| {
            ctrl.borrow_mut().toggle_auto_run();
            redraw.emit(());
        })
    };
    let on_reset = {
        let ctrl = ctrl.clone();
        let redraw = redraw.clone();
        Callback::from(move |_| {
            ctrl.borrow_mut().reset();
            redraw.emit(());
        })
    };
    let on_speed = {
        let ctrl = ctrl.clone();
        let redraw = redraw.clone();
        Callback::from(move |ms: u32| {
            ctrl.borrow_mut().set_speed(ms);
            redraw.emit(());
        })
    };
    let on_overlay = {
        let ctrl = ctrl.clone();
        let redraw = redraw.clone();
        Callback::from(move |mode: OverlayMode| {
            ctrl.borrow_mut().set_overlay(mode);
            redraw.emit(());
        })
    };
    let on_clear_log = {
        let ctrl = ctrl.clone();
        let redraw = redraw.clone();
        Callback::from(move |_| {
            ctrl.borrow_mut().clear_log();
            redraw.emit(());
        })
    };

    let c = ctrl.borrow();
    let snapshot = c.snapshot().cloned();
    let (steps, agent_name) = snapshot
        .as_ref()
        .map(|s| (s.step_count, s.agent_type().display_name().to_string()))
        .unwrap_or_default();
    let terminal = c.phase() == Phase::Terminal;
    let panel = "background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px;";

    html! {
        <div style="min-height:100vh; background:#0e1116; color:#c9d1d9; font-family:sans-serif; display:flex; flex-direction:column;">
            <div id="top-bar" style="padding:10px 16px; border-bottom:1px solid #30363d; display:flex; justify-content:space-between; align-items:center;">
                <span style="font-size:18px; font-weight:600;">{"Grid World Agent Simulation"}</span>
                <span style="font-size:13px; opacity:0.7;">{ format!("Step {}", steps) }</span>
            </div>
            <div style="display:flex; gap:12px; padding:12px; align-items:flex-start; flex-wrap:wrap;">
                <div style="display:flex; flex-direction:column; gap:12px;">
                    <ControlsPanel
                        agent_type={(*agent_type).clone()}
                        controls={c.controls()}
                        speed_ms={c.speed_ms()}
                        overlay_mode={c.overlay_mode()}
                        {on_agent_change}
                        {on_initialize}
                        {on_step}
                        {on_toggle_auto}
                        on_reset={on_reset.clone()}
                        {on_compare}
                        {on_speed}
                        {on_overlay}
                    />
                    <LegendPanel overlay_mode={c.overlay_mode()} />
                </div>
                <div style="position:relative;">
                    <canvas ref={grid_ref} style="display:block; border:1px solid #30363d; border-radius:4px;"></canvas>
                    <GoalOverlay show={terminal} {steps} {agent_name} reset={on_reset} />
                </div>
                <div style="display:flex; flex-direction:column; gap:12px; min-width:360px;">
                    <AgentInfoPanel {snapshot} />
                    <div style={panel}>
                        <div style="font-weight:600; margin-bottom:4px;">{"Performance"}</div>
                        <canvas ref={series_ref} width="360" height="180"></canvas>
                    </div>
                    <div style={panel}>
                        <div style="font-weight:600; margin-bottom:4px;">{"Agent Comparison"}</div>
                        <div style="font-size:11px; opacity:0.7; margin-bottom:4px;">{"Steps to goal (blue) / success rate (green)"}</div>
                        <canvas ref={bars_ref} width="360" height="200"></canvas>
                    </div>
                    <LogPanel entries={c.log().entries().to_vec()} on_clear={on_clear_log} />
                </div>
            </div>
        </div>
    }
}
