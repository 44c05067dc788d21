use super::legend::LegendRow;
use crate::render::canvas::{cell_color, tier_color};
use crate::state::overlay::ValueTier;
use crate::state::{CellVisual, OverlayMode};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct LegendPanelProps {
    pub overlay_mode: OverlayMode,
}

#[function_component]
pub fn LegendPanel(props: &LegendPanelProps) -> Html {
    let overlay_rows = match props.overlay_mode {
        OverlayMode::None => html! {},
        OverlayMode::Heatmap => html! {<>
            <LegendRow color="rgba(248,81,73,0.2)" label="Few visits" />
            <LegendRow color="rgba(248,81,73,0.75)" label="Most visits" />
        </>},
        OverlayMode::Values => html! {<>
            <LegendRow color={tier_color(ValueTier::High)} label="Value > 5" />
            <LegendRow color={tier_color(ValueTier::Medium)} label="Value > 0" />
            <LegendRow color={tier_color(ValueTier::Low)} label="Value < 0" />
        </>},
        OverlayMode::Policy => html! {
            <LegendRow color="rgba(63,185,80,0.85)" label="Best action" />
        },
    };
    html! {<div style="background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; min-width:170px;">
        <div style="font-weight:600; margin-bottom:4px;">{"Legend"}</div>
        <LegendRow color={cell_color(CellVisual::Empty)} label="Empty" />
        <LegendRow color={cell_color(CellVisual::Visited)} label="Visited" />
        <LegendRow color={cell_color(CellVisual::Obstacle)} label="Obstacle" />
        <LegendRow color={cell_color(CellVisual::Goal)} label="Goal" />
        <LegendRow color="#58a6ff" label="Agent" round={true} />
        if props.overlay_mode != OverlayMode::None {
            <div style="font-size:11px; color:#8b949e; margin:6px 0 2px 0;">{ props.overlay_mode.label() }</div>
        }
        { overlay_rows }
    </div>}
}
