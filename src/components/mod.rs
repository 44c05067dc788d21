pub mod agent_info_panel;
pub mod app;
pub mod controls_panel;
pub mod goal_overlay;
pub mod legend;
pub mod legend_panel;
pub mod log_panel;
