//! Session state machine and run controller.
//!
//! `RunController` owns the latest snapshot, the auto-run timer and the log.
//! Network calls happen outside: a `request_*` transition hands out a
//! [`Ticket`], and the matching `finish_*` applies the response only if the
//! ticket still belongs to the current session generation. Reset and
//! re-initialize bump the generation, so late responses are dropped.

use tracing::{debug, info, warn};

use super::grid::GridLayout;
use super::log::{EventLog, LogTag};
use super::metrics::{ComparisonBar, SeriesPoint, comparison_bars, performance_series};
use super::overlay::{self, OverlayFrame, OverlayMode};
use super::ticker::Ticker;
use crate::config::clamp_speed;
use crate::error::ClientError;
use crate::model::{AgentInfo, AgentType, ComparisonResult, SimulationSnapshot};
use crate::render::Renderer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Initializing,
    Ready,
    Stepping,
    Terminal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOrigin {
    Manual,
    Timer,
}

/// Proof that a request was issued by the controller. Hand it back with the response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    agent_hint: Option<AgentType>,
}

impl Ticket {
    /// Agent type to assume when a response omits `agent_type`.
    pub fn agent_hint(&self) -> Option<AgentType> {
        self.agent_hint
    }
}

/// Enabled flags and labels for the control panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Controls {
    pub initialize: bool,
    pub step: bool,
    pub auto_run: bool,
    pub reset: bool,
    pub compare: bool,
    pub initializing: bool,
    pub auto_running: bool,
}

pub struct RunController<T: Ticker> {
    phase: Phase,
    snapshot: Option<SimulationSnapshot>,
    speed_ms: u32,
    overlay_mode: OverlayMode,
    ticker: T,
    timer: Option<T::Handle>,
    generation: u64,
    pending_compare: Option<Ticket>,
    log: EventLog,
    series: Vec<SeriesPoint>,
    comparison: Vec<ComparisonBar>,
}

impl<T: Ticker> RunController<T> {
    pub fn new(ticker: T, speed_ms: u32) -> Self {
        Self::with_log(ticker, speed_ms, EventLog::default())
    }

    pub fn with_log(ticker: T, speed_ms: u32, log: EventLog) -> Self {
        Self {
            phase: Phase::Idle,
            snapshot: None,
            speed_ms: clamp_speed(speed_ms),
            overlay_mode: OverlayMode::None,
            ticker,
            timer: None,
            generation: 0,
            pending_compare: None,
            log,
            series: Vec::new(),
            comparison: Vec::new(),
        }
    }

    // ---------------- Accessors -----------------

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn snapshot(&self) -> Option<&SimulationSnapshot> {
        self.snapshot.as_ref()
    }

    /// True between a successful initialize and goal/reset.
    pub fn running(&self) -> bool {
        matches!(self.phase, Phase::Ready | Phase::Stepping)
    }

    pub fn is_auto_running(&self) -> bool {
        self.timer.is_some()
    }

    pub fn speed_ms(&self) -> u32 {
        self.speed_ms
    }

    pub fn overlay_mode(&self) -> OverlayMode {
        self.overlay_mode
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    #[cfg(test)]
    pub fn series(&self) -> &[SeriesPoint] {
        &self.series
    }

    #[cfg(test)]
    pub fn comparison(&self) -> &[ComparisonBar] {
        &self.comparison
    }

    pub fn ticker_mut(&mut self) -> &mut T {
        &mut self.ticker
    }

    pub fn controls(&self) -> Controls {
        Controls {
            initialize: self.phase != Phase::Initializing,
            step: self.phase == Phase::Ready,
            auto_run: self.running(),
            reset: self.phase != Phase::Idle,
            compare: self.pending_compare.is_none(),
            initializing: self.phase == Phase::Initializing,
            auto_running: self.is_auto_running(),
        }
    }

    /// Overlay for the current snapshot and mode.
    pub fn overlay(&self) -> OverlayFrame {
        match &self.snapshot {
            Some(s) => overlay::compute(s, self.overlay_mode),
            None => OverlayFrame::default(),
        }
    }

    /// Pushes the full derived view through `renderer`.
    pub fn paint<R: Renderer>(&self, renderer: &mut R) {
        match &self.snapshot {
            Some(s) => {
                renderer.render_grid(Some(&GridLayout::from_snapshot(s)));
                renderer.render_overlay(&overlay::compute(s, self.overlay_mode).annotations);
            }
            None => {
                renderer.render_grid(None);
                renderer.render_overlay(&[]);
            }
        }
        renderer.render_series(&self.series);
        renderer.render_comparison(&self.comparison);
    }

    fn ticket(&self, agent_hint: Option<AgentType>) -> Ticket {
        Ticket {
            generation: self.generation,
            agent_hint,
        }
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        ticket.generation == self.generation
    }

    // ---------------- Initialize -----------------

    /// Starts an initialize exchange. Refused while another one is in flight.
    pub fn request_init(&mut self, agent_type: &str) -> Option<Ticket> {
        if self.phase == Phase::Initializing {
            debug!(agent_type, "initialize already in flight");
            return None;
        }
        self.stop_auto_run();
        self.generation += 1;
        self.phase = Phase::Initializing;
        info!(agent_type, generation = self.generation, "initialize requested");
        Some(self.ticket(agent_type.parse().ok()))
    }

    /// Applies an initialize response. Returns false if the ticket was stale.
    pub fn finish_init(
        &mut self,
        ticket: Ticket,
        result: Result<SimulationSnapshot, ClientError>,
    ) -> bool {
        if !self.is_current(ticket) || self.phase != Phase::Initializing {
            debug!(generation = ticket.generation, "discarding stale initialize response");
            return false;
        }
        match result {
            Ok(snapshot) => {
                let agent = snapshot.agent_type();
                self.series = performance_series(&snapshot.simulation_data);
                self.snapshot = Some(snapshot);
                self.phase = Phase::Ready;
                self.log.push(
                    LogTag::Init,
                    format!("Simulation initialized with {} agent", agent.display_name()),
                );
                self.report_overlay_notice();
            }
            Err(err) => {
                warn!(%err, "initialize failed");
                self.snapshot = None;
                self.series.clear();
                self.phase = Phase::Idle;
                self.log.push(LogTag::Error, format!("Error: {err}"));
            }
        }
        true
    }

    // ---------------- Step -----------------

    /// Starts a step exchange. Only one step is in flight at a time; a request
    /// made while another is pending is dropped.
    pub fn request_step(&mut self, origin: StepOrigin) -> Option<Ticket> {
        match self.phase {
            Phase::Ready => {}
            Phase::Stepping => {
                debug!(?origin, "step already in flight; dropping request");
                return None;
            }
            phase => {
                debug!(?origin, ?phase, "step ignored outside a running session");
                return None;
            }
        }
        self.phase = Phase::Stepping;
        let hint = self.snapshot.as_ref().map(SimulationSnapshot::agent_type);
        Some(self.ticket(hint))
    }

    /// Applies a step response. Returns false if the ticket was stale.
    pub fn finish_step(
        &mut self,
        ticket: Ticket,
        result: Result<SimulationSnapshot, ClientError>,
    ) -> bool {
        if !self.is_current(ticket) || self.phase != Phase::Stepping {
            debug!(generation = ticket.generation, "discarding stale step response");
            return false;
        }
        match result {
            Ok(snapshot) => {
                self.series = performance_series(&snapshot.simulation_data);
                self.log.push(LogTag::Info, step_line(&snapshot));
                let goal = snapshot.goal_reached;
                let steps = snapshot.step_count;
                self.snapshot = Some(snapshot);
                if goal {
                    self.log
                        .push(LogTag::Goal, format!("Goal reached in {steps} steps!"));
                    self.stop_auto_run();
                    self.phase = Phase::Terminal;
                    info!(steps, "goal reached");
                } else {
                    self.phase = Phase::Ready;
                }
            }
            Err(err) => {
                warn!(%err, "step failed");
                self.log.push(LogTag::Error, format!("Error: {err}"));
                self.stop_auto_run();
                self.phase = Phase::Ready;
            }
        }
        true
    }

    // ---------------- Auto-run -----------------

    pub fn toggle_auto_run(&mut self) {
        if self.is_auto_running() {
            self.stop_auto_run();
        } else {
            self.start_auto_run();
        }
    }

    /// Installs the repeating step timer at the current speed.
    pub fn start_auto_run(&mut self) -> bool {
        if self.is_auto_running() || !self.running() {
            return false;
        }
        match self.ticker.start(self.speed_ms) {
            Some(handle) => {
                self.timer = Some(handle);
                self.log.push(LogTag::Info, "Auto run started");
                info!(speed_ms = self.speed_ms, "auto run started");
                true
            }
            None => {
                self.log
                    .push(LogTag::Error, "Error: auto run timer could not be started");
                false
            }
        }
    }

    /// Cancels the timer if one is active. Safe to call repeatedly.
    pub fn stop_auto_run(&mut self) {
        if let Some(handle) = self.timer.take() {
            self.ticker.cancel(handle);
            self.log.push(LogTag::Info, "Auto run stopped");
            info!("auto run stopped");
        }
    }

    /// Timer callback entry point.
    pub fn on_tick(&mut self) -> Option<Ticket> {
        if !self.is_auto_running() {
            return None;
        }
        self.request_step(StepOrigin::Timer)
    }

    /// Changes the auto-run interval; an active timer restarts at the new rate.
    pub fn set_speed(&mut self, speed_ms: u32) {
        let speed_ms = clamp_speed(speed_ms);
        if speed_ms == self.speed_ms {
            return;
        }
        self.speed_ms = speed_ms;
        debug!(speed_ms, "speed changed");
        if let Some(handle) = self.timer.take() {
            self.ticker.cancel(handle);
            self.timer = self.ticker.start(speed_ms);
            if self.timer.is_none() {
                self.log
                    .push(LogTag::Error, "Error: auto run timer could not be restarted");
            }
        }
    }

    // ---------------- Overlay, compare, reset -----------------

    pub fn set_overlay(&mut self, mode: OverlayMode) {
        if mode == self.overlay_mode {
            return;
        }
        self.overlay_mode = mode;
        self.report_overlay_notice();
    }

    fn report_overlay_notice(&mut self) {
        if let Some(notice) = self.overlay().notice {
            self.log.push(LogTag::Error, notice.to_string());
        }
    }

    pub fn request_compare(&mut self) -> Option<Ticket> {
        if self.pending_compare.is_some() {
            debug!("compare already in flight");
            return None;
        }
        let ticket = self.ticket(None);
        self.pending_compare = Some(ticket);
        Some(ticket)
    }

    pub fn finish_compare(
        &mut self,
        ticket: Ticket,
        result: Result<ComparisonResult, ClientError>,
    ) -> bool {
        if self.pending_compare != Some(ticket) {
            debug!("discarding stale compare response");
            return false;
        }
        self.pending_compare = None;
        match result {
            Ok(cmp) => {
                self.comparison = comparison_bars(&cmp);
                self.log.push(LogTag::Info, "Agent comparison updated");
            }
            Err(err) => {
                warn!(%err, "compare failed");
                self.log.push(LogTag::Error, format!("Error: {err}"));
            }
        }
        true
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Returns to `Idle` from any state, abandoning in-flight requests.
    pub fn reset(&mut self) {
        if let Some(handle) = self.timer.take() {
            self.ticker.cancel(handle);
        }
        self.generation += 1;
        self.phase = Phase::Idle;
        self.snapshot = None;
        self.overlay_mode = OverlayMode::None;
        self.pending_compare = None;
        self.series.clear();
        self.comparison.clear();
        self.log.clear();
        self.log.push(LogTag::Info, "Simulation reset");
        info!(generation = self.generation, "session reset");
    }
}

fn step_line(s: &SimulationSnapshot) -> String {
    let mut line = match s.primary_agent() {
        Some(agent) => format!(
            "Step {}: Agent at {} with performance {}",
            s.step_count,
            serde_json::to_string(&agent.position).unwrap_or_default(),
            agent.performance
        ),
        None => format!("Step {}: no agent on the grid", s.step_count),
    };
    if let AgentInfo::Model(info) = &s.agent_info {
        let plan = serde_json::to_string(&info.plan).unwrap_or_default();
        line.push_str(&format!(" (Plan: {plan})"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::model::fixtures::snapshot_json;
    use crate::model::{AgentType, ModelInfo, Position};
    use crate::state::overlay::Annotation;

    #[derive(Default)]
    struct FakeTicker {
        next: u32,
        active: Vec<u32>,
        started: Vec<u32>,
    }

    impl Ticker for FakeTicker {
        type Handle = u32;

        fn start(&mut self, interval_ms: u32) -> Option<u32> {
            self.next += 1;
            self.active.push(self.next);
            self.started.push(interval_ms);
            Some(self.next)
        }

        fn cancel(&mut self, handle: u32) {
            self.active.retain(|h| *h != handle);
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        grid: Option<GridLayout>,
        grid_calls: usize,
        overlay: Vec<Annotation>,
        series: Vec<SeriesPoint>,
        bars: Vec<ComparisonBar>,
    }

    impl Renderer for RecordingRenderer {
        fn render_grid(&mut self, grid: Option<&GridLayout>) {
            self.grid = grid.cloned();
            self.grid_calls += 1;
        }
        fn render_overlay(&mut self, annotations: &[Annotation]) {
            self.overlay = annotations.to_vec();
        }
        fn render_series(&mut self, points: &[SeriesPoint]) {
            self.series = points.to_vec();
        }
        fn render_comparison(&mut self, bars: &[ComparisonBar]) {
            self.bars = bars.to_vec();
        }
    }

    type Controller = RunController<FakeTicker>;

    fn controller() -> Controller {
        RunController::with_log(FakeTicker::default(), 500, EventLog::with_clock(|| "00:00:00".into()))
    }

    fn snap(agent: &str, step: u64, goal: bool) -> SimulationSnapshot {
        SimulationSnapshot::from_json(&snapshot_json(agent, step, goal), None).unwrap()
    }

    fn ready(agent: &str) -> Controller {
        let mut c = controller();
        let t = c.request_init(agent).unwrap();
        assert!(c.finish_init(t, Ok(snap(agent, 0, false))));
        c
    }

    fn step_ok(c: &mut Controller, origin: StepOrigin, step: u64, goal: bool) {
        let t = c.request_step(origin).expect("step should be issued");
        assert!(c.finish_step(t, Ok(snap("reflex", step, goal))));
    }

    fn step_err() -> ClientError {
        ClientError::Step(TransportError::Status(500))
    }

    fn messages(c: &Controller) -> Vec<String> {
        c.log().entries().iter().map(|e| e.message.clone()).collect()
    }

    const IDLE_CONTROLS: Controls = Controls {
        initialize: true,
        step: false,
        auto_run: false,
        reset: false,
        compare: true,
        initializing: false,
        auto_running: false,
    };

    #[test]
    fn initialize_enables_step_auto_and_reset() {
        for agent in AgentType::ALL {
            let mut c = controller();
            assert_eq!(c.controls(), IDLE_CONTROLS);
            let t = c.request_init(agent.as_str()).unwrap();
            assert_eq!(c.phase(), Phase::Initializing);
            assert!(!c.controls().initialize);
            assert!(c.controls().initializing);
            assert!(c.finish_init(t, Ok(snap(agent.as_str(), 0, false))));
            assert_eq!(c.snapshot().unwrap().agent_type(), agent);
            let controls = c.controls();
            assert!(controls.step && controls.auto_run && controls.reset && controls.initialize);
            assert!(c.running());
            assert_eq!(
                c.log().entries().last().unwrap().tag,
                LogTag::Init,
            );
        }
    }

    #[test]
    fn initialize_is_not_reentrant() {
        let mut c = controller();
        assert!(c.request_init("reflex").is_some());
        assert!(c.request_init("model").is_none());
    }

    #[test]
    fn initialize_failure_returns_to_idle() {
        let mut c = controller();
        let t = c.request_init("utility").unwrap();
        c.finish_init(t, Err(ClientError::Init(TransportError::Status(500))));
        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(c.controls(), IDLE_CONTROLS);
        let last = c.log().entries().last().unwrap();
        assert_eq!(last.tag, LogTag::Error);
        assert_eq!(
            last.message,
            "Error: Failed to initialize simulation: server responded with status 500"
        );
    }

    #[test]
    fn unknown_agent_tag_is_forwarded_without_hint() {
        let mut c = controller();
        let t = c.request_init("random").unwrap();
        assert_eq!(t.agent_hint(), None);
        let t = ready("model").request_step(StepOrigin::Manual).unwrap();
        assert_eq!(t.agent_hint(), Some(AgentType::Model));
    }

    #[test]
    fn manual_step_disables_step_until_response() {
        let mut c = ready("reflex");
        let t = c.request_step(StepOrigin::Manual).unwrap();
        assert!(!c.controls().step);
        assert!(c.request_step(StepOrigin::Manual).is_none());
        c.finish_step(t, Ok(snap("reflex", 1, false)));
        assert!(c.controls().step);
        assert_eq!(
            messages(&c).last().unwrap(),
            "Step 1: Agent at [1,1] with performance -1"
        );
        assert_eq!(c.series().len(), 2);
    }

    #[test]
    fn goal_step_is_terminal() {
        let mut c = ready("reflex");
        c.start_auto_run();
        for step in 1..=3 {
            let t = c.on_tick().unwrap();
            c.finish_step(t, Ok(snap("reflex", step, false)));
        }
        let t = c.on_tick().unwrap();
        c.finish_step(t, Ok(snap("reflex", 4, true)));
        assert_eq!(c.phase(), Phase::Terminal);
        assert!(!c.is_auto_running());
        assert!(c.ticker_mut().active.is_empty());
        let controls = c.controls();
        assert!(!controls.step && !controls.auto_run);
        assert!(c.request_step(StepOrigin::Manual).is_none());
        assert!(c.on_tick().is_none());
        let log = messages(&c);
        assert!(log.contains(&"Goal reached in 4 steps!".to_string()));
        assert_eq!(log.last().unwrap(), "Auto run stopped");
    }

    #[test]
    fn step_failure_stops_auto_run_and_stays_running() {
        let mut c = ready("reflex");
        c.toggle_auto_run();
        let t = c.on_tick().unwrap();
        c.finish_step(t, Err(step_err()));
        assert_eq!(c.phase(), Phase::Ready);
        assert!(c.running());
        assert!(!c.is_auto_running());
        assert!(c.controls().step);
        assert!(messages(&c).iter().any(|m| m.starts_with("Error: Failed to step simulation")));
    }

    #[test]
    fn tick_during_manual_step_is_dropped() {
        let mut c = ready("reflex");
        c.start_auto_run();
        let manual = c.request_step(StepOrigin::Manual).unwrap();
        assert!(c.on_tick().is_none());
        c.finish_step(manual, Ok(snap("reflex", 1, false)));
        assert!(c.on_tick().is_some());
    }

    #[test]
    fn speed_change_restarts_active_timer() {
        let mut c = ready("reflex");
        c.set_speed(300);
        assert!(c.ticker_mut().started.is_empty());
        c.start_auto_run();
        c.set_speed(800);
        assert_eq!(c.ticker_mut().started, vec![300, 800]);
        assert_eq!(c.ticker_mut().active.len(), 1);
        c.set_speed(10);
        assert_eq!(c.speed_ms(), crate::config::MIN_SPEED_MS);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut c = ready("reflex");
        c.start_auto_run();
        assert!(!c.start_auto_run());
        c.stop_auto_run();
        c.stop_auto_run();
        let stops = messages(&c).iter().filter(|m| *m == "Auto run stopped").count();
        assert_eq!(stops, 1);
        assert!(c.ticker_mut().active.is_empty());
    }

    #[test]
    fn auto_run_needs_a_running_session() {
        let mut c = controller();
        assert!(!c.start_auto_run());
        assert!(c.ticker_mut().started.is_empty());
    }

    #[test]
    fn reset_clears_everything_and_discards_late_responses() {
        let mut c = ready("reflex");
        c.set_overlay(OverlayMode::Heatmap);
        c.start_auto_run();
        let pending = c.request_step(StepOrigin::Manual).unwrap();
        let cmp = c.request_compare().unwrap();
        c.reset();

        assert_eq!(c.phase(), Phase::Idle);
        assert!(c.snapshot().is_none());
        assert!(c.ticker_mut().active.is_empty());
        assert_eq!(c.controls(), IDLE_CONTROLS);
        assert_eq!(c.overlay_mode(), OverlayMode::None);
        assert_eq!(messages(&c), vec!["Simulation reset".to_string()]);

        assert!(!c.finish_step(pending, Ok(snap("reflex", 1, false))));
        assert!(!c.finish_compare(cmp, Ok(ComparisonResult::default())));
        assert!(c.snapshot().is_none());

        let mut r = RecordingRenderer::default();
        c.paint(&mut r);
        assert!(r.grid.is_none());
        assert!(r.overlay.is_empty());
        assert!(r.series.is_empty());
        assert!(r.bars.is_empty());
    }

    #[test]
    fn reset_during_initialize_discards_response() {
        let mut c = controller();
        let stale = c.request_init("utility").unwrap();
        c.reset();
        assert!(!c.finish_init(stale, Ok(snap("utility", 0, false))));
        assert_eq!(c.phase(), Phase::Idle);
        assert!(c.snapshot().is_none());
        assert_eq!(c.controls(), IDLE_CONTROLS);
        assert_eq!(messages(&c), vec!["Simulation reset".to_string()]);
    }

    #[test]
    fn reset_from_terminal_restores_idle_controls() {
        let mut c = ready("reflex");
        step_ok(&mut c, StepOrigin::Manual, 1, true);
        assert_eq!(c.phase(), Phase::Terminal);
        assert!(c.controls().reset);
        c.reset();
        assert_eq!(c.phase(), Phase::Idle);
        assert!(c.snapshot().is_none());
        assert_eq!(c.controls(), IDLE_CONTROLS);
        assert!(c.request_step(StepOrigin::Manual).is_none());
    }

    #[test]
    fn reinitialize_discards_pending_step() {
        let mut c = ready("reflex");
        let stale = c.request_step(StepOrigin::Manual).unwrap();
        let t = c.request_init("qlearning").unwrap();
        assert!(!c.finish_step(stale, Ok(snap("reflex", 1, false))));
        c.finish_init(t, Ok(snap("qlearning", 0, false)));
        assert_eq!(c.snapshot().unwrap().agent_type(), AgentType::QLearning);
    }

    #[test]
    fn paint_renders_grid_overlay_and_series() {
        let mut c = ready("reflex");
        step_ok(&mut c, StepOrigin::Manual, 2, false);
        c.set_overlay(OverlayMode::Heatmap);
        let mut r = RecordingRenderer::default();
        c.paint(&mut r);
        let grid = r.grid.unwrap();
        assert_eq!((grid.width, grid.height), (4, 3));
        assert_eq!(r.overlay.len(), 1);
        assert_eq!(r.overlay[0].position, Position::new(1, 1));
        assert_eq!(r.series.len(), 3);
        assert_eq!(r.grid_calls, 1);
    }

    #[test]
    fn overlay_notice_is_logged_once_on_selection() {
        let mut c = ready("reflex");
        c.set_overlay(OverlayMode::Values);
        c.set_overlay(OverlayMode::Values);
        step_ok(&mut c, StepOrigin::Manual, 1, false);
        let notices = c
            .log()
            .entries()
            .iter()
            .filter(|e| e.message == "No value data available for Simple Reflex agents")
            .count();
        assert_eq!(notices, 1);
        assert_eq!(c.log().entries()[1].tag, LogTag::Error);
    }

    #[test]
    fn compare_populates_bars_in_fixed_order() {
        let mut c = controller();
        let t = c.request_compare().unwrap();
        assert!(!c.controls().compare);
        assert!(c.request_compare().is_none());
        let body = r#"{"model":{"steps_to_goal":30,"success_rate":0.5},
            "reflex":{"steps_to_goal":60,"success_rate":0.25},
            "qlearning":{"steps_to_goal":20,"success_rate":1.0},
            "utility":{"steps_to_goal":25,"success_rate":0.75}}"#;
        c.finish_compare(t, Ok(ComparisonResult::from_json(body).unwrap()));
        let pcts: Vec<f64> = c.comparison().iter().map(|b| b.success_pct).collect();
        assert_eq!(pcts, vec![25.0, 50.0, 75.0, 100.0]);
        assert!(c.controls().compare);
    }

    #[test]
    fn compare_failure_is_logged() {
        let mut c = controller();
        let t = c.request_compare().unwrap();
        c.finish_compare(t, Err(ClientError::Compare(TransportError::Timeout(10_000))));
        assert_eq!(
            messages(&c).last().unwrap(),
            "Error: Failed to compare agents: request timed out after 10000 ms"
        );
    }

    #[test]
    fn model_step_line_includes_plan() {
        let mut s = snap("model", 3, false);
        s.agent_info = AgentInfo::Model(ModelInfo {
            plan: vec!["up".into(), "right".into()],
            ..Default::default()
        });
        assert_eq!(
            step_line(&s),
            r#"Step 3: Agent at [1,1] with performance -3 (Plan: ["up","right"])"#
        );
    }

    #[test]
    fn clear_log_keeps_session() {
        let mut c = ready("reflex");
        c.clear_log();
        assert!(c.log().entries().is_empty());
        assert_eq!(c.phase(), Phase::Ready);
    }
}
