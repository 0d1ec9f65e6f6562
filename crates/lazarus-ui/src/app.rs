use crate::colors::{ColorLevel, Theme, ThemeMode, ThemeSettings};
use crate::widgets::{
    ConfirmDialog, HelpOverlay, HudScreen, SelectionScreen, SequenceScreen, SleepingScreen,
};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use lazarus_client::{
    ControlPlane, HEALTH_POLL_INTERVAL, ResurrectResponse, StatusResponse, StopResponse,
    WatchdogStatus, ZonesResponse,
};
use lazarus_core::{
    EnvironmentState, ProfileCatalog, SequencerEvent, Session, SessionUpdate, UserAction,
};
use lazarus_sim::{
    ChaosFlag, ChaosState, DEFAULT_FORECAST_DAYS, EventFeed, MAX_FORECAST_DAYS,
    MIN_FORECAST_DAYS, TelemetryGenerator, TrafficGenerator, forecast,
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect, style::Style, widgets::Block};
use std::{
    io::{self, Stdout},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum UiError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Results of control plane calls flowing back into the event loop.
#[derive(Debug)]
pub enum ControlEvent {
    Health(Result<StatusResponse, String>),
    Zones(Result<ZonesResponse, String>),
    Resurrected(Result<ResurrectResponse, String>),
    Stopped(Result<StopResponse, String>),
    Watchdog(Result<WatchdogStatus, String>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MainTab {
    Overview,
    Traffic,
    Events,
}

impl MainTab {
    fn next(self) -> Self {
        match self {
            Self::Overview => Self::Traffic,
            Self::Traffic => Self::Events,
            Self::Events => Self::Overview,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Overview => Self::Events,
            Self::Traffic => Self::Overview,
            Self::Events => Self::Traffic,
        }
    }
}

#[derive(Debug, Default)]
struct UiFlags {
    should_quit: bool,
    show_confirm_stop: bool,
    show_help: bool,
}

const TELEMETRY_INTERVAL: Duration = Duration::from_secs(1);
const TRAFFIC_INTERVAL: Duration = Duration::from_millis(1500);
const EVENT_INTERVAL: Duration = Duration::from_millis(3500);
const WATCHDOG_POLL_INTERVAL: Duration = Duration::from_secs(5);

struct Cadences {
    telemetry: Instant,
    traffic: Instant,
    events: Instant,
    watchdog: Instant,
    health: Instant,
}

impl Cadences {
    fn new(now: Instant) -> Self {
        Self {
            telemetry: now,
            traffic: now,
            events: now,
            watchdog: now,
            health: now,
        }
    }
}

pub struct App {
    catalog: ProfileCatalog,
    selected: usize,
    session: Option<Session>,
    control: Arc<ControlPlane>,
    backend_desc: String,

    telemetry: TelemetryGenerator,
    traffic: TrafficGenerator,
    feed: EventFeed,
    chaos: ChaosState,
    forecast_days: u32,

    zones: Option<ZonesResponse>,
    instance: Option<ResurrectResponse>,
    watchdog: Option<WatchdogStatus>,
    active_since: Option<Instant>,
    banner: Option<String>,

    pub theme: Theme,
    pub theme_mode: ThemeMode,
    pub color_level: ColorLevel,
    pub tick: usize,
    pub active_tab: MainTab,
    flags: UiFlags,
    shutdown_signal: Arc<AtomicBool>,

    control_tx: mpsc::Sender<ControlEvent>,
    control_rx: mpsc::Receiver<ControlEvent>,
}

impl App {
    #[must_use]
    pub fn new(catalog: ProfileCatalog, control: ControlPlane) -> Self {
        let theme_settings = ThemeSettings::resolve();
        let (control_tx, control_rx) = mpsc::channel(100);
        let backend_desc = control.describe();

        Self {
            catalog,
            selected: 0,
            session: None,
            control: Arc::new(control),
            backend_desc,
            telemetry: TelemetryGenerator::new(),
            traffic: TrafficGenerator::new(),
            feed: EventFeed::new(),
            chaos: ChaosState::default(),
            forecast_days: DEFAULT_FORECAST_DAYS,
            zones: None,
            instance: None,
            watchdog: None,
            active_since: None,
            banner: None,
            theme_mode: theme_settings.mode,
            color_level: theme_settings.color_level,
            theme: Theme::for_mode(theme_settings.mode, theme_settings.color_level),
            tick: 0,
            active_tab: MainTab::Overview,
            flags: UiFlags::default(),
            shutdown_signal: Arc::new(AtomicBool::new(false)),
            control_tx,
            control_rx,
        }
    }

    /// Preselect a profile by id. Unknown ids leave the selection unchanged.
    pub fn select_profile(&mut self, id: &str) -> bool {
        match self.catalog.profiles.iter().position(|p| p.id == id) {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }

    /// Run the TUI event loop.
    ///
    /// # Errors
    /// Returns `UiError` when terminal I/O fails.
    pub async fn run(&mut self) -> Result<(), UiError> {
        let mut terminal = setup_terminal()?;

        Self::spawn_shutdown_listener(self.shutdown_signal.clone());
        self.spawn_zone_scan();

        let tick_rate = Duration::from_millis(100);
        let mut cadences = Cadences::new(Instant::now());

        loop {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                break;
            }

            let now = Instant::now();
            self.drain_control_events();
            self.advance_session(now);
            self.advance_generators(&mut cadences, now);
            self.maybe_poll_backend(&mut cadences, now);

            terminal.draw(|f| self.draw(f))?;

            if self.poll_events(tick_rate)? {
                break;
            }

            self.tick = self.tick.wrapping_add(1);

            if self.flags.should_quit {
                break;
            }
        }

        restore_terminal(&mut terminal)?;
        Ok(())
    }

    fn spawn_shutdown_listener(shutdown_signal: Arc<AtomicBool>) {
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            shutdown_signal.store(true, Ordering::SeqCst);
        });
    }

    fn state(&self) -> EnvironmentState {
        self.session
            .as_ref()
            .map_or(EnvironmentState::Offline, Session::state)
    }

    fn is_dashboard_state(&self) -> bool {
        self.state().is_running()
    }

    fn drain_control_events(&mut self) {
        while let Ok(event) = self.control_rx.try_recv() {
            self.handle_control_event(event);
        }
    }

    fn handle_control_event(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::Health(Ok(_)) => {
                if self.banner.as_deref() == Some(BACKEND_UNREACHABLE) {
                    self.banner = None;
                }
            }
            ControlEvent::Health(Err(e)) => {
                warn!("Backend health probe failed: {e}");
                self.banner = Some(BACKEND_UNREACHABLE.to_string());
            }
            ControlEvent::Zones(Ok(zones)) => self.zones = Some(zones),
            ControlEvent::Zones(Err(e)) => warn!("Zone scan failed: {e}"),
            ControlEvent::Resurrected(Ok(response)) => {
                debug!("Resurrection dispatched: {}", response.message);
                self.instance = Some(response);
            }
            ControlEvent::Resurrected(Err(e)) => {
                warn!("Resurrect call failed: {e}");
                self.banner = Some(format!("resurrect failed: {e}"));
            }
            ControlEvent::Stopped(Ok(response)) => debug!("Stop acknowledged: {}", response.message),
            ControlEvent::Stopped(Err(e)) => {
                // Local shutdown proceeds regardless; the backend just was
                // not told.
                warn!("Stop call failed: {e}");
                self.banner = Some(format!("stop not acknowledged: {e}"));
            }
            ControlEvent::Watchdog(Ok(status)) => self.watchdog = Some(status),
            ControlEvent::Watchdog(Err(e)) => warn!("Watchdog poll failed: {e}"),
        }
    }

    fn advance_session(&mut self, now: Instant) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let updates = session.tick(now);
        self.apply_session_updates(&updates, now);
    }

    fn apply_session_updates(&mut self, updates: &[SessionUpdate], now: Instant) {
        for update in updates {
            match update {
                SessionUpdate::Entered(state) => self.on_state_entered(*state, now),
                SessionUpdate::Step(SequencerEvent::StepStarted(i)) => {
                    debug!("Step {i} started");
                }
                SessionUpdate::Step(_) => {}
            }
        }
    }

    fn on_state_entered(&mut self, state: EnvironmentState, now: Instant) {
        debug!("Environment entered {}", state.label());
        match state {
            EnvironmentState::Active => {
                if self.active_since.is_none() {
                    self.active_since = Some(now);
                }
                if self.banner.as_deref() == Some(RECLAIM_BANNER) {
                    self.banner = None;
                }
                self.spawn_watchdog_poll();
            }
            EnvironmentState::Recovering => {
                self.banner = Some(RECLAIM_BANNER.to_string());
            }
            EnvironmentState::Offline => {
                self.instance = None;
                self.watchdog = None;
                self.active_since = None;
                self.chaos = ChaosState::default();
                self.telemetry.clear();
                self.traffic.clear();
                self.feed.clear();
                self.spawn_zone_scan();
            }
            _ => {}
        }
    }

    fn advance_generators(&mut self, cadences: &mut Cadences, now: Instant) {
        if !self.is_dashboard_state() {
            return;
        }

        if now.duration_since(cadences.telemetry) >= TELEMETRY_INTERVAL {
            self.telemetry.tick(self.chaos);
            cadences.telemetry = now;
        }
        if now.duration_since(cadences.traffic) >= TRAFFIC_INTERVAL {
            self.traffic.tick(self.chaos);
            cadences.traffic = now;
        }
        if now.duration_since(cadences.events) >= EVENT_INTERVAL {
            self.feed.tick(self.chaos);
            cadences.events = now;
        }
    }

    fn maybe_poll_backend(&mut self, cadences: &mut Cadences, now: Instant) {
        if now.duration_since(cadences.health) >= HEALTH_POLL_INTERVAL {
            self.spawn_health_probe();
            cadences.health = now;
        }

        if self.is_dashboard_state()
            && now.duration_since(cadences.watchdog) >= WATCHDOG_POLL_INTERVAL
        {
            self.spawn_watchdog_poll();
            cadences.watchdog = now;
        }
    }

    fn spawn_health_probe(&self) {
        let control = self.control.clone();
        let tx = self.control_tx.clone();
        tokio::spawn(async move {
            let result = control.status().await.map_err(|e| e.to_string());
            let _ = tx.send(ControlEvent::Health(result)).await;
        });
    }

    fn spawn_zone_scan(&self) {
        let control = self.control.clone();
        let tx = self.control_tx.clone();
        tokio::spawn(async move {
            let result = control.zones().await.map_err(|e| e.to_string());
            let _ = tx.send(ControlEvent::Zones(result)).await;
        });
    }

    fn spawn_resurrect(&self, profile_id: String) {
        let control = self.control.clone();
        let tx = self.control_tx.clone();
        tokio::spawn(async move {
            let result = control
                .resurrect(&profile_id)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(ControlEvent::Resurrected(result)).await;
        });
    }

    fn spawn_stop(&self) {
        let control = self.control.clone();
        let tx = self.control_tx.clone();
        tokio::spawn(async move {
            let result = control.stop().await.map_err(|e| e.to_string());
            let _ = tx.send(ControlEvent::Stopped(result)).await;
        });
    }

    fn spawn_watchdog_poll(&self) {
        let control = self.control.clone();
        let tx = self.control_tx.clone();
        tokio::spawn(async move {
            let result = control.watchdog().await.map_err(|e| e.to_string());
            let _ = tx.send(ControlEvent::Watchdog(result)).await;
        });
    }

    fn poll_events(&mut self, tick_rate: Duration) -> Result<bool, UiError> {
        if event::poll(tick_rate)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && self.handle_key_event(key)
        {
            return Ok(true);
        }

        Ok(false)
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        if self.flags.show_confirm_stop {
            self.handle_confirm_stop(key);
            return false;
        }

        if self.handle_overlay_toggles(key) {
            return false;
        }

        let is_ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if Self::should_quit(key, is_ctrl) {
            self.flags.should_quit = true;
            return true;
        }

        match self.state() {
            EnvironmentState::Offline => self.handle_selection_keys(key),
            EnvironmentState::Active | EnvironmentState::Recovering => {
                self.handle_dashboard_keys(key);
            }
            _ => {}
        }

        false
    }

    fn handle_confirm_stop(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y' | 'Y') => {
                self.flags.show_confirm_stop = false;
                self.stop_environment();
            }
            KeyCode::Char('n' | 'N') | KeyCode::Esc => {
                self.flags.show_confirm_stop = false;
            }
            _ => {}
        }
    }

    fn handle_overlay_toggles(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('?') => {
                self.flags.show_help = !self.flags.show_help;
                true
            }
            KeyCode::Char('t') => {
                self.theme_mode = self.theme_mode.toggle();
                self.theme = Theme::for_mode(self.theme_mode, self.color_level);
                true
            }
            _ => false,
        }
    }

    fn should_quit(key: KeyEvent, is_ctrl: bool) -> bool {
        (is_ctrl && matches!(key.code, KeyCode::Char('c' | 'q'))) || key.code == KeyCode::Char('q')
    }

    fn handle_selection_keys(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                if self.selected == 0 {
                    self.selected = self.catalog.profiles.len().saturating_sub(1);
                } else {
                    self.selected -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1) % self.catalog.profiles.len().max(1);
            }
            KeyCode::Enter => self.resurrect_selected(),
            _ => {}
        }
    }

    fn handle_dashboard_keys(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('s') => {
                self.flags.show_confirm_stop = true;
            }
            KeyCode::Char('c') => {
                if let Some(session) = self.session.as_mut() {
                    let updates = session.handle(UserAction::SimulateCrash, Instant::now());
                    self.apply_session_updates(&updates, Instant::now());
                }
            }
            KeyCode::Char('1') => self.chaos.toggle(ChaosFlag::CpuSpike),
            KeyCode::Char('2') => self.chaos.toggle(ChaosFlag::NetworkLoss),
            KeyCode::Char('3') => self.chaos.toggle(ChaosFlag::DbOutage),
            KeyCode::Char('+' | '=') => {
                self.forecast_days = (self.forecast_days + 1).min(MAX_FORECAST_DAYS);
            }
            KeyCode::Char('-') => {
                self.forecast_days = self.forecast_days.saturating_sub(1).max(MIN_FORECAST_DAYS);
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.active_tab = self.active_tab.prev();
                } else {
                    self.active_tab = self.active_tab.next();
                }
            }
            KeyCode::BackTab => self.active_tab = self.active_tab.prev(),
            _ => {}
        }
    }

    fn resurrect_selected(&mut self) {
        let Some(profile) = self.catalog.profiles.get(self.selected) else {
            return;
        };

        let mut session = match Session::new(profile.clone()) {
            Ok(session) => session,
            Err(e) => {
                warn!("Cannot start '{}': {e}", profile.id);
                self.banner = Some(format!("cannot start: {e}"));
                return;
            }
        };

        let now = Instant::now();
        let updates = session.handle(UserAction::Initialize, now);
        let profile_id = profile.id.clone();
        self.session = Some(session);
        self.banner = None;
        self.active_tab = MainTab::Overview;
        self.apply_session_updates(&updates, now);
        self.spawn_resurrect(profile_id);
    }

    fn stop_environment(&mut self) {
        // The local lifecycle winds down even if the backend call fails.
        self.spawn_stop();
        if let Some(session) = self.session.as_mut() {
            let now = Instant::now();
            let updates = session.handle(UserAction::Stop, now);
            self.apply_session_updates(&updates, now);
        }
    }

    fn draw(&self, f: &mut ratatui::Frame) {
        let area = f.area();
        self.draw_background(f, area);

        match self.state() {
            EnvironmentState::Offline => self.draw_selection(f, area),
            EnvironmentState::Deploying => {
                self.draw_sequence(f, area, "IMAGE BUILD", "build", None);
            }
            EnvironmentState::BootLogs => {
                self.draw_sequence(f, area, "STARTUP SEQUENCE", "boot", None);
            }
            EnvironmentState::Ready => {
                let countdown = self
                    .session
                    .as_ref()
                    .and_then(|s| s.timer_remaining(Instant::now()));
                self.draw_sequence(f, area, "STARTUP SEQUENCE", "ready", countdown);
            }
            EnvironmentState::Active | EnvironmentState::Recovering => self.draw_hud(f, area),
            EnvironmentState::Sleeping => self.draw_sleeping(f, area),
        }

        self.draw_overlays(f, area);
    }

    fn draw_background(&self, f: &mut ratatui::Frame, area: Rect) {
        let background = Block::default().style(Style::default().bg(self.theme.bg));
        f.render_widget(background, area);
    }

    fn draw_selection(&self, f: &mut ratatui::Frame, area: Rect) {
        let screen = SelectionScreen {
            profiles: &self.catalog.profiles,
            selected: self.selected,
            zones: self.zones.as_ref(),
            backend: &self.backend_desc,
            theme: &self.theme,
            tick: self.tick,
        };
        f.render_widget(screen, area);
    }

    fn draw_sequence(
        &self,
        f: &mut ratatui::Frame,
        area: Rect,
        title: &str,
        phase: &str,
        countdown: Option<Duration>,
    ) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let screen = SequenceScreen {
            title,
            profile_name: &session.profile().name,
            phase,
            steps: session.current_steps(),
            countdown,
            theme: &self.theme,
            tick: self.tick,
        };
        f.render_widget(screen, area);
    }

    fn draw_hud(&self, f: &mut ratatui::Frame, area: Rect) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let now = Instant::now();
        let traffic: Vec<_> = self.traffic.rows().collect();
        let events: Vec<_> = self.feed.entries().collect();
        let cpu_series = self.telemetry.cpu_series();
        let memory_series = self.telemetry.memory_series();

        let screen = HudScreen {
            profile: session.profile(),
            instance: self.instance.as_ref().map(|r| r.instance.as_str()),
            zone: self.instance.as_ref().map(|r| r.zone.as_str()),
            state_label: session.state().label(),
            recovering: session.state() == EnvironmentState::Recovering,
            uptime: self.active_since.map(|t| now.duration_since(t)),
            telemetry_latest: self.telemetry.latest(),
            cpu_series: &cpu_series,
            memory_series: &memory_series,
            traffic: &traffic,
            events: &events,
            watchdog: self.watchdog.as_ref(),
            chaos: self.chaos,
            forecast: forecast(&session.profile().cost, self.forecast_days),
            backend: &self.backend_desc,
            banner: self.banner.as_deref(),
            active_tab: self.active_tab,
            theme: &self.theme,
            tick: self.tick,
        };
        f.render_widget(screen, area);
    }

    fn draw_sleeping(&self, f: &mut ratatui::Frame, area: Rect) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let screen = SleepingScreen {
            profile_name: &session.profile().name,
            theme: &self.theme,
        };
        f.render_widget(screen, area);
    }

    fn draw_overlays(&self, f: &mut ratatui::Frame, area: Rect) {
        if self.flags.show_confirm_stop {
            let dialog = ConfirmDialog {
                title: "Stop Environment",
                message: "Stop the environment and release capacity?\nSession logs will be discarded.",
                theme: &self.theme,
            };
            f.render_widget(dialog, area);
            return;
        }

        if self.flags.show_help {
            let help = HelpOverlay { theme: &self.theme };
            f.render_widget(help, area);
        }
    }
}

const BACKEND_UNREACHABLE: &str = "backend unreachable, readings may be stale";
const RECLAIM_BANNER: &str = "spot capacity reclaimed, re-provisioning";

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, io::Error> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<(), io::Error> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_cycle() {
        assert_eq!(MainTab::Overview.next(), MainTab::Traffic);
        assert_eq!(MainTab::Events.next(), MainTab::Overview);
        assert_eq!(MainTab::Overview.prev(), MainTab::Events);
        assert_eq!(MainTab::Traffic.next().prev(), MainTab::Traffic);
    }

    #[tokio::test]
    async fn test_selection_and_resurrect_enters_deploying() {
        let control = ControlPlane::select(None).await;
        let mut app = App::new(ProfileCatalog::builtin(), control);

        assert_eq!(app.state(), EnvironmentState::Offline);
        app.handle_selection_keys(KeyEvent::from(KeyCode::Down));
        assert_eq!(app.selected, 1);

        app.handle_selection_keys(KeyEvent::from(KeyCode::Enter));
        assert_eq!(app.state(), EnvironmentState::Deploying);
    }

    #[tokio::test]
    async fn test_backend_failures_surface_as_banner_only() {
        let control = ControlPlane::select(None).await;
        let mut app = App::new(ProfileCatalog::builtin(), control);

        app.handle_selection_keys(KeyEvent::from(KeyCode::Enter));
        assert_eq!(app.state(), EnvironmentState::Deploying);

        app.handle_control_event(ControlEvent::Resurrected(Err("connection refused".into())));
        assert_eq!(app.state(), EnvironmentState::Deploying);
        assert!(
            app.banner
                .as_deref()
                .is_some_and(|b| b.starts_with("resurrect failed"))
        );

        app.handle_control_event(ControlEvent::Stopped(Err("request timed out".into())));
        assert_eq!(app.state(), EnvironmentState::Deploying);
        assert!(
            app.banner
                .as_deref()
                .is_some_and(|b| b.starts_with("stop not acknowledged"))
        );
    }

    #[tokio::test]
    async fn test_chaos_keys_toggle_flags() {
        let control = ControlPlane::select(None).await;
        let mut app = App::new(ProfileCatalog::builtin(), control);

        app.handle_dashboard_keys(KeyEvent::from(KeyCode::Char('1')));
        app.handle_dashboard_keys(KeyEvent::from(KeyCode::Char('3')));
        assert!(app.chaos.cpu_spike);
        assert!(!app.chaos.network_loss);
        assert!(app.chaos.db_outage);
    }

    #[tokio::test]
    async fn test_forecast_days_clamped() {
        let control = ControlPlane::select(None).await;
        let mut app = App::new(ProfileCatalog::builtin(), control);

        for _ in 0..100 {
            app.handle_dashboard_keys(KeyEvent::from(KeyCode::Char('+')));
        }
        assert_eq!(app.forecast_days, MAX_FORECAST_DAYS);

        for _ in 0..100 {
            app.handle_dashboard_keys(KeyEvent::from(KeyCode::Char('-')));
        }
        assert_eq!(app.forecast_days, MIN_FORECAST_DAYS);
    }
}
