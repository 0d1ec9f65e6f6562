use crate::app::MainTab;
use crate::colors::Theme;
use lazarus_client::{WatchdogStatus, ZonesResponse};
use lazarus_core::{LogStep, MetricSpec, SimulationProfile, StepStatus};
use lazarus_sim::{
    ChaosFlag, ChaosState, CostForecast, EventSeverity, RequestRow, SystemEvent, TelemetrySample,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Cell, Clear, Gauge, Padding, Paragraph, Row, Sparkline, Table,
        Widget, Wrap,
    },
};
use std::time::Duration;

const SPINNER_FRAMES: [char; 4] = ['◐', '◓', '◑', '◒'];

#[must_use]
pub fn spinner_char(tick: usize) -> char {
    SPINNER_FRAMES[(tick / 3) % SPINNER_FRAMES.len()]
}

#[must_use]
pub fn format_mm_ss(d: Duration) -> String {
    let secs = d.as_secs();
    let mins = secs / 60;
    let secs = secs % 60;
    format!("{mins:02}:{secs:02}")
}

fn format_duration_or_placeholder(duration: Option<Duration>) -> String {
    duration.map_or_else(|| "--:--".to_string(), format_mm_ss)
}

fn format_metric_value(latest: Option<f64>, unit: &str) -> String {
    latest.map_or_else(|| "—".to_string(), |v| format!("{v:.1}{unit}"))
}

fn step_status_mark(theme: &Theme, status: StepStatus, tick: usize) -> (String, Color) {
    match status {
        StepStatus::Pending => ("○".to_string(), theme.dim),
        StepStatus::Running => (spinner_char(tick).to_string(), theme.warning),
        StepStatus::Completed => ("✓".to_string(), theme.success),
    }
}

fn key_hint_style(theme: &Theme) -> Style {
    if theme.is_monochrome() {
        Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
    } else {
        Style::default()
            .fg(theme.on_secondary)
            .bg(theme.secondary)
            .bold()
    }
}

fn render_key_footer(theme: &Theme, keys: &[(&str, &str)], area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Thick)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().bg(theme.surface));

    let inner = block.inner(area);
    block.render(area, buf);

    if inner.height == 0 {
        return;
    }

    let key_style = key_hint_style(theme);
    let mut spans = Vec::new();
    for (key, desc) in keys {
        spans.push(Span::styled(format!(" {key} "), key_style));
        spans.push(Span::styled(
            format!(" {desc} "),
            Style::default().fg(theme.dim),
        ));
        spans.push(Span::raw(" "));
    }

    let content_area = Layout::vertical([Constraint::Length(1)])
        .flex(ratatui::layout::Flex::Center)
        .split(inner)[0];

    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Left)
        .render(content_area, buf);
}

fn render_title_header(
    theme: &Theme,
    left_label: &str,
    right_spans: Vec<Span<'_>>,
    border: Color,
    area: Rect,
    buf: &mut Buffer,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Thick)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(theme.surface));

    let inner = block.inner(area);
    block.render(area, buf);

    let title_style = if theme.is_monochrome() {
        Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
    } else {
        Style::default()
            .bg(theme.primary)
            .fg(theme.on_primary)
            .bold()
    };

    let left = Line::from(vec![
        Span::styled(" LAZARUS ", title_style),
        Span::raw(" "),
        Span::styled(
            left_label.to_uppercase(),
            Style::default().fg(theme.fg).bold(),
        ),
    ]);

    let content_area = Layout::vertical([Constraint::Length(1)])
        .flex(ratatui::layout::Flex::Center)
        .split(inner)[0];

    Paragraph::new(left).render(content_area, buf);
    Paragraph::new(Line::from(right_spans))
        .alignment(Alignment::Right)
        .render(content_area, buf);
}

/// Profile picker shown while the environment is offline.
pub struct SelectionScreen<'a> {
    pub profiles: &'a [SimulationProfile],
    pub selected: usize,
    pub zones: Option<&'a ZonesResponse>,
    pub backend: &'a str,
    pub theme: &'a Theme,
    pub tick: usize,
}

impl SelectionScreen<'_> {
    fn render_profile_list(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .padding(Padding::uniform(1))
            .border_type(BorderType::Plain)
            .border_style(Style::default().fg(self.theme.border))
            .style(Style::default().bg(self.theme.surface))
            .title(" ENVIRONMENTS ")
            .title_style(Style::default().fg(self.theme.secondary));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let mut lines = Vec::new();
        for (i, profile) in self.profiles.iter().enumerate() {
            let is_selected = i == self.selected;
            let marker = if is_selected { "▶ " } else { "  " };
            let name_style = if is_selected {
                Style::default().fg(self.theme.primary).bold()
            } else {
                Style::default().fg(self.theme.fg)
            };

            lines.push(Line::from(vec![
                Span::styled(marker, Style::default().fg(self.theme.primary)),
                Span::styled(
                    format!("{} ", profile.kind.glyph()),
                    Style::default().fg(self.theme.info),
                ),
                Span::styled(profile.name.clone(), name_style),
                Span::raw("  "),
                Span::styled(
                    format!("[{}]", profile.kind.label()),
                    Style::default().fg(self.theme.dim),
                ),
            ]));
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled(
                    profile.description.clone(),
                    Style::default().fg(self.theme.dim),
                ),
            ]));
            lines.push(Line::raw(""));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .style(Style::default().bg(self.theme.surface))
            .render(inner, buf);
    }

    fn render_market_panel(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .padding(Padding::uniform(1))
            .border_type(BorderType::Plain)
            .border_style(Style::default().fg(self.theme.border))
            .style(Style::default().bg(self.theme.surface))
            .title(" SPOT MARKET ")
            .title_style(Style::default().fg(self.theme.secondary));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let Some(zones) = self.zones else {
            Paragraph::new(format!("{} scanning zones…", spinner_char(self.tick)))
                .style(Style::default().fg(self.theme.dim))
                .render(inner, buf);
            return;
        };

        let mut lines = Vec::new();
        for quote in &zones.zones {
            let (mark, style) = if quote.optimal {
                ("★", Style::default().fg(self.theme.success).bold())
            } else {
                (" ", Style::default().fg(self.theme.fg))
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{mark} "), Style::default().fg(self.theme.success)),
                Span::styled(format!("{:<18}", quote.zone), style),
                Span::styled(
                    format!("${:.4}/hr", quote.spot_price),
                    Style::default().fg(self.theme.info),
                ),
            ]));
        }

        if let Some(best) = zones.optimal() {
            lines.push(Line::raw(""));
            lines.push(Line::from(vec![
                Span::styled("OPTIMAL ", Style::default().fg(self.theme.dim)),
                Span::styled(
                    best.zone.clone(),
                    Style::default().fg(self.theme.success).bold(),
                ),
            ]));
        }

        Paragraph::new(lines)
            .style(Style::default().bg(self.theme.surface))
            .render(inner, buf);
    }

    fn render_cost_panel(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .padding(Padding::uniform(1))
            .border_type(BorderType::Plain)
            .border_style(Style::default().fg(self.theme.border))
            .style(Style::default().bg(self.theme.surface))
            .title(" PRICING ")
            .title_style(Style::default().fg(self.theme.secondary));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let Some(profile) = self.profiles.get(self.selected) else {
            return;
        };

        let savings = profile.cost.savings_fraction() * 100.0;
        let lines = vec![
            Line::from(vec![
                Span::styled("ON-DEMAND ", Style::default().fg(self.theme.dim)),
                Span::styled(
                    format!("${:.3}/hr", profile.cost.on_demand_rate),
                    Style::default().fg(self.theme.fg),
                ),
            ]),
            Line::from(vec![
                Span::styled("SPOT      ", Style::default().fg(self.theme.dim)),
                Span::styled(
                    format!("${:.3}/hr", profile.cost.spot_rate),
                    Style::default().fg(self.theme.success).bold(),
                ),
            ]),
            Line::from(vec![
                Span::styled("SAVINGS   ", Style::default().fg(self.theme.dim)),
                Span::styled(
                    format!("{savings:.0}%"),
                    Style::default().fg(self.theme.primary).bold(),
                ),
            ]),
        ];

        Paragraph::new(lines)
            .style(Style::default().bg(self.theme.surface))
            .render(inner, buf);
    }
}

impl Widget for SelectionScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let chunks = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

        let right = vec![
            Span::styled("OFFLINE", Style::default().fg(self.theme.dim).bold()),
            Span::styled(" | ", Style::default().fg(self.theme.dim)),
            Span::styled(
                format!("backend: {} ", self.backend),
                Style::default().fg(self.theme.info),
            ),
        ];
        render_title_header(
            self.theme,
            "spot resurrection console",
            right,
            self.theme.primary,
            chunks[0],
            buf,
        );

        let columns = Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);
        self.render_profile_list(columns[0], buf);

        let right_rows =
            Layout::vertical([Constraint::Min(0), Constraint::Length(5)]).split(columns[1]);
        self.render_market_panel(right_rows[0], buf);
        self.render_cost_panel(right_rows[1], buf);

        render_key_footer(
            self.theme,
            &[
                ("↑/↓", "Select"),
                ("ENTER", "Resurrect"),
                ("?", "Help"),
                ("T", "Theme"),
                ("Q", "Quit"),
            ],
            chunks[2],
            buf,
        );
    }
}

/// Scrolling step list shown during the build and boot phases. The same
/// widget renders both; only the title and steps differ.
pub struct SequenceScreen<'a> {
    pub title: &'a str,
    pub profile_name: &'a str,
    pub phase: &'a str,
    pub steps: &'a [LogStep],
    pub countdown: Option<Duration>,
    pub theme: &'a Theme,
    pub tick: usize,
}

impl SequenceScreen<'_> {
    fn render_steps(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .padding(Padding::uniform(1))
            .border_type(BorderType::Plain)
            .border_style(Style::default().fg(self.theme.border))
            .style(Style::default().bg(self.theme.surface))
            .title(format!(" {} ", self.title))
            .title_style(Style::default().fg(self.theme.secondary));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let mut lines = Vec::new();
        for step in self.steps {
            let (mark, color) = step_status_mark(self.theme, step.status, self.tick);
            let text_style = match step.status {
                StepStatus::Pending => Style::default().fg(self.theme.dim),
                StepStatus::Running => Style::default().fg(self.theme.fg).bold(),
                StepStatus::Completed => Style::default().fg(self.theme.fg),
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{mark} "), Style::default().fg(color)),
                Span::styled(step.message.clone(), text_style),
            ]));
        }

        if let Some(remaining) = self.countdown {
            lines.push(Line::raw(""));
            lines.push(Line::from(vec![
                Span::styled("✓ ", Style::default().fg(self.theme.success)),
                Span::styled(
                    "Environment ready",
                    Style::default().fg(self.theme.success).bold(),
                ),
                Span::styled(
                    format!("  going active in {}s", remaining.as_secs() + 1),
                    Style::default().fg(self.theme.dim),
                ),
            ]));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .style(Style::default().bg(self.theme.surface))
            .render(inner, buf);
    }
}

impl Widget for SequenceScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let chunks = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

        let spinner = spinner_char(self.tick);
        let done = self.steps.iter().filter(|s| s.status == StepStatus::Completed).count();
        let right = vec![
            Span::styled(
                format!(" {spinner} "),
                Style::default().fg(self.theme.secondary),
            ),
            Span::styled(
                self.phase.to_uppercase(),
                Style::default().fg(self.theme.warning).bold(),
            ),
            Span::styled(" | ", Style::default().fg(self.theme.dim)),
            Span::styled(
                format!("{done}/{} ", self.steps.len()),
                Style::default().fg(self.theme.primary).bold(),
            ),
        ];
        render_title_header(
            self.theme,
            self.profile_name,
            right,
            self.theme.primary,
            chunks[0],
            buf,
        );

        self.render_steps(chunks[1], buf);

        render_key_footer(
            self.theme,
            &[("?", "Help"), ("T", "Theme"), ("Q", "Quit")],
            chunks[2],
            buf,
        );
    }
}

/// The main dashboard shown while the environment is active or recovering.
pub struct HudScreen<'a> {
    pub profile: &'a SimulationProfile,
    pub instance: Option<&'a str>,
    pub zone: Option<&'a str>,
    pub state_label: &'a str,
    pub recovering: bool,
    pub uptime: Option<Duration>,
    pub telemetry_latest: Option<TelemetrySample>,
    pub cpu_series: &'a [u64],
    pub memory_series: &'a [u64],
    pub traffic: &'a [&'a RequestRow],
    pub events: &'a [&'a SystemEvent],
    pub watchdog: Option<&'a WatchdogStatus>,
    pub chaos: ChaosState,
    pub forecast: CostForecast,
    pub backend: &'a str,
    pub banner: Option<&'a str>,
    pub active_tab: MainTab,
    pub theme: &'a Theme,
    pub tick: usize,
}

impl HudScreen<'_> {
    fn accent(&self) -> Color {
        if self.recovering {
            self.theme.error
        } else {
            self.theme.primary
        }
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let uptime = format_duration_or_placeholder(self.uptime);
        let spinner = spinner_char(self.tick);
        let state_color = if self.recovering {
            self.theme.error
        } else {
            self.theme.success
        };

        let right = vec![
            Span::styled(
                format!(" {spinner} "),
                Style::default().fg(self.theme.secondary),
            ),
            Span::styled(
                self.state_label.to_uppercase(),
                Style::default().fg(state_color).bold(),
            ),
            Span::styled(" | ", Style::default().fg(self.theme.dim)),
            Span::styled("UP ", Style::default().fg(self.theme.dim)),
            Span::styled(uptime, Style::default().fg(self.theme.primary).bold()),
            Span::styled(" | ", Style::default().fg(self.theme.dim)),
            Span::styled(
                self.zone.unwrap_or("—").to_string(),
                Style::default().fg(self.theme.info),
            ),
            Span::styled(" | ", Style::default().fg(self.theme.dim)),
            Span::styled(
                format!("{} ", self.backend),
                Style::default().fg(self.theme.dim),
            ),
        ];

        render_title_header(
            self.theme,
            self.instance.unwrap_or(&self.profile.name),
            right,
            self.accent(),
            area,
            buf,
        );
    }

    fn render_banner(&self, area: Rect, buf: &mut Buffer) {
        let Some(message) = self.banner else {
            return;
        };
        Paragraph::new(Line::from(vec![
            Span::styled("⚠ ", Style::default().fg(self.theme.warning)),
            Span::styled(message, Style::default().fg(self.theme.warning)),
        ]))
        .style(Style::default().bg(self.theme.surface))
        .render(area, buf);
    }

    fn render_tab_header(&self, area: Rect, buf: &mut Buffer) {
        let tabs = [
            (MainTab::Overview, " OVERVIEW "),
            (MainTab::Traffic, " TRAFFIC "),
            (MainTab::Events, " EVENTS "),
        ];

        let mut spans = Vec::new();
        for (tab, label) in tabs {
            let is_active = self.active_tab == tab;
            let style = if is_active {
                if self.theme.is_monochrome() {
                    Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
                } else {
                    Style::default()
                        .bg(self.theme.primary)
                        .fg(self.theme.on_primary)
                        .bold()
                }
            } else {
                Style::default().fg(self.theme.dim)
            };

            let prefix = if is_active { "▶ " } else { "  " };
            let suffix = if is_active { " ◀" } else { "  " };

            if !spans.is_empty() {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(format!("{prefix}{label}{suffix}"), style));
        }

        let block = Block::default()
            .style(Style::default().bg(self.theme.surface))
            .padding(Padding::new(1, 1, 0, 0));

        let inner = block.inner(area);
        block.render(area, buf);

        let content_area = Layout::vertical([Constraint::Length(1)])
            .flex(ratatui::layout::Flex::Center)
            .split(inner)[0];

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(content_area, buf);
    }

    fn render_overview(&self, area: Rect, buf: &mut Buffer) {
        let columns = Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area);

        let metric_rows =
            Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(columns[0]);
        let metric = |id: &str| self.profile.metrics.iter().find(|m| m.id == id);
        self.render_metric(
            metric("cpu"),
            "CPU",
            self.telemetry_latest.map(|s| s.cpu),
            self.cpu_series,
            metric_rows[0],
            buf,
        );
        self.render_metric(
            metric("memory"),
            "MEMORY",
            self.telemetry_latest.map(|s| s.memory),
            self.memory_series,
            metric_rows[1],
            buf,
        );

        let panel_rows = Layout::vertical([
            Constraint::Length(7),
            Constraint::Length(6),
            Constraint::Min(0),
        ])
        .split(columns[1]);
        self.render_watchdog(panel_rows[0], buf);
        self.render_forecast(panel_rows[1], buf);
        self.render_chaos(panel_rows[2], buf);
    }

    fn render_metric(
        &self,
        spec: Option<&MetricSpec>,
        fallback_label: &str,
        latest: Option<f64>,
        series: &[u64],
        area: Rect,
        buf: &mut Buffer,
    ) {
        let label = spec.map_or(fallback_label, |m| m.label.as_str());
        let unit = spec.map_or("%", |m| m.unit.as_str());
        let value = format_metric_value(latest, unit);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Plain)
            .border_style(Style::default().fg(self.theme.border))
            .style(Style::default().bg(self.theme.surface))
            .title(format!(" {} {value} ", label.to_uppercase()))
            .title_style(Style::default().fg(self.theme.secondary));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let rows = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).split(inner);

        let spark_color = if self.recovering {
            self.theme.error
        } else {
            self.theme.primary
        };
        Sparkline::default()
            .data(series)
            .max(100)
            .style(Style::default().fg(spark_color).bg(self.theme.surface))
            .render(rows[0], buf);

        let ratio = (latest.unwrap_or(0.0) / 100.0).clamp(0.0, 1.0);
        Gauge::default()
            .ratio(ratio)
            .label(value)
            .gauge_style(Style::default().fg(spark_color).bg(self.theme.highlight))
            .render(rows[1], buf);
    }

    fn render_watchdog(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .padding(Padding::new(1, 1, 0, 0))
            .border_type(BorderType::Plain)
            .border_style(Style::default().fg(self.theme.border))
            .style(Style::default().bg(self.theme.surface))
            .title(" IDLE WATCHDOG ")
            .title_style(Style::default().fg(self.theme.secondary));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let Some(watchdog) = self.watchdog else {
            Paragraph::new("no readings yet")
                .style(Style::default().fg(self.theme.dim))
                .render(inner, buf);
            return;
        };

        let verdict = if watchdog.is_idle() {
            Span::styled("IDLE", Style::default().fg(self.theme.warning).bold())
        } else {
            Span::styled("HELD AWAKE", Style::default().fg(self.theme.success).bold())
        };

        let lines = vec![
            Line::from(vec![
                Span::styled("USERS   ", Style::default().fg(self.theme.dim)),
                Span::styled(
                    watchdog.active_users.to_string(),
                    Style::default().fg(self.theme.fg),
                ),
                Span::styled("   TUNNELS ", Style::default().fg(self.theme.dim)),
                Span::styled(
                    watchdog.ssh_tunnels.to_string(),
                    Style::default().fg(self.theme.fg),
                ),
            ]),
            Line::from(vec![
                Span::styled("CPU     ", Style::default().fg(self.theme.dim)),
                Span::styled(
                    format!("{:.1}%", watchdog.cpu_load),
                    Style::default().fg(self.theme.fg),
                ),
            ]),
            Line::from(vec![
                Span::styled("RECLAIM ", Style::default().fg(self.theme.dim)),
                Span::styled(
                    format!("{}s", watchdog.idle_countdown_secs),
                    Style::default().fg(self.theme.info),
                ),
                Span::raw("   "),
                verdict,
            ]),
        ];

        Paragraph::new(lines)
            .style(Style::default().bg(self.theme.surface))
            .render(inner, buf);
    }

    fn render_forecast(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .padding(Padding::new(1, 1, 0, 0))
            .border_type(BorderType::Plain)
            .border_style(Style::default().fg(self.theme.border))
            .style(Style::default().bg(self.theme.surface))
            .title(format!(" COST FORECAST {} ", self.forecast.label()))
            .title_style(Style::default().fg(self.theme.secondary));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let lines = vec![
            Line::from(vec![
                Span::styled("ON-DEMAND ", Style::default().fg(self.theme.dim)),
                Span::styled(
                    format!("${:.2}", self.forecast.on_demand_total),
                    Style::default().fg(self.theme.fg),
                ),
            ]),
            Line::from(vec![
                Span::styled("SPOT      ", Style::default().fg(self.theme.dim)),
                Span::styled(
                    format!("${:.2}", self.forecast.spot_total),
                    Style::default().fg(self.theme.success).bold(),
                ),
            ]),
            Line::from(vec![
                Span::styled("SAVED     ", Style::default().fg(self.theme.dim)),
                Span::styled(
                    format!("${:.2}", self.forecast.savings()),
                    Style::default().fg(self.theme.primary).bold(),
                ),
                Span::styled("   +/- days", Style::default().fg(self.theme.dim)),
            ]),
        ];

        Paragraph::new(lines)
            .style(Style::default().bg(self.theme.surface))
            .render(inner, buf);
    }

    fn render_chaos(&self, area: Rect, buf: &mut Buffer) {
        let border = if self.chaos.any_active() {
            self.theme.error
        } else {
            self.theme.border
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .padding(Padding::new(1, 1, 0, 0))
            .border_type(BorderType::Plain)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(self.theme.surface))
            .title(" CHAOS ")
            .title_style(Style::default().fg(self.theme.secondary));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let flags = [
            ("1", ChaosFlag::CpuSpike),
            ("2", ChaosFlag::NetworkLoss),
            ("3", ChaosFlag::DbOutage),
        ];

        let key_style = key_hint_style(self.theme);
        let mut lines = Vec::new();
        for (key, flag) in flags {
            let (state, style) = if self.chaos.is_set(flag) {
                ("ON ", Style::default().fg(self.theme.error).bold())
            } else {
                ("off", Style::default().fg(self.theme.dim))
            };
            lines.push(Line::from(vec![
                Span::styled(format!(" {key} "), key_style),
                Span::raw(" "),
                Span::styled(
                    format!("{:<14}", flag.label()),
                    Style::default().fg(self.theme.fg),
                ),
                Span::styled(state, style),
            ]));
        }
        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::styled(" C ", key_style),
            Span::styled(" Simulate spot reclaim", Style::default().fg(self.theme.dim)),
        ]));

        Paragraph::new(lines)
            .style(Style::default().bg(self.theme.surface))
            .render(inner, buf);
    }

    fn render_traffic(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .padding(Padding::uniform(1))
            .border_type(BorderType::Plain)
            .border_style(Style::default().fg(self.theme.border))
            .style(Style::default().bg(self.theme.surface))
            .title(" LIVE TRAFFIC ")
            .title_style(Style::default().fg(self.theme.secondary));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        if self.traffic.is_empty() {
            Paragraph::new("No requests yet.")
                .alignment(Alignment::Center)
                .style(Style::default().fg(self.theme.dim))
                .render(inner, buf);
            return;
        }

        let header = Row::new(vec![
            Cell::from("METHOD"),
            Cell::from("PATH"),
            Cell::from("STATUS"),
            Cell::from("LATENCY"),
        ])
        .style(Style::default().fg(self.theme.secondary).bold());

        let rows: Vec<Row> = self
            .traffic
            .iter()
            .map(|req| {
                let status_style = if req.is_error() {
                    Style::default().fg(self.theme.error).bold()
                } else if req.status >= 400 {
                    Style::default().fg(self.theme.warning)
                } else {
                    Style::default().fg(self.theme.success)
                };
                Row::new(vec![
                    Cell::from(req.method).style(Style::default().fg(self.theme.info)),
                    Cell::from(req.path).style(Style::default().fg(self.theme.fg)),
                    Cell::from(req.status.to_string()).style(status_style),
                    Cell::from(format!("{}ms", req.latency_ms))
                        .style(Style::default().fg(self.theme.dim)),
                ])
            })
            .collect();

        Table::new(
            rows,
            [
                Constraint::Length(7),
                Constraint::Min(20),
                Constraint::Length(7),
                Constraint::Length(9),
            ],
        )
        .header(header)
        .style(Style::default().bg(self.theme.surface))
        .render(inner, buf);
    }

    fn render_events(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .padding(Padding::uniform(1))
            .border_type(BorderType::Plain)
            .border_style(Style::default().fg(self.theme.border))
            .style(Style::default().bg(self.theme.surface))
            .title(" SYSTEM EVENTS ")
            .title_style(Style::default().fg(self.theme.secondary));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        if self.events.is_empty() {
            Paragraph::new("No events yet.")
                .alignment(Alignment::Center)
                .style(Style::default().fg(self.theme.dim))
                .render(inner, buf);
            return;
        }

        let lines: Vec<Line> = self
            .events
            .iter()
            .take(inner.height as usize)
            .map(|event| {
                let (icon, color) = match event.severity {
                    EventSeverity::Info => ("·", self.theme.dim),
                    EventSeverity::Warning => ("⚠", self.theme.warning),
                };
                Line::from(vec![
                    Span::styled(format!("{icon} "), Style::default().fg(color)),
                    Span::styled(event.message, Style::default().fg(self.theme.fg)),
                ])
            })
            .collect();

        Paragraph::new(lines)
            .style(Style::default().bg(self.theme.surface))
            .render(inner, buf);
    }
}

impl Widget for HudScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let banner_height = u16::from(self.banner.is_some());
        let chunks = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(banner_height),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

        self.render_header(chunks[0], buf);
        self.render_banner(chunks[1], buf);
        self.render_tab_header(chunks[2], buf);

        let content_block = Block::default()
            .style(Style::default().bg(self.theme.surface))
            .padding(Padding::new(1, 1, 0, 0));
        let content_area = content_block.inner(chunks[3]);
        content_block.render(chunks[3], buf);

        if content_area.height > 0 && content_area.width > 0 {
            match self.active_tab {
                MainTab::Overview => self.render_overview(content_area, buf),
                MainTab::Traffic => self.render_traffic(content_area, buf),
                MainTab::Events => self.render_events(content_area, buf),
            }
        }

        render_key_footer(
            self.theme,
            &[
                ("TAB", "View"),
                ("S", "Stop"),
                ("C", "Reclaim"),
                ("1/2/3", "Chaos"),
                ("?", "Help"),
                ("Q", "Quit"),
            ],
            chunks[4],
            buf,
        );
    }
}

/// Brief interstitial while the environment drains and powers off.
pub struct SleepingScreen<'a> {
    pub profile_name: &'a str,
    pub theme: &'a Theme,
}

impl Widget for SleepingScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .padding(Padding::uniform(1))
            .border_style(Style::default().fg(self.theme.border))
            .style(Style::default().bg(self.theme.surface));

        let inner = block.inner(area);
        block.render(area, buf);

        let start_y = inner.y + inner.height.saturating_sub(3) / 2;

        Paragraph::new("Draining connections…")
            .style(Style::default().fg(self.theme.warning).bold())
            .alignment(Alignment::Center)
            .render(
                Rect {
                    x: inner.x,
                    y: start_y,
                    width: inner.width,
                    height: 1,
                },
                buf,
            );

        Paragraph::new(Line::from(vec![
            Span::styled("· ", Style::default().fg(self.theme.warning)),
            Span::styled(
                format!("Releasing {}", self.profile_name),
                Style::default().fg(self.theme.secondary),
            ),
        ]))
        .alignment(Alignment::Center)
        .render(
            Rect {
                x: inner.x,
                y: start_y + 2,
                width: inner.width,
                height: 1,
            },
            buf,
        );
    }
}

pub struct ConfirmDialog<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub theme: &'a Theme,
}

impl Widget for ConfirmDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dialog_width = 50u16;
        let dialog_height = 9u16;

        let x = area.x + (area.width.saturating_sub(dialog_width)) / 2;
        let y = area.y + (area.height.saturating_sub(dialog_height)) / 2;

        let dialog_area = Rect {
            x,
            y,
            width: dialog_width.min(area.width),
            height: dialog_height.min(area.height),
        };

        Clear.render(dialog_area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .padding(Padding::uniform(1))
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(self.theme.warning))
            .style(Style::default().bg(self.theme.surface))
            .title(format!(" {title} ", title = self.title))
            .title_style(Style::default().fg(self.theme.primary).bold());

        let inner = block.inner(dialog_area);
        block.render(dialog_area, buf);

        let chunks = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

        for (i, line) in self.message.lines().enumerate() {
            if i < 2 {
                Paragraph::new(line)
                    .style(Style::default().fg(self.theme.primary))
                    .alignment(Alignment::Center)
                    .render(chunks[i + 1], buf);
            }
        }

        let buttons = Line::from(vec![
            Span::styled("[Y]", Style::default().fg(self.theme.success).bold()),
            Span::styled("es", Style::default().fg(self.theme.primary)),
            Span::raw("          "),
            Span::styled("[N]", Style::default().fg(self.theme.error).bold()),
            Span::styled("o", Style::default().fg(self.theme.primary)),
        ]);
        Paragraph::new(buttons)
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
    }
}

pub struct HelpOverlay<'a> {
    pub theme: &'a Theme,
}

impl Widget for HelpOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dialog_width = 64u16;
        let dialog_height = 15u16;

        let x = area.x + (area.width.saturating_sub(dialog_width)) / 2;
        let y = area.y + (area.height.saturating_sub(dialog_height)) / 2;

        let dialog_area = Rect {
            x,
            y,
            width: dialog_width.min(area.width),
            height: dialog_height.min(area.height),
        };

        Clear.render(dialog_area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .padding(Padding::uniform(1))
            .border_type(BorderType::Plain)
            .border_style(Style::default().fg(self.theme.border))
            .style(Style::default().bg(self.theme.surface))
            .title(" HELP ")
            .title_style(Style::default().fg(self.theme.primary).bold());

        let inner = block.inner(dialog_area);
        block.render(dialog_area, buf);

        let key_style = key_hint_style(self.theme);

        let lines = vec![
            Line::from(vec![
                Span::styled(" ENTER ", key_style),
                Span::raw(" Resurrect selected environment"),
            ]),
            Line::from(vec![
                Span::styled(" S ", key_style),
                Span::raw(" Stop the running environment"),
            ]),
            Line::from(vec![
                Span::styled(" C ", key_style),
                Span::raw(" Simulate a spot reclaim"),
            ]),
            Line::from(vec![
                Span::styled(" 1/2/3 ", key_style),
                Span::raw(" Toggle chaos: CPU / network / database"),
            ]),
            Line::from(vec![
                Span::styled(" +/- ", key_style),
                Span::raw(" Widen or narrow the cost forecast"),
            ]),
            Line::from(vec![
                Span::styled(" TAB ", key_style),
                Span::raw(" Switch view"),
            ]),
            Line::from(vec![
                Span::styled(" T ", key_style),
                Span::raw(" Toggle theme"),
            ]),
            Line::from(vec![Span::styled(" Q ", key_style), Span::raw(" Quit")]),
            Line::from(vec![
                Span::styled(" ? ", key_style),
                Span::raw(" Close help"),
            ]),
        ];

        Paragraph::new(lines)
            .alignment(Alignment::Left)
            .style(Style::default().fg(self.theme.fg).bg(self.theme.surface))
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_cycles() {
        let frames: Vec<char> = (0..12).map(spinner_char).collect();
        assert!(frames.contains(&'◐'));
        assert!(frames.contains(&'◒'));
    }

    #[test]
    fn test_format_mm_ss() {
        assert_eq!(format_mm_ss(Duration::from_secs(0)), "00:00");
        assert_eq!(format_mm_ss(Duration::from_secs(75)), "01:15");
        assert_eq!(format_mm_ss(Duration::from_secs(600)), "10:00");
    }

    #[test]
    fn test_metric_value_uses_profile_unit() {
        assert_eq!(format_metric_value(Some(42.0), "%"), "42.0%");
        assert_eq!(format_metric_value(Some(2.34), "GiB"), "2.3GiB");
        assert_eq!(format_metric_value(None, "%"), "—");
    }

    #[test]
    fn test_metric_panel_title_comes_from_profile() {
        let catalog = lazarus_core::ProfileCatalog::builtin();
        let profile = &catalog.profiles[0];
        let theme = Theme::default();
        let screen = HudScreen {
            profile,
            instance: None,
            zone: None,
            state_label: "ACTIVE",
            recovering: false,
            uptime: None,
            telemetry_latest: None,
            cpu_series: &[42],
            memory_series: &[60],
            traffic: &[],
            events: &[],
            watchdog: None,
            chaos: ChaosState::default(),
            forecast: lazarus_sim::forecast(&profile.cost, 7),
            backend: "simulation",
            banner: None,
            active_tab: MainTab::Overview,
            theme: &theme,
            tick: 0,
        };

        let area = Rect::new(0, 0, 40, 8);
        let mut buf = Buffer::empty(area);
        screen.render_metric(
            profile.metrics.iter().find(|m| m.id == "cpu"),
            "CPU",
            Some(42.0),
            &[42],
            area,
            &mut buf,
        );

        let rendered: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(rendered.contains("CPU USAGE 42.0%"), "got: {rendered}");
    }
}
