use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use fourthdown_client::RecommendationClient;
use fourthdown_dashboard::{Dashboard, DashboardState};
use fourthdown_types::{
    config::{ApplyPolicy, DashboardConfig},
    events::{DashboardEvent, EventKind},
    form::{FormField, RawForm},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};

const ACTIVITY_ROWS: u16 = 8;

/// Editable copy of the form; one raw string per field.
#[derive(Debug, Clone)]
struct FormState {
    values: Vec<String>,
    selected: usize,
}

impl FormState {
    fn from_raw(raw: &RawForm) -> Self {
        Self {
            values: FormField::ALL
                .iter()
                .map(|field| raw.field(*field).to_string())
                .collect(),
            selected: 0,
        }
    }

    /// Fresh snapshot taken at submit time.
    fn snapshot(&self) -> RawForm {
        FormField::ALL
            .iter()
            .zip(self.values.iter())
            .map(|(field, value)| (field.name(), value.clone()))
            .collect()
    }

    fn selected_field(&self) -> FormField {
        FormField::ALL[self.selected]
    }

    fn select_next(&mut self) {
        self.selected = (self.selected + 1) % FormField::ALL.len();
    }

    fn select_prev(&mut self) {
        self.selected = (self.selected + FormField::ALL.len() - 1) % FormField::ALL.len();
    }

    fn push_char(&mut self, c: char) {
        if self.selected_field() == FormField::Home {
            return;
        }
        self.values[self.selected].push(c);
    }

    fn backspace(&mut self) {
        if self.selected_field() == FormField::Home {
            return;
        }
        self.values[self.selected].pop();
    }

    fn toggle_home(&mut self) {
        let idx = FormField::ALL
            .iter()
            .position(|field| *field == FormField::Home)
            .unwrap_or(FormField::ALL.len() - 1);
        let next = if self.values[idx] == "true" { "false" } else { "true" };
        self.values[idx] = next.to_string();
    }
}

enum Action {
    None,
    Submit,
    Quit,
}

fn handle_key(form: &mut FormState, key: KeyEvent) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Enter => Action::Submit,
        KeyCode::Down | KeyCode::Tab => {
            form.select_next();
            Action::None
        }
        KeyCode::Up | KeyCode::BackTab => {
            form.select_prev();
            Action::None
        }
        KeyCode::Char(' ') if form.selected_field() == FormField::Home => {
            form.toggle_home();
            Action::None
        }
        KeyCode::Backspace => {
            form.backspace();
            Action::None
        }
        KeyCode::Char(c) if !c.is_whitespace() => {
            form.push_char(c);
            Action::None
        }
        _ => Action::None,
    }
}

pub fn run<C>(dashboard: Dashboard<C>, config: &DashboardConfig) -> Result<()>
where
    C: RecommendationClient + 'static,
{
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let res = run_loop(&mut terminal, dashboard, config);

    terminal.show_cursor()?;
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    res
}

fn run_loop<B, C>(
    terminal: &mut Terminal<B>,
    mut dashboard: Dashboard<C>,
    config: &DashboardConfig,
) -> Result<()>
where
    B: ratatui::backend::Backend,
    C: RecommendationClient + 'static,
{
    let mut form = FormState::from_raw(&RawForm::with_defaults());
    let tick = Duration::from_millis(config.ui.tick_rate_ms);

    loop {
        dashboard.poll_completions();

        terminal.draw(|f| draw(f, &form, &dashboard, &config.api.base_url))?;

        if event::poll(tick)? {
            if let CEvent::Key(key) = event::read()? {
                match handle_key(&mut form, key) {
                    Action::Quit => break,
                    Action::Submit if dashboard.state().can_submit() => {
                        dashboard.submit(&form.snapshot());
                    }
                    Action::Submit | Action::None => {}
                }
            }
        }
    }

    Ok(())
}

fn draw<C>(f: &mut Frame, form: &FormState, dashboard: &Dashboard<C>, base_url: &str)
where
    C: RecommendationClient + 'static,
{
    let state = dashboard.state();
    let error_rows = if state.last_error.is_some() { 3 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(error_rows),
                Constraint::Min(0),
                Constraint::Length(ACTIVITY_ROWS),
            ]
            .as_ref(),
        )
        .split(f.size());

    f.render_widget(header(state, dashboard.policy(), base_url), chunks[0]);

    if let Some(message) = state.last_error.as_deref() {
        let banner = Paragraph::new(message.to_string())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Error"));
        f.render_widget(banner, chunks[1]);
    }

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)].as_ref())
        .split(chunks[2]);
    f.render_widget(form_widget(form, state.can_submit()), body[0]);
    f.render_widget(result_widget(state), body[1]);

    let items: Vec<ListItem> = dashboard
        .activity()
        .rev()
        .map(|event| ListItem::new(format_event(event)))
        .collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Activity"));
    f.render_widget(list, chunks[3]);
}

fn header<'a>(state: &DashboardState, policy: ApplyPolicy, base_url: &'a str) -> Paragraph<'a> {
    let policy = match policy {
        ApplyPolicy::LastResolved => "last resolved",
        ApplyPolicy::LatestSubmission => "latest submission",
    };
    let status = if state.in_flight {
        Span::styled("Loading…", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("Ready", Style::default().fg(Color::Green))
    };
    Paragraph::new(Line::from(vec![
        Span::styled(
            "Fourth Down",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        status,
        Span::raw("  "),
        Span::styled("service:", Style::default().fg(Color::Magenta)),
        Span::raw(" "),
        Span::raw(base_url),
        Span::raw("  "),
        Span::styled("apply:", Style::default().fg(Color::Magenta)),
        Span::raw(" "),
        Span::raw(policy),
        Span::raw("  "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" submit  "),
        Span::styled("q/Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" quit"),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Summary"))
}

fn form_widget(form: &FormState, can_submit: bool) -> List<'static> {
    let items: Vec<ListItem> = FormField::ALL
        .iter()
        .zip(form.values.iter())
        .enumerate()
        .map(|(idx, (field, value))| {
            let hint = field
                .range_hint()
                .map(|(lo, hi)| format!(" ({lo}-{hi})"))
                .unwrap_or_default();
            let style = if idx == form.selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}{hint}: ", field.label()), style),
                Span::raw(value.clone()),
            ]))
        })
        .collect();

    let title = if can_submit {
        "Situation"
    } else {
        "Situation (waiting for response)"
    };
    List::new(items).block(Block::default().borders(Borders::ALL).title(title))
}

fn result_widget(state: &DashboardState) -> Paragraph<'static> {
    let block = Block::default().borders(Borders::ALL).title("Recommendation");
    let Some(rendered) = state.rendered() else {
        return Paragraph::new("Submit a situation to get a recommendation.").block(block);
    };

    let mut lines = vec![
        Line::from(Span::styled(
            rendered.action,
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(rendered.delta_wp),
        Line::from(rendered.delta_ep),
        Line::from(""),
    ];
    if !rendered.alternatives.is_empty() {
        lines.push(Line::from(Span::styled(
            "Alternatives",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )));
        lines.extend(rendered.alternatives.into_iter().map(Line::from));
        lines.push(Line::from(""));
    }
    if !rendered.rationale.is_empty() {
        lines.push(Line::from(Span::styled(
            "Rationale",
            Style::default().add_modifier(Modifier::UNDERLINED),
        )));
        lines.extend(
            rendered
                .rationale
                .into_iter()
                .enumerate()
                .map(|(idx, text)| Line::from(format!("{}. {text}", idx + 1))),
        );
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        rendered.version,
        Style::default().fg(Color::DarkGray),
    )));

    Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(block)
}

fn format_event(event: &DashboardEvent) -> String {
    let timestamp = event.timestamp.format("%H:%M:%S");
    let kind = match event.kind {
        EventKind::Submitted => "submitted",
        EventKind::Resolved => "resolved",
        EventKind::Failed => "failed",
        EventKind::Discarded => "discarded",
        EventKind::Anomaly => "anomaly",
    };
    format!("[{timestamp}] #{} {kind}: {}", event.ticket, event.detail)
}
