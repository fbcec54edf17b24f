use super::utils::format_clock;
use super::*;
use ratatui::widgets::Gauge;
use tomata_client::domain::Phase;

pub fn phase_color(phase: Phase) -> Color {
    match phase {
        Phase::Work => Color::Red,
        Phase::ShortBreak => Color::Green,
        Phase::LongBreak => Color::Blue,
    }
}

pub fn render_timer_view(frame: &mut Frame, app: &mut App, body: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // Phase tabs
            Constraint::Length(5), // Countdown
            Constraint::Length(3), // Sequence progress
            Constraint::Length(3), // Status
            Constraint::Min(0),
            Constraint::Length(3), // Controls
        ])
        .split(body);

    render_phase_tabs(frame, chunks[0], app);
    render_countdown(frame, chunks[1], app);
    render_sequence(frame, chunks[2], app);
    render_status(frame, chunks[3], app);
    render_controls(frame, chunks[5]);
}

fn render_phase_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let current = app.phase;
    let mut spans = Vec::new();
    for (key, phase) in [
        ("1", Phase::Work),
        ("2", Phase::ShortBreak),
        ("3", Phase::LongBreak),
    ] {
        let style = if phase == current {
            Style::default()
                .fg(phase_color(phase))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" [{}] {} ", key, phase.label()), style));
        spans.push(Span::raw(" "));
    }

    let tabs = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Phase "));
    frame.render_widget(tabs, area);
}

fn render_countdown(frame: &mut Frame, area: Rect, app: &App) {
    let view = app.client_view();

    let border_style = if view.is_running {
        Style::default().fg(phase_color(view.phase))
    } else {
        Style::default()
    };

    let state_line = if view.is_running {
        if view.synced {
            Line::from(Span::styled("⏵ running", Style::default().fg(Color::White)))
        } else {
            Line::from(vec![
                Span::styled("⏵ running ", Style::default().fg(Color::White)),
                Span::styled("(not synced)", Style::default().fg(Color::Yellow)),
            ])
        }
    } else {
        Line::from(Span::styled(
            "paused — space to start",
            Style::default().fg(Color::DarkGray),
        ))
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format_clock(view.time_left_secs),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        state_line,
    ];

    let countdown = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", app.phase.description()))
            .border_style(border_style),
    );
    frame.render_widget(countdown, area);
}

fn render_sequence(frame: &mut Frame, area: Rect, app: &App) {
    let label = format!(
        "{}  ·  next: {}",
        app.sequence.progress_label,
        app.sequence.next_phase.label()
    );
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Pomodoros "))
        .gauge_style(Style::default().fg(Color::Red).bg(Color::DarkGray))
        .ratio(app.sequence.progress_fraction().clamp(0.0, 1.0))
        .label(label);
    frame.render_widget(gauge, area);
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let (text, color) = match &app.status_message {
        Some(msg) => {
            let color = if msg.starts_with("Offline") || msg.starts_with("Warning") {
                Color::Yellow
            } else if msg.starts_with("Error") || msg.starts_with("Sync failed") {
                Color::Red
            } else {
                Color::White
            };
            (msg.clone(), color)
        }
        None => (String::new(), Color::White),
    };

    let status = Paragraph::new(text)
        .style(Style::default().fg(color))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Status ")
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(status, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let entries = [
        ("Space", "start/stop"),
        ("1-3", "phase"),
        ("S", "settings"),
        ("R", "reset counter"),
        ("G", "re-sync"),
        ("Q", "quit"),
    ];
    let mut spans = Vec::new();
    for (key, label) in entries {
        spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(format!(": {}  ", label)));
    }

    let controls = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(controls, area);
}
