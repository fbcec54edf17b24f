use crate::app::{App, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph},
    Frame,
};

mod confirm_dialog;
mod settings_view;
mod timer_view;
pub(super) mod utils;

pub fn render(frame: &mut Frame, app: &mut App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(frame.area());

    render_header(frame, root[0], app);

    let body = root[1];
    // The timer stays visible behind every overlay.
    timer_view::render_timer_view(frame, app, body);
    match app.current_view {
        View::Timer => {}
        View::Settings => settings_view::render_settings_overlay(frame, app),
        View::ConfirmReset => confirm_dialog::render_reset_confirm_dialog(frame, app),
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let view = app.client_view();
    let phase_color = timer_view::phase_color(view.phase);

    let mut spans = vec![
        Span::styled(
            " tomata ",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("· ", Style::default().fg(Color::DarkGray)),
        Span::styled(view.phase.label(), Style::default().fg(phase_color)),
        Span::styled(
            format!("  {}", app.sequence.progress_label),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if !view.synced {
        spans.push(Span::styled(
            "  (not synced)",
            Style::default().fg(Color::Yellow),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).alignment(Alignment::Left);
    frame.render_widget(header, area);
}
