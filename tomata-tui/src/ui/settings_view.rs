use super::utils::centered_rect;
use super::*;
use crate::app::SettingsField;

pub fn render_settings_overlay(frame: &mut Frame, app: &App) {
    let form = match &app.settings_form {
        Some(f) => f,
        None => return,
    };

    let area = centered_rect(52, 14, frame.area());
    frame.render_widget(Clear, area);

    let field = |label: &str, value: &str, focused: bool| {
        let label_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let value_style = if focused {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        Line::from(vec![
            Span::styled(format!("{label:<28}"), label_style),
            Span::styled(value.to_string(), value_style),
        ])
    };

    let focused = form.focused_field;
    let mut lines = vec![
        Line::from(""),
        field(
            "Work (minutes):",
            &form.work_input,
            focused == SettingsField::WorkMinutes,
        ),
        field(
            "Short break (minutes):",
            &form.short_break_input,
            focused == SettingsField::ShortBreakMinutes,
        ),
        field(
            "Long break (minutes):",
            &form.long_break_input,
            focused == SettingsField::LongBreakMinutes,
        ),
        field(
            "Pomodoros per cycle:",
            &form.cycle_input,
            focused == SettingsField::PomodorosBeforeLongBreak,
        ),
        Line::from(""),
        Line::from(Span::styled(
            "Applies to the next phase; a running countdown is unaffected.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    if let Some(err) = &form.error {
        lines.push(Line::from(Span::styled(
            err.as_str(),
            Style::default().fg(Color::Red),
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(": Switch field  "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(": Save  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(": Cancel"),
    ]));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .title(Span::styled(
                    " Settings ",
                    Style::default().fg(Color::Yellow),
                ))
                .padding(Padding::horizontal(2)),
        )
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, area);
}
