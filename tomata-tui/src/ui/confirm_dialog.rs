use super::utils::centered_rect;
use super::*;

pub fn render_reset_confirm_dialog(frame: &mut Frame, app: &App) {
    let area = centered_rect(52, 10, frame.area());
    frame.render_widget(Clear, area);

    let detail = format!(
        "Completed pomodoros: {}  ·  cycle {}",
        app.sequence.completed_work_count, app.sequence.progress_label
    );

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Reset the pomodoro counter to zero?",
            Style::default().fg(Color::White),
        )),
        Line::from(Span::styled(detail, Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y] Yes", Style::default().fg(Color::Red)),
            Span::raw("    "),
            Span::styled("[n] No", Style::default().fg(Color::White)),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Reset Counter? ")
                .padding(Padding::horizontal(1)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
