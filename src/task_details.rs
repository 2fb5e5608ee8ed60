use crate::task::{Priority, Task, TaskStatus};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub const NO_TASK_MESSAGE: &str = "No task selected or task data unavailable!";

const LABEL: Style = Style::new().fg(Color::Gray);
const VALUE: Style = Style::new().add_modifier(Modifier::BOLD);
const DIM: Style = Style::new().fg(Color::DarkGray);

fn priority_style(priority: Priority) -> (Color, Color) {
    // (dot, text) colors
    match priority {
        Priority::Low => (Color::Rgb(74, 222, 128), Color::Rgb(22, 163, 74)),
        Priority::Normal => (Color::Rgb(250, 204, 21), Color::Rgb(202, 138, 4)),
        Priority::Urgent => (Color::Rgb(248, 113, 113), Color::Rgb(220, 38, 38)),
    }
}

fn status_panel_background(task: &Task) -> Color {
    if task.status == Some(TaskStatus::InTest) {
        Color::Rgb(252, 165, 165)
    } else {
        Color::Rgb(255, 237, 213)
    }
}

fn field<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label}: "), LABEL),
        Span::styled(value, VALUE),
    ])
}

fn info_lines(task: &Task) -> Vec<Line<'_>> {
    let mut lines = vec![
        Line::from(Span::styled(task.name.as_str(), VALUE.fg(Color::White))),
        Line::from(""),
        field("Status", task.status_label().to_string()),
        field("Due Date", task.deadline_label()),
    ];

    let mut assigned = vec![Span::styled("Assigned to: ", LABEL)];
    match task.assigned_to.people() {
        [] => assigned.push(Span::styled(task.assigned_to.display(), VALUE)),
        people => {
            for (i, person) in people.iter().enumerate() {
                if i > 0 {
                    assigned.push(Span::raw(", "));
                }
                assigned.push(Span::styled(person.name.as_str(), VALUE));
                if !person.image.is_empty() {
                    assigned.push(Span::styled(format!(" ({})", person.image), DIM));
                }
            }
        }
    }
    lines.push(Line::from(assigned));

    let mut assigned_by = vec![
        Span::styled("Assigned by: ", LABEL),
        Span::styled(task.assigned_by.name.as_str(), VALUE),
    ];
    if !task.assigned_by.image.is_empty() {
        assigned_by.push(Span::styled(format!(" ({})", task.assigned_by.image), DIM));
    }
    lines.push(Line::from(assigned_by));
    lines
}

fn attachment_lines(task: &Task) -> Vec<Line<'_>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("Attachments ({})", task.attachments.len()),
            DIM.add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled("Download", Style::new().fg(Color::LightBlue)),
    ])];
    if task.attachments.is_empty() {
        lines.push(Line::from("No attachments available."));
    }
    for attachment in &task.attachments {
        let mut spans = vec![Span::raw("  "), Span::raw(attachment.name.as_str())];
        if let Some(url) = &attachment.url {
            if url != &attachment.name {
                spans.push(Span::styled(format!("  {url}"), DIM));
            }
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn comment_lines(task: &Task) -> Vec<Line<'_>> {
    let mut lines = vec![Line::from(Span::styled(
        format!("Comments ({})", task.comments.len()),
        VALUE,
    ))];
    for comment in &task.comments {
        let user = if comment.user.is_empty() { "?" } else { comment.user.as_str() };
        let mut spans = vec![Span::styled(format!("  {user}"), Style::new().fg(Color::LightBlue))];
        if !comment.user_image.is_empty() {
            spans.push(Span::styled(format!(" ({})", comment.user_image), DIM));
        }
        spans.push(Span::raw(": "));
        spans.push(Span::raw(comment.text.as_str()));
        lines.push(Line::from(spans));
    }
    lines
}

fn status_panel(task: &Task) -> Paragraph<'static> {
    let mut spans = vec![Span::styled("Change Status ", Style::new().add_modifier(Modifier::BOLD))];
    for priority in Priority::ALL {
        let (dot, text) = priority_style(priority);
        spans.push(Span::raw(" "));
        spans.push(Span::styled(" ●", Style::new().fg(dot).bg(Color::White)));
        spans.push(Span::styled(
            format!(" {} ", priority.label()),
            Style::new().fg(text).bg(Color::White).add_modifier(Modifier::BOLD),
        ));
    }
    Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::NONE)
            .style(Style::new().bg(status_panel_background(task)).fg(Color::Black)),
    )
}

/// Renders one task read-only. Without a task only the placeholder message
/// is drawn.
pub fn render_task_details(f: &mut Frame, area: Rect, task: Option<&Task>) {
    let Some(task) = task else {
        f.render_widget(Paragraph::new(NO_TASK_MESSAGE), area);
        return;
    };

    let info = info_lines(task);
    let attachments = attachment_lines(task);
    let rows = |lines: &[Line<'_>]| {
        u16::try_from(lines.len())
            .unwrap_or(u16::MAX)
            .saturating_add(1)
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(rows(&info)),
            Constraint::Length(5),
            Constraint::Length(rows(&attachments)),
            Constraint::Min(2),
            Constraint::Length(1),
        ])
        .split(area);

    f.render_widget(Paragraph::new(info), chunks[0]);

    let description = if task.description.is_empty() {
        Paragraph::new(Span::styled("Description", DIM))
    } else {
        Paragraph::new(task.description.as_str())
    };
    f.render_widget(
        description
            .wrap(Wrap { trim: true })
            .block(Block::default().title("Description").borders(Borders::ALL)),
        chunks[1],
    );

    f.render_widget(Paragraph::new(attachments), chunks[2]);
    f.render_widget(Paragraph::new(comment_lines(task)).wrap(Wrap { trim: false }), chunks[3]);
    f.render_widget(status_panel(task), chunks[4]);
}
