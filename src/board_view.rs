use crate::dashboard::Column;
use crate::kanban_board::{KanbanBoard, LoadState, Route};
use crate::palette::palette_color;
use crate::task::Task;
use crate::task_details::render_task_details;
use chrono::{Local, NaiveDate};
use ratatui::{
    layout::{Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

const HEADER_BG: Color = Color::Rgb(204, 251, 241);

pub fn render(f: &mut Frame, board: &KanbanBoard, title: &str) {
    let area = f.area();
    if board.route == Route::AddTask {
        render_add_task(f, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(f, board, title, chunks[0]);
    render_columns(f, board, chunks[1], Local::now().date_naive());
    render_status_bar(f, board, chunks[2]);

    if board.show_filter_dropdown {
        render_filter_dropdown(f, board, chunks[1]);
    }

    if let Some(selection) = &board.selected {
        let popup = centered(area, 80, 80);
        f.render_widget(Clear, popup);
        let block = Block::default()
            .title(format!(" {} · Esc to close ", selection.column_title))
            .borders(Borders::ALL);
        let inner = block.inner(popup);
        f.render_widget(block, popup);
        render_task_details(f, inner, Some(&selection.task));
    }
}

fn render_header(f: &mut Frame, board: &KanbanBoard, title: &str, area: Rect) {
    let filter = board.filter.as_deref().unwrap_or("All");
    let line = Line::from(vec![
        Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(Color::DarkGray)
                .bg(HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled("[a] Add a task", Style::default().fg(Color::Rgb(20, 184, 166))),
        Span::raw("   "),
        Span::raw(format!("[f] Filter: {filter}")),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn card(task: &Task, today: NaiveDate) -> ListItem<'_> {
    let mut top = vec![];
    if !task.name.is_empty() {
        top.push(Span::styled(
            format!(" {} ", task.name),
            Style::default()
                .fg(Color::Black)
                .bg(palette_color(task))
                .add_modifier(Modifier::BOLD),
        ));
        top.push(Span::raw("  "));
    }
    if task.is_completed() {
        top.push(Span::styled(
            "✔✔ Done",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ));
    } else {
        let style = if task.is_overdue(today) {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Gray)
        };
        top.push(Span::styled(task.deadline_label(), style));
    }

    let people = task.assigned_to.display();
    ListItem::new(Text::from(vec![
        Line::from(top),
        Line::from(Span::styled(
            format!("Assigned: {people}"),
            Style::default().fg(Color::Gray),
        )),
        Line::from(vec![
            Span::styled(
                format!("{} Comments", task.comment_count()),
                Style::default().fg(Color::Gray),
            ),
            Span::raw("  "),
            Span::styled(task.status_label(), Style::default().fg(Color::Gray)),
        ]),
        Line::from(""),
    ]))
}

fn column_block(column: &Column<'_>, collapsed: bool, focused: bool) -> Block<'static> {
    let chevron = if collapsed { "▼" } else { "▲" };
    let mut border = Style::default().fg(column.spec.color);
    if focused {
        border = border.add_modifier(Modifier::BOLD);
    }
    Block::default()
        .title(Line::from(vec![
            Span::styled(
                format!(" {} ", column.spec.title),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("({}) ", column.tasks.len()),
                Style::default().fg(Color::Gray),
            ),
            Span::raw(format!("{chevron} ")),
        ]))
        .borders(Borders::ALL)
        .border_type(if focused {
            BorderType::Thick
        } else {
            BorderType::Plain
        })
        .border_style(border)
}

fn render_columns(f: &mut Frame, board: &KanbanBoard, area: Rect, today: NaiveDate) {
    let columns = board.columns();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Ratio(1, columns.len() as u32);
            columns.len()
        ])
        .split(area);

    for (i, column) in columns.iter().enumerate() {
        let collapsed = board.is_collapsed(i);
        let focused = board.selected_column == i;
        let block = column_block(column, collapsed, focused);

        if collapsed {
            let hint = Span::styled("collapsed", Style::default().fg(Color::DarkGray));
            f.render_widget(Paragraph::new(hint).block(block), chunks[i]);
            continue;
        }

        let items: Vec<ListItem> = column.tasks.iter().map(|t| card(t, today)).collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut state = ListState::default();
        if focused && !column.tasks.is_empty() {
            state.select(Some(board.selected_task));
        }
        f.render_stateful_widget(list, chunks[i], &mut state);
    }
}

fn render_filter_dropdown(f: &mut Frame, board: &KanbanBoard, area: Rect) {
    let labels = board.labels();
    let widest = labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max(8);
    let width = u16::try_from(widest).unwrap_or(u16::MAX).saturating_add(6);
    let height = u16::try_from(labels.len())
        .unwrap_or(u16::MAX)
        .saturating_add(3);
    let popup = Rect {
        x: area.x.saturating_add(2),
        y: area.y.saturating_add(1),
        width: width.min(area.width.saturating_sub(2)),
        height: height.min(area.height.saturating_sub(1)),
    };

    let current = board.filter.as_deref();
    let items: Vec<ListItem> = std::iter::once(("All", current.is_none()))
        .chain(labels.iter().map(|l| (l.as_str(), current == Some(l.as_str()))))
        .map(|(label, active)| {
            let mark = if active { "✓ " } else { "  " };
            ListItem::new(format!("{mark}{label}"))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().title(" Filter ").borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut state = ListState::default().with_selected(Some(board.dropdown_cursor));

    f.render_widget(Clear, popup);
    f.render_stateful_widget(list, popup, &mut state);
}

fn render_status_bar(f: &mut Frame, board: &KanbanBoard, area: Rect) {
    let status = match &board.load_state {
        LoadState::Loading => Span::styled("Loading tasks…", Style::default().fg(Color::Yellow)),
        LoadState::Loaded => Span::raw(format!("{} tasks", board.payload.len())),
        LoadState::Failed(err) => Span::styled(
            format!("Failed to load tasks: {err}"),
            Style::default().fg(Color::Red),
        ),
    };
    let line = Line::from(vec![
        status,
        Span::styled(
            "   ←→ column  ↑↓ task  enter open  space collapse  r reload  q quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_add_task(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(Span::styled("Add a task", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from("Task creation is not available from the board."),
        Line::from(Span::styled("Esc to go back, q to quit", Style::default().fg(Color::DarkGray))),
    ];
    f.render_widget(
        Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL)),
        centered(area, 60, 40),
    );
}

fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [area] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(area);
    area
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::DashboardPayload;
    use crate::loader::LoadOutcome;
    use crate::task::TaskStatus;
    use crate::test_support::draw;
    use crossterm::event::KeyCode;

    fn named(name: &str) -> Task {
        Task {
            name: name.to_string(),
            deadline: "2024-01-01".into(),
            ..Task::default()
        }
    }

    fn board_with(payload: DashboardPayload) -> KanbanBoard {
        let mut board = KanbanBoard::new();
        let generation = board.begin_load();
        board.apply_load(LoadOutcome {
            generation,
            result: Ok(payload),
        });
        board
    }

    fn screen(board: &KanbanBoard) -> String {
        draw(120, 30, |f, _| render(f, board, "DESIGN TEAM")).join("\n")
    }

    #[test]
    fn empty_board_shows_four_zero_counts() {
        let text = screen(&KanbanBoard::new());
        for title in ["TODAY ASSIGNED (0)", "IN PROGRESS (0)", "IN TEST (0)", "COMPLETED (0)"] {
            assert!(text.contains(title), "missing {title:?} in\n{text}");
        }
        assert!(text.contains("DESIGN TEAM"));
        assert!(text.contains("Loading tasks"));
    }

    #[test]
    fn in_progress_card_is_rendered() {
        let board = board_with(DashboardPayload {
            in_progress: vec![named("X")],
            ..DashboardPayload::default()
        });
        let text = screen(&board);
        assert!(text.contains("IN PROGRESS (1)"));
        assert!(text.contains(" X "));
        assert!(text.contains("2024-01-01"));
        assert!(text.contains("0 Comments"));
        assert!(text.contains("1 tasks"));
    }

    #[test]
    fn completed_cards_show_done() {
        let mut task = named("Shipped");
        task.status = Some(TaskStatus::Completed);
        let board = board_with(DashboardPayload {
            completed: vec![task],
            ..DashboardPayload::default()
        });
        assert!(screen(&board).contains("✔✔ Done"));
    }

    #[test]
    fn collapsed_column_hides_cards() {
        let mut board = board_with(DashboardPayload {
            today_assigned: vec![named("Hidden")],
            ..DashboardPayload::default()
        });
        board.toggle_column(0);
        let text = screen(&board);
        assert!(text.contains("TODAY ASSIGNED (1)"));
        assert!(!text.contains("Hidden"));
        assert!(text.contains("collapsed"));
    }

    #[test]
    fn filter_dropdown_lists_all_and_labels() {
        let mut board = board_with(DashboardPayload {
            in_test: vec![named("Alpha")],
            completed: vec![named("Beta")],
            ..DashboardPayload::default()
        });
        board.handle_key(KeyCode::Char('f'));
        let text = screen(&board);
        assert!(text.contains("✓ All"));
        assert!(text.contains("Alpha"));
        assert!(text.contains("Beta"));
    }

    #[test]
    fn very_long_label_fits_the_dropdown() {
        let mut board = board_with(DashboardPayload {
            in_test: vec![named(&"x".repeat(65_531))],
            ..DashboardPayload::default()
        });
        board.handle_key(KeyCode::Char('f'));
        let text = screen(&board);
        assert!(text.contains("✓ All"));
        assert!(text.contains("xxxxxxxx"));
    }

    #[test]
    fn selected_task_opens_details_overlay() {
        let mut board = board_with(DashboardPayload {
            in_progress: vec![named("X")],
            ..DashboardPayload::default()
        });
        board.handle_key(KeyCode::Right);
        board.handle_key(KeyCode::Enter);
        let text = screen(&board);
        assert!(text.contains("IN PROGRESS · Esc to close"));
        assert!(text.contains("Change Status"));
    }

    #[test]
    fn failed_load_is_reported() {
        let mut board = KanbanBoard::new();
        board.load_state = LoadState::Failed("server returned 500".into());
        let text = screen(&board);
        assert!(text.contains("Failed to load tasks: server returned 500"));
        assert!(text.contains("COMPLETED (0)"));
    }

    #[test]
    fn add_task_route_replaces_board() {
        let mut board = KanbanBoard::new();
        board.handle_key(KeyCode::Char('a'));
        let text = screen(&board);
        assert!(text.contains("Add a task"));
        assert!(!text.contains("IN PROGRESS"));
    }
}
