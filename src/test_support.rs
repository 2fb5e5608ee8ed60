use ratatui::{backend::TestBackend, layout::Rect, Frame, Terminal};

/// Draws once into an in-memory terminal and returns the screen as text rows.
pub fn draw(width: u16, height: u16, render: impl FnOnce(&mut Frame, Rect)) -> Vec<String> {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal
        .draw(|f| {
            let area = f.area();
            render(f, area);
        })
        .unwrap();

    let buffer = terminal.backend().buffer();
    (0..buffer.area.height)
        .map(|y| (0..buffer.area.width).map(|x| buffer[(x, y)].symbol()).collect())
        .collect()
}
