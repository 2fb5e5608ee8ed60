use crate::board_view;
use crate::kanban_board::{Action, KanbanBoard};
use crate::loader::{LoadOutcome, Loader};
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use std::io;
use std::sync::mpsc::Receiver;
use std::time::Duration;

const TICK: Duration = Duration::from_millis(100);

pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    board: &mut KanbanBoard,
    loader: &Loader,
    updates: &Receiver<LoadOutcome>,
    title: &str,
) -> io::Result<()> {
    loader.spawn(board.begin_load());

    loop {
        while let Ok(outcome) = updates.try_recv() {
            board.apply_load(outcome);
        }

        terminal.draw(|f| board_view::render(f, board, title))?;

        if !event::poll(TICK)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match board.handle_key(key.code) {
                Action::Quit => return Ok(()),
                Action::Reload => {
                    loader.spawn(board.begin_load());
                }
                Action::None => {}
            }
        }
    }
}
