use crate::dashboard::{self, Column, DashboardPayload, COLUMNS};
use crate::loader::LoadOutcome;
use crate::task::Task;
use crossterm::event::KeyCode;
use std::collections::HashMap;
use tracing::{debug, info};

/// Screens reachable from the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Board,
    AddTask,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
    Failed(String),
}

/// The task shown in the details overlay and the column it was opened from.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub task: Task,
    pub column_title: &'static str,
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Reload,
}

#[derive(Debug)]
pub struct KanbanBoard {
    pub payload: DashboardPayload,
    pub filter: Option<String>,
    pub show_filter_dropdown: bool,
    pub collapsed: HashMap<usize, bool>,
    pub selected: Option<Selection>,
    pub route: Route,
    pub load_state: LoadState,
    pub selected_column: usize,
    pub selected_task: usize,
    pub dropdown_cursor: usize,
    generation: u64,
}

impl Default for KanbanBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl KanbanBoard {
    pub fn new() -> Self {
        Self {
            payload: DashboardPayload::default(),
            filter: None,
            show_filter_dropdown: false,
            collapsed: HashMap::new(),
            selected: None,
            route: Route::Board,
            load_state: LoadState::Loading,
            selected_column: 0,
            selected_task: 0,
            dropdown_cursor: 0,
            generation: 0,
        }
    }

    pub fn labels(&self) -> Vec<String> {
        dashboard::labels(&self.payload)
    }

    pub fn columns(&self) -> Vec<Column<'_>> {
        dashboard::columns(&self.payload, self.filter.as_deref())
    }

    /// Starts a new load and returns its generation. Outcomes from earlier
    /// loads are ignored from now on.
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.load_state = LoadState::Loading;
        self.generation
    }

    /// Applies a finished load. Returns false when the outcome is stale.
    pub fn apply_load(&mut self, outcome: LoadOutcome) -> bool {
        if outcome.generation != self.generation {
            debug!(
                generation = outcome.generation,
                current = self.generation,
                "ignoring stale dashboard load"
            );
            return false;
        }
        match outcome.result {
            Ok(payload) => {
                if payload.is_empty() {
                    info!("dashboard has no tasks");
                }
                self.payload = payload;
                self.load_state = LoadState::Loaded;
                self.clamp_cursor();
            }
            // Keep whatever the board already shows.
            Err(err) => self.load_state = LoadState::Failed(err.to_string()),
        }
        true
    }

    /// `None` (or an empty label) shows every task. Closes the dropdown.
    pub fn set_filter(&mut self, label: Option<String>) {
        self.filter = label.filter(|l| !l.is_empty());
        self.show_filter_dropdown = false;
        info!(filter = ?self.filter, "filter changed");
        self.clamp_cursor();
    }

    pub fn toggle_filter_dropdown(&mut self) {
        self.show_filter_dropdown = !self.show_filter_dropdown;
        if self.show_filter_dropdown {
            self.dropdown_cursor = self
                .filter
                .as_ref()
                .and_then(|current| self.labels().iter().position(|l| l == current))
                .map_or(0, |i| i + 1);
        }
    }

    pub fn toggle_column(&mut self, index: usize) {
        let collapsed = self.collapsed.entry(index).or_insert(false);
        *collapsed = !*collapsed;
    }

    pub fn is_collapsed(&self, index: usize) -> bool {
        self.collapsed.get(&index).copied().unwrap_or(false)
    }

    pub fn focused_task(&self) -> Option<&Task> {
        if self.is_collapsed(self.selected_column) {
            return None;
        }
        self.columns()
            .get(self.selected_column)
            .and_then(|column| column.tasks.get(self.selected_task).copied())
    }

    pub fn select_task(&mut self, task: Task, column_title: &'static str) {
        info!(task = %task.name, column = column_title, "task selected");
        self.selected = Some(Selection { task, column_title });
    }

    pub fn select_focused_task(&mut self) {
        if let Some(task) = self.focused_task().cloned() {
            let spec = &COLUMNS[self.selected_column];
            debug!(path = spec.path, "opening task details");
            self.select_task(task, spec.title);
        }
    }

    pub fn close_details(&mut self) {
        self.selected = None;
    }

    fn visible_task_count(&self) -> usize {
        if self.is_collapsed(self.selected_column) {
            return 0;
        }
        self.columns()
            .get(self.selected_column)
            .map_or(0, |column| column.tasks.len())
    }

    fn clamp_cursor(&mut self) {
        self.selected_task = self.selected_task.min(self.visible_task_count().saturating_sub(1));
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Action {
        if matches!(code, KeyCode::Char('q')) {
            return Action::Quit;
        }

        if self.route == Route::AddTask {
            if matches!(code, KeyCode::Esc | KeyCode::Backspace) {
                self.route = Route::Board;
            }
            return Action::None;
        }

        // The details overlay is read-only; its status buttons take no input.
        if self.selected.is_some() {
            if code == KeyCode::Esc {
                self.close_details();
            }
            return Action::None;
        }

        if self.show_filter_dropdown {
            let options = self.labels().len() + 1;
            match code {
                KeyCode::Up | KeyCode::Char('k') => {
                    self.dropdown_cursor = self.dropdown_cursor.saturating_sub(1);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if self.dropdown_cursor + 1 < options {
                        self.dropdown_cursor += 1;
                    }
                }
                KeyCode::Enter => {
                    let label = match self.dropdown_cursor {
                        0 => None,
                        i => self.labels().get(i - 1).cloned(),
                    };
                    self.set_filter(label);
                }
                KeyCode::Esc | KeyCode::Char('f') => self.show_filter_dropdown = false,
                _ => {}
            }
            return Action::None;
        }

        match code {
            KeyCode::Left | KeyCode::Char('h') => {
                if self.selected_column > 0 {
                    self.selected_column -= 1;
                    self.clamp_cursor();
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.selected_column < COLUMNS.len() - 1 {
                    self.selected_column += 1;
                    self.clamp_cursor();
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_task = self.selected_task.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_task + 1 < self.visible_task_count() {
                    self.selected_task += 1;
                }
            }
            KeyCode::Char(' ') | KeyCode::Char('c') => {
                self.toggle_column(self.selected_column);
                self.clamp_cursor();
            }
            KeyCode::Enter => self.select_focused_task(),
            KeyCode::Char('f') => self.toggle_filter_dropdown(),
            KeyCode::Char('a') => {
                info!("navigating to add task");
                self.route = Route::AddTask;
            }
            KeyCode::Char('r') => return Action::Reload,
            _ => {}
        }
        Action::None
    }
}
