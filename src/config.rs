use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_TEAM_LEAD: &str = "TeamLead1";

#[derive(Parser, Debug, Clone)]
#[command(name = "taskboard", version, about = "Terminal Kanban dashboard for a team lead's tasks")]
pub struct Config {
    /// Base URL of the task backend API.
    #[arg(long, env = "TASKBOARD_API_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Team lead whose dashboard is shown.
    #[arg(long, env = "TASKBOARD_TEAM_LEAD", default_value = DEFAULT_TEAM_LEAD)]
    pub team_lead: String,

    #[arg(long, env = "TASKBOARD_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Log destination; the terminal itself is taken by the board.
    #[arg(long, env = "TASKBOARD_LOG_FILE", default_value = "taskboard.log")]
    pub log_file: PathBuf,

    #[arg(long, env = "TASKBOARD_TITLE", default_value = "DESIGN TEAM")]
    pub title: String,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
