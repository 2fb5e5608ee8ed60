use crate::api::{DashboardSource, FetchError};
use crate::dashboard::DashboardPayload;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Result of one dashboard fetch, tagged with the load it belongs to.
#[derive(Debug)]
pub struct LoadOutcome {
    pub generation: u64,
    pub result: Result<DashboardPayload, FetchError>,
}

/// Runs dashboard fetches on the async runtime and hands the results to the
/// UI thread.
pub struct Loader {
    runtime: Handle,
    source: Arc<dyn DashboardSource>,
    team_lead_id: String,
    updates: Sender<LoadOutcome>,
}

impl Loader {
    pub fn new(
        runtime: Handle,
        source: Arc<dyn DashboardSource>,
        team_lead_id: String,
        updates: Sender<LoadOutcome>,
    ) -> Self {
        Self {
            runtime,
            source,
            team_lead_id,
            updates,
        }
    }

    pub fn spawn(&self, generation: u64) -> JoinHandle<()> {
        self.runtime.spawn(load(
            Arc::clone(&self.source),
            self.team_lead_id.clone(),
            generation,
            self.updates.clone(),
        ))
    }
}

pub(crate) async fn load(
    source: Arc<dyn DashboardSource>,
    team_lead_id: String,
    generation: u64,
    updates: Sender<LoadOutcome>,
) {
    info!(%team_lead_id, generation, "fetching task dashboard");
    let result = source.fetch_dashboard(&team_lead_id).await;
    match &result {
        Ok(payload) => info!(generation, tasks = payload.len(), "task dashboard loaded"),
        Err(err) => error!(generation, error = %err, "error fetching task data"),
    }
    // The board may already be gone.
    if updates.send(LoadOutcome { generation, result }).is_err() {
        debug!(generation, "board closed before dashboard load finished");
    }
}
