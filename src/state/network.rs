use crate::state::messages::{NetworkRequest, NetworkResponse};
use log::{debug, error};
use stapubox_api::client::StapuboxApi;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

impl LoadingState {
    /// Advance one animation frame. `failed` pins the error glyph once idle.
    pub fn tick(&mut self, is_loading: bool, failed: bool) {
        if is_loading {
            let next = SPINNER_CHARS
                .iter()
                .position(|c| *c == self.spinner_char)
                .map_or(0, |i| (i + 1) % SPINNER_CHARS.len());
            *self = Self { is_loading: true, spinner_char: SPINNER_CHARS[next] };
        } else {
            let spinner_char = if failed { ERROR_CHAR } else { ' ' };
            *self = Self { is_loading: false, spinner_char };
        }
    }
}

/// Hands out schedule request generations. Only the newest generation may
/// commit, so a slow response can never overwrite a newer one.
#[derive(Debug, Default)]
pub struct FetchTracker {
    current: u64,
}

impl FetchTracker {
    pub fn begin(&mut self) -> u64 {
        self.current += 1;
        self.current
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.current
    }

    pub fn current(&self) -> u64 {
        self.current
    }
}

/// Runs fetches off the UI loop. One in-flight task per stream: a new
/// schedule request aborts the previous schedule task, and likewise for
/// sports. The two streams never block each other.
pub struct NetworkWorker {
    client: Arc<StapuboxApi>,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    schedule_task: Option<JoinHandle<()>>,
    sports_task: Option<JoinHandle<()>>,
}

impl NetworkWorker {
    pub fn new(
        client: StapuboxApi,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client: Arc::new(client),
            requests,
            responses,
            schedule_task: None,
            sports_task: None,
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            match request {
                NetworkRequest::LoadSchedule { generation } => {
                    if let Some(task) = self.schedule_task.take() {
                        debug!("superseding in-flight schedule fetch");
                        task.abort();
                    }
                    self.schedule_task = Some(self.spawn_load_schedule(generation));
                }
                NetworkRequest::LoadSports => {
                    if let Some(task) = self.sports_task.take() {
                        task.abort();
                    }
                    self.sports_task = Some(self.spawn_load_sports());
                }
            }
        }

        for task in [self.schedule_task.take(), self.sports_task.take()].into_iter().flatten() {
            task.abort();
        }
    }

    fn spawn_load_schedule(&self, generation: u64) -> JoinHandle<()> {
        let client = self.client.clone();
        let responses = self.responses.clone();
        tokio::spawn(async move {
            debug!("loading schedule (generation {generation})");
            let response = match client.fetch_schedule().await {
                Ok(snapshot) => {
                    debug!("schedule generation {generation}: {} tournaments", snapshot.tournament_count());
                    NetworkResponse::ScheduleLoaded { generation, snapshot }
                }
                Err(e) => NetworkResponse::ScheduleFailed { generation, message: e.to_string() },
            };
            if let Err(e) = responses.send(response).await {
                error!("Failed to send network response: {e}");
            }
        })
    }

    fn spawn_load_sports(&self) -> JoinHandle<()> {
        let client = self.client.clone();
        let responses = self.responses.clone();
        tokio::spawn(async move {
            debug!("loading sports list");
            let response = match client.fetch_sports().await {
                Ok(sports) => NetworkResponse::SportsLoaded { sports },
                Err(e) => NetworkResponse::SportsFailed { message: e.to_string() },
            };
            if let Err(e) = responses.send(response).await {
                error!("Failed to send network response: {e}");
            }
        })
    }
}
