use crossterm::event::KeyEvent;
use stapubox_api::{ScheduleSnapshot, Sport};

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    /// `generation` comes from `FetchTracker::begin`.
    LoadSchedule { generation: u64 },
    LoadSports,
}

#[derive(Debug)]
pub enum NetworkResponse {
    ScheduleLoaded { generation: u64, snapshot: ScheduleSnapshot },
    ScheduleFailed { generation: u64, message: String },
    SportsLoaded { sports: Vec<Sport> },
    SportsFailed { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    AnimationTick,
}
