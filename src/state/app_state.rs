use crate::state::network::{FetchTracker, LoadingState};
use crate::state::projection::{ViewModel, view_model};
use crate::state::schedule::ScheduleIndex;
use crate::state::selection::{MonthChange, MonthWindow, SelectionState};
use chrono::{Duration, NaiveDate};
use log::{debug, error};
use stapubox_api::time::{DayKey, Month};
use stapubox_api::{ScheduleSnapshot, Sport, SportFilter};
use std::collections::HashSet;

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Sports,
    Calendar,
    Tournaments,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Sports => Focus::Calendar,
            Focus::Calendar => Focus::Tournaments,
            Focus::Tournaments => Focus::Sports,
        }
    }
}

// ---------------------------------------------------------------------------
// Schedule state: snapshot index + selection + fetch bookkeeping
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ScheduleState {
    pub index: ScheduleIndex,
    pub selection: SelectionState,
    pub window: MonthWindow,
    pub fetch: FetchTracker,
    pub loading: bool,
    pub last_error: Option<String>,
}

impl ScheduleState {
    pub fn new(window: MonthWindow, today: NaiveDate) -> Self {
        Self {
            index: ScheduleIndex::default(),
            selection: SelectionState::initial(today, &window),
            window,
            fetch: FetchTracker::default(),
            loading: false,
            last_error: None,
        }
    }

    /// Marks the current snapshot stale and returns the generation for the
    /// new request.
    pub fn begin_reload(&mut self) -> u64 {
        self.loading = true;
        self.fetch.begin()
    }

    /// Returns false when the response was superseded and discarded.
    pub fn commit_snapshot(&mut self, generation: u64, snapshot: ScheduleSnapshot) -> bool {
        if !self.fetch.is_current(generation) {
            debug!("discarding stale schedule generation {generation} (current {})", self.fetch.current());
            return false;
        }
        self.index = ScheduleIndex::build(&snapshot);
        if snapshot.is_empty() {
            self.selection.clear_day();
        }
        self.loading = false;
        self.last_error = None;
        true
    }

    /// A failed fetch empties the index and drops the active day rather than
    /// keeping the previous snapshot around.
    pub fn commit_failure(&mut self, generation: u64, message: String) -> bool {
        if !self.fetch.is_current(generation) {
            debug!("discarding stale schedule failure {generation}: {message}");
            return false;
        }
        error!("schedule fetch failed: {message}");
        self.index = ScheduleIndex::default();
        self.selection.clear_day();
        self.loading = false;
        self.last_error = Some(message);
        true
    }

    pub fn view(&self) -> ViewModel<'_> {
        view_model(&self.index, &self.selection, &self.window, self.loading)
    }
}

// ---------------------------------------------------------------------------
// Sports selector
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct SportsState {
    pub sports: Vec<Sport>,
    /// Index into `options()`; 0 is always ALL.
    pub cursor: usize,
    pub loading: bool,
    pub last_error: Option<String>,
}

impl SportsState {
    pub fn options(&self) -> Vec<(SportFilter, &str)> {
        std::iter::once((SportFilter::All, "ALL"))
            .chain(self.sports.iter().map(|s| (SportFilter::Sport(s.id), s.name.as_str())))
            .collect()
    }

    pub fn load(&mut self, sports: Vec<Sport>) {
        self.sports = sports;
        self.cursor = self.cursor.min(self.sports.len());
        self.loading = false;
        self.last_error = None;
    }

    pub fn fail(&mut self, message: String) {
        error!("sports list fetch failed: {message}");
        self.loading = false;
        self.last_error = Some(message);
    }

    pub fn cursor_down(&mut self) {
        if self.cursor < self.sports.len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn filter_at_cursor(&self) -> SportFilter {
        match self.cursor {
            0 => SportFilter::All,
            n => self.sports.get(n - 1).map_or(SportFilter::All, |s| SportFilter::Sport(s.id)),
        }
    }
}

// ---------------------------------------------------------------------------
// Calendar cursor: which cell is under the keyboard, not which day is active
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct CalendarState {
    pub cursor: NaiveDate,
}

impl CalendarState {
    pub fn new(month: Month) -> Self {
        Self { cursor: month.first_day() }
    }

    pub fn reset_to(&mut self, month: Month) {
        self.cursor = month.first_day();
    }

    /// Moves by `days`, clamped to the month being displayed.
    pub fn shift(&mut self, days: i64, month: Month) {
        let moved = self.cursor + Duration::days(days);
        self.cursor = moved.clamp(month.first_day(), month.last_day());
    }

    pub fn cursor_day(&self) -> DayKey {
        DayKey::from_date(self.cursor)
    }
}

// ---------------------------------------------------------------------------
// Tournament list
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct TournamentListState {
    pub selected: usize,
    pub expanded: HashSet<i64>,
    pub scroll_offset: u16,
}

impl TournamentListState {
    pub fn reset(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    pub fn down(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn toggle_expanded(&mut self, tournament_id: i64) {
        if !self.expanded.remove(&tournament_id) {
            self.expanded.insert(tournament_id);
        }
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

pub struct AppState {
    pub focus: Focus,
    pub show_help: bool,
    pub show_logs: bool,
    pub schedule: ScheduleState,
    pub sports: SportsState,
    pub calendar: CalendarState,
    pub list: TournamentListState,
    pub loading: LoadingState,
}

impl AppState {
    pub fn new(window: MonthWindow, today: NaiveDate) -> Self {
        let schedule = ScheduleState::new(window, today);
        let calendar = CalendarState::new(schedule.selection.displayed_month);
        Self {
            focus: Focus::default(),
            show_help: false,
            show_logs: false,
            schedule,
            sports: SportsState::default(),
            calendar,
            list: TournamentListState::default(),
            loading: LoadingState::default(),
        }
    }

    pub fn change_month(&mut self, change: impl FnOnce(&mut SelectionState, &MonthWindow) -> MonthChange) {
        let ScheduleState { selection, window, .. } = &mut self.schedule;
        if change(&mut *selection, &*window) == MonthChange::Applied {
            self.calendar.reset_to(selection.displayed_month);
            self.list.reset();
        }
    }
}
