use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, Focus};
use crate::state::messages::NetworkRequest;
use crate::state::selection::SelectionState;
use chrono::NaiveDate;
use log::{LevelFilter, info};
use stapubox_api::time::now_civil;
use stapubox_api::{ScheduleSnapshot, Sport};

pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Warn;

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new() -> Self {
        let settings = AppSettings::load();
        let level = settings.log_level.unwrap_or(DEFAULT_LOG_LEVEL);
        log::set_max_level(level);
        tui_logger::set_default_level(level);

        Self::with_settings(settings, now_civil().date_naive())
    }

    pub fn with_settings(settings: AppSettings, today: NaiveDate) -> Self {
        let state = AppState::new(settings.window.clone(), today);
        Self { settings, state }
    }

    /// Requests issued once the UI is up: the sports list and the first
    /// schedule snapshot, on independent streams.
    pub fn start_up(&mut self) -> [NetworkRequest; 2] {
        info!("fetching from {}", self.settings.base_url());
        self.state.sports.loading = true;
        [NetworkRequest::LoadSports, self.reload()]
    }

    pub fn reload(&mut self) -> NetworkRequest {
        let generation = self.state.schedule.begin_reload();
        NetworkRequest::LoadSchedule { generation }
    }

    // -----------------------------------------------------------------------
    // Network response handlers: called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_schedule_loaded(&mut self, generation: u64, snapshot: ScheduleSnapshot) {
        if self.state.schedule.commit_snapshot(generation, snapshot) {
            self.clamp_list();
        }
    }

    pub fn on_schedule_failed(&mut self, generation: u64, message: String) {
        if self.state.schedule.commit_failure(generation, message) {
            self.state.list.reset();
        }
    }

    pub fn on_sports_loaded(&mut self, sports: Vec<Sport>) {
        self.state.sports.load(sports);
    }

    pub fn on_sports_failed(&mut self, message: String) {
        self.state.sports.fail(message);
    }

    // -----------------------------------------------------------------------
    // Sport selector
    // -----------------------------------------------------------------------

    pub fn sports_down(&mut self) {
        self.state.sports.cursor_down();
    }

    pub fn sports_up(&mut self) {
        self.state.sports.cursor_up();
    }

    pub fn select_sport(&mut self) {
        let sport = self.state.sports.filter_at_cursor();
        self.state.schedule.selection.set_sport(sport);
        self.state.list.reset();
    }

    // -----------------------------------------------------------------------
    // Calendar
    // -----------------------------------------------------------------------

    pub fn next_month(&mut self) {
        self.state.change_month(SelectionState::next_month);
    }

    pub fn prev_month(&mut self) {
        self.state.change_month(SelectionState::prev_month);
    }

    pub fn move_calendar_cursor(&mut self, days: i64) {
        let month = self.state.schedule.selection.displayed_month;
        self.state.calendar.shift(days, month);
    }

    pub fn toggle_cursor_day(&mut self) {
        let day = self.state.calendar.cursor_day();
        self.state.schedule.selection.toggle_day(day);
        self.state.list.reset();
    }

    pub fn clear_day(&mut self) {
        self.state.schedule.selection.clear_day();
        self.state.list.reset();
    }

    // -----------------------------------------------------------------------
    // Tournament list
    // -----------------------------------------------------------------------

    pub fn list_down(&mut self) {
        let len = self.state.schedule.view().visible.len();
        self.state.list.down(len);
    }

    pub fn list_up(&mut self) {
        self.state.list.up();
    }

    pub fn toggle_selected_card(&mut self) {
        let id = self
            .state
            .schedule
            .view()
            .visible
            .get(self.state.list.selected)
            .map(|t| t.id);
        if let Some(id) = id {
            self.state.list.toggle_expanded(id);
        }
    }

    fn clamp_list(&mut self) {
        let len = self.state.schedule.view().visible.len();
        if self.state.list.selected >= len {
            self.state.list.reset();
        }
    }

    // -----------------------------------------------------------------------
    // Chrome
    // -----------------------------------------------------------------------

    pub fn cycle_focus(&mut self) {
        self.state.focus = self.state.focus.next();
    }

    pub fn focus(&self) -> Focus {
        self.state.focus
    }

    pub fn toggle_help(&mut self) {
        self.state.show_help = !self.state.show_help;
    }

    pub fn exit_help(&mut self) -> bool {
        std::mem::replace(&mut self.state.show_help, false)
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    /// Called every 80ms from the AnimationTick event.
    pub fn advance_animation(&mut self) {
        let loading = self.state.schedule.loading || self.state.sports.loading;
        let failed = self.state.schedule.last_error.is_some() || self.state.sports.last_error.is_some();
        self.state.loading.tick(loading, failed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::projection::EmptyReason;
    use stapubox_api::{SportFilter, SportGroup, Tournament};

    fn app() -> App {
        App::with_settings(AppSettings::default(), NaiveDate::from_ymd_opt(2025, 9, 1).unwrap())
    }

    fn generation(request: &NetworkRequest) -> u64 {
        match request {
            NetworkRequest::LoadSchedule { generation } => *generation,
            other => panic!("expected schedule request, got {other:?}"),
        }
    }

    fn cricket_snapshot() -> ScheduleSnapshot {
        ScheduleSnapshot {
            groups: vec![SportGroup {
                sport_id: Some(1),
                sport_name: "Cricket".into(),
                tournaments: vec![Tournament {
                    id: 1,
                    name: "Monsoon Cup".into(),
                    start_date: "2025-09-15T10:00:00Z".into(),
                    ..Default::default()
                }],
            }],
        }
    }

    fn loaded_app() -> App {
        let mut app = app();
        let [sports, schedule] = app.start_up();
        assert!(matches!(sports, NetworkRequest::LoadSports));
        app.on_sports_loaded(vec![
            Sport { id: 1, name: "Cricket".into() },
            Sport { id: 2, name: "Tennis".into() },
        ]);
        app.on_schedule_loaded(generation(&schedule), cricket_snapshot());
        app
    }

    fn pick_sport(app: &mut App, position: usize) {
        app.state.sports.cursor = position;
        app.select_sport();
    }

    #[test]
    fn selecting_cricket_shows_its_tournament() {
        let mut app = loaded_app();
        pick_sport(&mut app, 1);
        assert_eq!(app.state.schedule.selection.sport, SportFilter::Sport(1));

        let view = app.state.schedule.view();
        assert_eq!(view.visible.len(), 1);
        assert_eq!(view.visible[0].name, "Monsoon Cup");
        let days: Vec<_> = view.highlighted_days.iter().map(ToString::to_string).collect();
        assert_eq!(days, vec!["2025-09-15"]);
    }

    #[test]
    fn selecting_another_sport_reports_month_miss() {
        let mut app = loaded_app();
        pick_sport(&mut app, 2);
        let view = app.state.schedule.view();
        assert!(view.visible.is_empty());
        assert!(view.highlighted_days.is_empty());
        assert_eq!(view.empty_reason, EmptyReason::NoMonthMatch);
    }

    #[test]
    fn toggled_day_resets_when_fetch_fails() {
        let mut app = loaded_app();
        app.move_calendar_cursor(14);
        app.toggle_cursor_day();
        assert_eq!(app.state.schedule.selection.active_day.map(|d| d.to_string()).as_deref(), Some("2025-09-15"));

        let request = app.reload();
        app.on_schedule_failed(generation(&request), "HTTP 503".into());
        let view = app.state.schedule.view();
        assert_eq!(view.active_day, None);
        assert!(view.visible.is_empty());
        assert_eq!(view.empty_reason, EmptyReason::NoMonthMatch);
    }

    #[test]
    fn late_response_from_superseded_reload_is_ignored() {
        let mut app = loaded_app();
        let slow = generation(&app.reload());
        let fast = generation(&app.reload());

        app.on_schedule_loaded(fast, cricket_snapshot());
        app.on_schedule_loaded(slow, ScheduleSnapshot::default());
        app.on_schedule_failed(slow, "connection reset".into());

        assert_eq!(app.state.schedule.view().visible.len(), 1);
        assert!(app.state.schedule.last_error.is_none());
        assert!(!app.state.schedule.loading);
    }

    #[test]
    fn loading_reason_shows_until_first_snapshot() {
        let mut app = app();
        let [_, schedule] = app.start_up();
        assert_eq!(app.state.schedule.view().empty_reason, EmptyReason::Loading);
        app.on_schedule_loaded(generation(&schedule), ScheduleSnapshot::default());
        assert_eq!(app.state.schedule.view().empty_reason, EmptyReason::NoMonthMatch);
    }

    #[test]
    fn sports_failure_does_not_block_schedule() {
        let mut app = app();
        let [_, schedule] = app.start_up();
        app.on_sports_failed("timeout".into());
        app.on_schedule_loaded(generation(&schedule), cricket_snapshot());
        assert_eq!(app.state.sports.options().len(), 1);
        assert_eq!(app.state.schedule.view().visible.len(), 1);
    }

    #[test]
    fn month_stepping_stops_at_window_edges() {
        let mut app = loaded_app();
        app.next_month();
        app.next_month();
        assert_eq!(app.state.schedule.selection.displayed_month.to_string(), "2025-10");
        app.prev_month();
        app.prev_month();
        app.prev_month();
        assert_eq!(app.state.schedule.selection.displayed_month.to_string(), "2025-08");
    }

    #[test]
    fn month_change_drops_active_day_and_resets_cursor() {
        let mut app = loaded_app();
        app.move_calendar_cursor(14);
        app.toggle_cursor_day();
        app.next_month();
        assert_eq!(app.state.schedule.selection.active_day, None);
        assert_eq!(app.state.calendar.cursor, NaiveDate::from_ymd_opt(2025, 10, 1).unwrap());
    }

    #[test]
    fn sport_change_keeps_active_day() {
        let mut app = loaded_app();
        app.move_calendar_cursor(14);
        app.toggle_cursor_day();
        pick_sport(&mut app, 2);
        assert!(app.state.schedule.selection.active_day.is_some());
        assert_eq!(app.state.schedule.view().empty_reason, EmptyReason::NoDayMatch);
    }

    #[test]
    fn enter_on_card_expands_it() {
        let mut app = loaded_app();
        app.toggle_selected_card();
        assert!(app.state.list.expanded.contains(&1));
        app.list_down();
        assert_eq!(app.state.list.selected, 0);
    }

    #[test]
    fn animation_pins_error_glyph_after_failure() {
        let mut app = app();
        let [_, schedule] = app.start_up();
        app.advance_animation();
        assert!(app.state.loading.is_loading);

        app.on_sports_loaded(Vec::new());
        app.on_schedule_failed(generation(&schedule), "boom".into());
        app.advance_animation();
        assert!(!app.state.loading.is_loading);
        assert_eq!(app.state.loading.spinner_char, crate::state::network::ERROR_CHAR);
    }

    #[test]
    fn focus_cycles_through_panes() {
        let mut app = app();
        assert_eq!(app.focus(), Focus::Sports);
        app.cycle_focus();
        app.cycle_focus();
        assert_eq!(app.focus(), Focus::Tournaments);
        app.cycle_focus();
        assert_eq!(app.focus(), Focus::Sports);
    }
}
