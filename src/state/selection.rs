use chrono::NaiveDate;
use log::{debug, warn};
use stapubox_api::SportFilter;
use stapubox_api::time::{DayKey, Month};

/// Months the calendar may display, inclusive and in order.
pub const DEFAULT_MONTHS: [Month; 3] = [
    Month::clamped(2025, 8),
    Month::clamped(2025, 9),
    Month::clamped(2025, 10),
];

// ---------------------------------------------------------------------------
// Supported month window
// ---------------------------------------------------------------------------

/// The configured set of months. Sole source of truth for month bounds;
/// never inferred from data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthWindow {
    months: Vec<Month>,
}

impl Default for MonthWindow {
    fn default() -> Self {
        Self { months: DEFAULT_MONTHS.to_vec() }
    }
}

impl MonthWindow {
    /// Requires a non-empty, strictly ascending list.
    pub fn new(months: Vec<Month>) -> Option<Self> {
        if months.is_empty() || months.windows(2).any(|w| w[0] >= w[1]) {
            return None;
        }
        Some(Self { months })
    }

    /// Parse a comma-separated `YYYY-MM` list, e.g. `2025-08,2025-09`.
    pub fn parse(list: &str) -> Option<Self> {
        let months = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<Month>())
            .collect::<Result<Vec<_>, _>>();
        match months {
            Ok(months) => Self::new(months),
            Err(e) => {
                warn!("{e}");
                None
            }
        }
    }

    pub fn contains(&self, month: Month) -> bool {
        self.months.contains(&month)
    }

    pub fn first(&self) -> Month {
        self.months[0]
    }

    pub fn last(&self) -> Month {
        self.months[self.months.len() - 1]
    }

    /// The window month following `month`, if any.
    pub fn after(&self, month: Month) -> Option<Month> {
        self.months.iter().copied().find(|m| *m > month)
    }

    /// The window month preceding `month`, if any.
    pub fn before(&self, month: Month) -> Option<Month> {
        self.months.iter().rev().copied().find(|m| *m < month)
    }

    pub fn min_date(&self) -> NaiveDate {
        self.first().first_day()
    }

    pub fn max_date(&self) -> NaiveDate {
        self.last().last_day()
    }
}

// ---------------------------------------------------------------------------
// Selection state machine
// ---------------------------------------------------------------------------

#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthChange {
    Applied,
    /// Target month is outside the window; state is unchanged.
    Rejected,
}

/// `{sport, displayed month, active day}`. Nothing else is hidden in here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    pub sport: SportFilter,
    pub displayed_month: Month,
    /// May point outside `displayed_month`; it persists until cleared.
    pub active_day: Option<DayKey>,
}

impl SelectionState {
    /// Start on the month containing `today`, or the window's first month
    /// when today is outside it.
    pub fn initial(today: NaiveDate, window: &MonthWindow) -> Self {
        let current = Month::of(today);
        let displayed_month = if window.contains(current) {
            current
        } else {
            window.first()
        };
        Self { sport: SportFilter::All, displayed_month, active_day: None }
    }

    /// Replaces the sport only. Month and day survive.
    pub fn set_sport(&mut self, sport: SportFilter) {
        debug!("sport filter -> {sport:?}");
        self.sport = sport;
    }

    /// A month change always drops the active day so the whole month shows.
    pub fn set_month(&mut self, month: Month, window: &MonthWindow) -> MonthChange {
        if !window.contains(month) {
            debug!("rejected month {month}: outside window");
            return MonthChange::Rejected;
        }
        self.displayed_month = month;
        self.active_day = None;
        MonthChange::Applied
    }

    /// Step to the adjacent window month; rejected at the last month.
    pub fn next_month(&mut self, window: &MonthWindow) -> MonthChange {
        let target = window.after(self.displayed_month).unwrap_or(self.displayed_month.succ());
        self.set_month(target, window)
    }

    /// Step to the adjacent window month; rejected at the first month.
    pub fn prev_month(&mut self, window: &MonthWindow) -> MonthChange {
        let target = window.before(self.displayed_month).unwrap_or(self.displayed_month.pred());
        self.set_month(target, window)
    }

    /// Selecting the active day again deselects it; any other day replaces it.
    pub fn toggle_day(&mut self, day: DayKey) {
        if self.active_day == Some(day) {
            self.active_day = None;
        } else {
            self.active_day = Some(day);
        }
    }

    pub fn clear_day(&mut self) {
        self.active_day = None;
    }
}
