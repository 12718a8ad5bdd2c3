use crate::state::schedule::ScheduleIndex;
use crate::state::selection::{MonthWindow, SelectionState};
use stapubox_api::Tournament;
use stapubox_api::time::{DayKey, Month};
use std::collections::BTreeSet;

/// Why the visible list is empty. Advisory only; it never changes `visible`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyReason {
    #[default]
    None,
    Loading,
    NoDayMatch,
    NoMonthMatch,
}

#[derive(Debug, Clone, Default)]
pub struct Projection<'a> {
    pub visible: Vec<&'a Tournament>,
    pub highlighted_days: BTreeSet<DayKey>,
    pub empty_reason: EmptyReason,
}

/// Everything the renderer gets per frame. Borrows the index read-only.
#[derive(Debug, Clone)]
pub struct ViewModel<'a> {
    pub visible: Vec<&'a Tournament>,
    pub highlighted_days: BTreeSet<DayKey>,
    pub active_day: Option<DayKey>,
    pub displayed_month: Month,
    pub empty_reason: EmptyReason,
    pub is_loading: bool,
}

/// Sport filtering happens here and only here: the fetched snapshot always
/// carries every sport.
pub fn project<'a>(
    index: &'a ScheduleIndex,
    selection: &SelectionState,
    window: &MonthWindow,
) -> Projection<'a> {
    let sport = selection.sport;
    let for_sport = move |items: &'a [Tournament]| items.iter().filter(move |t| sport.matches(t.sport_id));

    let highlighted_days = index
        .by_day()
        .iter()
        .filter(|(_, items)| for_sport(items.as_slice()).next().is_some())
        .map(|(day, _)| *day)
        .collect();

    if !window.contains(selection.displayed_month) {
        return Projection {
            visible: Vec::new(),
            highlighted_days,
            empty_reason: EmptyReason::NoMonthMatch,
        };
    }

    let (visible, miss): (Vec<&Tournament>, EmptyReason) = match selection.active_day {
        Some(day) => (for_sport(index.day(&day)).collect(), EmptyReason::NoDayMatch),
        None => {
            let month = selection.displayed_month;
            let range = DayKey::from_date(month.first_day())..=DayKey::from_date(month.last_day());
            let visible = index
                .by_day()
                .range(range)
                .flat_map(|(_, items)| for_sport(items.as_slice()))
                .collect();
            (visible, EmptyReason::NoMonthMatch)
        }
    };

    let empty_reason = if visible.is_empty() { miss } else { EmptyReason::None };
    Projection { visible, highlighted_days, empty_reason }
}

pub fn view_model<'a>(
    index: &'a ScheduleIndex,
    selection: &SelectionState,
    window: &MonthWindow,
    is_loading: bool,
) -> ViewModel<'a> {
    let Projection { visible, highlighted_days, empty_reason } = project(index, selection, window);
    let empty_reason = if is_loading && visible.is_empty() {
        EmptyReason::Loading
    } else {
        empty_reason
    };
    ViewModel {
        visible,
        highlighted_days,
        active_day: selection.active_day,
        displayed_month: selection.displayed_month,
        empty_reason,
        is_loading,
    }
}
