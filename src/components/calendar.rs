use chrono::{Datelike, NaiveDate};
use stapubox_api::time::{DayKey, Month};
use std::collections::BTreeSet;
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::widgets::Widget;

/// Terminal columns per day cell: right-aligned day number plus a gap.
pub const CELL_WIDTH: u16 = 4;
const WEEKDAYS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];

/// One month grid, Monday first. Renders into the inner area of a block.
pub struct MonthCalendar<'a> {
    pub month: Month,
    pub highlighted: &'a BTreeSet<DayKey>,
    pub active_day: Option<DayKey>,
    /// Only set while the calendar has focus.
    pub cursor: Option<NaiveDate>,
    pub has_prev: bool,
    pub has_next: bool,
}

/// Column and week row of `date` within `month`'s grid.
pub fn cell_position(month: Month, date: NaiveDate) -> (u16, u16) {
    let offset = month.first_day().weekday().num_days_from_monday();
    let index = offset + date.day0();
    ((index % 7) as u16, (index / 7) as u16)
}

impl Widget for MonthCalendar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 7 * CELL_WIDTH || area.height < 3 {
            return;
        }

        self.render_title(area, buf);

        let header_style = Style::default().fg(Color::DarkGray);
        for (col, name) in WEEKDAYS.iter().enumerate() {
            let x = area.x + col as u16 * CELL_WIDTH + 1;
            buf.set_string(x, area.y + 1, name, header_style);
        }

        let grid_top = area.y + 2;
        let first = self.month.first_day();
        for date in first.iter_days().take(self.month.days() as usize) {
            let (col, row) = cell_position(self.month, date);
            let y = grid_top + row;
            if y >= area.bottom() {
                break;
            }
            let x = area.x + col * CELL_WIDTH;
            buf.set_string(x, y, format!("{:>3}", date.day()), self.day_style(date));
        }
    }
}

impl MonthCalendar<'_> {
    fn render_title(&self, area: Rect, buf: &mut Buffer) {
        let arrow = |enabled: bool| {
            if enabled {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            }
        };

        let title = self.month.title();
        let width = title.chars().count() as u16;
        let x = area.x + area.width.saturating_sub(width) / 2;
        buf.set_string(area.x, area.y, "‹", arrow(self.has_prev));
        buf.set_string(x, area.y, &title, Style::default().add_modifier(Modifier::BOLD));
        buf.set_string(area.right().saturating_sub(1), area.y, "›", arrow(self.has_next));
    }

    fn day_style(&self, date: NaiveDate) -> Style {
        let key = DayKey::from_date(date);
        let mut style = Style::default().fg(Color::Gray);
        if self.highlighted.contains(&key) {
            style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
        }
        if self.active_day == Some(key) {
            style = style.add_modifier(Modifier::REVERSED);
        }
        if self.cursor == Some(date) {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        style
    }
}
