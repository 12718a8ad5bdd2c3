use tui::layout::{Constraint, Layout, Rect, Size};
pub const HEADER_HEIGHT: u16 = 3;
/// Borders + month title + weekday row + six week rows.
pub const CALENDAR_HEIGHT: u16 = 10;
/// Borders + seven columns of four cells.
pub const CALENDAR_WIDTH: u16 = 30;
pub const LOG_PANE_HEIGHT: u16 = 10;

/// Pre-computed layout areas for the main draw loop.
pub struct LayoutAreas {
    pub header: [Rect; 2],
    pub calendar: Rect,
    pub status: Rect,
    pub list: Rect,
    pub logs: Rect,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false, false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool, show_logs: bool) {
        *self = Self::from_rect(area, full_screen, show_logs);
    }

    fn from_rect(area: Rect, full_screen: bool, show_logs: bool) -> Self {
        let (header, body) = if full_screen {
            ([Rect::ZERO, Rect::ZERO], area)
        } else {
            let [header, body] =
                Layout::vertical([Constraint::Length(HEADER_HEIGHT), Constraint::Fill(1)]).areas(area);
            (Self::split_header(header), body)
        };

        let (body, logs) = if show_logs {
            let [body, logs] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(LOG_PANE_HEIGHT)]).areas(body);
            (body, logs)
        } else {
            (body, Rect::ZERO)
        };

        let [left, list] =
            Layout::horizontal([Constraint::Length(CALENDAR_WIDTH), Constraint::Fill(1)]).areas(body);
        let [calendar, status] =
            Layout::vertical([Constraint::Length(CALENDAR_HEIGHT), Constraint::Fill(1)]).areas(left);

        LayoutAreas { header, calendar, status, list, logs }
    }

    fn split_header(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(85), Constraint::Percentage(15)]).areas(area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_screen_drops_header() {
        let areas = LayoutAreas::from_rect(Rect::new(0, 0, 100, 40), true, false);
        assert_eq!(areas.header, [Rect::ZERO, Rect::ZERO]);
        assert_eq!(areas.calendar.y, 0);
        assert_eq!(areas.calendar.width, CALENDAR_WIDTH);
        assert_eq!(areas.list.width, 100 - CALENDAR_WIDTH);
    }

    #[test]
    fn log_pane_takes_bottom_rows() {
        let areas = LayoutAreas::from_rect(Rect::new(0, 0, 100, 40), false, true);
        assert_eq!(areas.header[0].height, HEADER_HEIGHT);
        assert_eq!(areas.logs.height, LOG_PANE_HEIGHT);
        assert_eq!(areas.logs.y, 40 - LOG_PANE_HEIGHT);
        assert_eq!(areas.list.height, 40 - HEADER_HEIGHT - LOG_PANE_HEIGHT);
    }
}
