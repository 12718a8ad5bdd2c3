use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::App;
use crate::components::calendar::MonthCalendar;
use crate::components::tournament_card::card_lines;
use crate::state::app_state::Focus;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::state::projection::{EmptyReason, ViewModel};
use crate::ui::layout::LayoutAreas;
use stapubox_api::SportFilter;

const HELP_TEXT: &str = "\
q / Ctrl-C   quit
Tab          cycle focus: sports, calendar, tournaments
j / k        move within the focused pane
Enter        select sport / toggle day / expand card
space        toggle the day under the cursor
h / l        move the calendar cursor by a day
[ ] or p n   previous / next month
Esc          clear the selected day
R            reload the schedule
\"            toggle log pane
f            toggle full screen
?            close this help";

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let _ = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_sports(f, layout.header, app);
        }

        draw_calendar(f, layout.calendar, app);
        draw_status(f, layout.status, app);
        draw_tournaments(f, layout.list, app);

        if app.state.show_logs {
            draw_logs(f, layout.logs);
        }
        if app.state.show_help {
            draw_help(f, f.area());
        }

        draw_loading_spinner(f, f.area(), app, app.state.loading);
    });
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn focus_color(app: &App, pane: Focus) -> Color {
    if app.focus() == pane { Color::Cyan } else { Color::DarkGray }
}

fn draw_sports(f: &mut Frame, header: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;
    let border_style = Style::default().fg(focus_color(app, Focus::Sports));
    let sports = &app.state.sports;

    let options = sports.options();
    let applied = app.state.schedule.selection.sport;
    let index = &app.state.schedule.index;
    let titles: Vec<Line> = options
        .iter()
        .map(|(filter, name)| {
            let label = match filter {
                SportFilter::All => name.to_string(),
                SportFilter::Sport(id) => format!("{name} ({})", index.sport_total(*id)),
            };
            if *filter == applied {
                Line::from(Span::styled(label, Style::default().fg(Color::Yellow)))
            } else {
                Line::from(label)
            }
        })
        .collect();

    let mut block = Block::default()
        .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
        .border_type(border_type)
        .border_style(border_style)
        .title(" Sport ");
    if sports.loading {
        block = block.title_bottom(" loading sports... ");
    } else if sports.last_error.is_some() {
        block = block.title_bottom(Span::styled(" sports unavailable ", Style::default().fg(Color::Red)));
    }

    let tabs = Tabs::new(titles)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(sports.cursor)
        .style(style);
    f.render_widget(tabs, header[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type)
                .border_style(border_style),
        )
        .style(style);
    f.render_widget(help, header[1]);
}

fn draw_calendar(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(focus_color(app, Focus::Calendar)).title(" Calendar ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let schedule = &app.state.schedule;
    let view = schedule.view();
    let month = view.displayed_month;
    let cursor = (app.focus() == Focus::Calendar).then_some(app.state.calendar.cursor);

    f.render_widget(
        MonthCalendar {
            month,
            highlighted: &view.highlighted_days,
            active_day: view.active_day,
            cursor,
            has_prev: schedule.window.before(month).is_some(),
            has_next: schedule.window.after(month).is_some(),
        },
        inner,
    );
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let schedule = &app.state.schedule;
    let selection = &schedule.selection;
    let label = Style::default().fg(Color::DarkGray);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("sport  ", label),
            Span::raw(selection.sport.label(&app.state.sports.sports)),
        ]),
        Line::from(vec![
            Span::styled("month  ", label),
            Span::raw(selection.displayed_month.to_string()),
        ]),
        Line::from(vec![
            Span::styled("range  ", label),
            Span::raw(format!(
                "{} to {}",
                schedule.window.min_date().format("%d %b"),
                schedule.window.max_date().format("%d %b %Y")
            )),
        ]),
        Line::from(vec![
            Span::styled("day    ", label),
            Span::raw(selection.active_day.map_or_else(|| "-".to_string(), |d| d.to_string())),
        ]),
    ];
    if schedule.index.is_empty() && !schedule.loading && schedule.last_error.is_none() {
        lines.push(Line::styled("schedule is empty", Style::default().fg(Color::Yellow)));
    }
    if schedule.index.dropped() > 0 {
        lines.push(Line::styled(
            format!("{} without a start date", schedule.index.dropped()),
            Style::default().fg(Color::Yellow),
        ));
    }
    if let Some(err) = schedule.last_error.as_deref() {
        lines.push(Line::styled(format!("fetch failed: {err}"), Style::default().fg(Color::Red)));
    }

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

fn draw_tournaments(f: &mut Frame, area: Rect, app: &mut App) {
    let block = default_border(focus_color(app, Focus::Tournaments)).title(" Tournaments ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let view = app.state.schedule.view();
    if view.visible.is_empty() {
        let error = app.state.schedule.last_error.as_deref();
        draw_empty(f, inner, &view, error);
        return;
    }

    let list = &app.state.list;
    let mut lines = Vec::new();
    let mut selected_span = (0, 0);
    for (i, tournament) in view.visible.iter().enumerate() {
        let selected = i == list.selected && app.state.focus == Focus::Tournaments;
        let card = card_lines(tournament, selected, list.expanded.contains(&tournament.id));
        if i == list.selected {
            selected_span = (lines.len() as u16, card.len() as u16);
        }
        lines.extend(card);
    }
    drop(view);

    let scroll = scroll_to_show(app.state.list.scroll_offset, selected_span, inner.height);
    app.state.list.scroll_offset = scroll;
    f.render_widget(Paragraph::new(lines).scroll((scroll, 0)), inner);
}

/// Smallest change to `offset` that keeps the selected card on screen.
fn scroll_to_show(offset: u16, (start, len): (u16, u16), height: u16) -> u16 {
    if start < offset {
        start
    } else if start + len > offset + height {
        (start + len).saturating_sub(height).min(start)
    } else {
        offset
    }
}

fn draw_empty(f: &mut Frame, area: Rect, view: &ViewModel<'_>, error: Option<&str>) {
    let dim = Style::default().fg(Color::DarkGray);
    let mut lines = match view.empty_reason {
        EmptyReason::Loading => vec![Line::from("Loading tournaments...")],
        EmptyReason::NoDayMatch => {
            let day = view.active_day.map(|d| d.to_string()).unwrap_or_default();
            vec![
                Line::from(format!("No tournaments on {day}")),
                Line::styled("Select a different date or sport", dim),
            ]
        }
        EmptyReason::NoMonthMatch | EmptyReason::None => vec![Line::from(
            "No tournaments available for selected sport in the current date range",
        )],
    };
    if let Some(err) = error {
        lines.push(Line::from(""));
        lines.push(Line::styled(err.to_owned(), Style::default().fg(Color::Red)));
    }

    let [_, body, _] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(lines.len() as u16 + 1), Constraint::Fill(1)])
            .areas(area);
    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).wrap(Wrap { trim: true }),
        body,
    );
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Cyan))
        .style_debug(Style::default().fg(Color::Gray))
        .style_trace(Style::default().fg(Color::DarkGray));
    f.render_widget(logs, area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let [_, column, _] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(64), Constraint::Fill(1)]).areas(area);
    let [_, popup, _] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(15), Constraint::Fill(1)]).areas(column);

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(HELP_TEXT).block(default_border(Color::White).title(" Help ")),
        popup,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_follows_selected_card() {
        assert_eq!(scroll_to_show(0, (0, 4), 10), 0);
        assert_eq!(scroll_to_show(0, (12, 4), 10), 6);
        assert_eq!(scroll_to_show(8, (4, 4), 10), 4);
        // A card taller than the pane pins its first line to the top.
        assert_eq!(scroll_to_show(0, (5, 30), 10), 5);
    }
}
