use crate::app::App;
use crate::state::app_state::Focus;
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;

    if guard.state.show_help {
        match (key_event.code, key_event.modifiers) {
            (Char('q'), _) | (Char('c'), KeyModifiers::CONTROL) => {
                crate::cleanup_terminal();
                std::process::exit(0);
            }
            (KeyCode::Esc | Char('?'), _) => {
                guard.exit_help();
            }
            _ => {}
        }
        return;
    }

    match (guard.focus(), key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        (_, KeyCode::Tab, _) => guard.cycle_focus(),
        (_, Char('?'), _) => guard.toggle_help(),

        // Manual reload; the worker aborts whatever schedule fetch is in flight
        (_, Char('R'), _) => {
            let request = guard.reload();
            drop(guard);
            let _ = network_requests.send(request).await;
            return;
        }

        // Month paging works from any pane
        (_, Char(']') | Char('n'), _) => guard.next_month(),
        (_, Char('[') | Char('p'), _) => guard.prev_month(),

        // Sport selector
        (Focus::Sports, Char('j') | KeyCode::Down, _) => guard.sports_down(),
        (Focus::Sports, Char('k') | KeyCode::Up, _) => guard.sports_up(),
        (Focus::Sports, KeyCode::Enter, _) => guard.select_sport(),

        // Calendar cursor
        (Focus::Calendar, Char('h') | KeyCode::Left, _) => guard.move_calendar_cursor(-1),
        (Focus::Calendar, Char('l') | KeyCode::Right, _) => guard.move_calendar_cursor(1),
        (Focus::Calendar, Char('k') | KeyCode::Up, _) => guard.move_calendar_cursor(-7),
        (Focus::Calendar, Char('j') | KeyCode::Down, _) => guard.move_calendar_cursor(7),
        (Focus::Calendar, KeyCode::Enter | Char(' '), _) => guard.toggle_cursor_day(),
        (_, KeyCode::Esc, _) => guard.clear_day(),

        // Tournament list
        (Focus::Tournaments, Char('j') | KeyCode::Down, _) => guard.list_down(),
        (Focus::Tournaments, Char('k') | KeyCode::Up, _) => guard.list_up(),
        (Focus::Tournaments, KeyCode::Enter, _) => guard.toggle_selected_card(),

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}
