mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::{App, DEFAULT_LOG_LEVEL};
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::NetworkWorker;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tokio::time::Duration;
use tui::{Terminal, backend::CrosstermBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if handle_cli_args() {
        return Ok(());
    }

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal();

    tui_logger::init_logger(log::LevelFilter::Trace)?;
    tui_logger::set_default_level(DEFAULT_LOG_LEVEL);

    let app = App::new();
    let client = app.settings.api_client();
    let app = Arc::new(Mutex::new(app));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(client, network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Animation tick thread: 80ms ≈ 12.5 FPS
    let anim_tx = ui_event_tx.clone();
    let animation_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(80));
        loop {
            interval.tick().await;
            if anim_tx.send(UiEvent::AnimationTick).await.is_err() {
                break;
            }
        }
    });

    // Trigger sports + schedule load on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, network_req_tx, network_resp_rx).await;

    input_handler.abort();
    network_task.abort();
    animation_task.abort();

    Ok(())
}

fn handle_cli_args() -> bool {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return false;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            true
        }
        "-V" | "--version" => {
            println!("tourcal {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "tourcal - sports tournament calendar terminal UI

Usage:
  tourcal
  tourcal --help
  tourcal --version

Environment:
  TOURCAL_USE_DEV        Use the mockly.me development mirror (1/true)
  TOURCAL_API_BASE       Override the API base URL
  TOURCAL_SCHEDULE_JSON  Path to local schedule JSON snapshot
  TOURCAL_SPORTS_JSON    Path to local sports list JSON
  TOURCAL_TIMEOUT        HTTP request timeout in seconds (default 10)
  TOURCAL_MONTHS         Comma-separated YYYY-MM months (default 2025-08,2025-09,2025-10)
  TOURCAL_LOG            Log level: error|warn|info|debug|trace (default warn)"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
) {
    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                if handle_ui_event(ui_event, &app, &network_requests).await {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard);
                }
            }

            Some(response) = network_responses.recv() => {
                handle_network_response(response, &app).await;
                let mut app_guard = app.lock().await;
                draw::draw(&mut terminal, &mut app_guard);
            }

            else => break,
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let requests = app.lock().await.start_up();
            for request in requests {
                let _ = network_requests.send(request).await;
            }
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
            true
        }
        UiEvent::Resize => true,
        UiEvent::AnimationTick => {
            let mut guard = app.lock().await;
            let was_loading = guard.state.loading.is_loading;
            guard.advance_animation();
            was_loading || guard.state.loading.is_loading
        }
    }
}

async fn handle_network_response(response: NetworkResponse, app: &Arc<Mutex<App>>) {
    let mut guard = app.lock().await;
    match response {
        NetworkResponse::ScheduleLoaded { generation, snapshot } => {
            guard.on_schedule_loaded(generation, snapshot);
        }
        NetworkResponse::ScheduleFailed { generation, message } => {
            guard.on_schedule_failed(generation, message);
        }
        NetworkResponse::SportsLoaded { sports } => guard.on_sports_loaded(sports),
        NetworkResponse::SportsFailed { message } => guard.on_sports_failed(message),
    }
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide).unwrap();
    execute!(stdout, terminal::EnterAlternateScreen).unwrap();
    execute!(stdout, terminal::Clear(terminal::ClearType::All)).unwrap();
    terminal::enable_raw_mode().unwrap();
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::MoveTo(0, 0)).unwrap();
    execute!(stdout, terminal::Clear(terminal::ClearType::All)).unwrap();
    execute!(stdout, terminal::LeaveAlternateScreen).unwrap();
    execute!(stdout, cursor::Show).unwrap();
    terminal::disable_raw_mode().unwrap();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
