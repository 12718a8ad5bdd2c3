use crate::state::selection::MonthWindow;
use log::{LevelFilter, warn};
use stapubox_api::client::{MOCK_BASE, STAPUBOX_BASE, StapuboxApi};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub use_dev: bool,
    pub api_base: Option<String>,
    pub schedule_json: Option<PathBuf>,
    pub sports_json: Option<PathBuf>,
    /// Per-request HTTP timeout; the client default applies when unset.
    pub timeout: Option<Duration>,
    pub window: MonthWindow,
}

impl AppSettings {
    /// Settings come from `TOURCAL_*` environment variables.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let window = match get("TOURCAL_MONTHS") {
            Some(list) => MonthWindow::parse(&list).unwrap_or_else(|| {
                warn!("TOURCAL_MONTHS={list:?} is not an ascending YYYY-MM list, using default window");
                MonthWindow::default()
            }),
            None => MonthWindow::default(),
        };

        let log_level = get("TOURCAL_LOG").and_then(|level| match level.parse::<LevelFilter>() {
            Ok(level) => Some(level),
            Err(_) => {
                warn!("TOURCAL_LOG={level:?} is not a log level");
                None
            }
        });

        let timeout = get("TOURCAL_TIMEOUT").and_then(|secs| match secs.parse::<u64>() {
            Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
            _ => {
                warn!("TOURCAL_TIMEOUT={secs:?} is not a positive number of seconds");
                None
            }
        });

        Self {
            full_screen: false,
            log_level,
            use_dev: get("TOURCAL_USE_DEV").is_some_and(|v| matches!(v.as_str(), "1" | "true" | "yes")),
            api_base: get("TOURCAL_API_BASE"),
            schedule_json: get("TOURCAL_SCHEDULE_JSON").map(PathBuf::from),
            sports_json: get("TOURCAL_SPORTS_JSON").map(PathBuf::from),
            timeout,
            window,
        }
    }

    pub fn base_url(&self) -> &str {
        match (&self.api_base, self.use_dev) {
            (Some(base), _) => base,
            (None, true) => MOCK_BASE,
            (None, false) => STAPUBOX_BASE,
        }
    }

    pub fn api_client(&self) -> StapuboxApi {
        let mut client = StapuboxApi::new().with_base_url(self.base_url());
        if let Some(timeout) = self.timeout {
            client = client.with_timeout(timeout);
        }
        if let Some(path) = &self.schedule_json {
            client = client.with_schedule_file(path);
        }
        if let Some(path) = &self.sports_json {
            client = client.with_sports_file(path);
        }
        client
    }
}
