use crate::wire::{GroupedTournamentResponse, MatchEntry, SportsResponse, TournamentEntry};
use crate::{Match, ScheduleSnapshot, Sport, SportGroup, Tournament};
use log::{debug, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const STAPUBOX_BASE: &str = "https://stapubox.com";
pub const MOCK_BASE: &str = "https://mockly.me/custom";
const SPORTS_PATH: &str = "/sportslist";
const TOURNAMENTS_PATH: &str = "/tournament/demo";

/// StapuBox API client: the sports list and the grouped tournament schedule.
#[derive(Debug, Clone)]
pub struct StapuboxApi {
    client: Client,
    base_url: String,
    timeout: Duration,
    schedule_file: Option<PathBuf>,
    sports_file: Option<PathBuf>,
}

impl Default for StapuboxApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("tourcal/0.1 (terminal tournament calendar)")
                .build()
                .unwrap_or_default(),
            base_url: STAPUBOX_BASE.to_owned(),
            timeout: Duration::from_secs(10),
            schedule_file: None,
            sports_file: None,
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    /// The server answered but reported a failure in its envelope.
    Remote(String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::Remote(msg) => write!(f, "Server error: {msg}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl StapuboxApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read the schedule from a local JSON snapshot instead of the network.
    pub fn with_schedule_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.schedule_file = Some(path.into());
        self
    }

    /// Read the sports list from a local JSON file instead of the network.
    pub fn with_sports_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sports_file = Some(path.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the full grouped schedule. Not filtered by sport; the caller
    /// narrows it when projecting.
    pub async fn fetch_schedule(&self) -> ApiResult<ScheduleSnapshot> {
        let raw: GroupedTournamentResponse = match &self.schedule_file {
            Some(path) => read_local(path)?,
            None => self.get(&format!("{}{TOURNAMENTS_PATH}", self.base_url)).await?,
        };
        map_schedule(raw)
    }

    /// Fetch the sports shown in the selector, in server order.
    pub async fn fetch_sports(&self) -> ApiResult<Vec<Sport>> {
        let raw: SportsResponse = match &self.sports_file {
            Some(path) => read_local(path)?,
            None => self.get(&format!("{}{SPORTS_PATH}", self.base_url)).await?,
        };
        Ok(map_sports(raw))
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        response
            .error_for_status()
            .map_err(|e| ApiError::Api(e, url.to_owned()))?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parsing(e, url.to_owned()))
    }
}

fn read_local<T: DeserializeOwned>(path: &Path) -> ApiResult<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ApiError::NotFound(format!("could not read {}: {e}", path.display())))?;
    serde_json::from_str(&content)
        .map_err(|e| ApiError::Other(format!("invalid json at {}: {e}", path.display())))
}

// ---------------------------------------------------------------------------
// Mapping: StapuBox wire types → clean domain types
// ---------------------------------------------------------------------------

fn map_schedule(raw: GroupedTournamentResponse) -> ApiResult<ScheduleSnapshot> {
    if let Some(err) = raw.err.filter(|e| !e.trim().is_empty()) {
        return Err(ApiError::Remote(err));
    }
    if let Some(status) = raw.status.as_deref()
        && !status.eq_ignore_ascii_case("success")
    {
        let msg = raw.msg.unwrap_or_default();
        return Err(ApiError::Remote(format!("status {status}: {msg}")));
    }

    let groups = raw
        .data
        .into_iter()
        .map(|g| SportGroup {
            sport_id: g.sport_id,
            sport_name: g.sport_name,
            tournaments: g.tournaments.into_iter().map(map_tournament).collect(),
        })
        .collect();
    Ok(ScheduleSnapshot { groups })
}

fn map_tournament(t: TournamentEntry) -> Tournament {
    Tournament {
        id: t.id,
        name: t.name,
        sport_id: None,
        sport_name: t.sport_name.unwrap_or_default(),
        level: t.level,
        start_date: t.start_date.unwrap_or_default(),
        end_date: t.end_date,
        matches: t.matches.unwrap_or_default().into_iter().map(map_match).collect(),
    }
}

fn map_match(m: MatchEntry) -> Match {
    Match {
        id: m.id,
        stage: m.stage,
        team_a: m.team_a,
        team_b: m.team_b,
        start_time: m.start_time.or(m.start_date),
        venue: m.venue,
        status: m.status,
    }
}

fn map_sports(raw: SportsResponse) -> Vec<Sport> {
    raw.data
        .into_iter()
        .filter_map(|entry| {
            let name = entry.sport_name.unwrap_or_default();
            match entry.sport_id {
                Some(id) => Some(Sport { id, name }),
                None => {
                    warn!("skipping sport {name:?}: unreadable sport_id");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEDULE_BODY: &str = r#"{
        "status": "success", "msg": "ok", "err": null,
        "data": [
            {"sport_id": 1, "sport_name": "Cricket", "tournaments": [
                {"id": 10, "name": "Monsoon Cup", "sport_name": "Kabaddi",
                 "tournament_img_url": "", "level": "national",
                 "start_date": "2025-09-15T10:00:00Z", "end_date": "2025-09-18T10:00:00Z",
                 "matches": [{"id": 100, "stage": "Final", "team_a": "Lions", "team_b": "Tigers",
                              "start_time": "2025-09-18T10:00:00Z", "venue": "Pune"}]}
            ]},
            {"sport_id": "2", "sport_name": "Tennis", "tournaments": []}
        ]
    }"#;

    #[tokio::test]
    async fn fetch_schedule_maps_groups() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/tournament/demo")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(SCHEDULE_BODY)
            .create_async()
            .await;

        let api = StapuboxApi::new().with_base_url(server.url());
        let snapshot = api.fetch_schedule().await.expect("schedule should load");
        mock.assert_async().await;

        assert_eq!(snapshot.groups.len(), 2);
        assert_eq!(snapshot.groups[1].sport_id, Some(2));
        let t = &snapshot.groups[0].tournaments[0];
        assert_eq!(t.name, "Monsoon Cup");
        assert_eq!(t.sport_name, "Kabaddi", "raw name is kept until indexing");
        assert_eq!(t.matches[0].title(), "Lions vs Tigers");
        assert_eq!(t.matches[0].venue_label(), "Pune");
    }

    #[tokio::test]
    async fn fetch_schedule_surfaces_http_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/tournament/demo")
            .with_status(503)
            .create_async()
            .await;

        let api = StapuboxApi::new().with_base_url(server.url());
        let err = api.fetch_schedule().await.unwrap_err();
        assert!(matches!(err, ApiError::Api(..)), "got {err}");
    }

    #[tokio::test]
    async fn fetch_schedule_surfaces_envelope_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/tournament/demo")
            .with_status(200)
            .with_body(r#"{"status":"error","msg":"nope","err":"backend down","data":[]}"#)
            .create_async()
            .await;

        let api = StapuboxApi::new().with_base_url(server.url());
        let err = api.fetch_schedule().await.unwrap_err();
        assert!(matches!(err, ApiError::Remote(ref m) if m == "backend down"));
    }

    #[tokio::test]
    async fn fetch_sports_skips_unreadable_ids() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/sportslist")
            .with_status(200)
            .with_body(
                r#"{"data":[{"sport_id":"1","sport_name":"Cricket"},
                            {"sport_id":null,"sport_name":"Ghost"},
                            {"sport_id":3,"sport_name":"Badminton"}]}"#,
            )
            .create_async()
            .await;

        let api = StapuboxApi::new().with_base_url(format!("{}/", server.url()));
        let sports = api.fetch_sports().await.expect("sports should load");
        let names: Vec<_> = sports.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Cricket", "Badminton"]);
        assert_eq!(sports[1].id, 3);
    }

    #[tokio::test]
    async fn local_schedule_file_replaces_network() {
        let path = std::env::temp_dir().join(format!("tourcal-schedule-{}.json", std::process::id()));
        std::fs::write(&path, SCHEDULE_BODY).unwrap();

        let api = StapuboxApi::new()
            .with_base_url("http://127.0.0.1:9")
            .with_schedule_file(&path);
        let snapshot = api.fetch_schedule().await.expect("local snapshot should load");
        assert_eq!(snapshot.tournament_count(), 1);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn match_start_falls_back_to_start_date() {
        let m = map_match(MatchEntry {
            id: 1,
            start_date: Some("2025-09-15T10:00:00Z".into()),
            ..Default::default()
        });
        assert_eq!(m.start_time.as_deref(), Some("2025-09-15T10:00:00Z"));
        assert_eq!(m.time_label(), "03:30 PM");
        assert_eq!(m.stage_label(), "Stage");
        assert_eq!(m.title(), "Team A vs Team B");
    }

    #[test]
    fn missing_status_is_not_an_error() {
        let snapshot = map_schedule(GroupedTournamentResponse::default()).unwrap();
        assert!(snapshot.is_empty());
    }
}
