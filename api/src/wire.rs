/// StapuBox raw wire types: serde shapes for deserializing API responses.
/// These map to the clean domain types in client.rs.
use crate::SportId;
use serde::{Deserialize, Deserializer};

// ---------------------------------------------------------------------------
// Grouped tournaments  (/tournament/demo)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct GroupedTournamentResponse {
    pub status: Option<String>,
    pub msg: Option<String>,
    pub err: Option<String>,
    #[serde(default)]
    pub data: Vec<SportGroupEntry>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SportGroupEntry {
    #[serde(default, deserialize_with = "flexible_id")]
    pub sport_id: Option<SportId>,
    #[serde(default)]
    pub sport_name: String,
    #[serde(default)]
    pub tournaments: Vec<TournamentEntry>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct TournamentEntry {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    /// Ignored by the index; the enclosing group's name wins.
    pub sport_name: Option<String>,
    pub level: Option<String>,
    pub start_date: Option<String>, // ISO 8601, zoned or naive UTC
    pub end_date: Option<String>,
    pub matches: Option<Vec<MatchEntry>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct MatchEntry {
    #[serde(default)]
    pub id: i64,
    pub stage: Option<String>,
    pub team_a: Option<String>,
    pub team_b: Option<String>,
    /// Some payloads name the kickoff `start_time`, others `start_date`.
    pub start_time: Option<String>,
    pub start_date: Option<String>,
    pub venue: Option<String>,
    pub status: Option<String>,
}

// ---------------------------------------------------------------------------
// Sports list  (/sportslist)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SportsResponse {
    #[serde(default)]
    pub data: Vec<SportEntry>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SportEntry {
    #[serde(default, deserialize_with = "flexible_id")]
    pub sport_id: Option<SportId>,
    pub sport_name: Option<String>,
}

/// Sport ids arrive as numbers on one endpoint and numeric strings on the
/// other. Anything unreadable becomes `None` instead of failing the payload.
fn flexible_id<'de, D>(deserializer: D) -> Result<Option<SportId>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Int(u64),
        Float(f64),
        Text(String),
    }

    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(raw.and_then(|r| match r {
        RawId::Int(n) => SportId::try_from(n).ok(),
        RawId::Float(f) if f.fract() == 0.0 && f >= 0.0 && f <= f64::from(SportId::MAX) => {
            Some(f as SportId)
        }
        RawId::Float(_) => None,
        RawId::Text(s) => s.trim().parse::<SportId>().ok(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sport_ids_accept_numbers_and_strings() {
        let raw: SportsResponse = serde_json::from_str(
            r#"{"data":[
                {"sport_id": 7, "sport_name": "Cricket"},
                {"sport_id": "12", "sport_name": "Tennis"},
                {"sport_id": "abc", "sport_name": "Broken"},
                {"sport_name": "Missing"}
            ]}"#,
        )
        .unwrap();
        let ids: Vec<_> = raw.data.iter().map(|e| e.sport_id).collect();
        assert_eq!(ids, vec![Some(7), Some(12), None, None]);
    }

    #[test]
    fn tournament_payload_tolerates_missing_optionals() {
        let raw: GroupedTournamentResponse = serde_json::from_str(
            r#"{"status":"success","msg":"ok","err":null,"data":[
                {"sport_id":1,"sport_name":"Cricket","tournaments":[
                    {"id":5,"name":"Cup","start_date":"2025-09-15T10:00:00Z",
                     "matches":[{"id":1,"team_a":"A","start_date":"2025-09-15T12:00:00Z"}]}
                ]}
            ]}"#,
        )
        .unwrap();
        assert!(raw.err.is_none());
        let t = &raw.data[0].tournaments[0];
        assert_eq!(t.id, 5);
        assert!(t.end_date.is_none());
        let m = &t.matches.as_ref().unwrap()[0];
        assert_eq!(m.start_date.as_deref(), Some("2025-09-15T12:00:00Z"));
        assert!(m.team_b.is_none());
    }
}
