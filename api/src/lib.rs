pub mod client;
pub mod time;
pub mod wire;

// ---------------------------------------------------------------------------
// Domain types: clean model, independent of the StapuBox wire format
// ---------------------------------------------------------------------------

pub type SportId = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sport {
    pub id: SportId,
    pub name: String,
}

/// Sport selector value. `All` is its own variant so it can never be
/// mistaken for a numeric sport id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SportFilter {
    #[default]
    All,
    Sport(SportId),
}

impl SportFilter {
    /// `None` is a group whose id could not be read; only `All` accepts it.
    pub fn matches(&self, sport_id: Option<SportId>) -> bool {
        match self {
            SportFilter::All => true,
            SportFilter::Sport(id) => sport_id == Some(*id),
        }
    }

    pub fn label<'a>(&self, sports: &'a [Sport]) -> &'a str {
        match self {
            SportFilter::All => "ALL",
            SportFilter::Sport(id) => sports
                .iter()
                .find(|s| s.id == *id)
                .map(|s| s.name.as_str())
                .unwrap_or("Unknown Sport"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tournament {
    pub id: i64,
    pub name: String,
    /// Overwritten from the enclosing group when the schedule index is built.
    pub sport_id: Option<SportId>,
    pub sport_name: String,
    pub level: Option<String>, // "domestic", "international", "national", ...
    /// Raw server timestamp; all calendar keys derive from it.
    pub start_date: String,
    pub end_date: Option<String>,
    pub matches: Vec<Match>,
}

impl Tournament {
    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }

    pub fn date_range_label(&self) -> String {
        time::date_range_label(&self.start_date, self.end_date.as_deref())
    }

    pub fn level_label(&self) -> &str {
        self.level.as_deref().filter(|l| !l.trim().is_empty()).unwrap_or("Domestic")
    }

    pub fn sport_label(&self) -> &str {
        if self.sport_name.trim().is_empty() {
            "Unknown Sport"
        } else {
            &self.sport_name
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Match {
    pub id: i64,
    pub stage: Option<String>,
    pub team_a: Option<String>,
    pub team_b: Option<String>,
    pub start_time: Option<String>,
    pub venue: Option<String>,
    pub status: Option<String>,
}

impl Match {
    pub fn title(&self) -> String {
        format!(
            "{} vs {}",
            self.team_a.as_deref().unwrap_or("Team A"),
            self.team_b.as_deref().unwrap_or("Team B")
        )
    }

    pub fn stage_label(&self) -> &str {
        self.stage.as_deref().unwrap_or("Stage")
    }

    pub fn venue_label(&self) -> &str {
        self.venue.as_deref().unwrap_or(time::PLACEHOLDER)
    }

    /// Server-reported progress ("scheduled", "live", ...), if any.
    pub fn status_label(&self) -> Option<&str> {
        self.status.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn date_label(&self) -> String {
        time::date_label(self.start_time.as_deref())
    }

    pub fn time_label(&self) -> String {
        time::time_label(self.start_time.as_deref())
    }
}

/// One `(sport, tournaments)` group as delivered by the schedule endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SportGroup {
    pub sport_id: Option<SportId>,
    pub sport_name: String,
    pub tournaments: Vec<Tournament>,
}

/// A complete fetched dataset. Replaced wholesale on every fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleSnapshot {
    pub groups: Vec<SportGroup>,
}

impl ScheduleSnapshot {
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.tournaments.is_empty())
    }

    pub fn tournament_count(&self) -> usize {
        self.groups.iter().map(|g| g.tournaments.len()).sum()
    }
}
