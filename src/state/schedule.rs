use log::{debug, warn};
use stapubox_api::time::DayKey;
use stapubox_api::{ScheduleSnapshot, SportId, Tournament};
use std::collections::BTreeMap;

/// Day and sport lookups over one snapshot. Rebuilt from scratch whenever the
/// snapshot changes; never patched in place.
#[derive(Debug, Clone, Default)]
pub struct ScheduleIndex {
    /// Ordered by day; each day keeps snapshot iteration order.
    by_day: BTreeMap<DayKey, Vec<Tournament>>,
    /// Includes tournaments that could not be placed on a day.
    by_sport: BTreeMap<SportId, Vec<Tournament>>,
    /// Tournaments whose start date failed to normalize.
    dropped: usize,
}

impl ScheduleIndex {
    pub fn build(snapshot: &ScheduleSnapshot) -> Self {
        let mut index = Self::default();

        for group in &snapshot.groups {
            for raw in &group.tournaments {
                let mut tournament = raw.clone();
                tournament.sport_id = group.sport_id;
                tournament.sport_name = group.sport_name.clone();

                if let Some(id) = group.sport_id {
                    index.by_sport.entry(id).or_default().push(tournament.clone());
                }

                match DayKey::from_timestamp(Some(&tournament.start_date)) {
                    Some(day) => index.by_day.entry(day).or_default().push(tournament),
                    None => {
                        warn!(
                            "dropping tournament {} ({:?}) from calendar: unreadable start date {:?}",
                            tournament.id, tournament.name, tournament.start_date
                        );
                        index.dropped += 1;
                    }
                }
            }
        }

        debug!(
            "indexed {} days, {} sports, {} dropped",
            index.by_day.len(),
            index.by_sport.len(),
            index.dropped
        );
        index
    }

    pub fn by_day(&self) -> &BTreeMap<DayKey, Vec<Tournament>> {
        &self.by_day
    }

    /// Tournaments starting on `day`; empty for unknown days.
    pub fn day(&self, day: &DayKey) -> &[Tournament] {
        self.by_day.get(day).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn sport_total(&self, sport_id: SportId) -> usize {
        self.by_sport.get(&sport_id).map_or(0, Vec::len)
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn is_empty(&self) -> bool {
        self.by_day.is_empty() && self.by_sport.is_empty()
    }
}
