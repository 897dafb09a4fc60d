//! Running state for one player's pass over a telemetry stream.
//!
//! `PlayerState` is owned by a single reduction. The reducer mutates it once
//! per event; `finish` turns it into the immutable output records.

use std::collections::{BTreeMap, HashMap};

use dropzone_telemetry::{Character, GameState, Location};

use crate::types::{
    CombatStats, HealingItemStats, HealingStats, MovementStats, PlayerMatchStats, PlayerTimeline,
};
use crate::weapons::WeaponAggregator;

/// Mutable accumulators for one player, updated by the reducer.
#[derive(Debug, Default)]
pub struct PlayerState {
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub headshot_kills: u32,
    pub damage_dealt: f64,
    pub damage_taken: f64,
    pub shots_fired: u32,
    pub shots_hit: u32,

    /// Metres.
    pub kill_distance_total: f64,
    /// Metres.
    pub longest_kill: f64,

    /// Metres.
    pub total_distance: f64,
    pub vehicle_distance: f64,
    pub swim_distance: f64,
    /// Seconds.
    pub time_in_vehicle: f64,

    pub health_used: f64,
    pub boost_used: u32,
    pub healing_items: BTreeMap<String, HealingItemStats>,

    pub weapons: WeaponAggregator,
    pub timeline: Vec<PlayerTimeline>,

    /// First non-empty account id seen on a character with the target name.
    pub account_id: Option<String>,
    /// Assist credits from v2 kills, by account id. Counted at the end once
    /// the account id is known.
    pub assist_account_ids: Vec<String>,

    pub last_position: Option<Location>,
    /// Earliest and latest epoch ms of any event involving the player.
    pub first_seen: Option<i64>,
    pub last_seen: Option<i64>,
    /// Timestamped zone sightings: (epoch ms, inside the blue zone).
    pub zone_sightings: Vec<(i64, bool)>,
    /// Latest periodic snapshot that carried a safe zone.
    pub safe_zone: Option<GameState>,
    /// Open vehicle rides: instance key -> ride start.
    pub vehicle_rides: HashMap<String, Option<i64>>,
    /// `Some` while swimming; holds the swim start when it had a timestamp.
    pub swim_started: Option<Option<i64>>,

    /// Most recent alive-player count seen anywhere in the stream.
    pub alive_players: Option<u32>,
    /// Rank reported by the kill that eliminated the player.
    pub rank: Option<u32>,
    /// Ranking from the match-end roster.
    pub final_ranking: Option<u32>,
    /// Alive-player count when the player died.
    pub alive_at_death: Option<u32>,
    pub death_time: Option<i64>,

    pub match_start: Option<i64>,
    pub match_end: Option<i64>,
}

/// Everything a reduction produces for one player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerReport {
    pub stats: PlayerMatchStats,
    /// Sorted ascending by time.
    pub timeline: Vec<PlayerTimeline>,
    pub account_id: Option<String>,
}

impl PlayerState {
    /// Note a character carrying the target name. Resolves the account id
    /// and, when the event is timestamped, the first/last seen markers.
    pub fn sighted(&mut self, character: &Character, timestamp: Option<i64>) {
        if self.account_id.is_none() {
            self.account_id = character.account().map(str::to_string);
        }
        if let Some(ts) = timestamp {
            self.first_seen = Some(self.first_seen.map_or(ts, |t| t.min(ts)));
            self.last_seen = Some(self.last_seen.map_or(ts, |t| t.max(ts)));
        }
    }

    /// End of the player's match: death, match end, last sighting, match start.
    fn end_time(&self, now: i64) -> i64 {
        self.death_time
            .or(self.match_end)
            .or(self.last_seen)
            .or(self.match_start)
            .unwrap_or(now)
    }

    fn start_time(&self, now: i64) -> i64 {
        self.first_seen.or(self.match_start).unwrap_or(now)
    }

    fn placement(&self) -> u32 {
        if let Some(rank) = self.rank.or(self.final_ranking) {
            return rank;
        }
        if self.deaths > 0 {
            // Approximation: everyone still alive when the player went down
            // finished at or below them.
            return self.alive_at_death.unwrap_or(0);
        }
        1
    }

    /// Finalize into output records. `now` stands in for every missing end
    /// of the time chain.
    pub fn finish(mut self, now: i64) -> PlayerReport {
        let end = self.end_time(now);

        let time_in_blue_zone = blue_zone_secs(&mut self.zone_sightings, end);

        let survival_time = elapsed_secs(self.start_time(now), end);

        if let Some(account) = self.account_id.as_deref() {
            self.assists += self
                .assist_account_ids
                .iter()
                .filter(|id| id.as_str() == account)
                .count() as u32;
        }

        let per_kill = |total: f64| {
            if self.kills > 0 {
                total / self.kills as f64
            } else {
                0.0
            }
        };

        let combat = CombatStats {
            shots_fired: self.shots_fired,
            shots_hit: self.shots_hit,
            headshot_percentage: per_kill(self.headshot_kills as f64).clamp(0.0, 1.0),
            longest_kill: self.longest_kill,
            avg_kill_distance: per_kill(self.kill_distance_total),
            damage_per_kill: per_kill(self.damage_dealt),
        };

        let movement = MovementStats {
            total_distance: self.total_distance,
            vehicle_distance: self.vehicle_distance,
            swim_distance: self.swim_distance,
            foot_distance: (self.total_distance - self.vehicle_distance - self.swim_distance)
                .max(0.0),
            avg_speed: if survival_time > 0.0 {
                self.total_distance / (survival_time / 60.0)
            } else {
                0.0
            },
            time_in_vehicle: self.time_in_vehicle,
            time_in_blue_zone,
        };

        let stats = PlayerMatchStats {
            kills: self.kills,
            deaths: self.deaths,
            assists: self.assists,
            damage_dealt: self.damage_dealt,
            damage_taken: self.damage_taken,
            survival_time,
            placement: self.placement(),
            weapons: self.weapons.finish(),
            movement,
            healing: HealingStats {
                health_used: self.health_used,
                boost_used: self.boost_used,
                healing_items: std::mem::take(&mut self.healing_items),
            },
            combat,
        };

        let mut timeline = std::mem::take(&mut self.timeline);
        timeline.sort_by_key(|entry| entry.time);

        PlayerReport {
            stats,
            timeline,
            account_id: self.account_id,
        }
    }
}

/// Seconds in the blue zone. Sightings are put in time order first, so stream
/// order does not matter. Each in-zone sighting extends the stay from the
/// previous in-zone one; an out-of-zone sighting ends it; a stay still open
/// at the last sighting runs to `end`.
fn blue_zone_secs(sightings: &mut [(i64, bool)], end: i64) -> f64 {
    sightings.sort_by_key(|(at, _)| *at);

    let mut total = 0.0;
    let mut since = None;
    for &(at, inside) in sightings.iter() {
        if !inside {
            since = None;
            continue;
        }
        if let Some(from) = since {
            total += elapsed_secs(from, at);
        }
        since = Some(at);
    }
    if let Some(from) = since {
        total += elapsed_secs(from, end);
    }
    total
}

/// Non-negative seconds between two epoch-ms instants.
pub(crate) fn elapsed_secs(from: i64, to: i64) -> f64 {
    (to - from).max(0) as f64 / 1000.0
}
