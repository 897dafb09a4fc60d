//! Single-pass reduction of a telemetry stream into one player's stats.
//!
//! Every event is visited exactly once, in stream order. Events are not
//! assumed to be chronological; the timeline is sorted at the end. Missing
//! fields are skipped or defaulted, never an error.

use dropzone_telemetry::{distance_meters, to_meters, Character, EventKind, TelemetryEvent, Vehicle};

use crate::healing::use_duration;
use crate::state::{elapsed_secs, PlayerReport, PlayerState};
use crate::traits::Reducer;
use crate::types::{PlayerTimeline, Position, TimelineDetails, TimelineEvent};
use crate::weapons::normalize_weapon_id;

const HEADSHOT_REASON: &str = "HeadShot";

pub struct PlayerReducer {
    target: String,
}

impl PlayerReducer {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    /// Fold the whole stream and finalize. `now` (epoch ms) closes any time
    /// span the stream leaves open. Same input, same output.
    pub fn run(&self, events: &[TelemetryEvent], now: i64) -> PlayerReport {
        let mut state = PlayerState::default();
        for event in events {
            self.reduce(&mut state, event);
        }
        let report = state.finish(now);

        tracing::debug!(
            player = %self.target,
            kills = report.stats.kills,
            deaths = report.stats.deaths,
            timeline = report.timeline.len(),
            "Reduced player telemetry"
        );
        report
    }

    fn matches(&self, character: Option<&Character>) -> bool {
        character.is_some_and(|c| c.is(&self.target))
    }
}

/// Reduce `events` for `player_name`.
pub fn reduce_player(events: &[TelemetryEvent], player_name: &str) -> PlayerReport {
    PlayerReducer::new(player_name).run(events, chrono::Utc::now().timestamp_millis())
}

impl Reducer<TelemetryEvent, PlayerState> for PlayerReducer {
    fn reduce(&self, state: &mut PlayerState, event: &TelemetryEvent) {
        let ts = event.timestamp;
        let time = ts.unwrap_or(0);

        match &event.kind {
            // Match boundaries
            EventKind::MatchStart(start) => {
                if state.match_start.is_none() {
                    state.match_start = ts;
                }
                if let Some(c) = start
                    .characters
                    .iter()
                    .map(|entry| entry.character())
                    .find(|c| c.is(&self.target))
                {
                    state.sighted(c, None);
                }
            }
            EventKind::MatchEnd(end) => {
                if state.match_end.is_none() {
                    state.match_end = ts;
                }
                if let Some(c) = end
                    .characters
                    .iter()
                    .map(|entry| entry.character())
                    .find(|c| c.is(&self.target))
                {
                    state.sighted(c, None);
                    state.final_ranking = c
                        .ranking
                        .filter(|r| *r > 0)
                        .and_then(|r| u32::try_from(r).ok());
                }
            }

            // Zone and alive counts
            EventKind::GameStatePeriodic(periodic) => {
                if let Some(gs) = &periodic.game_state {
                    if gs.num_alive_players.is_some() {
                        state.alive_players = gs.num_alive_players;
                    }
                    if gs.safety_zone_position.is_some() && gs.safety_zone_radius.is_some() {
                        state.safe_zone = Some(gs.clone());
                    }
                }
            }

            // Movement
            EventKind::PlayerPosition(pos) => {
                if pos.num_alive_players.is_some() {
                    state.alive_players = pos.num_alive_players;
                }
                let Some(c) = pos.character.as_ref().filter(|c| c.is(&self.target)) else {
                    return;
                };
                state.sighted(c, ts);

                if let Some(loc) = c.location {
                    if let Some(prev) = &state.last_position {
                        state.total_distance += distance_meters(prev, &loc);
                    }
                    state.last_position = Some(loc);
                }

                let in_blue_zone = c.is_in_blue_zone.or_else(|| {
                    let loc = c.location?;
                    state.safe_zone.as_ref()?.outside_safe_zone(&loc)
                });
                if let (Some(inside), Some(at)) = (in_blue_zone, ts) {
                    state.zone_sightings.push((at, inside));
                }
            }

            // Kills
            EventKind::PlayerKill(kill) => {
                let weapon = kill.damage_causer_name.as_deref().unwrap_or_default();
                let headshot = kill.damage_reason.as_deref() == Some(HEADSHOT_REASON);
                let outcome = KillOutcome {
                    killer: kill.killer.as_ref(),
                    victim: kill.victim.as_ref(),
                    weapon,
                    headshot,
                    distance_m: to_meters(kill.distance),
                    placement: kill.victim_game_result.as_ref().and_then(|r| r.placement()),
                };
                self.apply_kill(state, &outcome, ts);

                if let Some(assistant) = kill.assistant.as_ref().filter(|a| a.is(&self.target)) {
                    state.sighted(assistant, ts);
                    state.assists += 1;
                }
            }
            EventKind::PlayerKillV2(kill) => {
                let info = kill.damage_info();
                let weapon = info
                    .and_then(|i| i.damage_causer_name.as_deref())
                    .unwrap_or_default();
                let headshot =
                    info.and_then(|i| i.damage_reason.as_deref()) == Some(HEADSHOT_REASON);
                let outcome = KillOutcome {
                    killer: kill.killer.as_ref(),
                    victim: kill.victim.as_ref(),
                    weapon,
                    headshot,
                    distance_m: to_meters(info.and_then(|i| i.distance)),
                    placement: kill.victim_game_result.as_ref().and_then(|r| r.placement()),
                };
                self.apply_kill(state, &outcome, ts);

                state
                    .assist_account_ids
                    .extend(kill.assists_account_id.iter().cloned());
            }

            // Damage
            EventKind::PlayerTakeDamage(hit) => {
                let damage = hit.damage.unwrap_or(0.0);
                let weapon = hit.damage_causer_name.as_deref().unwrap_or_default();

                if let Some(attacker) = hit.attacker.as_ref().filter(|c| c.is(&self.target)) {
                    state.sighted(attacker, ts);
                    state.damage_dealt += damage;
                    state.shots_hit += 1;
                    state.weapons.record_hit(weapon, damage);
                }
                if let Some(victim) = hit.victim.as_ref().filter(|c| c.is(&self.target)) {
                    state.sighted(victim, ts);
                    state.damage_taken += damage;
                    state.timeline.push(PlayerTimeline {
                        time,
                        event: TimelineEvent::DamageTaken,
                        position: position_of(victim),
                        details: Some(TimelineDetails::DamageTaken {
                            attacker: hit.attacker.as_ref().map(|a| a.name.clone()),
                            weapon: normalize_weapon_id(weapon),
                            damage,
                            reason: hit.damage_reason.clone(),
                        }),
                    });
                }
            }
            EventKind::WeaponFireCount(fire) => {
                let Some(c) = fire.character.as_ref().filter(|c| c.is(&self.target)) else {
                    return;
                };
                state.sighted(c, ts);
                let count = fire.fire_count.unwrap_or(0.0).max(0.0) as u32;
                let weapon = fire
                    .weapon_id
                    .as_deref()
                    .filter(|w| !w.is_empty())
                    .or(c.primary_weapon_first.as_deref())
                    .unwrap_or_default();
                state.shots_fired = state.shots_fired.saturating_add(count);
                state.weapons.record_shots(weapon, count);
            }

            // Healing
            EventKind::Heal(heal) => {
                let Some(c) = heal.character.as_ref().filter(|c| c.is(&self.target)) else {
                    return;
                };
                state.sighted(c, ts);
                let amount = heal.heal_amount.unwrap_or(0.0);
                state.health_used += amount;
                state.timeline.push(PlayerTimeline {
                    time,
                    event: TimelineEvent::Heal,
                    position: position_of(c),
                    details: Some(TimelineDetails::Heal {
                        item: item_name(heal.item.as_ref().map(|i| i.item_id.as_str())),
                        amount,
                    }),
                });
            }
            EventKind::ItemUse(used) => {
                let Some(c) = used.character.as_ref().filter(|c| c.is(&self.target)) else {
                    return;
                };
                state.sighted(c, ts);
                let Some(item) = used.item.as_ref().filter(|i| i.is_heal() || i.is_boost())
                else {
                    return;
                };

                let boost = item.is_boost();
                if boost {
                    state.boost_used += 1;
                }
                let entry = state
                    .healing_items
                    .entry(item.item_id.clone())
                    .or_default();
                entry.used += 1;
                entry.time += use_duration(&item.item_id);

                state.timeline.push(PlayerTimeline {
                    time,
                    event: TimelineEvent::ItemUse,
                    position: position_of(c),
                    details: Some(TimelineDetails::ItemUse {
                        item: item_name(Some(&item.item_id)),
                        boost,
                    }),
                });
            }

            // Vehicles
            EventKind::VehicleRide(ride) => {
                let Some(c) = ride.character.as_ref().filter(|c| c.is(&self.target)) else {
                    return;
                };
                state.sighted(c, ts);
                let key = ride
                    .vehicle
                    .as_ref()
                    .and_then(|v| v.instance_key())
                    .unwrap_or_else(|| seat_key(ride.seat_index));
                state.vehicle_rides.insert(key.clone(), ts);

                state.timeline.push(PlayerTimeline {
                    time,
                    event: TimelineEvent::VehicleEnter,
                    position: position_of(c),
                    details: Some(TimelineDetails::Vehicle {
                        vehicle: vehicle_name(ride.vehicle.as_ref(), &key),
                        distance: None,
                        duration: None,
                    }),
                });
            }
            EventKind::VehicleLeave(leave) => {
                let Some(c) = leave.character.as_ref().filter(|c| c.is(&self.target)) else {
                    return;
                };
                state.sighted(c, ts);
                let key = leave
                    .vehicle
                    .as_ref()
                    .and_then(|v| v.instance_key())
                    .unwrap_or_else(|| seat_key(leave.seat_index));

                let distance = to_meters(leave.ride_distance);
                state.vehicle_distance += distance;

                let duration = match (state.vehicle_rides.remove(&key), ts) {
                    (Some(Some(start)), Some(end)) => Some(elapsed_secs(start, end)),
                    _ => None,
                };
                if let Some(secs) = duration {
                    state.time_in_vehicle += secs;
                }

                state.timeline.push(PlayerTimeline {
                    time,
                    event: TimelineEvent::VehicleExit,
                    position: position_of(c),
                    details: Some(TimelineDetails::Vehicle {
                        vehicle: vehicle_name(leave.vehicle.as_ref(), &key),
                        distance: Some(distance),
                        duration,
                    }),
                });
            }

            // Swimming
            EventKind::SwimStart(swim) => {
                let Some(c) = swim.character.as_ref().filter(|c| c.is(&self.target)) else {
                    return;
                };
                state.sighted(c, ts);
                state.swim_started = Some(ts);
            }
            EventKind::SwimEnd(swim) => {
                let Some(c) = swim.character.as_ref().filter(|c| c.is(&self.target)) else {
                    return;
                };
                state.sighted(c, ts);
                let distance = to_meters(swim.swim_distance);
                state.swim_distance += distance;

                let duration = match (state.swim_started.take(), ts) {
                    (Some(Some(start)), Some(end)) => elapsed_secs(start, end),
                    _ => 0.0,
                };
                state.timeline.push(PlayerTimeline {
                    time,
                    event: TimelineEvent::SwimEnd,
                    position: position_of(c),
                    details: Some(TimelineDetails::Swim { distance, duration }),
                });
            }

            // Revives
            EventKind::PlayerRevive(revive) => {
                if let Some(reviver) = revive.reviver.as_ref().filter(|c| c.is(&self.target)) {
                    state.sighted(reviver, ts);
                    state.timeline.push(PlayerTimeline {
                        time,
                        event: TimelineEvent::Revive,
                        position: position_of(reviver),
                        details: Some(TimelineDetails::Revive {
                            other: name_of(revive.victim.as_ref()),
                        }),
                    });
                }
                if let Some(victim) = revive.victim.as_ref().filter(|c| c.is(&self.target)) {
                    state.sighted(victim, ts);
                    state.timeline.push(PlayerTimeline {
                        time,
                        event: TimelineEvent::Revived,
                        position: position_of(victim),
                        details: Some(TimelineDetails::Revive {
                            other: name_of(revive.reviver.as_ref()),
                        }),
                    });
                }
            }

            EventKind::Ignored { .. } => {}
        }
    }
}

/// The parts of a kill event both kill variants share.
struct KillOutcome<'a> {
    killer: Option<&'a Character>,
    victim: Option<&'a Character>,
    weapon: &'a str,
    headshot: bool,
    distance_m: f64,
    placement: Option<u32>,
}

impl PlayerReducer {
    fn apply_kill(&self, state: &mut PlayerState, kill: &KillOutcome<'_>, ts: Option<i64>) {
        let time = ts.unwrap_or(0);
        let victim_is_target = self.matches(kill.victim);

        if let Some(killer) = kill.killer.filter(|c| c.is(&self.target)) {
            state.sighted(killer, ts);
            // Suicides are deaths, not kills.
            if !victim_is_target {
                state.kills += 1;
                state.kill_distance_total += kill.distance_m;
                state.longest_kill = state.longest_kill.max(kill.distance_m);
                if kill.headshot {
                    state.headshot_kills += 1;
                }
                state.weapons.record_kill(kill.weapon, kill.headshot);
                state.timeline.push(PlayerTimeline {
                    time,
                    event: TimelineEvent::Kill,
                    position: position_of(killer),
                    details: Some(TimelineDetails::Kill {
                        victim: name_of(kill.victim),
                        weapon: normalize_weapon_id(kill.weapon),
                        distance: kill.distance_m,
                        headshot: kill.headshot,
                    }),
                });
            }
        }

        if let Some(victim) = kill.victim.filter(|c| c.is(&self.target)) {
            state.sighted(victim, ts);
            state.deaths += 1;
            if kill.placement.is_some() {
                state.rank = kill.placement;
            }
            if state.death_time.is_none() {
                state.death_time = ts;
                state.alive_at_death = state.alive_players;
            }
            state.timeline.push(PlayerTimeline {
                time,
                event: TimelineEvent::Death,
                position: position_of(victim),
                details: Some(TimelineDetails::Death {
                    killer: kill.killer.map(|k| k.name.clone()),
                    weapon: normalize_weapon_id(kill.weapon),
                    distance: kill.distance_m,
                    placement: kill.placement,
                }),
            });
        }
    }
}

fn position_of(character: &Character) -> Option<Position> {
    character.location.as_ref().map(Position::from)
}

fn name_of(character: Option<&Character>) -> String {
    character.map(|c| c.name.clone()).unwrap_or_default()
}

fn item_name(item_id: Option<&str>) -> String {
    item_id
        .filter(|id| !id.is_empty())
        .unwrap_or("Unknown")
        .to_string()
}

fn seat_key(seat_index: Option<i64>) -> String {
    format!("seat-{}", seat_index.unwrap_or(0))
}

fn vehicle_name(vehicle: Option<&Vehicle>, key: &str) -> String {
    vehicle
        .and_then(|v| v.vehicle_id.as_deref().or(v.vehicle_type.as_deref()))
        .filter(|name| !name.is_empty())
        .unwrap_or(key)
        .to_string()
}
