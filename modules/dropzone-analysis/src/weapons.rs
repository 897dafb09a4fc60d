use std::collections::BTreeMap;

use crate::types::WeaponStats;

const UNKNOWN_WEAPON: &str = "Unknown";

/// Strip the engine's item prefixes: `Item_Weapon_M416_C` -> `M416_C`,
/// `WeapHK416_C` -> `HK416_C`. Blank ids become `"Unknown"`.
pub fn normalize_weapon_id(raw: &str) -> String {
    let raw = raw.trim();
    let id = raw
        .strip_prefix("Item_Weapon_")
        .or_else(|| raw.strip_prefix("Weap"))
        .unwrap_or(raw);

    if id.is_empty() {
        UNKNOWN_WEAPON.to_string()
    } else {
        id.to_string()
    }
}

#[derive(Debug, Default, Clone)]
struct Tally {
    kills: u32,
    damage: f64,
    hits: u32,
    headshots: u32,
    shots_fired: u32,
}

/// Per-weapon running counters for one player.
#[derive(Debug, Default, Clone)]
pub struct WeaponAggregator {
    tallies: BTreeMap<String, Tally>,
}

impl WeaponAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, weapon: &str) -> &mut Tally {
        self.tallies.entry(normalize_weapon_id(weapon)).or_default()
    }

    pub fn record_kill(&mut self, weapon: &str, headshot: bool) {
        let tally = self.entry(weapon);
        tally.kills += 1;
        if headshot {
            tally.headshots += 1;
        }
    }

    pub fn record_hit(&mut self, weapon: &str, damage: f64) {
        let tally = self.entry(weapon);
        tally.hits += 1;
        tally.damage += damage;
    }

    pub fn record_shots(&mut self, weapon: &str, count: u32) {
        let tally = self.entry(weapon);
        tally.shots_fired = tally.shots_fired.saturating_add(count);
    }

    pub fn finish(&self) -> BTreeMap<String, WeaponStats> {
        self.tallies
            .iter()
            .map(|(weapon, t)| {
                let accuracy = if t.shots_fired > 0 {
                    (t.hits as f64 / t.shots_fired as f64).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let stats = WeaponStats {
                    kills: t.kills,
                    damage: t.damage,
                    hits: t.hits,
                    headshots: t.headshots,
                    accuracy,
                };
                (weapon.clone(), stats)
            })
            .collect()
    }
}
