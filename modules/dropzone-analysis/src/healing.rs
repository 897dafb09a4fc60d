/// Seconds each consumable takes to use, keyed by item id.
const USE_DURATIONS: &[(&str, f64)] = &[
    ("Item_Heal_Bandage_C", 4.0),
    ("Item_Heal_FirstAid_C", 6.0),
    ("Item_Heal_MedKit_C", 8.0),
    ("Item_Boost_EnergyDrink_C", 4.0),
    ("Item_Boost_PainKiller_C", 6.0),
    ("Item_Boost_AdrenalineSyringe_C", 6.0),
];

/// Use time for an item; unknown items take no time.
pub fn use_duration(item_id: &str) -> f64 {
    USE_DURATIONS
        .iter()
        .find(|(id, _)| *id == item_id)
        .map(|(_, secs)| *secs)
        .unwrap_or(0.0)
}
