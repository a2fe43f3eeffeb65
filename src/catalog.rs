// Unit name resolution against the game's unit catalog.
//
// Chat users type unit names free-form; the API reports canonical names.
// Matching is case-insensitive and a request never errors here: an
// unresolvable name is simply None.

use crate::model::{PlayerProfile, UnitCategory, UnitSnapshot};

/// Canonical names of every boosted (super) troop.
pub const SUPER_TROOPS: &[&str] = &[
    "Super Barbarian",
    "Super Archer",
    "Super Giant",
    "Sneaky Goblin",
    "Super Wall Breaker",
    "Rocket Balloon",
    "Super Wizard",
    "Super Dragon",
    "Inferno Dragon",
    "Super Minion",
    "Super Valkyrie",
    "Super Witch",
    "Ice Hound",
    "Super Bowler",
];

/// Canonicalize a user-typed super troop name, None if it is not one.
pub fn super_troop_name(unit_name: &str) -> Option<&'static str> {
    SUPER_TROOPS
        .iter()
        .find(|name| name.eq_ignore_ascii_case(unit_name))
        .copied()
}

/// Resolve a requested unit name against a set of member profiles: the first
/// matching unit snapshot determines the unit's identity (category, max
/// level). None when no member owns a unit by that name.
pub fn resolve_unit<'a>(profiles: &'a [PlayerProfile], unit_name: &str) -> Option<&'a UnitSnapshot> {
    profiles.iter().find_map(|p| p.find_unit(unit_name))
}

/// All currently boosted super troops on a profile.
pub fn active_super_troops(profile: &PlayerProfile) -> Vec<&UnitSnapshot> {
    profile
        .units
        .iter()
        .filter(|u| u.category == UnitCategory::SuperTroop && u.is_active)
        .collect()
}
