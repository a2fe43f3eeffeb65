// Snapshot types supplied by the upstream game API.
//
// Everything here is an immutable point-in-time read: the engine never
// mutates a snapshot after construction, it only derives new records from it.
// Field names follow the API's camelCase JSON.

use serde::{Deserialize, Serialize};

/// War tag used in a league round schedule when no pairing exists.
pub const UNPAIRED_WAR_TAG: &str = "#0";

/// Town-hall levels covered by lineup frequency maps.
pub const TOWN_HALL_MIN: u8 = 1;
pub const TOWN_HALL_MAX: u8 = 14;

/// Category of a unit as reported by the game API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnitCategory {
    Hero,
    Pet,
    HomeTroop,
    Siege,
    Spell,
    SuperTroop,
    BuilderTroop,
}

impl UnitCategory {
    /// Whether the engine treats this category as donatable.
    /// Heroes, pets, sieges and boosted variants are excluded upstream;
    /// only regular home troops and spells pass.
    pub fn is_donatable(self) -> bool {
        matches!(self, UnitCategory::HomeTroop | UnitCategory::Spell)
    }
}

/// One unit owned by a player, as of the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitSnapshot {
    pub name: String,
    pub category: UnitCategory,
    pub level: u16,
    pub max_level: u16,
    /// Only meaningful for super troops: whether the boost is running.
    #[serde(default)]
    pub is_active: bool,
}

/// A player profile as fetched per clan member during bulk scans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub tag: String,
    pub name: String,
    pub town_hall: u8,
    pub units: Vec<UnitSnapshot>,
}

impl PlayerProfile {
    /// Case-insensitive lookup of a unit by name.
    pub fn find_unit(&self, unit_name: &str) -> Option<&UnitSnapshot> {
        self.units
            .iter()
            .find(|u| u.name.eq_ignore_ascii_case(unit_name))
    }
}

/// One attack inside a war, already validated by the upstream snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackRecord {
    pub attacker_tag: String,
    pub defender_tag: String,
    /// 0..=3
    pub stars: u8,
    /// 0..=100
    pub destruction_pct: f64,
}

/// A member on one side of a war, with their attacks in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarMemberRecord {
    pub tag: String,
    pub name: String,
    pub town_hall: u8,
    pub map_position: u32,
    #[serde(default)]
    pub attacks: Vec<AttackRecord>,
}

/// Lifecycle state of a war. Externally driven; the engine re-reads a fresh
/// snapshot each call and never tracks transitions itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WarState {
    Preparation,
    InWar,
    WarEnded,
    NotInWar,
}

impl WarState {
    /// Whether member-level scoring is defined for this state.
    /// Preparation and notInWar are "not yet available", not "zero".
    pub fn is_scoreable(self) -> bool {
        matches!(self, WarState::InWar | WarState::WarEnded)
    }
}

/// One side of a war (own clan or opponent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarSide {
    pub tag: String,
    pub name: String,
    pub members: Vec<WarMemberRecord>,
    pub stars: u32,
    pub destruction: f64,
}

impl WarSide {
    pub fn find_member(&self, tag: &str) -> Option<&WarMemberRecord> {
        self.members.iter().find(|m| m.tag == tag)
    }
}

/// Immutable snapshot of one war.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarSnapshot {
    pub state: WarState,
    pub is_league_war: bool,
    /// Fixed at war creation: 1 for league wars, 2 otherwise.
    pub attacks_per_member: u8,
    pub clan: WarSide,
    pub opponent: WarSide,
}

impl WarSnapshot {
    /// The side a clan tag belongs to, if it is in this war at all.
    pub fn side_of(&self, clan_tag: &str) -> Option<&WarSide> {
        if self.clan.tag == clan_tag {
            Some(&self.clan)
        } else if self.opponent.tag == clan_tag {
            Some(&self.opponent)
        } else {
            None
        }
    }

    /// Reorient the snapshot so that `clan_tag` is on the `clan` side.
    /// League war snapshots are fetched by war tag and may have the
    /// requested clan on either side. Returns None if the clan is not
    /// in this war.
    pub fn normalized_for(mut self, clan_tag: &str) -> Option<Self> {
        if self.clan.tag == clan_tag {
            Some(self)
        } else if self.opponent.tag == clan_tag {
            std::mem::swap(&mut self.clan, &mut self.opponent);
            Some(self)
        } else {
            None
        }
    }

    /// Whether the `clan` side won this war: more stars, or equal stars
    /// and more destruction. Equal on both counts is a draw, not a win.
    pub fn clan_won(&self) -> bool {
        self.clan.stars > self.opponent.stars
            || (self.clan.stars == self.opponent.stars
                && self.clan.destruction > self.opponent.destruction)
    }
}

/// A clan member reference as listed on the clan snapshot (tag and name
/// only; full profiles are fetched separately during bulk scans).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanMemberRef {
    pub tag: String,
    pub name: String,
}

/// Immutable snapshot of a clan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanSnapshot {
    pub tag: String,
    pub name: String,
    pub level: u16,
    /// Derived from `level` at fetch time, see `donation_upgrade_tier`.
    pub donation_upgrade_tier: u16,
    pub members: Vec<ClanMemberRef>,
}

impl ClanSnapshot {
    /// Build a snapshot from API fields, deriving the donation tier from
    /// the clan level.
    pub fn from_api(tag: &str, name: &str, level: u16, members: Vec<ClanMemberRef>) -> Self {
        ClanSnapshot {
            tag: tag.to_string(),
            name: name.to_string(),
            level,
            donation_upgrade_tier: donation_upgrade_tier(level),
            members,
        }
    }

    /// Tags of every listed member, in roster order.
    pub fn member_tags(&self) -> Vec<String> {
        self.members.iter().map(|m| m.tag.clone()).collect()
    }
}

/// The clan-level donation bonus: troops donate at a higher level out of a
/// higher-level clan. 0 below level 5, 1 below level 10, 2 from 10 up.
pub fn donation_upgrade_tier(clan_level: u16) -> u16 {
    if clan_level < 5 {
        0
    } else if clan_level < 10 {
        1
    } else {
        2
    }
}

/// One scheduled round of a league group: one war tag per pairing.
/// Unpaired rounds carry the `#0` sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueRound {
    pub war_tags: Vec<String>,
}

/// A clan as listed in a league group roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueClan {
    pub tag: String,
    pub name: String,
    pub members: Vec<LeagueClanMember>,
}

/// A member of a league roster, with town hall for lineup maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueClanMember {
    pub tag: String,
    pub name: String,
    pub town_hall: u8,
}

/// A league group: the clan roster plus the ordered round schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueGroup {
    pub clans: Vec<LeagueClan>,
    pub rounds: Vec<LeagueRound>,
}

impl LeagueGroup {
    pub fn find_clan(&self, clan_tag: &str) -> Option<&LeagueClan> {
        self.clans.iter().find(|c| c.tag == clan_tag)
    }
}
