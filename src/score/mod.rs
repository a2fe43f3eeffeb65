// War and league performance scoring.
//
// Every function in this tree is a pure transform: snapshots in, derived
// records out. Nothing here performs I/O; the fetch phase (crate::fetch)
// has already settled by the time a scorer runs.

use serde::Serialize;

pub mod attack;
pub mod cwl;
pub mod war;

/// One attack with its computed score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredAttack {
    pub stars: u8,
    pub destruction_pct: f64,
    pub score: f64,
}

/// A member's aggregate performance in one war.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredWarMember {
    pub tag: String,
    pub name: String,
    /// Attacks the member was allowed (1 in league wars, 2 otherwise).
    pub potential_attack_count: u32,
    pub attack_count: u32,
    pub stars: u32,
    pub destruction: f64,
    pub score: f64,
}

/// A member's aggregate performance across a league group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCwlMember {
    pub tag: String,
    pub name: String,
    pub participated_wars: u32,
    pub potential_attack_count: u32,
    pub attack_count: u32,
    pub stars: u32,
    pub destruction: f64,
    /// One entry per completed round, 0.0 for rounds the member sat out.
    pub round_scores: Vec<f64>,
    pub score: f64,
}

impl ScoredCwlMember {
    /// Zero-valued record for a member before any round is folded in.
    pub fn new(tag: &str, name: &str) -> Self {
        ScoredCwlMember {
            tag: tag.to_string(),
            name: name.to_string(),
            participated_wars: 0,
            potential_attack_count: 0,
            attack_count: 0,
            stars: 0,
            destruction: 0.0,
            round_scores: Vec::new(),
            score: 0.0,
        }
    }
}
