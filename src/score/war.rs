// Per-war member scoring and clan-level war aggregation.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::metrics;
use crate::model::{WarMemberRecord, WarSide, WarSnapshot, TOWN_HALL_MAX, TOWN_HALL_MIN};
use crate::score::attack::score_attack;
use crate::score::ScoredWarMember;

/// Penalty anchoring a member who never attacks, per potential attack.
const MISS_PENALTY: f64 = 100.0;

/// Credit for showing up: awarded per attack made, on top of its score.
const ATTEMPT_CREDIT: f64 = 100.0;

/// Score one member's performance in a war.
///
/// The running total starts at a full miss penalty (`-100 * potential`);
/// each attack adds the attempt credit plus the attack's own score, and the
/// total is normalized by the potential attack count. A member who never
/// attacks lands at exactly -100 regardless of war type; a single maximal
/// equal-TH attack in a 2-attack war lands at exactly 0.
pub fn score_member(member: &WarMemberRecord, war: &WarSnapshot) -> ScoredWarMember {
    let potential = war.attacks_per_member as u32;

    let mut running = -MISS_PENALTY * potential as f64;
    let mut stars: u32 = 0;
    let mut destruction: f64 = 0.0;

    for attack in &member.attacks {
        let defender_th = defender_town_hall(war, &attack.defender_tag, member.town_hall);
        let scored = score_attack(attack, member.town_hall, defender_th);
        running += ATTEMPT_CREDIT + scored.score;
        stars += attack.stars as u32;
        destruction += attack.destruction_pct;
    }

    ScoredWarMember {
        tag: member.tag.clone(),
        name: member.name.clone(),
        potential_attack_count: potential,
        attack_count: member.attacks.len() as u32,
        stars,
        destruction,
        score: running / potential as f64,
    }
}

/// Town hall of the defender a clan member attacked. Defenders live on the
/// opponent side; if the tag cannot be found in the snapshot at all, the
/// attacker's own level is used so the multiplier falls back to 1.0.
fn defender_town_hall(war: &WarSnapshot, defender_tag: &str, fallback: u8) -> u8 {
    war.opponent
        .find_member(defender_tag)
        .or_else(|| war.clan.find_member(defender_tag))
        .map(|d| d.town_hall)
        .unwrap_or(fallback)
}

/// Clan-side members whose attack count differs from the war's allowance.
/// With `exact_missed_count`, only members missing exactly that many.
/// None until the war has started: a preparation-day roster has attacked
/// nobody, which is not the same as everyone having missed.
pub fn missed_attack_members<'a>(
    war: &'a WarSnapshot,
    exact_missed_count: Option<u32>,
) -> Option<Vec<&'a WarMemberRecord>> {
    if !war.state.is_scoreable() {
        return None;
    }

    let potential = war.attacks_per_member as u32;
    let members = war
        .clan
        .members
        .iter()
        .filter(|m| {
            let missed = potential.saturating_sub(m.attacks.len() as u32);
            match exact_missed_count {
                Some(exact) => missed == exact && exact > 0,
                None => missed > 0,
            }
        })
        .collect();
    Some(members)
}

/// A fresh town-hall frequency map, all levels zeroed. Each call gets its
/// own map; no shared template is reused across invocations.
pub fn fresh_lineup() -> BTreeMap<u8, u32> {
    (TOWN_HALL_MIN..=TOWN_HALL_MAX).map(|th| (th, 0)).collect()
}

/// Town-hall level -> member count for one side of a war.
pub fn lineup_by_town_hall(side: &WarSide) -> BTreeMap<u8, u32> {
    let mut lineup = fresh_lineup();
    for member in &side.members {
        *lineup.entry(member.town_hall).or_insert(0) += 1;
    }
    lineup
}

/// Every clan-side member scored, best first. The sort is stable, so
/// members with equal scores keep their roster order. None until the war
/// has started.
pub fn all_member_standings(war: &WarSnapshot) -> Option<Vec<ScoredWarMember>> {
    if !war.state.is_scoreable() {
        return None;
    }

    metrics::SCORING_RUNS_TOTAL
        .with_label_values(&["war_standings"])
        .inc();

    let mut standings: Vec<ScoredWarMember> = war
        .clan
        .members
        .iter()
        .map(|m| score_member(m, war))
        .collect();
    standings.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    Some(standings)
}

/// Which side currently leads a war.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WarLeader {
    Clan,
    Opponent,
    Tied,
}

/// Star/destruction totals for both sides and the current leader.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarScoreboard {
    pub clan_stars: u32,
    pub clan_destruction: f64,
    pub opponent_stars: u32,
    pub opponent_destruction: f64,
    pub leader: WarLeader,
}

/// Summarize the war's current standing. None until the war has started.
pub fn scoreboard(war: &WarSnapshot) -> Option<WarScoreboard> {
    if !war.state.is_scoreable() {
        return None;
    }

    let leader = if war.clan_won() {
        WarLeader::Clan
    } else if war.clan.stars == war.opponent.stars
        && war.clan.destruction == war.opponent.destruction
    {
        WarLeader::Tied
    } else {
        WarLeader::Opponent
    };

    Some(WarScoreboard {
        clan_stars: war.clan.stars,
        clan_destruction: war.clan.destruction,
        opponent_stars: war.opponent.stars,
        opponent_destruction: war.opponent.destruction,
        leader,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AttackRecord, WarState};

    fn member(tag: &str, th: u8, position: u32, attacks: Vec<AttackRecord>) -> WarMemberRecord {
        WarMemberRecord {
            tag: tag.to_string(),
            name: format!("member {tag}"),
            town_hall: th,
            map_position: position,
            attacks,
        }
    }

    fn attack(defender_tag: &str, stars: u8, destruction_pct: f64) -> AttackRecord {
        AttackRecord {
            attacker_tag: "#ATK".into(),
            defender_tag: defender_tag.to_string(),
            stars,
            destruction_pct,
        }
    }

    fn two_attack_war(clan_members: Vec<WarMemberRecord>, opponents: Vec<WarMemberRecord>) -> WarSnapshot {
        WarSnapshot {
            state: WarState::WarEnded,
            is_league_war: false,
            attacks_per_member: 2,
            clan: WarSide {
                tag: "#CLAN".into(),
                name: "Clan".into(),
                members: clan_members,
                stars: 0,
                destruction: 0.0,
            },
            opponent: WarSide {
                tag: "#OPP".into(),
                name: "Opponent".into(),
                members: opponents,
                stars: 0,
                destruction: 0.0,
            },
        }
    }

    #[test]
    fn test_zero_attacks_scores_minus_100() {
        let war = two_attack_war(vec![member("#M1", 12, 1, vec![])], vec![]);
        let scored = score_member(&war.clan.members[0], &war);
        assert_eq!(scored.score, -100.0);
        assert_eq!(scored.attack_count, 0);
        assert_eq!(scored.potential_attack_count, 2);

        // Same floor in a 1-attack league war
        let mut league = two_attack_war(vec![member("#M1", 12, 1, vec![])], vec![]);
        league.is_league_war = true;
        league.attacks_per_member = 1;
        let scored = score_member(&league.clan.members[0], &league);
        assert_eq!(scored.score, -100.0);
        assert_eq!(scored.potential_attack_count, 1);
    }

    #[test]
    fn test_single_max_attack_in_two_attack_war_scores_zero() {
        // (-200) + (100 + 100) = 0, 0/2 = 0
        let war = two_attack_war(
            vec![member("#M1", 12, 1, vec![attack("#D1", 3, 100.0)])],
            vec![member("#D1", 12, 1, vec![])],
        );
        let scored = score_member(&war.clan.members[0], &war);
        assert_eq!(scored.score, 0.0);
        assert_eq!(scored.stars, 3);
        assert_eq!(scored.destruction, 100.0);
    }

    #[test]
    fn test_two_max_attacks_score_100() {
        let war = two_attack_war(
            vec![member(
                "#M1",
                12,
                1,
                vec![attack("#D1", 3, 100.0), attack("#D2", 3, 100.0)],
            )],
            vec![member("#D1", 12, 1, vec![]), member("#D2", 12, 2, vec![])],
        );
        let scored = score_member(&war.clan.members[0], &war);
        assert!((scored.score - 100.0).abs() < 1e-9);
        assert_eq!(scored.attack_count, 2);
        assert_eq!(scored.stars, 6);
    }

    #[test]
    fn test_defender_town_hall_weighting_applies() {
        // Attacking two levels up: 100 * 1.55 = 155 attack score,
        // (-200 + 100 + 155) / 2 = 27.5
        let war = two_attack_war(
            vec![member("#M1", 10, 1, vec![attack("#D1", 3, 100.0)])],
            vec![member("#D1", 12, 1, vec![])],
        );
        let scored = score_member(&war.clan.members[0], &war);
        assert!((scored.score - 27.5).abs() < 1e-9);
    }

    #[test]
    fn test_missed_attack_members() {
        let war = two_attack_war(
            vec![
                member("#FULL", 12, 1, vec![attack("#D1", 2, 80.0), attack("#D2", 1, 55.0)]),
                member("#ONE", 12, 2, vec![attack("#D1", 2, 70.0)]),
                member("#NONE", 12, 3, vec![]),
            ],
            vec![member("#D1", 12, 1, vec![]), member("#D2", 12, 2, vec![])],
        );

        let missed = missed_attack_members(&war, None).unwrap();
        let tags: Vec<&str> = missed.iter().map(|m| m.tag.as_str()).collect();
        assert_eq!(tags, vec!["#ONE", "#NONE"]);

        let missed_one = missed_attack_members(&war, Some(1)).unwrap();
        assert_eq!(missed_one.len(), 1);
        assert_eq!(missed_one[0].tag, "#ONE");

        let missed_two = missed_attack_members(&war, Some(2)).unwrap();
        assert_eq!(missed_two.len(), 1);
        assert_eq!(missed_two[0].tag, "#NONE");
    }

    #[test]
    fn test_war_queries_not_available_before_start() {
        let mut war = two_attack_war(vec![member("#M1", 12, 1, vec![])], vec![]);
        war.state = WarState::Preparation;
        assert!(missed_attack_members(&war, None).is_none());
        assert!(all_member_standings(&war).is_none());
        assert!(scoreboard(&war).is_none());

        war.state = WarState::NotInWar;
        assert!(all_member_standings(&war).is_none());
    }

    #[test]
    fn test_fresh_lineup_covers_all_levels() {
        let lineup = fresh_lineup();
        assert_eq!(lineup.len(), 14);
        assert_eq!(lineup[&1], 0);
        assert_eq!(lineup[&14], 0);

        // Fresh map per call: mutating one must not leak into the next
        let mut first = fresh_lineup();
        *first.get_mut(&10).unwrap() = 99;
        assert_eq!(fresh_lineup()[&10], 0);
    }

    #[test]
    fn test_lineup_by_town_hall() {
        let war = two_attack_war(
            vec![
                member("#A", 13, 1, vec![]),
                member("#B", 13, 2, vec![]),
                member("#C", 11, 3, vec![]),
            ],
            vec![],
        );
        let lineup = lineup_by_town_hall(&war.clan);
        assert_eq!(lineup[&13], 2);
        assert_eq!(lineup[&11], 1);
        assert_eq!(lineup[&12], 0);
    }

    #[test]
    fn test_standings_sorted_descending_stable() {
        let war = two_attack_war(
            vec![
                member("#LOW", 12, 1, vec![]),
                member("#TIE_A", 12, 2, vec![attack("#D1", 3, 100.0)]),
                member("#TIE_B", 12, 3, vec![attack("#D2", 3, 100.0)]),
                member("#HIGH", 12, 4, vec![attack("#D1", 3, 100.0), attack("#D2", 3, 100.0)]),
            ],
            vec![member("#D1", 12, 1, vec![]), member("#D2", 12, 2, vec![])],
        );

        let standings = all_member_standings(&war).unwrap();
        let tags: Vec<&str> = standings.iter().map(|m| m.tag.as_str()).collect();
        // Equal scores keep roster order: #TIE_A before #TIE_B
        assert_eq!(tags, vec!["#HIGH", "#TIE_A", "#TIE_B", "#LOW"]);
    }

    #[test]
    fn test_scoreboard_leader() {
        let mut war = two_attack_war(vec![], vec![]);
        war.state = WarState::InWar;
        war.clan.stars = 20;
        war.clan.destruction = 81.5;
        war.opponent.stars = 18;
        war.opponent.destruction = 90.0;

        let board = scoreboard(&war).unwrap();
        assert_eq!(board.leader, WarLeader::Clan);
        assert_eq!(board.clan_stars, 20);
        assert_eq!(board.opponent_stars, 18);

        war.clan.stars = 18;
        assert_eq!(scoreboard(&war).unwrap().leader, WarLeader::Opponent);

        war.clan.destruction = 90.0;
        assert_eq!(scoreboard(&war).unwrap().leader, WarLeader::Tied);
    }

    #[test]
    fn test_score_member_idempotent() {
        let war = two_attack_war(
            vec![member("#M1", 11, 1, vec![attack("#D1", 2, 67.0)])],
            vec![member("#D1", 12, 1, vec![])],
        );
        let first = score_member(&war.clan.members[0], &war);
        let second = score_member(&war.clan.members[0], &war);
        assert_eq!(first, second);
    }
}
