// Clan War League scoring: per-member participation-weighted scores and
// clan-level league standing.
//
// All functions take the completed-war subset produced by
// `fetch::collect_completed_wars`: every war is warEnded and normalized so
// the scored clan is on the `clan` side.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::metrics;
use crate::model::{LeagueClan, LeagueGroup, WarSnapshot};
use crate::score::war::{fresh_lineup, score_member};
use crate::score::ScoredCwlMember;

/// Flat star bonus a clan earns for each league round it wins.
const WIN_BONUS_STARS: u32 = 10;

/// Discount for incomplete attendance: log of participated rounds in base
/// total rounds. Attending every round gives exactly 1; a single round out
/// of many is discounted hard. Below two completed rounds the log base is
/// degenerate, so the multiplier is 1.
fn participation_multiplier(participated: u32, total_rounds: usize) -> f64 {
    if total_rounds >= 2 {
        (participated as f64).ln() / (total_rounds as f64).ln()
    } else {
        1.0
    }
}

/// Score one member across a league group's completed rounds.
///
/// `round_scores` always has one entry per completed war: the member's war
/// score when they were on the roster, 0.0 when they sat out. A member who
/// participated in nothing keeps the zero-valued record; there is no
/// division by zero.
pub fn score_league_member(
    tag: &str,
    name: &str,
    completed_wars: &[WarSnapshot],
) -> ScoredCwlMember {
    let mut record = ScoredCwlMember::new(tag, name);

    for war in completed_wars {
        match war.clan.find_member(tag) {
            Some(member) => {
                let war_score = score_member(member, war);
                record.participated_wars += 1;
                record.potential_attack_count += 1;
                record.attack_count += war_score.attack_count;
                record.stars += war_score.stars;
                record.destruction += war_score.destruction;
                record.round_scores.push(war_score.score);
            }
            None => record.round_scores.push(0.0),
        }
    }

    if record.participated_wars == 0 {
        return record;
    }

    let avg = record.round_scores.iter().sum::<f64>() / record.participated_wars as f64;
    record.score = avg * participation_multiplier(record.participated_wars, completed_wars.len());
    record
}

/// Every roster member of a league clan scored, best first. The sort is
/// stable, so equal scores keep roster order. Members who participated in
/// no completed round are kept at score 0 rather than dropped, so the
/// returned list always covers the full roster.
pub fn league_standings(clan: &LeagueClan, completed_wars: &[WarSnapshot]) -> Vec<ScoredCwlMember> {
    metrics::SCORING_RUNS_TOTAL
        .with_label_values(&["cwl_standings"])
        .inc();

    let mut standings: Vec<ScoredCwlMember> = clan
        .members
        .iter()
        .map(|m| score_league_member(&m.tag, &m.name, completed_wars))
        .collect();
    standings.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    standings
}

/// Clan-level league standing across completed rounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueClanScore {
    pub stars: u32,
    pub destruction: f64,
}

/// Sum stars and destruction over every completed round, plus the win bonus
/// per round won. Destruction is summed, not averaged, while member scoring
/// averages rounds; both behaviors are kept as-is.
pub fn score_league_clan(completed_wars: &[WarSnapshot]) -> LeagueClanScore {
    let mut stars: u32 = 0;
    let mut destruction: f64 = 0.0;

    for war in completed_wars {
        stars += war.clan.stars;
        destruction += war.clan.destruction;
        if war.clan_won() {
            stars += WIN_BONUS_STARS;
        }
    }

    LeagueClanScore { stars, destruction }
}

/// Town-hall lineup of one clan in a league group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanLineup {
    pub tag: String,
    pub name: String,
    pub lineup: BTreeMap<u8, u32>,
}

/// Town-hall frequency map for every clan in the group, in roster order.
pub fn group_lineups(group: &LeagueGroup) -> Vec<ClanLineup> {
    group
        .clans
        .iter()
        .map(|clan| {
            let mut lineup = fresh_lineup();
            for member in &clan.members {
                *lineup.entry(member.town_hall).or_insert(0) += 1;
            }
            ClanLineup {
                tag: clan.tag.clone(),
                name: clan.name.clone(),
                lineup,
            }
        })
        .collect()
}
