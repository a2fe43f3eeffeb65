// Bulk snapshot fetching: the I/O phase that runs before any scoring.
//
// Several operations need one upstream request per clan member (donation
// search, super troop search, lineups) or per league round (CWL scoring).
// Those are fanned out with a bounded concurrency so end-to-end latency
// tracks the slowest fetch, not the sum. A failed fetch never aborts the
// scan: the member or round is skipped and the skip count is surfaced so
// callers can report a partial result instead of a silent undercount.

use std::time::Instant;

use futures::stream::{self, StreamExt};

use crate::metrics;
use crate::model::{
    ClanSnapshot, LeagueGroup, PlayerProfile, WarSnapshot, WarState, UNPAIRED_WAR_TAG,
};
use crate::upstream::{SnapshotSource, Unavailable};

/// Result of a bulk scan: what was fetched, and how many inputs were
/// dropped because their fetch failed.
#[derive(Debug, Clone, PartialEq)]
pub struct Partial<T> {
    pub items: Vec<T>,
    pub skipped: usize,
}

impl<T> Partial<T> {
    /// Whether every input was fetched.
    pub fn is_complete(&self) -> bool {
        self.skipped == 0
    }
}

/// Fetch the full profile of every listed member, preserving input order.
/// At most `concurrency` requests are in flight at once.
pub async fn fetch_member_profiles<S: SnapshotSource + Sync>(
    source: &S,
    member_tags: &[String],
    concurrency: usize,
) -> Partial<PlayerProfile> {
    let start = Instant::now();

    let results: Vec<Result<PlayerProfile, Unavailable>> = stream::iter(member_tags)
        .map(|tag| async move {
            metrics::FETCHES_IN_FLIGHT.inc();
            let result = source.player_profile(tag).await;
            metrics::FETCHES_IN_FLIGHT.dec();
            record_fetch("player", &result);
            if let Err(reason) = &result {
                tracing::warn!(%tag, %reason, "skipping member: profile unavailable");
            }
            result
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    metrics::FETCH_PHASE_DURATION_SECONDS
        .with_label_values(&["player"])
        .observe(start.elapsed().as_secs_f64());

    let total = results.len();
    let items: Vec<PlayerProfile> = results.into_iter().flatten().collect();
    let skipped = total - items.len();
    if skipped > 0 {
        metrics::MEMBERS_SKIPPED_TOTAL.inc_by(skipped as u64);
    }
    tracing::debug!(fetched = items.len(), skipped, "member profile scan settled");

    Partial { items, skipped }
}

/// Fetch the full profile of every member on a clan snapshot's roster.
/// Convenience wrapper for the common donation/lineup scans, which start
/// from a clan snapshot rather than a bare tag list.
pub async fn fetch_clan_profiles<S: SnapshotSource + Sync>(
    source: &S,
    clan: &ClanSnapshot,
    concurrency: usize,
) -> Partial<PlayerProfile> {
    fetch_member_profiles(source, &clan.member_tags(), concurrency).await
}

/// Collect the completed-war subset of a league group's schedule for one
/// clan, in schedule order.
///
/// Unpaired rounds (the `#0` sentinel) and rounds whose war has not ended
/// are excluded silently; they are part of normal league progression. A
/// round counts as skipped only when the clan's war for it could not be
/// fetched. Every returned war is reoriented so the requested clan is on
/// the `clan` side.
pub async fn collect_completed_wars<S: SnapshotSource + Sync>(
    source: &S,
    group: &LeagueGroup,
    clan_tag: &str,
    concurrency: usize,
) -> Partial<WarSnapshot> {
    let start = Instant::now();

    // One job per paired war tag, remembering its round
    let jobs: Vec<(usize, &str)> = group
        .rounds
        .iter()
        .enumerate()
        .flat_map(|(round, r)| {
            r.war_tags
                .iter()
                .filter(|tag| tag.as_str() != UNPAIRED_WAR_TAG)
                .map(move |tag| (round, tag.as_str()))
        })
        .collect();

    let fetched: Vec<(usize, Result<WarSnapshot, Unavailable>)> = stream::iter(jobs)
        .map(|(round, war_tag)| async move {
            metrics::FETCHES_IN_FLIGHT.inc();
            let result = source.league_war(war_tag).await;
            metrics::FETCHES_IN_FLIGHT.dec();
            record_fetch("league_war", &result);
            (round, result)
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    metrics::FETCH_PHASE_DURATION_SECONDS
        .with_label_values(&["league_war"])
        .observe(start.elapsed().as_secs_f64());

    let mut items = Vec::new();
    let mut skipped = 0;

    for round in 0..group.rounds.len() {
        let mut clan_war: Option<&WarSnapshot> = None;
        let mut fetch_failed = false;

        for (_, result) in fetched.iter().filter(|(r, _)| *r == round) {
            match result {
                Ok(war) => {
                    if war.side_of(clan_tag).is_some() {
                        clan_war = Some(war);
                    }
                }
                Err(_) => fetch_failed = true,
            }
        }

        match clan_war {
            Some(war) if war.state == WarState::WarEnded => {
                if let Some(normalized) = war.clone().normalized_for(clan_tag) {
                    items.push(normalized);
                }
            }
            // Found but still pending: normal league progression
            Some(_) => {}
            None if fetch_failed => {
                skipped += 1;
                metrics::ROUNDS_SKIPPED_TOTAL.inc();
                tracing::warn!(round, clan_tag, "skipping round: war snapshot unavailable");
            }
            // Unpaired round, or the clan sat this round out
            None => {}
        }
    }

    tracing::debug!(
        completed = items.len(),
        skipped,
        clan_tag,
        "league war collection settled"
    );

    Partial { items, skipped }
}

fn record_fetch<T>(kind: &str, result: &Result<T, Unavailable>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(_) => "unavailable",
    };
    metrics::UPSTREAM_FETCHES_TOTAL
        .with_label_values(&[kind, outcome])
        .inc();
}
