// Donation eligibility: who in a clan can usefully donate a requested unit.

use serde::Serialize;

use crate::catalog;
use crate::metrics;
use crate::model::{ClanMemberRef, PlayerProfile, UnitSnapshot};

/// A member able to donate the requested unit, with the unit as they hold it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationCandidate {
    pub member_tag: String,
    pub member_name: String,
    pub unit: UnitSnapshot,
}

/// Members who can donate the requested unit at the best available level.
///
/// Profiles are the clan's members with their unit lists, as assembled by
/// the fetch phase. Only regular home troops and spells are donatable;
/// a name resolving to anything else returns None, distinct from
/// Some(empty) when the name matches nothing any member owns.
///
/// The clan's donation upgrade tier is added to a holder's raw level when
/// checking against the unit's max level. If some holder can reach true max
/// that way, every holder who can is returned; otherwise only holders at
/// the observed level ceiling qualify. Members strictly between that
/// ceiling and max are excluded, not "close enough".
pub fn eligible_donors(
    profiles: &[PlayerProfile],
    upgrade_tier: u16,
    unit_name: &str,
) -> Option<Vec<DonationCandidate>> {
    metrics::SCORING_RUNS_TOTAL
        .with_label_values(&["donation"])
        .inc();

    // Nobody owns a unit by that name: nothing to resolve against
    let resolved = match catalog::resolve_unit(profiles, unit_name) {
        Some(unit) => unit,
        None => return Some(Vec::new()),
    };

    if !resolved.category.is_donatable() {
        return None;
    }

    let holders: Vec<(&PlayerProfile, &UnitSnapshot)> = profiles
        .iter()
        .filter_map(|p| p.find_unit(unit_name).map(|u| (p, u)))
        .collect();

    let donor_max = holders.iter().map(|(_, u)| u.level).max().unwrap_or(0);
    let unit_max = resolved.max_level;

    let candidates = if donor_max + upgrade_tier >= unit_max {
        // Some top donor reaches true max: everyone tied at max qualifies
        holders
            .into_iter()
            .filter(|(_, u)| u.level + upgrade_tier >= u.max_level)
            .map(candidate)
            .collect()
    } else {
        // Best available tier only
        holders
            .into_iter()
            .filter(|(_, u)| u.level == donor_max)
            .map(candidate)
            .collect()
    };

    Some(candidates)
}

fn candidate((profile, unit): (&PlayerProfile, &UnitSnapshot)) -> DonationCandidate {
    DonationCandidate {
        member_tag: profile.tag.clone(),
        member_name: profile.name.clone(),
        unit: unit.clone(),
    }
}

/// Members who currently have the requested super troop boosted.
/// Empty when the name is not a super troop or nobody has it running.
pub fn active_super_troop_donors(
    profiles: &[PlayerProfile],
    super_troop_name: &str,
) -> Vec<ClanMemberRef> {
    let canonical = match catalog::super_troop_name(super_troop_name) {
        Some(name) => name,
        None => return Vec::new(),
    };

    profiles
        .iter()
        .filter(|p| {
            catalog::active_super_troops(p)
                .iter()
                .any(|u| u.name == canonical)
        })
        .map(|p| ClanMemberRef {
            tag: p.tag.clone(),
            name: p.name.clone(),
        })
        .collect()
}
