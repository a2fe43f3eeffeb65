// Single-attack scoring.
//
// An attack's quality is a weighted blend of stars and destruction,
// scaled by a town-hall difference multiplier that rewards hitting up
// and penalizes farming down.

use crate::model::AttackRecord;
use crate::score::ScoredAttack;

const STAR_WEIGHT: f64 = 0.75;
const DESTRUCTION_WEIGHT: f64 = 0.25;

/// Points awarded for a perfect attack against an equal town hall.
pub const ATTACK_POINTS_SCALE: f64 = 100.0;

/// Scoring weight for a town-hall difference (defender minus attacker).
pub fn th_multiplier(difference: i16) -> f64 {
    match difference {
        d if d < -2 => 0.35,
        -2 => 0.50,
        -1 => 0.80,
        0 => 1.00,
        1 => 1.40,
        2 => 1.55,
        _ => 2.00,
    }
}

/// Score one attack. Stars and destruction are pre-validated by the
/// upstream snapshot, so there is no error case.
pub fn score_attack(attack: &AttackRecord, attacker_th: u8, defender_th: u8) -> ScoredAttack {
    let star_component = attack.stars as f64 / 3.0;
    let destruction_component = attack.destruction_pct / 100.0;
    let quality = star_component * STAR_WEIGHT + destruction_component * DESTRUCTION_WEIGHT;

    let difference = defender_th as i16 - attacker_th as i16;
    let score = quality * th_multiplier(difference) * ATTACK_POINTS_SCALE;

    ScoredAttack {
        stars: attack.stars,
        destruction_pct: attack.destruction_pct,
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attack(stars: u8, destruction_pct: f64) -> AttackRecord {
        AttackRecord {
            attacker_tag: "#ATK".into(),
            defender_tag: "#DEF".into(),
            stars,
            destruction_pct,
        }
    }

    #[test]
    fn test_multiplier_table() {
        assert_eq!(th_multiplier(-5), 0.35);
        assert_eq!(th_multiplier(-3), 0.35);
        assert_eq!(th_multiplier(-2), 0.50);
        assert_eq!(th_multiplier(-1), 0.80);
        assert_eq!(th_multiplier(0), 1.00);
        assert_eq!(th_multiplier(1), 1.40);
        assert_eq!(th_multiplier(2), 1.55);
        assert_eq!(th_multiplier(3), 2.00);
        assert_eq!(th_multiplier(6), 2.00);
    }

    #[test]
    fn test_multiplier_non_decreasing() {
        let mut prev = th_multiplier(-6);
        for d in -5..=6 {
            let m = th_multiplier(d);
            assert!(m >= prev, "multiplier decreased at difference {d}");
            prev = m;
        }
    }

    #[test]
    fn test_perfect_attack_equal_th_is_100() {
        let scored = score_attack(&attack(3, 100.0), 12, 12);
        assert!((scored.score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_attack_is_zero() {
        let scored = score_attack(&attack(0, 0.0), 12, 12);
        assert_eq!(scored.score, 0.0);
    }

    #[test]
    fn test_star_weighting() {
        // Two stars, no destruction, equal TH: 2/3 * 0.75 * 100 = 50
        let scored = score_attack(&attack(2, 0.0), 10, 10);
        assert!((scored.score - 50.0).abs() < 1e-9);

        // No stars, half destruction: 0.5 * 0.25 * 100 = 12.5
        let scored = score_attack(&attack(0, 50.0), 10, 10);
        assert!((scored.score - 12.5).abs() < 1e-9);
    }

    #[test]
    fn test_hitting_up_scales_score() {
        let even = score_attack(&attack(3, 100.0), 10, 10);
        let up_two = score_attack(&attack(3, 100.0), 10, 12);
        let down_two = score_attack(&attack(3, 100.0), 12, 10);
        assert!((up_two.score - 155.0).abs() < 1e-9);
        assert!((down_two.score - 50.0).abs() < 1e-9);
        assert!(up_two.score > even.score);
        assert!(down_two.score < even.score);
    }

    #[test]
    fn test_monotonic_in_stars_and_destruction() {
        for th_diff in [-2i16, 0, 2] {
            let (attacker_th, defender_th) = (10u8, (10i16 + th_diff) as u8);
            for stars in 0u8..3 {
                for pct in [0.0, 25.0, 50.0, 75.0] {
                    let base = score_attack(&attack(stars, pct), attacker_th, defender_th);
                    let more_stars =
                        score_attack(&attack(stars + 1, pct), attacker_th, defender_th);
                    let more_destruction =
                        score_attack(&attack(stars, pct + 25.0), attacker_th, defender_th);
                    assert!(more_stars.score >= base.score);
                    assert!(more_destruction.score >= base.score);
                }
            }
        }
    }

    #[test]
    fn test_idempotent() {
        let a = attack(2, 73.5);
        let first = score_attack(&a, 11, 13);
        let second = score_attack(&a, 11, 13);
        assert_eq!(first, second);
    }
}
