//! Property-based tests for combat arithmetic.
//!
//! These tests verify merge and fight invariants.
//! Run with: cargo test --release prop_combat

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use portalwar::combat::{ArmyComposition, is_first_winner, rank_by_power};
use portalwar::error::CombatError;

fn army_strategy() -> impl Strategy<Value = ArmyComposition> {
    (0u32..10_000, 0u32..10_000, 0u32..10_000, 0.1f64..10.0)
        .prop_map(|(s, a, c, exp)| ArmyComposition::new(s, a, c, exp).unwrap())
}

fn non_empty_army_strategy() -> impl Strategy<Value = ArmyComposition> {
    army_strategy().prop_filter("army must have units", |army| !army.is_empty())
}

/// Two non-empty armies, the first strictly weaker than the second.
fn weaker_stronger_strategy() -> impl Strategy<Value = (ArmyComposition, ArmyComposition)> {
    (non_empty_army_strategy(), non_empty_army_strategy())
        .prop_filter("powers must differ", |(a, b)| a.power().total_cmp(&b.power()).is_ne())
        .prop_map(|(a, b)| if a.power() < b.power() { (a, b) } else { (b, a) })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(10000))]

    /// Merging adds unit counts and averages experience.
    #[test]
    fn prop_merge_totals(a in non_empty_army_strategy(), b in army_strategy()) {
        let merged = a.merge(&b).unwrap();
        prop_assert_eq!(merged.spearmen(), a.spearmen() + b.spearmen());
        prop_assert_eq!(merged.archers(), a.archers() + b.archers());
        prop_assert_eq!(merged.cavalry(), a.cavalry() + b.cavalry());
        prop_assert_eq!(merged.total_units(), a.total_units() + b.total_units());

        let lo = a.experience().min(b.experience());
        let hi = a.experience().max(b.experience());
        prop_assert!(merged.experience() >= lo - 1e-9);
        prop_assert!(merged.experience() <= hi + 1e-9);

        // Power is conserved up to rounding.
        let expected = a.power() + b.power();
        prop_assert!((merged.power() - expected).abs() <= expected * 1e-9 + 1e-9);
    }

    /// Merging is symmetric.
    #[test]
    fn prop_merge_symmetric(a in non_empty_army_strategy(), b in army_strategy()) {
        let ab = a.merge(&b).unwrap();
        let ba = b.merge(&a).unwrap();
        prop_assert_eq!(ab.total_units(), ba.total_units());
        prop_assert!((ab.experience() - ba.experience()).abs() < 1e-9);
    }

    /// A fight never adds units and never lowers experience.
    #[test]
    fn prop_fight_bounded(a in non_empty_army_strategy(), b in army_strategy()) {
        let (winner, loser) = if is_first_winner(&a, &b) { (a, b) } else { (b, a) };
        let survivors = ArmyComposition::fight(&winner, &loser).unwrap();

        prop_assert!(survivors.spearmen() <= winner.spearmen());
        prop_assert!(survivors.archers() <= winner.archers());
        prop_assert!(survivors.cavalry() <= winner.cavalry());

        let gain = survivors.experience() / winner.experience();
        prop_assert!(gain >= 1.0 - 1e-12);
        prop_assert!(gain <= 2.0 + 1e-12);
    }

    /// An evenly matched fight costs the winner nothing and doubles its experience.
    #[test]
    fn prop_fight_even(a in non_empty_army_strategy()) {
        let survivors = ArmyComposition::fight(&a, &a).unwrap();
        prop_assert_eq!(survivors.total_units(), a.total_units());
        prop_assert!((survivors.experience() - 2.0 * a.experience()).abs() < 1e-9);
    }

    /// The weaker side can never be named the winner.
    #[test]
    fn prop_fight_rejects_weaker((a, b) in weaker_stronger_strategy()) {
        prop_assert_eq!(ArmyComposition::fight(&a, &b), Err(CombatError::WinnerWeaker));
        prop_assert!(!is_first_winner(&a, &b));
        prop_assert!(is_first_winner(&b, &a));
    }

    /// Ranking orders armies from strongest to weakest.
    #[test]
    fn prop_rank_by_power(mut armies in prop::collection::vec(army_strategy(), 0..20)) {
        rank_by_power(&mut armies);
        prop_assert!(armies.windows(2).all(|w| w[0].power() >= w[1].power()));
    }
}
