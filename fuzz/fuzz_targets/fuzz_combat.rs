#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use portalwar::combat::{ArmyComposition, is_first_winner};
use portalwar::error::CombatError;

/// One side of a fight.
#[derive(Arbitrary, Debug)]
struct ArmyInput {
    spearmen: u32,
    archers: u32,
    cavalry: u32,
    /// Raw experience, possibly zero, negative or NaN.
    experience: f64,
}

/// Structured input for combat fuzzing.
#[derive(Arbitrary, Debug)]
struct CombatInput {
    first: ArmyInput,
    second: ArmyInput,
}

fn build(input: &ArmyInput) -> Option<ArmyComposition> {
    let army = ArmyComposition::new(input.spearmen, input.archers, input.cavalry, input.experience);
    if input.experience.is_finite() && input.experience > 0.0 {
        assert!(army.is_ok(), "valid experience rejected: {input:?}");
    } else {
        assert_eq!(army, Err(CombatError::InvalidExperience));
    }
    // Keep powers finite so the comparisons below stay meaningful.
    army.ok().filter(|a| a.experience() <= 1e6)
}

fuzz_target!(|input: CombatInput| {
    let (Some(first), Some(second)) = (build(&input.first), build(&input.second)) else {
        return;
    };

    // Merge must conserve units exactly and keep experience within the inputs.
    let fits = |a: u32, b: u32| a.checked_add(b).is_some();
    let no_overflow = fits(first.spearmen(), second.spearmen())
        && fits(first.archers(), second.archers())
        && fits(first.cavalry(), second.cavalry());
    match first.merge(&second) {
        Ok(merged) => {
            assert!(no_overflow);
            assert_eq!(
                u64::from(merged.spearmen()),
                u64::from(first.spearmen()) + u64::from(second.spearmen())
            );
            assert_eq!(
                merged.total_units(),
                first.total_units() + second.total_units()
            );
            let lo = first.experience().min(second.experience());
            let hi = first.experience().max(second.experience());
            let exp = merged.experience();
            assert!(
                exp >= lo * (1.0 - 1e-9) && exp <= hi * (1.0 + 1e-9),
                "merge experience {exp} outside [{lo}, {hi}]"
            );
        }
        Err(CombatError::EmptyMerge) => assert!(first.is_empty() && second.is_empty()),
        Err(CombatError::Overflow) => assert!(!no_overflow),
        Err(e) => panic!("unexpected merge error {e:?}"),
    }

    // Fight must never panic, never add units, never lower experience.
    let (winner, loser) = if is_first_winner(&first, &second) {
        (first, second)
    } else {
        (second, first)
    };
    match ArmyComposition::fight(&winner, &loser) {
        Ok(survivors) => {
            assert!(survivors.spearmen() <= winner.spearmen());
            assert!(survivors.archers() <= winner.archers());
            assert!(survivors.cavalry() <= winner.cavalry());
            assert!(survivors.experience() >= winner.experience());
        }
        Err(e) => {
            assert_eq!(e, CombatError::ZeroPowerWinner);
            assert!(winner.is_empty());
        }
    }

    // Naming the weaker side as winner is always rejected.
    if winner.power() > loser.power() && loser.power() > 0.0 {
        assert_eq!(
            ArmyComposition::fight(&loser, &winner),
            Err(CombatError::WinnerWeaker)
        );
    }
});
