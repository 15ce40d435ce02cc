//! Army composition and combat resolution.
//!
//! Combat is deterministic and purely additive: every unit contributes the
//! same raw strength regardless of type, and experience scales the whole
//! army uniformly. Power is the only strength scalar.

// Unit counts are converted to f64 for the formulas and back after ceil().
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use serde::{Deserialize, Serialize};

use crate::error::{CombatError, CombatResult};

/// Unit type inside an army.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    /// Spearmen.
    Spearman,
    /// Archers.
    Archer,
    /// Cavalry.
    Cavalry,
}

/// Per-unit-type counts plus an experience multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawComposition")]
pub struct ArmyComposition {
    spearmen: u32,
    archers: u32,
    cavalry: u32,
    experience: f64,
}

/// Unchecked wire form, validated through [`ArmyComposition::new`].
#[derive(Debug, Deserialize)]
struct RawComposition {
    spearmen: u32,
    archers: u32,
    cavalry: u32,
    experience: f64,
}

impl TryFrom<RawComposition> for ArmyComposition {
    type Error = CombatError;

    fn try_from(raw: RawComposition) -> CombatResult<Self> {
        Self::new(raw.spearmen, raw.archers, raw.cavalry, raw.experience)
    }
}

/// Experience produced by a formula must stay inside the domain of `new`.
fn checked_experience(experience: f64) -> CombatResult<f64> {
    if experience.is_finite() && experience > 0.0 {
        Ok(experience)
    } else {
        Err(CombatError::InvalidExperience)
    }
}

impl ArmyComposition {
    /// Create a composition from explicit counts.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::InvalidExperience`] unless `experience` is
    /// finite and strictly positive.
    pub fn new(spearmen: u32, archers: u32, cavalry: u32, experience: f64) -> CombatResult<Self> {
        if !experience.is_finite() || experience <= 0.0 {
            return Err(CombatError::InvalidExperience);
        }
        Ok(Self {
            spearmen,
            archers,
            cavalry,
            experience,
        })
    }

    /// Number of spearmen.
    #[must_use]
    pub const fn spearmen(&self) -> u32 {
        self.spearmen
    }

    /// Number of archers.
    #[must_use]
    pub const fn archers(&self) -> u32 {
        self.archers
    }

    /// Number of cavalry.
    #[must_use]
    pub const fn cavalry(&self) -> u32 {
        self.cavalry
    }

    /// Count of a single unit type.
    #[must_use]
    pub const fn count(&self, kind: UnitKind) -> u32 {
        match kind {
            UnitKind::Spearman => self.spearmen,
            UnitKind::Archer => self.archers,
            UnitKind::Cavalry => self.cavalry,
        }
    }

    /// Experience multiplier.
    #[must_use]
    pub const fn experience(&self) -> f64 {
        self.experience
    }

    /// Total number of units of all types.
    #[must_use]
    pub fn total_units(&self) -> u64 {
        u64::from(self.spearmen) + u64::from(self.archers) + u64::from(self.cavalry)
    }

    /// Check if the army has no units left.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total_units() == 0
    }

    /// Combat power: total units times experience.
    #[must_use]
    pub fn power(&self) -> f64 {
        self.total_units() as f64 * self.experience
    }

    /// Combine two armies into one.
    ///
    /// Counts add per type; experience becomes the unit-weighted average.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::EmptyMerge`] if both armies have zero units,
    /// [`CombatError::Overflow`] if a unit count would not fit in `u32` and
    /// [`CombatError::InvalidExperience`] if the average is not finite.
    pub fn merge(&self, other: &Self) -> CombatResult<Self> {
        let total = self.total_units() + other.total_units();
        if total == 0 {
            return Err(CombatError::EmptyMerge);
        }
        let add = |a: u32, b: u32| a.checked_add(b).ok_or(CombatError::Overflow);
        let spearmen = add(self.spearmen, other.spearmen)?;
        let archers = add(self.archers, other.archers)?;
        let cavalry = add(self.cavalry, other.cavalry)?;

        let experience = (self.total_units() as f64 * self.experience
            + other.total_units() as f64 * other.experience)
            / total as f64;

        Ok(Self {
            spearmen,
            archers,
            cavalry,
            experience: checked_experience(experience)?,
        })
    }

    /// Resolve a fight, returning what remains of the winner.
    ///
    /// The caller decides who won (see [`is_first_winner`]). The winner
    /// loses `ceil(count * sqrt(diff / winner_power))` units of each type
    /// and its experience is multiplied by `1 + (loser_power / winner_power)^2`.
    /// The loser is destroyed.
    ///
    /// # Errors
    ///
    /// Returns [`CombatError::ZeroPowerWinner`] if the winner has no power,
    /// [`CombatError::WinnerWeaker`] if the loser is stronger and
    /// [`CombatError::InvalidExperience`] if the gain overflows experience.
    pub fn fight(winner: &Self, loser: &Self) -> CombatResult<Self> {
        let winner_power = winner.power();
        let loser_power = loser.power();
        if winner_power <= 0.0 {
            return Err(CombatError::ZeroPowerWinner);
        }
        if winner_power < loser_power {
            return Err(CombatError::WinnerWeaker);
        }

        let mortality_rate = ((winner_power - loser_power) / winner_power).sqrt();
        let ratio = loser_power / winner_power;
        let experience_gain = 1.0 + ratio * ratio;

        let survivors = |count: u32| {
            let losses = (f64::from(count) * mortality_rate).ceil() as u32;
            count.saturating_sub(losses)
        };

        Ok(Self {
            spearmen: survivors(winner.spearmen),
            archers: survivors(winner.archers),
            cavalry: survivors(winner.cavalry),
            experience: checked_experience(winner.experience * experience_gain)?,
        })
    }

    /// Remove units, saturating each count at zero.
    pub fn delete_army_part(&mut self, spearmen: u32, archers: u32, cavalry: u32) {
        self.spearmen = self.spearmen.saturating_sub(spearmen);
        self.archers = self.archers.saturating_sub(archers);
        self.cavalry = self.cavalry.saturating_sub(cavalry);
    }
}

/// Check if the first army beats the second. Ties go to `first`.
#[must_use]
pub fn is_first_winner(first: &ArmyComposition, second: &ArmyComposition) -> bool {
    first.power() >= second.power()
}

/// Order armies from strongest to weakest by power.
///
/// Ties keep their input order.
pub fn rank_by_power(armies: &mut [ArmyComposition]) {
    armies.sort_by(|a, b| b.power().total_cmp(&a.power()));
}

/// Kani formal verification proofs.
///
/// Run with: `cargo kani`
#[cfg(kani)]
mod kani_proofs {
    /// Prove that saturating unit removal never underflows.
    #[kani::proof]
    fn prove_delete_army_part_saturates() {
        let count: u32 = kani::any();
        let removed: u32 = kani::any();

        let remaining = count.saturating_sub(removed);

        assert!(remaining <= count);
        if removed >= count {
            assert!(remaining == 0);
        }
    }
}
