//! Fight arithmetic command implementation.

use super::{ArmyArg, CliError};
use portalwar::combat::{ArmyComposition, is_first_winner};

/// Execute the fight command.
///
/// # Errors
///
/// Returns an error if the designated winner is weaker than the loser.
pub(crate) fn execute(winner: ArmyArg, loser: ArmyArg) -> Result<(), CliError> {
    let (winner, loser) = (winner.0, loser.0);
    if !is_first_winner(&winner, &loser) {
        return Err(CliError::new(format!(
            "winner power {:.2} is below loser power {:.2}",
            winner.power(),
            loser.power()
        )));
    }

    let survivors = ArmyComposition::fight(&winner, &loser)?;

    println!("Winner:    {}", describe(&winner));
    println!("Loser:     {}", describe(&loser));
    println!("Survivors: {}", describe(&survivors));

    Ok(())
}

fn describe(army: &ArmyComposition) -> String {
    format!(
        "{} spearmen, {} archers, {} cavalry, experience {:.3} (power {:.2})",
        army.spearmen(),
        army.archers(),
        army.cavalry(),
        army.experience(),
        army.power()
    )
}
