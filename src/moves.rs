//! Army moves: relocation, merging, fighting and castle capture.
//!
//! A move always goes one step, as reported by [`CompositeBoard::adjacent`],
//! so stepping onto a portal lands on its destination.

use crate::board::{Army, ArmyKind, BoardItem, Cell, CompositeBoard, PlayerType};
use crate::combat::{ArmyComposition, is_first_winner};
use crate::error::{BoardError, BoardResult};

/// What happened when an army moved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// The army moved onto an empty cell.
    Moved,
    /// The army joined a friendly army.
    Merged,
    /// The army beat the defender and took its cell.
    Won {
        /// What is left of the attacker.
        survivors: ArmyComposition,
    },
    /// The army attacked and was destroyed.
    Lost {
        /// What is left of the defender.
        survivors: ArmyComposition,
    },
    /// The army took an enemy castle.
    CastleCaptured {
        /// Previous owner of the castle.
        owner: PlayerType,
    },
}

/// Move the army on `from` one step to `to` and resolve the consequences.
///
/// The moving army must be an active field army. After the move it is
/// inactive for the rest of the turn. An army that ends the move on a cell
/// with a reinforcement in the bonus layer absorbs it. An enemy army without
/// units is swept aside and the attacker moves in unharmed.
///
/// # Errors
///
/// Returns [`BoardError::NoArmy`] if `from` holds no active field army,
/// [`BoardError::NotAdjacent`] if `to` is not one step away,
/// [`BoardError::Blocked`] for the mover's own castle, a portal, or its own
/// cell, and [`BoardError::Combat`] if the combat formulas reject the armies.
/// The board is unchanged on error.
pub fn resolve_move(board: &mut CompositeBoard, from: Cell, to: Cell) -> BoardResult<MoveOutcome> {
    let attacker = board
        .item(from)?
        .army()
        .filter(|army| army.active && army.kind == ArmyKind::Field)
        .copied()
        .ok_or(BoardError::NoArmy(from))?;
    if !board.adjacent(from)?.contains(&to) {
        return Err(BoardError::NotAdjacent { from, to });
    }
    if from == to {
        return Err(BoardError::Blocked(to));
    }

    let spent = |composition: ArmyComposition| Army {
        composition,
        active: false,
        ..attacker
    };

    let (outcome, occupant) = match *board.item(to)? {
        BoardItem::Empty => (MoveOutcome::Moved, Some(spent(attacker.composition))),
        BoardItem::Army(defender) if defender.owner == attacker.owner => {
            let merged = attacker.composition.merge(&defender.composition)?;
            (MoveOutcome::Merged, Some(spent(merged)))
        }
        // An army without units puts up no fight.
        BoardItem::Army(defender) if defender.composition.is_empty() => (
            MoveOutcome::Won {
                survivors: attacker.composition,
            },
            Some(spent(attacker.composition)),
        ),
        BoardItem::Army(defender) if attacker.composition.is_empty() => (
            MoveOutcome::Lost {
                survivors: defender.composition,
            },
            Some(defender),
        ),
        BoardItem::Army(defender) => {
            if is_first_winner(&attacker.composition, &defender.composition) {
                let survivors =
                    ArmyComposition::fight(&attacker.composition, &defender.composition)?;
                (MoveOutcome::Won { survivors }, Some(spent(survivors)))
            } else {
                let survivors =
                    ArmyComposition::fight(&defender.composition, &attacker.composition)?;
                let defender = Army {
                    composition: survivors,
                    ..defender
                };
                (MoveOutcome::Lost { survivors }, Some(defender))
            }
        }
        BoardItem::Castle { owner } if owner != attacker.owner => (
            MoveOutcome::CastleCaptured { owner },
            Some(spent(attacker.composition)),
        ),
        BoardItem::Castle { .. } | BoardItem::Portal(_) => return Err(BoardError::Blocked(to)),
    };

    let mut occupant = occupant.filter(|army| !army.composition.is_empty());
    let attacker_landed = !matches!(outcome, MoveOutcome::Lost { .. });
    let bonus = board.bonus_item(to)?.army().copied();
    if attacker_landed
        && let Some(army) = occupant.as_mut()
        && let Some(bonus) = bonus
    {
        army.composition = army.composition.merge(&bonus.composition)?;
        board.set_bonus_item(to, BoardItem::Empty)?;
        tracing::trace!(cell = %to, "reinforcement picked up");
    }

    board.take_item(from)?;
    board.set_item(to, occupant.map_or(BoardItem::Empty, BoardItem::Army))?;

    tracing::trace!(%from, %to, ?outcome, "move resolved");
    Ok(outcome)
}

/// Hand the turn to `next`: its armies may move again, and on a shared
/// screen the board is turned around to face it.
pub fn flip_turn(board: &mut CompositeBoard, next: PlayerType, invert: bool) {
    board.enable_armies(next);
    if invert {
        board.invert_board();
    }
}

/// The winner, once one side has lost all its castles or all its armies.
#[must_use]
pub fn winner(board: &CompositeBoard) -> Option<PlayerType> {
    let defeated = |player: PlayerType| {
        board.castles(player).is_empty() || !board.contains_player_armies(player)
    };
    match (defeated(PlayerType::First), defeated(PlayerType::Second)) {
        (false, true) => Some(PlayerType::First),
        (true, false) => Some(PlayerType::Second),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Coord, ItemGrid, Portal};

    fn cell(bx: u16, by: u16, x: u16, y: u16) -> Cell {
        Cell::new(Coord::new(bx, by), Coord::new(x, y))
    }

    fn army(owner: PlayerType, n: u32) -> BoardItem {
        BoardItem::Army(Army::field(owner, ArmyComposition::new(n, 0, 0, 1.0).unwrap()))
    }

    /// One 4x4 block with a castle per side.
    fn board() -> CompositeBoard {
        let mut items = ItemGrid::new(4, 4).unwrap();
        items
            .set(Coord::new(1, 1), BoardItem::Castle { owner: PlayerType::First })
            .unwrap();
        items
            .set(Coord::new(4, 4), BoardItem::Castle { owner: PlayerType::Second })
            .unwrap();
        let bonus = ItemGrid::new(4, 4).unwrap();
        let mut board = CompositeBoard::new(1, 1).unwrap();
        board.fill(&items, &bonus).unwrap();
        board
    }

    #[test]
    fn test_move_to_empty() {
        let mut b = board();
        b.set_item(cell(1, 1, 2, 2), army(PlayerType::First, 5)).unwrap();
        let outcome = resolve_move(&mut b, cell(1, 1, 2, 2), cell(1, 1, 2, 3)).unwrap();
        assert_eq!(outcome, MoveOutcome::Moved);
        assert!(b.item(cell(1, 1, 2, 2)).unwrap().is_empty());
        let moved = b.item(cell(1, 1, 2, 3)).unwrap().army().unwrap();
        assert!(!moved.active);
        assert_eq!(moved.composition.spearmen(), 5);
    }

    #[test]
    fn test_spent_army_cannot_move() {
        let mut b = board();
        b.set_item(cell(1, 1, 2, 2), army(PlayerType::First, 5)).unwrap();
        resolve_move(&mut b, cell(1, 1, 2, 2), cell(1, 1, 2, 3)).unwrap();
        assert!(matches!(
            resolve_move(&mut b, cell(1, 1, 2, 3), cell(1, 1, 2, 4)),
            Err(BoardError::NoArmy(_))
        ));
    }

    #[test]
    fn test_move_not_adjacent() {
        let mut b = board();
        b.set_item(cell(1, 1, 2, 2), army(PlayerType::First, 5)).unwrap();
        assert!(matches!(
            resolve_move(&mut b, cell(1, 1, 2, 2), cell(1, 1, 3, 3)),
            Err(BoardError::NotAdjacent { .. })
        ));
        assert!(b.item(cell(1, 1, 2, 2)).unwrap().army().is_some());
    }

    #[test]
    fn test_merge_with_friend() {
        let mut b = board();
        b.set_item(cell(1, 1, 2, 2), army(PlayerType::First, 5)).unwrap();
        b.set_item(cell(1, 1, 3, 2), army(PlayerType::First, 3)).unwrap();
        let outcome = resolve_move(&mut b, cell(1, 1, 2, 2), cell(1, 1, 3, 2)).unwrap();
        assert_eq!(outcome, MoveOutcome::Merged);
        let merged = b.item(cell(1, 1, 3, 2)).unwrap().army().unwrap();
        assert_eq!(merged.composition.total_units(), 8);
    }

    #[test]
    fn test_attack_and_win() {
        let mut b = board();
        b.set_item(cell(1, 1, 2, 2), army(PlayerType::First, 10)).unwrap();
        b.set_item(cell(1, 1, 3, 2), army(PlayerType::Second, 4)).unwrap();
        let outcome = resolve_move(&mut b, cell(1, 1, 2, 2), cell(1, 1, 3, 2)).unwrap();
        let MoveOutcome::Won { survivors } = outcome else {
            panic!("expected a win, got {outcome:?}");
        };
        assert_eq!(survivors.spearmen(), 2);
        let holder = b.item(cell(1, 1, 3, 2)).unwrap().army().unwrap();
        assert_eq!(holder.owner, PlayerType::First);
        assert!(b.item(cell(1, 1, 2, 2)).unwrap().is_empty());
    }

    #[test]
    fn test_attack_and_lose() {
        let mut b = board();
        b.set_item(cell(1, 1, 2, 2), army(PlayerType::First, 4)).unwrap();
        b.set_item(cell(1, 1, 3, 2), army(PlayerType::Second, 10)).unwrap();
        let outcome = resolve_move(&mut b, cell(1, 1, 2, 2), cell(1, 1, 3, 2)).unwrap();
        assert!(matches!(outcome, MoveOutcome::Lost { .. }));
        assert!(b.item(cell(1, 1, 2, 2)).unwrap().is_empty());
        let holder = b.item(cell(1, 1, 3, 2)).unwrap().army().unwrap();
        assert_eq!(holder.owner, PlayerType::Second);
        assert_eq!(holder.composition.spearmen(), 2);
    }

    #[test]
    fn test_attack_empty_army_unharmed() {
        let mut b = board();
        b.set_item(cell(1, 1, 2, 2), army(PlayerType::First, 10)).unwrap();
        b.set_item(cell(1, 1, 3, 2), army(PlayerType::Second, 0)).unwrap();
        let outcome = resolve_move(&mut b, cell(1, 1, 2, 2), cell(1, 1, 3, 2)).unwrap();
        let MoveOutcome::Won { survivors } = outcome else {
            panic!("expected a win, got {outcome:?}");
        };
        assert_eq!(survivors.spearmen(), 10);
        assert!((survivors.experience() - 1.0).abs() < 1e-9);
        let holder = b.item(cell(1, 1, 3, 2)).unwrap().army().unwrap();
        assert_eq!(holder.owner, PlayerType::First);
        assert_eq!(holder.composition.spearmen(), 10);
        assert!(b.item(cell(1, 1, 2, 2)).unwrap().is_empty());
    }

    #[test]
    fn test_empty_attacker_leaves_defender_intact() {
        let mut b = board();
        b.set_item(cell(1, 1, 2, 2), army(PlayerType::First, 0)).unwrap();
        b.set_item(cell(1, 1, 3, 2), army(PlayerType::Second, 4)).unwrap();
        let outcome = resolve_move(&mut b, cell(1, 1, 2, 2), cell(1, 1, 3, 2)).unwrap();
        assert!(matches!(outcome, MoveOutcome::Lost { .. }));
        assert!(b.item(cell(1, 1, 2, 2)).unwrap().is_empty());
        let holder = b.item(cell(1, 1, 3, 2)).unwrap().army().unwrap();
        assert_eq!(holder.owner, PlayerType::Second);
        assert_eq!(holder.composition.spearmen(), 4);
    }

    #[test]
    fn test_capture_castle() {
        let mut b = board();
        b.set_item(cell(1, 1, 4, 3), army(PlayerType::First, 1)).unwrap();
        let outcome = resolve_move(&mut b, cell(1, 1, 4, 3), cell(1, 1, 4, 4)).unwrap();
        assert_eq!(
            outcome,
            MoveOutcome::CastleCaptured {
                owner: PlayerType::Second
            }
        );
        assert!(b.castles(PlayerType::Second).is_empty());
        assert_eq!(winner(&b), Some(PlayerType::First));
    }

    #[test]
    fn test_own_castle_blocked() {
        let mut b = board();
        b.set_item(cell(1, 1, 1, 2), army(PlayerType::First, 1)).unwrap();
        assert!(matches!(
            resolve_move(&mut b, cell(1, 1, 1, 2), cell(1, 1, 1, 1)),
            Err(BoardError::Blocked(_))
        ));
    }

    #[test]
    fn test_reinforcement_picked_up() {
        let mut b = board();
        b.set_item(cell(1, 1, 2, 2), army(PlayerType::First, 5)).unwrap();
        let bonus = Army::reinforcement(
            PlayerType::First,
            ArmyComposition::new(0, 3, 0, 1.0).unwrap(),
        );
        b.set_bonus_item(cell(1, 1, 2, 3), BoardItem::Army(bonus)).unwrap();
        resolve_move(&mut b, cell(1, 1, 2, 2), cell(1, 1, 2, 3)).unwrap();
        let moved = b.item(cell(1, 1, 2, 3)).unwrap().army().unwrap();
        assert_eq!(moved.composition.archers(), 3);
        assert_eq!(moved.kind, ArmyKind::Field);
        assert!(b.bonus_item(cell(1, 1, 2, 3)).unwrap().is_empty());
    }

    #[test]
    fn test_move_through_portal() {
        let mut items = ItemGrid::new(6, 3).unwrap();
        let portal = Portal::new(Coord::new(3, 2), Coord::new(2, 1), Coord::new(1, 2));
        items.set(Coord::new(3, 2), BoardItem::Portal(portal)).unwrap();
        items.set(Coord::new(3, 1), army(PlayerType::First, 2)).unwrap();
        let bonus = ItemGrid::new(6, 3).unwrap();
        let mut b = CompositeBoard::new(2, 1).unwrap();
        b.fill(&items, &bonus).unwrap();

        assert!(matches!(
            resolve_move(&mut b, cell(1, 1, 3, 1), cell(1, 1, 3, 2)),
            Err(BoardError::NotAdjacent { .. })
        ));
        let outcome = resolve_move(&mut b, cell(1, 1, 3, 1), cell(2, 1, 1, 2)).unwrap();
        assert_eq!(outcome, MoveOutcome::Moved);
        assert!(b.item(cell(2, 1, 1, 2)).unwrap().army().is_some());
        assert!(b.item(cell(1, 1, 3, 2)).unwrap().portal().is_some());
    }

    #[test]
    fn test_flip_turn_reactivates_and_inverts() {
        let mut b = board();
        b.set_item(cell(1, 1, 2, 2), army(PlayerType::Second, 5)).unwrap();
        resolve_move(&mut b, cell(1, 1, 2, 2), cell(1, 1, 2, 1)).unwrap();
        assert!(b.find_active_player_armies(PlayerType::Second).is_empty());

        flip_turn(&mut b, PlayerType::Second, true);
        assert_eq!(
            b.find_active_player_armies(PlayerType::Second),
            vec![cell(1, 1, 3, 4)]
        );
        assert_eq!(b.castles(PlayerType::First), &[cell(1, 1, 4, 4)]);
    }

    #[test]
    fn test_no_winner_while_both_stand() {
        let mut b = board();
        b.set_item(cell(1, 1, 2, 2), army(PlayerType::First, 1)).unwrap();
        b.set_item(cell(1, 1, 3, 3), army(PlayerType::Second, 1)).unwrap();
        assert_eq!(winner(&b), None);
    }
}
