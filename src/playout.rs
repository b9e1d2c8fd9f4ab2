//! Random games played to the end

use rand::Rng;

use crate::bitboard::{self, StoneSet};
use crate::MAX_PLIES;

/// The two sides of a game, black moves first
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Black,
    White,
}

impl Side {
    /// The side moving at the 0-based `ply`
    pub fn at_ply(ply: usize) -> Self {
        if ply % 2 == 0 {
            Side::Black
        } else {
            Side::White
        }
    }

    /// The side making the 1-based `move_count`th move of the game
    pub fn from_move_count(move_count: usize) -> Self {
        if move_count % 2 == 1 {
            Side::Black
        } else {
            Side::White
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }

    /// Orders a mover/opponent pair as `(black, white)`
    pub fn to_colours(self, own: StoneSet, opp: StoneSet) -> (StoneSet, StoneSet) {
        match self {
            Side::Black => (own, opp),
            Side::White => (opp, own),
        }
    }

    pub fn win(self) -> Outcome {
        match self {
            Side::Black => Outcome::BlackWin,
            Side::White => Outcome::WhiteWin,
        }
    }
}

/// How a game ended
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    BlackWin,
    WhiteWin,
    Draw,
}

impl Outcome {
    pub fn winner(self) -> Option<Side> {
        match self {
            Outcome::BlackWin => Some(Side::Black),
            Outcome::WhiteWin => Some(Side::White),
            Outcome::Draw => None,
        }
    }
}

/// Plays uniformly random moves from the position until the game is decided.
///
/// `start_ply` is the 0-based index of the next move; it decides who moves
/// first. A win is seen one ply after the move that made it, when the side
/// that just moved gets checked for an alignment.
pub fn simulate<R: Rng + ?Sized>(
    black: StoneSet,
    white: StoneSet,
    start_ply: usize,
    rng: &mut R,
) -> Outcome {
    // indexed by side, black first
    let mut stones = [black, white];

    let mut ply = start_ply;
    while ply < MAX_PLIES {
        let (mover, waiting) = match Side::at_ply(ply) {
            Side::Black => (0, 1),
            Side::White => (1, 0),
        };

        if bitboard::has_four_in_a_row(stones[waiting]) {
            return Side::at_ply(ply).opponent().win();
        }

        let moves = bitboard::legal_moves(stones[mover], stones[waiting]);
        let column = match moves.nth_column(rng.gen_range(0..moves.len().max(1))) {
            Some(column) => column,
            // the board filled up before the ply counter did
            None => return Outcome::Draw,
        };
        stones[mover] = bitboard::play_unchecked(stones[mover], stones[waiting], column);

        ply += 1;
    }

    // the check happens before a move, so a line made by the last stone is never seen
    Outcome::Draw
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn side_parity() {
        assert_eq!(Side::at_ply(0), Side::Black);
        assert_eq!(Side::at_ply(41), Side::White);
        assert_eq!(Side::from_move_count(1), Side::Black);
        assert_eq!(Side::from_move_count(2), Side::White);
        // the 1-based move n is played at ply n - 1
        for n in 1..=42 {
            assert_eq!(Side::from_move_count(n), Side::at_ply(n - 1));
        }
        assert_eq!(Side::White.to_colours(1, 2), (2, 1));
    }

    #[test]
    fn finished_game_is_reported_immediately() -> Result<()> {
        // black stacks four in column 0, white plays column 1
        let (black, white) = bitboard::from_moves("0101010")?;
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        for _ in 0..20 {
            assert_eq!(simulate(black, white, 7, &mut rng), Outcome::BlackWin);
        }
        Ok(())
    }

    #[test]
    fn line_made_by_last_stone_is_a_draw() -> Result<()> {
        // nobody is aligned until white drops the 42nd stone into column 5
        let game = "456444341232530611460223056031100536126255";
        let (black, white) = bitboard::from_moves(&game[..41])?;
        assert!(!bitboard::has_four_in_a_row(black));
        assert!(!bitboard::has_four_in_a_row(white));
        assert_eq!(bitboard::legal_moves(white, black).collect::<Vec<_>>(), vec![5]);

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        assert_eq!(simulate(black, white, 41, &mut rng), Outcome::Draw);

        // the finished board has white aligned, but ply 42 ends the playout first
        let (black, white) = bitboard::from_moves(game)?;
        assert!(bitboard::has_four_in_a_row(white));
        assert_eq!(simulate(black, white, MAX_PLIES, &mut rng), Outcome::Draw);
        Ok(())
    }

    #[test]
    fn terminates_with_one_outcome() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);
        let mut seen = [0; 3];
        for _ in 0..2000 {
            match simulate(0, 0, 0, &mut rng) {
                Outcome::BlackWin => seen[0] += 1,
                Outcome::WhiteWin => seen[1] += 1,
                Outcome::Draw => seen[2] += 1,
            }
        }
        assert_eq!(seen.iter().sum::<i32>(), 2000);
        // random play favours the first player
        assert!(seen[0] > seen[1]);
    }

    #[test]
    fn full_board_past_ply_limit() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
        assert_eq!(simulate(0, 0, MAX_PLIES, &mut rng), Outcome::Draw);
    }
}
