use anyhow::{anyhow, Result};

use crate::{HEIGHT, MAX_PLIES, WIDTH};

/// One player's stones.
///
/// Each column takes `HEIGHT + 1` bits, bottom row first. The extra bit on
/// top of every column is never set, it keeps alignments from wrapping
/// into the next column.
pub type StoneSet = u64;

mod static_masks {
    use crate::{HEIGHT, WIDTH};

    pub const fn bottom_mask() -> u64 {
        let mut mask = 0;
        let mut column = 0;
        while column < WIDTH {
            mask |= 1 << (column * (HEIGHT + 1));
            column += 1;
        }
        mask
    }
    pub const fn full_board_mask() -> u64 {
        bottom_mask() * ((1 << HEIGHT as u64) - 1)
    }
    pub const fn top_row_mask() -> u64 {
        bottom_mask() << (HEIGHT - 1)
    }
}

pub fn top_mask(column: usize) -> u64 {
    1 << (column * (HEIGHT + 1) + (HEIGHT - 1))
}

pub fn bottom_mask(column: usize) -> u64 {
    1 << (column * (HEIGHT + 1))
}

pub fn column_mask(column: usize) -> u64 {
    ((1 << HEIGHT) - 1) << (column * (HEIGHT + 1))
}

/// Number of stones in `column` of an occupancy mask
pub fn fill_count(board: u64, column: usize) -> usize {
    (board & column_mask(column)).count_ones() as usize
}

pub fn stone_count(stones: StoneSet) -> usize {
    stones.count_ones() as usize
}

fn check_column(column: usize) -> Result<()> {
    if column >= WIDTH {
        return Err(anyhow!(
            "Invalid move, column {} out of range. Columns must be between 0 and {}",
            column,
            WIDTH - 1
        ));
    }
    Ok(())
}

/// Is there room left in `column`?
pub fn can_drop(own: StoneSet, opp: StoneSet, column: usize) -> bool {
    column < WIDTH && top_mask(column) & (own | opp) == 0
}

/// Bit of the lowest empty cell of `column`.
///
/// The occupied part of a column is a run of ones from the bottom, so adding
/// the bottom bit carries into the first empty cell. Only meaningful if the
/// column isn't full.
fn drop_bit(board: u64, column: usize) -> u64 {
    (board + bottom_mask(column)) & column_mask(column)
}

/// Drops a stone for `own` into `column` without checking that it fits.
pub(crate) fn play_unchecked(own: StoneSet, opp: StoneSet, column: usize) -> StoneSet {
    own ^ drop_bit(own | opp, column)
}

/// Returns `own` with a stone added on top of `column`
pub fn apply_move(own: StoneSet, opp: StoneSet, column: usize) -> Result<StoneSet> {
    check_column(column)?;
    if !can_drop(own, opp, column) {
        return Err(anyhow!("Invalid move, column {} full", column));
    }
    Ok(play_unchecked(own, opp, column))
}

/// Returns `own` with the top stone of `column` taken off.
///
/// The top stone has to be one of `own`'s stones.
pub fn remove_move(own: StoneSet, opp: StoneSet, column: usize) -> Result<StoneSet> {
    check_column(column)?;
    let board = own | opp;
    if board & column_mask(column) == 0 {
        return Err(anyhow!("Cannot remove a stone, column {} is empty", column));
    }
    // the next free cell shifted down by one is the current top stone
    let top = drop_bit(board, column) >> 1;
    let top = if top == 0 {
        // full column, the carry went into the padding bit
        top_mask(column)
    } else {
        top
    };
    if own & top == 0 {
        return Err(anyhow!(
            "Cannot remove a stone, the top of column {} belongs to the opponent",
            column
        ));
    }
    Ok(own ^ top)
}

/// Columns that can still be played, in ascending order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Moves {
    // bit `c` is set when column `c` is open
    open: u8,
}

impl Moves {
    pub fn len(&self) -> usize {
        self.open.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.open == 0
    }

    pub fn contains(&self, column: usize) -> bool {
        column < WIDTH && self.open & (1 << column) != 0
    }

    /// The `n`th open column, counting from the left
    pub fn nth_column(&self, n: usize) -> Option<usize> {
        let mut open = self.open;
        for _ in 0..n {
            // clear the lowest set bit
            open &= open.wrapping_sub(1);
        }
        if open == 0 {
            None
        } else {
            Some(open.trailing_zeros() as usize)
        }
    }
}

impl Iterator for Moves {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        match self.open {
            0 => None,
            _ => {
                let column = self.open.trailing_zeros() as usize;
                self.open &= self.open - 1;
                Some(column)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len(), Some(self.len()))
    }
}

impl ExactSizeIterator for Moves {}

/// All playable columns of the position
pub fn legal_moves(own: StoneSet, opp: StoneSet) -> Moves {
    let top_stones = (own | opp) & static_masks::top_row_mask();
    let mut open = 0;
    for column in 0..WIDTH {
        if top_stones & top_mask(column) == 0 {
            open |= 1 << column;
        }
    }
    Moves { open }
}

/// Checks `stones` for four aligned tiles
pub fn has_four_in_a_row(stones: StoneSet) -> bool {
    // diagonal \
    if stones & (stones >> HEIGHT) & (stones >> (2 * HEIGHT)) & (stones >> (3 * HEIGHT)) != 0 {
        return true;
    }

    // diagonal /
    if stones
        & (stones >> (HEIGHT + 2))
        & (stones >> (2 * (HEIGHT + 2)))
        & (stones >> (3 * (HEIGHT + 2)))
        != 0
    {
        return true;
    }

    // horizontal
    if stones
        & (stones >> (HEIGHT + 1))
        & (stones >> (2 * (HEIGHT + 1)))
        & (stones >> (3 * (HEIGHT + 1)))
        != 0
    {
        return true;
    }

    // vertical
    stones & (stones >> 1) & (stones >> 2) & (stones >> 3) != 0
}

/// Checks that a pair of stone sets could come from a real game
pub fn validate_position(own: StoneSet, opp: StoneSet) -> Result<()> {
    let padding = !static_masks::full_board_mask();
    if (own | opp) & padding != 0 {
        return Err(anyhow!(
            "Invalid position, stones outside the board: {:#x}",
            (own | opp) & padding
        ));
    }
    if own & opp != 0 {
        return Err(anyhow!("Invalid position, both players own {:#x}", own & opp));
    }

    let board = own | opp;
    for column in 0..WIDTH {
        let filled = (board & column_mask(column)) >> (column * (HEIGHT + 1));
        // the occupied cells must be a run of ones starting at the bottom
        if filled & (filled + 1) != 0 {
            return Err(anyhow!("Invalid position, floating stone in column {}", column));
        }
    }
    Ok(())
}

/// Builds `(black, white)` stone sets from a string of 0-based columns, black moving first
pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<(StoneSet, StoneSet)> {
    let mut stones = [0, 0];

    for (ply, column_char) in moves.as_ref().chars().enumerate() {
        if ply >= MAX_PLIES {
            return Err(anyhow!("Invalid game, more than {} moves", MAX_PLIES));
        }
        match column_char.to_digit(10).map(|c| c as usize) {
            Some(column) if column < WIDTH => {
                let mover = ply % 2;
                stones[mover] = apply_move(stones[mover], stones[1 - mover], column)?;
            }
            _ => return Err(anyhow!("could not parse '{}' as a valid move", column_char)),
        }
    }
    Ok((stones[0], stones[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks() {
        assert_eq!(static_masks::top_row_mask(), 141845657554976);
        assert_eq!(column_mask(0), 0b111111);
        assert_eq!(column_mask(1), 0b111111 << 7);
        assert_eq!(top_mask(6), 1 << 47);
        assert_eq!(bottom_mask(3), 1 << 21);
    }

    #[test]
    fn drop_lands_on_lowest_empty_row() -> Result<()> {
        let own = apply_move(0, 0, 2)?;
        assert_eq!(own, 1 << 14);

        let opp = apply_move(0, own, 2)?;
        assert_eq!(opp, 1 << 15);

        let own = apply_move(own, opp, 2)?;
        assert_eq!(own, (1 << 14) | (1 << 16));
        Ok(())
    }

    #[test]
    fn remove_takes_top_of_full_column() -> Result<()> {
        let (black, white) = from_moves("000000")?;
        // white placed the top stone
        assert_eq!(remove_move(white, black, 0)?, white & !top_mask(0));
        assert!(remove_move(black, white, 0).is_err());
        Ok(())
    }

    #[test]
    fn remove_from_empty_column() {
        assert!(remove_move(0, 0, 4).is_err());
    }

    #[test]
    fn out_of_range() {
        assert!(!can_drop(0, 0, WIDTH));
        assert!(apply_move(0, 0, WIDTH).is_err());
        assert!(remove_move(1, 0, 9).is_err());
    }

    #[test]
    fn moves_list() {
        let moves = Moves { open: 0b1010010 };
        assert_eq!(moves.len(), 3);
        assert_eq!(moves.nth_column(0), Some(1));
        assert_eq!(moves.nth_column(2), Some(6));
        assert_eq!(moves.nth_column(3), None);
        assert!(moves.contains(4));
        assert!(!moves.contains(0));
        assert_eq!(moves.collect::<Vec<_>>(), vec![1, 4, 6]);
    }
}
