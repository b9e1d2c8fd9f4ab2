//! Move selection by random playouts
//!
//! Every candidate move is played on a copy of the position, then the game
//! is finished with uniformly random moves many times over. The candidate
//! whose playouts were won most often by the side to move is chosen.

use anyhow::{anyhow, Result};
use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;

use std::cmp::Ordering;
use std::time::{Duration, Instant};

use crate::bitboard::{self, StoneSet};
use crate::playout::{simulate, Outcome, Side};

/// Number of playouts run for every candidate move
pub const TIMES: usize = 500;

// playouts handed to a worker at once, each batch has its own generator
const BATCH_SIZE: usize = 64;

/// Results of the playouts of one candidate move
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub black_wins: u32,
    pub white_wins: u32,
    pub draws: u32,
}

impl Tally {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::BlackWin => self.black_wins += 1,
            Outcome::WhiteWin => self.white_wins += 1,
            Outcome::Draw => self.draws += 1,
        }
    }

    pub fn wins(&self, side: Side) -> u32 {
        match side {
            Side::Black => self.black_wins,
            Side::White => self.white_wins,
        }
    }

    /// Number of playouts counted
    pub fn played(&self) -> u32 {
        self.black_wins + self.white_wins + self.draws
    }

    pub fn merge(self, other: Tally) -> Tally {
        Tally {
            black_wins: self.black_wins + other.black_wins,
            white_wins: self.white_wins + other.white_wins,
            draws: self.draws + other.draws,
        }
    }

    /// Orders two tallies by the win rate of `side`.
    ///
    /// With equal playout counts this is the same as comparing win counts.
    /// A tally without playouts ranks below everything else.
    pub fn cmp_wins(&self, other: &Tally, side: Side) -> Ordering {
        match (self.played(), other.played()) {
            (0, 0) => Ordering::Equal,
            (0, _) => Ordering::Less,
            (_, 0) => Ordering::Greater,
            (played, other_played) => {
                let lhs = self.wins(side) as u64 * other_played as u64;
                let rhs = other.wins(side) as u64 * played as u64;
                lhs.cmp(&rhs)
            }
        }
    }
}

/// Settings of the playout search
#[derive(Clone, Debug)]
pub struct MonteCarlo {
    /// Playouts per candidate move
    pub rollouts: usize,
    /// Wall clock budget for one decision, playouts still pending when it runs out are skipped
    pub time_limit: Option<Duration>,
}

impl Default for MonteCarlo {
    fn default() -> Self {
        Self::new(TIMES)
    }
}

impl MonteCarlo {
    pub fn new(rollouts: usize) -> Self {
        Self {
            rollouts,
            time_limit: None,
        }
    }

    /// Adds a time budget to an existing `MonteCarlo`
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    /// Runs the playouts of every candidate move.
    ///
    /// `side` is the side playing `own`, `move_count` the 1-based number of
    /// the move being chosen. Returns the candidates in the given order with
    /// their tallies.
    pub fn evaluate<R: Rng + ?Sized>(
        &self,
        own: StoneSet,
        opp: StoneSet,
        candidates: &[usize],
        side: Side,
        move_count: usize,
        rng: &mut R,
    ) -> Result<Vec<(usize, Tally)>> {
        // positions after each candidate, as (black, white)
        let mut starts = Vec::with_capacity(candidates.len());
        for &column in candidates {
            let own = bitboard::apply_move(own, opp, column)?;
            starts.push(side.to_colours(own, opp));
        }

        // seeds are drawn up front so the result doesn't depend on scheduling
        let mut batches = Vec::new();
        for index in 0..candidates.len() {
            let mut remaining = self.rollouts;
            while remaining > 0 {
                let size = remaining.min(BATCH_SIZE);
                batches.push((index, size, rng.gen::<u64>()));
                remaining -= size;
            }
        }

        let deadline = self.time_limit.map(|limit| Instant::now() + limit);

        let results: Vec<(usize, Tally)> = batches
            .into_par_iter()
            .map(|(index, size, seed)| {
                let (black, white) = starts[index];
                let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
                let mut tally = Tally::default();
                for _ in 0..size {
                    if let Some(deadline) = deadline {
                        if Instant::now() >= deadline {
                            break;
                        }
                    }
                    tally.record(simulate(black, white, move_count, &mut rng));
                }
                (index, tally)
            })
            .collect();

        let mut tallies = vec![Tally::default(); candidates.len()];
        for (index, tally) in results {
            tallies[index] = tallies[index].merge(tally);
        }

        Ok(candidates.iter().copied().zip(tallies).collect())
    }

    /// Chooses a column for the side owning `own`.
    ///
    /// `history` holds the moves played so far, it determines which colour
    /// `own` plays. Ties go to the candidate listed last.
    pub fn select<R: Rng + ?Sized>(
        &self,
        own: StoneSet,
        opp: StoneSet,
        legal: &[usize],
        history: &[usize],
        rng: &mut R,
    ) -> Result<usize> {
        if legal.is_empty() {
            return Err(anyhow!("No legal moves, the game is already over"));
        }

        let move_count = history.len() + 1;
        let side = Side::from_move_count(move_count);

        let stones = bitboard::stone_count(own | opp);
        if stones != history.len() {
            warn!(
                "{} stones on the board but {} moves in the history",
                stones,
                history.len()
            );
        }

        let mut ranked = self.evaluate(own, opp, legal, side, move_count, rng)?;
        for (column, tally) in ranked.iter() {
            debug!(
                "column {}: black {} white {} draw {}",
                column, tally.black_wins, tally.white_wins, tally.draws
            );
        }

        // stable, so equal tallies keep their order
        ranked.sort_by(|a, b| a.1.cmp_wins(&b.1, side));

        let (column, tally) = ranked[ranked.len() - 1];
        debug!(
            "{:?} plays column {} ({}/{} won)",
            side,
            column,
            tally.wins(side),
            tally.played()
        );
        Ok(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_ordering() {
        let mut a = Tally::default();
        let mut b = Tally::default();
        assert_eq!(a.cmp_wins(&b, Side::Black), Ordering::Equal);

        a.record(Outcome::BlackWin);
        assert_eq!(a.cmp_wins(&b, Side::Black), Ordering::Greater);

        // 1/1 against 1/2
        b.record(Outcome::BlackWin);
        b.record(Outcome::Draw);
        assert_eq!(a.cmp_wins(&b, Side::Black), Ordering::Greater);
        assert_eq!(b.cmp_wins(&a, Side::White), Ordering::Equal);

        let merged = a.merge(b);
        assert_eq!(merged.played(), 3);
        assert_eq!(merged.wins(Side::Black), 2);
    }

    #[test]
    fn rollouts_are_split_across_batches() -> Result<()> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(2);
        let results = MonteCarlo::new(130).evaluate(0, 0, &[0, 6], Side::Black, 1, &mut rng)?;
        assert_eq!(results.len(), 2);
        for (_, tally) in results {
            assert_eq!(tally.played(), 130);
        }
        Ok(())
    }

    #[test]
    fn expired_budget_counts_nothing() -> Result<()> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(2);
        let search = MonteCarlo::default().with_time_limit(Duration::from_secs(0));
        let results = search.evaluate(0, 0, &[1, 2, 3], Side::Black, 1, &mut rng)?;
        assert!(results.iter().all(|(_, tally)| tally.played() == 0));

        // still answers with a legal move
        let column = search.select(0, 0, &[1, 2, 3], &[], &mut rng)?;
        assert_eq!(column, 3);
        Ok(())
    }

    #[test]
    fn no_candidates() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(2);
        assert!(MonteCarlo::default().select(0, 0, &[], &[], &mut rng).is_err());
    }

    #[test]
    fn full_column_candidate() -> Result<()> {
        let (black, white) = bitboard::from_moves("222222")?;
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(2);
        let history = [2, 2, 2, 2, 2, 2];
        assert!(MonteCarlo::new(10)
            .select(black, white, &[2], &history, &mut rng)
            .is_err());
        Ok(())
    }
}
