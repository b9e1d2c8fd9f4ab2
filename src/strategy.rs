//! The ways a player can pick its move

use anyhow::{anyhow, Result};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::bitboard::StoneSet;
use crate::monte_carlo::MonteCarlo;

/// Everything the server tells a player when asking for a move
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveRequest {
    /// The stones of the player asked to move
    pub own: StoneSet,
    pub opp: StoneSet,
    /// Playable columns, ascending
    pub legal: Vec<usize>,
    /// Columns played so far, oldest first
    pub history: Vec<usize>,
}

#[derive(Clone, Debug)]
pub enum Strategy {
    /// Any legal move, chosen uniformly
    Random,
    /// Random playouts from every legal move
    MonteCarlo(MonteCarlo),
}

impl Strategy {
    /// The name announced to the server
    pub fn display_name(&self) -> &'static str {
        match self {
            Strategy::Random => "RandomPlayer-Rust",
            Strategy::MonteCarlo(_) => "g0F-Rust",
        }
    }

    pub fn choose_move<R: Rng + ?Sized>(&self, request: &MoveRequest, rng: &mut R) -> Result<usize> {
        match self {
            Strategy::Random => request
                .legal
                .choose(rng)
                .copied()
                .ok_or_else(|| anyhow!("No legal moves, the game is already over")),
            Strategy::MonteCarlo(search) => search.select(
                request.own,
                request.opp,
                &request.legal,
                &request.history,
                rng,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn random_stays_legal() -> Result<()> {
        let request = MoveRequest {
            own: 0,
            opp: 0,
            legal: vec![1, 4, 5],
            history: vec![],
        };
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(9);
        for _ in 0..50 {
            let column = Strategy::Random.choose_move(&request, &mut rng)?;
            assert!(request.legal.contains(&column));
        }
        Ok(())
    }

    #[test]
    fn random_without_moves() {
        let request = MoveRequest {
            own: 0,
            opp: 0,
            legal: vec![],
            history: vec![],
        };
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(9);
        assert!(Strategy::Random.choose_move(&request, &mut rng).is_err());
    }
}
