//! A Monte-Carlo agent for playing the board game 'Connect 4' against a game server
//!
//! Positions are held as a pair of bitboards, one per player, and moves are
//! chosen by playing many uniformly random games from every candidate move
//! and keeping the move that won most often.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_mc::{bitboard, monte_carlo::MonteCarlo};
//! use rand::SeedableRng;
//! use rand_xoshiro::Xoshiro256PlusPlus;
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! // three stacked stones in the middle column, the fourth one wins
//! let (own, opp) = bitboard::from_moves("313131")?;
//! let legal: Vec<usize> = bitboard::legal_moves(own, opp).collect();
//!
//! let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
//! let column = MonteCarlo::default().select(own, opp, &legal, &[3, 1, 3, 1, 3, 1], &mut rng)?;
//!
//! assert_eq!(column, 3);
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod bitboard;

pub mod playout;

pub mod monte_carlo;

pub mod strategy;

pub mod protocol;

pub mod session;

pub mod display;

pub mod arena;


/// The width of the game board in tiles
pub const WIDTH: usize = 7;

/// The height of the game board in tiles
pub const HEIGHT: usize = 6;

/// The number of stones on a full board, which is also the length of the longest game
pub const MAX_PLIES: usize = WIDTH * HEIGHT;

// ensure that the given dimensions fit in a u64 for the bitboard representation
const_assert!(WIDTH * (HEIGHT + 1) < 64);
// moves travel over the wire as single decimal digits
const_assert!(WIDTH <= 10);
