//! Local games between two strategies, no server involved

use anyhow::Result;
use indicatif::*;
use log::info;
use rand::Rng;

use crate::bitboard::{self, StoneSet};
use crate::display;
use crate::playout::{Outcome, Side};
use crate::strategy::{MoveRequest, Strategy};
use crate::MAX_PLIES;

/// A finished game
#[derive(Clone, Debug)]
pub struct GameRecord {
    pub outcome: Outcome,
    /// Columns in the order they were played
    pub moves: Vec<usize>,
    pub black: StoneSet,
    pub white: StoneSet,
}

/// Results of a series of games with fixed colours
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchSummary {
    pub black_wins: usize,
    pub white_wins: usize,
    pub draws: usize,
}

impl MatchSummary {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::BlackWin => self.black_wins += 1,
            Outcome::WhiteWin => self.white_wins += 1,
            Outcome::Draw => self.draws += 1,
        }
    }

    pub fn games(&self) -> usize {
        self.black_wins + self.white_wins + self.draws
    }
}

/// Plays one game, `show_board` draws the board after every move
pub fn play_game<R: Rng + ?Sized>(
    black_player: &Strategy,
    white_player: &Strategy,
    rng: &mut R,
    show_board: bool,
) -> Result<GameRecord> {
    // indexed by side, black first
    let mut stones: [StoneSet; 2] = [0, 0];
    let mut moves = Vec::with_capacity(MAX_PLIES);

    let mut outcome = Outcome::Draw;
    for ply in 0..MAX_PLIES {
        let side = Side::at_ply(ply);
        let (mover, waiting, strategy) = match side {
            Side::Black => (0, 1, black_player),
            Side::White => (1, 0, white_player),
        };

        let request = MoveRequest {
            own: stones[mover],
            opp: stones[waiting],
            legal: bitboard::legal_moves(stones[mover], stones[waiting]).collect(),
            history: moves.clone(),
        };
        let column = strategy.choose_move(&request, rng)?;
        stones[mover] = bitboard::apply_move(stones[mover], stones[waiting], column)?;
        moves.push(column);

        if show_board {
            println!("{}", ply + 1);
            display::display(stones[0], stones[1])?;
            println!();
        }

        if bitboard::has_four_in_a_row(stones[mover]) {
            outcome = side.win();
            break;
        }
    }

    Ok(GameRecord {
        outcome,
        moves,
        black: stones[0],
        white: stones[1],
    })
}

/// Plays `games` games with the same colours, showing progress on a bar
pub fn play_match<R: Rng + ?Sized>(
    black_player: &Strategy,
    white_player: &Strategy,
    games: usize,
    rng: &mut R,
    show_board: bool,
) -> Result<MatchSummary> {
    let progress = if show_board {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(games as u64)
    };
    progress.set_style(
        ProgressStyle::default_bar()
            .template("Playing games: {bar:40.cyan/blue} {msg} ~{eta} remaining")
            .progress_chars("█▓▒░  "),
    );

    let mut summary = MatchSummary::default();
    for game in 0..games {
        let record = play_game(black_player, white_player, rng, show_board)?;
        info!(
            "Game {}: {:?} after {} moves ({})",
            game + 1,
            record.outcome,
            record.moves.len(),
            record.moves.iter().map(|c| c.to_string()).collect::<String>()
        );
        summary.record(record.outcome);

        progress.inc(1);
        progress.set_message(&format!(
            "(black {} / white {} / draw {})",
            summary.black_wins, summary.white_wins, summary.draws
        ));
    }
    progress.finish();

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monte_carlo::MonteCarlo;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn random_game_is_consistent() -> Result<()> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(21);
        for _ in 0..50 {
            let record = play_game(&Strategy::Random, &Strategy::Random, &mut rng, false)?;

            // every move was open when it was played
            let (mut black, mut white) = (0, 0);
            for (ply, &column) in record.moves.iter().enumerate() {
                let (own, opp) = match Side::at_ply(ply) {
                    Side::Black => (&mut black, white),
                    Side::White => (&mut white, black),
                };
                assert!(bitboard::can_drop(*own, opp, column));
                *own = bitboard::apply_move(*own, opp, column)?;
            }

            let (black, white) = bitboard::from_moves(
                record.moves.iter().map(|c| c.to_string()).collect::<String>(),
            )?;
            assert_eq!((black, white), (record.black, record.white));
            bitboard::validate_position(black, white)?;

            match record.outcome {
                Outcome::BlackWin => assert!(bitboard::has_four_in_a_row(black)),
                Outcome::WhiteWin => assert!(bitboard::has_four_in_a_row(white)),
                Outcome::Draw => {
                    assert_eq!(record.moves.len(), MAX_PLIES);
                    assert!(!bitboard::has_four_in_a_row(black));
                    assert!(!bitboard::has_four_in_a_row(white));
                }
            }
        }
        Ok(())
    }

    #[test]
    fn monte_carlo_beats_random() -> Result<()> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(8);
        let search = Strategy::MonteCarlo(MonteCarlo::new(100));
        let summary = play_match(&search, &Strategy::Random, 6, &mut rng, false)?;
        assert_eq!(summary.games(), 6);
        assert!(summary.black_wins >= 5);
        Ok(())
    }
}
