use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use std::time::Duration;

use connect4_mc::arena::play_match;
use connect4_mc::monte_carlo::{MonteCarlo, TIMES};
use connect4_mc::session::{self, Player};
use connect4_mc::strategy::Strategy;

#[derive(Parser, Debug)]
#[command(author, version, about = "Connect 4 player for the voda game server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Connect to a game server and play until it says quit
    Play {
        /// Host running the game server
        #[arg(long, default_value = "localhost")]
        host: String,

        /// Port the game server listens on for this player
        #[arg(long, default_value_t = 8000)]
        port: u16,

        #[arg(long, value_enum, default_value_t = PlayerKind::Random)]
        player: PlayerKind,

        /// Name announced to the server instead of the strategy's own
        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        search: SearchArgs,
    },
    /// Play games between two strategies locally
    Arena {
        #[arg(long, value_enum, default_value_t = PlayerKind::G0f)]
        black: PlayerKind,

        #[arg(long, value_enum, default_value_t = PlayerKind::Random)]
        white: PlayerKind,

        #[arg(long, default_value_t = 1)]
        games: usize,

        /// Draw the board after every move
        #[arg(long, action = clap::ArgAction::SetTrue)]
        show_board: bool,

        #[command(flatten)]
        search: SearchArgs,
    },
}

#[derive(clap::Args, Debug)]
struct SearchArgs {
    /// Random playouts per candidate move
    #[arg(long, default_value_t = TIMES)]
    rollouts: usize,

    /// Time budget per move in milliseconds
    #[arg(long)]
    time_limit_ms: Option<u64>,

    /// Worker threads for the playouts, defaults to one per CPU
    #[arg(long)]
    threads: Option<usize>,

    /// Seed for reproducible games
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum PlayerKind {
    /// Uniformly random legal moves
    Random,
    /// Random playouts from every legal move
    #[value(name = "g0F")]
    G0f,
}

impl SearchArgs {
    fn strategy(&self, kind: PlayerKind) -> Strategy {
        match kind {
            PlayerKind::Random => Strategy::Random,
            PlayerKind::G0f => {
                let mut search = MonteCarlo::new(self.rollouts);
                if let Some(ms) = self.time_limit_ms {
                    search = search.with_time_limit(Duration::from_millis(ms));
                }
                Strategy::MonteCarlo(search)
            }
        }
    }

    fn rng(&self) -> Xoshiro256PlusPlus {
        match self.seed {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_entropy(),
        }
    }

    fn setup_threads(&self) -> Result<()> {
        let threads = self.threads.unwrap_or_else(num_cpus::get);
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.mode {
        Mode::Play {
            host,
            port,
            player,
            name,
            search,
        } => {
            search.setup_threads()?;
            let mut player = Player::new(search.strategy(player), name, search.rng());
            info!("Playing as {}", player.name());

            let mut stream = session::connect(&host, port)?;
            session::run(&mut stream, &mut player)?;
        }
        Mode::Arena {
            black,
            white,
            games,
            show_board,
            search,
        } => {
            search.setup_threads()?;
            let black_player = search.strategy(black);
            let white_player = search.strategy(white);
            let mut rng = search.rng();

            let summary = play_match(&black_player, &white_player, games, &mut rng, show_board)?;
            println!(
                "Win: Black ({}) {}, Win: White ({}) {}, Draw {}",
                black_player.display_name(),
                summary.black_wins,
                white_player.display_name(),
                summary.white_wins,
                summary.draws
            );
        }
    }
    Ok(())
}
