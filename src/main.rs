use std::error::Error;
use std::io;

use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use serde::Serialize;
use tracing::{info, warn};

use coup_roles::ai::play_turn;
use coup_roles::{Game, Role};

#[derive(Parser)]
#[command(name = "coup-roles")]
#[command(about = "Plays a match of role-based Coup with every seat choosing random legal actions")]
struct Args {
    /// Player names, in turn order (2 to 6)
    #[arg(short, long, value_delimiter = ',', default_values_t = ["Alice", "Bob", "Charlie", "Dana", "Eli", "Frank"].map(String::from))]
    players: Vec<String>,

    /// Roles for the players, in the same order; missing roles are assigned at random
    #[arg(short, long, value_delimiter = ',')]
    roles: Vec<String>,

    /// Seed for role assignment and action choice
    #[arg(long)]
    seed: Option<u64>,

    /// Give up after this many rounds
    #[arg(long, default_value = "60")]
    max_rounds: usize,

    /// How to print the match log
    #[arg(long, value_enum, default_value = "text")]
    format: Format,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    Csv,
}

#[derive(Serialize)]
struct LogRow<'a> {
    round: usize,
    player: &'a str,
    role: Role,
    coins: u32,
    entry: &'a str,
}

#[derive(Serialize)]
struct Report<'a> {
    seed: u64,
    rounds: usize,
    winner: Option<&'a str>,
    game: &'a Game,
    log: Vec<(usize, String)>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = Pcg64::seed_from_u64(seed);
    info!(seed, "starting match");

    let mut game = Game::new();
    for (player_idx, name) in args.players.iter().enumerate() {
        match args.roles.get(player_idx) {
            Some(role) => game.add_player_with_role(name.as_str(), role)?,
            None => game.add_player_with_random_role(name.as_str(), &mut rng)?,
        };
    }

    if game.players().count() < 2 {
        return Err("a match needs at least 2 players".into());
    }

    let mut log: Vec<(usize, String)> = Vec::new();
    let mut rounds = 0;

    while rounds < args.max_rounds && game.winner().is_none() {
        rounds += 1;

        let mut round_log = Vec::new();
        let stuck = !play_turn(&mut game, &mut rng, &mut round_log);
        game.check_elimination(&mut round_log);

        log.extend(round_log.into_iter().map(|entry| (rounds, entry)));

        if stuck {
            warn!(round = rounds, "current player has no legal action, stopping");
            break;
        }
    }

    let winner = game.winner().and_then(|player_idx| game.player(player_idx).ok());
    match winner {
        Some(player) => info!(name = player.name(), rounds, "match won"),
        None => info!(rounds, "match ended without a winner"),
    }

    match args.format {
        Format::Text => print_text(&game, &log),
        Format::Json => {
            let report = Report {
                seed,
                rounds,
                winner: winner.map(|player| player.name()),
                game: &game,
                log,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Format::Csv => write_csv(&game, &log)?,
    }

    Ok(())
}

fn print_text(game: &Game, log: &[(usize, String)]) {
    let mut last_round = 0;
    for (round, entry) in log {
        if *round != last_round {
            println!("\n--- Round {round} ---");
            last_round = *round;
        }
        println!(" • {entry}");
    }

    println!("\nFinal player states:");
    for (_, player) in game.players() {
        println!(" - {} ({}) - Coins: {}", player.name(), player.role(), player.coins());
    }

    match game.require_winner() {
        Ok(player) => println!("\nWinner: {}", player.name()),
        Err(err) => println!("\nNo winner: {err}"),
    }
}

/// One row per log entry, tagged with whoever held the turn when the round ended.
fn write_csv(game: &Game, log: &[(usize, String)]) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    let current = game.turn()?;

    for (round, entry) in log {
        writer.serialize(LogRow {
            round: *round,
            player: current.name(),
            role: current.role(),
            coins: current.coins(),
            entry,
        })?;
    }

    writer.flush()?;
    Ok(())
}
