use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chess_tournament::config::{AppConfig, OutputFormat};
use chess_tournament::models::{
    GameId, GameResult, Player, PlayerId, RankingSystem, Standing, Tournament, TournamentType,
};
use chess_tournament::{find_duplicate_player, parse_player_ids};
use chess_tournament::ranking::RankingEngine;
use chess_tournament::schedule::{double_round_robin, round_robin, Schedule};
use chess_tournament::snapshot::TournamentSnapshot;

#[derive(Parser)]
#[command(name = "chess-tournament")]
#[command(about = "Round-robin chess tournament scheduling and rankings")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a tournament snapshot with enrolled players
    Init {
        /// Tournament name
        #[arg(long)]
        name: String,

        /// Player names, comma-separated; ids are assigned 1..N in this order
        #[arg(long)]
        players: String,

        /// round_robin, double_round_robin or swiss
        #[arg(long, default_value = "round_robin")]
        tournament_type: TournamentType,

        /// Snapshot file to create
        #[arg(long)]
        output: PathBuf,
    },

    /// Print a round-robin schedule for a list of player ids
    Schedule {
        /// Player ids, comma-separated (e.g. "1,2,3,4")
        #[arg(long, conflicts_with = "count")]
        players: Option<String>,

        /// Use players 1..=N
        #[arg(long)]
        count: Option<u64>,

        /// Double round-robin (every pairing twice, colours swapped)
        #[arg(long)]
        double: bool,

        /// table or json
        #[arg(long)]
        format: Option<OutputFormat>,
    },

    /// Generate and store the rounds of a snapshot's tournament
    Pair {
        /// Snapshot file
        #[arg(long)]
        input: PathBuf,

        /// Where to write the updated snapshot (default: overwrite input)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Record the result of an unfinished game
    Result {
        /// Snapshot file
        #[arg(long)]
        input: PathBuf,

        /// Game id
        #[arg(long)]
        game: String,

        /// Result code: w, b, =, H, F, U, Z, +
        #[arg(long)]
        result: String,
    },

    /// Print the standing table of a snapshot
    Standings {
        /// Snapshot file
        #[arg(long)]
        input: PathBuf,

        /// Tie-break criteria, comma-separated (overrides the tournament's list)
        #[arg(long)]
        criteria: Option<String>,

        /// table or json
        #[arg(long)]
        format: Option<OutputFormat>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;

    // Initialize tracing
    let level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::debug!("Starting chess-tournament v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Init {
            name,
            players,
            tournament_type,
            output,
        } => {
            let mut tournament = Tournament::new(name);
            tournament.tournament_type = tournament_type;
            tournament.scoring = config.scoring;
            tournament.ranking_list = config.ranking.criteria.clone();

            for (i, player_name) in players
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .enumerate()
            {
                tournament
                    .players
                    .push(Player::new(PlayerId(i as u64 + 1), player_name));
            }

            let count = tournament.players.len();
            TournamentSnapshot::new(tournament)
                .save(&output)
                .with_context(|| format!("Failed to write {:?}", output))?;
            println!("Created tournament with {} players in {:?}", count, output);
        }
        Commands::Schedule {
            players,
            count,
            double,
            format,
        } => {
            let ids: Vec<PlayerId> = match (players, count) {
                (Some(list), _) => match parse_player_ids(&list) {
                    Some(ids) => ids,
                    None => bail!("Invalid --players list: {}", list),
                },
                (None, Some(n)) => (1..=n).map(PlayerId).collect(),
                (None, None) => bail!("Specify --players or --count"),
            };
            if let Some(id) = find_duplicate_player(&ids) {
                bail!("Player {} is listed more than once", id);
            }

            let schedule = if double {
                double_round_robin(&ids)
            } else {
                round_robin(&ids)
            };

            match format.unwrap_or(config.output.format) {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&schedule)?),
                OutputFormat::Table => print_schedule(&schedule),
            }
        }
        Commands::Pair { input, output } => {
            let mut snapshot = TournamentSnapshot::load(&input)
                .with_context(|| format!("Failed to load snapshot {:?}", input))?;

            let created = snapshot.schedule()?;
            if created == 0 {
                tracing::warn!(
                    "No rounds generated for {} players ({:?})",
                    snapshot.tournament.players.len(),
                    snapshot.tournament.tournament_type
                );
            }

            let output = output.unwrap_or(input);
            snapshot.save(&output)?;
            println!("Created {} rounds in {:?}", created, output);
        }
        Commands::Result {
            input,
            game,
            result,
        } => {
            let result: GameResult = result.parse()?;
            let mut snapshot = TournamentSnapshot::load(&input)
                .with_context(|| format!("Failed to load snapshot {:?}", input))?;

            snapshot.record_result(&GameId::from(game.as_str()), result)?;
            snapshot.save(&input)?;
            println!("Game {}: {}", game, result);
        }
        Commands::Standings {
            input,
            criteria,
            format,
        } => {
            let mut snapshot = TournamentSnapshot::load(&input)
                .with_context(|| format!("Failed to load snapshot {:?}", input))?;

            if let Some(list) = criteria {
                snapshot.tournament.ranking_list = list
                    .split(',')
                    .filter(|s| !s.trim().is_empty())
                    .map(str::parse::<RankingSystem>)
                    .collect::<Result<_, _>>()
                    .map_err(anyhow::Error::msg)?;
            } else if snapshot.tournament.ranking_list.is_empty() {
                snapshot.tournament.ranking_list = config.ranking.criteria.clone();
            }

            let standings = snapshot.standings(&RankingEngine::default());
            match format.unwrap_or(config.output.format) {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&standings)?),
                OutputFormat::Table => print_standings(&snapshot.tournament, &standings),
            }
        }
    }

    Ok(())
}

fn print_schedule(schedule: &Schedule<PlayerId>) {
    if schedule.is_empty() {
        println!("No schedule: a round-robin needs an even number of at least 2 players");
        return;
    }

    for (i, round) in schedule.iter().enumerate() {
        let boards: Vec<String> = round
            .iter()
            .map(|p| format!("{}-{}", p.white, p.black))
            .collect();
        println!("Round {:>2}: {}", i + 1, boards.join("  "));
    }
}

fn print_standings(tournament: &Tournament, standings: &[Standing]) {
    println!("=== {} ===", tournament.name);

    let mut header = format!("{:>4}  {:<24} {:>6} {:>5} {:>6}", "Rank", "Player", "Score", "Wins", "Black");
    for criterion in &tournament.ranking_list {
        header.push_str(&format!(" {:>16}", criterion.name()));
    }
    println!("{}", header);

    for standing in standings {
        let name = tournament
            .player(standing.player)
            .map(|p| p.to_string())
            .unwrap_or_else(|| standing.player.to_string());

        let mut line = format!(
            "{:>4}  {:<24} {:>6} {:>5} {:>6}",
            standing.rank, name, standing.score, standing.wins, standing.black_times
        );
        for criterion in &tournament.ranking_list {
            let value = standing.tie_break(*criterion).unwrap_or(0.0);
            line.push_str(&format!(" {:>16}", value));
        }
        println!("{}", line);
    }
}
