mod autopilot;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec3;
use labyrinth_assets::{AssetRequest, AssetStore, FileLoader};
use labyrinth_common::ObjectKind;
use labyrinth_kernel::{GameConfig, GameEvent, GameSession, SessionBuilder, SessionState};
use labyrinth_maze::{Cell, generate};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::autopilot::Autopilot;

#[derive(Parser)]
#[command(name = "labyrinth-cli", about = "Maze generation and headless session runner")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Carve a maze and print it
    Generate {
        #[arg(short, long, default_value = "21")]
        rows: usize,
        #[arg(short, long, default_value = "21")]
        cols: usize,
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Print the grid as JSON instead of ASCII
        #[arg(long)]
        json: bool,
    },
    /// Build a session and let the autopilot walk it to the goal
    Play {
        /// YAML config file; defaults apply to anything it leaves out
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Overrides the config seed
        #[arg(short, long)]
        seed: Option<u64>,
        /// Overrides the config row count
        #[arg(long)]
        rows: Option<usize>,
        /// Overrides the config column count
        #[arg(long)]
        cols: Option<usize>,
        /// Overrides the config trap count
        #[arg(long)]
        traps: Option<usize>,
        /// Overrides the config coin count
        #[arg(long)]
        coins: Option<usize>,
        /// Give up after this many frames
        #[arg(short, long, default_value = "10000")]
        ticks: u64,
        /// Simulated frame rate
        #[arg(short, long, default_value = "60")]
        fps: u32,
        /// Asset root for the player mesh
        #[arg(long)]
        assets: Option<PathBuf>,
        /// Player mesh path relative to the asset root
        #[arg(long, default_value = "models/RobotExpressive.glb")]
        player_mesh: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("labyrinth-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("maze: {}", labyrinth_maze::crate_info());
            println!("spatial: {}", labyrinth_spatial::crate_info());
            println!("input: {}", labyrinth_input::crate_info());
            println!("assets: {}", labyrinth_assets::crate_info());
            println!("kernel: {}", labyrinth_kernel::crate_info());
        }
        Commands::Generate {
            rows,
            cols,
            seed,
            json,
        } => {
            let grid = generate(rows, cols, Cell::new(1, 1), seed)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&grid)?);
            } else {
                print!("{grid}");
                println!("{rows}x{cols}, seed={seed}, open cells={}", grid.open_count());
            }
        }
        Commands::Play {
            config,
            seed,
            rows,
            cols,
            traps,
            coins,
            ticks,
            fps,
            assets,
            player_mesh,
        } => {
            let mut config = match config {
                Some(path) => GameConfig::load(&path)
                    .with_context(|| format!("loading config from {}", path.display()))?,
                None => GameConfig::default(),
            };
            if seed.is_some() {
                config.seed = seed;
            }
            config.rows = rows.unwrap_or(config.rows);
            config.cols = cols.unwrap_or(config.cols);
            config.trap_count = traps.unwrap_or(config.trap_count);
            config.coin_count = coins.unwrap_or(config.coin_count);
            anyhow::ensure!(fps > 0, "fps must be positive");

            let mut builder = SessionBuilder::new(config);
            if let Some(root) = assets {
                let mut store = AssetStore::new();
                let mesh = store.request(AssetRequest::mesh(player_mesh));
                let report = store.resolve_pending(&FileLoader::new(root));
                if !report.is_complete() {
                    for (path, reason) in &report.failed {
                        eprintln!("asset {path} failed: {reason}");
                    }
                }
                builder = builder.with_player_mesh(&store, mesh, Vec3::ONE);
            }
            let mut session = builder.build()?;
            play(&mut session, ticks, fps)?;
        }
    }

    Ok(())
}

fn play(session: &mut GameSession, max_ticks: u64, fps: u32) -> anyhow::Result<()> {
    let grid = session.grid();
    println!(
        "Session {}: {}x{} maze, seed={}, goal={}, traps={}, coins={}",
        session.id(),
        grid.rows(),
        grid.cols(),
        session.seed(),
        session.placements().goal,
        session.world().count_of(ObjectKind::Trap),
        session.world().count_of(ObjectKind::Coin),
    );
    for note in session.diagnostics() {
        println!("note: {note}");
    }

    let mut pilot = Autopilot::plan(session).context("goal is unreachable from the start cell")?;
    println!("Autopilot route: {} cells", pilot.route_len());

    session.start()?;
    let dt = 1.0 / fps as f32;
    let mut tally: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut ticks = 0;
    while session.state() == SessionState::Running && ticks < max_ticks {
        let intent = pilot.intent(session, dt);
        session.tick(dt, &intent);
        ticks += 1;
        for event in session.drain_events() {
            *tally.entry(event_name(&event)).or_default() += 1;
            match event {
                GameEvent::CoinCollected { score, .. } => println!("  coin collected, score={score}"),
                GameEvent::Won { elapsed } => println!("  reached the goal after {elapsed:.2}s"),
                GameEvent::Lost { elapsed } => println!("  hit a trap after {elapsed:.2}s"),
                _ => {}
            }
        }
    }

    println!(
        "Outcome: {:?} after {ticks} ticks, score={}, elapsed={:.2}s",
        session.state(),
        session.score(),
        session.elapsed()
    );
    for (name, count) in &tally {
        println!("  {name}: {count}");
    }
    if session.state() == SessionState::Running {
        tracing::warn!(ticks, "tick limit reached before the session ended");
    }
    Ok(())
}

fn event_name(event: &GameEvent) -> &'static str {
    match event {
        GameEvent::Started { .. } => "started",
        GameEvent::Restarted { .. } => "restarted",
        GameEvent::Moved { .. } => "moved",
        GameEvent::Blocked { .. } => "blocked",
        GameEvent::AnimationChanged { .. } => "animation",
        GameEvent::CoinCollected { .. } => "coin",
        GameEvent::Won { .. } => "won",
        GameEvent::Lost { .. } => "lost",
    }
}
