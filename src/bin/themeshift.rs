//! Command-line front end for a themeshift coordinator.
//!
//! ```text
//! themeshift get [--json]        show the stored preference and resolved theme
//! themeshift set <preference>    store a preference (light, dark, system)
//! themeshift palette             print the snapshot for the resolved theme
//! themeshift watch               follow OS changes; type light/dark/system, or quit
//! ```

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

use themeshift::{
    ColorMode, CoordinatorConfig, EventLoop, FileStore, Outcome, Preference, StyleSnapshot,
    SystemSignal, ThemeCoordinator, ThemeState,
};

#[derive(Parser)]
#[command(name = "themeshift", version, about = "Light/dark/system theme switcher")]
struct Cli {
    /// JSON file the preference is stored in
    #[arg(long, default_value = "themeshift.json")]
    store: PathBuf,

    /// YAML or JSON coordinator config
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current theme state
    Get {
        /// Print the state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the theme preference
    Set { preference: Preference },
    /// Print the style snapshot for the resolved theme
    Palette,
    /// Follow OS color scheme changes and read preferences from stdin
    Watch,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => CoordinatorConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => CoordinatorConfig::default(),
    };

    match cli.command {
        Commands::Get { json } => {
            let coordinator = build(&cli.store, config, false)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&coordinator.state())?);
            } else {
                print_state(&coordinator.state());
            }
        }
        Commands::Set { preference } => {
            let mut coordinator = build(&cli.store, config, false)?;
            let outcome = coordinator.set_preference(preference, Instant::now());
            match outcome {
                Outcome::Ignored(reason) => {
                    println!("{} ({:?})", style("unchanged").dim(), reason)
                }
                _ => println!("{} {}", style("saved").green(), preference),
            }
            print_state(&coordinator.state());
        }
        Commands::Palette => {
            let coordinator = build(&cli.store, config, false)?;
            print_snapshot(coordinator.resolved_theme(), coordinator.current_snapshot());
        }
        Commands::Watch => watch(&cli.store, config)?,
    }
    Ok(())
}

fn build(store: &Path, config: CoordinatorConfig, verbose: bool) -> Result<ThemeCoordinator> {
    let signal = SystemSignal::new(config.poll_interval);
    let builder = ThemeCoordinator::builder()
        .config(config)
        .store(FileStore::new(store))
        .signal(signal);
    let builder = if verbose {
        builder.sink(print_snapshot)
    } else {
        builder
    };
    builder.build().context("invalid palette")
}

fn watch(store: &Path, config: CoordinatorConfig) -> Result<()> {
    let mut coordinator = build(store, config, true)?;
    coordinator.observe(print_state);

    let event_loop = EventLoop::new(coordinator);
    let handle = event_loop.handle();

    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let input = line.trim();
            if input == "quit" {
                break;
            }
            match input.parse::<Preference>() {
                Ok(preference) => {
                    handle.set_preference(preference);
                }
                Err(e) => eprintln!("{}", style(e).red()),
            }
        }
        handle.shutdown();
    });

    let state = event_loop.run();
    print_state(&state);
    Ok(())
}

fn print_state(state: &ThemeState) {
    let resolved = match state.resolved {
        ColorMode::Dark => style(state.resolved.as_str()).magenta().bold(),
        ColorMode::Light => style(state.resolved.as_str()).yellow().bold(),
    };
    let busy = if state.transitioning {
        style(" (transitioning)").dim().to_string()
    } else {
        String::new()
    };
    println!(
        "{} mode: {}{}",
        state.preference.label(),
        resolved,
        busy
    );
}

fn print_snapshot(mode: ColorMode, snapshot: &StyleSnapshot) {
    println!("{}", style(format!("{} theme", mode)).bold());
    for (name, value) in snapshot.iter() {
        println!("  {:<20} {}", style(name).cyan(), value);
    }
}
