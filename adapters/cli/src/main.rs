#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates a manifold net and prints its views.

mod ascii;
mod config;
mod json;

use std::{io, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::debug;
use manifold_net_core::{
    Command, Event, TemplateKind, MIN_INTERACTIVE_PIECES, RANDOM_SEED_CEILING,
};
use manifold_net_rendering::{RenderingBackend, Scene};
use manifold_net_world::{apply, query, World};
use rand::Rng;

use crate::{
    ascii::AsciiBackend,
    config::{Overrides, Settings},
    json::JsonBackend,
};

/// Generates a polyomino net, folds it, and prints the result.
#[derive(Debug, Parser)]
#[command(name = "manifold-net", version, about)]
struct Cli {
    /// Seed driving the generator.
    #[arg(long, conflicts_with = "random_seed")]
    seed: Option<u32>,
    /// Draws a fresh seed instead of using a fixed one.
    #[arg(long)]
    random_seed: bool,
    /// Number of pieces to place.
    #[arg(
        long,
        value_parser = clap::value_parser!(u8)
            .range(MIN_INTERACTIVE_PIECES as i64..=TemplateKind::COUNT as i64)
    )]
    pieces: Option<u8>,
    /// Fold factor between -1 (spiked) and 1 (closed).
    #[arg(long, allow_negative_numbers = true)]
    fold: Option<f32>,
    /// Placement trials granted to every template.
    #[arg(long)]
    placement_trials: Option<u32>,
    /// Reseeds tolerated before giving up.
    #[arg(long)]
    max_reseeds: Option<u32>,
    /// TOML file providing defaults for the options above.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Ascii)]
    format: OutputFormat,
    /// Enables debug logging.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Ascii,
    Json,
}

/// Entry point for the manifold net command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.config.as_deref().map(config::load).transpose()?;
    let seed = if cli.random_seed {
        let drawn = rand::thread_rng().gen_range(0..RANDOM_SEED_CEILING);
        debug!("drew random seed {drawn}");
        Some(drawn)
    } else {
        cli.seed
    };
    let overrides = Overrides {
        seed,
        pieces: cli.pieces.map(usize::from),
        placement_trials: cli.placement_trials,
        max_reseeds: cli.max_reseeds,
        fold: cli.fold,
    };
    let settings = Settings::resolve(overrides, config.as_ref())?;
    let scene = scene_for(settings)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.format {
        OutputFormat::Ascii => AsciiBackend::new(&mut out).present(&scene),
        OutputFormat::Json => JsonBackend::new(&mut out).present(&scene),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

/// Drives a fresh world through generation and folding and captures its views.
fn scene_for(settings: Settings) -> Result<Scene> {
    let mut world = World::new();
    let mut events = Vec::new();

    apply(
        &mut world,
        Command::Generate {
            request: settings.request,
        },
        &mut events,
    );
    for event in events.drain(..) {
        if let Event::GenerationRejected { error } = event {
            return Err(error).context("failed to generate a net");
        }
    }

    apply(
        &mut world,
        Command::SetFoldFactor {
            factor: settings.fold,
        },
        &mut events,
    );

    let (Some(tiling), Some(tree), Some(pose)) = (
        query::tiling(&world),
        query::hinge_tree(&world),
        query::fold_pose(&world),
    ) else {
        bail!("world holds no net after generation");
    };
    Ok(Scene::new(tiling, tree, &pose))
}
