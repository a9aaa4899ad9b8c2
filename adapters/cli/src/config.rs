//! Optional TOML configuration layered beneath command-line flags.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use manifold_net_core::{
    AssemblyLimits, FoldFactor, GenerationRequest, PieceCount, TemplateKind, DEFAULT_MAX_RESEEDS,
    DEFAULT_PIECE_COUNT, DEFAULT_PLACEMENT_TRIALS, DEFAULT_SEED, MIN_INTERACTIVE_PIECES,
};
use serde::Deserialize;

const SUPPORTED_CONFIG_VERSION: u32 = 1;

/// Contents of a configuration file.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    version: u32,
    #[serde(default)]
    generation: GenerationConfig,
    #[serde(default)]
    fold: FoldConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
struct GenerationConfig {
    seed: Option<u32>,
    pieces: Option<usize>,
    placement_trials: Option<u32>,
    max_reseeds: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
struct FoldConfig {
    factor: Option<f32>,
}

/// Reads and validates the configuration file at `path`.
pub(crate) fn load(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration at {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid configuration at {}", path.display()))
}

fn parse(contents: &str) -> Result<Config> {
    let config: Config =
        toml::from_str(contents).context("failed to parse configuration toml contents")?;
    if config.version != SUPPORTED_CONFIG_VERSION {
        bail!(
            "unsupported configuration version {}; expected {}",
            config.version,
            SUPPORTED_CONFIG_VERSION
        );
    }
    Ok(config)
}

/// Values supplied on the command line; each one wins over the file.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Overrides {
    pub(crate) seed: Option<u32>,
    pub(crate) pieces: Option<usize>,
    pub(crate) placement_trials: Option<u32>,
    pub(crate) max_reseeds: Option<u32>,
    pub(crate) fold: Option<f32>,
}

/// Fully resolved run parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Settings {
    pub(crate) request: GenerationRequest,
    pub(crate) fold: FoldFactor,
}

impl Settings {
    /// Layers `overrides` over `config` over the built-in defaults.
    pub(crate) fn resolve(overrides: Overrides, config: Option<&Config>) -> Result<Self> {
        let generation = config.map(|config| &config.generation);

        let seed = overrides
            .seed
            .or_else(|| generation.and_then(|generation| generation.seed))
            .unwrap_or(DEFAULT_SEED);
        let pieces = overrides
            .pieces
            .or_else(|| generation.and_then(|generation| generation.pieces))
            .unwrap_or(DEFAULT_PIECE_COUNT);
        let placement_trials = overrides
            .placement_trials
            .or_else(|| generation.and_then(|generation| generation.placement_trials))
            .unwrap_or(DEFAULT_PLACEMENT_TRIALS);
        let max_reseeds = overrides
            .max_reseeds
            .or_else(|| generation.and_then(|generation| generation.max_reseeds))
            .unwrap_or(DEFAULT_MAX_RESEEDS);
        let fold = overrides
            .fold
            .or_else(|| config.and_then(|config| config.fold.factor))
            .unwrap_or_default();

        if !(MIN_INTERACTIVE_PIECES..=TemplateKind::COUNT).contains(&pieces) {
            bail!(
                "piece count {pieces} is outside {MIN_INTERACTIVE_PIECES}..={}",
                TemplateKind::COUNT
            );
        }
        if placement_trials == 0 {
            bail!("placement trials must be positive");
        }

        let piece_count = PieceCount::new(pieces).context("invalid piece count")?;
        let fold = FoldFactor::new(fold).context("invalid fold factor")?;
        let limits = AssemblyLimits {
            placement_trials,
            max_reseeds,
        };

        Ok(Self {
            request: GenerationRequest::new(seed, piece_count).with_limits(limits),
            fold,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_flags_or_file() {
        let settings = Settings::resolve(Overrides::default(), None).expect("defaults are valid");

        assert_eq!(settings.request.seed, DEFAULT_SEED);
        assert_eq!(settings.request.piece_count.get(), DEFAULT_PIECE_COUNT);
        assert_eq!(settings.request.limits, AssemblyLimits::default());
        assert_eq!(settings.fold, FoldFactor::FLAT);
    }

    #[test]
    fn flags_override_file_values() {
        let config = parse(
            r#"
            version = 1

            [generation]
            seed = 42
            pieces = 10
            max_reseeds = 8

            [fold]
            factor = -0.5
            "#,
        )
        .expect("config parses");

        let overrides = Overrides {
            seed: Some(7),
            fold: Some(0.25),
            ..Overrides::default()
        };
        let settings = Settings::resolve(overrides, Some(&config)).expect("settings are valid");

        assert_eq!(settings.request.seed, 7);
        assert_eq!(settings.request.piece_count.get(), 10);
        assert_eq!(settings.request.limits.max_reseeds, 8);
        assert_eq!(
            settings.request.limits.placement_trials,
            DEFAULT_PLACEMENT_TRIALS
        );
        assert_eq!(settings.fold.get(), 0.25);
    }

    #[test]
    fn parse_accepts_version_only() {
        let config = parse("version = 1").expect("sections are optional");

        assert_eq!(config.generation, GenerationConfig::default());
        assert_eq!(config.fold, FoldConfig::default());
    }

    #[test]
    fn parse_rejects_unknown_version() {
        let error = parse("version = 2").expect_err("only version 1 is supported");

        assert!(error.to_string().contains("unsupported configuration version 2"));
    }

    #[test]
    fn parse_rejects_unknown_keys() {
        assert!(parse("version = 1\n[generation]\ncolour = 3").is_err());
    }

    #[test]
    fn resolve_rejects_out_of_range_values() {
        let single = Overrides {
            pieces: Some(1),
            ..Overrides::default()
        };
        assert!(Settings::resolve(single, None).is_err());

        let too_many = Overrides {
            pieces: Some(11),
            ..Overrides::default()
        };
        assert!(Settings::resolve(too_many, None).is_err());

        let overfolded = Overrides {
            fold: Some(1.5),
            ..Overrides::default()
        };
        assert!(Settings::resolve(overfolded, None).is_err());

        let no_trials = Overrides {
            placement_trials: Some(0),
            ..Overrides::default()
        };
        assert!(Settings::resolve(no_trials, None).is_err());
    }
}
