//! riskcalc CLI - OWASP Risk Rating calculator

#![deny(warnings)]

// Global invariants enforced:
// - Deterministic output ordering
// - Identical input yields byte-for-byte identical output

use anyhow::Context;
use clap::{Parser, Subcommand};
use riskcalc_core::config::{self, ResolvedConfig};
use riskcalc_core::report::{render_configurations, render_factors};
use riskcalc_core::resolver::CustomConfiguration;
use riskcalc_core::{
    render_json, render_text, resolve, resolve_with_fallback, share_url, AssessmentReport,
    FileStore, MappingStore, QueryParams, Selection, Vector,
};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "riskcalc")]
#[command(about = "OWASP Risk Rating calculator with shareable configurations")]
#[command(version = env!("RISKCALC_VERSION"))]
struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a vector, e.g. "(sl:1/m:1/o:0/s:2/ed:0/ee:0/a:0/id:0/lc:0/li:0/lav:0/lac:0/fd:0/rd:0/nc:0/pv:0)"
    Score {
        /// Vector text (default: all factors zero)
        vector: Option<String>,

        /// Built-in configuration name (overrides config file)
        #[arg(short, long)]
        configuration: Option<String>,

        /// Custom likelihood ranges, e.g. "LOW:0-3;MEDIUM:3-6;HIGH:6-9"
        #[arg(long)]
        likelihood_config: Option<String>,

        /// Custom impact ranges
        #[arg(long)]
        impact_config: Option<String>,

        /// Custom mapping, one verdict per (likelihood, impact) pair
        #[arg(long)]
        mapping: Option<String>,

        /// Start from a saved mapping; other flags override its values
        #[arg(long)]
        saved: Option<String>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Base URL for a shareable link, e.g. https://example.com/calculator
        #[arg(long)]
        share: Option<String>,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Score a shared URL or query string, falling back on invalid parameters
    Url {
        /// Full URL or bare query string
        input: String,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List the built-in configurations
    Configs,
    /// List the risk factors and their option values
    Factors,
    /// Manage saved mappings
    Mapping {
        #[command(subcommand)]
        action: MappingAction,
    },
    /// Validate or show the configuration file
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum MappingAction {
    /// Save a custom configuration (and optionally a vector) under a name
    Save {
        name: String,

        #[arg(long)]
        likelihood_config: Option<String>,

        #[arg(long)]
        impact_config: Option<String>,

        #[arg(long)]
        mapping: Option<String>,

        /// Vector to store alongside the configuration
        #[arg(long)]
        vector: Option<String>,

        /// Path to config file (default: auto-discover)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Show a saved mapping
    Show {
        name: String,

        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Delete a saved mapping
    Delete {
        name: String,

        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List saved mappings
    List {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file without scoring anything
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Score {
            vector,
            configuration,
            likelihood_config,
            impact_config,
            mapping,
            saved,
            format,
            share,
            config,
        } => {
            let resolved = load_config(config)?;

            let saved = saved
                .map(|name| load_saved(&resolved, &name))
                .transpose()?;
            let flags = QueryParams {
                vector,
                likelihood_config,
                impact_config,
                mapping,
            };
            let (vector, selection) = score_selection(&resolved, saved, flags, configuration)?;

            let result = resolve(&vector, &selection);
            let mut report = AssessmentReport::new(selection.display_name(), &vector, result);
            if let Some(base) = share {
                let shared_config = match &selection {
                    Selection::Custom(custom) => Some(custom),
                    Selection::Named(_) => None,
                };
                report.share_url =
                    Some(share_url(&base, &vector, shared_config).context("invalid --share URL")?);
            }

            print_report(&report, format);
        }
        Commands::Url {
            input,
            format,
            config,
        } => {
            let resolved = load_config(config)?;
            let params = QueryParams::from_input(&input).context("invalid URL")?;
            let resolution = resolve_with_fallback(&params, &resolved.fallback_name);

            let mut report = AssessmentReport::new(
                resolution.selection.display_name(),
                &resolution.vector,
                resolution.result,
            );
            report.warnings = resolution.errors.iter().map(|e| e.to_string()).collect();

            print_report(&report, format);
        }
        Commands::Configs => {
            print!("{}", render_configurations());
        }
        Commands::Factors => {
            print!("{}", render_factors());
        }
        Commands::Mapping { action } => match action {
            MappingAction::Save {
                name,
                likelihood_config,
                impact_config,
                mapping,
                vector,
                config,
            } => {
                let resolved = load_config(config)?;
                let params = QueryParams {
                    vector,
                    likelihood_config,
                    impact_config,
                    mapping,
                };

                // only store what would load again
                let custom = params.custom().context("invalid custom configuration")?;
                if custom.is_none() {
                    anyhow::bail!(
                        "nothing to save: pass --likelihood-config, --impact-config and --mapping"
                    );
                }
                let vector = params.vector().context("invalid vector")?;
                let normalized = QueryParams {
                    vector: params.vector.as_ref().map(|_| vector.to_bare_string()),
                    ..QueryParams::from_state(&vector, custom.as_ref())
                };

                let mut store = FileStore::new(&resolved.store_path);
                store.set(&name, &normalized.to_query_string())?;
                println!("Saved mapping '{}' to {}", name.trim(), store.path().display());
            }
            MappingAction::Show { name, config } => {
                let resolved = load_config(config)?;
                let params = load_saved(&resolved, &name)?;
                print_saved(&params);
            }
            MappingAction::Delete { name, config } => {
                let resolved = load_config(config)?;
                let mut store = FileStore::new(&resolved.store_path);
                if store.delete(&name)? {
                    println!("Deleted mapping '{}'", name.trim());
                } else {
                    anyhow::bail!("no saved mapping named '{}'", name.trim());
                }
            }
            MappingAction::List { config } => {
                let resolved = load_config(config)?;
                let store = FileStore::new(&resolved.store_path);
                let entries = store.list()?;
                if entries.is_empty() {
                    println!("No saved mappings in {}", store.path().display());
                } else {
                    for entry in entries {
                        println!("{:<24} {}", entry.name, entry.value);
                    }
                }
            }
        },
        Commands::Config { action } => match action {
            ConfigAction::Validate { path } => {
                let project_root = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&project_root, path.as_deref());

                match resolved {
                    Ok(config) => {
                        if let Some(ref p) = config.config_path {
                            println!("Config valid: {}", p.display());
                        } else {
                            println!("No config file found. Using defaults.");
                        }
                    }
                    Err(e) => {
                        eprintln!("Config validation failed: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            ConfigAction::Show { path } => {
                let resolved = load_config(path)?;

                println!("Configuration:");
                if let Some(ref p) = resolved.config_path {
                    println!("  Source: {}", p.display());
                } else {
                    println!("  Source: defaults (no config file found)");
                }
                println!();
                println!("Selection:");
                println!("  name: {}", resolved.selection.display_name());
                if let Selection::Custom(custom) = &resolved.selection {
                    print_custom(custom);
                }
                println!("  fallback: {}", resolved.fallback_name);
                println!();
                println!("Store:");
                println!("  path: {}", resolved.store_path.display());
            }
        },
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<ResolvedConfig> {
    let project_root = std::env::current_dir()?;
    config::load_and_resolve(&project_root, path.as_deref()).context("failed to load configuration")
}

fn load_saved(resolved: &ResolvedConfig, name: &str) -> anyhow::Result<QueryParams> {
    let store = FileStore::new(&resolved.store_path);
    let value = store
        .get(name)?
        .with_context(|| format!("no saved mapping named '{}'", name.trim()))?;
    tracing::debug!(name = name.trim(), value = %value, "loaded saved mapping");
    Ok(QueryParams::parse(&value))
}

/// Merge config file, saved mapping and flags; later sources win per parameter
///
/// `--configuration` replaces a custom configuration from the config file.
fn score_selection(
    resolved: &ResolvedConfig,
    saved: Option<QueryParams>,
    flags: QueryParams,
    configuration: Option<String>,
) -> anyhow::Result<(Vector, Selection)> {
    let mut params = QueryParams::default();
    if configuration.is_none() {
        if let Selection::Custom(custom) = &resolved.selection {
            params = QueryParams {
                vector: None,
                ..QueryParams::from_state(&Vector::zero(), Some(custom))
            };
        }
    }
    for layer in saved.into_iter().chain(std::iter::once(flags)) {
        override_param(&mut params.vector, layer.vector);
        override_param(&mut params.likelihood_config, layer.likelihood_config);
        override_param(&mut params.impact_config, layer.impact_config);
        override_param(&mut params.mapping, layer.mapping);
    }

    let vector = params.vector().context("invalid vector")?;
    let selection = match params.custom().context("invalid custom configuration")? {
        Some(custom) => Selection::Custom(custom),
        None => match configuration {
            Some(name) => Selection::named(name),
            None => resolved.selection.clone(),
        },
    };
    Ok((vector, selection))
}

fn override_param(slot: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        *slot = Some(value);
    }
}

fn print_report(report: &AssessmentReport, format: OutputFormat) {
    match format {
        OutputFormat::Text => print!("{}", render_text(report)),
        OutputFormat::Json => println!("{}", render_json(report)),
    }
}

fn print_saved(params: &QueryParams) {
    println!("Query: {}", params.to_query_string());
    match params.custom() {
        Ok(Some(custom)) => print_custom(&custom),
        Ok(None) => println!("  (no custom configuration)"),
        Err(e) => println!("  invalid: {}", e),
    }
    if let Some(vector) = &params.vector {
        println!("  vector: {}", vector);
    }
}

fn print_custom(custom: &CustomConfiguration) {
    println!("  likelihood: {}", custom.likelihood());
    println!("  impact: {}", custom.impact());
    println!("  mapping: {}", custom.mapping());
}

#[cfg(test)]
mod tests {
    use super::*;
    use riskcalc_core::DEFAULT_CONFIGURATION;

    const RANGES: &str = "LOW:0-3;MEDIUM:3-6;HIGH:6-9";
    const OWASP_MAPPING: &str = "NOTE,LOW,MEDIUM,LOW,MEDIUM,HIGH,MEDIUM,HIGH,CRITICAL";
    const ALL_NOTE: &str = "NOTE,NOTE,NOTE,NOTE,NOTE,NOTE,NOTE,NOTE,NOTE";
    const HIGH_VECTOR: &str =
        "(sl:8/m:8/o:8/s:8/ed:8/ee:8/a:8/id:8/lc:8/li:8/lav:8/lac:8/fd:8/rd:8/nc:8/pv:8)";

    fn resolved_with(selection: Selection) -> ResolvedConfig {
        ResolvedConfig {
            selection,
            fallback_name: DEFAULT_CONFIGURATION.to_string(),
            store_path: PathBuf::from("mappings.json"),
            config_path: None,
        }
    }

    fn file_custom() -> ResolvedConfig {
        let custom = CustomConfiguration::parse(RANGES, RANGES, OWASP_MAPPING).unwrap();
        resolved_with(Selection::Custom(custom))
    }

    fn flags(vector: Option<&str>, mapping: Option<&str>) -> QueryParams {
        QueryParams {
            vector: vector.map(str::to_string),
            mapping: mapping.map(str::to_string),
            ..QueryParams::default()
        }
    }

    #[test]
    fn test_score_flag_overrides_one_part_of_file_configuration() {
        let (vector, selection) =
            score_selection(&file_custom(), None, flags(Some(HIGH_VECTOR), Some(ALL_NOTE)), None)
                .unwrap();
        assert!(selection.is_custom());
        assert_eq!(resolve(&vector, &selection).final_verdict, "NOTE");
    }

    #[test]
    fn test_score_uses_file_configuration_without_flags() {
        let (vector, selection) =
            score_selection(&file_custom(), None, flags(Some(HIGH_VECTOR), None), None).unwrap();
        assert_eq!(selection, file_custom().selection);
        assert_eq!(resolve(&vector, &selection).final_verdict, "CRITICAL");
    }

    #[test]
    fn test_score_partial_flags_without_file_configuration_fail() {
        let err = score_selection(
            &resolved_with(Selection::default()),
            None,
            flags(None, Some(ALL_NOTE)),
            None,
        )
        .unwrap_err();
        assert!(
            format!("{:#}", err).contains("missing required parameters: likelihoodConfig, impactConfig"),
            "unexpected error: {:#}",
            err
        );
    }

    #[test]
    fn test_score_named_flag_replaces_file_configuration() {
        let (vector, selection) = score_selection(
            &file_custom(),
            None,
            flags(None, None),
            Some("Configuration 2".to_string()),
        )
        .unwrap();
        assert_eq!(selection, Selection::named("Configuration 2"));
        assert_eq!(vector, Vector::zero());
    }

    #[test]
    fn test_score_flags_win_over_saved_mapping() {
        let saved = QueryParams {
            mapping: Some(ALL_NOTE.to_string()),
            vector: Some(HIGH_VECTOR.to_string()),
            ..QueryParams::default()
        };
        let (vector, selection) =
            score_selection(&file_custom(), Some(saved.clone()), flags(None, None), None).unwrap();
        assert_eq!(resolve(&vector, &selection).final_verdict, "NOTE");

        let (vector, selection) = score_selection(
            &file_custom(),
            Some(saved),
            flags(None, Some(OWASP_MAPPING)),
            None,
        )
        .unwrap();
        assert_eq!(resolve(&vector, &selection).final_verdict, "CRITICAL");
    }

    #[test]
    fn test_override_param_ignores_blank() {
        let mut slot = Some("LOW:0-9".to_string());
        override_param(&mut slot, Some("  ".to_string()));
        assert_eq!(slot.as_deref(), Some("LOW:0-9"));
        override_param(&mut slot, Some("HIGH:0-9".to_string()));
        assert_eq!(slot.as_deref(), Some("HIGH:0-9"));
        override_param(&mut slot, None);
        assert_eq!(slot.as_deref(), Some("HIGH:0-9"));
    }

    #[test]
    fn test_cli_parses_score_flags() {
        let cli = Cli::parse_from([
            "riskcalc",
            "-v",
            "score",
            "(sl:1)",
            "--configuration",
            "Configuration 2",
            "--format",
            "json",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Score {
                vector,
                configuration,
                ..
            } => {
                assert_eq!(vector.as_deref(), Some("(sl:1)"));
                assert_eq!(configuration.as_deref(), Some("Configuration 2"));
            }
            _ => panic!("expected score command"),
        }
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
