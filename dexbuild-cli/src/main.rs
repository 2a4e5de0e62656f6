//! Command-line interface for the dexbuild tools.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use dexbuild_core::settings;
use dexbuild_core::{BuildConfig, DEFAULT_REGIONS, DEFAULT_VERSIONS};
use dexbuild_encounters::{build_index, writer};
use dexbuild_export::cache;
use dexbuild_pokeapi::audit::scan_species;
use dexbuild_pokeapi::evolution::{ancestors_of, chain_edges, summarize_detail};
use dexbuild_pokeapi::{ApiError, PokeApiClient, ScanProgress, SpeciesAudit};

#[derive(Parser)]
#[command(name = "dexbuild", version, about = "Encounter index builder for the site's where-to-find view")]
struct Cli {
    /// Directory the generated index files are written to
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the encounter index from the PokeDB export tables
    Build {
        /// Redownload the export tables even if a cached copy exists
        #[arg(long)]
        refresh: bool,

        /// Regions to include (comma-separated), overriding the defaults
        #[arg(long, value_delimiter = ',')]
        regions: Option<Vec<String>>,

        /// Version slugs to include (comma-separated), overriding the defaults
        #[arg(long, value_delimiter = ',')]
        versions: Option<Vec<String>>,
    },

    /// Manage the export table cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Cross-check the index and the site's fallbacks against PokeAPI
    Audit {
        #[command(subcommand)]
        action: AuditAction,
    },

    /// Manage dexbuild configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// List cached export tables
    List,
    /// Delete all cached export tables
    Clear,
    /// Download the export tables into the cache
    Fetch,
}

#[derive(Subcommand)]
enum AuditAction {
    /// Show where a single Pokemon can be found, straight from PokeAPI
    WhereToFind {
        /// Pokemon name or id
        pokemon: String,
    },

    /// Print the evolution edges of families with regional branches
    EvoChains,

    /// Scan species for dex entries that only cover some of their forms
    FormDex {
        /// First species id to scan
        #[arg(long, default_value_t = 1)]
        start: u32,

        /// Last species id to scan
        #[arg(long, default_value_t = 1025)]
        end: u32,

        /// Maximum number of requests in flight
        #[arg(long, default_value_t = 4)]
        concurrency: usize,

        /// Write the full scan results to this file as JSON
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Summarize a saved form-dex scan report
    Summarize {
        /// Report file written by `audit form-dex --out`
        report: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the current configuration
    Show,
    /// Set the default data directory
    SetDataDir {
        /// New default data directory
        path: PathBuf,
    },
    /// Clear the saved data directory
    ClearDataDir,
    /// Show the config file location
    Path,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build { refresh, regions, versions } => {
            run_build(cli.data_dir, refresh, regions, versions)
        }
        Commands::Cache { action } => match action {
            CacheAction::List => run_cache_list(),
            CacheAction::Clear => run_cache_clear(),
            CacheAction::Fetch => run_cache_fetch(),
        },
        Commands::Audit { action } => match action {
            AuditAction::WhereToFind { pokemon } => run_audit_where_to_find(&pokemon),
            AuditAction::EvoChains => run_audit_evo_chains(),
            AuditAction::FormDex { start, end, concurrency, out } => {
                run_audit_form_dex(start, end, concurrency, out)
            }
            AuditAction::Summarize { report } => run_audit_summarize(report),
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => run_config_show(),
            ConfigAction::SetDataDir { path } => run_config_set_data_dir(path),
            ConfigAction::ClearDataDir => run_config_clear_data_dir(),
            ConfigAction::Path => run_config_path(),
        },
    }
}

fn run_build(
    data_dir: Option<PathBuf>,
    refresh: bool,
    regions: Option<Vec<String>>,
    versions: Option<Vec<String>>,
) {
    let data_dir = settings::resolve_data_dir(data_dir);

    let config = BuildConfig::new(
        regions.unwrap_or_else(|| DEFAULT_REGIONS.iter().map(|s| s.to_string()).collect()),
        versions.unwrap_or_else(|| DEFAULT_VERSIONS.iter().map(|s| s.to_string()).collect()),
    );

    println!(
        "Building encounter index in: {}",
        data_dir.display().if_supports_color(Stdout, |t| t.cyan())
    );
    println!(
        "  {}",
        format!("Regions: {}", join_slugs(&config.regions)).if_supports_color(Stdout, |t| t.dimmed())
    );
    println!(
        "  {}",
        format!("Versions: {}", join_slugs(&config.versions))
            .if_supports_color(Stdout, |t| t.dimmed())
    );
    println!();

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .unwrap()
            .tick_chars("/-\\|"),
    );
    pb.set_message("Loading export tables...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let tables = match cache::load_tables(refresh) {
        Ok(tables) => tables,
        Err(e) => {
            pb.finish_and_clear();
            eprintln!(
                "{} Failed to load export tables: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e
            );
            std::process::exit(1);
        }
    };
    pb.finish_and_clear();

    println!(
        "{} Loaded {} locations, {} areas, {} encounter rows",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        tables.locations.len(),
        tables.areas.len(),
        tables.encounters.len()
    );

    let (index, stats) = build_index(&tables, &config);

    if index.locations.is_empty() {
        println!(
            "{} No encounters matched the configured regions and versions",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow())
        );
    }

    let json_path = data_dir.join(writer::JSON_FILE);
    let js_path = data_dir.join(writer::JS_FILE);

    if let Err(e) = writer::write_json(&index, &json_path) {
        eprintln!(
            "{} Failed to write {}: {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            json_path.display(),
            e
        );
        std::process::exit(1);
    }
    if let Err(e) = writer::write_js(&index, &js_path) {
        eprintln!(
            "{} Failed to write {}: {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            js_path.display(),
            e
        );
        std::process::exit(1);
    }

    println!();
    println!("{}", "Summary:".if_supports_color(Stdout, |t| t.bold()));
    println!(
        "  {} {} locations, {} encounter entries",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        index.locations.len(),
        stats.entries
    );
    println!(
        "  {} {} target areas from {} accepted locations",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        stats.target_areas,
        stats.accepted_locations
    );
    println!(
        "  {}",
        format!(
            "{} of {} source rows fell outside the target set",
            stats.skipped_rows, stats.total_rows
        )
        .if_supports_color(Stdout, |t| t.dimmed())
    );
    println!(
        "  {} {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        json_path.display()
    );
    println!(
        "  {} {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        js_path.display()
    );
}

fn join_slugs(slugs: &BTreeSet<String>) -> String {
    slugs.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

fn run_cache_list() {
    match cache::list() {
        Ok(entries) => {
            if entries.is_empty() {
                println!("Cache is empty");
                return;
            }

            println!("Cached export tables:");
            println!();

            let mut total_size = 0u64;
            for entry in &entries {
                total_size += entry.file_size;
                println!(
                    "  {} {} ({} rows, {})",
                    "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                    entry.table.if_supports_color(Stdout, |t| t.cyan()),
                    entry.rows,
                    format_bytes(entry.file_size)
                );
                println!(
                    "      {}",
                    format!("downloaded {}", entry.downloaded)
                        .if_supports_color(Stdout, |t| t.dimmed())
                );
            }

            println!();
            println!(
                "Total: {} tables, {}",
                entries.len(),
                format_bytes(total_size)
            );
        }
        Err(e) => {
            eprintln!(
                "{} Failed to list cache: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e
            );
        }
    }
}

fn run_cache_clear() {
    match cache::clear() {
        Ok(freed) => {
            println!(
                "{} Cache cleared ({} freed)",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                format_bytes(freed)
            );
        }
        Err(e) => {
            eprintln!(
                "{} Failed to clear cache: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e
            );
        }
    }
}

fn run_cache_fetch() {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .unwrap()
            .tick_chars("/-\\|"),
    );
    pb.set_message("Downloading export tables...");
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    match cache::fetch() {
        Ok(()) => {
            pb.finish_and_clear();
            let size = cache::total_cache_size().unwrap_or(0);
            println!(
                "{} Downloaded 3 tables ({})",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                format_bytes(size)
            );
        }
        Err(e) => {
            pb.finish_and_clear();
            eprintln!(
                "{} Download failed: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e
            );
            std::process::exit(1);
        }
    }
}

/// Kanto families with Alolan or Hisuian branches. Their evolution edges
/// are the ones the site's evolve fallback most often gets wrong.
const REGIONAL_FAMILIES: &[&str] = &[
    "rattata",
    "pikachu",
    "sandshrew",
    "vulpix",
    "diglett",
    "meowth",
    "geodude",
    "grimer",
    "exeggcute",
    "cubone",
];

fn audit_client() -> (PokeApiClient, tokio::runtime::Runtime) {
    let client = match PokeApiClient::new() {
        Ok(client) => client,
        Err(e) => {
            eprintln!(
                "{} Failed to create API client: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e
            );
            std::process::exit(1);
        }
    };
    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    (client, rt)
}

fn run_audit_where_to_find(ident: &str) {
    let (client, rt) = audit_client();

    rt.block_on(async {
        let pokemon = match client.pokemon(ident).await {
            Ok(pokemon) => pokemon,
            Err(e) => {
                eprintln!(
                    "{} Failed to fetch '{}': {}",
                    "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                    ident,
                    e
                );
                std::process::exit(1);
            }
        };

        let species = match client.species(&pokemon.species.name).await {
            Ok(species) => species,
            Err(e) => {
                eprintln!(
                    "{} Failed to fetch species '{}': {}",
                    "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                    pokemon.species.name,
                    e
                );
                std::process::exit(1);
            }
        };

        let ancestors = match &species.evolution_chain {
            Some(chain_ref) if !chain_ref.url.is_empty() => {
                match client.evolution_chain(&chain_ref.url).await {
                    Ok(chain) => ancestors_of(&chain.chain, &species.name),
                    Err(e) => {
                        eprintln!(
                            "{} Failed to fetch evolution chain: {}",
                            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                            e
                        );
                        Vec::new()
                    }
                }
            }
            _ => Vec::new(),
        };

        let encounters = match client.encounters(pokemon.id).await {
            Ok(encounters) => encounters,
            Err(e) => {
                eprintln!(
                    "{} Failed to fetch encounters: {}",
                    "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                    e
                );
                std::process::exit(1);
            }
        };

        let versions: BTreeSet<String> = encounters
            .iter()
            .flat_map(|site| &site.version_details)
            .map(|detail| detail.version.name.clone())
            .filter(|name| !name.is_empty())
            .collect();

        println!(
            "Pokemon: {} (id {})",
            pokemon.name.if_supports_color(Stdout, |t| t.cyan()),
            pokemon.id
        );
        println!("Species: {}", species.name);
        let fallback = if ancestors.is_empty() {
            "(none)".to_string()
        } else {
            ancestors.join(", ")
        };
        println!("Ancestors for evolve fallback: {fallback}");
        println!("Encounter records: {}", encounters.len());
        println!("Versions with any encounter data: {}", versions.len());
        for version in versions.iter().take(25) {
            println!("  - {version}");
        }
        if versions.len() > 25 {
            println!("  ... (+{} more)", versions.len() - 25);
        }
    });
}

fn run_audit_evo_chains() {
    let (client, rt) = audit_client();

    rt.block_on(async {
        for base in REGIONAL_FAMILIES {
            let species = match client.species(base).await {
                Ok(species) => species,
                Err(e) => {
                    eprintln!(
                        "{} {}: {}",
                        "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                        base,
                        e
                    );
                    continue;
                }
            };

            let chain_url = match &species.evolution_chain {
                Some(chain_ref) if !chain_ref.url.is_empty() => chain_ref.url.clone(),
                _ => {
                    println!("{base}: no evolution chain");
                    continue;
                }
            };

            let chain = match client.evolution_chain(&chain_url).await {
                Ok(chain) => chain,
                Err(e) => {
                    eprintln!(
                        "{} {}: {}",
                        "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                        base,
                        e
                    );
                    continue;
                }
            };

            println!();
            println!(
                "{}",
                format!("== {base} ==").if_supports_color(Stdout, |t| t.bold())
            );
            for edge in chain_edges(&chain.chain) {
                if edge.from == edge.to {
                    continue;
                }
                if edge.details.is_empty() {
                    println!("{} -> {}: (no details)", edge.from, edge.to);
                    continue;
                }
                println!("{} -> {}:", edge.from, edge.to);
                for detail in &edge.details {
                    println!("  - {}", summarize_detail(detail));
                }
            }
        }
    });
}

struct ScanPrinter {
    pb: ProgressBar,
    done: AtomicU64,
    total: u64,
}

impl ScanProgress for ScanPrinter {
    fn on_species(&self, record: &SpeciesAudit) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        self.pb
            .set_message(format!("[{done}/{}] {}", self.total, record.species_name));
        if record.heuristic.suspicious {
            let (version, token) = record
                .heuristic
                .example
                .as_ref()
                .map(|example| (example.version.as_str(), example.token.as_str()))
                .unwrap_or(("?", "?"));
            self.pb.println(format!(
                "FLAG {} {}: tokens={:?} example={version}({token})",
                record.species_id, record.species_name, record.tokens
            ));
        }
    }

    fn on_error(&self, species_id: u32, error: &ApiError) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        self.pb
            .set_message(format!("[{done}/{}] species {species_id}", self.total));
        self.pb
            .println(format!("ERROR species {species_id}: {error}"));
    }
}

fn run_audit_form_dex(start: u32, end: u32, concurrency: usize, out: Option<PathBuf>) {
    let (client, rt) = audit_client();

    let start = start.max(1);
    let end = end.max(start);
    let total = u64::from(end - start + 1);

    println!("Scanning species {start}..{end} ({concurrency} requests in flight)");
    println!();

    let records = rt.block_on(async {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("  {spinner:.cyan} {msg}")
                .unwrap()
                .tick_chars("/-\\|"),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        let printer = ScanPrinter {
            pb: pb.clone(),
            done: AtomicU64::new(0),
            total,
        };
        let records = scan_species(&client, start, end, concurrency, Some(&printer)).await;
        pb.finish_and_clear();
        records
    });

    let multi_variety = records.iter().filter(|r| r.variety_count > 1).count();
    let flagged = records.iter().filter(|r| r.heuristic.suspicious).count();

    println!();
    println!("{}", "Summary:".if_supports_color(Stdout, |t| t.bold()));
    println!("  Range: {start}..{end}");
    println!("  Species scanned: {}", records.len());
    println!("  Species with >1 variety: {multi_variety}");
    println!("  Heuristic flagged: {flagged}");

    if let Some(out) = out {
        let json = match serde_json::to_string_pretty(&records) {
            Ok(json) => json,
            Err(e) => {
                eprintln!(
                    "{} Failed to serialize report: {}",
                    "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                    e
                );
                std::process::exit(1);
            }
        };
        if let Err(e) = std::fs::write(&out, json) {
            eprintln!(
                "{} Failed to write {}: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                out.display(),
                e
            );
            std::process::exit(1);
        }
        println!(
            "  {} Wrote {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            out.display()
        );
    }
}

fn run_audit_summarize(report: Option<PathBuf>) {
    let path = report.unwrap_or_else(|| PathBuf::from("form_dex_audit.json"));

    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!(
                "{} Failed to read {}: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                path.display(),
                e
            );
            std::process::exit(1);
        }
    };
    let records: Vec<SpeciesAudit> = match serde_json::from_str(&contents) {
        Ok(records) => records,
        Err(e) => {
            eprintln!(
                "{} Failed to parse {}: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                path.display(),
                e
            );
            std::process::exit(1);
        }
    };

    let flagged: Vec<&SpeciesAudit> =
        records.iter().filter(|r| r.heuristic.suspicious).collect();
    let multi_variety = records.iter().filter(|r| r.variety_count > 1).count();

    println!(
        "Report: {}",
        path.display().if_supports_color(Stdout, |t| t.cyan())
    );
    println!("  Species scanned: {}", records.len());
    println!("  Species with >1 variety: {multi_variety}");
    println!("  Heuristic flagged: {}", flagged.len());
    println!();
    println!(
        "{}",
        "First 40 flagged:".if_supports_color(Stdout, |t| t.bold())
    );
    for record in flagged.iter().take(40) {
        let (version, token) = record
            .heuristic
            .example
            .as_ref()
            .map(|example| (example.version.as_str(), example.token.as_str()))
            .unwrap_or(("?", "?"));
        println!(
            "  {:>4} {}: tokens={:?} example={version}({token})",
            record.species_id, record.species_name, record.tokens
        );
    }
}

fn run_config_show() {
    let settings_file = settings::settings_path();

    println!(
        "{}",
        "dexbuild Configuration".if_supports_color(Stdout, |t| t.bold())
    );
    println!();

    if settings_file.exists() {
        println!(
            "  Config file: {} {}",
            settings_file.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green())
        );
    } else {
        println!(
            "  Config file: {} {}",
            settings_file.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed())
        );
    }

    let source = if settings::load_data_dir().is_some() {
        "(from settings.toml)"
    } else {
        "(default)"
    };
    println!(
        "  Data directory: {} {}",
        settings::resolve_data_dir(None)
            .display()
            .if_supports_color(Stdout, |t| t.cyan()),
        source.if_supports_color(Stdout, |t| t.dimmed())
    );

    if let Some(contents) = settings::load_settings_string() {
        println!();
        println!(
            "  {}",
            "settings.toml:".if_supports_color(Stdout, |t| t.bold())
        );
        for line in contents.lines() {
            println!("    {line}");
        }
    }
}

fn run_config_set_data_dir(path: PathBuf) {
    match settings::save_data_dir(Some(&path)) {
        Ok(()) => {
            println!(
                "{} Default data directory set to {}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                path.display().if_supports_color(Stdout, |t| t.cyan())
            );
            println!(
                "  {}",
                format!("Saved in {}", settings::settings_path().display())
                    .if_supports_color(Stdout, |t| t.dimmed())
            );
        }
        Err(e) => {
            eprintln!(
                "{} Failed to save settings: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e
            );
            std::process::exit(1);
        }
    }
}

fn run_config_clear_data_dir() {
    match settings::save_data_dir(None) {
        Ok(()) => {
            println!(
                "{} Cleared the saved data directory",
                "\u{2714}".if_supports_color(Stdout, |t| t.green())
            );
        }
        Err(e) => {
            eprintln!(
                "{} Failed to save settings: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e
            );
            std::process::exit(1);
        }
    }
}

fn run_config_path() {
    println!("{}", settings::settings_path().display());
}
