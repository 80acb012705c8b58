//! Skinsync CLI - Command-line tool for reconciling NPC skin colors.
//!
//! This is the main entry point for the skinsync command-line application.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use skinsync::prelude::*;
use skinsync::records::Sex;
use skinsync::tint::PassStats;

/// Skinsync - Skyrim NPC skin color patcher
#[derive(Parser)]
#[command(name = "skinsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug details of every patched or skipped character
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the skin passes and write the patch plugin
    Patch {
        /// Load order snapshot (JSON)
        #[arg(short, long, env = "SKINSYNC_LOAD_ORDER")]
        load_order: PathBuf,

        /// Settings file (JSON)
        #[arg(short, long, env = "SKINSYNC_SETTINGS")]
        settings: Option<PathBuf>,

        /// Skip vampire skin normalization
        #[arg(long)]
        no_vampire_patch: bool,

        /// Output file for the patch plugin (JSON)
        #[arg(short, long, default_value = "SkinColorPatch.json")]
        output: PathBuf,

        /// File name of the patch plugin
        #[arg(long, default_value = "SkinColorPatch.esp")]
        patch_name: String,
    },

    /// List resolved skin profiles of all races
    Races {
        /// Load order snapshot (JSON)
        #[arg(short, long, env = "SKINSYNC_LOAD_ORDER")]
        load_order: PathBuf,

        /// Only races whose editor id or form key contains this text
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Show the resolved skin of one NPC
    Npc {
        /// Load order snapshot (JSON)
        #[arg(short, long, env = "SKINSYNC_LOAD_ORDER")]
        load_order: PathBuf,

        /// NPC form key, e.g. `01327C:Skyrim.esm`
        form_key: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Patch {
            load_order,
            settings,
            no_vampire_patch,
            output,
            patch_name,
        } => {
            cmd_patch(&load_order, settings.as_deref(), no_vampire_patch, &output, &patch_name)?;
        }
        Commands::Races { load_order, filter } => {
            cmd_races(&load_order, filter.as_deref())?;
        }
        Commands::Npc { load_order, form_key } => {
            cmd_npc(&load_order, &form_key)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn open_store(path: &Path) -> Result<RecordStore> {
    let start = Instant::now();
    let store = RecordStore::open(path).with_context(|| format!("Failed to load {}", path.display()))?;

    let counts = store.counts();
    tracing::info!(
        plugins = counts.plugins,
        races = counts.races,
        colors = counts.colors,
        npcs = counts.npcs,
        elapsed = ?start.elapsed(),
        "load order loaded"
    );
    Ok(store)
}

fn cmd_patch(
    load_order: &Path,
    settings_path: Option<&Path>,
    no_vampire_patch: bool,
    output: &Path,
    patch_name: &str,
) -> Result<()> {
    let mut settings = match settings_path {
        Some(path) => Settings::load(path).with_context(|| format!("Failed to read settings {}", path.display()))?,
        None => Settings::default(),
    };
    if no_vampire_patch {
        settings.default_vampire_color_patch = false;
    }

    let patch_mod: ModKey = patch_name.parse().context("Invalid patch plugin name")?;
    let store = open_store(load_order)?;

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {msg:<28} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let mut patcher = Patcher::new(&store, patch_mod);
    let mut current = None;
    let report = patcher
        .run_with_progress(&settings, |pass, done, total| {
            if current != Some(pass) {
                current = Some(pass);
                pb.set_message(pass.to_string());
                pb.set_length(total as u64);
            }
            pb.set_position(done as u64);
        })
        .context("Patch run failed")?;
    pb.finish_and_clear();

    println!("Patched in {:?}", start.elapsed());
    match &report.vampire {
        Some(stats) => print_stats("Vampire normalization", stats),
        None => println!("Vampire normalization: disabled"),
    }
    print_stats("Texture lighting", &report.texture_lighting);
    println!(
        "Race profiles: {} resolved ({} cache hits)",
        report.cache.misses, report.cache.hits
    );

    let patch = patcher.into_patch();
    patch
        .write_json(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Wrote {} overrides to {} ({})", report.overrides, output.display(), patch.mod_key());

    Ok(())
}

fn print_stats(name: &str, stats: &PassStats) {
    println!(
        "{}: {} visited, {} patched, {} unchanged, {} without profile, {} skipped",
        name, stats.visited, stats.patched, stats.unchanged, stats.unresolved, stats.skipped
    );
}

fn cmd_races(load_order: &Path, filter: Option<&str>) -> Result<()> {
    let store = open_store(load_order)?;
    let filter = filter.map(str::to_lowercase);

    let mut races: Vec<&Race> = store
        .winning_races()
        .filter(|race| match &filter {
            Some(pattern) => race_label(race).to_lowercase().contains(pattern.as_str()),
            None => true,
        })
        .collect();
    races.sort_by_key(|race| race_label(race));

    let mut cache = RaceProfileCache::new();
    let mut count = 0;
    for race in races {
        let Some(profile) = cache.get(&store, &race.form_key) else {
            continue;
        };
        count += 1;

        println!("{}", race_label(race));
        for sex in [Sex::Male, Sex::Female] {
            match profile.for_sex(sex) {
                Some(skin) => print_profile(sex, skin),
                None => println!("  {:?}: no skin profile", sex),
            }
        }
    }

    println!("\nTotal: {} races with skin profiles", count);

    Ok(())
}

fn race_label(race: &Race) -> String {
    match &race.editor_id {
        Some(id) => format!("{} [{}]", id, race.form_key),
        None => race.form_key.to_string(),
    }
}

fn print_profile(sex: Sex, skin: &SkinProfile) {
    println!(
        "  {:?}: tint index {}, default preset {} = {} @ {:.2}",
        sex, skin.tint_index, skin.default_index, skin.default_color.color, skin.default_color.interpolation
    );
    for (index, color) in &skin.additional_colors {
        println!("    preset {:>3}: {} @ {:.2}", index, color.color, color.interpolation);
    }
}

fn cmd_npc(load_order: &Path, form_key: &str) -> Result<()> {
    let key: FormKey = form_key
        .parse()
        .with_context(|| format!("Invalid form key: {}", form_key))?;
    let store = open_store(load_order)?;

    let npc = store
        .npc(&key)
        .with_context(|| format!("NPC {} not found in load order", key))?;

    println!("NPC: {}", npc.label());
    if let Some(origin) = store.npc_origin(&key) {
        println!("Winning plugin: {}", origin);
    }
    println!("Race: {}", npc.race);
    println!("Sex: {:?}", npc.sex());
    match npc.texture_lighting {
        Some(color) => println!("Texture lighting: {}", color),
        None => println!("Texture lighting: none"),
    }

    let mut cache = RaceProfileCache::new();
    let Some(context) = CharacterSkinContext::resolve(&store, &mut cache, npc) else {
        println!("Race has no skin profile for this sex");
        return Ok(());
    };

    print_profile(npc.sex(), &context.profile);
    match &context.skin_layer {
        Some(layer) => println!(
            "Skin layer: preset {:?}, color {}, interpolation {:?}",
            layer.preset,
            layer.color.map_or_else(|| "none".to_string(), |c| c.to_string()),
            layer.interpolation_value
        ),
        None => println!("Skin layer: none"),
    }

    match context.resolved_color() {
        ResolvedColor::Color(color) => {
            let verdict = if npc.texture_lighting == Some(color) {
                "up to date"
            } else {
                "would be updated"
            };
            println!("Resolved skin color: {} ({})", color, verdict);
        }
        ResolvedColor::LiteralColor => println!("Resolved skin color: literal layer color, left alone"),
        ResolvedColor::MissingPreset(preset) => {
            println!("Resolved skin color: preset {} not defined by race, left alone", preset)
        }
    }

    Ok(())
}
