#![cfg_attr(debug_assertions, allow(warnings))]

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

mod io;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use larva_features::settings::PipelineSettings;
use larva_features::{compute_features, process_batch, resolve_head, segment_table, Table};
use log::{error, info};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(name = "larva-tracker")]
#[command(version)]
#[command(about = "Skeleton, head and motion features of a tracked larva", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON settings file; missing fields take their defaults
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(short, long, global = true, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Subcommand)]
enum Commands {
    /// End and center positions of every mask in a recording
    Skeleton {
        /// JSON list of masks
        masks: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decide which end is the head and relabel the end columns
    Head {
        table: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Append motion features to a head-resolved table
    Features {
        table: PathBuf,
        /// Table of one or two reference points (X, Y)
        #[arg(short, long)]
        reference: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Head resolution and features for many recordings at once
    Batch {
        tables: Vec<PathBuf>,
        #[arg(short, long)]
        reference: Option<PathBuf>,
        /// Directory receiving one output table per input
        #[arg(short, long)]
        output_dir: PathBuf,
    },
}

fn load_settings(cli: &Cli) -> Result<PipelineSettings> {
    match &cli.settings {
        Some(path) => io::read_json(path),
        None => Ok(PipelineSettings::default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .init();

    let settings = load_settings(&cli)?;

    match cli.command {
        Commands::Skeleton { masks, output } => {
            let masks = io::read_masks(&masks)?;
            let table = segment_table(&masks, &settings.skeleton);
            info!("Ordered {} masks.", masks.len());
            io::write_json(&table, output.as_deref())
        }
        Commands::Head { table, output } => {
            let table: Table = io::read_json(&table)?;
            let resolved = resolve_head(&table, &settings.head)?;
            io::write_json(&resolved.table, output.as_deref())
        }
        Commands::Features {
            table,
            reference,
            output,
        } => {
            let table: Table = io::read_json(&table)?;
            let reference: Option<Table> = reference.as_deref().map(io::read_json::<Table>).transpose()?;
            let features = compute_features(&table, reference.as_ref(), &settings.features)?;
            io::write_json(&features, output.as_deref())
        }
        Commands::Batch {
            tables,
            reference,
            output_dir,
        } => {
            let inputs = tables
                .iter()
                .map(|path| io::read_json::<Table>(path))
                .collect::<Result<Vec<_>>>()?;
            let reference: Option<Table> = reference.as_deref().map(io::read_json::<Table>).transpose()?;
            std::fs::create_dir_all(&output_dir)
                .with_context(|| format!("Failed to create {}", output_dir.display()))?;

            let mut failed = 0;
            for (path, result) in tables.iter().zip(process_batch(&inputs, reference.as_ref(), &settings)) {
                let name = path
                    .file_name()
                    .ok_or_else(|| anyhow!("{} has no file name", path.display()))?;
                match result {
                    Ok(table) => io::write_json(&table, Some(output_dir.join(name).as_path()))?,
                    Err(e) => {
                        error!("{}: {:#}", path.display(), e);
                        failed += 1;
                    }
                }
            }

            info!("Processed {} recordings, {} failed.", tables.len(), failed);
            if failed > 0 {
                return Err(anyhow!("{} of {} recordings failed", failed, tables.len()));
            }
            Ok(())
        }
    }
}
