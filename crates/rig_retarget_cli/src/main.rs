use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use rig_retarget_core::prelude::*;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Convert rigs between Mixamo, VRoid and Move-One and match poses")]
struct Cli {
    /// Bone mapping tables (.json or .ron). Defaults to the bundled tables.
    #[arg(short, long, global = true)]
    mappings: Option<PathBuf>,
    /// Log debug diagnostics (unmapped bones, skipped bones, ...).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the detected rig type of a skeleton.
    Detect { skeleton: PathBuf },
    /// List the rig types a skeleton can be converted to.
    Targets { skeleton: PathBuf },
    /// Print the bone mapping between two rig types.
    Resolve { from: Taxonomy, to: Taxonomy },
    /// Rename and delete bones so the skeleton follows another rig type.
    Convert {
        skeleton: PathBuf,
        #[arg(short, long)]
        to: Taxonomy,
        /// Skip detection and treat the skeleton as this rig type.
        #[arg(short, long)]
        from: Option<Taxonomy>,
        /// Where to write the result. Defaults to overwriting the input.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Move the bones of the active skeleton onto the matching bones of the source skeleton.
    MatchPose {
        active: PathBuf,
        source: PathBuf,
        /// Where to write the result. Defaults to overwriting the active skeleton.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .with_target(false)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CommandError> {
    let tables = match &cli.mappings {
        Some(path) => MappingTables::load_or_empty(path),
        None => MappingTables::bundled()?,
    };

    match cli.command {
        Command::Detect { skeleton } => {
            let skeleton = Skeleton::load(skeleton)?;
            let classification = detect(&skeleton, &tables)?;
            for (taxonomy, score) in classification.scores {
                info!("{taxonomy}: {:.0}% of reference bones present", score * 100.);
            }
            match classification.taxonomy {
                Some(taxonomy) => println!("{taxonomy}"),
                None => println!(
                    "UNKNOWN (no rig type above {:.0}%)",
                    DETECTION_THRESHOLD * 100.
                ),
            }
        }
        Command::Targets { skeleton } => {
            let skeleton = Skeleton::load(skeleton)?;
            let detected = detect(&skeleton, &tables)?.taxonomy;
            for taxonomy in target_options(detected) {
                println!("{taxonomy}");
            }
        }
        Command::Resolve { from, to } => {
            let mapping = resolve(from, to, &tables);
            for (source, target) in mapping.renames() {
                println!("{source} -> {target}");
            }
            for bone in mapping.deletion_set() {
                println!("{bone} -> (delete)");
            }
        }
        Command::Convert {
            skeleton: path,
            to,
            from,
            output,
        } => {
            let mut skeleton = Skeleton::load(&path)?;
            let mut settings = ConversionSettings::default();
            settings.set_target(Some(to), |settings| {
                info!("Target rig set to {:?}", settings.target())
            });

            let outcome = convert_rig(&mut skeleton, &tables, settings.target(), from)?;
            for name in &outcome.report.unmapped {
                info!("Unmapped bone: {name}");
            }

            let output = output.unwrap_or(path);
            skeleton.save(&output)?;
            println!(
                "Converted {} to {}: {} renamed, {} deleted, {} unmapped -> {}",
                outcome.source,
                outcome.target,
                outcome.report.renamed.len(),
                outcome.report.deleted.len(),
                outcome.report.unmapped.len(),
                output.display()
            );
        }
        Command::MatchPose {
            active: active_path,
            source,
            output,
        } => {
            if active_path == source {
                return Err(
                    PreconditionError::SameSkeleton(active_path.display().to_string()).into(),
                );
            }

            let mut active = Skeleton::load(&active_path)?;
            let source = Skeleton::load(source)?;

            let report = match_rig_pose(&mut active, &source, &AlignConfig::default())?;

            let output = output.unwrap_or(active_path);
            active.save(&output)?;
            println!(
                "Rig pose matched successfully: {} aligned, {} skipped -> {}",
                report.aligned.len(),
                report.skipped.len(),
                output.display()
            );
        }
    }

    Ok(())
}
