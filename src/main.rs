use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use version_sync::config;
use version_sync::git::Git2Repository;
use version_sync::{orchestration, ui, Project, TagOptions, VersionBump};

#[derive(Parser)]
#[command(
    name = "version-sync",
    version,
    about = "Keep the version declared across a project's files in sync, bump it and tag it"
)]
struct Args {
    #[arg(short, long, default_value = ".", help = "Project directory")]
    project_dir: PathBuf,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the declared project version
    Current,
    /// Check that every file declares the current version
    Verify,
    /// Increment the version and rewrite every declaration
    Bump {
        #[arg(value_enum)]
        part: Part,

        #[arg(long, help = "Preview what would happen without making changes")]
        dry_run: bool,
    },
    /// Commit version files if needed and tag the current version
    Tag,
}

#[derive(Clone, Copy, ValueEnum)]
enum Part {
    Major,
    Minor,
    Patch,
}

impl From<Part> for VersionBump {
    fn from(part: Part) -> Self {
        match part {
            Part::Major => VersionBump::Major,
            Part::Minor => VersionBump::Minor,
            Part::Patch => VersionBump::Patch,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "version_sync=warn",
        1 => "version_sync=info",
        _ => "version_sync=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // A subscriber may already be installed when embedded; keep going without ours
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref(), &args.project_dir)
        .context("Error loading config")?;
    let project = Project::new(&args.project_dir, config.clone());

    match args.command {
        Command::Current => {
            let version = orchestration::current_version(&project)?;
            println!("{}", version);
        }
        Command::Verify => {
            let version = orchestration::current_version(&project)?;
            let occurrences = orchestration::verify(&project, &version)?;
            ui::display_occurrences(&version, &occurrences, &args.project_dir);
            ui::display_success(&format!("All declarations agree on {}", version));
        }
        Command::Bump { part, dry_run } => {
            if dry_run {
                let plan = orchestration::plan_bump(&project, part.into())?;
                ui::display_status("Dry run, no files changed:");
                ui::display_plan(&plan.current, &plan.next, &plan.occurrences, &args.project_dir);
                return Ok(());
            }
            let version = orchestration::bump(&project, part.into())?;
            ui::display_success(&format!("Version is now {}", version));
        }
        Command::Tag => {
            let repo = Git2Repository::open(&args.project_dir)?;
            let options = TagOptions {
                pattern: config.tag_pattern()?,
                commit_message: config.commit.message.clone(),
            };
            ui::display_status("Checking working tree...");
            let tag = orchestration::tag(&project, &repo, &options)?;
            ui::display_success(&format!("Created tag: {}", tag));
        }
    }

    Ok(())
}
