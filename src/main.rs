use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use git_semver::cli::commands::{
    self, CreateTagArgs, FetchOutcome, PushOutcome, ReleaseArgs, TagOutcome,
};
use git_semver::config::{self, Config};
use git_semver::domain::{IncrementKind, Version};
use git_semver::git::Git2Repository;
use git_semver::ui;

#[derive(Parser)]
#[command(
    name = "git-semver",
    about = "Parse, bump and tag semantic versions in git repositories",
    version
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(
        long,
        global = true,
        default_value = ".",
        help = "Path inside the git repository"
    )]
    repo: String,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the components of a version
    Parse { version: String },

    /// Print the next version
    Bump {
        version: String,

        #[arg(short, long, help = "major, minor or patch [default: from config]")]
        kind: Option<IncrementKind>,

        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        amount: i64,
    },

    /// List tags in the repository
    List,

    /// Show an annotated tag
    Show { name: String },

    /// Create an annotated tag for a version on HEAD
    Tag {
        version: String,

        #[command(flatten)]
        opts: TagOpts,
    },

    /// Bump a version and tag the result on HEAD
    Release {
        current: String,

        #[arg(short, long, help = "major, minor or patch [default: from config]")]
        kind: Option<IncrementKind>,

        #[command(flatten)]
        opts: TagOpts,
    },

    /// Fetch tags from a remote
    Fetch {
        #[arg(long, help = "Remote name [default: from config]")]
        remote: Option<String>,
    },

    /// Push all local tags to a remote
    Push {
        #[arg(long, help = "Remote name [default: from config]")]
        remote: Option<String>,

        #[arg(short, long, help = "Skip confirmation prompts")]
        force: bool,
    },
}

#[derive(clap::Args)]
struct TagOpts {
    #[arg(short, long, help = "Tag message [default: from config]")]
    message: Option<String>,

    #[arg(long, help = "Push tags after creating")]
    push: bool,

    #[arg(long, help = "Remote name [default: from config]")]
    remote: Option<String>,

    #[arg(short, long, help = "Skip confirmation prompts")]
    force: bool,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "git_semver=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref())?;

    match args.command {
        Command::Parse { version } => {
            ui::display_version(&Version::parse(&version)?);
        }
        Command::Bump {
            version,
            kind,
            amount,
        } => {
            let kind = kind.unwrap_or(config.tags.default_increment);
            println!("{}", commands::bump(&version, kind, amount)?);
        }
        Command::List => {
            let repo = Git2Repository::open(&args.repo)?;
            let outcome = commands::list_tags(&repo)?;
            for warning in &outcome.warnings {
                ui::display_boundary_warning(warning);
            }
            ui::display_tag_listing(&outcome.tags);
        }
        Command::Show { name } => {
            let repo = Git2Repository::open(&args.repo)?;
            ui::display_annotated_tag(&commands::show_tag(&repo, &name)?);
        }
        Command::Tag { version, opts } => {
            let repo = Git2Repository::open(&args.repo)?;
            let outcome = commands::create_tag(
                &repo,
                &config,
                CreateTagArgs {
                    version,
                    message: opts.message.clone(),
                    dry_run: opts.dry_run,
                },
            )?;
            finish_tag(&repo, &config, &opts, &outcome)?;
        }
        Command::Release {
            current,
            kind,
            opts,
        } => {
            let repo = Git2Repository::open(&args.repo)?;
            let outcome = commands::release(
                &repo,
                &config,
                ReleaseArgs {
                    current: current.clone(),
                    kind,
                    message: opts.message.clone(),
                    dry_run: opts.dry_run,
                },
            )?;
            ui::display_proposed_tag(&current, &outcome.version.to_string());
            finish_tag(&repo, &config, &opts, &outcome)?;
        }
        Command::Fetch { remote } => {
            let repo = Git2Repository::open(&args.repo)?;
            let remote = commands::resolve_remote(remote.as_deref(), &config);
            ui::display_status(&format!("Fetching tags from {}...", remote));
            match commands::fetch(&repo, &remote)? {
                FetchOutcome::Fetched { remote } => {
                    ui::display_success(&format!("Fetched tags from {}", remote))
                }
                FetchOutcome::Skipped(warning) => ui::display_boundary_warning(&warning),
            }
        }
        Command::Push { remote, force } => {
            let repo = Git2Repository::open(&args.repo)?;
            let remote = commands::resolve_remote(remote.as_deref(), &config);
            if !force && !ui::confirm_action(&format!("Push all tags to '{}'?", remote))? {
                println!("Push cancelled by user.");
                return Ok(());
            }
            push(&repo, &remote)?;
        }
    }

    Ok(())
}

/// Report a created (or previewed) tag and push it when asked to
fn finish_tag(
    repo: &Git2Repository,
    config: &Config,
    opts: &TagOpts,
    outcome: &TagOutcome,
) -> Result<()> {
    let tag = outcome.version.to_string();
    let remote = commands::resolve_remote(opts.remote.as_deref(), config);
    let wants_push = opts.push || config.tags.push;

    if !outcome.created {
        ui::display_status("Dry run:");
        ui::display_success(&format!("  Would create tag {} ({})", tag, outcome.message));
        if wants_push {
            ui::display_success(&format!("  Would push tags to {}", remote));
        }
        return Ok(());
    }

    ui::display_success(&format!("Created tag: {}", tag));

    if !wants_push {
        ui::display_manual_push_instruction(&tag, &remote);
        return Ok(());
    }

    if opts.force || ui::confirm_push_tag(&tag, &remote)? {
        push(repo, &remote)?;
    } else {
        ui::display_manual_push_instruction(&tag, &remote);
    }
    Ok(())
}

fn push(repo: &Git2Repository, remote: &str) -> Result<()> {
    ui::display_status(&format!("Pushing tags to {}...", remote));
    match commands::push(repo, remote)? {
        PushOutcome::Pushed { remote, tags } => {
            ui::display_success(&format!("Pushed {} tag(s) to {}", tags.len(), remote))
        }
        PushOutcome::Skipped(warning) => ui::display_boundary_warning(&warning),
    }
    Ok(())
}
