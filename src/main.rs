use anyhow::{Context, Result};
use clap::Parser;

use semver_release::actions::ActionsRuntime;
use semver_release::config::{self, Config, RepositoryConfig};
use semver_release::provider::{GitHubClient, LocalRepository, RepositoryProvider};
use semver_release::{ui, SemverRelease};

#[derive(clap::Parser)]
#[command(
    name = "semver-release",
    version,
    about = "Compute the next semantic version from commit messages and publish a release"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "Version assumed when no matching tag exists")]
    init_version: Option<String>,

    #[arg(long, help = "Prefix of version tags, e.g. 'v'")]
    tag_prefix: Option<String>,

    #[arg(long, help = "Branch the release points at")]
    target_branch: Option<String>,

    #[arg(long, help = "Drop the oldest commit even when no tag bounds the history")]
    drop_oldest_without_tag: bool,

    #[arg(long, help = "Preview the next version without creating a release")]
    dry_run: bool,

    #[arg(long, value_name = "PATH", help = "Read a local git checkout instead of the GitHub API")]
    local: Option<String>,

    #[arg(short, long, help = "Enable debug logging")]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(e) = run(args).await {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let mut runtime = ActionsRuntime::from_env();
    let config = resolve_config(&args, &runtime)?;

    let provider: Box<dyn RepositoryProvider> = match &args.local {
        Some(path) => {
            ui::display_status(&format!("Reading local repository at {}", path));
            Box::new(
                LocalRepository::open(path)
                    .with_context(|| format!("Cannot open git repository at '{}'", path))?,
            )
        }
        None => {
            let repository = RepositoryConfig::from_env()?;
            ui::display_status(&format!("Reading GitHub repository {}", repository.slug()));
            Box::new(GitHubClient::new(repository)?)
        }
    };

    let dry_run = config.dry_run;
    let outcome = SemverRelease::new(config, provider.as_ref())
        .run()
        .await
        .context("Release run failed")?;

    outcome.emit(&mut runtime).context("Cannot write step outputs")?;
    outcome
        .persist(&mut runtime)
        .context("Cannot save step state")?;

    ui::display_outcome(&outcome, dry_run);
    if outcome.released {
        ui::display_success(&format!("Published release {}", outcome.new_version));
    }

    Ok(())
}

/// Defaults < config file < step inputs < command line
fn resolve_config(args: &Args, runtime: &ActionsRuntime) -> Result<Config> {
    let mut config = config::load_config(args.config.as_deref())?;
    config.apply_inputs(runtime)?;

    if let Some(init_version) = &args.init_version {
        config.init_version = init_version.clone();
    }
    if let Some(tag_prefix) = &args.tag_prefix {
        config.tag_prefix = tag_prefix.clone();
    }
    if let Some(target_branch) = &args.target_branch {
        config.target_branch = target_branch.clone();
    }
    if args.drop_oldest_without_tag {
        config.drop_oldest_without_tag = true;
    }
    if args.dry_run {
        config.dry_run = true;
    }

    config.validate()?;
    log::debug!("config: {:?}", config);
    Ok(config)
}
