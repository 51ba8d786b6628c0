use clap::Parser;
use std::path::PathBuf;

mod commands;
mod config;
mod context;
mod format;
mod logging;

/// tagstamp - last-updated times for container image tags
///
/// Lists every tag of a repository and prints when each tag was last built,
/// taken from the newest `created` entry of its schema 1 manifest history.
#[derive(Parser, Debug)]
#[command(name = "tagstamp")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Repository to report on, e.g. kubeflow-images-public/admission-webhook
    #[arg(env = "TAGSTAMP_REPOSITORY")]
    repository: Option<String>,

    /// Registry base URL
    #[arg(short, long, env = "TAGSTAMP_REGISTRY")]
    registry: Option<String>,

    /// Configuration file (YAML)
    #[arg(short, long, env = "TAGSTAMP_CONFIG")]
    config: Option<PathBuf>,

    /// Request timeout in seconds, 0 disables it
    #[arg(long, env = "TAGSTAMP_TIMEOUT")]
    timeout: Option<u64>,

    /// Skip tags that fail instead of stopping at the first one
    #[arg(long)]
    keep_going: bool,

    /// Username for the token endpoint
    #[arg(short, long, env = "TAGSTAMP_USERNAME")]
    username: Option<String>,

    /// Password for the token endpoint
    #[arg(short, long, env = "TAGSTAMP_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Control colored output
    #[arg(long, value_enum, env = "TAGSTAMP_COLOR", default_value_t = format::ColorChoice::Auto)]
    color: format::ColorChoice,
}

impl Cli {
    fn overrides(&self) -> context::Overrides {
        context::Overrides {
            registry: self.registry.clone(),
            repository: self.repository.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            timeout: self.timeout,
            keep_going: self.keep_going,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let verbosity = context::VerbosityLevel::from_count(cli.verbose);
    let formatter = format::create_formatter(cli.color);
    logging::init(verbosity, cli.color.use_ansi_on_stderr());

    let config_path = config::get_config_path(cli.config.clone());
    let ctx = match context::AppContext::build(config_path.as_deref(), cli.overrides()) {
        Ok(ctx) => ctx,
        Err(e) => {
            formatter.error(&format::error_chain(&e));
            std::process::exit(1);
        }
    };

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = commands::scan::run(&ctx, formatter.as_ref(), &mut stdout).await {
        formatter.error(&format::error_chain(e.as_ref()));
        std::process::exit(1);
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
