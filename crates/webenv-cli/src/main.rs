#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

mod commands;
mod logging;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use webenv_core::{EnvSnapshot, Mode, Platform};

#[derive(Parser, Debug)]
#[command(name = "webenv")]
#[command(author, version, about = "Inspect web bundler paths and dev server configuration", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Show resolved project paths
    Paths {
        /// Target platform (web, ios, android, electron)
        #[arg(long, default_value = "web")]
        platform: Platform,

        /// Resolve asynchronously, tolerating a missing project config
        #[arg(long = "async")]
        async_lookup: bool,
    },

    /// Show the public path and URL for a mode
    PublicPaths {
        /// Bundler mode (development, production, none); defaults to NODE_ENV
        #[arg(long)]
        mode: Option<Mode>,
    },

    /// Show the dev server configuration
    DevServer {
        /// Target platform (web, ios, android, electron)
        #[arg(long, default_value = "web")]
        platform: Platform,

        /// Bundler mode (development, production, none); defaults to NODE_ENV
        #[arg(long)]
        mode: Option<Mode>,

        /// Serve over HTTPS (uses SSL_CRT_FILE / SSL_KEY_FILE when set)
        #[arg(long)]
        https: bool,

        /// Proxy a path prefix to a backend, as PREFIX=URL (repeatable)
        #[arg(long, value_name = "PREFIX=URL")]
        proxy: Vec<String>,

        /// Host name the server is reached under
        #[arg(long, value_name = "HOST")]
        allowed_host: Option<String>,
    },

    /// Show the font loader rule
    FontRule,

    /// Check that a certificate and private key form a usable pair
    VerifyCert {
        /// PEM certificate file
        cert: PathBuf,

        /// PEM private key file
        key: PathBuf,
    },

    /// Run a preview dev server over the template folder
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "19006")]
        port: u16,

        /// Target platform (web, ios, android, electron)
        #[arg(long, default_value = "web")]
        platform: Platform,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Determine working directory
    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    let cwd = dunce::canonicalize(&cwd).unwrap_or(cwd);

    logging::init(cli.verbose, cli.json);

    // Environment is read once and passed down explicitly
    let snapshot = EnvSnapshot::from_process();

    let Some(command) = cli.command else {
        return commands::version::run(cli.json);
    };

    let span = tracing::info_span!("webenv", cwd = %cwd.display());
    let _guard = span.enter();

    match command {
        Commands::Version => commands::version::run(cli.json),
        Commands::Paths {
            platform,
            async_lookup,
        } => commands::paths::run(&cwd, platform, async_lookup, &snapshot, cli.json),
        Commands::PublicPaths { mode } => commands::paths::run_public(&cwd, mode, &snapshot, cli.json),
        Commands::DevServer {
            platform,
            mode,
            https,
            proxy,
            allowed_host,
        } => {
            let action = commands::dev_server::DevServerAction {
                cwd: cwd.clone(),
                platform,
                mode,
                https,
                proxy,
                allowed_host,
            };
            commands::dev_server::run(action, &snapshot, cli.json)
        }
        Commands::FontRule => commands::font_rule::run(&cwd, cli.json),
        Commands::VerifyCert { cert, key } => commands::verify_cert::run(&cwd, &cert, &key, cli.json),
        Commands::Serve { port, platform } => {
            let action = commands::serve::ServeAction {
                cwd: cwd.clone(),
                port,
                platform,
            };
            let rt = tokio::runtime::Runtime::new().into_diagnostic()?;
            rt.block_on(commands::serve::run(action, snapshot))
        }
    }
}
