//! CLI definitions and command routing.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::blacklist::Blacklist;
use crate::config::{resolve_hosts_path, Config, WorkmodePaths};
use crate::workmode::Workmode;

#[derive(Parser)]
#[command(name = "workmode")]
#[command(version)]
#[command(about = "Block distracting domains through the system hosts file")]
pub struct Cli {
    /// Hosts file to manage (default: WORKMODE_HOSTS_FILE, config.toml, then the system hosts file)
    #[arg(long, global = true, value_name = "PATH")]
    pub hosts: Option<PathBuf>,

    /// Show debug logging on stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(flatten)]
    Blacklist(BlacklistCmd),
    /// Inspect or change the stored configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },
}

/// Commands that load the hosts file.
#[derive(Subcommand)]
pub enum BlacklistCmd {
    /// Tell whether the blacklist is active
    Status,
    /// Enable the blacklist. Off to work!
    Start,
    /// Disable the blacklist
    Stop,
    /// Add a domain to the blacklist
    Add { domain: String },
    /// Remove the domain at the given index (or with the given name); prompts when omitted
    Remove {
        #[arg(value_name = "INDEX|DOMAIN")]
        target: Option<String>,
    },
    /// Display the numbered blacklist
    List,
    /// Append domains from a file, one per line
    Import { path: PathBuf },
    /// Write the blacklist to a file, or to stdout when no path is given
    Export { path: Option<PathBuf> },
}

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Print the config file location and the hosts file in use
    Show,
    /// Remember a hosts file path in config.toml
    SetHosts { path: PathBuf },
}

/// Run CLI and dispatch to handlers.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let paths = WorkmodePaths::default_paths();
    let config = Config::load(&paths)?;
    let hosts_path = resolve_hosts_path(cli.hosts.as_deref(), &config);
    tracing::debug!(hosts = %hosts_path.display(), "Resolved hosts file");

    match cli.command {
        Commands::Blacklist(cmd) => cmd_blacklist(&hosts_path, cmd),
        Commands::Config { cmd } => cmd_config(&paths, config, &hosts_path, cmd),
    }
}

fn cmd_blacklist(hosts_path: &Path, cmd: BlacklistCmd) -> Result<()> {
    let mut session = Workmode::open(hosts_path)
        .with_context(|| format!("could not load blacklist from {}", hosts_path.display()))?;
    if session.first_time() {
        println!("Initialised blacklist in `{}`.", session.hosts_path().display());
    }

    match cmd {
        BlacklistCmd::Status => {
            println!("{}", session.blacklist().status());
        }
        BlacklistCmd::Start => {
            println!("{}", session.apply(Blacklist::start)?);
        }
        BlacklistCmd::Stop => {
            println!("{}", session.apply(Blacklist::stop)?);
        }
        BlacklistCmd::Add { domain } => {
            println!("{}", session.apply(|list| list.add(&domain))?);
        }
        BlacklistCmd::Remove { target } => {
            let target = match target {
                Some(t) => t,
                None => prompt_removal(session.blacklist())?,
            };
            println!("{}", session.apply(|list| list.remove(&target))?);
        }
        BlacklistCmd::List => {
            println!("{}", session.blacklist().display_list());
        }
        BlacklistCmd::Import { path } => {
            for domain in session.import_file(&path)? {
                println!("{domain}");
            }
        }
        BlacklistCmd::Export { path } => match path {
            None => println!("{}", session.blacklist().export()),
            Some(dest) => {
                println!("Exporting to `{}`.", dest.display());
                session.export_to(&dest)?;
            }
        },
    }
    Ok(())
}

fn init_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn prompt_removal(list: &Blacklist) -> Result<String> {
    println!("{}", list.display_list());
    let answer: String = dialoguer::Input::new()
        .with_prompt("Which domain do you want to remove")
        .interact_text()
        .context("no domain given")?;
    Ok(answer.trim().to_string())
}

fn cmd_config(
    paths: &WorkmodePaths,
    mut config: Config,
    hosts_path: &Path,
    cmd: ConfigCmd,
) -> Result<()> {
    match cmd {
        ConfigCmd::Show => {
            println!("config: {}", paths.config_file.display());
            println!("hosts: {}", hosts_path.display());
            Ok(())
        }
        ConfigCmd::SetHosts { path } => {
            config.hosts_path = Some(path.clone());
            config.save(paths)?;
            println!("Hosts file set to `{}`.", path.display());
            Ok(())
        }
    }
}
