//! condactl CLI Entry Point
//!
//! A thin command-line front for the library, mapping subcommands 1:1 onto
//! library calls.
//!
//! # Usage
//!
//! ```bash
//! # Show installation info
//! condactl info
//!
//! # Search for packages
//! condactl search numpy
//!
//! # List environments
//! condactl envs
//!
//! # List packages in an environment
//! condactl list science
//!
//! # Read or write configuration
//! condactl config get channels
//! condactl config set use_pip true
//! ```

use std::env;
use std::process::ExitCode;

use log::info;

use conda_client::config::ConfigValue;
use conda_client::{Config, Env, APP_NAME, VERSION};

/// Command-line configuration parsed from arguments.
#[derive(Debug)]
struct CliConfig {
    command: Command,
    verbose: bool,
}

/// Subcommands understood by condactl.
#[derive(Debug)]
enum Command {
    Info,
    Search { spec: Option<String> },
    Envs,
    List { env: String },
    Launch { app: String },
    ConfigGet { key: Option<String> },
    ConfigSet { key: String, value: String },
}

/// Configures the logging system with appropriate formatting.
fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            use std::io::Write;

            match record.level() {
                log::Level::Warn | log::Level::Error => {
                    writeln!(buf, "[{}] {}", record.level(), record.args())
                }
                _ => writeln!(buf, "{}", record.args()),
            }
        })
        .init();
}

/// Prints usage information.
fn print_usage() {
    println!("Usage: condactl [OPTIONS] <COMMAND>");
    println!();
    println!("Commands:");
    println!("  info                     Show conda installation info");
    println!("  search [SPEC]            Search channels for packages");
    println!("  envs                     List environments");
    println!("  list <ENV>               List packages linked in an environment");
    println!("  launch <APP>             Launch an installed conda app");
    println!("  config get [KEY]         Read configuration");
    println!("  config set <KEY> <VALUE> Write configuration");
    println!();
    println!("Options:");
    println!("  --verbose                Enable debug logging");
    println!("  --help                   Show this help message");
    println!("  --version                Show version information");
}

/// Parses command-line arguments.
fn parse_arguments(args: &[String]) -> Result<CliConfig, String> {
    let mut verbose = false;
    let mut positional: Vec<String> = Vec::new();

    for arg in &args[1..] {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("{} {}", APP_NAME, VERSION);
                std::process::exit(0);
            }
            "--verbose" | "-v" => {
                verbose = true;
            }
            other if other.starts_with('-') => {
                return Err(format!("Unknown option: {}", other));
            }
            _ => positional.push(arg.clone()),
        }
    }

    let command = parse_command(&positional)?;
    Ok(CliConfig { command, verbose })
}

fn parse_command(positional: &[String]) -> Result<Command, String> {
    let mut words = positional.iter().map(String::as_str);

    let command = match words.next() {
        None => return Err("No command given".to_string()),
        Some("info") => Command::Info,
        Some("search") => Command::Search {
            spec: words.next().map(str::to_string),
        },
        Some("envs") => Command::Envs,
        Some("list") => Command::List {
            env: words
                .next()
                .ok_or("list requires an environment name")?
                .to_string(),
        },
        Some("launch") => Command::Launch {
            app: words.next().ok_or("launch requires an app name")?.to_string(),
        },
        Some("config") => match words.next() {
            Some("get") => Command::ConfigGet {
                key: words.next().map(str::to_string),
            },
            Some("set") => Command::ConfigSet {
                key: words.next().ok_or("config set requires a key")?.to_string(),
                value: words
                    .next()
                    .ok_or("config set requires a value")?
                    .to_string(),
            },
            other => {
                return Err(format!(
                    "config requires 'get' or 'set', got {:?}",
                    other.unwrap_or("nothing")
                ))
            }
        },
        Some(other) => return Err(format!("Unknown command: {}", other)),
    };

    if words.next().is_some() {
        return Err("Unexpected trailing arguments".to_string());
    }

    Ok(command)
}

/// Renders a config value literal from the command line.
fn parse_value(raw: &str) -> ConfigValue {
    match raw {
        "true" | "yes" => ConfigValue::Bool(true),
        "false" | "no" => ConfigValue::Bool(false),
        other => match other.parse::<f64>() {
            Ok(n) => ConfigValue::Number(n),
            Err(_) => ConfigValue::Text(other.to_string()),
        },
    }
}

async fn execute(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Info => {
            let info = conda_client::info().await?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Command::Search { spec } => {
            let results = conda_client::search(spec.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Command::Envs => {
            for env in Env::get_envs().await? {
                println!("{}  {}", env.name, env.prefix.display());
            }
        }
        Command::List { env: name } => {
            let env = Env::get_envs()
                .await?
                .into_iter()
                .find(|env| env.name == name)
                .ok_or_else(|| format!("No such environment: {}", name))?;
            for package in env.linked().await? {
                println!(
                    "{}  {}  {}",
                    package.name, package.version, package.build
                );
            }
        }
        Command::Launch { app } => {
            let outcome = conda_client::launch(&app).await?;
            if let Some(error) = outcome.error {
                return Err(error.into());
            }
            info!("Launched '{}'", app);
        }
        Command::ConfigGet { key } => {
            let config = Config::new();
            let value = match key {
                Some(key) => config.get(&key).await?,
                None => config.get_all().await?,
            };
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Command::ConfigSet { key, value } => {
            let outcome = Config::new().set(&key, parse_value(&value)).await?;
            if let Some(error) = outcome.error {
                return Err(error.into());
            }
            println!("Set {} = {}", key, value);
        }
    }

    Ok(())
}

/// Main application entry point.
async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let config = parse_arguments(&args).map_err(|e| {
        eprintln!("Error: {}", e);
        eprintln!();
        print_usage();
        e
    })?;

    setup_logging(config.verbose);

    execute(config.command).await
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
