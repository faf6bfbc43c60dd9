// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use uuid::Uuid;

use panelkit::app_config::{self, Config};
use panelkit::app_controller::Controller;
use panelkit::client::models::UserCreate;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in and store the session
    Login {
        /// Account email
        #[arg(short, long)]
        username: String,

        /// Account password
        #[arg(short, long, env = "PANELKIT_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Revoke and forget the stored session
    Logout,

    /// Show whether a live session is stored
    Status,

    /// Show the logged-in account
    Whoami,

    /// Resolve a translation key in the active language
    Translate {
        /// Translation key
        key: String,

        /// Placeholder value as name=value (repeatable)
        #[arg(short, long = "set", value_parser = parse_replacement)]
        replacements: Vec<(String, String)>,

        /// Resolve in this language instead of the active one
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Change the display language
    Language {
        /// Language code (e.g., 'en', 'cs')
        code: String,
    },

    /// Send a password recovery email
    Recover {
        /// Account email
        email: String,
    },

    /// Manage users (superuser only)
    #[command(subcommand)]
    Users(UsersCommand),

    /// Generate shell completions for panelkit
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
enum UsersCommand {
    /// List users
    List {
        #[arg(long, default_value_t = 0)]
        skip: u32,

        #[arg(long, default_value_t = 100)]
        limit: u32,
    },

    /// Create a user
    Create {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "PANELKIT_NEW_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        full_name: Option<String>,

        #[arg(long)]
        superuser: bool,
    },

    /// Show one user
    Show {
        /// User id
        id: Uuid,
    },

    /// Delete a user
    Delete {
        /// User id
        id: Uuid,
    },
}

/// panelkit - session and translation client for the admin panel backend
#[derive(Parser, Debug)]
#[command(name = "panelkit")]
#[command(version)]
#[command(about = "Session and translation client for the admin panel backend")]
#[command(long_about = "panelkit logs in to the admin panel backend, keeps the session in a local store and resolves UI translations.

EXAMPLES:
    panelkit login -u admin@example.com          # Log in (password from PANELKIT_PASSWORD or -p)
    panelkit status                              # Show session state
    panelkit translate welcome                   # Resolve a key in the active language
    panelkit translate greeting --set name=Ann   # Substitute {name}
    panelkit language cs                         # Switch language
    panelkit users list --limit 20               # List users (superuser)
    panelkit completions bash > panelkit.bash    # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: PathBuf,

    /// Backend base URL (overrides the config file)
    #[arg(long, env = "PANELKIT_API_URL", global = true)]
    api_url: Option<String>,

    /// Session store path (overrides the config file)
    #[arg(long, global = true)]
    store_path: Option<PathBuf>,

    /// Set logging level
    #[arg(long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

/// Parse `name=value`
fn parse_replacement(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected name=value, got '{}'", raw))
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI colour for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Trace is the ceiling; the effective level is set once the config is loaded
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "panelkit", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config).await?;
    controller.start().await?;

    run_command(&controller, cli.command).await
}

/// Load the config file and apply command line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(&cli.config_path)?;

    if let Some(api_url) = &cli.api_url {
        config.api.base_url = api_url.clone();
    }
    if let Some(store_path) = &cli.store_path {
        config.storage.path = Some(store_path.clone());
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    config
        .validate()
        .context("Configuration validation failed")?;
    Ok(config)
}

async fn run_command(controller: &Controller, command: Commands) -> Result<()> {
    match command {
        Commands::Login { username, password } => {
            let user = controller.login(&username, &password).await?;
            println!("{}", user.email);
        }
        Commands::Logout => controller.logout().await,
        Commands::Status => {
            let status = controller.status();
            println!("logged_in: {}", status.logged_in);
            if let Some(expiry) = status.expiry_epoch_ms.and_then(chrono::DateTime::from_timestamp_millis) {
                println!("expires: {}", expiry.with_timezone(&chrono::Local));
            }
            if let Some(email) = status.email {
                println!("user: {}", email);
            }
            println!("language: {}", status.language);
            println!("translations_ready: {}", status.translations_ready);
        }
        Commands::Whoami => {
            let user = controller.session().ensure_current_user().await?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        Commands::Translate {
            key,
            replacements,
            language,
        } => {
            if let Some(language) = language {
                controller.resolver().set_language(&language).await?;
            }
            let replacements: HashMap<String, String> = replacements.into_iter().collect();
            let replacements = (!replacements.is_empty()).then_some(&replacements);
            println!("{}", controller.translate(&key, replacements));
        }
        Commands::Language { code } => {
            let language = controller.set_language(&code).await?;
            info!("Active language: {}", language);
        }
        Commands::Recover { email } => {
            controller.session().recover_password(&email).await?;
        }
        Commands::Users(users) => run_users_command(controller, users).await?,
        Commands::Completions { .. } => return Err(anyhow!("Completions are handled before startup")),
    }

    Ok(())
}

async fn run_users_command(controller: &Controller, command: UsersCommand) -> Result<()> {
    match command {
        UsersCommand::List { skip, limit } => {
            let page = controller.list_users(skip, limit).await?;
            for user in &page.data {
                println!(
                    "{}  {}  {}{}",
                    user.id,
                    user.email,
                    user.full_name.as_deref().unwrap_or("-"),
                    if user.is_superuser { "  (superuser)" } else { "" }
                );
            }
            info!("{} of {} users", page.data.len(), page.count);
        }
        UsersCommand::Create {
            email,
            password,
            full_name,
            superuser,
        } => {
            let mut user = UserCreate::new(email, password);
            user.full_name = full_name;
            user.is_superuser = superuser;
            let created = controller.create_user(&user).await?;
            println!("{}", created.id);
        }
        UsersCommand::Show { id } => {
            let user = controller.get_user(id).await?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
        UsersCommand::Delete { id } => {
            let message = controller.delete_user(id).await?;
            info!("{}", message.message);
        }
    }
    Ok(())
}
