//! HRMS Portal - command-line client for the HRMS backend
//!
//! Drives the department screen (list, search, create, edit, delete) and the
//! sign-in/registration flows from a terminal.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use tracing::{debug, warn};

use hrms_portal::config::{LogFormat, LogTarget, LoggingConfig};
use hrms_portal::controller::{
    AssumeYes, Confirm, DeleteOutcome, LoadOutcome, Notification, NotificationLevel, Notifier,
    StatusFilter, TracingNotifier,
};
use hrms_portal::models::{Department, RecordStatus, RegisterRequest, User, UserRole};
use hrms_portal::{AppConfig, AppState};

#[derive(Debug, Parser)]
#[command(name = "hrms-portal", version, about = "HRMS Portal command-line client")]
struct Cli {
    /// Path to configuration file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Override the API base URL (e.g. http://localhost:5000/api)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and store the session token
    Login {
        #[arg(long)]
        email: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored session token
    Logout,
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// EMPLOYEE, SUPERVISOR or ADMIN
        #[arg(long, default_value = "EMPLOYEE")]
        role: UserRole,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// User directory
    Users {
        #[command(subcommand)]
        command: UserCommand,
    },
    /// Department management
    Departments {
        #[command(subcommand)]
        command: DepartmentCommand,
    },
}

#[derive(Debug, Subcommand)]
enum UserCommand {
    /// List users
    List {
        #[arg(long)]
        search: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum DepartmentCommand {
    /// List departments
    List {
        /// Match against name or code, case-insensitive
        #[arg(long, short, default_value = "")]
        search: String,
        /// all, Active or Inactive
        #[arg(long, default_value = "all")]
        status: StatusFilter,
    },
    /// Create a department
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "Active")]
        status: RecordStatus,
        /// Manager user id
        #[arg(long)]
        manager: Option<String>,
    },
    /// Edit a department; omitted fields keep their current value
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        status: Option<RecordStatus>,
        /// Manager user id; an empty value removes the manager
        #[arg(long)]
        manager: Option<String>,
    },
    /// Delete a department
    Delete {
        id: String,
        /// Do not ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },
}

/// Notifications printed to the terminal, and recorded in the log file when
/// one is configured
struct TerminalNotifier {
    log: Option<TracingNotifier>,
}

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => println!("✓ {}", notification.message),
            NotificationLevel::Error => eprintln!("✗ {}", notification.message),
        }
        if let Some(log) = &self.log {
            log.notify(notification);
        }
    }
}

/// Interactive yes/no prompt
struct PromptConfirm;

#[async_trait]
impl Confirm for PromptConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        let prompt = prompt.to_string();
        tokio::task::spawn_blocking(move || {
            dialoguer::Confirm::new()
                .with_prompt(prompt)
                .default(false)
                .interact()
                .unwrap_or(false)
        })
        .await
        .unwrap_or(false)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration first (before logging, so we know log format)
    let mut config =
        AppConfig::load_from(cli.config.clone()).context("Failed to load configuration")?;
    if let Some(url) = cli.api_url.clone() {
        config.api.base_url = url;
        config.validate().context("Invalid --api-url")?;
    }

    // The guard must be kept alive for the duration of the program
    // to ensure log messages are flushed to files
    let _log_guard = init_logging(&config);
    debug!("Using API at {}", config.api.base_url);

    let restore = config.session.restore_on_start;
    let notifier = TerminalNotifier {
        // Console logs would repeat what is already printed
        log: (config.logging.target != LogTarget::Console).then_some(TracingNotifier),
    };
    let state = AppState::new(config, Arc::new(notifier))
        .context("Failed to initialize HRMS API client")?;

    if restore {
        match state.auth().restore().await {
            Ok(true) => debug!("Restored stored session"),
            Ok(false) => debug!("No live stored session"),
            Err(e) => warn!("Could not read stored session: {}", e),
        }
    }

    let ok = match cli.command {
        Command::Login { email, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt_password()?,
            };
            state.auth().login(&email, &password).await.is_ok()
        }
        Command::Logout => match state.auth().logout().await {
            Ok(()) => {
                state.notifier.success("Signed out");
                true
            }
            Err(e) => {
                state.notifier.error(&e.user_message("Failed to sign out"));
                false
            }
        },
        Command::Register {
            name,
            email,
            role,
            password,
        } => {
            let password = match password {
                Some(p) => p,
                None => prompt_password()?,
            };
            let request = RegisterRequest {
                name,
                email,
                role,
                password,
            };
            state.auth().register(&request).await.is_ok()
        }
        Command::Users { command } => run_users(&state, command).await,
        Command::Departments { command } => run_departments(&state, command).await,
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn prompt_password() -> Result<String> {
    dialoguer::Password::new()
        .with_prompt("Password")
        .interact()
        .context("Failed to read password")
}

async fn run_users(state: &AppState, command: UserCommand) -> bool {
    let UserCommand::List { search } = command;
    let users = match search {
        Some(term) => state.users().search(&term).await,
        None => state.users().list().await,
    };

    match users {
        Ok(users) => {
            print_users(&users);
            true
        }
        Err(e) => {
            state.notifier.error(&e.user_message("Failed to fetch users"));
            false
        }
    }
}

async fn run_departments(state: &AppState, command: DepartmentCommand) -> bool {
    let screen = state.departments();
    let loaded = screen.mount().await == LoadOutcome::Applied;

    match command {
        DepartmentCommand::List { search, status } => {
            if !loaded {
                return false;
            }
            screen.set_search(search).await;
            screen.set_status_filter(status).await;
            print_departments(&screen.filtered().await);
            println!("{}", screen.summary().await);
            true
        }
        DepartmentCommand::Create {
            name,
            status,
            manager,
        } => {
            screen.open_create().await;
            screen
                .update_draft(|d| {
                    d.name = name;
                    d.status = status;
                    d.manager_id = manager.unwrap_or_default();
                })
                .await;
            screen.submit().await.is_ok()
        }
        DepartmentCommand::Edit {
            id,
            name,
            status,
            manager,
        } => {
            if !screen.open_edit_by_id(&id).await {
                if loaded {
                    state
                        .notifier
                        .error(&format!("Department '{}' not found", id));
                }
                return false;
            }
            screen
                .update_draft(|d| {
                    if let Some(name) = name {
                        d.name = name;
                    }
                    if let Some(status) = status {
                        d.status = status;
                    }
                    if let Some(manager) = manager {
                        d.manager_id = manager;
                    }
                })
                .await;
            screen.submit().await.is_ok()
        }
        DepartmentCommand::Delete { id, yes } => {
            let display_name = screen
                .find(&id)
                .await
                .map(|d| d.name)
                .unwrap_or_else(|| id.clone());
            let confirm: &dyn Confirm = if yes { &AssumeYes } else { &PromptConfirm };
            match screen.delete(&id, &display_name, confirm).await {
                Ok(DeleteOutcome::Deleted) => true,
                Ok(DeleteOutcome::Declined) => {
                    println!("Nothing deleted.");
                    true
                }
                Err(_) => false,
            }
        }
    }
}

fn print_departments(departments: &[Department]) {
    if departments.is_empty() {
        println!("No departments found.");
        return;
    }

    println!(
        "{:<9} {:<10} {:<28} {:<9} {:<24} {}",
        "SERIAL", "CODE", "DEPARTMENT", "EMPLOYEES", "MANAGER", "STATUS"
    );
    for d in departments {
        println!(
            "{:<9} {:<10} {:<28} {:<9} {:<24} {}",
            d.serial_no,
            d.department_code,
            d.name,
            format!("{:02}", d.employee_count),
            d.manager_name(),
            d.status
        );
    }
}

fn print_users(users: &[User]) {
    if users.is_empty() {
        println!("No users found.");
        return;
    }

    println!("{:<28} {:<28} {:<32} {}", "ID", "NAME", "EMAIL", "ROLE");
    for u in users {
        println!(
            "{:<28} {:<28} {:<32} {}",
            u.id,
            u.name,
            u.email.as_deref().unwrap_or("-"),
            u.role.as_deref().unwrap_or("-")
        );
    }
}

/// Initialize logging based on configuration
///
/// Returns a guard that must be kept alive for file logging to work.
/// Console output goes to stderr so it never mixes with command output.
fn init_logging(config: &AppConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{prelude::*, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let log_config = &config.logging;

    match &log_config.target {
        LogTarget::Console => {
            let subscriber = tracing_subscriber::registry().with(env_filter);
            init_console_logging(subscriber, &log_config.format);
            None
        }
        LogTarget::File => {
            let (writer, guard) = create_file_writer(log_config);
            let subscriber = tracing_subscriber::registry().with(env_filter);
            init_file_logging(subscriber, &log_config.format, writer);
            Some(guard)
        }
        LogTarget::Both => {
            let (writer, guard) = create_file_writer(log_config);
            let subscriber = tracing_subscriber::registry().with(env_filter);
            init_console_logging(
                subscriber.with(file_layer(&log_config.format, writer)),
                &log_config.format,
            );
            Some(guard)
        }
    }
}

fn create_file_writer(
    log_config: &LoggingConfig,
) -> (
    tracing_appender::non_blocking::NonBlocking,
    tracing_appender::non_blocking::WorkerGuard,
) {
    // Ensure log directory exists
    if let Err(e) = std::fs::create_dir_all(&log_config.log_dir) {
        eprintln!(
            "Warning: Failed to create log directory {:?}: {}",
            log_config.log_dir, e
        );
    }

    let file_appender = if log_config.daily_rotation {
        tracing_appender::rolling::daily(&log_config.log_dir, &log_config.log_prefix)
    } else {
        tracing_appender::rolling::never(&log_config.log_dir, &log_config.log_prefix)
    };

    tracing_appender::non_blocking(file_appender)
}

/// Boxed fmt layer writing to the log file in the configured format
fn file_layer<S>(
    format: &LogFormat,
    writer: tracing_appender::non_blocking::NonBlocking,
) -> Box<dyn tracing_subscriber::Layer<S> + Send + Sync>
where
    S: tracing::Subscriber
        + for<'a> tracing_subscriber::registry::LookupSpan<'a>
        + Send
        + Sync
        + 'static,
{
    use tracing_subscriber::{fmt, Layer};

    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_writer(writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(false)
            .with_ansi(false)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
            .boxed(),
    }
}

/// Initialize console-only logging
fn init_console_logging<S>(subscriber: S, format: &LogFormat)
where
    S: tracing::Subscriber
        + for<'a> tracing_subscriber::registry::LookupSpan<'a>
        + Send
        + Sync
        + 'static,
{
    use tracing_subscriber::{fmt, prelude::*};

    match format {
        LogFormat::Json => {
            subscriber
                .with(fmt::layer().json().with_target(true).with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Compact => {
            subscriber
                .with(
                    fmt::layer()
                        .compact()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        LogFormat::Pretty => {
            subscriber
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(false)
                        .with_file(false)
                        .with_line_number(false)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
}

/// Initialize file-only logging
fn init_file_logging<S>(
    subscriber: S,
    format: &LogFormat,
    writer: tracing_appender::non_blocking::NonBlocking,
) where
    S: tracing::Subscriber
        + for<'a> tracing_subscriber::registry::LookupSpan<'a>
        + Send
        + Sync
        + 'static,
{
    use tracing_subscriber::prelude::*;

    subscriber.with(file_layer(format, writer)).init();
}
