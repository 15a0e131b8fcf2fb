use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use passvault::cli::commands::add::AddArgs;
use passvault::cli::commands::edit::EditArgs;
use passvault::cli::{Cli, Commands};

/// Environment variable holding the log filter (e.g. `debug`).
const LOG_ENV: &str = "PASSVAULT_LOG";

/// Log to stderr so stdout stays clean for command output.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .compact(),
        )
        .with(filter)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => passvault::cli::commands::init::execute(&cli),
        Commands::Add {
            ref name,
            ref email,
            ref mobile,
            ref username,
            ref password,
            ref description,
        } => passvault::cli::commands::add::execute(
            &cli,
            &AddArgs {
                name,
                email: email.as_deref(),
                mobile: mobile.as_deref(),
                username: username.as_deref(),
                password: password.as_deref(),
                description,
            },
        ),
        Commands::List { show_passwords } => {
            passvault::cli::commands::list::execute(&cli, show_passwords)
        }
        Commands::Show { id } => passvault::cli::commands::show::execute(&cli, id),
        Commands::Edit {
            id,
            ref name,
            ref email,
            ref mobile,
            ref username,
            ref password,
            new_password,
            ref description,
        } => passvault::cli::commands::edit::execute(
            &cli,
            id,
            &EditArgs {
                name: name.as_deref(),
                email: email.as_deref(),
                mobile: mobile.as_deref(),
                username: username.as_deref(),
                password: password.as_deref(),
                new_password,
                description: description.as_deref(),
            },
        ),
        Commands::Duplicate { id } => passvault::cli::commands::duplicate::execute(&cli, id),
        Commands::Delete { id, force } => {
            passvault::cli::commands::delete::execute(&cli, id, force)
        }
        Commands::Copy { id } => passvault::cli::commands::copy::execute(&cli, id),
        Commands::ChangePassword => passvault::cli::commands::change_password::execute(&cli),
        Commands::Generate { length } => passvault::cli::commands::generate::execute(length),
        Commands::Version => passvault::cli::commands::version::execute(),
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "command failed");
        passvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
