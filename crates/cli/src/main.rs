//! School portal CLI.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (falls back to the demo accounts when the API is down)
//! school-portal login -u ada -p student123 -r student
//!
//! # Open a view through the access guard
//! school-portal open reports
//!
//! # Load data into a view
//! school-portal timetable --class 2
//! school-portal notes --class 2 --subject 1
//!
//! # Admin actions
//! school-portal create-student --name "Ada Obi" --username aobi --password s3cret --class 2
//! school-portal pay --student "Ada Obi" --amount 25000 --email parent@example.com
//! ```
//!
//! The session persists in `PORTAL_STATE_FILE` between invocations. Every
//! command logs the page state it produced.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use school_portal::PortalConfig;
use school_portal_core::{Email, Role, View};

mod commands;

#[derive(Parser)]
#[command(name = "school-portal")]
#[command(author, version, about = "School portal command-line client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,

        /// Role (`admin`, `teacher`, `student`, `parent`)
        #[arg(short, long)]
        role: Role,
    },
    /// Sign out
    Logout,
    /// Show the current session
    Whoami,
    /// Open a view
    Open { view: View },
    /// Show the navigation menu for the current session
    Menu,
    /// Load the class list
    Classes,
    /// Load the subject list
    Subjects,
    /// Show a class timetable
    Timetable {
        #[arg(long = "class")]
        class_id: String,
    },
    /// List assignments
    Assignments,
    /// List lesson notes for a class and subject
    Notes {
        #[arg(long = "class")]
        class_id: String,

        #[arg(long = "subject")]
        subject_id: String,
    },
    /// List CBT exams
    Cbt,
    /// List report cards
    Reports,
    /// Create a teacher account (admin only)
    CreateTeacher {
        #[arg(long)]
        name: String,

        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,

        #[arg(long = "class")]
        class_id: Option<String>,

        /// Subject taught; repeat for several
        #[arg(long = "subject")]
        subject_ids: Vec<String>,
    },
    /// Create a student account (admin only)
    CreateStudent {
        #[arg(long)]
        name: String,

        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,

        #[arg(long = "class")]
        class_id: Option<String>,
    },
    /// Start a school fee payment
    Pay {
        #[arg(long)]
        student: String,

        #[arg(long)]
        amount: Decimal,

        /// Receipt address
        #[arg(long)]
        email: Email,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match PortalConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(false);
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };
    init_tracing(config.log_json);

    if let Err(e) = run(cli, &config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cli: Cli, config: &PortalConfig) -> Result<(), commands::CommandError> {
    let mut ctx = commands::Context::open(config)?;

    match cli.command {
        Commands::Login {
            username,
            password,
            role,
        } => commands::session::login(&mut ctx, username, password, role).await?,
        Commands::Logout => commands::session::logout(&mut ctx)?,
        Commands::Whoami => commands::session::whoami(&ctx),
        Commands::Open { view } => commands::session::open(&ctx, view),
        Commands::Menu => commands::session::menu(&ctx),
        Commands::Classes => commands::data::classes(&ctx).await,
        Commands::Subjects => commands::data::subjects(&ctx).await,
        Commands::Timetable { class_id } => commands::data::timetable(&ctx, class_id.into()).await,
        Commands::Assignments => commands::data::assignments(&ctx).await,
        Commands::Notes {
            class_id,
            subject_id,
        } => commands::data::notes(&ctx, class_id.into(), subject_id.into()).await,
        Commands::Cbt => commands::data::cbts(&ctx).await,
        Commands::Reports => commands::data::reports(&ctx).await,
        Commands::CreateTeacher {
            name,
            username,
            password,
            class_id,
            subject_ids,
        } => {
            commands::admin::create_teacher(
                &ctx,
                name,
                username,
                password,
                class_id.map(Into::into),
                subject_ids.into_iter().map(Into::into).collect(),
            )
            .await?;
        }
        Commands::CreateStudent {
            name,
            username,
            password,
            class_id,
        } => {
            commands::admin::create_student(&ctx, name, username, password, class_id.map(Into::into))
                .await?;
        }
        Commands::Pay {
            student,
            amount,
            email,
        } => commands::admin::pay(&ctx, student, amount, email).await?,
    }
    Ok(())
}
