//! Gavel administrative CLI.

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gavel")]
#[command(about = "Gavel online judge admin CLI", long_about = None)]
struct Cli {
    /// Path to the KDL settings file
    #[arg(long, env = "GAVEL_CONFIG", default_value = "gavel.kdl")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and administer submissions
    Submissions {
        #[command(subcommand)]
        command: SubmissionCommands,
    },
    /// Inspect problems
    Problems {
        #[command(subcommand)]
        command: ProblemCommands,
    },
    /// Low-level table maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Subcommand)]
enum SubmissionCommands {
    /// List submissions ordered by id
    List {
        /// Maximum number of rows to show
        #[arg(long)]
        limit: Option<u64>,
        /// Rows to skip
        #[arg(long)]
        offset: Option<u64>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one submission
    Show {
        /// Submission ID
        id: i64,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Count submissions
    Count,
    /// Reset a submission to WAITING so it can be judged again
    Rejudge {
        /// Submission ID
        id: i64,
    },
    /// Delete a submission record
    Delete {
        /// Submission ID
        id: i64,
    },
}

#[derive(Subcommand)]
enum ProblemCommands {
    /// List problems ordered by id
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum DbCommands {
    /// Row count of a table
    Size {
        /// Table name
        table: String,
    },
    /// Remove every row and reset identity generation. Irreversible.
    Truncate {
        /// Table name
        table: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let settings = gavel_config::load_settings(&cli.config)?;
    let pool =
        gavel_db::connect(&settings.database.url(), settings.database.max_connections).await?;
    let db = gavel_db::Database::new(pool);

    match cli.command {
        Commands::Submissions { command } => match command {
            SubmissionCommands::List {
                limit,
                offset,
                json,
            } => {
                commands::submissions::list(&db, limit, offset, json).await?;
            }
            SubmissionCommands::Show { id, json } => {
                commands::submissions::show(&db, id, json).await?;
            }
            SubmissionCommands::Count => {
                commands::submissions::count(&db).await?;
            }
            SubmissionCommands::Rejudge { id } => {
                commands::submissions::rejudge(&db, id).await?;
            }
            SubmissionCommands::Delete { id } => {
                commands::submissions::delete(&db, id).await?;
            }
        },
        Commands::Problems { command } => match command {
            ProblemCommands::List { json } => {
                commands::problems::list(&db, json).await?;
            }
        },
        Commands::Db { command } => match command {
            DbCommands::Size { table } => {
                commands::db::size(&db, &table).await?;
            }
            DbCommands::Truncate { table } => {
                commands::db::truncate(&db, &table).await?;
            }
        },
    }

    Ok(())
}
