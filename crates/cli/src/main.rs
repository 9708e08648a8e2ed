mod config;
mod console;

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};

use sdrdb::SdrdbClient;

#[derive(Parser)]
#[command(name = "sdrdb")]
#[command(about = "Command-line client for the SDRDB similarity-search database")]
#[command(version)]
struct Cli {
    /// Server endpoint (unix://PATH or HOST:PORT); overrides the config file
    #[arg(short = 'b', long, global = true)]
    bind: Option<String>,

    /// Per-phase network timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a database with the given trait width
    #[command(display_order = 1)]
    Create { db: String, width: u64 },

    /// Drop a database
    #[command(display_order = 2)]
    Drop { db: String },

    /// Empty a database
    #[command(display_order = 3)]
    Clear { db: String },

    /// Set a new trait width for a database
    #[command(display_order = 4)]
    Resize { db: String, width: u64 },

    /// Store a new concept, printing its id
    #[command(display_order = 5)]
    Put { db: String, traits: Vec<u64> },

    /// Replace the traits of a stored concept
    #[command(display_order = 6)]
    Update {
        db: String,
        concept: u64,
        traits: Vec<u64>,
    },

    /// Run a query
    #[command(display_order = 7)]
    Query {
        #[command(subcommand)]
        query: QueryCommands,
    },

    /// Interactive console
    #[command(display_order = 10)]
    Console,

    /// Configuration management
    #[command(display_order = 11)]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum QueryCommands {
    /// Similarity score between two stored concepts
    Similarity {
        db: String,
        concept_a: u64,
        concept_b: u64,

        /// Weight trait overlap by usage
        #[arg(short, long)]
        weighted: bool,
    },

    /// Similarity between a concept and the union of others
    Usimilarity {
        db: String,
        concept: u64,
        others: Vec<u64>,

        /// Weight trait overlap by usage
        #[arg(short, long)]
        weighted: bool,
    },

    /// The closest concepts to a stored concept, best match first
    Closest {
        db: String,
        amount: u64,
        concept: u64,

        /// Weight trait overlap by usage
        #[arg(short, long)]
        weighted: bool,
    },

    /// Ids of concepts carrying the given traits
    Matching { db: String, traits: Vec<u64> },

    /// Like matching, capped at the given amount
    Matchingx {
        db: String,
        amount: u64,
        traits: Vec<u64>,

        /// Weight trait overlap by usage
        #[arg(short, long)]
        weighted: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// Show configuration file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Default to WARN level for quiet CLI output
    // Use RUST_LOG=info or RUST_LOG=debug for verbose output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    // Config management needs no server connection
    if let Commands::Config { action } = &cli.command {
        return handle_config(action);
    }

    let endpoint = config::resolve_endpoint(cli.bind.as_deref())?;
    let timeout = cli.timeout_ms.map(Duration::from_millis);

    match cli.command {
        Commands::Console => {
            let mut client = wire::Client::new(endpoint);
            if let Some(limit) = timeout {
                client = client.with_timeout(limit);
            }
            console::run(client).await
        }
        command => {
            let mut client = SdrdbClient::new(endpoint);
            if let Some(limit) = timeout {
                client = client.with_timeout(limit);
            }
            run_command(&client, command).await
        }
    }
}

async fn run_command(client: &SdrdbClient, command: Commands) -> Result<()> {
    match command {
        Commands::Create { db, width } => {
            println!("{}", client.create_database(&db, width).await?);
        }
        Commands::Drop { db } => {
            println!("{}", client.drop_database(&db).await?);
        }
        Commands::Clear { db } => {
            println!("{}", client.clear_database(&db).await?);
        }
        Commands::Resize { db, width } => {
            println!("{}", client.resize_database(&db, width).await?);
        }
        Commands::Put { db, traits } => {
            println!("{}", client.put(&db, &traits).await?);
        }
        Commands::Update { db, concept, traits } => {
            println!("{}", client.update(&db, concept, &traits).await?);
        }
        Commands::Query { query } => run_query(client, query).await?,
        Commands::Console | Commands::Config { .. } => unreachable!("handled in main"),
    }
    Ok(())
}

async fn run_query(client: &SdrdbClient, query: QueryCommands) -> Result<()> {
    match query {
        QueryCommands::Similarity { db, concept_a, concept_b, weighted } => {
            let score = if weighted {
                client.query_similarity_weighted(&db, concept_a, concept_b).await?
            } else {
                client.query_similarity(&db, concept_a, concept_b).await?
            };
            println!("{}", score);
        }
        QueryCommands::Usimilarity { db, concept, others, weighted } => {
            let score = if weighted {
                client.query_usimilarity_weighted(&db, concept, &others).await?
            } else {
                client.query_usimilarity(&db, concept, &others).await?
            };
            println!("{}", score);
        }
        QueryCommands::Closest { db, amount, concept, weighted } => {
            let ranked = if weighted {
                client.query_closest_weighted(&db, amount, concept).await?
            } else {
                client.query_closest(&db, amount, concept).await?
            };
            for (id, score) in ranked {
                println!("{}:{}", id, score);
            }
        }
        QueryCommands::Matching { db, traits } => {
            for id in client.query_matching(&db, &traits).await? {
                println!("{}", id);
            }
        }
        QueryCommands::Matchingx { db, amount, traits, weighted } => {
            let ids = if weighted {
                client.query_matchingx_weighted(&db, amount, &traits).await?
            } else {
                client.query_matchingx(&db, amount, &traits).await?
            };
            for id in ids {
                println!("{}", id);
            }
        }
    }
    Ok(())
}

fn handle_config(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let cfg = config::load_config()?;
            let toml_str = toml::to_string_pretty(&cfg)?;
            print!("{}", toml_str);
            Ok(())
        }
        ConfigAction::Get { key } => {
            let cfg = config::load_config()?;
            match config::get_config_value(&cfg, key) {
                Some(value) => println!("{}", value),
                None => {
                    if key == "server.endpoint" {
                        println!("(not set)");
                    } else {
                        anyhow::bail!("Unknown config key: {}", key);
                    }
                }
            }
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            let mut cfg = config::load_config()?;
            config::set_config_value(&mut cfg, key, value)?;
            config::save_config(&cfg)?;
            println!("Set {} = {}", key, value);
            Ok(())
        }
        ConfigAction::Path => {
            let path = config::get_config_file()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}
