use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use axum::{
    extract::{Multipart, State},
    http::{Response, StatusCode},
    routing::{get, post},
    Router,
};
use clap::{Parser, Subcommand};
use draft::{build_draft_pool, DraftConfig, DraftTable};
use rand::{rngs::StdRng, SeedableRng};
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};
use units::{Catalog, CatalogError};

mod draft;
mod units;

#[derive(serde::Serialize)]
struct Resp {
    message: String,
    success: bool,
}

impl Resp {
    fn json<T: serde::Serialize>(body: &T, status: StatusCode) -> Response<String> {
        match serde_json::ser::to_string(body) {
            Ok(body) => {
                let mut resp = Response::new(body);
                *resp.status_mut() = status;
                resp
            }
            Err(e) => {
                let mut resp = Response::new(format!("Failed to JSON encode response: {e}"));
                *resp.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                resp
            }
        }
    }

    fn axum<S: ToString>(message: S, status: StatusCode) -> Response<String> {
        Self::json(
            &Self {
                message: message.to_string(),
                success: status == StatusCode::OK,
            },
            status,
        )
    }

    fn e500<S: ToString>(message: S) -> Response<String> {
        Self::axum(message, StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn e422<S: ToString>(message: S) -> Response<String> {
        Self::axum(message, StatusCode::UNPROCESSABLE_ENTITY)
    }
}

async fn draft_handler(
    State(catalog): State<Arc<Catalog>>,
    data: Multipart,
) -> axum::http::Response<String> {
    draft::handlers::handle_draft_request(catalog, data).await
}

async fn expansions_handler(State(catalog): State<Arc<Catalog>>) -> axum::http::Response<String> {
    draft::handlers::handle_expansions_request(catalog).await
}

fn router(catalog: Arc<Catalog>) -> Router {
    Router::new()
        .route("/api/draft", post(draft_handler))
        .route("/api/expansions", get(expansions_handler))
        .with_state(catalog)
}

/// Mythic Battles draft pool generator
#[derive(Parser, Debug)]
#[command(name = "mythicdraft")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Maximum level of log messages, written to stderr
    #[arg(long, default_value = "info", global = true)]
    log_level: tracing::Level,

    /// JSON unit catalog to add to the built-in one. Expansions with the same
    /// name replace the built-in expansion.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Roll a single draft pool and print it as a table
    Roll {
        /// Expansion to draft from, may be repeated (default: all)
        #[arg(short, long = "expansion")]
        expansions: Vec<String>,

        /// Total cost of monsters, heroes and troops
        #[arg(short, long, default_value = "40")]
        draft_size: u32,

        /// Number of gods
        #[arg(short, long, default_value = "4")]
        gods: usize,

        /// Number of titans
        #[arg(short, long, default_value = "2")]
        titans: usize,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Print the pool as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Serve the draft API and a static front end
    Serve {
        /// Directory of static files to serve
        content: PathBuf,

        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

async fn load_unit_catalog(custom: Option<&Path>) -> Result<Catalog, CatalogError> {
    let mut catalog = Catalog::builtin()?;
    if let Some(path) = custom {
        catalog.merge(units::catalog::load_catalog(path).await?);
    }
    tracing::debug!(
        "Unit catalog ready with {} expansions and {} units.",
        catalog.names().len(),
        catalog.size()
    );
    Ok(catalog)
}

fn roll(
    catalog: &Catalog,
    expansions: &[String],
    config: &DraftConfig,
    seed: Option<u64>,
    json: bool,
) -> ExitCode {
    let units = if expansions.is_empty() {
        catalog.all_units()
    } else {
        match catalog.units(expansions) {
            Ok(units) => units,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        }
    };

    let seed = seed.unwrap_or_else(rand::random);
    tracing::info!("Rolling draft with seed {seed}.");

    let table = match build_draft_pool(&units, config, &mut StdRng::seed_from_u64(seed)) {
        Ok(pool) => DraftTable::new(pool),
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if json {
        match serde_json::to_string_pretty(&table) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Failed to JSON encode draft: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{table}");
    }
    ExitCode::SUCCESS
}

async fn serve(catalog: Catalog, content: PathBuf, port: u16) -> ExitCode {
    let app = router(Arc::new(catalog))
        .fallback_service(ServeDir::new(content).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http());

    let listener = match TcpListener::bind(format!("0.0.0.0:{port}")).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("Failed to open port {port}: {e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("Listening on port {port}.");

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Closed due to error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    let catalog = match load_unit_catalog(args.catalog.as_deref()).await {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Failed to load unit catalog: {e}");
            return ExitCode::FAILURE;
        }
    };

    match args.command {
        Commands::Roll {
            expansions,
            draft_size,
            gods,
            titans,
            seed,
            json,
        } => {
            let config = DraftConfig {
                draft_size,
                gods,
                titans,
            };
            roll(&catalog, &expansions, &config, seed, json)
        }
        Commands::Serve { content, port } => serve(catalog, content, port).await,
    }
}
