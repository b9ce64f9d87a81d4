//! Switch'd Server
//!
//! Axum server exposing one swap marketplace session over a JSON API.
//! Every request that touches the session goes through a single lock, so UI
//! events are handled one at a time and each runs to completion.

mod api;

use axum::{http::header, response::IntoResponse, routing::get, Router};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use switchd_core::blob::{BlobStore, FsBlobStore, SEED_IMAGE_DIR};
use switchd_core::config::{runtime_path, SwitchdConfig};
use switchd_core::session::{EventReply, Session, UiEvent};
use switchd_core::suggest;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;

/// Application state
pub(crate) struct ServerState {
    session: Mutex<Session>,
    blobs: Arc<dyn BlobStore>,
    /// Where `config.json` and uploaded blobs live
    runtime_dir: PathBuf,
}

impl ServerState {
    fn new(session: Session, blobs: Arc<dyn BlobStore>, runtime_dir: PathBuf) -> Self {
        Self {
            session: Mutex::new(session),
            blobs,
            runtime_dir,
        }
    }

    /// Run one UI event against the session
    async fn dispatch(&self, event: UiEvent) -> EventReply {
        self.session.lock().await.handle(event).await
    }
}

pub(crate) type SharedState = Arc<ServerState>;

#[derive(Parser, Clone)]
#[command(author, version, about = "Switch'd - secondhand swap marketplace")]
struct Args {
    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Clone)]
enum CliCommand {
    /// Start the Switch'd server (default)
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
    /// Create the runtime directory with a default config.json
    Init,
}

// === OpenAPI Definition ===

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Switch'd API",
        version = "1.0.0",
        description = "API for the Switch'd secondhand swap marketplace"
    ),
    paths(
        api::items::list_items,
        api::items::create_item,
        api::items::suggest_similar,
        api::items::reserve_item,
        api::items::list_reservations,
        api::profile::get_profile,
        api::profile::add_profile_item,
        api::profile::list_lockers,
        api::profile::list_community,
        api::checkout::get_cart,
        api::checkout::pay_card,
        api::checkout::pay_paypal,
        api::checkout::pay_credits,
        api::checkout::list_transactions,
        api::blobs::upload_blob,
        api::blobs::get_blob,
        api::config::get_config,
        api::config::update_config
    ),
    components(
        schemas(
            api::NoticeResponse,
            api::ErrorResponse,
            api::items::ItemResponse,
            api::items::ItemListResponse,
            api::items::NewItemRequest,
            api::items::ListingResponse,
            api::items::SuggestionResponse,
            api::items::ReservationResponse,
            api::items::ReserveResponse,
            api::items::ReservationListResponse,
            api::profile::ProfileResponse,
            api::profile::LockerResponse,
            api::profile::LockerListResponse,
            api::profile::CommunityMemberResponse,
            api::profile::CommunityResponse,
            api::checkout::CartLineResponse,
            api::checkout::CartResponse,
            api::checkout::CardPaymentRequest,
            api::checkout::PayPalPaymentRequest,
            api::checkout::TransactionResponse,
            api::checkout::PaymentResponse,
            api::checkout::TransactionListResponse,
            api::blobs::BlobResponse,
            api::config::ConfigBody,
            api::config::ConfigResponse,
            api::config::ConfigUpdateRequest
        )
    ),
    tags(
        (name = "items", description = "Catalog, suggestions and reservations"),
        (name = "profile", description = "User profile, lockers and community"),
        (name = "checkout", description = "Cart, payments and transactions"),
        (name = "blobs", description = "Listing images"),
        (name = "config", description = "Configuration management")
    )
)]
struct ApiDoc;

/// Serve OpenAPI spec as JSON
async fn serve_openapi() -> impl IntoResponse {
    let spec = ApiDoc::openapi().to_json().unwrap_or_default();
    ([(header::CONTENT_TYPE, "application/json")], spec)
}

// === Server Entry ===

fn build_router(state: SharedState) -> Router {
    Router::new()
        .nest("/api/v1/items", api::items::item_routes())
        .route("/api/v1/reservations", get(api::items::list_reservations))
        .nest("/api/v1/profile", api::profile::profile_routes())
        .route("/api/v1/lockers", get(api::profile::list_lockers))
        .route("/api/v1/community", get(api::profile::list_community))
        .nest("/api/v1/checkout", api::checkout::checkout_routes())
        .route("/api/v1/transactions", get(api::checkout::list_transactions))
        .nest("/api/v1/blobs", api::blobs::blob_routes())
        .route(
            "/api/v1/config",
            get(api::config::get_config).patch(api::config::update_config),
        )
        .route("/api/v1/openapi.json", get(serve_openapi))
        .with_state(state)
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Write a default config and a .gitignore for uploaded blobs
async fn init_runtime_dir(runtime_dir: &Path) -> anyhow::Result<()> {
    let config_path = SwitchdConfig::config_path(runtime_dir);
    if tokio::fs::try_exists(&config_path).await? {
        println!("Config already exists at {}", config_path.display());
    } else {
        SwitchdConfig::default().save(runtime_dir).await?;
        println!("Created: {}", config_path.display());
    }

    let gitignore = runtime_dir.join(".gitignore");
    if !tokio::fs::try_exists(&gitignore).await? {
        tokio::fs::write(&gitignore, "# Uploaded listing images\nblobs/\n").await?;
        println!("Created: {}", gitignore.display());
    }

    let images = runtime_dir.join(SEED_IMAGE_DIR);
    if !tokio::fs::try_exists(&images).await? {
        tokio::fs::create_dir_all(&images).await?;
        println!("Created: {}", images.display());
        println!("   Copy the demo images here so seeded listings can be displayed");
    }
    Ok(())
}

pub async fn run_server() -> anyhow::Result<()> {
    let args = Args::parse();
    let runtime_dir = runtime_path();

    let server_port = match args.command {
        Some(CliCommand::Init) => {
            println!("Initializing Switch'd in {}", runtime_dir.display());
            init_runtime_dir(&runtime_dir).await?;
            println!("\nRun `switchd serve` to start the server");
            return Ok(());
        }
        Some(CliCommand::Serve { port }) => port,
        None => 8080,
    };

    let config = SwitchdConfig::load(&runtime_dir).await;
    tracing::info!(
        provider = config.model.provider.display_name(),
        model = %config.model.model,
        runtime_dir = %runtime_dir.display(),
        "Loaded configuration"
    );

    let suggester = suggest::from_config(&config);
    let session = Session::seeded(config, suggester);
    let blobs: Arc<dyn BlobStore> = Arc::new(FsBlobStore::new(runtime_dir.clone()));
    let state: SharedState = Arc::new(ServerState::new(session, blobs, runtime_dir));

    let app = build_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], server_port));
    println!("Switch'd Server running at http://{}", addr);
    println!("   API v1 Routes:");
    println!("   Items:     /api/v1/items, /items/:id/suggest, /items/:id/reserve");
    println!("   Profile:   /api/v1/profile, /lockers, /community");
    println!("   Checkout:  /api/v1/checkout, /card, /paypal, /credits");
    println!("   Blobs:     /api/v1/blobs");
    println!("   Config:    /api/v1/config (GET, PATCH)");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    run_server().await
}
