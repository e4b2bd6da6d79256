use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use oscar_core::{
    create_authenticator, load_config, validate_config, Authenticator, Campus, ChatClient,
    EnrollmentService, Notifier, NullNotifier, PlatformNotifier, PlatformTicketGateway,
    SheetsRecordStore, TabCache, TicketGateway,
};

use oscar_server::api::create_router;
use oscar_server::scheduler::DailyScheduler;
use oscar_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("OSCAR_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully (oscar v{})", VERSION);
    info!("Auth method: {:?}", config.auth.method);

    // Compute config hash for the startup log
    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!("Config hash: {}", &config_hash[..16]);

    // Create authenticator
    let authenticator: Arc<dyn Authenticator> = Arc::from(
        create_authenticator(&config.auth).context("Failed to create authenticator")?,
    );
    info!("Using authenticator: {}", authenticator.method_name());

    // Chat platform client, if configured
    let chat: Option<Arc<ChatClient>> = match &config.chat {
        Some(chat_config) => {
            info!("Chat platform configured for guild {}", chat_config.guild_id);
            Some(Arc::new(ChatClient::new(chat_config.clone())))
        }
        None => {
            warn!("No chat platform configured: notifications, tickets, announcements and the daily scheduler are disabled");
            None
        }
    };

    // Notifier: platform-backed when chat is up, otherwise a null notifier
    // that reports every delivery as failed.
    let notifier: Arc<dyn Notifier> = match &chat {
        Some(chat) => Arc::new(PlatformNotifier::new(Arc::clone(chat))),
        None => Arc::new(NullNotifier::new()),
    };

    // Ticket gateway, staff roles come from the auth section
    let tickets: Option<Arc<dyn TicketGateway>> = chat.as_ref().map(|chat| {
        Arc::new(PlatformTicketGateway::new(
            Arc::clone(chat),
            config.auth.staff_role_ids.clone(),
        )) as Arc<dyn TicketGateway>
    });

    // Record store and enrollment workflow, if configured
    let enrollment: Option<Arc<EnrollmentService>> = match &config.roster {
        Some(roster_config) => {
            info!(
                "Record stores configured (student: {}, teacher: {})",
                roster_config.student_sheet_id, roster_config.teacher_sheet_id
            );
            let store = Arc::new(SheetsRecordStore::new(
                roster_config.clone(),
                TabCache::new(),
            ));
            Some(Arc::new(EnrollmentService::new(
                store,
                Arc::clone(&notifier),
            )))
        }
        None => {
            warn!("No record stores configured: the enrollment workflow is disabled");
            None
        }
    };

    // Campus tables
    let campus = Arc::new(Campus::open(&config.campus.data_dir));
    info!("Campus tables at {:?}", config.campus.data_dir);

    // Daily scheduler, when enabled and a chat platform exists
    let daily_scheduler = match (&chat, config.scheduler.enabled) {
        (Some(chat), true) => {
            let scheduler = Arc::new(DailyScheduler::new(
                config.scheduler.clone(),
                Arc::clone(chat),
                Arc::clone(&campus),
            ));
            scheduler.start();
            Some(scheduler)
        }
        (None, true) => {
            warn!("Scheduler enabled but no chat platform configured; not starting");
            None
        }
        _ => {
            info!("Daily scheduler disabled in config");
            None
        }
    };

    // Create app state
    let state = Arc::new(AppState::new(
        config.clone(),
        authenticator,
        enrollment,
        notifier,
        tickets,
        chat,
        campus,
    ));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Stop the scheduler if running
    if let Some(scheduler) = daily_scheduler {
        info!("Stopping daily scheduler...");
        scheduler.stop();
    }

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
