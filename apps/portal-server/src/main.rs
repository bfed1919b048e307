// ============================================================================
// Portal Server
// File: apps/portal-server/src/main.rs
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use portal_api::{build_router, AppState};
use portal_core::repositories::{
    AuditLogRepository, EmployeeRepository, IdentityProvider, MessageRepository, ResetRequestRepository,
};
use portal_core::services::{
    AdminService, AuditTrail, AuthService, CountingSequencer, ProtocolGenerator, ProtocolSequencer,
    ReceiptRenderer, SubmissionService, TextReceiptRenderer,
};
use portal_core::DepartmentCatalogue;
use portal_infrastructure::{
    create_pool, InMemoryAuditLogRepository, InMemoryEmployeeRepository, InMemoryIdentityProvider,
    InMemoryMessageRepository, InMemoryResetRequestRepository, PgAuditLogRepository, PgDailySequencer,
    PdfReceiptRenderer, PgEmployeeRepository, PgIdentityProvider, PgMessageRepository, PgResetRequestRepository,
    XlsxExporter,
};
use portal_security::{JwtService, SessionStore};
use portal_shared::config::{AppConfig, ReceiptFormat, SequencerKind, StorageBackend};
use sqlx::PgPool;

struct Stores {
    employees: Arc<dyn EmployeeRepository>,
    messages: Arc<dyn MessageRepository>,
    logs: Arc<dyn AuditLogRepository>,
    resets: Arc<dyn ResetRequestRepository>,
    identity: Arc<dyn IdentityProvider>,
    sequencer: Arc<dyn ProtocolSequencer>,
    db: Option<PgPool>,
}

async fn postgres_stores(config: &AppConfig) -> Result<Stores> {
    let pool = create_pool(&config.database)
        .await
        .context("Failed to connect to PostgreSQL")?;
    info!("✅ Database connection established");

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    info!("✅ Migrations applied");

    let messages: Arc<dyn MessageRepository> = Arc::new(PgMessageRepository::new(pool.clone()));
    let sequencer: Arc<dyn ProtocolSequencer> = match config.protocol.sequencer {
        SequencerKind::Counting => Arc::new(CountingSequencer::new(messages.clone())),
        SequencerKind::Atomic => Arc::new(PgDailySequencer::new(pool.clone())),
    };

    Ok(Stores {
        employees: Arc::new(PgEmployeeRepository::new(pool.clone())),
        messages,
        logs: Arc::new(PgAuditLogRepository::new(pool.clone())),
        resets: Arc::new(PgResetRequestRepository::new(pool.clone())),
        identity: Arc::new(PgIdentityProvider::new(pool.clone())),
        sequencer,
        db: Some(pool),
    })
}

fn memory_stores(config: &AppConfig) -> Stores {
    if config.protocol.sequencer == SequencerKind::Atomic {
        warn!("Atomic sequencer needs PostgreSQL; using the counting sequencer");
    }
    let messages: Arc<dyn MessageRepository> = Arc::new(InMemoryMessageRepository::default());
    Stores {
        employees: Arc::new(InMemoryEmployeeRepository::default()),
        sequencer: Arc::new(CountingSequencer::new(messages.clone())),
        messages,
        logs: Arc::new(InMemoryAuditLogRepository::default()),
        resets: Arc::new(InMemoryResetRequestRepository::default()),
        identity: Arc::new(InMemoryIdentityProvider::default()),
        db: None,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let _guard = portal_shared::telemetry::init_telemetry()?;

    info!("🚀 Starting portal server...");

    let config = AppConfig::load().context("Failed to load configuration")?;
    info!("✅ Configuration loaded ({})", config.app.env);

    let stores = match config.storage.backend {
        StorageBackend::Postgres => postgres_stores(&config).await?,
        StorageBackend::Memory => {
            warn!("Running on in-memory stores; data is lost on restart");
            memory_stores(&config)
        }
    };

    let departments = DepartmentCatalogue::new(config.portal.departments.clone());
    let audit = AuditTrail::new(stores.logs.clone());

    let auth = Arc::new(AuthService::new(
        stores.identity.clone(),
        stores.employees.clone(),
        stores.resets.clone(),
        Arc::new(SessionStore::new()),
        JwtService::new(config.jwt.secret.clone(), config.jwt.access_token_expiry),
        config.jwt.access_token_expiry,
        audit.clone(),
        departments.clone(),
    ));
    let submissions = Arc::new(SubmissionService::new(
        stores.employees.clone(),
        stores.messages.clone(),
        ProtocolGenerator::new(stores.sequencer.clone()),
        audit.clone(),
        departments.clone(),
    ));
    let admin = Arc::new(AdminService::new(
        stores.employees.clone(),
        stores.messages.clone(),
        stores.logs.clone(),
        stores.resets.clone(),
        stores.identity.clone(),
        Arc::new(XlsxExporter::new()),
        audit,
        departments.clone(),
        config.portal.hard_delete_employees,
    ));

    if let Some(bootstrap) = &config.portal.bootstrap_admin {
        auth.ensure_admin(
            &bootstrap.email,
            &bootstrap.password,
            &bootstrap.full_name,
            &bootstrap.department,
        )
        .await
        .context("Failed to provision bootstrap admin")?;
        info!("✅ Bootstrap admin ready");
    }

    let receipts: Arc<dyn ReceiptRenderer> = match config.portal.receipt_format {
        ReceiptFormat::Pdf => Arc::new(PdfReceiptRenderer::new()),
        ReceiptFormat::Text => Arc::new(TextReceiptRenderer),
    };
    if config.app.trust_proxy_headers {
        info!("Client addresses are taken from forwarding headers");
    }

    let state = AppState {
        auth,
        submissions,
        admin,
        receipts,
        departments,
        db: stores.db,
        trust_proxy_headers: config.app.trust_proxy_headers,
    };
    let app = build_router(state);

    let addr = SocketAddr::from((
        config.app.host.parse::<std::net::IpAddr>()?,
        config.app.port,
    ));
    info!("🎯 Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
