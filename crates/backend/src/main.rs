pub mod domain;
pub mod handlers;
pub mod shared;
pub mod system;
pub mod usecases;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::http::{header, Method};
    use axum::middleware;
    use axum::{
        routing::{get, post},
        Router,
    };
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};

    system::tracing::initialize()?;

    let config = shared::config::load_config()?;
    let db_path = shared::config::get_database_path(&config)?;
    shared::config::set_config(config)?;

    shared::data::db::initialize_database(db_path.to_str())
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;

    system::initialization::apply_system_migration().await?;
    system::initialization::ensure_admin_user_exists().await?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // SYSTEM AUTH ROUTES (PUBLIC)
        // ========================================
        .route(
            "/api/system/auth/login",
            post(system::handlers::auth::login),
        )
        .route(
            "/api/system/auth/refresh",
            post(system::handlers::auth::refresh),
        )
        .route(
            "/api/system/auth/logout",
            post(system::handlers::auth::logout),
        )
        .route(
            "/api/system/auth/me",
            get(system::handlers::auth::current_user)
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        // System users management (admin only)
        .route(
            "/api/system/users",
            get(system::handlers::users::list)
                .post(system::handlers::users::create)
                .layer(middleware::from_fn(system::auth::middleware::require_admin)),
        )
        .route(
            "/api/system/users/:id",
            get(system::handlers::users::get_by_id)
                .put(system::handlers::users::update)
                .delete(system::handlers::users::delete)
                .layer(middleware::from_fn(system::auth::middleware::require_admin)),
        )
        .route(
            "/api/system/users/:id/change-password",
            post(system::handlers::users::change_password)
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        // ========================================
        // PROPERTY ROUTES
        // ========================================
        // Reads are open to any authenticated user; writes need agent or
        // admin. Same path twice merges the method routers.
        .route(
            "/api/properties",
            get(handlers::a001_property::list_all)
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        .route(
            "/api/properties",
            post(handlers::a001_property::upsert)
                .layer(middleware::from_fn(system::auth::middleware::require_agent)),
        )
        .route(
            "/api/properties/:id",
            get(handlers::a001_property::get_by_id)
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        .route(
            "/api/properties/:id",
            axum::routing::delete(handlers::a001_property::delete)
                .layer(middleware::from_fn(system::auth::middleware::require_agent)),
        )
        .route(
            "/api/properties/:id/status",
            get(handlers::a001_property::get_status)
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        .route(
            "/api/properties/:id/status",
            axum::routing::put(handlers::a001_property::set_status)
                .layer(middleware::from_fn(system::auth::middleware::require_agent)),
        )
        // ========================================
        // IMPORT ROUTES (agent or admin)
        // ========================================
        .route(
            "/api/import/parse",
            post(handlers::u501_import::parse)
                .layer(middleware::from_fn(system::auth::middleware::require_agent)),
        )
        .route(
            "/api/import/submit",
            post(handlers::u501_import::submit)
                .layer(middleware::from_fn(system::auth::middleware::require_agent)),
        )
        .route(
            "/api/import/template",
            get(handlers::u501_import::template)
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        // ========================================
        // SYNC ROUTES
        // ========================================
        // Trigger authenticates with the shared secret header, not JWT
        .route("/api/sync/trigger", post(handlers::u502_sync::trigger))
        .route(
            "/api/sync/status",
            get(handlers::u502_sync::status)
                .layer(middleware::from_fn(system::auth::middleware::require_agent)),
        )
        .route(
            "/api/sync/sessions",
            get(handlers::a002_sync_session::list_recent)
                .layer(middleware::from_fn(system::auth::middleware::require_agent)),
        )
        .route(
            "/api/sync/sessions/:id",
            get(handlers::a002_sync_session::get_by_id)
                .layer(middleware::from_fn(system::auth::middleware::require_agent)),
        )
        // ========================================
        // LOG ROUTES (admin only)
        // ========================================
        .route(
            "/api/logs",
            get(handlers::logs::list_all)
                .post(handlers::logs::create)
                .delete(handlers::logs::clear_all)
                .layer(middleware::from_fn(system::auth::middleware::require_admin)),
        )
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
        .layer(cors);

    let addr: SocketAddr = ([0, 0, 0, 0], 3000).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port 3000 is already in use. Please ensure no other process is using this port."
                );
            } else {
                tracing::error!("Failed to bind to port 3000. Error: {}", e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
