use axum::http::HeaderValue;
use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

mod api;
mod auth;
mod config;
mod database;
mod error;
mod handlers;
mod integrations;
mod layout;
mod middleware;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, PLAYERDECK_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = crate::config::config();
    tracing::info!("Starting PlayerDeck API in {:?} mode", config.environment);

    if crate::is_production!() && config.security.jwt_secret.is_empty() {
        tracing::warn!("PLAYERDECK_JWT_SECRET is not set; every protected route will return 401");
    }

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("PLAYERDECK_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(4000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind {}: {}", bind_addr, e));

    println!("🎮 PlayerDeck API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("Server failed to start");
}

/// Build the application router
fn app() -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(catalog_routes())
        .merge(profile_routes())
        .merge(layout_routes())
        .merge(integration_routes())
        .merge(account_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer()),
        )
}

/// Catalog reads (public, static data)
fn catalog_routes() -> Router {
    use handlers::public::catalog;

    Router::new()
        .route("/api/catalog/blocks", get(catalog::blocks))
        .route("/api/catalog/themes", get(catalog::themes))
}

/// Public profile and page reads, keyed by username
fn profile_routes() -> Router {
    use handlers::public::{pages, profiles};

    Router::new()
        .route("/api/profiles/:username", get(profiles::get))
        .route("/api/pages/:username", get(pages::get))
}

/// Layout operations. Dry-run validation, preview, and the render-side
/// resolved read are public; everything that touches the stored document
/// requires a token for the owning profile.
fn layout_routes() -> Router {
    use axum::routing::post;
    use handlers::{protected, public};

    let open = Router::new()
        .route("/api/layouts/validate", post(public::layout::validate))
        .route("/api/layouts/preview", post(public::layout::preview))
        .route("/api/layouts/:profile_id/resolved", get(public::layout::resolved));

    let owned = Router::new()
        .route(
            "/api/layouts/:profile_id",
            get(protected::layout::get)
                .put(protected::layout::put)
                .delete(protected::layout::delete),
        )
        .route("/api/layouts/:profile_id/reorder", post(protected::layout::reorder))
        .route_layer(axum::middleware::from_fn(middleware::jwt_auth_middleware));

    open.merge(owned)
}

/// Third-party search proxies for the editor pickers
fn integration_routes() -> Router {
    use handlers::public::integrations;

    Router::new()
        .route("/api/integrations/music/search", get(integrations::music_search))
        .route("/api/integrations/games/search", get(integrations::games_search))
}

/// Owner-scoped profile editing. The token names the profile, so the
/// path carries no id.
fn account_routes() -> Router {
    use axum::routing::put;
    use handlers::protected::profile;

    Router::new()
        .route("/api/profile", put(profile::put))
        .route_layer(axum::middleware::from_fn(middleware::jwt_auth_middleware))
}

fn cors_layer() -> CorsLayer {
    let security = &crate::config::config().security;
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if crate::is_development!() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// GET / - Service info
async fn root() -> axum::Json<Value> {
    axum::Json(json!({
        "name": "PlayerDeck API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Customizable gaming profile pages",
        "endpoints": {
            "health": "/health",
            "catalog": "/api/catalog/{blocks,themes}",
            "profiles": "/api/profiles/:username",
            "pages": "/api/pages/:username",
            "layouts": "/api/layouts/:profile_id",
            "validate": "/api/layouts/validate",
            "preview": "/api/layouts/preview"
        }
    }))
}

/// GET /health - Service health including database connectivity
async fn health() -> (axum::http::StatusCode, axum::Json<Value>) {
    let db_healthy = database::manager::DatabaseManager::health_check().await.is_ok();

    let status = if db_healthy { "ok" } else { "degraded" };
    let code = if db_healthy {
        axum::http::StatusCode::OK
    } else {
        axum::http::StatusCode::SERVICE_UNAVAILABLE
    };

    (
        code,
        axum::Json(json!({
            "status": status,
            "database": db_healthy,
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}
