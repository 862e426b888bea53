use axum::http::HeaderValue;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use phishguard_core::{api_routes, app_config, AppState, Classifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "phishguard_core=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = app_config::config();
    let bind_address = format!("{}:{}", config.bind_address, config.port);
    info!(
        "Starting PhishGuard API on {} ({})",
        bind_address, config.environment
    );

    // Load the classifier artifact. Without it there is nothing to serve:
    // the process must not start accepting requests.
    let classifier = match Classifier::load(&config.model_path) {
        Ok(classifier) => {
            info!(
                "Classifier ready: {} trees, {} classes, probability={}",
                classifier.tree_count(),
                classifier.class_count(),
                classifier.supports_probability()
            );
            Arc::new(classifier)
        },
        Err(e) => {
            error!("Failed to load classifier from {}: {}", config.model_path, e);
            return Err(e.into());
        },
    };

    let state = AppState::new(Arc::new(config.clone()), classifier);

    let app = Router::new()
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_allowed_origins))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Listening on {}", bind_address);
    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
