use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use pallet_core::{
    render_svg, MultiItemRequest, MultiItemResult, Optimizer, OptimizerError, OptimizerResult,
    SingleItemRequest, Tariff,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_TARIFF: &str = "data/tariff.yaml";
const DEFAULT_ADDR: &str = "0.0.0.0:3000";

type SharedTariff = Arc<Tariff>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load tariff
    let tariff_path = std::env::var("PALLET_TARIFF")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_TARIFF));
    let tariff = Tariff::from_path(&tariff_path)?;
    info!(
        "Loaded tariff from {} with {} pallet types",
        tariff_path.display(),
        tariff.pallets.len()
    );

    // Build application
    let app = Router::new()
        .route("/api/health", get(health_check))
        .route("/api/optimize", post(optimize))
        .route("/api/optimize/multi", post(optimize_multi))
        .route("/api/generate/svg", post(generate_svg))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(tariff));

    // Start server
    let addr = std::env::var("PALLET_API_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("API server listening on http://{}", addr);
    info!("Try: curl http://localhost:3000/api/health");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "pallet-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Ranks pallet types for a single item
async fn optimize(
    State(tariff): State<SharedTariff>,
    Json(request): Json<SingleItemRequest>,
) -> Result<Json<OptimizerResult>, AppError> {
    info!("Received single-item request for '{}'", request.item.id);

    let optimizer = Optimizer::new(&tariff, request.context)?;
    let result = optimizer.optimize(&request.item)?;

    match &result.recommended {
        Some(quote) => info!(
            "Recommended {} at {} gross, {} rejected",
            quote.pallet.id,
            quote.price.gross_total,
            result.rejected.len()
        ),
        None => info!("No pallet fits, {} rejected", result.rejected.len()),
    }

    Ok(Json(result))
}

/// Spreads several items over pallets
async fn optimize_multi(
    State(tariff): State<SharedTariff>,
    Json(request): Json<MultiItemRequest>,
) -> Result<Json<MultiItemResult>, AppError> {
    info!("Received multi-item request with {} items", request.items.len());

    let optimizer = Optimizer::new(&tariff, request.context)?;
    let result = optimizer.optimize_multi_item(&request.items)?;

    info!(
        "Allocation complete: {} pallets, {} unallocated, {} gross",
        result.pallet_count,
        result.unallocated.len(),
        result.total_gross
    );

    Ok(Json(result))
}

/// Generate SVG visualization
async fn generate_svg(Json(result): Json<MultiItemResult>) -> Result<Response, AppError> {
    info!("Generating SVG for {} pallets", result.allocations.len());

    let svg = render_svg(&result).map_err(anyhow::Error::from)?;

    Ok((StatusCode::OK, [("Content-Type", "image/svg+xml")], svg).into_response())
}

/// Application error type
struct AppError(anyhow::Error);

impl From<OptimizerError> for AppError {
    fn from(err: OptimizerError) -> Self {
        AppError(err.into())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Request error: {}", self.0);

        let status = match self.0.downcast_ref::<OptimizerError>() {
            Some(OptimizerError::InvalidInput(_)) | Some(OptimizerError::EmptyCatalogue) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status,
            Json(json!({
                "error": self.0.to_string(),
            })),
        )
            .into_response()
    }
}
