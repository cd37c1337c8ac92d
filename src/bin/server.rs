use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use pallet_packer::config::{SearchConfig, validate_dimensions};
use pallet_packer::geometry::Footprint;
use pallet_packer::optimize::{auto_optimize_box_count, solve_with_scaling};
use pallet_packer::solver::Solver;
use pallet_packer::types::{
    BoxDims, Pallet, Placement, Solution, StrategyKind, deserialize_optional_count,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Deserialize, Serialize)]
struct ArrangeRequest {
    #[serde(rename = "box")]
    box_dims: BoxDims,
    #[serde(default, deserialize_with = "deserialize_optional_count")]
    count: Option<usize>,
    #[serde(default)]
    pallet: Option<Pallet>,
    #[serde(default)]
    allow_scaling: bool,
    #[serde(default)]
    config: SearchConfig,
}

#[derive(Serialize)]
struct ArrangeResponse {
    rows: usize,
    columns: usize,
    count: usize,
    grid: Vec<String>,
    strategy: StrategyKind,
    pallet: Pallet,
    footprint: Footprint,
    efficiency: f64,
    placements: Vec<Placement>,
}

impl From<&Solution> for ArrangeResponse {
    fn from(solution: &Solution) -> Self {
        Self {
            rows: solution.rows(),
            columns: solution.columns(),
            count: solution.count(),
            grid: solution.arrangement.row_strings(),
            strategy: solution.strategy,
            pallet: solution.pallet,
            footprint: solution.footprint(),
            efficiency: solution.efficiency(),
            placements: solution.placements(),
        }
    }
}

/// Checks the request and returns the normalized box and the pallet to use.
fn validate_request(req: &ArrangeRequest) -> Result<(BoxDims, Pallet), String> {
    req.config.validate()?;

    let max = req.config.max_dimension;
    validate_dimensions(req.box_dims.width, req.box_dims.length, max)
        .map_err(|e| format!("box {}", e))?;

    let pallet = req.pallet.unwrap_or_default();
    validate_dimensions(pallet.width, pallet.length, max).map_err(|e| format!("pallet {}", e))?;

    if req.count == Some(0) {
        return Err("count must be at least 1".to_string());
    }

    Ok((BoxDims::new(req.box_dims.width, req.box_dims.length), pallet))
}

fn arrange_boxes(req: &ArrangeRequest) -> Result<Solution, (StatusCode, String)> {
    let (box_dims, pallet) = validate_request(req).map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    let solution = match req.count {
        Some(count) if req.allow_scaling => {
            solve_with_scaling(&box_dims, count, &pallet, &req.config)
        }
        Some(count) => Solver::new(box_dims, pallet, req.config).solve(count),
        None => auto_optimize_box_count(&Solver::new(box_dims, pallet, req.config)),
    };

    solution.ok_or_else(|| {
        let what = match req.count {
            Some(count) => format!("{} boxes", count),
            None => "any number of boxes".to_string(),
        };
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("no arrangement of {} of {} fits on pallet {}", what, box_dims, pallet),
        )
    })
}

async fn arrange(
    Json(req): Json<ArrangeRequest>,
) -> Result<Json<ArrangeResponse>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /arrange"
    );

    let solution = arrange_boxes(&req)?;
    tracing::info!(
        strategy = %solution.strategy,
        shape = %solution.arrangement.shape(),
        count = solution.count(),
        "arranged"
    );

    Ok(Json(ArrangeResponse::from(&solution)))
}

#[tokio::main]
async fn main() {
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("development.log")
        .expect("failed to open development.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/arrange", post(arrange))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind listener");
    eprintln!("Listening on {addr}");
    axum::serve(listener, app).await.expect("server error");
}
