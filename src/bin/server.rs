//! Frame Solver HTTP Server

use axum::{
    extract::Json,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};

use frame_solver::prelude::*;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Debug, Deserialize)]
struct SolveRequest {
    structure: StructureData,
    #[serde(default)]
    options: Option<SolveOptions>,
}

#[derive(Debug, Deserialize)]
struct StructureData {
    #[serde(default)]
    name: Option<String>,
    nodes: Vec<NodeData>,
    materials: Vec<Material>,
    sections: Vec<Section>,
    elements: Vec<ElementData>,
}

#[derive(Debug, Deserialize)]
struct NodeData {
    id: String,
    x: f64,
    y: f64,
    #[serde(default)]
    constraint: Constraint,
}

fn rigid_link() -> Constraint {
    Constraint::NIL
}

#[derive(Debug, Deserialize)]
struct ElementData {
    id: String,
    start_node: String,
    end_node: String,
    material: String,
    section: String,
    #[serde(default = "rigid_link")]
    start_link: Constraint,
    #[serde(default = "rigid_link")]
    end_link: Constraint,
    #[serde(default)]
    concentrated_loads: Vec<ConcentratedLoadData>,
    #[serde(default)]
    distributed_loads: Vec<DistributedLoadData>,
}

#[derive(Debug, Deserialize)]
struct ConcentratedLoadData {
    term: String,
    #[serde(default)]
    local: bool,
    t: f64,
    value: f64,
}

#[derive(Debug, Deserialize)]
struct DistributedLoadData {
    term: String,
    #[serde(default)]
    local: bool,
    #[serde(default)]
    start_t: f64,
    start_value: f64,
    #[serde(default = "default_end_t")]
    end_t: f64,
    end_value: f64,
}

fn default_end_t() -> f64 {
    1.0
}

#[derive(Debug, Serialize)]
struct SolveResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    results: Option<ResultsData>,
}

#[derive(Debug, Serialize)]
struct ResultsData {
    solution: Solution,
    summary: SummaryResult,
}

#[derive(Debug, Serialize)]
struct SummaryResult {
    max_displacement: f64,
    max_bending_moment: f64,
    num_nodes: usize,
    num_elements: usize,
    total_dofs: usize,
    iterations: usize,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn solve_structure(Json(request): Json<SolveRequest>) -> impl IntoResponse {
    let result = tokio::task::spawn_blocking(move || run_solve(request)).await;

    match result {
        Ok(Ok(results)) => (
            StatusCode::OK,
            Json(SolveResponse {
                success: true,
                error: None,
                results: Some(results),
            }),
        ),
        Ok(Err(e)) => (
            StatusCode::BAD_REQUEST,
            Json(SolveResponse {
                success: false,
                error: Some(e.to_string()),
                results: None,
            }),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(SolveResponse {
                success: false,
                error: Some(e.to_string()),
                results: None,
            }),
        ),
    }
}

fn build_structure(data: StructureData) -> FrameResult<Structure> {
    let mut metadata = StructureMetadata::new(1, 0);
    metadata.name = data.name;
    let mut structure = Structure::new(metadata);

    for material in data.materials {
        structure.add_material(material)?;
    }

    for section in data.sections {
        structure.add_section(section)?;
    }

    for node in data.nodes {
        structure.add_node(Node::new(&node.id, node.x, node.y).with_constraint(node.constraint))?;
    }

    for element in data.elements {
        let mut builder = structure
            .element_builder(
                &element.id,
                &element.start_node,
                &element.end_node,
                &element.material,
                &element.section,
            )?
            .with_links(element.start_link, element.end_link);

        for load in element.concentrated_loads {
            let term: LoadTerm = load.term.parse()?;
            builder = builder.add_concentrated_load(ConcentratedLoad::new(term, load.local, load.t, load.value));
        }

        for load in element.distributed_loads {
            let term: LoadTerm = load.term.parse()?;
            builder = builder.add_distributed_load(DistributedLoad::new(
                term,
                load.local,
                load.start_t,
                load.start_value,
                load.end_t,
                load.end_value,
            ));
        }

        structure.add_element(builder.build()?)?;
    }

    Ok(structure)
}

fn run_solve(request: SolveRequest) -> FrameResult<ResultsData> {
    let structure = build_structure(request.structure)?;

    // Side outputs are never written on behalf of remote callers
    let mut options = request.options.unwrap_or_default();
    options.dump_matrix = None;
    options.dump_preprocessed = None;

    let solution = solve(&structure, &options)?;

    let summary = SummaryResult {
        max_displacement: solution.max_displacement(),
        max_bending_moment: solution.max_bending_moment(),
        num_nodes: structure.nodes_count(),
        num_elements: structure.elements_count(),
        total_dofs: solution.dof_count,
        iterations: solution.iterations,
    };

    Ok(ResultsData { solution, summary })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/v1/solve", post(solve_structure))
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], 8086));
    info!("Frame Solver Server listening on http://{}", addr);
    println!("Frame Solver Server listening on http://{}", addr);
    println!("  Health check: GET  /health");
    println!("  Solve:        POST /api/v1/solve");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
