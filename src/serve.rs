//! Dashboard HTTP surface.
//!
//! Two read-only routes over the session table:
//! - `GET /` — the rendered dashboard; filter and date selections arrive
//!   as query parameters and re-run aggregation over the shared table.
//! - `GET /download.csv` — the CSV export of the currently filtered view.
//!
//! The table is built once before the server starts and shared immutably
//! across requests; nothing here mutates state.

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use tracing::{error, info};

use crate::analysis::filter_rows;
use crate::config::Config;
use crate::export;
use crate::model::{CSV_FILENAME, CSV_MIME, Table};
use crate::render::{DashboardQuery, dashboard_page};

#[derive(Clone)]
pub struct AppState {
    table: Arc<Table>,
}

/// Build the dashboard router over an immutable session table.
pub fn router(table: Arc<Table>) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/download.csv", get(download_csv))
        .with_state(AppState { table })
}

/// Bind and serve until the process is stopped.
///
/// The runtime is created here so the fetch-and-normalize phase stays
/// synchronous in `main`.
pub fn run(config: &Config, table: Table) -> io::Result<()> {
    let app = router(Arc::new(table));
    let bind_addr = config.bind_addr.clone();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
        info!(addr = %bind_addr, "dashboard listening");
        axum::serve(listener, app).await
    })
}

async fn dashboard(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String> {
    let query = DashboardQuery::from_params(&params);
    Html(dashboard_page(&state.table, &query))
}

async fn download_csv(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let query = DashboardQuery::from_params(&params);
    let filtered = filter_rows(&state.table, &query.filter);

    match export::to_csv(&filtered) {
        Ok(body) => (
            [
                (header::CONTENT_TYPE, CSV_MIME.to_string()),
                (header::CONTENT_DISPOSITION, content_disposition()),
            ],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "CSV export failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "export failed").into_response()
        }
    }
}

fn content_disposition() -> String {
    format!("attachment; filename=\"{}\"", CSV_FILENAME)
}
