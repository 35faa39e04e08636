//! HTTP trigger for scrape runs
//!
//! `GET /` serves the search form, `POST /scrape` runs a scrape for the
//! submitted term and answers with the CSV as a download, `GET /health`
//! reports liveness.

use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::application::ScrapeOrchestrator;
use crate::domain::clean_text;
use crate::infrastructure::{ScrapeResult, ScraperConfig, csv_export};

const INDEX_HTML: &str = include_str!("../static/index.html");
const CSV_DISPOSITION: &str = "attachment; filename=\"jobs.csv\"";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ScrapeOrchestrator>,
}

#[derive(Debug, Deserialize)]
pub struct ScrapeForm {
    #[serde(default)]
    pub term: String,
}

/// Build the router around an existing orchestrator.
pub fn build_app(orchestrator: Arc<ScrapeOrchestrator>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/scrape", post(scrape_handler))
        .route("/health", get(health_handler))
        .with_state(AppState { orchestrator })
}

/// Build the router with an HTTP-backed orchestrator.
pub fn build_app_from_config(config: ScraperConfig) -> ScrapeResult<Router> {
    let orchestrator = ScrapeOrchestrator::from_config(config)?;
    Ok(build_app(Arc::new(orchestrator)))
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn scrape_handler(State(state): State<AppState>, Form(form): Form<ScrapeForm>) -> Response {
    let term = clean_text(&form.term);
    if term.is_empty() {
        warn!("Rejected scrape request with empty term");
        return (StatusCode::BAD_REQUEST, "search term must not be empty").into_response();
    }

    info!("📥 Scrape requested for '{}'", term);
    let report = match state.orchestrator.run_scrape(&term).await {
        Ok(report) => report,
        Err(e) => {
            error!("❌ Scrape for '{}' failed: {}", term, e);
            return (StatusCode::BAD_GATEWAY, format!("scrape failed: {e}")).into_response();
        }
    };

    let detail_prefix = state.orchestrator.config().site.detail_url_prefix();
    match csv_export::render_jobs_csv(&report.records, &detail_prefix) {
        Ok(body) => (
            [
                (header::CONTENT_TYPE, "text/csv"),
                (header::CONTENT_DISPOSITION, CSV_DISPOSITION),
            ],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("❌ Failed to render CSV: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FakeHtmlSource, card, result_page};
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    const BASE: &str = "http://jobs.test/jobs?q=data+engineer&limit=50";

    fn app(source: FakeHtmlSource) -> Router {
        let config = ScraperConfig::default().with_base_url("http://jobs.test");
        let orchestrator = ScrapeOrchestrator::new(config, Arc::new(source)).unwrap();
        build_app(Arc::new(orchestrator))
    }

    fn form_post(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/scrape")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn scrape_normalizes_term_and_returns_csv() {
        let page = result_page(&[card(Some("k1"), "Data Engineer", "Acme", "Denver, CO")], None);
        let source = FakeHtmlSource::new()
            .with_page(BASE, page.clone())
            .with_page(format!("{BASE}&start=0"), page);

        let response = app(source)
            .oneshot(form_post("term=++data+++engineer+"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        assert_eq!(response.headers()[header::CONTENT_DISPOSITION], CSV_DISPOSITION);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(
            text,
            "ID,Title,CompanyName,Location\nhttp://jobs.test/viewjob?jk=k1,Data Engineer,Acme,\"Denver, CO\"\n"
        );
    }

    #[tokio::test]
    async fn upstream_failure_is_bad_gateway() {
        let source = FakeHtmlSource::new().with_status(BASE, 429);
        let response = app(source).oneshot(form_post("term=data+engineer")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
