//! JSON API handlers for the web dashboard.
//!
//! Handlers return an [`ApiReply`]; the server converts it into a
//! `tiny_http` response at the edge.

use std::io::Cursor;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tiny_http::Response;

use crate::activity::logger::{self, ActivityEvent, RowCounts};
use crate::analysis::{Dashboard, RawInputs};
use crate::config;
use crate::llm::{self, TextGenerator, Unavailable};

use super::{ServerContext, build_response};

// ---------------------------------------------------------------------------
// Reply type
// ---------------------------------------------------------------------------

/// Status code, content type and body of a handler's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ApiReply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl ApiReply {
    pub fn json<T: Serialize>(status: u16, data: &T) -> Result<Self> {
        let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
        Ok(Self {
            status,
            content_type: "application/json; charset=utf-8",
            body,
        })
    }

    pub fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            content_type: "application/json; charset=utf-8",
            body: serde_json::json!({ "error": message }).to_string(),
        }
    }

    pub fn html(page: &str) -> Self {
        Self {
            status: 200,
            content_type: "text/html; charset=utf-8",
            body: page.to_string(),
        }
    }

    pub fn into_response(self) -> Response<Cursor<Vec<u8>>> {
        build_response(self.status, self.content_type, self.body.into_bytes())
    }
}

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ExplainRequest {
    topic: String,
}

#[derive(Serialize)]
struct AnalyzeResponse {
    dashboard: Dashboard,
}

#[derive(Serialize)]
struct GenerateResponse {
    summary: String,
    recommendations: String,
    summary_ok: bool,
    recommendations_ok: bool,
}

#[derive(Serialize)]
struct ExplainResponse {
    topic: String,
    explanation: String,
    ok: bool,
}

#[derive(Serialize)]
struct HealthResponse {
    ai_available: bool,
    ai_detail: String,
    config_exists: bool,
    activity_log_exists: bool,
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `GET /api/state`: snapshot of the session.
pub(super) fn get_state(ctx: &ServerContext) -> Result<ApiReply> {
    let view = ctx.state().view();
    ApiReply::json(200, &view)
}

/// `POST /api/analyze`: parse the pasted tables.
///
/// Body: `{ "keywords": "...", "trending": "...", "topics": "..." }`.
/// Answers 422 with the user-facing message when every table is empty.
pub(super) fn post_analyze(ctx: &ServerContext, body: &str) -> Result<ApiReply> {
    let inputs: RawInputs =
        serde_json::from_str(body).context("invalid JSON in analyze request")?;

    let outcome = {
        let mut state = ctx.state();
        state.set_inputs(inputs);
        state
            .analyze()
            .map(|dataset| (Dashboard::build(dataset), RowCounts::of(dataset)))
    };

    if ctx.log_activity {
        logger::log_analysis(outcome.as_ref().map(|(_, rows)| *rows));
    }

    match outcome {
        Ok((dashboard, _)) => ApiReply::json(200, &AnalyzeResponse { dashboard }),
        Err(e) => Ok(ApiReply::error(422, &e.to_string())),
    }
}

/// `POST /api/reset`: "start over".
pub(super) fn post_reset(ctx: &ServerContext) -> Result<ApiReply> {
    let view = {
        let mut state = ctx.state();
        state.reset();
        state.view()
    };
    ApiReply::json(200, &view)
}

/// `POST /api/generate`: summary, then recommendations from it.
///
/// The state lock is released while each remote call is in flight, so
/// `/api/state` and `/api/explain` stay responsive. Answers 409 when there
/// is no analysed data or a generation is already running. Results are
/// dropped if the dashboard was reset in the meantime.
pub(super) fn post_generate(ctx: &ServerContext) -> Result<ApiReply> {
    let (id, dataset) = match ctx.state().begin_generation() {
        Ok(started) => started,
        Err(blocked) => return Ok(ApiReply::error(409, &blocked.to_string())),
    };

    let unavailable;
    let generator: &dyn TextGenerator = match &ctx.generator {
        Ok(generator) => generator.as_ref(),
        Err(e) => {
            unavailable = Unavailable(e.clone());
            &unavailable
        }
    };
    let log = ctx.log_activity && ctx.generator.is_ok();

    let outcome = llm::run_analysis_pipeline(generator, &dataset, ctx.summary_top_n, |summary| {
        if log {
            logger::log_remote_call(ActivityEvent::Summary, summary);
        }
        ctx.state().finish_summary(id, summary.display_text());
    });
    if log {
        logger::log_remote_call(ActivityEvent::Recommendations, &outcome.recommendations);
    }

    let recommendations = outcome.recommendations.display_text();
    ctx.state().finish_generation(id, recommendations.clone());

    ApiReply::json(
        200,
        &GenerateResponse {
            summary: outcome.summary.display_text(),
            recommendations,
            summary_ok: outcome.summary.is_success(),
            recommendations_ok: outcome.recommendations.is_success(),
        },
    )
}

/// `POST /api/explain`: explain one topic. Body: `{ "topic": "..." }`.
pub(super) fn post_explain(ctx: &ServerContext, body: &str) -> Result<ApiReply> {
    let req: ExplainRequest =
        serde_json::from_str(body).context("invalid JSON in explain request")?;

    ctx.state().open_explanation(&req.topic);

    let outcome = match &ctx.generator {
        Ok(generator) => {
            let outcome = llm::explain_topic(generator.as_ref(), &req.topic);
            if ctx.log_activity {
                logger::log_remote_call(ActivityEvent::Explain, &outcome);
            }
            outcome
        }
        Err(e) => llm::explain_topic(&Unavailable(e.clone()), &req.topic),
    };

    let explanation = outcome.display_text();
    ctx.state().finish_explanation(&req.topic, explanation.clone());

    ApiReply::json(
        200,
        &ExplainResponse {
            topic: req.topic,
            explanation,
            ok: outcome.is_success(),
        },
    )
}

/// `POST /api/explain/close`: dismiss the explanation modal.
pub(super) fn post_explain_close(ctx: &ServerContext) -> Result<ApiReply> {
    ctx.state().close_explanation();
    ApiReply::json(200, &serde_json::json!({ "success": true }))
}

/// `GET /api/health`: AI, config and log status.
pub(super) fn get_health(ctx: &ServerContext) -> Result<ApiReply> {
    let config_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);

    let activity_log_exists = logger::activity_log_path()
        .map(|p| p.exists())
        .unwrap_or(false);

    let (ai_available, ai_detail) = match &ctx.generator {
        Ok(_) => (true, "configured".to_string()),
        Err(e) => (false, e.to_string()),
    };

    ApiReply::json(
        200,
        &HealthResponse {
            ai_available,
            ai_detail,
            config_exists,
            activity_log_exists,
        },
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
