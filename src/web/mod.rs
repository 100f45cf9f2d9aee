//! Embedded web dashboard for supportlens.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - A single-page dashboard: paste view, results view, explanation modal
//! - JSON API endpoints for analysis, AI generation and session state
//!
//! Launched via `supportlens serve` (default: `http://127.0.0.1:9747`).
//!
//! Each request runs on its own thread so an explanation can be fetched
//! while a summary is still being generated. Session state is shared behind
//! a mutex that is never held across a remote call.

mod api;
mod frontend;

use std::io::{Cursor, Read};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

use anyhow::{Context, Result};
use colored::Colorize;
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

use crate::config::SupportlensConfig;
use crate::error::RemoteCallError;
use crate::llm::{self, TextGenerator};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Shared server context
// ---------------------------------------------------------------------------

/// Everything a request handler needs.
pub struct ServerContext {
    state: Mutex<AppState>,
    /// The AI backend, or why AI features are unavailable.
    generator: Result<Box<dyn TextGenerator>, RemoteCallError>,
    summary_top_n: usize,
    log_activity: bool,
}

impl ServerContext {
    pub fn new(
        generator: Result<Box<dyn TextGenerator>, RemoteCallError>,
        summary_top_n: usize,
        log_activity: bool,
    ) -> Self {
        Self {
            state: Mutex::new(AppState::default()),
            generator,
            summary_top_n,
            log_activity,
        }
    }

    /// Context wired to the configured API client.
    pub fn from_config(config: &SupportlensConfig) -> Self {
        let generator = llm::generator_from_config(&config.ai)
            .map(|client| Box::new(client) as Box<dyn TextGenerator>);
        Self::new(generator, config.ai.summary_top_n, config.logging.enabled)
    }

    /// Lock the session state, recovering from a poisoned lock.
    pub(crate) fn state(&self) -> MutexGuard<'_, AppState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the web dashboard server.
///
/// Blocks the current thread. A failing handler answers with a 500 and
/// never takes the server down.
pub fn serve(config: &SupportlensConfig, open: bool) -> Result<()> {
    let addr = config.server.addr.as_str();
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    let ctx = Arc::new(ServerContext::from_config(config));
    if let Err(e) = &ctx.generator {
        println!("{} {}", "AI features unavailable:".yellow(), e);
    }

    println!("supportlens dashboard running at http://{addr}");
    println!("Press Ctrl+C to stop.\n");

    if open {
        let _ = open_browser(&format!("http://{addr}"));
    }

    let access_log = config.logging.access_log;
    for request in server.incoming_requests() {
        let ctx = Arc::clone(&ctx);
        thread::spawn(move || handle(request, &ctx, access_log));
    }

    Ok(())
}

/// Read, dispatch and answer one request.
fn handle(mut request: Request, ctx: &ServerContext, access_log: bool) {
    let method = request.method().clone();
    let url = request.url().to_string();

    // Read body up-front for methods that carry one
    let body = if matches!(method, Method::Put | Method::Post | Method::Patch) {
        let mut buf = String::new();
        let _ = request.as_reader().read_to_string(&mut buf);
        Some(buf)
    } else {
        None
    };

    let reply = dispatch(ctx, &method, &url, body.as_deref())
        .unwrap_or_else(|e| api::ApiReply::error(500, &format!("{e:#}")));
    let status = reply.status;
    let _ = request.respond(reply.into_response());

    if access_log {
        println!(
            "{} {} {} {}",
            method,
            url.split('?').next().unwrap_or(&url),
            status,
            chrono::Local::now().format("%H:%M:%S")
        );
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
pub(crate) fn dispatch(
    ctx: &ServerContext,
    method: &Method,
    url: &str,
    body: Option<&str>,
) -> Result<api::ApiReply> {
    // Strip query string for path matching
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        // Frontend
        (&Method::Get, "/") | (&Method::Get, "/index.html") => {
            Ok(api::ApiReply::html(frontend::INDEX_HTML))
        }

        // API: session
        (&Method::Get, "/api/state") => api::get_state(ctx),
        (&Method::Post, "/api/analyze") => api::post_analyze(ctx, body.unwrap_or("{}")),
        (&Method::Post, "/api/reset") => api::post_reset(ctx),

        // API: AI
        (&Method::Post, "/api/generate") => api::post_generate(ctx),
        (&Method::Post, "/api/explain") => api::post_explain(ctx, body.unwrap_or("{}")),
        (&Method::Post, "/api/explain/close") => api::post_explain_close(ctx),

        // API: health
        (&Method::Get, "/api/health") => api::get_health(ctx),

        // 404
        _ => Ok(api::ApiReply::error(404, "not found")),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn content_type(value: &str) -> Header {
    Header::from_bytes("Content-Type", value).expect("static header is valid")
}

fn build_response(status: u16, content_type_value: &str, body: Vec<u8>) -> Response<Cursor<Vec<u8>>> {
    Response::from_data(body)
        .with_header(content_type(content_type_value))
        .with_status_code(StatusCode(status))
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}
