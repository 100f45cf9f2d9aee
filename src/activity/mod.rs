//! Structured activity logging and its reporting.
//!
//! - [`logger`]: appends one JSONL entry per analyze action or AI call
//! - [`reporter`]: aggregates the log for `supportlens activity`
//!
//! Entries carry metadata only (event kind, outcome, latency, row counts);
//! pasted tables and generated text are never written.

pub mod logger;
pub mod reporter;
