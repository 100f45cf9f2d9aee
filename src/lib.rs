//! supportlens: turn pasted support-analytics tables into a dashboard with
//! AI-generated summaries, recommendations and topic explanations.

pub mod activity;
pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod parse;
pub mod state;
pub mod web;
