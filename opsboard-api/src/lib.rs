//! # OpsBoard API Server Library
//!
//! This library provides the core functionality for the OpsBoard API server.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `context`: Per-request identity and team context
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod context;
pub mod error;
pub mod routes;
