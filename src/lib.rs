//! civicwatch - GraphQL API server for a public civic information site
//!
//! Serves a global visitor counter, citizen-submitted atrocity reports and
//! governance highlights over GraphQL, with JWT accounts and role-based
//! moderation.
//!
//! # Modes
//! - `serve` (default): HTTP server
//! - `seed`, `create-admin`, `config generate`: management commands
//!
//! # Architecture
//! - `storage`: SeaORM data access (SQLite / MySQL / PostgreSQL)
//! - `services`: Business logic shared by GraphQL, REST and CLI
//! - `api`: GraphQL schema, REST auth/health endpoints, middleware
//! - `interfaces`: Command-line interface
//! - `config`: Configuration loading
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
