//! REST API layer for HTTP request/response handling.
//!
//! # Modules
//!
//! - [`dto`] - Request/response bodies and pagination
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Extractors for sessions and client addresses, plus tower layers
//! - [`routes`] - Route configuration under `/api`

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
