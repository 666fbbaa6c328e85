//! Data Transfer Objects for API requests and responses.
//!
//! Requests derive `Deserialize` and, where they carry user input,
//! `validator::Validate`.

pub mod admin;
pub mod health;
pub mod links;
pub mod logs;
pub mod pagination;
