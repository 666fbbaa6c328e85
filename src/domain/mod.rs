//! Domain layer containing business entities and repository contracts.
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Click event queued by the redirect handler
//! - [`click_worker`] - Asynchronous click persistence
//!
//! # Click Processing Flow
//!
//! 1. The redirect handler resolves the link and the client address
//! 2. A [`click_event::ClickEvent`] is pushed onto a bounded channel
//! 3. [`click_worker::run_click_worker`] writes it with retry
//! 4. The click log row and the link's counter are updated together via
//!    [`repositories::ClickRepository`]

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
