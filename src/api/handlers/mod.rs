//! HTTP request handlers.

pub mod admin;
pub mod health;
pub mod links;
pub mod logs;
pub mod redirect;

pub use admin::admin_links_handler;
pub use health::health_handler;
pub use links::{create_link_handler, list_links_handler};
pub use logs::link_logs_handler;
pub use redirect::redirect_handler;
