//! Pure helpers shared by the services and the HTTP layer.
//!
//! - [`slug`] - Slug generation and validation
//! - [`url_safety`] - Destination URL policy (SSRF)
//! - [`client_ip`] - Client address resolution from proxy headers

pub mod client_ip;
pub mod slug;
pub mod url_safety;
