//! Core domain entities.
//!
//! Entities are plain data structures without persistence or transport
//! concerns. Creation inputs use separate `New*` structs.
//!
//! - [`Link`] - A shortened URL and its creator attribution
//! - [`Click`] - A redirect recorded against a link
//! - [`User`] - A registered account with a [`Role`]

pub mod click;
pub mod link;
pub mod user;

pub use click::{Click, NewClick};
pub use link::{Creator, Link, LinkWithCreator, NewLink};
pub use user::{NewUser, Role, SessionUser, User};
