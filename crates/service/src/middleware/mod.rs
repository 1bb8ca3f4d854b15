//! Request extractors.

pub mod admin;

pub use admin::{AdminTokenRejection, RequireAdminToken, check_admin_token};
