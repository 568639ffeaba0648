pub mod admin_receipt;
pub mod auth;
pub mod client;
pub mod common;
pub mod receipt;
