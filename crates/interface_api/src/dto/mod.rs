//! Request and response bodies

pub mod auth;
pub mod bill;
