//! Request handlers

pub mod auth;
pub mod bills;
pub mod health;
