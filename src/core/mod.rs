//! Core translation engine module

pub mod config;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod rate_limiter;
