// src/models/mod.rs

pub mod analytics;
pub mod auth;
pub mod campaign;
pub mod client;
pub mod import;
pub mod lead;
pub mod pipeline;
pub mod spend;
