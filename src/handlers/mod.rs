// src/handlers/mod.rs

pub mod analytics;
pub mod auth;
pub mod campaigns;
pub mod clients;
pub mod imports;
pub mod leads;
pub mod pipelines;
pub mod spend;
