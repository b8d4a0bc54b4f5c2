// src/services/mod.rs

pub mod analytics_service;
pub mod auth;
pub mod campaign_service;
pub mod client_service;
pub mod column_mapper;
pub mod dashboard_service;
pub mod import_service;
pub mod lead_service;
pub mod pipeline_service;
pub mod spend_service;

pub use analytics_service::AnalyticsService;
pub use auth::AuthService;
pub use campaign_service::CampaignService;
pub use client_service::ClientService;
pub use dashboard_service::DashboardService;
pub use import_service::ImportService;
pub use lead_service::LeadService;
pub use pipeline_service::PipelineService;
pub use spend_service::SpendService;
