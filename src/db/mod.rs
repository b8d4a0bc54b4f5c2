// src/db/mod.rs

pub mod analytics_repo;
pub mod campaign_repo;
pub mod client_repo;
pub mod dashboard_repo;
pub mod lead_repo;
pub mod pipeline_repo;
pub mod spend_repo;
pub mod user_repo;

pub use analytics_repo::AnalyticsRepository;
pub use campaign_repo::CampaignRepository;
pub use client_repo::ClientRepository;
pub use dashboard_repo::DashboardRepository;
pub use lead_repo::LeadRepository;
pub use pipeline_repo::PipelineRepository;
pub use spend_repo::SpendRepository;
pub use user_repo::UserRepository;
