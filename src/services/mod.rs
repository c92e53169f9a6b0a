//! Business logic services

pub mod badges;
pub mod exports;
pub mod stats;
pub mod storage;

use std::sync::Arc;

use crate::{config::AppConfig, error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub stats: stats::StatsService,
    pub exports: exports::ExportService,
    pub badges: badges::BadgeService,
}

impl Services {
    /// Create all services with the given repository
    pub async fn new(repository: Repository, config: &AppConfig) -> AppResult<Self> {
        let store = storage::S3BucketStore::new(&config.storage).await?;
        tracing::info!(bucket = %config.storage.bucket, "Badge storage configured");

        let stats = stats::StatsService::new(repository.clone(), config.event.clone());
        let badges = badges::BadgeService::new(
            Arc::new(repository.registrations.clone()),
            Arc::new(store),
            Arc::new(badges::HttpPhotoSource::default()),
            &config.event.badge_prefix,
            &config.event.name,
        );

        Ok(Self {
            exports: exports::ExportService::new(stats.clone()),
            stats,
            badges,
            repository,
        })
    }
}
