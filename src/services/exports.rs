//! Spreadsheet exports

use crate::{
    error::AppResult,
    export::{self, ReportWorkbook},
    models::RegistrationFilter,
};

use super::stats::StatsService;

/// A serialized workbook and the name to download it under
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct ExportService {
    stats: StatsService,
}

impl ExportService {
    pub fn new(stats: StatsService) -> Self {
        Self { stats }
    }

    /// Filtered registrations, one sheet
    pub async fn registrations(&self, filter: &RegistrationFilter) -> AppResult<ExportFile> {
        let snapshot = self.stats.snapshot(filter).await?;
        let name = if filter.is_empty() {
            "Registrations"
        } else {
            "Filtered Registrations"
        };
        self.finish(export::registrations_report(
            name,
            &snapshot.records,
            snapshot.context.timezone,
        ))
    }

    /// Master report over every registration
    pub async fn master(&self) -> AppResult<ExportFile> {
        let snapshot = self.stats.snapshot(&RegistrationFilter::default()).await?;
        self.finish(export::master_report(&snapshot.records, snapshot.context.timezone))
    }

    pub async fn analytics(&self, filter: &RegistrationFilter) -> AppResult<ExportFile> {
        let snapshot = self.stats.snapshot(filter).await?;
        self.finish(export::analytics_report(&snapshot.records, &snapshot.context))
    }

    fn finish(&self, report: ReportWorkbook) -> AppResult<ExportFile> {
        let file_name = report.file_name(self.stats.local_now());
        let bytes = report.to_bytes()?;
        tracing::info!(file_name = %file_name, bytes = bytes.len(), "Report exported");
        Ok(ExportFile { file_name, bytes })
    }
}
