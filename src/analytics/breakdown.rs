//! Nationality, branch and unit distributions

use indexmap::IndexMap;
use serde::Serialize;
use utoipa::ToSchema;

use super::percentage;
use crate::models::Registration;

/// Label used for registrations without a unit
pub const UNSPECIFIED_UNIT: &str = "Unspecified";

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BreakdownEntry {
    pub label: String,
    pub count: i64,
    /// Share of `Breakdown::total`
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct Breakdown {
    pub entries: Vec<BreakdownEntry>,
    /// Denominator the percentages are computed against
    pub total: i64,
}

/// Group, count and sort by count descending; ties keep first-seen order
fn group_count<'a>(labels: impl Iterator<Item = &'a str>) -> Breakdown {
    let mut counts: IndexMap<&str, i64> = IndexMap::new();
    let mut total = 0;
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
        total += 1;
    }

    let mut entries: Vec<BreakdownEntry> = counts
        .into_iter()
        .map(|(label, count)| BreakdownEntry {
            label: label.to_string(),
            count,
            percentage: percentage(count, total),
        })
        .collect();
    // Stable sort preserves insertion order among equal counts
    entries.sort_by(|a, b| b.count.cmp(&a.count));

    Breakdown { entries, total }
}

/// Nationality over all records; blank nationality counts as `home_country`
pub fn nationality_breakdown(records: &[Registration], home_country: &str) -> Breakdown {
    group_count(
        records
            .iter()
            .map(|r| r.nationality_or(home_country).trim()),
    )
}

/// Branches of members only; non-members and blank branches are left out
/// of the denominator too
pub fn branch_distribution(records: &[Registration]) -> Breakdown {
    group_count(records.iter().filter_map(|r| r.member_branch()))
}

/// Units over all records
pub fn unit_distribution(records: &[Registration]) -> Breakdown {
    group_count(records.iter().map(|r| r.unit().unwrap_or(UNSPECIFIED_UNIT)))
}
