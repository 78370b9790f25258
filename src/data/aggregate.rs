use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::model::{ProjectTable, Status};

/// How many technologies the ranked list keeps.
const TOP_TECHNOLOGIES: usize = 5;

// ---------------------------------------------------------------------------
// Result types handed to the presentation layer
// ---------------------------------------------------------------------------

/// One slice of the status breakdown: count of named projects in the status
/// and its fraction of the named total. Feeds the donut chart and the derived
/// per-status metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusShare {
    pub status: Status,
    pub count: usize,
    pub fraction: f64,
}

/// One entry of the technology ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechnologyCount {
    pub technology: String,
    pub count: usize,
}

/// Everything the dashboard renders for one table, recomputed per
/// interaction. All figures are defined on an empty table: counts are zero,
/// sequences empty, and `capacity_max` is `None` (shown as "N/A").
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    /// Rows with a project name.
    pub total_count: usize,
    /// Per present status; a status with no rows has no entry, which callers
    /// must distinguish from a zero count.
    pub status_breakdown: Vec<StatusShare>,
    /// Derived from the breakdown; `None` when the status is absent.
    pub operational_count: Option<u64>,
    /// Derived from the breakdown; `None` when the status is absent.
    pub under_construction_count: Option<u64>,
    /// Distinct technology values present.
    pub technology_count: usize,
    /// Sum of `kt H2/y`, kept to one decimal place.
    pub capacity_total: f64,
    /// Largest `kt H2/y` value, one decimal place; `None` on an empty column.
    pub capacity_max: Option<f64>,
    /// Up to five technologies by descending row count, ties broken by first
    /// appearance in the table.
    pub top_technologies: Vec<TechnologyCount>,
    /// Operational projects per commissioning date, ascending. Rows without a
    /// date cannot sit on a date axis and are left out.
    pub operational_trend: BTreeMap<NaiveDate, usize>,
}

impl DashboardSummary {
    pub fn compute(table: &ProjectTable) -> Self {
        let total_count = table
            .records
            .iter()
            .filter(|r| r.project_name.is_some())
            .count();
        let status_breakdown = status_breakdown(table, total_count);
        let operational_count = derived_count(&status_breakdown, Status::Operational, total_count);
        let under_construction_count =
            derived_count(&status_breakdown, Status::UnderConstruction, total_count);

        DashboardSummary {
            total_count,
            operational_count,
            under_construction_count,
            technology_count: technology_count(table),
            capacity_total: round1(capacities(table).sum()),
            capacity_max: capacities(table).reduce(f64::max).map(round1),
            top_technologies: top_technologies(table, TOP_TECHNOLOGIES),
            operational_trend: operational_trend(table),
            status_breakdown,
        }
    }

    /// Breakdown entry for one status; `None` when no row carries it.
    pub fn status_share(&self, status: Status) -> Option<&StatusShare> {
        self.status_breakdown.iter().find(|s| s.status == status)
    }

    /// Trend points in ascending date order, ready for the line chart.
    pub fn trend_points(&self) -> impl Iterator<Item = (NaiveDate, usize)> + '_ {
        self.operational_trend.iter().map(|(date, n)| (*date, *n))
    }
}

// ---------------------------------------------------------------------------
// Grouped aggregations
// ---------------------------------------------------------------------------

/// Group named rows by status; fraction is count over the named total.
fn status_breakdown(table: &ProjectTable, total_count: usize) -> Vec<StatusShare> {
    if total_count == 0 {
        return Vec::new();
    }
    let mut counts: BTreeMap<Status, usize> = BTreeMap::new();
    for record in &table.records {
        if record.project_name.is_none() {
            continue;
        }
        let Some(status) = record.status else {
            continue;
        };
        *counts.entry(status).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(status, count)| StatusShare {
            status,
            count,
            fraction: count as f64 / total_count as f64,
        })
        .collect()
}

/// Per-status headline figure: fraction × total, rounded half-away-from-zero.
/// `None` when the status has no slice at all; "no rows to query" is not a
/// zero.
fn derived_count(breakdown: &[StatusShare], status: Status, total_count: usize) -> Option<u64> {
    breakdown
        .iter()
        .find(|share| share.status == status)
        .map(|share| (share.fraction * total_count as f64).round() as u64)
}

fn technology_count(table: &ProjectTable) -> usize {
    let mut seen: Vec<&str> = Vec::new();
    for record in &table.records {
        let Some(tech) = record.technology.as_deref() else {
            continue;
        };
        if !seen.contains(&tech) {
            seen.push(tech);
        }
    }
    seen.len()
}

fn capacities(table: &ProjectTable) -> impl Iterator<Item = f64> + '_ {
    table.records.iter().filter_map(|r| r.capacity_kt_y)
}

/// Row counts per technology, descending. The counts are accumulated in
/// first-appearance order and sorted stably, so ties keep the original row
/// order.
fn top_technologies(table: &ProjectTable, limit: usize) -> Vec<TechnologyCount> {
    let mut counts: Vec<TechnologyCount> = Vec::new();
    for record in &table.records {
        let Some(tech) = record.technology.as_deref() else {
            continue;
        };
        match counts.iter_mut().find(|c| c.technology == tech) {
            Some(entry) => entry.count += 1,
            None => counts.push(TechnologyCount {
                technology: tech.to_string(),
                count: 1,
            }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

/// Operational rows per commissioning date. A `BTreeMap` keeps the sequence
/// ordered by date without a separate sort.
fn operational_trend(table: &ProjectTable) -> BTreeMap<NaiveDate, usize> {
    let mut by_date: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for record in &table.records {
        if record.status != Some(Status::Operational) {
            continue;
        }
        let Some(date) = record.date_online else {
            continue;
        };
        *by_date.entry(date).or_default() += 1;
    }
    by_date
}

/// One decimal place, half away from zero.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
