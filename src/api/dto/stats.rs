//! DTOs for registry statistics.

use serde::Serialize;

use crate::domain::entities::LinkStats;

/// Counts across every stored link.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total: usize,
    pub active: usize,
    pub expired: usize,
    pub total_clicks: u64,
}

impl From<LinkStats> for StatsResponse {
    fn from(stats: LinkStats) -> Self {
        Self {
            total: stats.total,
            active: stats.active,
            expired: stats.expired,
            total_clicks: stats.total_clicks,
        }
    }
}
