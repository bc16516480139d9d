use std::sync::Arc;

use crate::db::DbPool;
use crate::errors::Result;

use super::history_model::HistorySnapshot;
use super::history_repository::HistoryRepository;

/// Service for reading portfolio valuation history
pub struct HistoryService {
    repository: HistoryRepository,
}

impl HistoryService {
    /// Creates a new HistoryService instance
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self {
            repository: HistoryRepository::new(pool),
        }
    }

    /// Full snapshot series for a portfolio, oldest first
    pub fn get_history(&self, portfolio_id: &str) -> Result<Vec<HistorySnapshot>> {
        self.repository.list_by_portfolio(portfolio_id)
    }

    /// Snapshot series inside a date range, oldest first
    pub fn get_history_range(
        &self,
        portfolio_id: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<HistorySnapshot>> {
        self.repository.list_range(portfolio_id, start_date, end_date)
    }

    /// Most recent snapshot, if any
    pub fn get_latest(&self, portfolio_id: &str) -> Result<Option<HistorySnapshot>> {
        self.repository.get_latest(portfolio_id)
    }

    /// Percentage return between the first and last snapshots of the
    /// series. Zero with fewer than two snapshots or a zero-valued
    /// starting point.
    pub fn period_return_percent(snapshots: &[HistorySnapshot]) -> f64 {
        let (first, last) = match (snapshots.first(), snapshots.last()) {
            (Some(first), Some(last)) if snapshots.len() >= 2 => (first, last),
            _ => return 0.0,
        };

        if first.total_value == 0.0 {
            return 0.0;
        }

        (last.total_value - first.total_value) / first.total_value * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(date: &str, total_value: f64) -> HistorySnapshot {
        HistorySnapshot {
            id: date.to_string(),
            portfolio_id: "p1".to_string(),
            date: date.to_string(),
            total_value,
            total_gain: 0.0,
        }
    }

    #[test]
    fn period_return_uses_first_and_last_snapshots() {
        let series = vec![
            snapshot("2026-01-01", 1000.0),
            snapshot("2026-01-15", 1080.0),
            snapshot("2026-02-01", 1100.0),
        ];
        assert!((HistoryService::period_return_percent(&series) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn period_return_is_zero_for_short_or_empty_series() {
        assert_eq!(HistoryService::period_return_percent(&[]), 0.0);
        assert_eq!(
            HistoryService::period_return_percent(&[snapshot("2026-01-01", 1000.0)]),
            0.0
        );
    }

    #[test]
    fn period_return_is_zero_when_series_starts_at_zero() {
        let series = vec![snapshot("2026-01-01", 0.0), snapshot("2026-02-01", 500.0)];
        assert_eq!(HistoryService::period_return_percent(&series), 0.0);
    }
}
