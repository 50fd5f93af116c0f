//! Dashboard aggregation.
//!
//! Every number here is computed through the same scope filters as the
//! list endpoints, so the dashboard can never leak a count the caller
//! could not enumerate.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Role;

/// One month of visit activity, labeled for display.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthlyBucket {
    pub label: String,
    pub count: i64,
}

/// The dashboard payload. `dashboard_for` tags which of the two views
/// this is ("doctor" or "client"), not who is looking at it.
#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub dashboard_for: &'static str,
    pub patients_count: i64,
    pub appointments_count: i64,
    pub receipts_count: i64,
    pub receipts_total: Decimal,
    pub receipts_paid_count: i64,
    pub monthly_visits: Vec<MonthlyBucket>,
}

/// Which dashboard variant a role gets.
pub fn dashboard_tag(role: Role) -> &'static str {
    role.as_str()
}

/// Human-readable month label, e.g. "March 2026".
pub fn month_label(month: DateTime<Utc>) -> String {
    month.format("%B %Y").to_string()
}

/// Turn month buckets from storage into labeled series points. Input is
/// already ascending by month; order is preserved.
pub fn monthly_series(rows: Vec<(DateTime<Utc>, i64)>) -> Vec<MonthlyBucket> {
    rows.into_iter()
        .map(|(month, count)| MonthlyBucket {
            label: month_label(month),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn month(year: i32, month: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn month_labels_are_human_readable() {
        assert_eq!(month_label(month(2026, 3)), "March 2026");
        assert_eq!(month_label(month(2025, 12)), "December 2025");
    }

    #[test]
    fn series_preserves_ascending_order() {
        let series = monthly_series(vec![
            (month(2025, 11), 2),
            (month(2025, 12), 5),
            (month(2026, 1), 1),
        ]);
        assert_eq!(
            series,
            vec![
                MonthlyBucket {
                    label: "November 2025".to_string(),
                    count: 2
                },
                MonthlyBucket {
                    label: "December 2025".to_string(),
                    count: 5
                },
                MonthlyBucket {
                    label: "January 2026".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn empty_series_stays_empty() {
        assert!(monthly_series(Vec::new()).is_empty());
    }

    #[test]
    fn dashboards_are_tagged_by_role() {
        assert_eq!(dashboard_tag(Role::Doctor), "doctor");
        assert_eq!(dashboard_tag(Role::Client), "client");
    }
}
