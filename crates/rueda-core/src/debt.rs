//! # Client Debt
//!
//! Classifies every client with a negative balance by how close their credit
//! is to its due date.
//!
//! ```text
//!   created_at ─────────── + window (30 d) ──────────► due_date
//!
//!   now < due_date − 7 d         → current
//!   due_date − 7 d ≤ now ≤ due   → due_soon  (days_until_due = ⌈due − now⌉)
//!   now > due_date               → overdue   (days_past_due  = ⌈now − due⌉)
//! ```
//!
//! The due date is derived from the client's `created_at` because the backend
//! records no per-credit due date. The window is a [`CreditPolicy`] so the
//! shop can change it without touching this code.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Client;
use crate::{DEFAULT_CREDIT_WINDOW_DAYS, DUE_SOON_DAYS};

const SECONDS_PER_DAY: i64 = 86_400;

/// How long credit runs and when to start warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreditPolicy {
    pub window_days: i64,
    pub due_soon_days: i64,
}

impl Default for CreditPolicy {
    fn default() -> Self {
        CreditPolicy {
            window_days: DEFAULT_CREDIT_WINDOW_DAYS,
            due_soon_days: DUE_SOON_DAYS,
        }
    }
}

/// Ordered by urgency: `Overdue < DueSoon < Current`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DebtStatus {
    Overdue,
    DueSoon,
    Current,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DebtSummary {
    pub client_id: String,
    pub client_name: String,
    pub document: String,
    pub phone: Option<String>,
    /// Absolute value of the negative balance.
    pub total_debt: Money,
    #[ts(as = "String")]
    pub due_date: DateTime<Utc>,
    pub status: DebtStatus,
    pub days_past_due: Option<i64>,
    pub days_until_due: Option<i64>,
}

fn ceil_days(span: Duration) -> i64 {
    let secs = span.num_seconds();
    (secs + SECONDS_PER_DAY - 1).div_euclid(SECONDS_PER_DAY)
}

impl DebtSummary {
    /// `None` for clients without debt.
    pub fn for_client(client: &Client, now: DateTime<Utc>, policy: &CreditPolicy) -> Option<Self> {
        if !client.balance.is_negative() {
            return None;
        }

        let due_date = client.created_at + Duration::days(policy.window_days);
        let (status, days_past_due, days_until_due) = if due_date < now {
            (DebtStatus::Overdue, Some(ceil_days(now - due_date)), None)
        } else {
            let until = ceil_days(due_date - now);
            if until <= policy.due_soon_days {
                (DebtStatus::DueSoon, None, Some(until))
            } else {
                (DebtStatus::Current, None, Some(until))
            }
        };

        Some(DebtSummary {
            client_id: client.id.clone(),
            client_name: client.name.clone(),
            document: client.document_label(),
            phone: client.phone.clone(),
            total_debt: client.balance.abs(),
            due_date,
            status,
            days_past_due,
            days_until_due,
        })
    }
}

/// Debt summaries for all indebted clients, overdue first, then due soon,
/// then current. Client order is kept within each group.
pub fn summarize_debts(clients: &[Client], now: DateTime<Utc>, policy: &CreditPolicy) -> Vec<DebtSummary> {
    let mut summaries: Vec<DebtSummary> = clients
        .iter()
        .filter_map(|c| DebtSummary::for_client(c, now, policy))
        .collect();
    summaries.sort_by_key(|s| s.status);
    summaries
}

/// Summaries plus per-status totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DebtReport {
    pub summaries: Vec<DebtSummary>,
    pub total_debt: Money,
    pub overdue_total: Money,
    pub due_soon_total: Money,
    pub current_total: Money,
    pub overdue_count: usize,
    pub due_soon_count: usize,
}

impl DebtReport {
    pub fn build(clients: &[Client], now: DateTime<Utc>, policy: &CreditPolicy) -> Self {
        let summaries = summarize_debts(clients, now, policy);
        let mut report = DebtReport::default();

        for s in &summaries {
            report.total_debt += s.total_debt;
            match s.status {
                DebtStatus::Overdue => {
                    report.overdue_total += s.total_debt;
                    report.overdue_count += 1;
                }
                DebtStatus::DueSoon => {
                    report.due_soon_total += s.total_debt;
                    report.due_soon_count += 1;
                }
                DebtStatus::Current => report.current_total += s.total_debt,
            }
        }

        report.summaries = summaries;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 15, 16, 30, 0).unwrap()
    }

    fn client(id: &str, balance_cents: i64, days_ago: i64) -> Client {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("Cliente {}", id),
            "documentType": "V",
            "documentNumber": "12345678",
            "balance": balance_cents as f64 / 100.0,
            "createdAt": (now() - Duration::days(days_ago)).to_rfc3339(),
        }))
        .unwrap()
    }

    #[test]
    fn test_overdue_after_window() {
        let s = DebtSummary::for_client(&client("1", -100_000, 35), now(), &CreditPolicy::default()).unwrap();
        assert_eq!(s.status, DebtStatus::Overdue);
        assert_eq!(s.days_past_due, Some(5));
        assert_eq!(s.total_debt.cents(), 100_000);
    }

    #[test]
    fn test_due_soon_within_seven_days() {
        let s = DebtSummary::for_client(&client("1", -50_000, 25), now(), &CreditPolicy::default()).unwrap();
        assert_eq!(s.status, DebtStatus::DueSoon);
        assert_eq!(s.days_until_due, Some(5));
    }

    #[test]
    fn test_boundaries() {
        let policy = CreditPolicy::default();
        let due_today = DebtSummary::for_client(&client("1", -1, 30), now(), &policy).unwrap();
        assert_eq!(due_today.status, DebtStatus::DueSoon);
        assert_eq!(due_today.days_until_due, Some(0));

        let seven = DebtSummary::for_client(&client("2", -1, 23), now(), &policy).unwrap();
        assert_eq!(seven.status, DebtStatus::DueSoon);

        let eight = DebtSummary::for_client(&client("3", -1, 22), now(), &policy).unwrap();
        assert_eq!(eight.status, DebtStatus::Current);
        assert_eq!(eight.days_until_due, Some(8));
    }

    #[test]
    fn test_partial_day_rounds_up() {
        let mut c = client("1", -1, 35);
        c.created_at = c.created_at + Duration::hours(12); // 4.5 days late
        let s = DebtSummary::for_client(&c, now(), &CreditPolicy::default()).unwrap();
        assert_eq!(s.days_past_due, Some(5));
    }

    #[test]
    fn test_clients_without_debt_are_skipped() {
        let clients = vec![client("1", 0, 40), client("2", 5_000, 40)];
        assert!(summarize_debts(&clients, now(), &CreditPolicy::default()).is_empty());
    }

    #[test]
    fn test_sorted_by_urgency_stable_within_group() {
        let clients = vec![
            client("cur-1", -100, 1),
            client("soon-1", -100, 25),
            client("late-1", -100, 40),
            client("cur-2", -100, 2),
            client("late-2", -100, 31),
            client("soon-2", -100, 28),
        ];
        let ids: Vec<String> = summarize_debts(&clients, now(), &CreditPolicy::default())
            .into_iter()
            .map(|s| s.client_id)
            .collect();
        assert_eq!(ids, vec!["late-1", "late-2", "soon-1", "soon-2", "cur-1", "cur-2"]);
    }

    #[test]
    fn test_custom_window() {
        let policy = CreditPolicy { window_days: 15, due_soon_days: 3 };
        let s = DebtSummary::for_client(&client("1", -100, 20), now(), &policy).unwrap();
        assert_eq!(s.status, DebtStatus::Overdue);
        assert_eq!(s.days_past_due, Some(5));
    }

    #[test]
    fn test_report_totals() {
        let clients = vec![
            client("a", -10_000, 40),
            client("b", -2_500, 26),
            client("c", -1_000, 3),
            client("d", 4_000, 3),
        ];
        let report = DebtReport::build(&clients, now(), &CreditPolicy::default());
        assert_eq!(report.summaries.len(), 3);
        assert_eq!(report.total_debt.cents(), 13_500);
        assert_eq!(report.overdue_total.cents(), 10_000);
        assert_eq!(report.due_soon_total.cents(), 2_500);
        assert_eq!(report.current_total.cents(), 1_000);
        assert_eq!(report.overdue_count, 1);
        assert_eq!(report.due_soon_count, 1);

        let json = serde_json::to_value(&report.summaries[1]).unwrap();
        assert_eq!(json["status"], "due_soon");
    }
}
