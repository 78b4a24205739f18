//! # Debt Report Command

use chrono::{DateTime, Utc};
use rueda_core::{DebtReport, Permission};
use tracing::debug;

use crate::error::CommandResult;
use crate::state::{ApiState, ConfigState, SessionState};

/// Clients that owe money, overdue first, with per-status totals.
pub async fn load_debt_report(
    api: &ApiState,
    session: &SessionState,
    config: &ConfigState,
) -> CommandResult<DebtReport> {
    load_debt_report_at(api, session, config, Utc::now()).await
}

pub async fn load_debt_report_at(
    api: &ApiState,
    session: &SessionState,
    config: &ConfigState,
    now: DateTime<Utc>,
) -> CommandResult<DebtReport> {
    debug!("load_debt_report command");
    session.require(Permission::ManageClients).await?;

    let clients = api.clients().await?;
    Ok(DebtReport::build(&clients, now, &config.credit_policy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{app_with, log_in};
    use axum::routing::get;
    use axum::{Json, Router};
    use chrono::Duration;
    use rueda_core::{DebtStatus, Money, Role};
    use serde_json::json;

    #[tokio::test]
    async fn test_report_classifies_and_orders() {
        let now = Utc::now();
        let created = |days: i64| (now - Duration::days(days)).to_rfc3339();
        let clients = json!([
            {"id": 1, "name": "Al día", "balance": -50, "createdAt": created(2)},
            {"id": 2, "name": "Por vencer", "balance": -500, "createdAt": created(25)},
            {"id": 3, "name": "Sin deuda", "balance": 0, "createdAt": created(90)},
            {"id": 4, "name": "Vencido", "balance": -1000, "createdAt": created(35)},
        ]);
        let app = app_with(Router::new().route(
            "/clients",
            get(move || {
                let clients = clients.clone();
                async move { Json(clients) }
            }),
        ))
        .await;
        log_in(&app, Role::Cashier).await;

        let report = load_debt_report_at(&app.api, &app.session, &app.config, now)
            .await
            .unwrap();

        let order: Vec<(&str, DebtStatus)> = report
            .summaries
            .iter()
            .map(|s| (s.client_name.as_str(), s.status))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Vencido", DebtStatus::Overdue),
                ("Por vencer", DebtStatus::DueSoon),
                ("Al día", DebtStatus::Current),
            ]
        );
        assert_eq!(report.summaries[0].days_past_due, Some(5));
        assert_eq!(report.summaries[1].days_until_due, Some(5));
        assert_eq!(report.total_debt, Money::from_cents(155_000));
    }

    #[tokio::test]
    async fn test_report_requires_login() {
        let app = app_with(Router::new()).await;
        assert!(load_debt_report(&app.api, &app.session, &app.config).await.is_err());
    }
}
