//! # Client Commands
//!
//! Client records and their balance movements.
//!
//! ## Balance Adjustment
//! ```text
//! adjust_balance(client, amount, kind)
//!    │
//!    ├── session.require(AdjustBalances)
//!    ├── amount > 0 ?  ── no ──► BUSINESS_LOGIC "Invalid balance adjustment: ..."
//!    ├── POST /clients/{id}/credits  { amount, kind, description }
//!    │        charge  ──► balance goes down (client owes more)
//!    │        payment ──► balance goes up
//!    └── invalidate "clients" (list + every credits/ history)
//! ```

use rueda_api::keys;
use rueda_core::{Client, ClientInput, CoreError, Credit, CreditInput, CreditKind, Money, Permission};
use tracing::{debug, info};

use crate::error::{CommandError, CommandResult};
use crate::state::{ApiState, SessionState};

/// All clients, as cached.
pub async fn list_clients(api: &ApiState) -> CommandResult<Vec<Client>> {
    debug!("list_clients command");
    Ok(api.clients().await?)
}

pub async fn get_client(api: &ApiState, id: &str) -> CommandResult<Client> {
    debug!(id = %id, "get_client command");
    api.client()
        .get_client(id)
        .await
        .map_err(|e| CommandError::from_lookup(e, "Client", id))
}

pub async fn create_client(
    api: &ApiState,
    session: &SessionState,
    input: &ClientInput,
) -> CommandResult<Client> {
    debug!(name = %input.name, "create_client command");
    session.require(Permission::ManageClients).await?;
    input.validate()?;

    let client = api.client().create_client(input).await?;
    api.invalidate(&[keys::CLIENTS]);

    info!(id = %client.id, document = %client.document_label(), "Client created");
    Ok(client)
}

pub async fn update_client(
    api: &ApiState,
    session: &SessionState,
    id: &str,
    input: &ClientInput,
) -> CommandResult<Client> {
    debug!(id = %id, "update_client command");
    session.require(Permission::ManageClients).await?;
    input.validate()?;

    let client = api
        .client()
        .update_client(id, input)
        .await
        .map_err(|e| CommandError::from_lookup(e, "Client", id))?;
    api.invalidate(&[keys::CLIENTS]);
    Ok(client)
}

pub async fn delete_client(api: &ApiState, session: &SessionState, id: &str) -> CommandResult<()> {
    debug!(id = %id, "delete_client command");
    session.require(Permission::ManageClients).await?;

    api.client()
        .delete_client(id)
        .await
        .map_err(|e| CommandError::from_lookup(e, "Client", id))?;
    api.invalidate(&[keys::CLIENTS]);

    info!(id = %id, "Client deleted");
    Ok(())
}

/// Records a charge or payment against a client's balance.
///
/// ## Errors
/// - `BUSINESS_LOGIC` when `amount` is zero or negative; nothing is sent
/// - `NOT_FOUND` for an unknown client
pub async fn adjust_balance(
    api: &ApiState,
    session: &SessionState,
    client_id: &str,
    amount: Money,
    kind: CreditKind,
    description: Option<String>,
) -> CommandResult<Credit> {
    debug!(client_id = %client_id, %amount, ?kind, "adjust_balance command");
    session.require(Permission::AdjustBalances).await?;

    let input = CreditInput {
        amount,
        kind,
        description: description.filter(|d| !d.trim().is_empty()),
    };
    input
        .validate()
        .map_err(|e| CoreError::InvalidBalanceAdjustment {
            reason: e.to_string(),
        })?;

    let credit = api
        .client()
        .create_credit(client_id, &input)
        .await
        .map_err(|e| CommandError::from_lookup(e, "Client", client_id))?;
    api.invalidate(&[keys::CLIENTS]);

    info!(client_id = %client_id, %amount, ?kind, "Balance adjusted");
    Ok(credit)
}

/// Balance movements of one client, newest first.
pub async fn list_credits(api: &ApiState, client_id: &str) -> CommandResult<Vec<Credit>> {
    debug!(client_id = %client_id, "list_credits command");
    let mut credits = api
        .credits(client_id)
        .await
        .map_err(|e| CommandError::from_lookup(e, "Client", client_id))?;
    credits.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(credits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::test_support::{app_with, log_in};
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use rueda_core::{DocumentType, Role};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    /// Fake backend keeping one client (id 5) and its credits.
    #[derive(Clone)]
    struct Ledger {
        balance: Arc<Mutex<f64>>,
        credits: Arc<Mutex<Vec<Value>>>,
    }

    impl Ledger {
        fn new(balance: f64) -> Self {
            Ledger {
                balance: Arc::new(Mutex::new(balance)),
                credits: Arc::default(),
            }
        }

        fn client_json(&self) -> Value {
            json!({
                "id": 5,
                "name": "Luis Pérez",
                "documentType": "V",
                "documentNumber": "18555444",
                "balance": *self.balance.lock().unwrap(),
                "createdAt": "2026-03-01T12:00:00Z"
            })
        }
    }

    fn backend(ledger: Ledger) -> Router {
        Router::new()
            .route(
                "/clients",
                get(|State(l): State<Ledger>| async move { Json(json!([l.client_json()])) })
                    .post(|Json(mut body): Json<Value>| async move {
                        body["id"] = json!(12);
                        body["balance"] = json!(0);
                        body["createdAt"] = json!("2026-05-20T15:00:00Z");
                        Json(body)
                    }),
            )
            .route(
                "/clients/{id}/credits",
                get(|State(l): State<Ledger>| async move {
                    Json(Value::Array(l.credits.lock().unwrap().clone()))
                })
                .post(
                    |State(l): State<Ledger>, Path(id): Path<String>, Json(body): Json<Value>| async move {
                        if id != "5" {
                            return Err(StatusCode::NOT_FOUND);
                        }
                        let amount = body["amount"].as_f64().unwrap_or_default();
                        let mut balance = l.balance.lock().unwrap();
                        match body["kind"].as_str() {
                            Some("charge") => *balance -= amount,
                            _ => *balance += amount,
                        }
                        let mut credits = l.credits.lock().unwrap();
                        let credit = json!({
                            "id": credits.len() + 1,
                            "clientId": 5,
                            "amount": amount,
                            "kind": body["kind"],
                            "description": body["description"],
                            "createdAt": format!("2026-05-2{}T10:00:00Z", credits.len()),
                        });
                        credits.push(credit.clone());
                        Ok(Json(credit))
                    },
                ),
            )
            .with_state(ledger)
    }

    #[tokio::test]
    async fn test_adjust_balance_updates_client() {
        let ledger = Ledger::new(-40.0);
        let app = app_with(backend(ledger.clone())).await;
        log_in(&app, Role::Manager).await;

        assert_eq!(list_clients(&app.api).await.unwrap()[0].balance, Money::from_cents(-4_000));

        let credit = adjust_balance(
            &app.api,
            &app.session,
            "5",
            Money::from_cents(2_500),
            CreditKind::Payment,
            Some("Abono en efectivo".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(credit.balance_effect(), Money::from_cents(2_500));

        // cache invalidated: the new balance shows up
        assert_eq!(list_clients(&app.api).await.unwrap()[0].balance, Money::from_cents(-1_500));

        adjust_balance(&app.api, &app.session, "5", Money::from_cents(1_000), CreditKind::Charge, None)
            .await
            .unwrap();
        let credits = list_credits(&app.api, "5").await.unwrap();
        assert_eq!(credits.len(), 2);
        assert_eq!(credits[0].kind, CreditKind::Charge);
        assert_eq!(credits[1].description.as_deref(), Some("Abono en efectivo"));
    }

    #[tokio::test]
    async fn test_adjust_balance_rules() {
        let ledger = Ledger::new(0.0);
        let app = app_with(backend(ledger.clone())).await;

        log_in(&app, Role::Cashier).await;
        let err = adjust_balance(&app.api, &app.session, "5", Money::from_cents(100), CreditKind::Payment, None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);

        log_in(&app, Role::Admin).await;
        let err = adjust_balance(&app.api, &app.session, "5", Money::zero(), CreditKind::Payment, None)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert_eq!(err.message, "Invalid balance adjustment: amount must be positive");

        let err = adjust_balance(&app.api, &app.session, "8", Money::from_cents(100), CreditKind::Charge, None)
            .await
            .unwrap_err();
        assert_eq!(err.message, "Client not found: 8");

        assert!(ledger.credits.lock().unwrap().is_empty());
        assert_eq!(*ledger.balance.lock().unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_create_client_validation() {
        let app = app_with(backend(Ledger::new(0.0))).await;
        log_in(&app, Role::Cashier).await;

        let mut input = ClientInput {
            name: "Rosa Díaz".to_string(),
            document_type: DocumentType::Venezuelan,
            document_number: "V-123".to_string(),
            email: Some("rosa@correo.com".to_string()),
            is_active: true,
            ..Default::default()
        };
        let err = create_client(&app.api, &app.session, &input).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        input.document_number = "21333444".to_string();
        let client = create_client(&app.api, &app.session, &input).await.unwrap();
        assert_eq!(client.id, "12");
        assert_eq!(client.document_label(), "V-21333444");
    }
}
