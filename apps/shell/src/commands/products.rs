//! # Product Commands
//!
//! Inventory reads and writes.
//!
//! ## Write Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product Mutation Flow                                │
//! │                                                                         │
//! │  create_product(input)                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  session.require(ManageInventory) ── no ──► UNAUTHORIZED / DENIED       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  input.validate() ── bad name/SKU/price ──► VALIDATION_ERROR            │
//! │       │                                       (nothing sent)            │
//! │       ▼                                                                 │
//! │  POST /products                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  invalidate("products") ── next list/dashboard refetches                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rueda_api::keys;
use rueda_core::{Permission, Product, ProductInput};
use tracing::{debug, info};

use crate::error::{CommandError, CommandResult};
use crate::state::{ApiState, SessionState};

const DEFAULT_SEARCH_LIMIT: usize = 20;
const MAX_SEARCH_LIMIT: usize = 100;

/// All products, as cached.
pub async fn list_products(api: &ApiState) -> CommandResult<Vec<Product>> {
    debug!("list_products command");
    Ok(api.products().await?)
}

/// Searches the cached catalogue by SKU, name, brand or model.
///
/// ## Behavior
/// - An exact SKU match (case-insensitive) is returned alone, so a scanned
///   code lands on one product
/// - Otherwise every active product whose fields contain the query
/// - `limit` defaults to 20 and is capped at 100
pub async fn search_products(
    api: &ApiState,
    query: &str,
    limit: Option<usize>,
) -> CommandResult<Vec<Product>> {
    let query = query.trim().to_lowercase();
    let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT).min(MAX_SEARCH_LIMIT);
    debug!(query = %query, limit, "search_products command");

    let products = api.products().await?;

    if let Some(exact) = products
        .iter()
        .find(|p| p.is_active && p.sku.to_lowercase() == query)
    {
        return Ok(vec![exact.clone()]);
    }

    let matches = |p: &Product| {
        [Some(&p.sku), Some(&p.name), p.brand.as_ref(), p.model.as_ref()]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&query))
    };

    Ok(products
        .into_iter()
        .filter(|p| p.is_active && matches(p))
        .take(limit)
        .collect())
}

pub async fn get_product(api: &ApiState, id: &str) -> CommandResult<Product> {
    debug!(id = %id, "get_product command");
    api.client()
        .get_product(id)
        .await
        .map_err(|e| CommandError::from_lookup(e, "Product", id))
}

pub async fn create_product(
    api: &ApiState,
    session: &SessionState,
    input: &ProductInput,
) -> CommandResult<Product> {
    debug!(sku = %input.sku, "create_product command");
    session.require(Permission::ManageInventory).await?;
    input.validate()?;

    let product = api.client().create_product(input).await?;
    api.invalidate(&[keys::PRODUCTS]);

    info!(id = %product.id, sku = %product.sku, "Product created");
    Ok(product)
}

pub async fn update_product(
    api: &ApiState,
    session: &SessionState,
    id: &str,
    input: &ProductInput,
) -> CommandResult<Product> {
    debug!(id = %id, "update_product command");
    session.require(Permission::ManageInventory).await?;
    input.validate()?;

    let product = api
        .client()
        .update_product(id, input)
        .await
        .map_err(|e| CommandError::from_lookup(e, "Product", id))?;
    api.invalidate(&[keys::PRODUCTS]);
    Ok(product)
}

pub async fn delete_product(api: &ApiState, session: &SessionState, id: &str) -> CommandResult<()> {
    debug!(id = %id, "delete_product command");
    session.require(Permission::ManageInventory).await?;

    api.client()
        .delete_product(id)
        .await
        .map_err(|e| CommandError::from_lookup(e, "Product", id))?;
    api.invalidate(&[keys::PRODUCTS]);

    info!(id = %id, "Product deleted");
    Ok(())
}

/// Asks the backend for a fresh SKU. The old one stops matching searches.
pub async fn regenerate_sku(api: &ApiState, session: &SessionState, id: &str) -> CommandResult<Product> {
    debug!(id = %id, "regenerate_sku command");
    session.require(Permission::ManageInventory).await?;

    let product = api
        .client()
        .regenerate_sku(id)
        .await
        .map_err(|e| CommandError::from_lookup(e, "Product", id))?;
    api.invalidate(&[keys::PRODUCTS]);

    info!(id = %id, sku = %product.sku, "SKU regenerated");
    Ok(product)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::test_support::{app_with, log_in, product_json};
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use rueda_core::{Money, Role};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Backend {
        list_calls: Arc<AtomicUsize>,
        created: Arc<Mutex<Vec<Value>>>,
    }

    fn backend(state: Backend) -> Router {
        Router::new()
            .route(
                "/products",
                get(|State(b): State<Backend>| async move {
                    b.list_calls.fetch_add(1, Ordering::SeqCst);
                    let mut inactive = product_json("4", "Casco retirado", 40.0, 1);
                    inactive["isActive"] = json!(false);
                    Json(json!([
                        product_json("1", "Casco LS2 Rapid", 85.5, 4),
                        product_json("2", "Cadena KMC 116L", 12.0, 10),
                        product_json("3", "Casco infantil", 25.0, 6),
                        inactive,
                    ]))
                })
                .post(|State(b): State<Backend>, Json(body): Json<Value>| async move {
                    b.created.lock().unwrap().push(body.clone());
                    let mut product = body;
                    product["id"] = json!(77);
                    Json(product)
                }),
            )
            .route(
                "/products/{id}",
                get(|Path(id): Path<String>| async move {
                    if id == "1" {
                        Ok(Json(product_json("1", "Casco LS2 Rapid", 85.5, 4)))
                    } else {
                        Err(StatusCode::NOT_FOUND)
                    }
                })
                .delete(|Path(id): Path<String>| async move {
                    if id == "1" {
                        StatusCode::NO_CONTENT
                    } else {
                        StatusCode::NOT_FOUND
                    }
                }),
            )
            .route(
                "/products/{id}/regenerate-sku",
                post(|Path(id): Path<String>| async move {
                    let mut product = product_json(&id, "Casco LS2 Rapid", 85.5, 4);
                    product["sku"] = json!("CAS-LS2-0042");
                    Json(product)
                }),
            )
            .with_state(state)
    }

    fn input() -> ProductInput {
        ProductInput {
            name: "Pastillas Shimano".to_string(),
            sku: "FRE-SHI-M315".to_string(),
            sale_price: Money::from_cents(1_550),
            cost_price: Money::from_cents(900),
            current_stock: 12,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_search() {
        let app = app_with(backend(Backend::default())).await;

        let names: Vec<String> = search_products(&app.api, "casco", None)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Casco LS2 Rapid", "Casco infantil"]);

        let exact = search_products(&app.api, "sku-2", None).await.unwrap();
        assert_eq!(exact.len(), 1);
        assert_eq!(exact[0].id, "2");

        let limited = search_products(&app.api, "c", Some(1)).await.unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn test_create_validates_and_invalidates() {
        let state = Backend::default();
        let app = app_with(backend(state.clone())).await;
        log_in(&app, Role::Technician).await;

        list_products(&app.api).await.unwrap();
        list_products(&app.api).await.unwrap();
        assert_eq!(state.list_calls.load(Ordering::SeqCst), 1);

        let mut bad = input();
        bad.sku = "has space".to_string();
        let err = create_product(&app.api, &app.session, &bad).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(state.created.lock().unwrap().is_empty());

        let product = create_product(&app.api, &app.session, &input()).await.unwrap();
        assert_eq!(product.id, "77");
        assert_eq!(product.sale_price, Money::from_cents(1_550));
        assert_eq!(state.created.lock().unwrap()[0]["salePrice"], 15.5);

        list_products(&app.api).await.unwrap();
        assert_eq!(state.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cashier_cannot_edit_inventory() {
        let state = Backend::default();
        let app = app_with(backend(state.clone())).await;
        log_in(&app, Role::Cashier).await;

        let err = create_product(&app.api, &app.session, &input()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);
        assert_eq!(err.message, "cashier users cannot manage inventory");
        assert!(state.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_delete_and_regenerate() {
        let app = app_with(backend(Backend::default())).await;
        log_in(&app, Role::Manager).await;

        assert_eq!(get_product(&app.api, "1").await.unwrap().name, "Casco LS2 Rapid");
        let err = get_product(&app.api, "9").await.unwrap_err();
        assert_eq!(err.message, "Product not found: 9");

        delete_product(&app.api, &app.session, "1").await.unwrap();
        let err = delete_product(&app.api, &app.session, "9").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let product = regenerate_sku(&app.api, &app.session, "1").await.unwrap();
        assert_eq!(product.sku, "CAS-LS2-0042");
    }
}
