//! # Backend Endpoints
//!
//! ```text
//! /auth                            POST   login
//! /products                        GET    POST
//! /products/{id}                   GET    PUT    DELETE
//! /products/{id}/regenerate-sku    POST
//! /sales                           GET    POST
//! /sale_items                      GET
//! /clients                         GET    POST
//! /clients/{id}                    GET    PUT    DELETE
//! /clients/{id}/credits            GET    POST
//! /categories                      GET    POST
//! /categories/{id}                 PUT    DELETE
//! ```

use rueda_core::cart::CheckoutRequest;
use rueda_core::{
    Category, CategoryInput, Client, ClientInput, Credit, CreditInput, Product, ProductInput, Sale,
    SaleItem, User,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::http::HttpClient;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

impl HttpClient {
    // ========== Auth ==========

    /// Authenticates against `/auth` and stores the returned token on success.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<LoginResponse> {
        let response: LoginResponse = self
            .post("auth", &LoginRequest { username, password })
            .await?;
        self.set_token(Some(response.token.clone()));
        Ok(response)
    }

    pub fn logout(&self) {
        self.set_token(None);
    }

    // ========== Products ==========

    pub async fn list_products(&self) -> ApiResult<Vec<Product>> {
        self.get("products").await
    }

    pub async fn get_product(&self, id: &str) -> ApiResult<Product> {
        self.get(&format!("products/{}", id)).await
    }

    pub async fn create_product(&self, input: &ProductInput) -> ApiResult<Product> {
        self.post("products", input).await
    }

    pub async fn update_product(&self, id: &str, input: &ProductInput) -> ApiResult<Product> {
        self.put(&format!("products/{}", id), input).await
    }

    pub async fn delete_product(&self, id: &str) -> ApiResult<()> {
        self.delete(&format!("products/{}", id)).await
    }

    pub async fn regenerate_sku(&self, id: &str) -> ApiResult<Product> {
        self.post_empty(&format!("products/{}/regenerate-sku", id)).await
    }

    // ========== Sales ==========

    pub async fn list_sales(&self) -> ApiResult<Vec<Sale>> {
        self.get("sales").await
    }

    pub async fn create_sale(&self, request: &CheckoutRequest) -> ApiResult<Sale> {
        self.post("sales", request).await
    }

    pub async fn list_sale_items(&self) -> ApiResult<Vec<SaleItem>> {
        self.get("sale_items").await
    }

    // ========== Clients ==========

    pub async fn list_clients(&self) -> ApiResult<Vec<Client>> {
        self.get("clients").await
    }

    pub async fn get_client(&self, id: &str) -> ApiResult<Client> {
        self.get(&format!("clients/{}", id)).await
    }

    pub async fn create_client(&self, input: &ClientInput) -> ApiResult<Client> {
        self.post("clients", input).await
    }

    pub async fn update_client(&self, id: &str, input: &ClientInput) -> ApiResult<Client> {
        self.put(&format!("clients/{}", id), input).await
    }

    pub async fn delete_client(&self, id: &str) -> ApiResult<()> {
        self.delete(&format!("clients/{}", id)).await
    }

    pub async fn list_credits(&self, client_id: &str) -> ApiResult<Vec<Credit>> {
        self.get(&format!("clients/{}/credits", client_id)).await
    }

    /// Records a balance movement. The backend applies it to the client balance.
    pub async fn create_credit(&self, client_id: &str, input: &CreditInput) -> ApiResult<Credit> {
        self.post(&format!("clients/{}/credits", client_id), input).await
    }

    // ========== Categories ==========

    pub async fn list_categories(&self) -> ApiResult<Vec<Category>> {
        self.get("categories").await
    }

    pub async fn create_category(&self, input: &CategoryInput) -> ApiResult<Category> {
        self.post("categories", input).await
    }

    pub async fn update_category(&self, id: &str, input: &CategoryInput) -> ApiResult<Category> {
        self.put(&format!("categories/{}", id), input).await
    }

    pub async fn delete_category(&self, id: &str) -> ApiResult<()> {
        self.delete(&format!("categories/{}", id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{client_for, spawn_backend};
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::routing::{delete, get, post};
    use axum::{Json, Router};
    use rueda_core::{Money, PaymentMethod};
    use serde_json::{json, Value};

    fn backend() -> Router {
        Router::new()
            .route(
                "/auth",
                post(|Json(body): Json<Value>| async move {
                    if body["password"] == "correcta" {
                        (
                            StatusCode::OK,
                            Json(json!({
                                "token": "tok-1",
                                "user": {"id": 1, "username": body["username"], "role": "cashier"}
                            })),
                        )
                    } else {
                        (StatusCode::UNAUTHORIZED, Json(json!({"error": "invalid credentials"})))
                    }
                }),
            )
            .route(
                "/products",
                get(|| async {
                    Json(json!([
                        {"id": 1, "name": "Casco LS2", "sku": "CAS-LS2", "salePrice": 85.5,
                         "costPrice": 60, "currentStock": 4},
                        {"id": "2", "name": "Cadena KMC", "sku": "CAD-KMC", "salePrice": 12,
                         "currentStock": 0, "minStock": 3}
                    ]))
                }),
            )
            .route(
                "/products/{id}/regenerate-sku",
                post(|Path(id): Path<String>| async move {
                    Json(json!({"id": id, "name": "Casco LS2", "sku": "CAS-LS2-0042",
                                "salePrice": 85.5, "currentStock": 4}))
                }),
            )
            .route("/products/{id}", delete(|| async { StatusCode::NO_CONTENT }))
            .route(
                "/sales",
                post(|Json(body): Json<Value>| async move {
                    Json(json!({
                        "id": 99,
                        "clientId": body["clientId"],
                        "subtotal": body["subtotal"],
                        "discount": body["discount"],
                        "total": body["total"],
                        "paymentMethod": body["paymentMethod"],
                        "status": "completed",
                        "createdAt": "2026-05-20T15:00:00Z"
                    }))
                }),
            )
            .route(
                "/clients/{id}/credits",
                get(|Path(id): Path<String>| async move {
                    Json(json!([{"id": 5, "clientId": id, "amount": 20.0, "kind": "payment",
                                 "createdAt": "2026-05-01T12:00:00Z"}]))
                }),
            )
    }

    #[tokio::test]
    async fn test_login_stores_token() {
        let base = spawn_backend(backend()).await;
        let client = client_for(&base, 0);

        let response = client.login("maria", "correcta").await.unwrap();
        assert_eq!(response.user.username, "maria");
        assert_eq!(client.token().as_deref(), Some("tok-1"));

        client.logout();
        assert!(client.token().is_none());
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let base = spawn_backend(backend()).await;
        let client = client_for(&base, 0);

        let err = client.login("maria", "incorrecta").await.unwrap_err();
        assert!(err.is_unauthorized());
        assert!(client.token().is_none());
    }

    #[tokio::test]
    async fn test_list_products_decodes_backend_shapes() {
        let base = spawn_backend(backend()).await;
        let products = client_for(&base, 0).list_products().await.unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, "1");
        assert_eq!(products[0].sale_price, Money::from_cents(8_550));
        assert_eq!(products[1].min_stock, Some(3));
        assert!(products[1].cost_price.is_zero());
    }

    #[tokio::test]
    async fn test_regenerate_sku_and_delete() {
        let base = spawn_backend(backend()).await;
        let client = client_for(&base, 0);

        let product = client.regenerate_sku("7").await.unwrap();
        assert_eq!(product.sku, "CAS-LS2-0042");
        client.delete_product("7").await.unwrap();
    }

    #[tokio::test]
    async fn test_create_sale_posts_decimal_amounts() {
        let base = spawn_backend(backend()).await;
        let client = client_for(&base, 0);

        let mut cart = rueda_core::Cart::new();
        let product = client.list_products().await.unwrap().remove(0);
        cart.add_item(&product).unwrap();
        let request = cart.checkout_request(PaymentMethod::Card).unwrap();

        let sale = client.create_sale(&request).await.unwrap();
        assert_eq!(sale.id, "99");
        assert_eq!(sale.total, Money::from_cents(8_550));
        assert_eq!(sale.payment_method, PaymentMethod::Card);
    }

    #[tokio::test]
    async fn test_list_credits() {
        let base = spawn_backend(backend()).await;
        let credits = client_for(&base, 0).list_credits("12").await.unwrap();
        assert_eq!(credits.len(), 1);
        assert_eq!(credits[0].client_id, "12");
        assert_eq!(credits[0].balance_effect(), Money::from_cents(2_000));
    }
}
