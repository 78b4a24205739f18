//! # Category Commands

use rueda_api::keys;
use rueda_core::{Category, CategoryInput, Permission};
use tracing::{debug, info};

use crate::error::{CommandError, CommandResult};
use crate::state::{ApiState, SessionState};

pub async fn list_categories(api: &ApiState) -> CommandResult<Vec<Category>> {
    debug!("list_categories command");
    Ok(api.categories().await?)
}

pub async fn create_category(
    api: &ApiState,
    session: &SessionState,
    input: &CategoryInput,
) -> CommandResult<Category> {
    debug!(name = %input.name, "create_category command");
    session.require(Permission::ManageInventory).await?;
    input.validate()?;

    let category = api.client().create_category(input).await?;
    api.invalidate(&[keys::CATEGORIES]);

    info!(id = %category.id, name = %category.name, "Category created");
    Ok(category)
}

pub async fn update_category(
    api: &ApiState,
    session: &SessionState,
    id: &str,
    input: &CategoryInput,
) -> CommandResult<Category> {
    debug!(id = %id, "update_category command");
    session.require(Permission::ManageInventory).await?;
    input.validate()?;

    let category = api
        .client()
        .update_category(id, input)
        .await
        .map_err(|e| CommandError::from_lookup(e, "Category", id))?;
    api.invalidate(&[keys::CATEGORIES]);
    Ok(category)
}

/// Products keep their category name; only the category record goes away.
pub async fn delete_category(api: &ApiState, session: &SessionState, id: &str) -> CommandResult<()> {
    debug!(id = %id, "delete_category command");
    session.require(Permission::ManageInventory).await?;

    api.client()
        .delete_category(id)
        .await
        .map_err(|e| CommandError::from_lookup(e, "Category", id))?;
    api.invalidate(&[keys::CATEGORIES]);

    info!(id = %id, "Category deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::test_support::{app_with, log_in};
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::routing::{get, put};
    use axum::{Json, Router};
    use rueda_core::Role;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    #[derive(Clone)]
    struct Categories(Arc<Mutex<Vec<Value>>>);

    fn backend(state: Categories) -> Router {
        Router::new()
            .route(
                "/categories",
                get(|State(c): State<Categories>| async move {
                    Json(Value::Array(c.0.lock().unwrap().clone()))
                })
                .post(|State(c): State<Categories>, Json(mut body): Json<Value>| async move {
                    let mut list = c.0.lock().unwrap();
                    body["id"] = json!(list.len() + 1);
                    list.push(body.clone());
                    Json(body)
                }),
            )
            .route(
                "/categories/{id}",
                put(|Path(id): Path<String>, Json(mut body): Json<Value>| async move {
                    if id != "1" {
                        return Err(StatusCode::NOT_FOUND);
                    }
                    body["id"] = json!(id);
                    Ok(Json(body))
                })
                .delete(|State(c): State<Categories>, Path(id): Path<String>| async move {
                    let mut list = c.0.lock().unwrap();
                    let before = list.len();
                    list.retain(|v| v["id"].to_string() != id);
                    if list.len() == before {
                        StatusCode::NOT_FOUND
                    } else {
                        StatusCode::NO_CONTENT
                    }
                }),
            )
            .with_state(state)
    }

    fn input(name: &str) -> CategoryInput {
        CategoryInput {
            name: name.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_category_lifecycle() {
        let app = app_with(backend(Categories(Arc::default()))).await;
        log_in(&app, Role::Admin).await;

        assert!(list_categories(&app.api).await.unwrap().is_empty());

        let created = create_category(&app.api, &app.session, &input("Frenos")).await.unwrap();
        assert_eq!(created.id, "1");
        // the create invalidated the cached empty list
        assert_eq!(list_categories(&app.api).await.unwrap().len(), 1);

        let updated = update_category(&app.api, &app.session, "1", &input("Frenos y guayas"))
            .await
            .unwrap();
        assert_eq!(updated.name, "Frenos y guayas");

        delete_category(&app.api, &app.session, "1").await.unwrap();
        assert!(list_categories(&app.api).await.unwrap().is_empty());

        let err = delete_category(&app.api, &app.session, "1").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let app = app_with(backend(Categories(Arc::default()))).await;
        log_in(&app, Role::Technician).await;

        let err = create_category(&app.api, &app.session, &input("  ")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "name is required");
    }
}
