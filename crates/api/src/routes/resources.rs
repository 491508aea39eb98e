//! CRUD endpoints shared by every entity type.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use common::EntityId;
use domain::Entity;

use crate::controller::ResourceController;
use crate::error::ApiError;
use crate::hypermedia::{CollectionModel, EntityModel, Hal};

type Controller<E> = State<Arc<ResourceController<E>>>;

/// Routes `/{collection}` and `/{collection}/{id}` to the controller.
pub fn resource_router<E: Entity>(controller: Arc<ResourceController<E>>) -> Router {
    let collection = format!("/{}", E::COLLECTION);
    let item = format!("/{}/{{id}}", E::COLLECTION);

    Router::new()
        .route(&collection, get(list::<E>).post(create::<E>))
        .route(
            &item,
            get(get_one::<E>).put(replace::<E>).delete(delete::<E>),
        )
        .with_state(controller)
}

/// GET /{collection} — every entity, each with its own links.
pub async fn list<E: Entity>(
    State(controller): Controller<E>,
) -> Result<Hal<CollectionModel<E>>, ApiError> {
    Ok(Hal(controller.list().await?))
}

/// POST /{collection} — create under a store-assigned identifier.
pub async fn create<E: Entity>(
    State(controller): Controller<E>,
    Json(payload): Json<E>,
) -> Result<Response, ApiError> {
    let model = controller.create(payload).await?;
    Ok(created(model))
}

/// GET /{collection}/{id} — one entity, or 404.
pub async fn get_one<E: Entity>(
    State(controller): Controller<E>,
    Path(id): Path<EntityId>,
) -> Result<Hal<EntityModel<E>>, ApiError> {
    Ok(Hal(controller.get(id).await?))
}

/// PUT /{collection}/{id} — replace, or create under `id` when absent.
pub async fn replace<E: Entity>(
    State(controller): Controller<E>,
    Path(id): Path<EntityId>,
    Json(payload): Json<E>,
) -> Result<Response, ApiError> {
    let model = controller.replace(id, payload).await?;
    Ok(created(model))
}

/// DELETE /{collection}/{id} — always 204, whether or not the entity existed.
pub async fn delete<E: Entity>(
    State(controller): Controller<E>,
    Path(id): Path<EntityId>,
) -> Result<StatusCode, ApiError> {
    controller.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// 201 with Location set to the resource's self link.
fn created<E: Entity>(model: EntityModel<E>) -> Response {
    let location = model.links.self_href().unwrap_or_default().to_string();
    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Hal(model),
    )
        .into_response()
}
