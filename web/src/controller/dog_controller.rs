use crate::controller::ApiResponse;
use crate::params::dog::{IndexParams, UpdateParams};
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{dog as DogApi, dogs, Id, IntoUpdateMap};
use serde_json::json;

use log::*;

/// POST admit a new Dog
#[utoipa::path(
    post,
    path = "/dogs",
    request_body = dogs::Model,
    responses(
        (status = 201, description = "Successfully Created a New Dog", body = [dogs::Model]),
        (status = 422, description = "Unprocessable Entity"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn create(
    State(app_state): State<AppState>,
    Json(dog_model): Json<dogs::Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a New Dog from: {dog_model:?}");

    let dog = DogApi::create(app_state.db_conn_ref(), &app_state.event_sender, dog_model).await?;

    debug!("New Dog: {dog:?}");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED.into(), dog)),
    ))
}

/// GET a particular Dog specified by its id.
#[utoipa::path(
    get,
    path = "/dogs/{id}",
    params(
        ("id" = Uuid, Path, description = "Dog id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a specific Dog by its id", body = [dogs::Model]),
        (status = 404, description = "Dog not found"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn read(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Dog by id: {id}");

    let dog = DogApi::find_by_id(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), dog)))
}

/// GET a Dog together with its change history.
#[utoipa::path(
    get,
    path = "/dogs/{id}/details",
    params(
        ("id" = Uuid, Path, description = "Dog id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved the Dog and its change history"),
        (status = 404, description = "Dog not found"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn details(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Dog details by id: {id}");

    let dog_with_history = DogApi::find_with_history(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        dog_with_history,
    )))
}

/// PUT a partial update to a Dog. Every changed field is recorded in its history.
#[utoipa::path(
    put,
    path = "/dogs/{id}",
    params(
        ("id" = Uuid, Path, description = "Id of dog to update"),
    ),
    request_body = UpdateParams,
    responses(
        (status = 200, description = "Successfully Updated Dog", body = [dogs::Model]),
        (status = 404, description = "Dog not found"),
        (status = 422, description = "Unprocessable Entity"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn update(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<UpdateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update Dog with id: {id}, params: {params:?}");

    let dog = DogApi::update(
        app_state.db_conn_ref(),
        &app_state.event_sender,
        id,
        params.into_update_map(),
    )
    .await?;

    debug!("Updated Dog: {dog:?}");

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), dog)))
}

#[utoipa::path(
    get,
    path = "/dogs",
    params(IndexParams),
    responses(
        (status = 200, description = "Successfully retrieved all matching Dogs", body = [dogs::Model]),
        (status = 422, description = "Unprocessable Entity"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn index(
    State(app_state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET all Dogs");
    debug!("Filter Params: {params:?}");

    let dogs = DogApi::find_by(app_state.db_conn_ref(), params).await?;

    debug!("Found Dogs: {dogs:?}");

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), dogs)))
}

/// DELETE a Dog and its change history.
#[utoipa::path(
    delete,
    path = "/dogs/{id}",
    params(
        ("id" = Uuid, Path, description = "Dog id to delete")
    ),
    responses(
        (status = 200, description = "Successfully deleted a Dog"),
        (status = 404, description = "Dog not found"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn delete(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE Dog by id: {id}");

    DogApi::delete_by_id(app_state.db_conn_ref(), &app_state.event_sender, id).await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        json!({"id": id, "status": "deleted"}),
    )))
}
