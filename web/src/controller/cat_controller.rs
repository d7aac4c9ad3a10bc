use crate::controller::ApiResponse;
use crate::params::cat::{IndexParams, UpdateParams};
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{cat as CatApi, cats, Id, IntoUpdateMap};
use serde_json::json;

use log::*;

/// POST admit a new Cat
#[utoipa::path(
    post,
    path = "/cats",
    request_body = cats::Model,
    responses(
        (status = 201, description = "Successfully Created a New Cat", body = [cats::Model]),
        (status = 422, description = "Unprocessable Entity"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn create(
    State(app_state): State<AppState>,
    Json(cat_model): Json<cats::Model>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a New Cat from: {cat_model:?}");

    let cat = CatApi::create(app_state.db_conn_ref(), &app_state.event_sender, cat_model).await?;

    debug!("New Cat: {cat:?}");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED.into(), cat)),
    ))
}

/// GET a particular Cat specified by its id.
#[utoipa::path(
    get,
    path = "/cats/{id}",
    params(
        ("id" = Uuid, Path, description = "Cat id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a specific Cat by its id", body = [cats::Model]),
        (status = 404, description = "Cat not found"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn read(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Cat by id: {id}");

    let cat = CatApi::find_by_id(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), cat)))
}

/// PUT a partial update to a Cat.
#[utoipa::path(
    put,
    path = "/cats/{id}",
    params(
        ("id" = Uuid, Path, description = "Id of cat to update"),
    ),
    request_body = UpdateParams,
    responses(
        (status = 200, description = "Successfully Updated Cat", body = [cats::Model]),
        (status = 404, description = "Cat not found"),
        (status = 422, description = "Unprocessable Entity"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn update(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<UpdateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update Cat with id: {id}, params: {params:?}");

    let cat = CatApi::update(
        app_state.db_conn_ref(),
        &app_state.event_sender,
        id,
        params.into_update_map(),
    )
    .await?;

    debug!("Updated Cat: {cat:?}");

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), cat)))
}

#[utoipa::path(
    get,
    path = "/cats",
    params(IndexParams),
    responses(
        (status = 200, description = "Successfully retrieved all matching Cats", body = [cats::Model]),
        (status = 422, description = "Unprocessable Entity"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn index(
    State(app_state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET all Cats");
    debug!("Filter Params: {params:?}");

    let cats = CatApi::find_by(app_state.db_conn_ref(), params).await?;

    debug!("Found Cats: {cats:?}");

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), cats)))
}

/// DELETE a Cat.
#[utoipa::path(
    delete,
    path = "/cats/{id}",
    params(
        ("id" = Uuid, Path, description = "Cat id to delete")
    ),
    responses(
        (status = 200, description = "Successfully deleted a Cat"),
        (status = 404, description = "Cat not found"),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn delete(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE Cat by id: {id}");

    CatApi::delete_by_id(app_state.db_conn_ref(), &app_state.event_sender, id).await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        json!({"id": id, "status": "deleted"}),
    )))
}
