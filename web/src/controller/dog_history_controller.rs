use crate::controller::ApiResponse;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{dog as DogApi, dog_history, Id};

use log::*;

/// GET the change history of a Dog, oldest change first.
#[utoipa::path(
    get,
    path = "/dog-history/{id}",
    params(
        ("id" = Uuid, Path, description = "Id of the dog whose history to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved the Dog's change history", body = [dog_history::Model]),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn index(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET change history for Dog: {id}");

    let history = DogApi::history(app_state.db_conn_ref(), id).await?;

    debug!("Found {} history record(s)", history.len());

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), history)))
}
