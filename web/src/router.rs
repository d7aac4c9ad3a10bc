use crate::controller::{
    cat_controller, dog_controller, dog_history_controller, health_check_controller,
};
use crate::{params, ws, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI document. To be a part
// of the rendered document, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Shelter Platform API"
        ),
        paths(
            health_check_controller::health_check,
            dog_controller::index,
            dog_controller::create,
            dog_controller::read,
            dog_controller::update,
            dog_controller::delete,
            dog_controller::details,
            dog_history_controller::index,
            cat_controller::index,
            cat_controller::create,
            cat_controller::read,
            cat_controller::update,
            cat_controller::delete,
        ),
        components(
            schemas(
                domain::dogs::Model,
                domain::cats::Model,
                domain::dog_history::Model,
                domain::animal_size::AnimalSize,
                domain::animal_status::AnimalStatus,
                params::dog::UpdateParams,
                params::cat::UpdateParams,
                params::sort::SortOrder,
            )
        ),
        tags(
            (name = "shelter_platform", description = "Animal Shelter Records & Live Statistics API")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(dog_routes(app_state.clone()))
        .merge(dog_history_routes(app_state.clone()))
        .merge(cat_routes(app_state.clone()))
        .merge(ws_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn dog_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/dogs", get(dog_controller::index))
        .route("/dogs", post(dog_controller::create))
        .route("/dogs/{id}", get(dog_controller::read))
        .route("/dogs/{id}", put(dog_controller::update))
        .route("/dogs/{id}", delete(dog_controller::delete))
        .route("/dogs/{id}/details", get(dog_controller::details))
        .with_state(app_state)
}

fn dog_history_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/dog-history/{id}", get(dog_history_controller::index))
        .with_state(app_state)
}

fn cat_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/cats", get(cat_controller::index))
        .route("/cats", post(cat_controller::create))
        .route("/cats/{id}", get(cat_controller::read))
        .route("/cats/{id}", put(cat_controller::update))
        .route("/cats/{id}", delete(cat_controller::delete))
        .with_state(app_state)
}

fn ws_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/ws/dogs", get(ws::handler::dogs))
        .route("/ws/cats", get(ws::handler::cats))
        .route("/ws/status", get(ws::handler::status))
        .with_state(app_state)
}
