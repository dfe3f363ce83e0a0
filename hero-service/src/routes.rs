//! HTTP routes
//!
//! Thin axum handlers: extract, delegate to [`HeroHandler`](crate::handlers::HeroHandler),
//! log successes with the request id. Failures carry the id into
//! [`ApiError`], which logs them once when rendered.

use axum::{
    body::Bytes,
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::get,
    Json, Router,
};

use crate::handlers::{ApiError, ApiOperation, CollectionHandler, ListQuery, ListResponse};
use crate::health;
use crate::middleware::CurrentRequestId;
use crate::models::{Hero, HeroChanges, HeroStory, NewHero};
use crate::responses::{Created, NoContent};
use crate::state::AppState;

/// Route table, without the middleware stack
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::info))
        .route("/health", get(health::health))
        .route("/ready", get(health::readiness))
        .route("/heroes", get(list_heroes).post(create_hero))
        .route(
            "/heroes/{id}",
            get(get_hero).patch(update_hero).delete(delete_hero),
        )
        .route("/heroes/{id}/story", get(hero_story))
        .with_state(state)
}

fn hero_id(
    path: Result<Path<i64>, PathRejection>,
    operation: ApiOperation,
) -> Result<i64, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|e| ApiError::from(e).with_operation(operation))
}

/// Partial update body; an absent body is an empty change set
fn parse_changes(body: &Bytes) -> Result<HeroChanges, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(HeroChanges::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        ApiError::invalid_input(
            ApiOperation::Update,
            format!("Failed to parse the request body as JSON: {}", e),
        )
    })
}

async fn list_heroes(
    State(state): State<AppState>,
    request_id: CurrentRequestId,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<ListResponse<Hero>, ApiError> {
    let result = async {
        let Query(query) = query?;
        let request = query.into_request()?;
        state.heroes().list(request).await
    }
    .await;

    let response = result.map_err(|e| e.with_request_id(request_id.to_string()))?;
    tracing::info!(
        request_id = %request_id,
        returned = response.len(),
        total = response.pagination.total_items,
        page = response.pagination.current_page,
        "Listed heroes"
    );
    Ok(response)
}

async fn get_hero(
    State(state): State<AppState>,
    request_id: CurrentRequestId,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Hero>, ApiError> {
    let result = async {
        let id = hero_id(path, ApiOperation::Get)?;
        state.heroes().get(id).await
    }
    .await;

    let hero = result.map_err(|e| e.with_request_id(request_id.to_string()))?;
    tracing::info!(request_id = %request_id, id = hero.id, "Fetched hero");
    Ok(Json(hero))
}

async fn create_hero(
    State(state): State<AppState>,
    request_id: CurrentRequestId,
    body: Result<Json<NewHero>, JsonRejection>,
) -> Result<Created<Hero>, ApiError> {
    let result = async {
        let Json(new_hero) = body?;
        state.heroes().create(new_hero).await
    }
    .await;

    let hero = result.map_err(|e| e.with_request_id(request_id.to_string()))?;
    tracing::info!(request_id = %request_id, id = hero.id, "Created hero");
    let location = format!("/heroes/{}", hero.id);
    Ok(Created::new(hero).with_location(location))
}

async fn update_hero(
    State(state): State<AppState>,
    request_id: CurrentRequestId,
    path: Result<Path<i64>, PathRejection>,
    body: Bytes,
) -> Result<Json<Hero>, ApiError> {
    let result = async {
        let id = hero_id(path, ApiOperation::Update)?;
        let changes = parse_changes(&body)?;
        state.heroes().update(id, changes).await
    }
    .await;

    let hero = result.map_err(|e| e.with_request_id(request_id.to_string()))?;
    tracing::info!(request_id = %request_id, id = hero.id, "Updated hero");
    Ok(Json(hero))
}

async fn delete_hero(
    State(state): State<AppState>,
    request_id: CurrentRequestId,
    path: Result<Path<i64>, PathRejection>,
) -> Result<NoContent, ApiError> {
    let result = async {
        let id = hero_id(path, ApiOperation::Delete)?;
        state.heroes().delete(id).await?;
        Ok::<_, ApiError>(id)
    }
    .await;

    let id = result.map_err(|e| e.with_request_id(request_id.to_string()))?;
    tracing::info!(request_id = %request_id, id, "Deleted hero");
    Ok(NoContent)
}

async fn hero_story(
    State(state): State<AppState>,
    request_id: CurrentRequestId,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<HeroStory>, ApiError> {
    let result = async {
        let id = hero_id(path, ApiOperation::Story)?;
        state.heroes().story(id).await
    }
    .await;

    let story = result.map_err(|e| e.with_request_id(request_id.to_string()))?;
    tracing::info!(request_id = %request_id, id = story.id, "Generated hero story");
    Ok(Json(story))
}
