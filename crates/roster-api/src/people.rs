//! Handlers for `/people` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/people` | Every person |
//! | `GET`    | `/people/search` | `?term=`; a missing or blank term returns everyone |
//! | `GET`    | `/people/:id` | 404 if not found |
//! | `PUT`    | `/people` | Body: [`NewPerson`]; returns 201 + `{"id": n}` |
//! | `POST`   | `/people` | Body: [`UpdatePerson`]; returns 204 |
//! | `DELETE` | `/people/:id` | Returns `true`, or `false` if there was nothing to delete |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use roster_core::{
  person::{NewPerson, PersonDetails, PersonId, UpdatePerson},
  service::PeopleService,
  store::PeopleStore,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

type Service<S> = State<Arc<PeopleService<S>>>;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /people`
pub async fn list<S>(
  State(service): Service<S>,
) -> Result<Json<Vec<PersonDetails>>, ApiError>
where
  S: PeopleStore,
{
  Ok(Json(service.list_all().await?))
}

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  #[serde(default)]
  pub term: String,
}

/// `GET /people/search[?term=...]`
pub async fn search<S>(
  State(service): Service<S>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<PersonDetails>>, ApiError>
where
  S: PeopleStore,
{
  Ok(Json(service.search(&params.term).await?))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /people/:id`
pub async fn get_one<S>(
  State(service): Service<S>,
  Path(id): Path<PersonId>,
) -> Result<Json<PersonDetails>, ApiError>
where
  S: PeopleStore,
{
  let person = service
    .find_by_id(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;
  Ok(Json(person))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// Body returned by `PUT /people`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Created {
  pub id: PersonId,
}

/// `PUT /people`: returns 201 + the assigned id.
pub async fn create<S>(
  State(service): Service<S>,
  Json(body): Json<NewPerson>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PeopleStore,
{
  let id = service.create(body).await?;
  Ok((StatusCode::CREATED, Json(Created { id })))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `POST /people`: replaces every field of the person named by `id`.
pub async fn update<S>(
  State(service): Service<S>,
  Json(body): Json<UpdatePerson>,
) -> Result<StatusCode, ApiError>
where
  S: PeopleStore,
{
  service.update(body).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /people/:id`
pub async fn delete<S>(
  State(service): Service<S>,
  Path(id): Path<PersonId>,
) -> Result<Json<bool>, ApiError>
where
  S: PeopleStore,
{
  Ok(Json(service.delete(id).await?))
}
