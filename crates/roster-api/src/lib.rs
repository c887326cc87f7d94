//! JSON REST API for Roster.
//!
//! Exposes an axum [`Router`] backed by a [`PeopleService`] over any
//! [`roster_core::store::PeopleStore`]. Auth, TLS, and transport concerns are
//! the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", roster_api::api_router(service.clone()))
//! ```

pub mod error;
pub mod people;

use std::sync::Arc;

use axum::{Router, routing::get};
use roster_core::{service::PeopleService, store::PeopleStore};

pub use error::ApiError;

/// Build a fully-materialised API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: Arc<PeopleService<S>>) -> Router<()>
where
  S: PeopleStore + 'static,
{
  Router::new()
    .route(
      "/people",
      get(people::list::<S>)
        .put(people::create::<S>)
        .post(people::update::<S>),
    )
    .route("/people/search", get(people::search::<S>))
    .route(
      "/people/{id}",
      get(people::get_one::<S>).delete(people::delete::<S>),
    )
    .with_state(service)
}
