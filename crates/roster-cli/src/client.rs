//! Async HTTP client wrapping the roster JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use roster_core::{
  person::{NewPerson, PersonDetails, PersonId, UpdatePerson},
  validation::ValidationReport,
};
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;

/// The server refused a write because the payload failed validation.
#[derive(Debug, Error)]
#[error("rejected: {0}")]
pub struct Rejected(pub ValidationReport);

#[derive(Deserialize)]
struct RejectedBody {
  errors: ValidationReport,
}

#[derive(Deserialize)]
struct CreatedBody {
  id: PersonId,
}

/// Async HTTP client for the roster JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client:   Client,
  base_url: String,
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, base_url: base_url.into() })
  }

  pub fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.base_url.trim_end_matches('/'), path)
  }

  async fn send(&self, req: RequestBuilder, what: &str) -> Result<Response> {
    let resp = req.send().await.with_context(|| format!("{what} failed"))?;
    match resp.status() {
      s if s.is_success() => Ok(resp),
      StatusCode::BAD_REQUEST => {
        let body: RejectedBody = resp
          .json()
          .await
          .context("deserialising validation errors")?;
        Err(Rejected(body.errors).into())
      }
      s => {
        let text = resp.text().await.unwrap_or_default();
        Err(anyhow!("{what} → {s}: {text}"))
      }
    }
  }

  async fn json<T: DeserializeOwned>(&self, req: RequestBuilder, what: &str) -> Result<T> {
    self
      .send(req, what)
      .await?
      .json()
      .await
      .with_context(|| format!("deserialising response to {what}"))
  }

  /// `GET /api/people`
  pub async fn list(&self) -> Result<Vec<PersonDetails>> {
    self.json(self.client.get(self.url("/people")), "GET /people").await
  }

  /// `GET /api/people/{id}`; `None` on 404.
  pub async fn get(&self, id: PersonId) -> Result<Option<PersonDetails>> {
    let resp = self
      .client
      .get(self.url(&format!("/people/{id}")))
      .send()
      .await
      .with_context(|| format!("GET /people/{id} failed"))?;
    if resp.status() == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    if !resp.status().is_success() {
      return Err(anyhow!("GET /people/{id} → {}", resp.status()));
    }
    resp.json().await.map(Some).context("deserialising person")
  }

  /// `GET /api/people/search?term=...`
  pub async fn search(&self, term: &str) -> Result<Vec<PersonDetails>> {
    let req = self
      .client
      .get(self.url("/people/search"))
      .query(&[("term", term)]);
    self.json(req, "GET /people/search").await
  }

  /// `PUT /api/people`: returns the assigned id.
  pub async fn create(&self, person: &NewPerson) -> Result<PersonId> {
    let req = self.client.put(self.url("/people")).json(person);
    let created: CreatedBody = self.json(req, "PUT /people").await?;
    Ok(created.id)
  }

  /// `POST /api/people`
  pub async fn update(&self, person: &UpdatePerson) -> Result<()> {
    let req = self.client.post(self.url("/people")).json(person);
    self.send(req, "POST /people").await?;
    Ok(())
  }

  /// `DELETE /api/people/{id}`
  pub async fn delete(&self, id: PersonId) -> Result<bool> {
    let req = self.client.delete(self.url(&format!("/people/{id}")));
    self.json(req, &format!("DELETE /people/{id}")).await
  }
}
