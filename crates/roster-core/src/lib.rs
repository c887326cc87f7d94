//! Core types, validation rules and the people service for Roster.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::PeopleStore`]; transports drive
//! [`service::PeopleService`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod memory;
pub mod person;
pub mod service;
pub mod store;
pub mod validation;

pub use error::{Error, Result};
pub use person::PersonId;
