//! appsync graphql client and codegen
//!
//! this crate provides a small, typed client for aws appsync graphql
//! apis plus a codegen engine that turns a schema and a set of
//! operation documents into typed rust bindings. start with [`Client`]
//! and [`ClientConfig`], then use `execute_raw` or `execute` for ad-hoc
//! queries. for generated operation wrappers, use the `appsync-codegen`
//! tool or call [`codegen::generate`] directly.
//!
//! ## quick start
//!
//! ```no_run
//! use appsync::{Client, ClientConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(ClientConfig::new(
//!     "https://example.appsync-api.us-east-1.amazonaws.com/graphql",
//!     "da2-api-key",
//! ))?;
//! let response = client
//!     .execute_raw("query { listTodos { items { id } } }", None)
//!     .await?;
//! println!("{:?}", response.data);
//! # Ok(())
//! # }
//! ```
//!
//! ## generated bindings
//!
//! `appsync-codegen` reads a schema and a directory of operation
//! documents and emits one rust module per named operation, each with a
//! `Response` tree, a `Request` struct, and an `execute` wrapper bound
//! to a generic transport implemented by [`Client`].

mod client;
pub mod codegen;
mod config;
mod error;
mod graphql;
mod operation;

pub use client::Client;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use graphql::{GraphQlError, GraphQlLocation, GraphQlResponse};
pub use operation::Operation;
