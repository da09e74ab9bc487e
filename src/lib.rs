//! Link local accounts to third-party OAuth identity providers: a provider registry, connection
//! resolution, and login/connect handler dispatch in one crate.
//!
//! The crate owns the part of a social-login integration that sits between the OAuth
//! handshake and the application's user model:
//!
//! - [`social::Social`] normalizes per-provider configuration once at startup and registers a
//!   [`provider::Provider`] for every configured provider id.
//! - [`connection::ConnectionFactory`] resolves persisted [`connection::Connection`] records and
//!   wraps them with a live API client.
//! - [`handler::LoginHandler`] and [`handler::ConnectHandler`] turn raw OAuth responses into
//!   provider identities and hand them to the login/connect callbacks.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod config;
pub mod connection;
pub mod error;
pub mod flows;
pub mod handler;
pub mod oauth;
pub mod obs;
pub mod provider;
pub mod social;
pub mod store;

mod _prelude {
	pub use std::{
		any::Any,
		collections::{BTreeMap, HashMap},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map, Value};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
