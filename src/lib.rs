//! Async WeChat platform SDK: cached access tokens, multi-encoding request dispatch, signed
//! payment calls, and official account resources over a pluggable HTTP transport.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod cache;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod obs;
pub mod official;
pub mod payment;
pub mod request;
pub mod response;
pub mod sign;
pub mod store;
pub mod transport;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::Credential,
		cache::TokenCache,
		client::Client,
		config::Config,
		store::{MemoryStore, TokenStore},
		transport::ReqwestHttpClient,
	};

	/// Application identifier shared by integration fixtures.
	pub const TEST_APP_ID: &str = "wx-test-app";
	/// Application secret shared by integration fixtures.
	pub const TEST_SECRET: &str = "test-secret";
	/// Merchant identifier shared by payment fixtures.
	pub const TEST_MCH_ID: &str = "1900000109";
	/// Merchant API key shared by payment fixtures.
	pub const TEST_PAY_KEY: &str = "192006250b4c09247ec02edce69f6a2d";

	/// Builds a reqwest-backed API client with the crate defaults.
	pub fn test_client() -> Client<ReqwestHttpClient> {
		Client::new(ReqwestHttpClient::default())
	}

	/// Builds a [`Config`] whose API and payment hosts both point at `base_url`.
	pub fn test_config(base_url: &str) -> Config {
		Config::builder(TEST_APP_ID, TEST_SECRET)
			.mch_id(TEST_MCH_ID)
			.pay_key(TEST_PAY_KEY)
			.api_host(Url::parse(base_url).expect("Mock server URL should parse."))
			.pay_host(Url::parse(base_url).expect("Mock server URL should parse."))
			.build()
			.expect("Test configuration should validate.")
	}

	/// Constructs a [`TokenCache`] against the mock token endpoint, backed by an in-memory store
	/// that the caller can inspect.
	pub fn build_test_cache(base_url: &str) -> (TokenCache<ReqwestHttpClient>, Arc<MemoryStore>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn TokenStore> = store_backend.clone();
		let config = test_config(base_url);
		let cache = TokenCache::new(
			Credential::client_credential(TEST_APP_ID, TEST_SECRET),
			config.token_url().expect("Token URL should derive from the test host."),
			test_client(),
			store,
		);

		(cache, store_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
		time::Duration as StdDuration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use http;
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tempfile as _, wechat_kit as _};
