//! Official account APIs authenticated with a cached access token.
//!
//! [`OfficialAccount`] owns a [`TokenCache`] for the configured application and attaches
//! `access_token` to the query string of every call it sends.

pub mod material;
pub mod menu;

pub use material::{Article, Material, MaterialCount, MediaType, MediaUpload};
pub use menu::Menu;

// crates.io
use serde::de::DeserializeOwned;
// self
#[cfg(feature = "reqwest")] use crate::transport::ReqwestHttpClient;
use crate::{
	_prelude::*,
	auth::Credential,
	cache::TokenCache,
	client::Client,
	config::Config,
	error::ConfigError,
	obs::{self, CallKind},
	request::{Call, Payload},
	response::Response,
	store::TokenStore,
	transport::HttpTransport,
};

/// Official account client specialized for the crate's default reqwest transport.
#[cfg(feature = "reqwest")]
pub type ReqwestOfficialAccount = OfficialAccount<ReqwestHttpClient>;

/// Entry point for official account resources.
pub struct OfficialAccount<T>
where
	T: ?Sized + HttpTransport,
{
	config: Arc<Config>,
	client: Client<T>,
	token: TokenCache<T>,
}
impl<T> OfficialAccount<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a client whose token cache persists into `store`.
	pub fn new(
		config: Config,
		transport: impl Into<Arc<T>>,
		store: Arc<dyn TokenStore>,
	) -> Result<Self, ConfigError> {
		let client = Client::new(transport).with_timeout(config.timeout());
		let token = TokenCache::new(
			Credential::client_credential(config.app_id.as_str(), config.secret.expose()),
			config.token_url()?,
			client.clone(),
			store,
		)
		.with_safety_margin(config.token_safety_margin());

		Ok(Self { config: Arc::new(config), client, token })
	}

	/// Configuration in use.
	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Access token cache.
	pub fn token(&self) -> &TokenCache<T> {
		&self.token
	}

	/// Menu sub-client.
	pub fn menu(&self) -> Menu<'_, T> {
		Menu::new(self)
	}

	/// Permanent material sub-client.
	pub fn material(&self) -> Material<'_, T> {
		Material::new(self)
	}

	/// Sends `call` with the access token attached and fails on provider error bodies.
	pub async fn send(&self, call: Call) -> Result<Response> {
		let endpoint = call.url.path().to_owned();

		obs::observe(CallKind::Official, &endpoint, async move {
			let (key, value) = self.token.token_query().await?;

			self.client.dispatch(call.query(key, value)).await?.check()
		})
		.await
	}

	/// `GET` on `path` of the API host.
	pub async fn get(&self, path: &str) -> Result<Response> {
		self.send(Call::get(self.config.api_url(path)?)).await
	}

	/// JSON `POST` of `body` to `path` on the API host.
	pub async fn post_json(&self, path: &str, body: impl Into<Payload>) -> Result<Response> {
		self.send(Call::post(self.config.api_url(path)?).json(body)).await
	}

	pub(crate) async fn get_as<R>(&self, path: &str) -> Result<R>
	where
		R: DeserializeOwned,
	{
		Ok(self.get(path).await?.json()?)
	}

	pub(crate) async fn post_json_as<R>(&self, path: &str, body: impl Into<Payload>) -> Result<R>
	where
		R: DeserializeOwned,
	{
		Ok(self.post_json(path, body).await?.json()?)
	}
}
impl<T> Clone for OfficialAccount<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self { config: self.config.clone(), client: self.client.clone(), token: self.token.clone() }
	}
}
impl<T> Debug for OfficialAccount<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OfficialAccount")
			.field("app_id", &self.config.app_id)
			.field("token", &self.token)
			.finish_non_exhaustive()
	}
}
