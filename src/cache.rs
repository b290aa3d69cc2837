//! Access token cache with singleflight refreshes.
//!
//! [`TokenCache`] owns one [`Credential`] and serves its token from a [`TokenStore`] until the
//! stored expiry passes. Tokens fetched from the provider are stored with their lifetime shortened
//! by a safety margin so a token is never served right before the provider retires it. Refreshes
//! for the same cache serialize behind an async guard, so N cold callers cost one remote call.

// self
use crate::{
	_prelude::*,
	auth::{CachedToken, Credential},
	client::Client,
	error::CredentialError,
	obs::{self, CallKind, TokenSource},
	request::Call,
	store::TokenStore,
	transport::HttpTransport,
};
#[cfg(feature = "reqwest")] use crate::transport::ReqwestHttpClient;

/// Lifetime used when the provider omits `expires_in`.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::seconds(7200);

/// Token cache specialized for the crate's default reqwest transport.
#[cfg(feature = "reqwest")]
pub type ReqwestTokenCache = TokenCache<ReqwestHttpClient>;

/// Lazily refreshed access token for a single credential.
pub struct TokenCache<T>
where
	T: ?Sized + HttpTransport,
{
	client: Client<T>,
	store: Arc<dyn TokenStore>,
	credential: Credential,
	token_url: Url,
	key: String,
	safety_margin: Duration,
	guard: Arc<AsyncMutex<()>>,
}
impl<T> TokenCache<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a cache that fetches tokens from `token_url` and persists them in `store`.
	pub fn new(
		credential: Credential,
		token_url: Url,
		client: Client<T>,
		store: Arc<dyn TokenStore>,
	) -> Self {
		let key = credential.cache_key();

		Self {
			client,
			store,
			credential,
			token_url,
			key,
			safety_margin: Duration::seconds(crate::config::DEFAULT_SAFETY_MARGIN_SECS),
			guard: Default::default(),
		}
	}

	/// Overrides the safety margin subtracted from provider lifetimes; negatives clamp to zero.
	pub fn with_safety_margin(mut self, margin: Duration) -> Self {
		self.safety_margin = if margin.is_negative() { Duration::ZERO } else { margin };

		self
	}

	/// Credential this cache serves.
	pub fn credential(&self) -> &Credential {
		&self.credential
	}

	/// External key the token is stored under.
	pub fn cache_key(&self) -> &str {
		&self.key
	}

	/// Backing store.
	pub fn store(&self) -> &Arc<dyn TokenStore> {
		&self.store
	}

	/// Returns a token whose expiry is still in the future.
	///
	/// With `force_refresh` the store is bypassed and exactly one remote call is made.
	pub async fn get_token(&self, force_refresh: bool) -> Result<CachedToken> {
		obs::observe(CallKind::AccessToken, self.token_url.path(), async move {
			if !force_refresh {
				if let Some(token) = self.cached(OffsetDateTime::now_utc()).await? {
					return Ok(token);
				}
			}

			let _singleflight = self.guard.lock().await;

			if !force_refresh {
				// Another caller may have refreshed while this one waited.
				if let Some(token) = self.cached(OffsetDateTime::now_utc()).await? {
					return Ok(token);
				}
			}

			let token = self.fetch_remote().await?;

			obs::token_resolved(TokenSource::Remote);

			Ok(token)
		})
		.await
	}

	/// Fetches a fresh token regardless of the cached one.
	pub async fn refresh(&self) -> Result<CachedToken> {
		self.get_token(true).await
	}

	/// Stores a caller-provided token valid for `ttl` from now.
	///
	/// Fails with [`CredentialError::LifetimeOutOfRange`] when `now + ttl` cannot be represented.
	pub async fn set_token(
		&self,
		access_token: impl Into<String>,
		ttl: Duration,
	) -> Result<CachedToken> {
		let token = expiring_in(access_token.into(), ttl)?;
		let _singleflight = self.guard.lock().await;

		self.store.save(&self.key, token.clone()).await?;
		obs::token_resolved(TokenSource::Manual);

		Ok(token)
	}

	/// Stores a caller-provided token with [`DEFAULT_TOKEN_TTL`].
	pub async fn set_token_default(&self, access_token: impl Into<String>) -> Result<CachedToken> {
		self.set_token(access_token, DEFAULT_TOKEN_TTL).await
	}

	/// Drops the cached token so the next lookup fetches a new one.
	pub async fn invalidate(&self) -> Result<()> {
		self.store.remove(&self.key).await?;

		Ok(())
	}

	/// `access_token=<token>` query pair for resource calls.
	pub async fn token_query(&self) -> Result<(String, String)> {
		Ok(self.get_token(false).await?.query_pair())
	}

	async fn cached(&self, now: OffsetDateTime) -> Result<Option<CachedToken>> {
		let token = self.store.fetch(&self.key).await?.filter(|token| token.is_valid_at(now));

		if token.is_some() {
			obs::token_resolved(TokenSource::Store);
		}

		Ok(token)
	}

	async fn fetch_remote(&self) -> Result<CachedToken> {
		let call = Call::get(self.token_url.clone()).queries(self.credential.query_pairs());
		let response = self.client.dispatch(call).await.map_err(|e| match e {
			Error::Transport(e) => CredentialError::Transport(e).into(),
			other => other,
		})?;
		let status = response.status().as_u16();
		let body = response
			.json::<TokenResponse>()
			.map_err(|source| CredentialError::Decode { source, status })?;

		if let Some(code) = body.errcode.filter(|code| *code != 0) {
			return Err(CredentialError::Rejected { code, message: body.errmsg.unwrap_or_default() }
				.into());
		}

		let access_token = body
			.access_token
			.filter(|token| !token.is_empty())
			.ok_or(CredentialError::MissingAccessToken)?;
		let ttl = match body.expires_in {
			Some(secs) if secs > 0 => self.effective_ttl(Duration::seconds(secs)),
			_ => DEFAULT_TOKEN_TTL,
		};
		let token = expiring_in(access_token, ttl)?;

		self.store.save(&self.key, token.clone()).await?;

		Ok(token)
	}

	fn effective_ttl(&self, ttl: Duration) -> Duration {
		let shortened = ttl - self.safety_margin;

		if shortened.is_positive() { shortened } else { ttl }
	}
}
impl<T> Clone for TokenCache<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			client: self.client.clone(),
			store: self.store.clone(),
			credential: self.credential.clone(),
			token_url: self.token_url.clone(),
			key: self.key.clone(),
			safety_margin: self.safety_margin,
			guard: self.guard.clone(),
		}
	}
}
impl<T> Debug for TokenCache<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenCache")
			.field("credential", &self.credential)
			.field("token_url", &self.token_url.as_str())
			.field("key", &self.key)
			.field("safety_margin", &self.safety_margin)
			.finish()
	}
}

fn expiring_in(access_token: String, ttl: Duration) -> Result<CachedToken, CredentialError> {
	CachedToken::with_ttl(access_token, OffsetDateTime::now_utc(), ttl)
		.ok_or(CredentialError::LifetimeOutOfRange { ttl_secs: ttl.whole_seconds() })
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
	#[serde(default)]
	access_token: Option<String>,
	#[serde(default)]
	expires_in: Option<i64>,
	#[serde(default)]
	errcode: Option<i64>,
	#[serde(default)]
	errmsg: Option<String>,
}
