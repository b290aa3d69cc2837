//! Client configuration: identities, hosts, and cache tuning.
//!
//! [`Config`] is assembled in code through [`ConfigBuilder`] or deserialized by the caller from
//! any serde format; the SDK never reads configuration files itself.

mod builder;

pub use builder::ConfigBuilder;

// self
use crate::{_prelude::*, auth::Secret, error::ConfigError, sign::SignType};

/// Default host for official account APIs.
pub const DEFAULT_API_HOST: &str = "https://api.weixin.qq.com";
/// Default host for payment APIs.
pub const DEFAULT_PAY_HOST: &str = "https://api.mch.weixin.qq.com";
/// Path prefix inserted in front of payment paths when sandboxing.
pub const SANDBOX_PATH_PREFIX: &str = "/sandboxnew";
/// Path of the access token endpoint on the API host.
pub const TOKEN_PATH: &str = "/cgi-bin/token";
/// Seconds subtracted from issued token lifetimes before caching.
pub const DEFAULT_SAFETY_MARGIN_SECS: i64 = 500;

/// Validated client configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
	/// Application identifier (`appid`).
	pub app_id: String,
	/// Application secret used for access tokens.
	pub secret: Secret,
	/// Merchant identifier for payment APIs.
	#[serde(default)]
	pub mch_id: Option<String>,
	/// Merchant API key used to sign payment payloads.
	#[serde(default)]
	pub pay_key: Option<Secret>,
	/// Sub-merchant identifier for service-provider mode.
	#[serde(default)]
	pub sub_mch_id: Option<String>,
	/// Sub-merchant application identifier for service-provider mode.
	#[serde(default)]
	pub sub_app_id: Option<String>,
	/// Routes payment calls through the sandbox path prefix.
	#[serde(default)]
	pub sandbox: bool,
	/// Signature algorithm for payment payloads.
	#[serde(default)]
	pub sign_type: SignType,
	/// Official account API host.
	#[serde(default = "default_api_host")]
	pub api_host: Url,
	/// Payment API host.
	#[serde(default = "default_pay_host")]
	pub pay_host: Url,
	/// Per-call deadline in milliseconds; `None` leaves the transport default.
	#[serde(default)]
	pub timeout_ms: Option<u64>,
	/// Seconds subtracted from token lifetimes before caching.
	#[serde(default = "default_safety_margin_secs")]
	pub token_safety_margin_secs: i64,
}
impl Config {
	/// Returns a builder seeded with the application identity.
	pub fn builder(app_id: impl Into<String>, secret: impl Into<String>) -> ConfigBuilder {
		ConfigBuilder::new(app_id, secret)
	}

	/// Re-checks invariants; call after deserializing.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.app_id.trim().is_empty() {
			return Err(ConfigError::MissingField { field: "app_id" });
		}
		if self.secret.expose().is_empty() {
			return Err(ConfigError::MissingField { field: "secret" });
		}

		ensure_http("api_host", &self.api_host)?;
		ensure_http("pay_host", &self.pay_host)?;

		if self.token_safety_margin_secs < 0 {
			return Err(ConfigError::NegativeSafetyMargin);
		}
		if self.timeout_ms == Some(0) {
			return Err(ConfigError::ZeroTimeout);
		}

		Ok(())
	}

	/// Access token endpoint on the API host.
	pub fn token_url(&self) -> Result<Url, ConfigError> {
		link("api_host", &self.api_host, TOKEN_PATH)
	}

	/// Official account endpoint for `path`.
	pub fn api_url(&self, path: &str) -> Result<Url, ConfigError> {
		link("api_host", &self.api_host, path)
	}

	/// Payment endpoint for `path`, sandboxed when configured.
	pub fn pay_url(&self, path: &str) -> Result<Url, ConfigError> {
		if self.sandbox {
			link("pay_host", &self.pay_host, &format!("{SANDBOX_PATH_PREFIX}{path}"))
		} else {
			link("pay_host", &self.pay_host, path)
		}
	}

	/// Safety margin as a [`Duration`].
	pub fn token_safety_margin(&self) -> Duration {
		Duration::seconds(self.token_safety_margin_secs)
	}

	/// Per-call deadline, if configured.
	pub fn timeout(&self) -> Option<StdDuration> {
		self.timeout_ms.map(StdDuration::from_millis)
	}

	/// Payment API key, or an error naming the missing field.
	pub fn require_pay_key(&self) -> Result<&Secret, ConfigError> {
		self.pay_key.as_ref().ok_or(ConfigError::MissingField { field: "pay_key" })
	}

	/// Merchant identifier, or an error naming the missing field.
	pub fn require_mch_id(&self) -> Result<&str, ConfigError> {
		self.mch_id.as_deref().ok_or(ConfigError::MissingField { field: "mch_id" })
	}
}

fn default_api_host() -> Url {
	Url::parse(DEFAULT_API_HOST).unwrap_or_else(|_| unreachable!("constant host parses"))
}

fn default_pay_host() -> Url {
	Url::parse(DEFAULT_PAY_HOST).unwrap_or_else(|_| unreachable!("constant host parses"))
}

fn default_safety_margin_secs() -> i64 {
	DEFAULT_SAFETY_MARGIN_SECS
}

fn ensure_http(field: &'static str, url: &Url) -> Result<(), ConfigError> {
	match url.scheme() {
		"http" | "https" => Ok(()),
		_ => Err(ConfigError::UnsupportedScheme { field }),
	}
}

/// Appends `path` to the host's own path so hosts behind a path prefix keep working.
fn link(field: &'static str, host: &Url, path: &str) -> Result<Url, ConfigError> {
	let joined = format!("{}{}", host.as_str().trim_end_matches('/'), path);

	Url::parse(&joined).map_err(|source| ConfigError::InvalidUrl { field, source })
}
