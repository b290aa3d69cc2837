// self
use crate::{
	_prelude::*,
	auth::Secret,
	config::{self, Config},
	error::ConfigError,
	sign::SignType,
};

/// Builder for [`Config`] values.
#[derive(Debug)]
pub struct ConfigBuilder {
	config: Config,
}
impl ConfigBuilder {
	/// Creates a builder seeded with the application identity and default hosts.
	pub fn new(app_id: impl Into<String>, secret: impl Into<String>) -> Self {
		Self {
			config: Config {
				app_id: app_id.into(),
				secret: Secret::new(secret),
				mch_id: None,
				pay_key: None,
				sub_mch_id: None,
				sub_app_id: None,
				sandbox: false,
				sign_type: SignType::default(),
				api_host: config::default_api_host(),
				pay_host: config::default_pay_host(),
				timeout_ms: None,
				token_safety_margin_secs: config::DEFAULT_SAFETY_MARGIN_SECS,
			},
		}
	}

	/// Sets the merchant identifier.
	pub fn mch_id(mut self, mch_id: impl Into<String>) -> Self {
		self.config.mch_id = Some(mch_id.into());

		self
	}

	/// Sets the merchant API key used for payment signatures.
	pub fn pay_key(mut self, key: impl Into<String>) -> Self {
		self.config.pay_key = Some(Secret::new(key));

		self
	}

	/// Sets the sub-merchant identifier.
	pub fn sub_mch_id(mut self, sub_mch_id: impl Into<String>) -> Self {
		self.config.sub_mch_id = Some(sub_mch_id.into());

		self
	}

	/// Sets the sub-merchant application identifier.
	pub fn sub_app_id(mut self, sub_app_id: impl Into<String>) -> Self {
		self.config.sub_app_id = Some(sub_app_id.into());

		self
	}

	/// Toggles sandbox routing for payment calls.
	pub fn sandbox(mut self, sandbox: bool) -> Self {
		self.config.sandbox = sandbox;

		self
	}

	/// Overrides the payment signature algorithm.
	pub fn sign_type(mut self, sign_type: SignType) -> Self {
		self.config.sign_type = sign_type;

		self
	}

	/// Overrides the official account API host.
	pub fn api_host(mut self, host: Url) -> Self {
		self.config.api_host = host;

		self
	}

	/// Overrides the payment API host.
	pub fn pay_host(mut self, host: Url) -> Self {
		self.config.pay_host = host;

		self
	}

	/// Sets the per-call deadline, kept at millisecond precision.
	///
	/// Deadlines shorter than one millisecond are rejected by [`build`](Self::build).
	pub fn timeout(mut self, timeout: StdDuration) -> Self {
		self.config.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));

		self
	}

	/// Overrides the token safety margin (defaults to 500 seconds).
	pub fn token_safety_margin(mut self, margin: Duration) -> Self {
		self.config.token_safety_margin_secs = margin.whole_seconds();

		self
	}

	/// Validates and returns the configuration.
	pub fn build(self) -> Result<Config, ConfigError> {
		self.config.validate()?;

		Ok(self.config)
	}
}
