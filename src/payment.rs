//! Merchant payment APIs.
//!
//! Every payment call is an XML `POST` to the payment host. [`Payment::request`] stamps the
//! merchant identity, a fresh nonce, and the signature onto the caller's fields before sending.
//! When [`Config::sandbox`] is set every path is routed under `/sandboxnew`.

pub mod order;
pub mod refund;

pub use order::Order;
pub use refund::Refund;

// self
#[cfg(feature = "reqwest")] use crate::transport::ReqwestHttpClient;
use crate::{
	_prelude::*,
	client::Client,
	codec::Params,
	config::Config,
	obs::{self, CallKind},
	request::Call,
	response::Response,
	sign::{self, SIGN_FIELD, SIGN_TYPE_FIELD},
	transport::HttpTransport,
};

/// Micropay (barcode) endpoint.
pub const MICROPAY_PATH: &str = "/pay/micropay";
/// Auth-code to openid lookup endpoint.
pub const AUTH_CODE_TO_OPENID_PATH: &str = "/tools/authcodetoopenid";

/// Payment client specialized for the crate's default reqwest transport.
#[cfg(feature = "reqwest")]
pub type ReqwestPayment = Payment<ReqwestHttpClient>;

/// Entry point for merchant payment calls.
pub struct Payment<T>
where
	T: ?Sized + HttpTransport,
{
	config: Arc<Config>,
	client: Client<T>,
}
impl<T> Payment<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a payment client; the configured timeout becomes the default call deadline.
	pub fn new(config: Config, transport: impl Into<Arc<T>>) -> Self {
		let client = Client::new(transport).with_timeout(config.timeout());

		Self { config: Arc::new(config), client }
	}

	/// Configuration in use.
	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Underlying dispatcher.
	pub fn client(&self) -> &Client<T> {
		&self.client
	}

	/// Order sub-client.
	pub fn order(&self) -> Order<'_, T> {
		Order::new(self)
	}

	/// Refund sub-client.
	pub fn refund(&self) -> Refund<'_, T> {
		Refund::new(self)
	}

	/// Adds `mch_id`, `nonce_str`, sub-merchant fields, `sign_type`, and `sign` to `params`.
	///
	/// Any `sign` the caller supplied is replaced.
	pub fn prepare(&self, mut params: Params) -> Result<Params> {
		let key = self.config.require_pay_key()?;
		let mch_id = self.config.require_mch_id()?;

		params.insert("mch_id".into(), mch_id.into());
		params.insert("nonce_str".into(), sign::nonce().into());

		if let Some(sub_mch_id) = &self.config.sub_mch_id {
			params.insert("sub_mch_id".into(), sub_mch_id.as_str().into());
		}
		if let Some(sub_app_id) = &self.config.sub_app_id {
			params.insert("sub_appid".into(), sub_app_id.as_str().into());
		}

		params.insert(SIGN_TYPE_FIELD.into(), self.config.sign_type.as_str().into());
		params.remove(SIGN_FIELD);

		let signature = sign::generate_signature(&params, key.expose(), self.config.sign_type);

		params.insert(SIGN_FIELD.into(), signature.into());

		Ok(params)
	}

	/// Signs `params` and posts them as XML to `path` on the payment host.
	///
	/// The raw response is returned without inspecting `return_code`.
	pub async fn request(&self, path: &str, params: Params) -> Result<Response> {
		obs::observe(CallKind::Payment, path, async move {
			let url = self.config.pay_url(path)?;
			let params = self.prepare(params)?;

			self.client.dispatch(Call::post(url).xml(params)).await
		})
		.await
	}

	/// Like [`request`](Self::request), but fails on provider errors and decodes the reply.
	pub async fn call(&self, path: &str, params: Params) -> Result<Params> {
		Ok(self.request(path, params).await?.check()?.to_map()?)
	}

	/// Checks the `sign` field of a provider reply or notification against the merchant key.
	pub fn verify(&self, params: &Params) -> Result<bool> {
		let key = self.config.require_pay_key()?;

		Ok(sign::verify_signature(params, key.expose(), self.config.sign_type))
	}

	/// Barcode payment (`/pay/micropay`); `appid` defaults to the configured application.
	pub async fn pay(&self, mut params: Params) -> Result<Params> {
		self.with_app_id(&mut params);

		self.call(MICROPAY_PATH, params).await
	}

	/// Resolves the payer's openid from a barcode `auth_code`.
	pub async fn auth_code_to_openid(&self, auth_code: &str) -> Result<Params> {
		let mut params = Params::new();

		self.with_app_id(&mut params);
		params.insert("auth_code".into(), auth_code.into());

		self.call(AUTH_CODE_TO_OPENID_PATH, params).await
	}

	pub(crate) fn with_app_id(&self, params: &mut Params) {
		params.entry("appid".into()).or_insert_with(|| self.config.app_id.as_str().into());
	}
}
impl<T> Clone for Payment<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self { config: self.config.clone(), client: self.client.clone() }
	}
}
impl<T> Debug for Payment<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Payment")
			.field("app_id", &self.config.app_id)
			.field("mch_id", &self.config.mch_id)
			.field("sandbox", &self.config.sandbox)
			.finish_non_exhaustive()
	}
}
