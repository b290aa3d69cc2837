//! Refund requests and refund status queries.
//!
//! Refund submission goes to `/secapi/...`, which the provider only accepts over a TLS client
//! certificate; configure that on the transport (for reqwest, an `Identity` on the client).

// self
use crate::{_prelude::*, codec::Params, payment::Payment, transport::HttpTransport};

/// Refund submission endpoint.
pub const REFUND_PATH: &str = "/secapi/pay/refund";
/// Refund query endpoint.
pub const REFUND_QUERY_PATH: &str = "/pay/refundquery";

/// Refund calls borrowed from a [`Payment`] client.
#[derive(Debug)]
pub struct Refund<'a, T>
where
	T: ?Sized + HttpTransport,
{
	payment: &'a Payment<T>,
}
impl<'a, T> Refund<'a, T>
where
	T: ?Sized + HttpTransport,
{
	/// Wraps `payment`.
	pub fn new(payment: &'a Payment<T>) -> Self {
		Self { payment }
	}

	/// Refunds `refund_fee` of an order identified by the merchant's trade number.
	///
	/// Amounts are in the currency's minor unit; `options` may carry fields such as
	/// `refund_desc` or `notify_url` and never override the identifiers.
	pub async fn by_out_trade_number(
		&self,
		out_trade_no: &str,
		out_refund_no: &str,
		total_fee: u64,
		refund_fee: u64,
		options: Params,
	) -> Result<Params> {
		self.submit(("out_trade_no", out_trade_no), out_refund_no, total_fee, refund_fee, options)
			.await
	}

	/// Refunds `refund_fee` of an order identified by the provider's transaction id.
	pub async fn by_transaction_id(
		&self,
		transaction_id: &str,
		out_refund_no: &str,
		total_fee: u64,
		refund_fee: u64,
		options: Params,
	) -> Result<Params> {
		self.submit(("transaction_id", transaction_id), out_refund_no, total_fee, refund_fee, options)
			.await
	}

	/// Queries by the provider's refund id.
	pub async fn query_by_refund_id(&self, refund_id: &str) -> Result<Params> {
		self.query("refund_id", refund_id).await
	}

	/// Queries by the merchant's refund number.
	pub async fn query_by_out_refund_number(&self, out_refund_no: &str) -> Result<Params> {
		self.query("out_refund_no", out_refund_no).await
	}

	/// Queries every refund of an order identified by the merchant's trade number.
	pub async fn query_by_out_trade_number(&self, out_trade_no: &str) -> Result<Params> {
		self.query("out_trade_no", out_trade_no).await
	}

	/// Queries every refund of an order identified by the provider's transaction id.
	pub async fn query_by_transaction_id(&self, transaction_id: &str) -> Result<Params> {
		self.query("transaction_id", transaction_id).await
	}

	async fn submit(
		&self,
		(id_field, id): (&str, &str),
		out_refund_no: &str,
		total_fee: u64,
		refund_fee: u64,
		mut params: Params,
	) -> Result<Params> {
		params.insert(id_field.into(), id.into());
		params.insert("out_refund_no".into(), out_refund_no.into());
		params.insert("total_fee".into(), total_fee.into());
		params.insert("refund_fee".into(), refund_fee.into());
		self.payment.with_app_id(&mut params);

		self.payment.call(REFUND_PATH, params).await
	}

	async fn query(&self, field: &str, value: &str) -> Result<Params> {
		let mut params = Params::from([(field.to_owned(), Value::from(value))]);

		self.payment.with_app_id(&mut params);

		self.payment.call(REFUND_QUERY_PATH, params).await
	}
}
impl<T> Clone for Refund<'_, T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		*self
	}
}
impl<T> Copy for Refund<'_, T> where T: ?Sized + HttpTransport {}
