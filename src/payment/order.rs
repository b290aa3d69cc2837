//! Order lifecycle: unified order, close, and status queries.

// self
use crate::{_prelude::*, codec::Params, payment::Payment, transport::HttpTransport};

/// Unified order endpoint.
pub const UNIFIED_ORDER_PATH: &str = "/pay/unifiedorder";
/// Close order endpoint.
pub const CLOSE_ORDER_PATH: &str = "/pay/closeorder";
/// Order query endpoint.
pub const ORDER_QUERY_PATH: &str = "/pay/orderquery";

/// Order calls borrowed from a [`Payment`] client.
#[derive(Debug)]
pub struct Order<'a, T>
where
	T: ?Sized + HttpTransport,
{
	payment: &'a Payment<T>,
}
impl<'a, T> Order<'a, T>
where
	T: ?Sized + HttpTransport,
{
	/// Wraps `payment`.
	pub fn new(payment: &'a Payment<T>) -> Self {
		Self { payment }
	}

	/// Places a unified order; the caller supplies `body`, `out_trade_no`, `total_fee`,
	/// `spbill_create_ip`, `notify_url`, and `trade_type`.
	pub async fn unify(&self, mut params: Params) -> Result<Params> {
		self.payment.with_app_id(&mut params);

		self.payment.call(UNIFIED_ORDER_PATH, params).await
	}

	/// Closes an unpaid order.
	pub async fn close(&self, out_trade_no: &str) -> Result<Params> {
		self.send(CLOSE_ORDER_PATH, "out_trade_no", out_trade_no).await
	}

	/// Queries an order by the provider's transaction id.
	pub async fn query_by_transaction_id(&self, transaction_id: &str) -> Result<Params> {
		self.send(ORDER_QUERY_PATH, "transaction_id", transaction_id).await
	}

	/// Queries an order by the merchant's trade number.
	pub async fn query_by_out_trade_number(&self, out_trade_no: &str) -> Result<Params> {
		self.send(ORDER_QUERY_PATH, "out_trade_no", out_trade_no).await
	}

	async fn send(&self, path: &str, field: &str, value: &str) -> Result<Params> {
		let mut params = Params::from([(field.to_owned(), Value::from(value))]);

		self.payment.with_app_id(&mut params);

		self.payment.call(path, params).await
	}
}
impl<T> Clone for Order<'_, T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		*self
	}
}
impl<T> Copy for Order<'_, T> where T: ?Sized + HttpTransport {}
