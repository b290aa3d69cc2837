// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use wechat_kit::{
	_preludet::*,
	codec::{self, Params},
	config::Config,
	payment::Payment,
	request::{CONTENT_TYPE_XML, EncodedRequest, content_type},
	sign::{self, SignType},
	transport::{HttpTransport, ReqwestHttpClient, TransportFuture},
};

const SUCCESS_XML: &str = "<xml><return_code><![CDATA[SUCCESS]]></return_code>\
	<result_code><![CDATA[SUCCESS]]></result_code><openid><![CDATA[o-payer]]></openid></xml>";

fn payment(base_url: &str) -> Payment<ReqwestHttpClient> {
	Payment::new(test_config(base_url), ReqwestHttpClient::default())
}

/// Captures the last request body and answers with a fixed XML document.
#[derive(Default)]
struct Capture(parking_lot::Mutex<Option<(String, Option<String>, Vec<u8>)>>);
impl HttpTransport for Capture {
	type Error = http::Error;

	fn execute(&self, request: EncodedRequest) -> TransportFuture<'_, Self::Error> {
		*self.0.lock() = Some((
			request.uri().to_string(),
			content_type(&request).map(str::to_owned),
			request.body().clone(),
		));

		Box::pin(async {
			http::Response::builder()
				.status(200)
				.header("content-type", "text/plain")
				.body(SUCCESS_XML.as_bytes().to_vec())
		})
	}
}

#[tokio::test]
async fn request_body_is_signed_xml() {
	let transport = Arc::new(Capture::default());
	let config = Config::builder(TEST_APP_ID, TEST_SECRET)
		.mch_id(TEST_MCH_ID)
		.pay_key(TEST_PAY_KEY)
		.sub_app_id("wx-sub-app")
		.sign_type(SignType::HmacSha256)
		.build()
		.expect("Configuration should validate.");
	let payment: Payment<Capture> = Payment::new(config, transport.clone());
	let reply = payment
		.pay(Params::from([
			("body".into(), json!("coffee")),
			("out_trade_no".into(), json!("1217752501201407033233368018")),
			("total_fee".into(), json!(888)),
			("auth_code".into(), json!("120061098828009406")),
		]))
		.await
		.expect("Sniffed XML reply should decode.");

	assert_eq!(reply["openid"], "o-payer");

	let (uri, content_type, body) =
		transport.0.lock().take().expect("Transport should have seen the request.");

	assert_eq!(uri, "https://api.mch.weixin.qq.com/pay/micropay");
	assert_eq!(content_type.as_deref(), Some(CONTENT_TYPE_XML));

	let sent = codec::xml_to_params(&body).expect("Request body should be flat XML.");

	assert_eq!(sent["appid"], TEST_APP_ID);
	assert_eq!(sent["mch_id"], TEST_MCH_ID);
	assert_eq!(sent["sub_appid"], "wx-sub-app");
	assert_eq!(sent["total_fee"], "888");
	assert_eq!(sent["sign_type"], "HMAC-SHA256");
	assert!(sign::verify_signature(&sent, TEST_PAY_KEY, SignType::Md5));
}

#[tokio::test]
async fn sandbox_routes_under_prefix() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/sandboxnew/tools/authcodetoopenid")
				.header("content-type", CONTENT_TYPE_XML);
			then.status(200).header("content-type", "text/xml").body(SUCCESS_XML);
		})
		.await;
	let mut config = test_config(&server.base_url());

	config.sandbox = true;

	let payment: Payment<ReqwestHttpClient> = Payment::new(config, ReqwestHttpClient::default());
	let reply = payment
		.auth_code_to_openid("120061098828009406")
		.await
		.expect("Sandbox call should succeed.");

	assert_eq!(reply["openid"], "o-payer");

	mock.assert_async().await;
}

#[tokio::test]
async fn order_and_refund_hit_their_endpoints() {
	let server = MockServer::start_async().await;
	let paths = [
		"/pay/unifiedorder",
		"/pay/closeorder",
		"/pay/orderquery",
		"/secapi/pay/refund",
		"/pay/refundquery",
	];
	let mut mocks = Vec::new();

	for path in paths {
		mocks.push(
			server
				.mock_async(move |when, then| {
					when.method(POST).path(path);
					then.status(200).header("content-type", "text/xml").body(SUCCESS_XML);
				})
				.await,
		);
	}

	let payment = payment(&server.base_url());
	let order = payment.order();
	let refund = payment.refund();

	order
		.unify(Params::from([("trade_type".into(), json!("NATIVE"))]))
		.await
		.expect("Unified order should succeed.");
	order.close("T-1").await.expect("Close should succeed.");
	order.query_by_transaction_id("4200000001").await.expect("Query should succeed.");
	order.query_by_out_trade_number("T-1").await.expect("Query should succeed.");
	refund
		.by_out_trade_number("T-1", "R-1", 888, 100, Params::new())
		.await
		.expect("Refund should succeed.");
	refund
		.by_transaction_id("4200000001", "R-2", 888, 100, Params::new())
		.await
		.expect("Refund should succeed.");
	refund.query_by_refund_id("50000001").await.expect("Refund query should succeed.");
	refund.query_by_out_refund_number("R-1").await.expect("Refund query should succeed.");
	refund.query_by_out_trade_number("T-1").await.expect("Refund query should succeed.");
	refund.query_by_transaction_id("4200000001").await.expect("Refund query should succeed.");

	for (mock, calls) in mocks.iter().zip([1, 1, 2, 2, 4]) {
		mock.assert_calls_async(calls).await;
	}
}

#[tokio::test]
async fn business_failure_becomes_api_error() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/pay/orderquery");
			then.status(200).header("content-type", "text/xml").body(
				"<xml><return_code>SUCCESS</return_code><result_code>FAIL</result_code>\
				 <err_code>ORDERNOTEXIST</err_code><err_code_des>order missing</err_code_des></xml>",
			);
		})
		.await;
	let err = payment(&server.base_url())
		.order()
		.query_by_out_trade_number("T-404")
		.await
		.expect_err("FAIL result should surface.");

	assert!(matches!(
		err,
		Error::Api { ref code, ref message } if code == "ORDERNOTEXIST" && message == "order missing"
	));

	mock.assert_async().await;
}
