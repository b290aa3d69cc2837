//! Signs and submits a barcode payment to a mock payment host, then verifies the reply signature
//! with the same merchant key.

// crates.io
use color_eyre::{Result, eyre::eyre};
use httpmock::prelude::*;
use serde_json::json;
use url::Url;
// self
use wechat_kit::{
	codec::{self, Params},
	config::Config,
	payment::Payment,
	sign::{self, SignType},
	transport::ReqwestHttpClient,
};

const PAY_KEY: &str = "192006250b4c09247ec02edce69f6a2d";

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let mut reply = Params::from([
		("return_code".into(), json!("SUCCESS")),
		("result_code".into(), json!("SUCCESS")),
		("transaction_id".into(), json!("4200000001201407033233368018")),
		("nonce_str".into(), json!(sign::nonce())),
	]);
	let signature = sign::generate_signature(&reply, PAY_KEY, SignType::Md5);

	reply.insert(sign::SIGN_FIELD.into(), signature.into());

	let server = MockServer::start_async().await;
	let pay_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/pay/micropay").body_includes("<auth_code>");
			then.status(200).header("content-type", "text/xml").body(codec::params_to_xml(&reply));
		})
		.await;
	let config = Config::builder("wx-demo-app", "demo-secret")
		.mch_id("1900000109")
		.pay_key(PAY_KEY)
		.pay_host(Url::parse(&server.base_url())?)
		.build()?;
	let payment: Payment<ReqwestHttpClient> = Payment::new(config, ReqwestHttpClient::default());
	let result = payment
		.pay(Params::from([
			("body".into(), json!("Coffee")),
			("out_trade_no".into(), json!("1217752501201407033233368018")),
			("total_fee".into(), json!(888)),
			("spbill_create_ip".into(), json!("127.0.0.1")),
			("auth_code".into(), json!("120061098828009406")),
		]))
		.await?;

	if !payment.verify(&result)? {
		return Err(eyre!("Reply signature does not match the merchant key."));
	}

	println!("Paid with transaction {}.", result["transaction_id"]);

	pay_mock.assert_async().await;

	Ok(())
}
