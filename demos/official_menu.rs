//! Creates and reads back an official account menu against a mock WeChat host, reusing one cached
//! access token for both calls.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
use url::Url;
// self
use wechat_kit::{
	config::Config, official::OfficialAccount, store::MemoryStore, transport::ReqwestHttpClient,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/token").query_param("grant_type", "client_credential");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access_token":"demo-token","expires_in":7200}"#);
		})
		.await;
	let create_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/cgi-bin/menu/create")
				.query_param("access_token", "demo-token");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"errcode":0,"errmsg":"ok"}"#);
		})
		.await;
	let list_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/menu/get").query_param("access_token", "demo-token");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"menu":{"button":[{"type":"click","name":"Today","key":"TODAY"}]}}"#);
		})
		.await;
	let config = Config::builder("wx-demo-app", "demo-secret")
		.api_host(Url::parse(&server.base_url())?)
		.timeout(std::time::Duration::from_secs(5))
		.build()?;
	let account: OfficialAccount<ReqwestHttpClient> = OfficialAccount::new(
		config,
		ReqwestHttpClient::default(),
		Arc::new(MemoryStore::default()),
	)?;
	let menu = account.menu();

	menu.create(json!([{"type": "click", "name": "Today", "key": "TODAY"}]), None).await?;

	let current = menu.list().await?;

	println!("Menu buttons: {}.", current["menu"]["button"]);

	token_mock.assert_calls_async(1).await;
	create_mock.assert_async().await;
	list_mock.assert_async().await;

	Ok(())
}
