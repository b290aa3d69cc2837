// std
use std::io::Write;
// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use wechat_kit::{
	_preludet::*,
	client::Client,
	codec::Params,
	error::{DecodeError, EncodingError},
	request::{
		CONTENT_TYPE_JSON, CONTENT_TYPE_XML, Call, EncodedRequest, Encoding, MultipartForm, Payload, Upload,
		content_type,
	},
	response::ContentKind,
	transport::{HttpTransport, TransportFuture},
};

/// Replies with the request body and its content type, like a provider echo endpoint.
struct Echo;
impl HttpTransport for Echo {
	type Error = http::Error;

	fn execute(&self, request: EncodedRequest) -> TransportFuture<'_, Self::Error> {
		Box::pin(async move {
			let mut builder = http::Response::builder().status(200);

			if let Some(content_type) = content_type(&request) {
				builder = builder.header("content-type", content_type);
			}

			builder.body(request.into_body())
		})
	}
}

fn echo_client() -> Client<Echo> {
	Client::new(Echo)
}

fn target() -> Url {
	Url::parse("https://echo.example.com/echo").expect("Fixture URL should parse.")
}

fn sample() -> Params {
	Params::from([
		("appid".into(), json!("wx-test-app")),
		("body".into(), json!("coffee & <cake>")),
		("total_fee".into(), json!("888")),
	])
}

#[tokio::test]
async fn json_round_trip_preserves_fields() {
	let response = echo_client()
		.dispatch(Call::post(target()).json(sample()))
		.await
		.expect("JSON echo should succeed.");

	assert_eq!(response.content_type(), Some(CONTENT_TYPE_JSON));
	assert_eq!(response.content_kind(), ContentKind::Json);
	assert_eq!(response.to_map().expect("JSON echo should decode."), sample());
}

#[tokio::test]
async fn xml_round_trip_preserves_fields() {
	let response = echo_client()
		.dispatch(Call::post(target()).xml(sample()))
		.await
		.expect("XML echo should succeed.");

	assert_eq!(response.content_type(), Some(CONTENT_TYPE_XML));
	assert_eq!(response.content_kind(), ContentKind::Xml);
	assert_eq!(response.to_map().expect("XML echo should decode."), sample());
}

#[tokio::test]
async fn form_echo_is_not_decodable_as_map() {
	let response = echo_client()
		.dispatch(Call::post(target()).body(Encoding::Form, Payload::Pairs(vec![(
			"a".into(),
			"1".into(),
		)])))
		.await
		.expect("Form echo should succeed.");

	assert_eq!(response.bytes(), b"a=1");
	assert!(matches!(response.to_map(), Err(DecodeError::UnrecognizedContentType { .. })));
}

#[tokio::test]
async fn multipart_upload_fails_cleanly_for_missing_file() {
	let err = echo_client()
		.dispatch(Call::post(target()).upload(Upload::new("/definitely/not/here.jpg")))
		.await
		.expect_err("Missing upload source should fail before sending.");

	assert!(matches!(err, Error::Encoding(EncodingError::Upload { .. })));
}

#[tokio::test]
async fn multipart_upload_carries_file_and_description() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/upload")
				.header_prefix("content-type", "multipart/form-data; boundary=")
				.body_includes("name=\"media\"; filename=\"clip.mp4\"")
				.body_includes("Content-Type: application/octet-stream")
				.body_includes("VIDEO-BYTES")
				.body_includes("name=\"description\"")
				.body_includes(r#"{"title":"clip"}"#);
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"media_id":"v-1"}"#);
		})
		.await;
	let dir = tempfile::tempdir().expect("Temporary directory should be created.");
	let path = dir.path().join("clip.mp4");

	std::fs::write(&path, b"VIDEO-BYTES").expect("Upload fixture should be writable.");

	let url = Url::parse(&server.url("/upload")).expect("Mock URL should parse.");
	let upload = Upload::new(&path).with_description(json!({"title": "clip"}));
	let reply = test_client()
		.dispatch(Call::post(url).upload(upload))
		.await
		.expect("Multipart upload should succeed.")
		.to_map()
		.expect("Upload reply should decode.");

	assert_eq!(reply["media_id"], "v-1");

	mock.assert_async().await;
}

#[tokio::test]
async fn transports_receive_the_upload_as_an_extension() {
	let mut file = tempfile::NamedTempFile::new().expect("Temp file should be created.");

	file.write_all(b"IMAGE-BYTES").expect("Temp file should be writable.");

	let request = Call::post(target())
		.upload(Upload::new(file.path()))
		.build()
		.expect("Upload should encode.");
	let form = request.extensions().get::<MultipartForm>().expect("Upload should ride along.");

	assert_eq!(form.contents, b"IMAGE-BYTES");
	assert_eq!(form.description, None);
	assert!(request.body().is_empty());
}

#[tokio::test]
async fn query_pairs_merge_with_existing_query_over_http() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/cgi-bin/material/add_material")
				.query_param("type", "image")
				.query_param("access_token", "tok");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"media_id":"m-1"}"#);
		})
		.await;
	let url = Url::parse(&server.url("/cgi-bin/material/add_material?type=image"))
		.expect("Mock URL should parse.");
	let response = test_client()
		.dispatch(Call::post(url).query("access_token", "tok").json(json!({})))
		.await
		.expect("Dispatch should succeed.")
		.check()
		.expect("Successful body should pass the check.");

	assert_eq!(response.status(), http::StatusCode::OK);

	mock.assert_async().await;
}

#[tokio::test]
async fn provider_error_body_becomes_api_error() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/menu/get");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"errcode":46003,"errmsg":"menu no exist"}"#);
		})
		.await;
	let url = Url::parse(&server.url("/cgi-bin/menu/get")).expect("Mock URL should parse.");
	let err = test_client()
		.dispatch(Call::get(url))
		.await
		.expect("Transport should succeed.")
		.check()
		.expect_err("Non-zero errcode should fail.");

	assert!(matches!(err, Error::Api { ref code, .. } if code == "46003"));

	mock.assert_async().await;
}

#[tokio::test]
async fn deadline_is_enforced_by_reqwest_transport() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/slow");
			then.status(200).delay(StdDuration::from_millis(500)).body("late");
		})
		.await;
	let url = Url::parse(&server.url("/slow")).expect("Mock URL should parse.");
	let err = test_client()
		.dispatch(Call::get(url).deadline(StdDuration::from_millis(50)))
		.await
		.expect_err("Deadline shorter than the delay should fail.");

	assert!(matches!(err, Error::Transport(_)));
}
