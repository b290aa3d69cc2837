// crates.io
use httpmock::prelude::*;
use time::macros;
// self
use wechat_kit::{
	_preludet::*,
	auth::{CachedToken, Credential},
	cache::TokenCache,
	store::{FileStore, MemoryStore, TokenStore},
};

async fn exercise(store: &dyn TokenStore) {
	let token = CachedToken::new("token-a", macros::datetime!(2030-01-01 00:00 UTC));

	assert!(store.fetch("missing").await.expect("Fetch should succeed.").is_none());

	store.save("key", token.clone()).await.expect("Save should succeed.");

	assert_eq!(store.fetch("key").await.expect("Fetch should succeed."), Some(token.clone()));

	let replacement = CachedToken::new("token-b", macros::datetime!(2031-01-01 00:00 UTC));

	store.save("key", replacement.clone()).await.expect("Overwrite should succeed.");

	assert_eq!(store.fetch("key").await.expect("Fetch should succeed."), Some(replacement.clone()));
	assert_eq!(store.remove("key").await.expect("Remove should succeed."), Some(replacement));
	assert!(store.remove("key").await.expect("Second remove should succeed.").is_none());
}

#[tokio::test]
async fn memory_store_contract() {
	exercise(&MemoryStore::default()).await;
}

#[tokio::test]
async fn file_store_contract() {
	let dir = tempfile::tempdir().expect("Temporary directory should be created.");

	exercise(&FileStore::open(dir.path().join("tokens.json")).expect("File store should open."))
		.await;
}

#[tokio::test]
async fn caches_sharing_a_file_fetch_once() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/token");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"access_token":"shared-token","expires_in":7200}"#);
		})
		.await;
	let dir = tempfile::tempdir().expect("Temporary directory should be created.");
	let path = dir.path().join("shared.json");
	let config = test_config(&server.base_url());
	let cache = |store: FileStore| {
		TokenCache::new(
			Credential::client_credential(TEST_APP_ID, TEST_SECRET),
			config.token_url().expect("Token URL should derive from the test host."),
			test_client(),
			Arc::new(store),
		)
	};
	let first = cache(FileStore::open(&path).expect("First handle should open."));
	let second = cache(FileStore::open(&path).expect("Second handle should open."));
	let a = first.get_token(false).await.expect("First cache should fetch.");
	let b = second.get_token(false).await.expect("Second cache should reuse the file entry.");

	assert_eq!(a.access_token.expose(), "shared-token");
	assert_eq!(b.access_token.expose(), "shared-token");
	// The snapshot keeps whole seconds.
	assert_eq!(a.expires_at.unix_timestamp(), b.expires_at.unix_timestamp());

	mock.assert_calls_async(1).await;
}
