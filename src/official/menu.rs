//! Custom menu management.
//!
//! Menu trees are passed through as JSON; building buttons is left to the caller.

// crates.io
use serde_json::json;
// self
use crate::{_prelude::*, official::OfficialAccount, transport::HttpTransport};

/// Default menu creation endpoint.
pub const MENU_CREATE_PATH: &str = "/cgi-bin/menu/create";
/// Conditional (personalized) menu creation endpoint.
pub const MENU_ADD_CONDITIONAL_PATH: &str = "/cgi-bin/menu/addconditional";
/// Menu listing endpoint.
pub const MENU_GET_PATH: &str = "/cgi-bin/menu/get";
/// Current self-menu endpoint.
pub const CURRENT_SELFMENU_PATH: &str = "/cgi-bin/get_current_selfmenu_info";
/// Conditional menu match test endpoint.
pub const MENU_TRY_MATCH_PATH: &str = "/cgi-bin/menu/trymatch";
/// Delete-all endpoint.
pub const MENU_DELETE_PATH: &str = "/cgi-bin/menu/delete";
/// Conditional menu delete endpoint.
pub const MENU_DEL_CONDITIONAL_PATH: &str = "/cgi-bin/menu/delconditional";

/// Menu calls borrowed from an [`OfficialAccount`].
#[derive(Debug)]
pub struct Menu<'a, T>
where
	T: ?Sized + HttpTransport,
{
	account: &'a OfficialAccount<T>,
}
impl<'a, T> Menu<'a, T>
where
	T: ?Sized + HttpTransport,
{
	/// Wraps `account`.
	pub fn new(account: &'a OfficialAccount<T>) -> Self {
		Self { account }
	}

	/// Creates the default menu, or a conditional one when `match_rule` is given.
	pub async fn create(&self, buttons: Value, match_rule: Option<Value>) -> Result<Value> {
		match match_rule {
			None =>
				self.account.post_json_as(MENU_CREATE_PATH, json!({ "button": buttons })).await,
			Some(rule) =>
				self.account
					.post_json_as(
						MENU_ADD_CONDITIONAL_PATH,
						json!({ "button": buttons, "matchrule": rule }),
					)
					.await,
		}
	}

	/// Lists the default menu and every conditional menu.
	pub async fn list(&self) -> Result<Value> {
		self.account.get_as(MENU_GET_PATH).await
	}

	/// Menu currently in effect, including ones configured through the web console.
	pub async fn current(&self) -> Result<Value> {
		self.account.get_as(CURRENT_SELFMENU_PATH).await
	}

	/// Resolves which menu `user_id` (openid or WeChat id) would see.
	pub async fn try_match(&self, user_id: &str) -> Result<Value> {
		self.account.post_json_as(MENU_TRY_MATCH_PATH, json!({ "user_id": user_id })).await
	}

	/// Deletes every menu, or only the conditional menu `menu_id`.
	pub async fn delete(&self, menu_id: Option<i64>) -> Result<Value> {
		match menu_id {
			None => self.account.get_as(MENU_DELETE_PATH).await,
			Some(id) =>
				self.account.post_json_as(MENU_DEL_CONDITIONAL_PATH, json!({ "menuid": id })).await,
		}
	}
}
impl<T> Clone for Menu<'_, T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		*self
	}
}
impl<T> Copy for Menu<'_, T> where T: ?Sized + HttpTransport {}
