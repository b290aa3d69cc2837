//! Permanent material (news articles and media files).

// std
use std::path::PathBuf;
// crates.io
use serde_json::json;
// self
use crate::{
	_prelude::*,
	error::EncodingError,
	official::OfficialAccount,
	request::{Call, Upload},
	response::Response,
	transport::HttpTransport,
};

/// News creation endpoint.
pub const ADD_NEWS_PATH: &str = "/cgi-bin/material/add_news";
/// Media upload endpoint.
pub const ADD_MATERIAL_PATH: &str = "/cgi-bin/material/add_material";
/// Material download endpoint.
pub const GET_MATERIAL_PATH: &str = "/cgi-bin/material/get_material";
/// Material deletion endpoint.
pub const DEL_MATERIAL_PATH: &str = "/cgi-bin/material/del_material";
/// News update endpoint.
pub const UPDATE_NEWS_PATH: &str = "/cgi-bin/material/update_news";
/// Material statistics endpoint.
pub const GET_MATERIAL_COUNT_PATH: &str = "/cgi-bin/material/get_materialcount";
/// Paged listing endpoint.
pub const BATCH_GET_MATERIAL_PATH: &str = "/cgi-bin/material/batchget_material";

/// Material media types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
	/// Image.
	Image,
	/// Voice clip.
	Voice,
	/// Video; uploaded through [`Material::upload_video`].
	Video,
	/// Thumbnail.
	Thumb,
	/// News article bundle; only listed, never uploaded as a file.
	News,
}
impl MediaType {
	/// Wire label used in `type` fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			MediaType::Image => "image",
			MediaType::Voice => "voice",
			MediaType::Video => "video",
			MediaType::Thumb => "thumb",
			MediaType::News => "news",
		}
	}
}
impl Display for MediaType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// A news article.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
	/// Title.
	pub title: String,
	/// Media id of the cover image.
	pub thumb_media_id: String,
	/// HTML body.
	pub content: String,
	/// Author.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub author: Option<String>,
	/// Summary shown in the article card.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub digest: Option<String>,
	/// `1` shows the cover inside the body.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub show_cover_pic: Option<u8>,
	/// "Read more" link.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub content_source_url: Option<String>,
}

/// Reply to a media upload.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MediaUpload {
	/// Identifier of the stored material.
	pub media_id: String,
	/// Public URL; only returned for images.
	#[serde(default)]
	pub url: Option<String>,
}

/// Number of stored materials per type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct MaterialCount {
	/// Voice clips.
	#[serde(default)]
	pub voice_count: u64,
	/// Videos.
	#[serde(default)]
	pub video_count: u64,
	/// Images.
	#[serde(default)]
	pub image_count: u64,
	/// News bundles.
	#[serde(default)]
	pub news_count: u64,
}

/// Material calls borrowed from an [`OfficialAccount`].
#[derive(Debug)]
pub struct Material<'a, T>
where
	T: ?Sized + HttpTransport,
{
	account: &'a OfficialAccount<T>,
}
impl<'a, T> Material<'a, T>
where
	T: ?Sized + HttpTransport,
{
	/// Wraps `account`.
	pub fn new(account: &'a OfficialAccount<T>) -> Self {
		Self { account }
	}

	/// Stores a news bundle and returns its `media_id`.
	pub async fn add_news(&self, articles: &[Article]) -> Result<MediaUpload> {
		self.account.post_json_as(ADD_NEWS_PATH, json!({ "articles": articles })).await
	}

	/// Uploads an image, voice clip, or thumbnail.
	///
	/// Videos need a title and introduction and are rejected here; use
	/// [`upload_video`](Self::upload_video).
	pub async fn add_material(
		&self,
		path: impl Into<PathBuf>,
		media_type: MediaType,
	) -> Result<MediaUpload> {
		if matches!(media_type, MediaType::Video | MediaType::News) {
			return Err(
				EncodingError::UnsupportedMediaType { media_type: media_type.as_str() }.into()
			);
		}

		self.upload(Upload::new(path), media_type).await
	}

	/// Uploads a video together with its title and introduction.
	pub async fn upload_video(
		&self,
		path: impl Into<PathBuf>,
		title: &str,
		introduction: &str,
	) -> Result<MediaUpload> {
		let upload = Upload::new(path)
			.with_description(json!({ "title": title, "introduction": introduction }));

		self.upload(upload, MediaType::Video).await
	}

	/// Fetches a material. News and video replies are JSON; other types are the raw file.
	pub async fn get(&self, media_id: &str) -> Result<Response> {
		self.account.post_json(GET_MATERIAL_PATH, json!({ "media_id": media_id })).await
	}

	/// Deletes a material.
	pub async fn delete(&self, media_id: &str) -> Result<Value> {
		self.account.post_json_as(DEL_MATERIAL_PATH, json!({ "media_id": media_id })).await
	}

	/// Replaces the article at `index` inside the news bundle `media_id`.
	pub async fn update_news(&self, media_id: &str, index: u32, article: &Article) -> Result<Value> {
		self.account
			.post_json_as(
				UPDATE_NEWS_PATH,
				json!({ "media_id": media_id, "index": index, "articles": article }),
			)
			.await
	}

	/// Counts stored materials per type.
	pub async fn count(&self) -> Result<MaterialCount> {
		self.account.get_as(GET_MATERIAL_COUNT_PATH).await
	}

	/// Lists `count` materials of `media_type` starting at `offset`.
	pub async fn batch_get(&self, media_type: MediaType, offset: u32, count: u32) -> Result<Value> {
		self.account
			.post_json_as(
				BATCH_GET_MATERIAL_PATH,
				json!({ "type": media_type, "offset": offset, "count": count }),
			)
			.await
	}

	async fn upload(&self, upload: Upload, media_type: MediaType) -> Result<MediaUpload> {
		let url = self.account.config().api_url(ADD_MATERIAL_PATH)?;
		let call = Call::post(url).query("type", media_type.as_str()).upload(upload);

		Ok(self.account.send(call).await?.json()?)
	}
}
impl<T> Clone for Material<'_, T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		*self
	}
}
impl<T> Copy for Material<'_, T> where T: ?Sized + HttpTransport {}
