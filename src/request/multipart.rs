//! Media uploads sent as `multipart/form-data`.
//!
//! Building a request reads the upload into a [`MultipartForm`] that rides in the request
//! extensions; the transport turns it into the wire body. [`ReqwestHttpClient`] does so with
//! `reqwest::multipart`, which owns the boundary and part framing.
//!
//! [`ReqwestHttpClient`]: crate::transport::ReqwestHttpClient

// std
use std::{
	fs,
	path::{Path, PathBuf},
};
// self
use crate::{_prelude::*, error::EncodingError};

/// `Content-Type` announced for the file part.
pub const MEDIA_CONTENT_TYPE: &str = "application/octet-stream";

/// File upload: the file goes into the `media` part, the optional description into a JSON
/// `description` text part.
#[derive(Clone, Debug, PartialEq)]
pub struct Upload {
	/// Path of the file to upload.
	pub path: PathBuf,
	/// Optional structured description (video title/introduction and similar).
	pub description: Option<Value>,
}
impl Upload {
	/// Part name the provider expects for the file.
	pub const FILE_FIELD: &'static str = "media";
	/// Part name the provider expects for the description.
	pub const DESCRIPTION_FIELD: &'static str = "description";

	/// Uploads the file at `path` without a description.
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into(), description: None }
	}

	/// Attaches a structured description.
	pub fn with_description(mut self, description: Value) -> Self {
		self.description = Some(description);

		self
	}

	/// Reads the source file in full; a missing or unreadable file never yields a form.
	pub(crate) fn read(self) -> Result<MultipartForm, EncodingError> {
		let contents = fs::read(&self.path)
			.map_err(|source| EncodingError::Upload { path: self.path.clone(), source })?;
		let description = self.description.as_ref().map(serde_json::to_string).transpose()?;

		Ok(MultipartForm { file_name: file_name(&self.path), contents, description })
	}
}

/// Upload contents ready to be framed, carried in the extensions of a multipart request.
#[derive(Clone, PartialEq, Eq)]
pub struct MultipartForm {
	/// File name announced in the `media` part; control characters are stripped.
	pub file_name: String,
	/// File contents.
	pub contents: Vec<u8>,
	/// JSON text for the `description` part.
	pub description: Option<String>,
}
#[cfg(feature = "reqwest")]
impl MultipartForm {
	/// Converts the upload into a reqwest form with `media` and optional `description` parts.
	pub fn into_reqwest(self) -> Result<reqwest::multipart::Form, ReqwestError> {
		let media = reqwest::multipart::Part::bytes(self.contents)
			.file_name(self.file_name)
			.mime_str(MEDIA_CONTENT_TYPE)?;
		let form = reqwest::multipart::Form::new().part(Upload::FILE_FIELD, media);

		Ok(match self.description {
			Some(description) => form.text(Upload::DESCRIPTION_FIELD, description),
			None => form,
		})
	}
}
impl Debug for MultipartForm {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("MultipartForm")
			.field("file_name", &self.file_name)
			.field("len", &self.contents.len())
			.field("description", &self.description)
			.finish()
	}
}

fn file_name(path: &Path) -> String {
	let name = path
		.file_name()
		.map(|name| name.to_string_lossy().chars().filter(|c| !c.is_control()).collect::<String>())
		.unwrap_or_default();

	if name.is_empty() { Upload::FILE_FIELD.to_owned() } else { name }
}
