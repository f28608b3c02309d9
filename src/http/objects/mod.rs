use time::OffsetDateTime;

use crate::http::Escape;

pub mod list;
pub mod upload;

/// An object.
///
/// Trimmed to the metadata this crate reads back from list and upload
/// responses.
#[derive(Clone, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Object {
    /// The name of the object.
    pub name: String,
    /// The name of the bucket containing this object.
    #[serde(default)]
    pub bucket: String,
    /// The content generation of this object. Used for object versioning and
    /// write preconditions.
    #[serde(default, deserialize_with = "crate::http::from_str_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<i64>,
    /// Content-Length of the object data in bytes.
    #[serde(default, deserialize_with = "crate::http::from_str_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    /// Content-Type of the object data. If an object is stored without a
    /// Content-Type, it is served as `application/octet-stream`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// The creation time of the object.
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_created: Option<OffsetDateTime>,
    /// The modification time of the object metadata.
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<OffsetDateTime>,
}

/// The canonical public URL for an object, valid once the object is readable
/// by `allUsers`. Performs no existence check.
pub fn public_url(bucket: &str, object: &str) -> String {
    format!("https://storage.googleapis.com/{}/{}", bucket.escape(), object.escape())
}
