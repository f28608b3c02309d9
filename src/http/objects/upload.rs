use reqwest_middleware::{ClientWithMiddleware as Client, RequestBuilder};

use crate::http::Escape;

/// Request message for a simple media upload.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UploadObjectRequest {
    #[serde(skip_serializing)]
    pub bucket: String,
    /// Name of the destination object.
    pub name: String,
    /// Makes the operation conditional on whether the object's current generation
    /// matches the given value. Setting to 0 makes the operation succeed only if
    /// there are no live versions of the object.
    pub if_generation_match: Option<i64>,
    /// Content-Type to record for the uploaded data.
    #[serde(skip_serializing)]
    pub content_type: Option<String>,
}

pub(crate) fn build(base_url: &str, client: &Client, req: &UploadObjectRequest, body: Vec<u8>) -> RequestBuilder {
    let url = format!("{}/b/{}/o", base_url, req.bucket.escape());
    let builder = client
        .post(url)
        .query(&[("uploadType", "media")])
        .query(&req)
        .body(body);
    match &req.content_type {
        Some(content_type) => builder.header(reqwest::header::CONTENT_TYPE, content_type),
        None => builder,
    }
}
