use reqwest_middleware::{ClientWithMiddleware as Client, RequestBuilder};

use crate::http::objects::Object;
use crate::http::Escape;

/// Request message for ListObjects.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListObjectsRequest {
    /// Name of the bucket in which to look for objects.
    #[serde(skip_serializing)]
    pub bucket: String,
    /// Filter results to include only objects whose names begin with this prefix.
    pub prefix: Option<String>,
    /// Returns results in a directory-like mode, with / being a common value for the delimiter.
    pub delimiter: Option<String>,
    /// Maximum combined number of entries to return in a single page of
    /// responses. The service may return fewer results than maxResults, so
    /// the presence of nextPageToken should always be checked.
    pub max_results: Option<i32>,
    /// A previously-returned page token representing part of the larger set
    /// of results to view.
    pub page_token: Option<String>,
}

/// The result of a call to Objects.ListObjects
#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ListObjectsResponse {
    /// The list of prefixes of objects matching-but-not-listed up to and including
    /// the requested delimiter.
    pub prefixes: Option<Vec<String>>,
    /// The list of items.
    pub items: Option<Vec<Object>>,
    /// The continuation token, used to page through large result sets. Provide
    /// this value in a subsequent request to return the next page of results.
    pub next_page_token: Option<String>,
}

pub(crate) fn build(base_url: &str, client: &Client, req: &ListObjectsRequest) -> RequestBuilder {
    let url = format!("{}/b/{}/o", base_url, req.bucket.escape());
    client.get(url).query(&req)
}
