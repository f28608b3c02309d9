use reqwest_middleware::{ClientWithMiddleware as Client, RequestBuilder};

use crate::http::Escape;

/// Request message for GetBucket.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GetBucketRequest {
    /// Name of the bucket.
    #[serde(skip_serializing)]
    pub bucket: String,
}

pub(crate) fn build(base_url: &str, client: &Client, req: &GetBucketRequest) -> RequestBuilder {
    let url = format!("{}/b/{}", base_url, req.bucket.escape());
    client.get(url).query(&req)
}
