use reqwest_middleware::{ClientWithMiddleware as Client, RequestBuilder};

use crate::http::buckets::IamConfiguration;

/// Creation-time bucket configuration.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct BucketCreationConfig {
    /// The location of the bucket. Defaults to "US". See Cloud Storage bucket
    /// locations for the authoritative list.
    pub location: String,
    /// The bucket's default storage class, used whenever no storageClass is
    /// specified for a newly-created object. Defaults to "STANDARD".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
    /// The bucket's IAM configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iam_configuration: Option<IamConfiguration>,
}

/// Query parameters for InsertBucket.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct InsertBucketParam {
    /// A valid API project identifier.
    pub project: String,
}

/// Request message for InsertBucket.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct InsertBucketRequest {
    pub name: String,
    #[serde(skip_serializing)]
    pub param: InsertBucketParam,
    #[serde(flatten)]
    pub bucket: BucketCreationConfig,
}

pub(crate) fn build(base_url: &str, client: &Client, req: &InsertBucketRequest) -> RequestBuilder {
    let url = format!("{base_url}/b");
    client.post(url).query(&req.param).json(&req)
}
