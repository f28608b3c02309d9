use std::sync::Arc;

use reqwest_middleware::{ClientWithMiddleware, RequestBuilder};
use token_source::TokenSource;

use crate::http::buckets::get::GetBucketRequest;
use crate::http::buckets::get_iam_policy::GetIamPolicyRequest;
use crate::http::buckets::insert::InsertBucketRequest;
use crate::http::buckets::set_iam_policy::SetIamPolicyRequest;
use crate::http::buckets::{self, Bucket};
use crate::http::iam::Policy;
use crate::http::objects::list::{ListObjectsRequest, ListObjectsResponse};
use crate::http::objects::upload::UploadObjectRequest;
use crate::http::objects::{self, Object};
use crate::http::{check_response_status, Error};

pub const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/cloud-platform",
    "https://www.googleapis.com/auth/devstorage.full_control",
];

/// A thin client over the Cloud Storage JSON API. Every method is a single
/// remote call; nothing is retried.
#[derive(Clone)]
pub struct StorageClient {
    ts: Option<Arc<dyn TokenSource>>,
    v1_endpoint: String,
    v1_upload_endpoint: String,
    http: ClientWithMiddleware,
}

impl StorageClient {
    pub(crate) fn new(ts: Option<Arc<dyn TokenSource>>, endpoint: &str, http: reqwest::Client) -> Self {
        Self {
            ts,
            v1_endpoint: format!("{endpoint}/storage/v1"),
            v1_upload_endpoint: format!("{endpoint}/upload/storage/v1"),
            http: reqwest_middleware::ClientBuilder::new(http).build(),
        }
    }

    /// Inserts the bucket.
    pub async fn insert_bucket(&self, req: &InsertBucketRequest) -> Result<Bucket, Error> {
        let builder = buckets::insert::build(&self.v1_endpoint, &self.http, req);
        self.send(builder).await
    }

    /// Gets the bucket.
    pub async fn get_bucket(&self, req: &GetBucketRequest) -> Result<Bucket, Error> {
        let builder = buckets::get::build(&self.v1_endpoint, &self.http, req);
        self.send(builder).await
    }

    /// Lists one page of the bucket's objects.
    pub async fn list_objects(&self, req: &ListObjectsRequest) -> Result<ListObjectsResponse, Error> {
        let builder = objects::list::build(&self.v1_endpoint, &self.http, req);
        self.send(builder).await
    }

    /// Uploads the object in a single request.
    pub async fn upload_object(&self, req: &UploadObjectRequest, body: Vec<u8>) -> Result<Object, Error> {
        let builder = objects::upload::build(&self.v1_upload_endpoint, &self.http, req, body);
        self.send(builder).await
    }

    /// Gets the bucket's IAM policy.
    pub async fn get_iam_policy(&self, req: &GetIamPolicyRequest) -> Result<Policy, Error> {
        let builder = buckets::get_iam_policy::build(&self.v1_endpoint, &self.http, req);
        self.send(builder).await
    }

    /// Sets the bucket's IAM policy, replacing the stored document.
    pub async fn set_iam_policy(&self, req: &SetIamPolicyRequest) -> Result<Policy, Error> {
        let builder = buckets::set_iam_policy::build(&self.v1_endpoint, &self.http, req);
        self.send(builder).await
    }

    async fn with_headers(&self, builder: RequestBuilder) -> Result<RequestBuilder, Error> {
        match &self.ts {
            Some(ts) => {
                let token = ts.token().await.map_err(Error::TokenSource)?;
                Ok(builder.header(reqwest::header::AUTHORIZATION, token))
            }
            None => Ok(builder),
        }
    }

    async fn send<T: for<'de> serde::Deserialize<'de>>(&self, builder: RequestBuilder) -> Result<T, Error> {
        let builder = self.with_headers(builder).await?;
        let response = builder.send().await?;
        let response = check_response_status(response).await?;
        Ok(response.json().await?)
    }
}
