//! Bucket administration operations.
//!
//! [`BucketAdmin`] is a handle bound to one remote bucket. Every operation is
//! a short sequence of remote calls issued one at a time; failures are
//! reported to the caller without retry or partial-state cleanup.

use std::io::Write;

use google_cloud_auth::credentials::CredentialsFile;
use time::OffsetDateTime;
use tracing::info;

use crate::client::{Client, ClientConfig};
use crate::http;
use crate::http::buckets::get::GetBucketRequest;
use crate::http::buckets::get_iam_policy::GetIamPolicyRequest;
use crate::http::buckets::insert::{BucketCreationConfig, InsertBucketParam, InsertBucketRequest};
use crate::http::buckets::set_iam_policy::SetIamPolicyRequest;
use crate::http::buckets::{Bucket, IamConfiguration, UniformBucketLevelAccess};
use crate::http::iam::Policy;
use crate::http::objects::list::{ListObjectsRequest, ListObjectsResponse};
use crate::http::objects::upload::UploadObjectRequest;
use crate::http::objects::{public_url, Object};
use crate::iam;
use crate::iam::MIN_CONDITION_POLICY_VERSION;

const BUCKET_LOCATION: &str = "asia-east1";
const BUCKET_STORAGE_CLASS: &str = "STANDARD";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The handle cannot be constructed; nothing was sent to the service.
    #[error("configuration error: {0}")]
    Configuration(&'static str),

    /// Bucket creation against a name that is already taken.
    #[error("bucket name \"{0}\" is already taken")]
    NameConflict(String),

    /// An upload required the destination not to exist, but it does.
    #[error("object \"{0}\" already exists in the bucket")]
    PreconditionFailed(String),

    #[error(transparent)]
    Auth(#[from] google_cloud_auth::error::Error),

    #[error(transparent)]
    Http(#[from] http::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A handle over one bucket's objects and IAM policy.
pub struct BucketAdmin {
    client: Client,
    bucket_name: String,
}

impl BucketAdmin {
    /// Builds a handle authenticated with the service-account key file at
    /// `key_file`, bound to `bucket_name`. Both are required; an empty value
    /// fails before any file or remote access is attempted.
    pub async fn new(key_file: &str, bucket_name: &str) -> Result<Self, Error> {
        if key_file.is_empty() {
            return Err(Error::Configuration("key file path is required"));
        }
        if bucket_name.is_empty() {
            return Err(Error::Configuration("bucket name is required"));
        }
        let credentials = CredentialsFile::new_from_file(key_file.to_string()).await?;
        let config = ClientConfig::default().with_credentials(credentials).await?;
        Ok(Self {
            client: Client::new(config),
            bucket_name: bucket_name.to_string(),
        })
    }

    /// Creates a new bucket with uniform bucket-level access enabled, then
    /// makes its entire contents publicly readable with an unconditional
    /// policy binding. Administrative, run at most once per bucket name.
    pub async fn create_public_uniform_bucket(key_file: &str, bucket_name: &str) -> Result<Bucket, Error> {
        if key_file.is_empty() {
            return Err(Error::Configuration("key file path is required"));
        }
        if bucket_name.is_empty() {
            return Err(Error::Configuration("bucket name is required"));
        }
        info!("[create_public_uniform_bucket] creating bucket \"{bucket_name}\"...");

        let credentials = CredentialsFile::new_from_file(key_file.to_string()).await?;
        let config = ClientConfig::default().with_credentials(credentials).await?;
        let project = config
            .project_id
            .clone()
            .ok_or(Error::Configuration("credentials file has no project id"))?;
        let client = Client::new(config);

        let req = InsertBucketRequest {
            name: bucket_name.to_string(),
            param: InsertBucketParam { project },
            bucket: BucketCreationConfig {
                location: BUCKET_LOCATION.to_string(),
                storage_class: Some(BUCKET_STORAGE_CLASS.to_string()),
                iam_configuration: Some(IamConfiguration {
                    uniform_bucket_level_access: Some(UniformBucketLevelAccess {
                        enabled: true,
                        locked_time: None,
                    }),
                }),
            },
        };
        let bucket = client
            .insert_bucket(&req)
            .await
            .map_err(|err| creation_error(bucket_name, err))?;
        info!(
            "[create_public_uniform_bucket] bucket \"{}\" created with uniform bucket-level access enabled",
            bucket.name
        );

        info!("[create_public_uniform_bucket] granting public read access to \"{}\"...", bucket.name);
        let mut policy = client
            .get_iam_policy(&GetIamPolicyRequest {
                resource: bucket.name.clone(),
                options_requested_policy_version: Some(MIN_CONDITION_POLICY_VERSION),
            })
            .await?;
        policy.bindings.push(iam::unconditional_public_read_binding());
        client
            .set_iam_policy(&SetIamPolicyRequest {
                resource: bucket.name.clone(),
                policy,
            })
            .await?;
        info!(
            "[create_public_uniform_bucket] bucket \"{}\" is now public; anyone can read its objects",
            bucket.name
        );
        Ok(bucket)
    }

    /// Lists the bucket's objects, following page tokens, and logs each
    /// object name. Reflects the service's state at call time, nothing more.
    pub async fn show_objects(&self) -> Result<Vec<Object>, Error> {
        let mut objects = Vec::new();
        let mut page_token = None;
        loop {
            let response = self
                .client
                .list_objects(&ListObjectsRequest {
                    bucket: self.bucket_name.clone(),
                    page_token,
                    ..Default::default()
                })
                .await?;
            page_token = collect_page(&mut objects, response);
            if page_token.is_none() {
                break;
            }
        }

        info!("[show_objects] object count: {}", objects.len());
        if !objects.is_empty() {
            info!("[show_objects] ---------------");
        }
        for object in &objects {
            info!("[show_objects] {}", object.name);
        }
        Ok(objects)
    }

    /// Creates a folder placeholder: a zero-byte object whose name is the
    /// folder name with a trailing slash. Overwrites freely.
    pub async fn create_folder(&self, folder_name: &str) -> Result<(), Error> {
        self.client
            .upload_object(
                &UploadObjectRequest {
                    bucket: self.bucket_name.clone(),
                    name: format!("{folder_name}/"),
                    ..Default::default()
                },
                Vec::new(),
            )
            .await?;
        info!(
            "[create_folder] folder \"{folder_name}\" created in bucket \"{}\"",
            self.bucket_name
        );
        Ok(())
    }

    /// Appends a timestamp line to the local scratch file, then uploads it to
    /// `<prefix_path><file>` on condition that the destination does not
    /// already exist. The local append grows the file across runs; that is a
    /// deliberate shortcut of this utility, not a log format.
    pub async fn upload_marker_file(&self, prefix_path: &str, file: &str) -> Result<Object, Error> {
        let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
        let line = millis.to_string();
        let mut scratch = std::fs::OpenOptions::new().create(true).append(true).open(file)?;
        scratch.write_all(b"\r\n")?;
        scratch.write_all(line.as_bytes())?;
        info!("[upload_marker_file] appended \"{line}\" to {file}");

        let destination = format!("{prefix_path}{file}");
        let body = std::fs::read(file)?;
        let object = self
            .client
            .upload_object(
                &UploadObjectRequest {
                    bucket: self.bucket_name.clone(),
                    name: destination.clone(),
                    if_generation_match: Some(0),
                    content_type: Some("text/plain".to_string()),
                },
                body,
            )
            .await
            .map_err(|err| upload_error(&destination, err))?;
        info!(
            "[upload_marker_file] {file} uploaded to {}/{destination}",
            self.bucket_name
        );
        Ok(object)
    }

    /// Derives and logs the canonical public URL of a named object. Performs
    /// no existence check.
    pub fn show_public_url(&self, object_name: &str) -> String {
        let url = public_url(&self.bucket_name, object_name);
        info!("[show_public_url] object public url: {url}");
        url
    }

    /// Fetches the bucket metadata and logs its access-control mode.
    pub async fn show_bucket_access_control(&self) -> Result<Bucket, Error> {
        let bucket = self
            .client
            .get_bucket(&GetBucketRequest {
                bucket: self.bucket_name.clone(),
            })
            .await?;
        info!(
            "[show_bucket_access_control] uniform bucket-level access enabled: {}",
            bucket.uniform_bucket_level_access_enabled()
        );
        Ok(bucket)
    }

    /// Grants public read access to one folder prefix of the bucket through a
    /// conditional IAM policy binding. Idempotent: reconciling the same
    /// folder twice leaves the policy as after the first call.
    ///
    /// The read-modify-write is not guarded against concurrent mutation of
    /// the same policy; a race between two callers can lose one update.
    pub async fn set_folder_public(&self, folder_name: &str) -> Result<Policy, Error> {
        info!("[set_folder_public] fetching current IAM policy...");
        let mut policy = self
            .client
            .get_iam_policy(&GetIamPolicyRequest {
                resource: self.bucket_name.clone(),
                options_requested_policy_version: Some(MIN_CONDITION_POLICY_VERSION),
            })
            .await?;

        let outcome = iam::reconcile_public_folder(&mut policy, &self.bucket_name, folder_name);
        if outcome.removed_unconditional > 0 {
            info!(
                "[set_folder_public] removed {} unconditional public access rule(s)",
                outcome.removed_unconditional
            );
        } else {
            info!("[set_folder_public] no unconditional public access rules found to remove");
        }

        if !outcome.changed() {
            info!(
                "[set_folder_public] the conditional rule for folder \"{folder_name}\" already exists; no changes made"
            );
            return Ok(policy);
        }

        if outcome.added {
            info!("[set_folder_public] adding new conditional rule for folder \"{folder_name}\"...");
        }
        info!("[set_folder_public] setting updated IAM policy...");
        let policy = self
            .client
            .set_iam_policy(&SetIamPolicyRequest {
                resource: self.bucket_name.clone(),
                policy,
            })
            .await?;
        info!(
            "[set_folder_public] public access configured for folder \"{folder_name}\" in bucket \"{}\"",
            self.bucket_name
        );
        Ok(policy)
    }
}

/// Appends one listing page to `objects` and hands back the continuation
/// token, if any.
fn collect_page(objects: &mut Vec<Object>, response: ListObjectsResponse) -> Option<String> {
    objects.extend(response.items.unwrap_or_default());
    response.next_page_token
}

fn upload_error(destination: &str, err: http::Error) -> Error {
    if err.code() == Some(reqwest::StatusCode::PRECONDITION_FAILED.as_u16()) {
        Error::PreconditionFailed(destination.to_string())
    } else {
        Error::Http(err)
    }
}

fn creation_error(bucket_name: &str, err: http::Error) -> Error {
    if err.code() == Some(reqwest::StatusCode::CONFLICT.as_u16()) {
        Error::NameConflict(bucket_name.to_string())
    } else {
        Error::Http(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::http::error::ErrorResponse;

    fn service_error(code: u16) -> http::Error {
        http::Error::Response(ErrorResponse {
            code,
            errors: Vec::new(),
            message: "test".to_string(),
        })
    }

    #[tokio::test]
    async fn construction_requires_key_file() {
        let result = BucketAdmin::new("", "yuska-test-bucket").await;
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[tokio::test]
    async fn construction_requires_bucket_name() {
        let result = BucketAdmin::new("key.json", "").await;
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[tokio::test]
    async fn creation_requires_key_file_and_bucket_name() {
        assert!(matches!(
            BucketAdmin::create_public_uniform_bucket("", "b").await,
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            BucketAdmin::create_public_uniform_bucket("key.json", "").await,
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn listing_follows_page_tokens_in_order() {
        let page = |names: &[&str], token: Option<&str>| ListObjectsResponse {
            prefixes: None,
            items: Some(
                names
                    .iter()
                    .map(|name| Object {
                        name: name.to_string(),
                        ..Default::default()
                    })
                    .collect(),
            ),
            next_page_token: token.map(str::to_string),
        };

        let mut objects = Vec::new();
        let token = collect_page(&mut objects, page(&["a.txt", "b.txt"], Some("page-2")));
        assert_eq!(token.as_deref(), Some("page-2"));
        let token = collect_page(&mut objects, page(&["c.txt"], None));
        assert!(token.is_none());

        let names: Vec<&str> = objects.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["a.txt", "b.txt", "c.txt"]);
    }

    #[test]
    fn listing_tolerates_a_page_without_items() {
        let mut objects = Vec::new();
        let token = collect_page(
            &mut objects,
            ListObjectsResponse {
                prefixes: None,
                items: None,
                next_page_token: None,
            },
        );
        assert!(token.is_none());
        assert!(objects.is_empty());
    }

    #[test]
    fn upload_412_maps_to_precondition_failed() {
        let err = upload_error("test.txt", service_error(412));
        assert!(matches!(err, Error::PreconditionFailed(ref name) if name == "test.txt"));
    }

    #[test]
    fn upload_other_errors_propagate_unexamined() {
        let err = upload_error("test.txt", service_error(403));
        assert!(matches!(err, Error::Http(_)));
    }

    #[test]
    fn creation_409_maps_to_name_conflict() {
        let err = creation_error("taken-name", service_error(409));
        assert!(matches!(err, Error::NameConflict(ref name) if name == "taken-name"));
    }

    #[test]
    fn creation_other_errors_propagate_unexamined() {
        let err = creation_error("taken-name", service_error(500));
        assert!(matches!(err, Error::Http(_)));
    }
}
