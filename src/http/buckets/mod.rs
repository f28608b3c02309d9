use time::OffsetDateTime;

pub mod get;
pub mod get_iam_policy;
pub mod insert;
pub mod set_iam_policy;

/// A bucket.
///
/// Only the metadata this crate inspects is modeled; unknown response fields
/// are ignored on deserialization.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    /// The ID of the bucket. For buckets, the `id` and `name` properties are
    /// the same.
    pub id: String,
    /// The name of the bucket.
    pub name: String,
    /// The project number of the project the bucket belongs to.
    #[serde(default, deserialize_with = "crate::http::from_str_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_number: Option<i64>,
    /// The location of the bucket. Object data for objects in the bucket
    /// resides in physical storage within this region.
    pub location: String,
    /// The bucket's default storage class, used whenever no storageClass is
    /// specified for a newly-created object.
    pub storage_class: String,
    /// HTTP 1.1 entity tag for the bucket.
    pub etag: String,
    /// The creation time of the bucket.
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_created: Option<OffsetDateTime>,
    /// The bucket's IAM configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iam_configuration: Option<IamConfiguration>,
}

impl Bucket {
    /// Whether uniform bucket-level access is enabled, i.e. access is
    /// governed solely by the IAM policy rather than per-object ACLs.
    pub fn uniform_bucket_level_access_enabled(&self) -> bool {
        self.iam_configuration
            .as_ref()
            .and_then(|c| c.uniform_bucket_level_access.as_ref())
            .map(|u| u.enabled)
            .unwrap_or(false)
    }
}

/// The IAM configuration of a bucket.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct IamConfiguration {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uniform_bucket_level_access: Option<UniformBucketLevelAccess>,
}

#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UniformBucketLevelAccess {
    /// If set, access is controlled only by bucket-level or above IAM
    /// policies.
    pub enabled: bool,
    /// The deadline for changing `enabled` from true to false. After the
    /// deadline is passed the field is immutable.
    #[serde(default, with = "time::serde::rfc3339::option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_time: Option<OffsetDateTime>,
}
