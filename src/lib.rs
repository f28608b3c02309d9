//! # gcs-bucket-admin
//!
//! Small administration utilities for one Google Cloud Storage bucket:
//! listing objects, uploading a marker file with a no-overwrite precondition,
//! deriving public URLs, and granting public read access to a folder prefix
//! through a conditional IAM policy binding.
//!
//! ## Quick Start
//!
//! ```
//! use gcs_bucket_admin::admin::BucketAdmin;
//!
//! async fn run() -> Result<(), gcs_bucket_admin::admin::Error> {
//!     let admin = BucketAdmin::new("key.json", "my-bucket").await?;
//!     admin.show_objects().await?;
//!     admin.set_folder_public("public").await?;
//!     Ok(())
//! }
//! ```
//!
//! Authentication always goes through a service-account key file; the file is
//! handed to [google-cloud-auth](https://github.com/yoshidan/google-cloud-rust/tree/main/foundation/auth)
//! and never parsed here.

pub mod admin;
pub mod client;
pub mod http;
pub mod iam;
