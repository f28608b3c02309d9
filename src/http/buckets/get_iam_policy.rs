use reqwest_middleware::{ClientWithMiddleware as Client, RequestBuilder};

use crate::http::Escape;

/// Request message for `GetIamPolicy` method.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GetIamPolicyRequest {
    /// REQUIRED: The bucket for which the policy is being requested.
    #[serde(skip_serializing)]
    pub resource: String,
    /// Optional. The maximum policy version that will be used to format the
    /// policy.
    ///
    /// Valid values are 0, 1, and 3. Requests for policies with any
    /// conditional role bindings must specify version 3. The policy in the
    /// response might use a lower version than requested, e.g. version 1 when
    /// the policy has no conditional role bindings.
    pub options_requested_policy_version: Option<i32>,
}

pub(crate) fn build(base_url: &str, client: &Client, req: &GetIamPolicyRequest) -> RequestBuilder {
    let url = format!("{}/b/{}/iam", base_url, req.resource.escape());
    client.get(url).query(&req)
}
