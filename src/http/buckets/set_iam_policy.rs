use reqwest_middleware::{ClientWithMiddleware as Client, RequestBuilder};

use crate::http::iam::Policy;
use crate::http::Escape;

/// Request message for `SetIamPolicy` method.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SetIamPolicyRequest {
    /// REQUIRED: The bucket for which the policy is being specified.
    pub resource: String,
    /// REQUIRED: The complete policy to be applied to the `resource`.
    pub policy: Policy,
}

pub(crate) fn build(base_url: &str, client: &Client, req: &SetIamPolicyRequest) -> RequestBuilder {
    let url = format!("{}/b/{}/iam", base_url, req.resource.escape());
    client.put(url).json(&req.policy)
}
