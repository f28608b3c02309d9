/// An Identity and Access Management (IAM) policy, which specifies access
/// controls for a Google Cloud Storage bucket.
///
/// A `Policy` is a collection of `bindings`. A `binding` binds one or more
/// `members`, or principals, to a single `role`. A `binding` can also specify
/// a `condition`, which is a logical expression that allows access to a
/// resource only if the expression evaluates to `true`.
///
/// The policy is owned by the service: it is fetched, mutated in memory and
/// written back, never created or destroyed here.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    /// Specifies the format of the policy.
    ///
    /// Valid values are `0`, `1`, and `3`. Any operation that affects
    /// conditional role bindings must specify version `3`.
    #[serde(default)]
    pub version: i32,
    /// Associates a list of `members`, or principals, with a `role`.
    /// Optionally, may specify a `condition` that determines how and when the
    /// `bindings` are applied.
    #[serde(default)]
    pub bindings: Vec<Binding>,
    /// HTTP 1.1 entity tag for the policy. Carried through unchanged on
    /// writes; this crate never computes or compares it.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub etag: String,
}

/// Associates `members`, or principals, with a `role`.
///
/// Equality is field-wise over `role`, `members` and `condition`; two
/// bindings compare equal exactly when every field matches.
#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    /// Role that is assigned to the list of `members`, or principals.
    /// For example, `roles/storage.objectViewer`.
    pub role: String,
    /// The principals requesting access. `allUsers` is a special identifier
    /// that represents anyone on the internet, with or without a Google
    /// account.
    pub members: Vec<String>,
    /// The condition that is associated with this binding. If the condition
    /// evaluates to `true`, then this binding applies to the current request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

#[derive(Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Textual representation of an expression in Common Expression Language
    /// syntax.
    pub expression: String,
    /// Optional. Title for the expression, i.e. a short string describing
    /// its purpose.
    pub title: String,
    /// Optional. Description of the expression.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

#[cfg(test)]
mod test {
    use super::{Binding, Condition, Policy};

    #[test]
    fn deserialize_policy_with_condition() {
        let body = r#"{
            "version": 3,
            "etag": "BwWWja0YfJA=",
            "bindings": [
                {"role": "roles/storage.admin", "members": ["projectOwner:my-project"]},
                {
                    "role": "roles/storage.objectViewer",
                    "members": ["allUsers"],
                    "condition": {
                        "title": "public folder",
                        "description": "read access to one folder",
                        "expression": "resource.name.startsWith('projects/_/buckets/b/objects/public/')"
                    }
                }
            ]
        }"#;
        let policy: Policy = serde_json::from_str(body).unwrap();
        assert_eq!(policy.version, 3);
        assert_eq!(policy.etag, "BwWWja0YfJA=");
        assert_eq!(policy.bindings.len(), 2);
        assert!(policy.bindings[0].condition.is_none());
        let condition = policy.bindings[1].condition.as_ref().unwrap();
        assert_eq!(condition.title, "public folder");
        assert!(condition.expression.contains("/objects/public/"));
    }

    #[test]
    fn serialize_policy_shapes_the_write_body() {
        let policy = Policy {
            version: 3,
            bindings: vec![
                Binding {
                    role: "roles/storage.objectViewer".to_string(),
                    members: vec!["allUsers".to_string()],
                    condition: None,
                },
                Binding {
                    role: "roles/storage.objectViewer".to_string(),
                    members: vec!["allUsers".to_string()],
                    condition: Some(Condition {
                        expression: "resource.name.startsWith('x')".to_string(),
                        title: "t".to_string(),
                        description: String::new(),
                    }),
                },
            ],
            etag: String::new(),
        };
        // A condition-less binding carries no "condition" key, and empty
        // etag/description are left out entirely.
        assert_eq!(
            serde_json::to_value(&policy).unwrap(),
            serde_json::json!({
                "version": 3,
                "bindings": [
                    {
                        "role": "roles/storage.objectViewer",
                        "members": ["allUsers"]
                    },
                    {
                        "role": "roles/storage.objectViewer",
                        "members": ["allUsers"],
                        "condition": {
                            "expression": "resource.name.startsWith('x')",
                            "title": "t"
                        }
                    }
                ]
            })
        );
    }

    #[test]
    fn policy_survives_a_fetch_edit_write_cycle() {
        let body = r#"{
            "version": 3,
            "etag": "BwWWja0YfJA=",
            "bindings": [{
                "role": "roles/storage.objectViewer",
                "members": ["allUsers"],
                "condition": {
                    "title": "public folder",
                    "description": "read access to one folder",
                    "expression": "resource.name.startsWith('projects/_/buckets/b/objects/public/')"
                }
            }]
        }"#;
        let policy: Policy = serde_json::from_str(body).unwrap();
        let written = serde_json::to_string(&policy).unwrap();
        let reread: Policy = serde_json::from_str(&written).unwrap();
        assert_eq!(reread, policy);
    }

    #[test]
    fn binding_equality_is_field_wise() {
        let binding = |description: &str| Binding {
            role: "roles/storage.objectViewer".to_string(),
            members: vec!["allUsers".to_string()],
            condition: Some(Condition {
                expression: "resource.name.startsWith('x')".to_string(),
                title: "t".to_string(),
                description: description.to_string(),
            }),
        };
        assert_eq!(binding("a"), binding("a"));
        assert_ne!(binding("a"), binding("b"));
    }
}
