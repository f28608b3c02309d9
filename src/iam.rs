//! Reconciliation of a bucket's IAM policy toward public read access.
//!
//! The policy is an externally owned document: it is fetched, edited in
//! memory by the functions here, and written back by the caller in a single
//! call. Nothing here talks to the network.

use crate::http::iam::{Binding, Condition, Policy};

/// Role that allows viewing (downloading) objects.
pub const PUBLIC_READ_ROLE: &str = "roles/storage.objectViewer";

/// Principal representing anyone on the internet.
pub const ALL_USERS: &str = "allUsers";

/// IAM policies must be at version 3 or above to carry conditions.
pub const MIN_CONDITION_POLICY_VERSION: i32 = 3;

/// The outcome of one policy edit, used by callers to decide whether a write
/// back to the service is needed and to report what happened.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct Reconciliation {
    /// Number of unconditional public-read bindings that were removed.
    pub removed_unconditional: usize,
    /// Whether the desired conditional binding was appended. False when a
    /// structurally identical binding was already present.
    pub added: bool,
}

impl Reconciliation {
    /// Whether the policy was mutated and must be written back.
    pub fn changed(&self) -> bool {
        self.removed_unconditional > 0 || self.added
    }
}

/// The binding that grants everyone read access to one folder prefix of the
/// bucket, scoped by a CEL condition on the object name.
pub fn public_read_binding(bucket_name: &str, folder_name: &str) -> Binding {
    Binding {
        role: PUBLIC_READ_ROLE.to_string(),
        members: vec![ALL_USERS.to_string()],
        condition: Some(Condition {
            expression: format!(
                "resource.name.startsWith('projects/_/buckets/{bucket_name}/objects/{folder_name}/')"
            ),
            title: format!("Allow public access to folder {folder_name}"),
            description: format!("Grants read access to all objects in the '{folder_name}' directory."),
        }),
    }
}

/// The binding that grants everyone read access to every object in the
/// bucket, used when a whole bucket is made public at creation.
pub fn unconditional_public_read_binding() -> Binding {
    Binding {
        role: PUBLIC_READ_ROLE.to_string(),
        members: vec![ALL_USERS.to_string()],
        condition: None,
    }
}

/// Edits `policy` so that exactly one binding grants public read access to
/// the given folder prefix:
///
/// * raises the policy version to 3 when lower, since conditions require it;
/// * removes every binding that grants the public-read role to `allUsers`
///   without a condition (a blanket grant would supersede the folder-scoped
///   one); conditional bindings and other role/member pairs are untouched;
/// * appends the desired folder binding unless a field-wise identical one is
///   already present.
///
/// Idempotent: applying the same folder twice leaves the binding set of the
/// first application.
pub fn reconcile_public_folder(policy: &mut Policy, bucket_name: &str, folder_name: &str) -> Reconciliation {
    if policy.version < MIN_CONDITION_POLICY_VERSION {
        policy.version = MIN_CONDITION_POLICY_VERSION;
    }

    let before = policy.bindings.len();
    policy
        .bindings
        .retain(|binding| !is_unconditional_public_read(binding));
    let removed_unconditional = before - policy.bindings.len();

    let desired = public_read_binding(bucket_name, folder_name);
    let added = if policy.bindings.contains(&desired) {
        false
    } else {
        policy.bindings.push(desired);
        true
    };

    Reconciliation {
        removed_unconditional,
        added,
    }
}

fn is_unconditional_public_read(binding: &Binding) -> bool {
    binding.role == PUBLIC_READ_ROLE
        && binding.members.iter().any(|member| member == ALL_USERS)
        && binding.condition.is_none()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::http::iam::{Binding, Condition, Policy};

    fn owner_binding() -> Binding {
        Binding {
            role: "roles/storage.admin".to_string(),
            members: vec!["projectOwner:my-project".to_string()],
            condition: None,
        }
    }

    fn starting_policy(bindings: Vec<Binding>) -> Policy {
        Policy {
            version: 1,
            bindings,
            etag: "BwWWja0YfJA=".to_string(),
        }
    }

    #[test]
    fn adds_conditional_binding_and_bumps_version() {
        let mut policy = starting_policy(vec![owner_binding()]);

        let outcome = reconcile_public_folder(&mut policy, "yuska-test-bucket", "public");

        assert!(outcome.added);
        assert_eq!(outcome.removed_unconditional, 0);
        assert!(outcome.changed());
        assert_eq!(policy.version, 3);
        assert_eq!(policy.bindings.len(), 2);
        let condition = policy.bindings[1].condition.as_ref().unwrap();
        assert_eq!(
            condition.expression,
            "resource.name.startsWith('projects/_/buckets/yuska-test-bucket/objects/public/')"
        );
    }

    #[test]
    fn version_three_or_above_is_left_alone() {
        let mut policy = starting_policy(vec![]);
        policy.version = 3;
        reconcile_public_folder(&mut policy, "b", "public");
        assert_eq!(policy.version, 3);
    }

    #[test]
    fn second_application_is_a_no_op() {
        let mut policy = starting_policy(vec![owner_binding()]);
        reconcile_public_folder(&mut policy, "b", "public");
        let first = policy.clone();

        let outcome = reconcile_public_folder(&mut policy, "b", "public");

        assert!(!outcome.added);
        assert_eq!(outcome.removed_unconditional, 0);
        assert!(!outcome.changed());
        assert_eq!(policy.bindings, first.bindings);
    }

    #[test]
    fn removes_unconditional_public_grant() {
        let mut policy = starting_policy(vec![owner_binding(), unconditional_public_read_binding()]);

        let outcome = reconcile_public_folder(&mut policy, "b", "public");

        assert_eq!(outcome.removed_unconditional, 1);
        assert!(outcome.added);
        assert!(policy
            .bindings
            .iter()
            .all(|b| b.condition.is_some() || b.role != PUBLIC_READ_ROLE));
    }

    #[test]
    fn other_folders_and_principals_are_untouched() {
        let private = public_read_binding("b", "private");
        let authenticated = Binding {
            role: PUBLIC_READ_ROLE.to_string(),
            members: vec!["allAuthenticatedUsers".to_string()],
            condition: None,
        };
        let mut policy = starting_policy(vec![private.clone(), authenticated.clone()]);

        reconcile_public_folder(&mut policy, "b", "public");

        assert!(policy.bindings.contains(&private));
        assert!(policy.bindings.contains(&authenticated));
        assert!(policy.bindings.contains(&public_read_binding("b", "public")));
        assert_eq!(policy.bindings.len(), 3);
    }

    #[test]
    fn removal_alone_still_requires_a_write() {
        let existing = public_read_binding("b", "public");
        let mut policy = starting_policy(vec![existing, unconditional_public_read_binding()]);
        policy.version = 3;

        let outcome = reconcile_public_folder(&mut policy, "b", "public");

        assert!(!outcome.added);
        assert_eq!(outcome.removed_unconditional, 1);
        assert!(outcome.changed());
    }

    #[test]
    fn condition_title_and_description_name_the_folder() {
        let binding = public_read_binding("b", "assets");
        let Condition {
            title, description, ..
        } = binding.condition.unwrap();
        assert_eq!(title, "Allow public access to folder assets");
        assert_eq!(description, "Grants read access to all objects in the 'assets' directory.");
    }
}
