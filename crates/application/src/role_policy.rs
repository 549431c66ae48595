use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use stockroom_core::{AppError, AppResult, Caller, Role};
use stockroom_domain::{Operation, PermissionGrant, RecordTypeCatalog, TASK_RESOURCE};

/// Static `(role, resource) -> grant` table consulted by every gated operation.
///
/// Evaluation order: superusers pass, then any explicit grant held by one of
/// the caller's roles decides, otherwise the operation is denied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RolePolicy {
    grants: BTreeMap<Role, BTreeMap<String, PermissionGrant>>,
}

impl RolePolicy {
    /// Creates an empty policy that denies everything but superusers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Admin may do everything, users may only view, on every catalog type and the task list.
    #[must_use]
    pub fn stock_defaults(catalog: &RecordTypeCatalog) -> Self {
        let resources = catalog
            .record_types()
            .iter()
            .map(|record_type| record_type.logical_name())
            .chain(std::iter::once(TASK_RESOURCE));

        resources.fold(Self::new(), |policy, resource| {
            policy
                .with_grant(Role::Admin, resource, PermissionGrant::full())
                .with_grant(Role::User, resource, PermissionGrant::view_only())
        })
    }

    /// Sets the grant for a `(role, resource)` pair, replacing any previous grant.
    #[must_use]
    pub fn with_grant(
        mut self,
        role: Role,
        resource: impl Into<String>,
        grant: PermissionGrant,
    ) -> Self {
        self.grants
            .entry(role)
            .or_default()
            .insert(resource.into(), grant);
        self
    }

    /// Returns the explicit grant for a `(role, resource)` pair.
    #[must_use]
    pub fn grant(&self, role: Role, resource: &str) -> Option<PermissionGrant> {
        self.grants
            .get(&role)
            .and_then(|resources| resources.get(resource))
            .copied()
    }

    /// Returns whether the caller may perform an operation on a resource.
    #[must_use]
    pub fn allows(&self, caller: &Caller, resource: &str, operation: Operation) -> bool {
        if caller.is_superuser() {
            return true;
        }

        caller
            .roles()
            .iter()
            .filter_map(|role| self.grant(*role, resource))
            .any(|grant| grant.allows(operation))
    }

    /// Ensures the caller may perform an operation on a resource.
    pub fn require(&self, caller: &Caller, resource: &str, operation: Operation) -> AppResult<()> {
        if self.allows(caller, resource, operation) {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "subject '{}' may not {} '{}'",
            caller.subject(),
            operation.as_str(),
            resource
        )))
    }

    /// Returns the effective grant of a caller on a resource.
    #[must_use]
    pub fn capabilities(&self, caller: &Caller, resource: &str) -> PermissionGrant {
        PermissionGrant {
            can_view: self.allows(caller, resource, Operation::View),
            can_add: self.allows(caller, resource, Operation::Add),
            can_change: self.allows(caller, resource, Operation::Change),
            can_delete: self.allows(caller, resource, Operation::Delete),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use stockroom_core::{AppError, Caller, Role};
    use stockroom_domain::{Operation, PermissionGrant, UOM, stock_catalog};

    use super::RolePolicy;

    fn operation_strategy() -> impl Strategy<Value = Operation> {
        prop::sample::select(Operation::all().to_vec())
    }

    fn roles_strategy() -> impl Strategy<Value = Vec<Role>> {
        prop::collection::vec(prop::sample::select(Role::all().to_vec()), 0..3)
    }

    fn grant_strategy() -> impl Strategy<Value = PermissionGrant> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(can_view, can_add, can_change, can_delete)| PermissionGrant {
                can_view,
                can_add,
                can_change,
                can_delete,
            },
        )
    }

    proptest! {
        #[test]
        fn superuser_passes_regardless_of_grants(
            roles in roles_strategy(),
            grant in grant_strategy(),
            operation in operation_strategy(),
        ) {
            let policy = RolePolicy::new()
                .with_grant(Role::Admin, UOM, grant)
                .with_grant(Role::User, UOM, grant);
            let caller = Caller::new("root", roles, true);

            prop_assert!(policy.allows(&caller, UOM, operation));
        }

        #[test]
        fn roles_without_grants_are_denied(
            roles in roles_strategy(),
            operation in operation_strategy(),
        ) {
            let policy = RolePolicy::new().with_grant(Role::Admin, "category", PermissionGrant::full());
            let caller = Caller::new("maria", roles, false);

            prop_assert!(!policy.allows(&caller, UOM, operation));
        }
    }

    #[test]
    fn caller_without_roles_passes_no_mutation() {
        let catalog = stock_catalog().unwrap_or_else(|_| unreachable!());
        let policy = RolePolicy::stock_defaults(&catalog);
        let caller = Caller::new("guest", Vec::new(), false);

        for operation in [Operation::Add, Operation::Change, Operation::Delete] {
            assert!(!policy.allows(&caller, UOM, operation));
        }
    }

    #[test]
    fn stock_defaults_give_users_view_only() {
        let catalog = stock_catalog().unwrap_or_else(|_| unreachable!());
        let policy = RolePolicy::stock_defaults(&catalog);
        let user = Caller::with_role("maria", Role::User);
        let admin = Caller::with_role("ana", Role::Admin);

        assert_eq!(policy.capabilities(&user, UOM), PermissionGrant::view_only());
        assert_eq!(policy.capabilities(&admin, UOM), PermissionGrant::full());
        assert_eq!(policy.capabilities(&admin, "task"), PermissionGrant::full());
    }

    #[test]
    fn any_role_granting_the_operation_is_enough() {
        let policy = RolePolicy::new()
            .with_grant(Role::User, UOM, PermissionGrant::view_only())
            .with_grant(Role::Admin, UOM, PermissionGrant::full());
        let caller = Caller::new("ana", vec![Role::User, Role::Admin], false);

        assert!(policy.allows(&caller, UOM, Operation::Delete));
    }

    #[test]
    fn require_maps_denial_to_forbidden() {
        let policy = RolePolicy::new();
        let caller = Caller::with_role("maria", Role::User);

        assert!(matches!(
            policy.require(&caller, UOM, Operation::View),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn policy_loads_from_group_keyed_json() {
        let policy: Result<RolePolicy, _> = serde_json::from_str(
            r#"{
                "Admin": {"uom": {"can_view": true, "can_add": true, "can_change": true, "can_delete": true}},
                "Users": {"uom": {"can_view": true}}
            }"#,
        );
        let policy = policy.unwrap_or_default();

        assert_eq!(policy.grant(Role::User, UOM), Some(PermissionGrant::view_only()));
        assert_eq!(policy.grant(Role::Admin, UOM), Some(PermissionGrant::full()));
    }
}
