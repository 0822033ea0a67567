/*!
 * # Authorization Policy Module
 *
 * Declarative role/permission policy for the API. Every permission is a
 * `resource:action` string; each role maps to the set of permissions it
 * grants, with `*` as an action wildcard. Route gating happens centrally
 * through `AuthRouterExt::with_permission`, never through ad hoc role
 * string comparisons inside handlers.
 */

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Role definition with associated permissions
#[derive(Debug, Clone)]
pub struct Role {
    pub name: String,
    pub description: String,
    pub permissions: Vec<String>,
}

/// Permission actions
pub struct Actions;

impl Actions {
    pub const READ: &'static str = "read";
    pub const CREATE: &'static str = "create";
    pub const UPDATE: &'static str = "update";
    pub const DELETE: &'static str = "delete";
    pub const MANAGE: &'static str = "manage";
    pub const ALL: &'static str = "*";
}

/// Resource types
pub struct Resources;

impl Resources {
    pub const ACCOUNTS: &'static str = "accounts";
    pub const JOURNAL: &'static str = "journal";
    pub const VENDORS: &'static str = "vendors";
    pub const PAYABLES: &'static str = "payables";
    pub const PROCUREMENT: &'static str = "procurement";
    pub const PROJECTS: &'static str = "projects";
    pub const MILESTONES: &'static str = "milestones";
    pub const TASKS: &'static str = "tasks";
    pub const CATALOG: &'static str = "catalog";
    pub const BOM: &'static str = "bom";
    pub const PRICING: &'static str = "pricing";
    pub const REPORTS: &'static str = "reports";
    pub const USERS: &'static str = "users";
}

/// Common permission string constants for compile-time safety
pub mod consts {
    // Finance
    pub const ACCOUNTS_READ: &str = "accounts:read";
    pub const ACCOUNTS_MANAGE: &str = "accounts:manage";
    pub const JOURNAL_READ: &str = "journal:read";
    pub const JOURNAL_POST: &str = "journal:post";
    pub const PAYABLES_READ: &str = "payables:read";
    pub const PAYABLES_MANAGE: &str = "payables:manage";
    pub const PAYABLES_APPROVE: &str = "payables:approve";
    pub const CURRENCIES_READ: &str = "currencies:read";
    pub const CURRENCIES_MANAGE: &str = "currencies:manage";
    pub const REPORTS_READ: &str = "reports:read";

    // Procurement
    pub const VENDORS_READ: &str = "vendors:read";
    pub const VENDORS_MANAGE: &str = "vendors:manage";
    pub const PROCUREMENT_READ: &str = "procurement:read";
    pub const PROCUREMENT_MANAGE: &str = "procurement:manage";

    // Projects
    pub const PROJECTS_READ: &str = "projects:read";
    pub const PROJECTS_MANAGE: &str = "projects:manage";
    /// Assigning a project manager is restricted to operational
    /// management roles.
    pub const PROJECTS_ASSIGN_MANAGER: &str = "projects:assign-manager";
    pub const MILESTONES_MANAGE: &str = "milestones:manage";
    pub const TASKS_MANAGE: &str = "tasks:manage";

    // Engineering catalog
    pub const CATALOG_READ: &str = "catalog:read";
    pub const CATALOG_MANAGE: &str = "catalog:manage";
    pub const BOM_MANAGE: &str = "bom:manage";

    // Pricing rules
    pub const PRICING_READ: &str = "pricing:read";
    pub const PRICING_MANAGE: &str = "pricing:manage";

    // Identity
    pub const USERS_READ: &str = "users:read";
    pub const USERS_MANAGE: &str = "users:manage";
}

/// Format a permission string
pub fn format_permission(resource: &str, action: &str) -> String {
    format!("{}:{}", resource, action)
}

/// Well-known role names
pub mod roles {
    pub const ADMIN: &str = "admin";
    pub const CEO: &str = "ceo";
    pub const OPERATIONAL_MANAGER: &str = "operational_manager";
    pub const PROJECT_MANAGER: &str = "project_manager";
    pub const FINANCE: &str = "finance";
    pub const PROCUREMENT: &str = "procurement";
    pub const ENGINEER: &str = "engineer";
    pub const STAFF: &str = "staff";
}

// The single source of truth for (role, action, resource) decisions.
pub static ROLES: Lazy<HashMap<String, Role>> = Lazy::new(|| {
    let mut map = HashMap::new();

    map.insert(
        roles::ADMIN.to_string(),
        Role {
            name: roles::ADMIN.to_string(),
            description: "Administrator with full access".to_string(),
            permissions: vec![
                "accounts:*".into(),
                "journal:*".into(),
                "currencies:*".into(),
                "vendors:*".into(),
                "payables:*".into(),
                "procurement:*".into(),
                "projects:*".into(),
                "milestones:*".into(),
                "tasks:*".into(),
                "catalog:*".into(),
                "bom:*".into(),
                "pricing:*".into(),
                "reports:*".into(),
                "users:*".into(),
            ],
        },
    );

    map.insert(
        roles::CEO.to_string(),
        Role {
            name: roles::CEO.to_string(),
            description: "Executive with read access everywhere and project governance".to_string(),
            permissions: vec![
                "accounts:read".into(),
                "journal:read".into(),
                "currencies:read".into(),
                "vendors:read".into(),
                "payables:read".into(),
                "payables:approve".into(),
                "procurement:read".into(),
                "projects:*".into(),
                "milestones:manage".into(),
                "reports:read".into(),
                "pricing:read".into(),
                "catalog:read".into(),
                "users:read".into(),
            ],
        },
    );

    map.insert(
        roles::OPERATIONAL_MANAGER.to_string(),
        Role {
            name: roles::OPERATIONAL_MANAGER.to_string(),
            description: "Operations lead managing projects and assignments".to_string(),
            permissions: vec![
                "projects:*".into(),
                "milestones:manage".into(),
                "tasks:manage".into(),
                "catalog:read".into(),
                "bom:manage".into(),
                "reports:read".into(),
                "vendors:read".into(),
                "procurement:read".into(),
                "users:read".into(),
            ],
        },
    );

    map.insert(
        roles::PROJECT_MANAGER.to_string(),
        Role {
            name: roles::PROJECT_MANAGER.to_string(),
            description: "Manages assigned projects, milestones and tasks".to_string(),
            permissions: vec![
                "projects:read".into(),
                "projects:update".into(),
                "milestones:manage".into(),
                "tasks:manage".into(),
                "catalog:read".into(),
                "bom:manage".into(),
                "reports:read".into(),
            ],
        },
    );

    map.insert(
        roles::FINANCE.to_string(),
        Role {
            name: roles::FINANCE.to_string(),
            description: "Finance staff posting journals and managing payables".to_string(),
            permissions: vec![
                "accounts:*".into(),
                "journal:*".into(),
                "currencies:*".into(),
                "payables:*".into(),
                "vendors:read".into(),
                "procurement:read".into(),
                "pricing:read".into(),
                "reports:read".into(),
            ],
        },
    );

    map.insert(
        roles::PROCUREMENT.to_string(),
        Role {
            name: roles::PROCUREMENT.to_string(),
            description: "Procurement staff managing vendors, POs and receipts".to_string(),
            permissions: vec![
                "vendors:*".into(),
                "procurement:*".into(),
                "payables:read".into(),
                "catalog:read".into(),
                "pricing:read".into(),
            ],
        },
    );

    map.insert(
        roles::ENGINEER.to_string(),
        Role {
            name: roles::ENGINEER.to_string(),
            description: "Engineering staff maintaining the catalog and BoMs".to_string(),
            permissions: vec![
                "catalog:*".into(),
                "bom:*".into(),
                "projects:read".into(),
                "pricing:read".into(),
            ],
        },
    );

    map.insert(
        roles::STAFF.to_string(),
        Role {
            name: roles::STAFF.to_string(),
            description: "Standard user with read-only access".to_string(),
            permissions: vec![
                "accounts:read".into(),
                "journal:read".into(),
                "currencies:read".into(),
                "vendors:read".into(),
                "payables:read".into(),
                "procurement:read".into(),
                "projects:read".into(),
                "catalog:read".into(),
                "pricing:read".into(),
            ],
        },
    );

    map
});

/// Returns all permissions granted to the given roles, wildcards included.
pub fn permissions_for_roles(role_names: &[String]) -> Vec<String> {
    let mut permissions: Vec<String> = Vec::new();
    for name in role_names {
        if let Some(role) = ROLES.get(name) {
            for perm in &role.permissions {
                if !permissions.contains(perm) {
                    permissions.push(perm.clone());
                }
            }
        }
    }
    permissions
}

/// Evaluates whether a permission set satisfies `required`, honoring
/// `resource:*` wildcards.
pub fn permission_grants(granted: &[String], required: &str) -> bool {
    if granted.iter().any(|p| p == required) {
        return true;
    }
    if let Some((resource, _)) = required.split_once(':') {
        let wildcard = format!("{}:*", resource);
        return granted.iter().any(|p| *p == wildcard);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_grants_every_action_on_resource() {
        let granted = vec!["projects:*".to_string()];
        assert!(permission_grants(&granted, consts::PROJECTS_READ));
        assert!(permission_grants(&granted, consts::PROJECTS_ASSIGN_MANAGER));
        assert!(!permission_grants(&granted, consts::JOURNAL_POST));
    }

    #[test]
    fn project_manager_cannot_assign_managers() {
        let perms = permissions_for_roles(&[roles::PROJECT_MANAGER.to_string()]);
        assert!(!permission_grants(&perms, consts::PROJECTS_ASSIGN_MANAGER));
        assert!(permission_grants(&perms, consts::MILESTONES_MANAGE));
    }

    #[test]
    fn operational_manager_and_ceo_can_assign_managers() {
        for role in [roles::OPERATIONAL_MANAGER, roles::CEO] {
            let perms = permissions_for_roles(&[role.to_string()]);
            assert!(
                permission_grants(&perms, consts::PROJECTS_ASSIGN_MANAGER),
                "{role} should be able to assign project managers"
            );
        }
    }

    #[test]
    fn unknown_role_grants_nothing() {
        let perms = permissions_for_roles(&["intern".to_string()]);
        assert!(perms.is_empty());
    }
}
