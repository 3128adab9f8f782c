//! Static role-to-capability policy table.
//!
//! Resolution is a pure lookup: it consults nothing beyond the table, and
//! any role string outside the closed enumeration resolves to the empty
//! set, so least privilege holds even for corrupted role tags.

use std::fmt;

/// An opaque permission token gating one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Workflows,
    Products,
    Settings,
    CreateProduct,
    ViewProduct,
    UpdateProduct,
    DeleteProduct,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Workflows => "workflows",
            Capability::Products => "products",
            Capability::Settings => "settings",
            Capability::CreateProduct => "create_product",
            Capability::ViewProduct => "view_product",
            Capability::UpdateProduct => "update_product",
            Capability::DeleteProduct => "delete_product",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named class of user with a fixed capability set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
    /// Any role tag outside the closed enumeration.
    Unknown,
}

impl Role {
    pub fn parse(value: &str) -> Role {
        match value {
            "admin" => Role::Admin,
            "user" => Role::User,
            _ => Role::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Unknown => "unknown",
        }
    }

    /// The fixed capability set for this role.
    pub fn resolve(&self) -> &'static [Capability] {
        match self {
            Role::Admin => &[
                Capability::Workflows,
                Capability::Products,
                Capability::Settings,
                Capability::CreateProduct,
                Capability::ViewProduct,
                Capability::UpdateProduct,
                Capability::DeleteProduct,
            ],
            Role::User => &[
                Capability::Workflows,
                Capability::Products,
                Capability::ViewProduct,
            ],
            Role::Unknown => &[],
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_has_all_product_capabilities() {
        let caps = Role::Admin.resolve();
        assert!(caps.contains(&Capability::CreateProduct));
        assert!(caps.contains(&Capability::ViewProduct));
        assert!(caps.contains(&Capability::UpdateProduct));
        assert!(caps.contains(&Capability::DeleteProduct));
        assert!(caps.contains(&Capability::Settings));
    }

    #[test]
    fn test_user_is_read_only() {
        let caps = Role::User.resolve();
        assert!(caps.contains(&Capability::ViewProduct));
        assert!(caps.contains(&Capability::Products));

        assert!(!caps.contains(&Capability::CreateProduct));
        assert!(!caps.contains(&Capability::UpdateProduct));
        assert!(!caps.contains(&Capability::DeleteProduct));
        assert!(!caps.contains(&Capability::Settings));
    }

    #[test]
    fn test_unknown_role_resolves_to_empty_set() {
        assert_eq!(Role::parse("superadmin"), Role::Unknown);
        assert_eq!(Role::parse(""), Role::Unknown);
        assert_eq!(Role::parse("Admin"), Role::Unknown); // case-sensitive
        assert!(Role::Unknown.resolve().is_empty());
    }

    #[test]
    fn test_role_parse_round_trip() {
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse("user"), Role::User);
        assert_eq!(Role::parse(Role::Admin.as_str()), Role::Admin);
    }
}
