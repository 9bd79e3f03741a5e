//! The authenticated caller of a use case

use crate::domain::user::UserRole;
use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub role: UserRole,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_car_sitter(&self) -> bool {
        self.role == UserRole::CarSitter
    }

    pub fn require_admin(&self) -> DomainResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(DomainError::Forbidden("Admin role required".into()))
        }
    }

    /// Admins may act on anything, everyone else only on what they own.
    pub fn require_owner_or_admin(&self, owner_id: &str, entity: &str) -> DomainResult<()> {
        if self.is_admin() || self.user_id == owner_id {
            Ok(())
        } else {
            Err(DomainError::Forbidden(format!(
                "Not allowed to access this {}",
                entity
            )))
        }
    }

    /// Restricts listing queries: `None` for admins (see everything),
    /// the caller's own id otherwise.
    pub fn scope(&self) -> Option<String> {
        if self.is_admin() {
            None
        } else {
            Some(self.user_id.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ownership_rules() {
        let admin = Actor::new("a", UserRole::Admin);
        let customer = Actor::new("c", UserRole::Customer);

        assert!(admin.require_owner_or_admin("someone", "reservation").is_ok());
        assert!(customer.require_owner_or_admin("c", "reservation").is_ok());
        assert!(matches!(
            customer.require_owner_or_admin("x", "reservation"),
            Err(DomainError::Forbidden(_))
        ));
        assert!(customer.require_admin().is_err());
        assert_eq!(admin.scope(), None);
        assert_eq!(customer.scope().as_deref(), Some("c"));
    }
}
