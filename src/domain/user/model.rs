//! User domain entity

use chrono::{DateTime, Utc};

str_enum! {
    /// Role attached to every account
    pub enum UserRole {
        Customer => "CUSTOMER",
        CarSitter => "CAR_SITTER",
        Admin => "ADMIN",
    }
}

impl Default for UserRole {
    fn default() -> Self {
        Self::Customer
    }
}

/// Platform account: customer, car sitter or administrator
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(
        email: impl Into<String>,
        password_hash: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        role: UserRole,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.into().trim().to_lowercase(),
            password_hash: password_hash.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: None,
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_car_sitter(&self) -> bool {
        self.role == UserRole::CarSitter
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Utc::now();
    }

    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_normalizes_email_and_is_active() {
        let u = User::new("  Jane@Example.COM ", "hash", "Jane", "Doe", UserRole::Customer);
        assert_eq!(u.email, "jane@example.com");
        assert!(u.is_active);
        assert_eq!(u.full_name(), "Jane Doe");
        assert!(!u.is_admin());
    }

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("car_sitter".parse::<UserRole>().unwrap(), UserRole::CarSitter);
        assert_eq!("ADMIN".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert!("root".parse::<UserRole>().is_err());
    }

    #[test]
    fn deactivate_clears_active_flag() {
        let mut u = User::new("a@b.c", "h", "A", "B", UserRole::CarSitter);
        assert!(u.is_car_sitter());
        u.deactivate();
        assert!(!u.is_active);
    }
}
