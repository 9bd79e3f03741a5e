//! Accounts and authentication

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::Actor;
use crate::config::AdminConfig;
use crate::domain::user::{User, UserRole};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};
use crate::shared::{InfraError, PaginatedResult, PaginationParams};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct LoginResult {
    pub token: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub user: User,
}

pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt: JwtConfig,
}

fn validate_registration(input: &RegisterUser) -> DomainResult<()> {
    let email = input.email.trim();
    let valid_email = email
        .split_once('@')
        .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
        .unwrap_or(false);
    if !valid_email {
        return Err(DomainError::Validation(format!("invalid email: {}", email)));
    }
    if input.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(DomainError::Validation(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
        return Err(DomainError::Validation(
            "first_name and last_name are required".into(),
        ));
    }
    Ok(())
}

fn hash(password: &str) -> DomainResult<String> {
    hash_password(password)
        .map_err(|e| InfraError::Crypto(format!("password hashing failed: {}", e)).into())
}

impl UserService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, jwt: JwtConfig) -> Self {
        Self { repos, jwt }
    }

    async fn load(&self, id: &str) -> DomainResult<User> {
        self.repos
            .users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    async fn insert(&self, input: RegisterUser, role: UserRole) -> DomainResult<User> {
        validate_registration(&input)?;
        let email = input.email.trim().to_lowercase();
        if self.repos.users().find_by_email(&email).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "An account already exists for {}",
                email
            )));
        }
        let mut user = User::new(
            email,
            hash(&input.password)?,
            input.first_name.trim(),
            input.last_name.trim(),
            role,
        );
        user.phone = input.phone.filter(|p| !p.trim().is_empty());
        self.repos.users().save(user.clone()).await?;
        info!(user_id = %user.id, role = %user.role, "👤 User created");
        Ok(user)
    }

    /// Self-service sign-up, always as a customer
    pub async fn register(&self, input: RegisterUser) -> DomainResult<User> {
        self.insert(input, UserRole::Customer).await
    }

    pub async fn create_user(&self, actor: &Actor, input: RegisterUser, role: UserRole) -> DomainResult<User> {
        actor.require_admin()?;
        self.insert(input, role).await
    }

    pub async fn login(&self, email: &str, password: &str) -> DomainResult<LoginResult> {
        let invalid = || DomainError::Unauthorized("Invalid email or password".into());

        let email = email.trim().to_lowercase();
        let Some(mut user) = self.repos.users().find_by_email(&email).await? else {
            warn!(email = %email, "Login failed: unknown email");
            return Err(invalid());
        };
        let matches = verify_password(password, &user.password_hash).unwrap_or(false);
        if !matches {
            warn!(user_id = %user.id, "Login failed: wrong password");
            return Err(invalid());
        }
        if !user.is_active {
            warn!(user_id = %user.id, "Login refused: account disabled");
            return Err(DomainError::Unauthorized("Account is disabled".into()));
        }

        let token = create_token(&user.id, &user.email, user.role, &self.jwt)
            .map_err(|e| InfraError::Crypto(format!("token creation failed: {}", e)))?;
        user.record_login();
        self.repos.users().update(user.clone()).await?;

        info!(user_id = %user.id, role = %user.role, "🔐 User logged in");
        Ok(LoginResult {
            token,
            expires_in: self.jwt.expiration_hours * 3600,
            user,
        })
    }

    /// Profile of the caller; disabled accounts are treated as signed out.
    pub async fn me(&self, actor: &Actor) -> DomainResult<User> {
        let user = self
            .repos
            .users()
            .find_by_id(&actor.user_id)
            .await?
            .ok_or_else(|| DomainError::Unauthorized("Account no longer exists".into()))?;
        if !user.is_active {
            return Err(DomainError::Unauthorized("Account is disabled".into()));
        }
        Ok(user)
    }

    pub async fn change_password(&self, actor: &Actor, current: &str, new: &str) -> DomainResult<()> {
        let mut user = self.me(actor).await?;
        if !verify_password(current, &user.password_hash).unwrap_or(false) {
            return Err(DomainError::Validation("current password is incorrect".into()));
        }
        if new.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        user.password_hash = hash(new)?;
        user.updated_at = chrono::Utc::now();
        self.repos.users().update(user).await?;
        info!(user_id = %actor.user_id, "Password changed");
        Ok(())
    }

    pub async fn get(&self, actor: &Actor, id: &str) -> DomainResult<User> {
        actor.require_owner_or_admin(id, "user")?;
        self.load(id).await
    }

    pub async fn list(
        &self,
        actor: &Actor,
        role: Option<UserRole>,
        params: PaginationParams,
    ) -> DomainResult<PaginatedResult<User>> {
        actor.require_admin()?;
        self.repos.users().list(role, false, params).await
    }

    /// Users edit their own names and phone; role and activation are
    /// admin-only.
    pub async fn update(&self, actor: &Actor, id: &str, changes: UserChanges) -> DomainResult<User> {
        actor.require_owner_or_admin(id, "user")?;
        if (changes.role.is_some() || changes.is_active.is_some()) && !actor.is_admin() {
            return Err(DomainError::Forbidden(
                "Only admins can change roles or activation".into(),
            ));
        }
        let mut user = self.load(id).await?;
        if let Some(first) = changes.first_name.filter(|s| !s.trim().is_empty()) {
            user.first_name = first.trim().to_string();
        }
        if let Some(last) = changes.last_name.filter(|s| !s.trim().is_empty()) {
            user.last_name = last.trim().to_string();
        }
        if changes.phone.is_some() {
            user.phone = changes.phone.filter(|p| !p.trim().is_empty());
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        if let Some(active) = changes.is_active {
            user.is_active = active;
        }
        user.updated_at = chrono::Utc::now();
        self.repos.users().update(user.clone()).await?;
        Ok(user)
    }

    /// Deleting an account only deactivates it; bookings keep their owner.
    pub async fn deactivate(&self, actor: &Actor, id: &str) -> DomainResult<User> {
        actor.require_admin()?;
        if actor.user_id == id {
            return Err(DomainError::Conflict("Admins cannot deactivate themselves".into()));
        }
        let mut user = self.load(id).await?;
        user.deactivate();
        self.repos.users().update(user.clone()).await?;
        warn!(user_id = %user.id, "User deactivated");
        Ok(user)
    }

    /// Create the configured admin when no account exists yet.
    pub async fn ensure_default_admin(&self, config: &AdminConfig) -> DomainResult<Option<User>> {
        if self.repos.users().count().await? > 0 {
            return Ok(None);
        }
        let admin = self
            .insert(
                RegisterUser {
                    email: config.email.clone(),
                    password: config.password.clone(),
                    first_name: config.first_name.clone(),
                    last_name: config.last_name.clone(),
                    phone: None,
                },
                UserRole::Admin,
            )
            .await?;
        warn!(email = %admin.email, "Default admin created, change its password");
        Ok(Some(admin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing;
    use crate::infrastructure::crypto::jwt::verify_token;

    fn jwt() -> JwtConfig {
        JwtConfig::new("test-secret", 1)
    }

    fn registration(email: &str) -> RegisterUser {
        RegisterUser {
            email: email.into(),
            password: "correct horse".into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            phone: None,
        }
    }

    #[tokio::test]
    async fn register_then_login() {
        let repos = testing::repos().await;
        let service = UserService::new(repos, jwt());

        let user = service.register(registration(" Ada@Example.com ")).await.unwrap();
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.role, UserRole::Customer);

        let login = service.login("ADA@example.com", "correct horse").await.unwrap();
        assert_eq!(login.expires_in, 3600);
        assert!(login.user.last_login_at.is_some());
        let claims = verify_token(&login.token, &jwt()).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.user_role(), UserRole::Customer);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let repos = testing::repos().await;
        let service = UserService::new(repos, jwt());
        service.register(registration("dup@example.com")).await.unwrap();
        assert!(matches!(
            service.register(registration("DUP@example.com")).await,
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn bad_credentials_are_unauthorized() {
        let repos = testing::repos().await;
        let service = UserService::new(repos, jwt());
        service.register(registration("x@example.com")).await.unwrap();
        assert!(matches!(
            service.login("x@example.com", "wrong password").await,
            Err(DomainError::Unauthorized(_))
        ));
        assert!(matches!(
            service.login("nobody@example.com", "whatever1").await,
            Err(DomainError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn weak_registration_is_invalid() {
        let repos = testing::repos().await;
        let service = UserService::new(repos, jwt());
        let mut short = registration("s@example.com");
        short.password = "short".into();
        assert!(matches!(service.register(short).await, Err(DomainError::Validation(_))));
        assert!(matches!(
            service.register(registration("not-an-email")).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn deactivated_users_cannot_log_in() {
        let repos = testing::repos().await;
        let service = UserService::new(repos.clone(), jwt());
        let admin = testing::user(&repos, UserRole::Admin).await;
        let user = service.register(registration("gone@example.com")).await.unwrap();

        service.deactivate(&admin, &user.id).await.unwrap();
        assert!(matches!(
            service.login("gone@example.com", "correct horse").await,
            Err(DomainError::Unauthorized(_))
        ));
        assert!(matches!(
            service.deactivate(&admin, &admin.user_id).await,
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn change_password_checks_current() {
        let repos = testing::repos().await;
        let service = UserService::new(repos, jwt());
        let user = service.register(registration("pw@example.com")).await.unwrap();
        let actor = Actor::new(user.id.clone(), user.role);

        assert!(matches!(
            service.change_password(&actor, "nope nope", "new password").await,
            Err(DomainError::Validation(_))
        ));
        service
            .change_password(&actor, "correct horse", "new password")
            .await
            .unwrap();
        service.login("pw@example.com", "new password").await.unwrap();
    }

    #[tokio::test]
    async fn customers_cannot_promote_themselves() {
        let repos = testing::repos().await;
        let service = UserService::new(repos, jwt());
        let user = service.register(registration("me@example.com")).await.unwrap();
        let actor = Actor::new(user.id.clone(), user.role);
        let result = service
            .update(
                &actor,
                &user.id,
                UserChanges {
                    role: Some(UserRole::Admin),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(DomainError::Forbidden(_))));
    }

    #[tokio::test]
    async fn default_admin_only_on_empty_database() {
        let repos = testing::repos().await;
        let service = UserService::new(repos, jwt());
        let created = service
            .ensure_default_admin(&AdminConfig::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(created.role, UserRole::Admin);
        assert!(service
            .ensure_default_admin(&AdminConfig::default())
            .await
            .unwrap()
            .is_none());
    }
}
