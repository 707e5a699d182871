use std::collections::BTreeSet;
use std::sync::Arc;

use crate::{
    config::PasswordPolicy,
    dtos::auth::{AuthResponse, LoginRequest, MessageResponse, SignupRequest},
    models::{permissions_for, RoleName, User},
    services::{JwtService, PolicyService, ServiceError, TokenRevocationList, UserStore},
    utils::{Password, PasswordHashString},
};

/// Orchestrates signup, login, logout, and the federated-login bridge.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    jwt: JwtService,
    revocation_list: Arc<dyn TokenRevocationList>,
    password_policy: PasswordPolicy,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn UserStore>,
        jwt: JwtService,
        revocation_list: Arc<dyn TokenRevocationList>,
        password_policy: PasswordPolicy,
    ) -> Self {
        Self {
            store,
            jwt,
            revocation_list,
            password_policy,
        }
    }

    pub async fn signup(&self, req: SignupRequest) -> Result<MessageResponse, ServiceError> {
        if self.store.email_exists(&req.email).await? {
            tracing::warn!(email = %req.email, "Registration failed: email already exists");
            return Err(ServiceError::EmailAlreadyRegistered);
        }

        PolicyService::validate_password(&req.password, &self.password_policy)
            .map_err(|e| ServiceError::WeakPassword(e.to_string()))?;

        let password_hash = Password::new(req.password.clone())
            .hash()
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Password hashing error: {}", e)))?;

        let role = resolve_signup_role(req.role.as_deref());

        let user = User::new(req.email.clone(), password_hash.into_string(), vec![role]);
        self.store.insert(&user).await?;

        tracing::info!(user_id = %user.id, role = %role, "User registered");

        Ok(MessageResponse {
            message: "User registered successfully".to_string(),
        })
    }

    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, ServiceError> {
        let user = self
            .store
            .find_by_email(&req.email)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        if !user.enabled {
            tracing::warn!(email = %user.email, "Login rejected: account disabled");
            return Err(ServiceError::InvalidCredentials);
        }

        PasswordHashString::new(user.password_hash.clone())
            .verify(&Password::new(req.password))
            .map_err(|_| ServiceError::InvalidCredentials)?;

        let token = self.jwt.issue(&user.email)?;

        let roles: BTreeSet<String> = user.roles.iter().map(|r| r.as_str().to_string()).collect();
        let permissions: BTreeSet<String> = user
            .roles
            .iter()
            .flat_map(|r| permissions_for(*r))
            .map(|p| p.as_str().to_string())
            .collect();

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthResponse {
            token,
            email: user.email,
            roles: roles.into_iter().collect(),
            permissions: permissions.into_iter().collect(),
        })
    }

    /// Revoke a still-valid token until its natural expiry. An absent,
    /// malformed, or already-expired token is a no-op: the caller is
    /// effectively logged out either way.
    pub fn logout(&self, token: &str) {
        if !self.jwt.is_valid(token) {
            return;
        }
        if let Some(expires_at) = self.jwt.expires_at(token) {
            self.revocation_list.revoke(token, expires_at);
            tracing::info!("Token revoked on logout");
        }
    }

    /// Issue a token for a subject whose identity was already
    /// established by an external provider. No password check.
    pub fn bridge_federated_login(&self, email: &str) -> Result<String, ServiceError> {
        let token = self.jwt.issue(email)?;
        tracing::info!(email = %email, "Federated login bridged");
        Ok(token)
    }
}

/// Resolve the role requested at signup. Only ADMIN and USER are
/// honored; anything else (including unparsable input) falls back to
/// USER so that a half-configured role system never blocks signup.
fn resolve_signup_role(requested: Option<&str>) -> RoleName {
    match requested {
        None => RoleName::User,
        Some(raw) => match raw.parse::<RoleName>() {
            Ok(RoleName::Admin) => RoleName::Admin,
            Ok(RoleName::User) => RoleName::User,
            Ok(other) => {
                tracing::warn!(requested = %other, "Role not allowed at signup, defaulting to USER");
                RoleName::User
            }
            Err(_) => {
                tracing::warn!(requested = %raw, "Unknown role requested, defaulting to USER");
                RoleName::User
            }
        },
    }
}
