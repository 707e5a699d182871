use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{RoleName, User};

/// Credential store: persisted identities and their role assignments.
///
/// A lookup miss is `Ok(None)`, never an error — the token middleware
/// relies on this to treat a federated-login subject with no local
/// credential as a designed branch rather than a caught exception.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Find an identity by email, case-insensitively.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, anyhow::Error>;

    /// Whether an identity with this email exists, case-insensitively.
    async fn email_exists(&self, email: &str) -> Result<bool, anyhow::Error>;

    async fn insert(&self, user: &User) -> Result<(), anyhow::Error>;
}

/// Postgres-backed credential store.
///
/// Schema: `users(id UUID PRIMARY KEY, email TEXT UNIQUE, password_hash
/// TEXT, enabled BOOLEAN, created_at TIMESTAMPTZ, roles TEXT[])`.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub async fn connect(url: &str) -> Result<Self, anyhow::Error> {
        tracing::info!("Connecting to Postgres");
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(url)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to connect to Postgres: {}", e))?;

        tracing::info!("Successfully connected to Postgres");
        Ok(Self { pool })
    }

    pub async fn initialize_schema(&self) -> Result<(), anyhow::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                email TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                enabled BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMPTZ NOT NULL,
                roles TEXT[] NOT NULL DEFAULT '{}'
            );
            CREATE UNIQUE INDEX IF NOT EXISTS users_email_lower_idx
                ON users (lower(email));
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize schema: {}", e))?;
        Ok(())
    }

    fn row_to_user(row: sqlx::postgres::PgRow) -> Result<User, anyhow::Error> {
        let id: Uuid = row.try_get("id")?;
        let email: String = row.try_get("email")?;
        let password_hash: String = row.try_get("password_hash")?;
        let enabled: bool = row.try_get("enabled")?;
        let created_at: DateTime<Utc> = row.try_get("created_at")?;
        let role_names: Vec<String> = row.try_get("roles")?;

        // Unknown role names in the column are skipped rather than
        // failing the lookup; the identity keeps its recognizable roles.
        let roles = role_names
            .iter()
            .filter_map(|name| match name.parse::<RoleName>() {
                Ok(role) => Some(role),
                Err(_) => {
                    tracing::warn!(email = %email, role = %name, "Skipping unknown role");
                    None
                }
            })
            .collect();

        Ok(User {
            id,
            email,
            password_hash,
            enabled,
            created_at,
            roles,
        })
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, anyhow::Error> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, enabled, created_at, roles \
             FROM users WHERE lower(email) = lower($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_user).transpose()
    }

    async fn email_exists(&self, email: &str) -> Result<bool, anyhow::Error> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE lower(email) = lower($1))")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn insert(&self, user: &User) -> Result<(), anyhow::Error> {
        let roles: Vec<String> = user.roles.iter().map(|r| r.as_str().to_string()).collect();
        sqlx::query(
            "INSERT INTO users (id, email, password_hash, enabled, created_at, roles) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.enabled)
        .bind(user.created_at)
        .bind(&roles)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

/// In-memory credential store keyed by lowercased email. Used by the
/// test suite and by store-less development deployments.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: DashMap<String, User>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace an identity's role assignment in place. Authorities are
    /// recomputed from current roles on every request, so this takes
    /// effect without re-issuing existing tokens.
    pub fn update_roles(&self, email: &str, roles: Vec<RoleName>) {
        if let Some(mut user) = self.users.get_mut(&email.to_lowercase()) {
            user.roles = roles;
        }
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, anyhow::Error> {
        Ok(self
            .users
            .get(&email.to_lowercase())
            .map(|entry| entry.clone()))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, anyhow::Error> {
        Ok(self.users.contains_key(&email.to_lowercase()))
    }

    async fn insert(&self, user: &User) -> Result<(), anyhow::Error> {
        self.users.insert(user.email.to_lowercase(), user.clone());
        Ok(())
    }
}
