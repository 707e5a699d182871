use eventra_core::error::AppError;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub service_name: String,
    pub log_level: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub security: SecurityConfig,
    pub password_policy: PasswordPolicy,
    pub google: GoogleOAuthConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Postgres connection string. When unset, the service runs with the
    /// in-memory credential store (development only).
    pub url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub token_expiry_hours: i64,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// The single origin allowed to reach origin-gated endpoints.
    pub allowed_origin: String,
    /// Paths that require a matching Origin header before any
    /// authentication work happens.
    pub origin_gated_paths: Vec<String>,
    /// Where the federated login callback redirects on success.
    pub frontend_url: String,
}

#[derive(Debug, Clone)]
pub struct PasswordPolicy {
    pub min_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digit: bool,
    pub require_special: bool,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            require_uppercase: true,
            require_lowercase: true,
            require_digit: true,
            require_special: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let is_prod = environment == Environment::Prod;

        let config = Config {
            environment: environment.clone(),
            service_name: get_env("SERVICE_NAME", Some("eventra-auth"), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            port: parse_env("PORT", "8080", is_prod)?,
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").ok(),
            },
            jwt: JwtConfig {
                secret: get_env("JWT_SECRET", Some("dev-only-signing-secret"), is_prod)?,
                token_expiry_hours: parse_env("JWT_TOKEN_EXPIRY_HOURS", "2", is_prod)?,
            },
            security: SecurityConfig {
                allowed_origin: get_env(
                    "ALLOWED_ORIGIN",
                    Some("http://localhost:3000"),
                    is_prod,
                )?,
                origin_gated_paths: get_env("ORIGIN_GATED_PATHS", Some("/login"), is_prod)?
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .collect(),
                frontend_url: get_env(
                    "FRONTEND_URL",
                    Some("http://localhost:3000"),
                    is_prod,
                )?,
            },
            password_policy: PasswordPolicy {
                min_length: parse_env("PASSWORD_MIN_LENGTH", "8", is_prod)?,
                require_uppercase: parse_env("PASSWORD_REQUIRE_UPPERCASE", "true", is_prod)?,
                require_lowercase: parse_env("PASSWORD_REQUIRE_LOWERCASE", "true", is_prod)?,
                require_digit: parse_env("PASSWORD_REQUIRE_DIGIT", "true", is_prod)?,
                require_special: parse_env("PASSWORD_REQUIRE_SPECIAL", "true", is_prod)?,
            },
            google: GoogleOAuthConfig {
                client_id: get_env("GOOGLE_CLIENT_ID", Some(""), is_prod)?,
                client_secret: get_env("GOOGLE_CLIENT_SECRET", Some(""), is_prod)?,
                redirect_uri: get_env(
                    "GOOGLE_REDIRECT_URI",
                    Some("http://localhost:8080/oauth/google/callback"),
                    is_prod,
                )?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.port == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "PORT must be greater than 0"
            )));
        }

        if self.jwt.token_expiry_hours <= 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "JWT_TOKEN_EXPIRY_HOURS must be positive"
            )));
        }

        if self.environment == Environment::Prod {
            if self.jwt.secret == "dev-only-signing-secret" {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "JWT_SECRET must be set in production"
                )));
            }
            if self.security.allowed_origin == "*" {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "Wildcard origin not allowed in production"
                )));
            }
        }

        Ok(())
    }
}

/// Typed variant of [`get_env`]: a value that is present but does not
/// parse is a startup error, never a silent fallback to the default.
fn parse_env<T>(key: &str, default: &str, is_prod: bool) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = get_env(key, Some(default), is_prod)?;
    raw.parse().map_err(|e: T::Err| {
        AppError::ConfigError(anyhow::anyhow!("{}: invalid value '{}': {}", key, raw, e))
    })
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}
