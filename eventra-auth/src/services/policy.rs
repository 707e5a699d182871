//! Password policy validation.
//!
//! The policy is a configuration constant loaded at startup, not
//! hard-wired logic; signup rejects credentials that fail it.

use crate::config::PasswordPolicy;

#[derive(Debug, Clone)]
pub enum PolicyError {
    PasswordTooShort {
        min_length: usize,
        actual_length: usize,
    },
    PasswordMissingUppercase,
    PasswordMissingLowercase,
    PasswordMissingDigit,
    PasswordMissingSpecial,
}

impl std::fmt::Display for PolicyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyError::PasswordTooShort {
                min_length,
                actual_length,
            } => {
                write!(
                    f,
                    "Password must be at least {} characters (got {})",
                    min_length, actual_length
                )
            }
            PolicyError::PasswordMissingUppercase => {
                write!(f, "Password must contain at least one uppercase letter")
            }
            PolicyError::PasswordMissingLowercase => {
                write!(f, "Password must contain at least one lowercase letter")
            }
            PolicyError::PasswordMissingDigit => {
                write!(f, "Password must contain at least one number")
            }
            PolicyError::PasswordMissingSpecial => {
                write!(f, "Password must contain at least one special character")
            }
        }
    }
}

impl std::error::Error for PolicyError {}

pub struct PolicyService;

impl PolicyService {
    /// Validate a password against the configured policy. Returns the
    /// first violation found.
    pub fn validate_password(password: &str, policy: &PasswordPolicy) -> Result<(), PolicyError> {
        if password.chars().count() < policy.min_length {
            return Err(PolicyError::PasswordTooShort {
                min_length: policy.min_length,
                actual_length: password.chars().count(),
            });
        }

        if policy.require_uppercase && !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(PolicyError::PasswordMissingUppercase);
        }

        if policy.require_lowercase && !password.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(PolicyError::PasswordMissingLowercase);
        }

        if policy.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(PolicyError::PasswordMissingDigit);
        }

        if policy.require_special && !password.chars().any(|c| c.is_ascii_punctuation()) {
            return Err(PolicyError::PasswordMissingSpecial);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_policy() -> PasswordPolicy {
        PasswordPolicy::default()
    }

    #[test]
    fn weak_password_below_length_fails() {
        let result = PolicyService::validate_password("Weak1", &default_policy());
        assert!(matches!(result, Err(PolicyError::PasswordTooShort { .. })));
    }

    #[test]
    fn strong_password_passes() {
        assert!(PolicyService::validate_password("Strong1!", &default_policy()).is_ok());
    }

    #[test]
    fn missing_uppercase_fails() {
        let result = PolicyService::validate_password("strong1!pass", &default_policy());
        assert!(matches!(result, Err(PolicyError::PasswordMissingUppercase)));
    }

    #[test]
    fn missing_digit_fails() {
        let result = PolicyService::validate_password("StrongPass!", &default_policy());
        assert!(matches!(result, Err(PolicyError::PasswordMissingDigit)));
    }

    #[test]
    fn missing_special_fails() {
        let result = PolicyService::validate_password("StrongPass1", &default_policy());
        assert!(matches!(result, Err(PolicyError::PasswordMissingSpecial)));
    }

    #[test]
    fn lenient_policy_accepts_simple_password() {
        let policy = PasswordPolicy {
            min_length: 4,
            require_uppercase: false,
            require_lowercase: false,
            require_digit: false,
            require_special: false,
        };
        assert!(PolicyService::validate_password("abcd", &policy).is_ok());
    }
}
