//! EmailAddress value object.

use super::errors::ValidationError;

const MAX_LENGTH: usize = 254;
const MAX_LOCAL_LENGTH: usize = 64;
const MAX_LABEL_LENGTH: usize = 63;

/// Punctuation allowed in an unquoted local part besides `.`.
const LOCAL_SPECIALS: &str = "!#$%&'*+-/=?^_`{|}~";

/// A type-safe wrapper for email addresses.
///
/// This ensures that email addresses are validated at construction time.
///
/// # Example
///
/// ```
/// use contact_book::domain::EmailAddress;
///
/// let email = EmailAddress::new("user@example.com").unwrap();
/// assert_eq!(email.as_str(), "user@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new EmailAddress, validating the format.
    ///
    /// # Validation Rules
    ///
    /// - At most 254 characters with exactly one '@'
    /// - Local part of 1-64 characters: alphanumerics, `.` and
    ///   `!#$%&'*+-/=?^_`{|}~`, no leading, trailing or doubled dots
    /// - Domain of at least two labels; each label 1-63 alphanumerics or
    ///   hyphens without a leading or trailing hyphen
    /// - Top-level label of at least two letters (or a `xn--` punycode label)
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidEmail` if the email format is invalid.
    pub fn new(email: impl Into<String>) -> Result<Self, ValidationError> {
        let email = email.into();

        if !Self::is_valid(&email) {
            return Err(ValidationError::InvalidEmail(email));
        }

        Ok(Self(email))
    }

    /// Check an address against the grammar without allocating.
    pub fn is_valid(email: &str) -> bool {
        if email.is_empty() || email.chars().count() > MAX_LENGTH {
            return false;
        }

        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };

        if domain.contains('@') {
            return false;
        }

        Self::is_valid_local(local) && Self::is_valid_domain(domain)
    }

    fn is_valid_local(local: &str) -> bool {
        let len = local.chars().count();
        if len == 0 || len > MAX_LOCAL_LENGTH {
            return false;
        }

        if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
            return false;
        }

        local
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || LOCAL_SPECIALS.contains(c))
    }

    fn is_valid_domain(domain: &str) -> bool {
        let labels: Vec<&str> = domain.split('.').collect();
        if labels.len() < 2 {
            return false;
        }

        let labels_ok = labels.iter().all(|label| {
            let len = label.chars().count();
            len > 0
                && len <= MAX_LABEL_LENGTH
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_alphanumeric() || c == '-')
        });
        if !labels_ok {
            return false;
        }

        let Some(tld) = labels.last() else {
            return false;
        };
        tld.starts_with("xn--") || (tld.chars().count() >= 2 && tld.chars().all(char::is_alphabetic))
    }

    /// Get the email address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the underlying String.
    pub fn into_inner(self) -> String {
        self.0
    }
}
