//! PhoneNumber value object and the mobile number grammars it is checked against.

use super::errors::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

static ID_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\+?62|0)8(1[1-9]|2[1238]|3[1238]|5[12356789]|7[78]|9[56789]|8[1-9])[\s?|\d]{5,11}$")
        .expect("id-ID pattern is valid")
});

static EN_US: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^((\+1|1)?( |-)?)?(\([2-9][0-9]{2}\)|[2-9][0-9]{2})( |-)?([2-9][0-9]{2}( |-)?[0-9]{4})$")
        .expect("en-US pattern is valid")
});

static EN_GB: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+?44|0)7\d{9}$").expect("en-GB pattern is valid"));

static MS_MY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\+?6?01)(([0145](-|\s)?\d{7,8})|([236-9](\s|-)?\d{7}))$")
        .expect("ms-MY pattern is valid")
});

static EN_SG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+65)?[3689]\d{7}$").expect("en-SG pattern is valid"));

/// Region whose mobile number grammar phone numbers are validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhoneLocale {
    /// Indonesia.
    #[default]
    IdId,
    /// United States.
    EnUs,
    /// United Kingdom.
    EnGb,
    /// Malaysia.
    MsMy,
    /// Singapore.
    EnSg,
}

impl PhoneLocale {
    /// The BCP 47 style tag, e.g. `id-ID`.
    pub fn tag(self) -> &'static str {
        match self {
            Self::IdId => "id-ID",
            Self::EnUs => "en-US",
            Self::EnGb => "en-GB",
            Self::MsMy => "ms-MY",
            Self::EnSg => "en-SG",
        }
    }

    /// Whether `phone` is a mobile number in this locale.
    pub fn is_mobile(self, phone: &str) -> bool {
        let pattern: &Regex = match self {
            Self::IdId => &ID_ID,
            Self::EnUs => &EN_US,
            Self::EnGb => &EN_GB,
            Self::MsMy => &MS_MY,
            Self::EnSg => &EN_SG,
        };
        pattern.is_match(phone)
    }
}

impl FromStr for PhoneLocale {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id-ID" => Ok(Self::IdId),
            "en-US" => Ok(Self::EnUs),
            "en-GB" => Ok(Self::EnGb),
            "ms-MY" => Ok(Self::MsMy),
            "en-SG" => Ok(Self::EnSg),
            other => Err(ValidationError::UnknownLocale(other.to_string())),
        }
    }
}

impl fmt::Display for PhoneLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A phone number that passed the mobile grammar of some locale.
///
/// The text is kept as entered; numbers are not normalized, so
/// `0812...` and `+62812...` are distinct values for uniqueness purposes.
///
/// # Example
///
/// ```
/// use contact_book::domain::{PhoneLocale, PhoneNumber};
///
/// let phone = PhoneNumber::parse("081234567890", PhoneLocale::IdId).unwrap();
/// assert_eq!(phone.as_str(), "081234567890");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Validate `phone` against the mobile grammar of `locale`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidPhone` if the number does not match.
    pub fn parse(phone: impl Into<String>, locale: PhoneLocale) -> Result<Self, ValidationError> {
        let phone = phone.into();

        if !locale.is_mobile(&phone) {
            return Err(ValidationError::InvalidPhone(phone));
        }

        Ok(Self(phone))
    }

    /// Get the phone number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the underlying String.
    pub fn into_inner(self) -> String {
        self.0
    }
}
