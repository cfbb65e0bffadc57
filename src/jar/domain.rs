//! Core jar domain types.

use std::{fmt::Display, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use unicode_segmentation::UnicodeSegmentation;

use crate::Error;

/// Database identifier for a jar.
pub type JarId = i64;

/// The maximum length of a jar name in characters.
pub const MAX_NAME_LENGTH: usize = 50;
/// The maximum length of a jar description in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// A validated, non-empty jar name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct JarName(String);

impl JarName {
    /// Create a jar name.
    ///
    /// # Errors
    /// Returns [Error::EmptyJarName] if `name` is empty or only whitespace,
    /// or [Error::JarNameTooLong] if it exceeds [MAX_NAME_LENGTH] characters.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            return Err(Error::EmptyJarName);
        }

        if name.graphemes(true).count() > MAX_NAME_LENGTH {
            return Err(Error::JarNameTooLong);
        }

        Ok(Self(name.to_string()))
    }

    /// Create a jar name without validation.
    ///
    /// The caller should ensure the string is non-empty and within length.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if the length invariants are violated it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for JarName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for JarName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JarName::new(s)
    }
}

impl Display for JarName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A budget envelope holding a running balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jar {
    /// The ID of the jar.
    pub id: JarId,
    /// The name of the jar, e.g. "Necessities".
    pub name: JarName,
    /// The share of income this jar is meant to receive, as a percentage.
    ///
    /// Informational only: deposits are never split automatically.
    pub percentage: Decimal,
    /// A text description of what the jar is for.
    pub description: String,
    /// The current balance. Never negative.
    pub balance: Decimal,
    /// When the jar was created.
    pub created_at: OffsetDateTime,
    /// When the jar's metadata or balance last changed, if ever.
    pub updated_at: Option<OffsetDateTime>,
}

/// The validated fields for creating a jar or replacing its metadata.
///
/// Does not include a balance: jars start at zero and balances only change
/// through deposits, withdrawals and transfers.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJar {
    /// The name of the jar.
    pub name: JarName,
    /// The jar's allocation percentage.
    pub percentage: Decimal,
    /// A text description of what the jar is for.
    pub description: String,
}

impl NewJar {
    /// Validate the metadata fields for a jar.
    ///
    /// # Errors
    /// Returns [Error::PercentageOutOfRange] if `percentage` is outside 0-100,
    /// or [Error::JarDescriptionTooLong] if the description exceeds
    /// [MAX_DESCRIPTION_LENGTH] characters.
    pub fn new(name: JarName, percentage: Decimal, description: &str) -> Result<Self, Error> {
        if percentage < Decimal::ZERO || percentage > Decimal::ONE_HUNDRED {
            return Err(Error::PercentageOutOfRange(percentage));
        }

        if description.graphemes(true).count() > MAX_DESCRIPTION_LENGTH {
            return Err(Error::JarDescriptionTooLong);
        }

        Ok(Self {
            name,
            percentage,
            description: description.to_string(),
        })
    }
}

/// Request body for jar creation and editing.
#[derive(Debug, Serialize, Deserialize)]
pub struct JarForm {
    /// The name of the jar.
    pub name: String,
    /// The jar's allocation percentage.
    pub percentage: Decimal,
    /// A text description of what the jar is for.
    #[serde(default)]
    pub description: String,
}

impl TryFrom<JarForm> for NewJar {
    type Error = Error;

    fn try_from(form: JarForm) -> Result<Self, Self::Error> {
        let name = JarName::new(&form.name)?;
        NewJar::new(name, form.percentage, &form.description)
    }
}

#[cfg(test)]
mod jar_name_tests {
    use crate::{Error, jar::JarName};

    #[test]
    fn new_fails_on_empty_string() {
        let jar_name = JarName::new("");

        assert_eq!(jar_name, Err(Error::EmptyJarName));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        let jar_name = JarName::new("\n\t \r");

        assert_eq!(jar_name, Err(Error::EmptyJarName));
    }

    #[test]
    fn new_fails_on_name_longer_than_fifty_characters() {
        let jar_name = JarName::new(&"a".repeat(51));

        assert_eq!(jar_name, Err(Error::JarNameTooLong));
    }

    #[test]
    fn new_succeeds_on_non_empty_string() {
        let jar_name = JarName::new("🔥 Emergency Fund");

        assert!(jar_name.is_ok())
    }
}
