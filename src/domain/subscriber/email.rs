use derive_more::Display;

/// An email address normalized to its storage form: trimmed and lower-cased.
///
/// The only structural rule is the presence of an `@`; deliverability is the
/// mail relay's concern.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display(fmt = "{}", _0)]
pub struct Email(String);

impl TryFrom<String> for Email {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_lowercase();

        if normalized.is_empty() {
            return Err("email is empty".into());
        }

        if !normalized.contains('@') {
            return Err(format!("{} is not a valid email address", value.trim()));
        }

        Ok(Self(normalized))
    }
}

impl Email {
    /// Normalizes an address coming from a bulk import.
    ///
    /// Imports carry records that were already accepted elsewhere, so only blank values are
    /// refused; the `@` rule applies to interactive sign-ups.
    pub fn from_import(value: &str) -> Option<Self> {
        let normalized = value.trim().to_lowercase();
        (!normalized.is_empty()).then_some(Self(normalized))
    }
}

impl TryFrom<&str> for Email {
    type Error = String;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_from(value.to_owned())
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
