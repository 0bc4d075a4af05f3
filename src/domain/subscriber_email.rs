use super::capped_text::clean;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub const MAX_LENGTH: usize = 120;

    /// Lower-cases, trims and caps the address, then checks it looks like `local@domain.tld`.
    pub fn parse(s: String) -> Result<SubscriberEmail, String> {
        static RE: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Email pattern is a valid regex")
        });

        let email = clean(&s.to_lowercase(), Self::MAX_LENGTH);

        if RE.is_match(&email) {
            Ok(Self(email))
        } else {
            Err(format!("`{s}` email has invalid format"))
        }
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
