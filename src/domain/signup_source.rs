use super::capped_text::clean;

/// Where a signup came from. Blank or missing values fall back to [`SignupSource::DEFAULT`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupSource(String);

impl SignupSource {
    pub const MAX_LENGTH: usize = 64;
    pub const DEFAULT: &'static str = "landing";

    pub fn parse(s: Option<String>) -> SignupSource {
        let source = clean(s.as_deref().unwrap_or_default(), Self::MAX_LENGTH);

        if source.is_empty() {
            Self(Self::DEFAULT.into())
        } else {
            Self(source)
        }
    }
}

impl AsRef<str> for SignupSource {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
