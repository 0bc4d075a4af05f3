use super::capped_text::clean;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberName(String);

impl SubscriberName {
    pub const MAX_LENGTH: usize = 80;

    pub fn parse(s: Option<String>) -> SubscriberName {
        Self(clean(s.as_deref().unwrap_or_default(), Self::MAX_LENGTH))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for SubscriberName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
