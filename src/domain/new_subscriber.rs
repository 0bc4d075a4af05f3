use super::{Campus, SignupSource, SubscriberEmail, SubscriberName};
use serde::{
    de::{value::MapAccessDeserializer, MapAccess, Visitor},
    Deserialize, Deserializer,
};
use std::fmt;

/// Raw signup body as posted by the landing page. Every field is optional on the wire,
/// but the body itself must be an object.
#[derive(Debug, Default)]
pub struct SubscribePayload {
    pub email: Option<String>,
    pub name: Option<String>,
    pub campus: Option<String>,
    pub source: Option<String>,
}

#[derive(Deserialize)]
struct PayloadFields {
    email: Option<String>,
    name: Option<String>,
    campus: Option<String>,
    source: Option<String>,
}

impl<'de> Deserialize<'de> for SubscribePayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(PayloadVisitor)
    }
}

struct PayloadVisitor;

impl<'de> Visitor<'de> for PayloadVisitor {
    type Value = SubscribePayload;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a signup object")
    }

    fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let PayloadFields {
            email,
            name,
            campus,
            source,
        } = PayloadFields::deserialize(MapAccessDeserializer::new(map))?;

        Ok(SubscribePayload {
            email,
            name,
            campus,
            source,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewSubscriber {
    pub email: SubscriberEmail,
    pub name: SubscriberName,
    pub campus: Campus,
    pub source: SignupSource,
}

impl TryFrom<SubscribePayload> for NewSubscriber {
    type Error = String;

    fn try_from(payload: SubscribePayload) -> Result<Self, Self::Error> {
        let email = SubscriberEmail::parse(payload.email.unwrap_or_default())?;

        Ok(Self {
            email,
            name: SubscriberName::parse(payload.name),
            campus: Campus::parse(payload.campus),
            source: SignupSource::parse(payload.source),
        })
    }
}
