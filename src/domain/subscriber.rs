use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// A stored waitlist row.
#[derive(Debug, FromRow)]
pub struct Subscriber {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub campus: String,
    pub source: String,
    pub created_at: OffsetDateTime,
}
