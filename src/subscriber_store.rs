use crate::domain::{NewSubscriber, Subscriber};
use anyhow::Context;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Inserts the subscriber or refreshes the mutable fields of the row holding the same email.
/// `id` and `created_at` of an existing row are left untouched.
#[tracing::instrument(name = "Upserting subscriber", skip_all, fields(subscriber_email = %new_subscriber.email))]
pub async fn upsert_subscriber(
    db_pool: &PgPool,
    new_subscriber: &NewSubscriber,
) -> Result<Uuid, anyhow::Error> {
    let row = sqlx::query(
        r#"
        INSERT INTO waitlist_subscribers (email, name, campus, source)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE
        SET
            name = EXCLUDED.name,
            campus = EXCLUDED.campus,
            source = EXCLUDED.source
        RETURNING id
        "#,
    )
    .bind(new_subscriber.email.as_ref())
    .bind(new_subscriber.name.as_ref())
    .bind(new_subscriber.campus.as_ref())
    .bind(new_subscriber.source.as_ref())
    .fetch_one(db_pool)
    .await
    .context("Failed to upsert subscriber")?;

    row.try_get("id").context("Failed to read assigned subscriber id")
}

#[tracing::instrument(name = "Fetching recent subscribers", skip(db_pool))]
pub async fn recent_subscribers(
    db_pool: &PgPool,
    limit: i64,
) -> Result<Vec<Subscriber>, anyhow::Error> {
    sqlx::query_as::<_, Subscriber>(
        r#"
        SELECT id, email, name, campus, source, created_at
        FROM waitlist_subscribers
        ORDER BY created_at DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(db_pool)
    .await
    .context("Failed to fetch recent subscribers")
}
