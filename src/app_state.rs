use crate::notifications::SignupNotifier;
use sqlx::PgPool;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    /// `None` when the subscriber store is not configured.
    pub db_pool: Option<PgPool>,
    pub store_timeout: Duration,
    pub notifier: SignupNotifier,
}
