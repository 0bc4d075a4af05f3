use once_cell::sync::Lazy;
use reqwest::{Client, Response};
use secrecy::Secret;
use serde_json::Value;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::{net::SocketAddr, time::Duration};
use uuid::Uuid;
use waitlist::{
    configuration::{get_configuration, DatabaseSettings, Settings},
    domain::Subscriber,
    startup::{get_connection_pool, Application},
    subscriber_store::recent_subscribers,
    telemetry::{get_subscriber, init_subscriber},
};
use wiremock::MockServer;

static TRACING: Lazy<()> = Lazy::new(|| {
    let name = "test";
    let default_env_filter = "info";
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(name.into(), default_env_filter.into(), std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(name.into(), default_env_filter.into(), std::io::sink);
        init_subscriber(subscriber);
    }
});

static FAILED_TO_EXECUTE_REQUEST: &str = "Failed to execute request";

pub const EMAIL_API_TOKEN: &str = "test-email-api-token";
pub const NOTIFICATION_SENDER: &str = "Waitlist <waitlist@example.com>";
pub const NOTIFICATION_RECIPIENTS: [&str; 2] = ["ops@example.com", "team@example.com"];
pub const NOTIFICATION_TIMEOUT_MILLISECONDS: u64 = 200;

pub struct TestApp {
    pub address: SocketAddr,
    pub db_pool: Option<PgPool>,
    pub chat_server: MockServer,
    pub email_server: MockServer,
    client: Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(true).await
    }

    pub async fn spawn_without_database() -> Self {
        Self::spawn_with(false).await
    }

    pub async fn spawn_with_store_timeout(store_timeout: Duration) -> Self {
        Self::spawn_configured(true, |config| {
            if let Some(database) = config.database.as_mut() {
                database.timeout_milliseconds = store_timeout.as_millis() as u64;
            }
        })
        .await
    }

    async fn spawn_with(database: bool) -> Self {
        Self::spawn_configured(database, |_| {}).await
    }

    async fn spawn_configured(database: bool, customize: impl FnOnce(&mut Settings)) -> Self {
        Lazy::force(&TRACING);

        let mut config = get_configuration().expect("Failed to read configuration");
        config.application.port = 0;
        customize(&mut config);

        let chat_server = MockServer::start().await;
        let email_server = MockServer::start().await;
        configure_notifications(&mut config, &chat_server, &email_server);

        let db_pool = if database {
            let database = config
                .database
                .as_mut()
                .expect("Database must be configured for tests");
            database.database_name = Uuid::new_v4().to_string();
            Some(configure_database(database).await)
        } else {
            config.database = None;
            None
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build application");
        let address = app.local_addr().expect("Failed to get local address");

        tokio::spawn(app.run_until_stopped());

        Self {
            address,
            db_pool,
            chat_server,
            email_server,
            client: Client::new(),
        }
    }

    pub async fn get_health_check(&self) -> Response {
        self.client
            .get(self.url("/health_check"))
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn post_subscribe(&self, body: &Value) -> Response {
        self.client
            .post(self.url("/subscribe"))
            .json(body)
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn post_subscribe_raw(&self, body: &'static str, content_type: &str) -> Response {
        self.client
            .post(self.url("/subscribe"))
            .header("Content-Type", content_type)
            .body(body)
            .send()
            .await
            .expect(FAILED_TO_EXECUTE_REQUEST)
    }

    pub async fn saved_subscribers(&self) -> Vec<Subscriber> {
        let db_pool = self
            .db_pool
            .as_ref()
            .expect("Test app was spawned without a database");

        recent_subscribers(db_pool, 100)
            .await
            .expect("Failed to fetch saved subscribers")
    }

    fn url(&self, endpoint: &str) -> String {
        format!("http://{}{endpoint}", self.address)
    }
}

fn configure_notifications(
    config: &mut Settings,
    chat_server: &MockServer,
    email_server: &MockServer,
) {
    let chat_webhook = &mut config.notifications.chat_webhook;
    chat_webhook.url = Some(Secret::new(format!("{}/webhook", chat_server.uri())));
    chat_webhook.timeout_milliseconds = NOTIFICATION_TIMEOUT_MILLISECONDS;

    let email = &mut config.notifications.email;
    email.base_url = email_server.uri();
    email.authorization_token = Some(Secret::new(EMAIL_API_TOKEN.into()));
    email.sender_email = Some(NOTIFICATION_SENDER.into());
    email.recipients = Some(NOTIFICATION_RECIPIENTS.join(", "));
    email.timeout_milliseconds = NOTIFICATION_TIMEOUT_MILLISECONDS;
}

async fn configure_database(configuration: &DatabaseSettings) -> PgPool {
    let mut conn = PgConnection::connect_with(&configuration.without_db())
        .await
        .expect("Failed to connect to Postgres");

    conn.execute(format!(r#"CREATE DATABASE "{}";"#, configuration.database_name).as_str())
        .await
        .expect("Failed to create database");

    let pool = get_connection_pool(configuration);

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    pool
}
