pub mod app_state;
pub mod chat_client;
pub mod configuration;
pub mod domain;
pub mod email_client;
pub mod notifications;
pub mod request_id;
pub mod routes;
pub mod startup;
pub mod subscriber_store;
pub mod telemetry;
