use crate::{
    chat_client::ChatWebhookClient,
    domain::{NewSubscriber, SubscriberEmail},
    email_client::EmailClient,
};
use std::{error::Error, future::Future};

const EMAIL_SUBJECT: &str = "New waitlist signup";

/// Awaits `task` and logs its failure instead of returning it.
pub async fn best_effort<F, E>(channel: &'static str, task: F)
where
    F: Future<Output = Result<(), E>>,
    E: Error,
{
    if let Err(e) = task.await {
        tracing::warn!(
            error.cause_chain = ?e,
            error.message = %e,
            channel,
            "Failed to deliver signup notification. Skipping."
        );
    }
}

#[derive(Clone)]
pub struct EmailNotification {
    client: EmailClient,
    recipients: Vec<SubscriberEmail>,
}

impl EmailNotification {
    pub fn new(client: EmailClient, recipients: Vec<SubscriberEmail>) -> Self {
        Self { client, recipients }
    }
}

/// Fans a new signup out to the optional chat webhook and notification email.
#[derive(Clone, Default)]
pub struct SignupNotifier {
    chat: Option<ChatWebhookClient>,
    email: Option<EmailNotification>,
}

impl SignupNotifier {
    pub fn new(chat: Option<ChatWebhookClient>, email: Option<EmailNotification>) -> Self {
        Self { chat, email }
    }

    #[tracing::instrument(
        name = "Notifying about a new signup",
        skip_all,
        fields(subscriber_email = %new_subscriber.email)
    )]
    pub async fn notify(&self, new_subscriber: &NewSubscriber) {
        let chat = async {
            if let Some(chat) = &self.chat {
                let text = chat_message(new_subscriber);
                best_effort("chat_webhook", chat.post_message(&text)).await;
            }
        };

        let email = async {
            if let Some(EmailNotification { client, recipients }) = &self.email {
                let text = email_text(new_subscriber);
                best_effort(
                    "email",
                    client.send_email(recipients, EMAIL_SUBJECT, &text),
                )
                .await;
            }
        };

        tokio::join!(chat, email);
    }
}

/// Name and campus as shown in notifications, with `-` standing in for blanks.
fn name_and_campus(new_subscriber: &NewSubscriber) -> (&str, &str) {
    let name = if new_subscriber.name.is_empty() {
        "-"
    } else {
        new_subscriber.name.as_ref()
    };
    let campus = if new_subscriber.campus.is_empty() {
        "-"
    } else {
        new_subscriber.campus.as_ref()
    };

    (name, campus)
}

fn chat_message(new_subscriber: &NewSubscriber) -> String {
    let (name, campus) = name_and_campus(new_subscriber);
    format!(
        "New waitlist signup\n• Email: {}\n• Name: {}\n• Campus: {}\n• Source: {}",
        new_subscriber.email,
        name,
        campus,
        new_subscriber.source.as_ref(),
    )
}

fn email_text(new_subscriber: &NewSubscriber) -> String {
    let (name, campus) = name_and_campus(new_subscriber);
    format!(
        "Email: {}\nName: {}\nCampus: {}\nSource: {}",
        new_subscriber.email,
        name,
        campus,
        new_subscriber.source.as_ref(),
    )
}
