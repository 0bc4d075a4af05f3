mod campus;
mod capped_text;
mod new_subscriber;
mod signup_source;
mod subscriber;
mod subscriber_email;
mod subscriber_name;

pub use campus::Campus;
pub use new_subscriber::{NewSubscriber, SubscribePayload};
pub use signup_source::SignupSource;
pub use subscriber::Subscriber;
pub use subscriber_email::SubscriberEmail;
pub use subscriber_name::SubscriberName;
