use crate::types::{Webhook, WebhookSecret};

outcome! {
    /// Outcome of `put_webhook`; carries the webhook's signing secret.
    pub enum PutWebhook {
        Success(WebhookSecret),
    }
}

outcome! {
    pub enum DeleteWebhook {
        Success,
    }
}

outcome! {
    pub enum ListWebhooks {
        Success(Vec<Webhook>),
    }
}

impl ListWebhooks {
    pub fn webhooks(&self) -> Option<&[Webhook]> {
        match self {
            ListWebhooks::Success(webhooks) => Some(webhooks),
            _ => None,
        }
    }
}

outcome! {
    pub enum GetWebhookSecret {
        Success(WebhookSecret),
    }
}

outcome! {
    pub enum RotateWebhookSecret {
        Success(WebhookSecret),
    }
}

macro_rules! secret_accessor {
    ($($name:ident),*) => {
        $(
            impl $name {
                pub fn secret(&self) -> Option<&str> {
                    match self {
                        $name::Success(s) => Some(&s.secret),
                        _ => None,
                    }
                }
            }
        )*
    };
}

secret_accessor!(PutWebhook, GetWebhookSecret, RotateWebhookSecret);
