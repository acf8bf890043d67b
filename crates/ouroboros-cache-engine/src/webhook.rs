//! Webhooks attached to one cache

use crate::error::EngineError;
use ouroboros_cache::{Payload, Webhook, WebhookCommand, WebhookSecret};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use uuid::Uuid;

struct Registration {
    topic_name: String,
    destination: String,
    secret: String,
}

fn new_secret() -> String {
    Uuid::new_v4().simple().to_string()
}

#[derive(Default)]
pub struct Webhooks {
    hooks: RwLock<BTreeMap<String, Registration>>,
}

impl Webhooks {
    pub fn apply(&self, cache_name: &str, command: WebhookCommand) -> Result<Payload, EngineError> {
        let reply = |name: &str, secret: &str| {
            Payload::Secret(WebhookSecret {
                cache_name: cache_name.to_string(),
                webhook_name: name.to_string(),
                secret: secret.to_string(),
            })
        };
        match command {
            WebhookCommand::Put {
                name,
                topic_name,
                destination,
            } => {
                let mut hooks = self.hooks.write();
                let registration = hooks.entry(name.clone()).or_insert_with(|| Registration {
                    topic_name: String::new(),
                    destination: String::new(),
                    secret: new_secret(),
                });
                registration.topic_name = topic_name;
                registration.destination = destination;
                Ok(reply(&name, &registration.secret))
            }
            WebhookCommand::Delete { name } => {
                self.hooks.write().remove(&name);
                Ok(Payload::Unit)
            }
            WebhookCommand::List => Ok(Payload::Webhooks(
                self.hooks
                    .read()
                    .iter()
                    .map(|(name, registration)| Webhook {
                        cache_name: cache_name.to_string(),
                        name: name.clone(),
                        topic_name: registration.topic_name.clone(),
                        destination: registration.destination.clone(),
                    })
                    .collect(),
            )),
            WebhookCommand::GetSecret { name } => match self.hooks.read().get(&name) {
                Some(registration) => Ok(reply(&name, &registration.secret)),
                None => Err(EngineError::WebhookNotFound(name)),
            },
            WebhookCommand::RotateSecret { name } => match self.hooks.write().get_mut(&name) {
                Some(registration) => {
                    registration.secret = new_secret();
                    Ok(reply(&name, &registration.secret))
                }
                None => Err(EngineError::WebhookNotFound(name)),
            },
        }
    }

    pub fn clear(&self) {
        self.hooks.write().clear();
    }
}
