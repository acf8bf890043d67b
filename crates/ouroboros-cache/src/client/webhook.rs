//! Webhook management

use super::Dispatcher;
use crate::error::SdkError;
use crate::request::{Payload, Request, WebhookCommand};
use crate::responses::{
    DeleteWebhook, GetWebhookSecret, ListWebhooks, PutWebhook, RotateWebhookSecret,
};
use crate::types::Webhook;
use crate::validation::{validate_cache_name, validate_topic_name, validate_webhook_name};

/// Client for webhooks attached to cache topics. Obtained from
/// [`CacheClient::webhook_client`](super::CacheClient::webhook_client).
#[derive(Clone)]
pub struct WebhookClient {
    dispatcher: Dispatcher,
}

impl WebhookClient {
    pub(crate) fn from_dispatcher(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    fn request(cache_name: &str, command: WebhookCommand) -> Result<Request, SdkError> {
        validate_cache_name(cache_name)?;
        Ok(Request::Webhook {
            cache_name: cache_name.to_string(),
            command,
        })
    }

    /// Create or replace a webhook. Returns its signing secret.
    pub async fn put_webhook(&self, webhook: Webhook) -> PutWebhook {
        let cache_name = webhook.cache_name.clone();
        self.dispatcher
            .call(
                "put_webhook",
                &cache_name,
                || {
                    validate_webhook_name(&webhook.name)?;
                    validate_topic_name(&webhook.topic_name)?;
                    if webhook.destination.trim().is_empty() {
                        return Err(SdkError::invalid_argument(
                            "Webhook destination must not be empty",
                        ));
                    }
                    Self::request(
                        &webhook.cache_name,
                        WebhookCommand::Put {
                            name: webhook.name,
                            topic_name: webhook.topic_name,
                            destination: webhook.destination,
                        },
                    )
                },
                |payload| match payload {
                    Payload::Secret(secret) => Some(PutWebhook::Success(secret)),
                    _ => None,
                },
            )
            .await
    }

    pub async fn delete_webhook(&self, cache_name: &str, webhook_name: &str) -> DeleteWebhook {
        self.dispatcher
            .call(
                "delete_webhook",
                cache_name,
                || {
                    validate_webhook_name(webhook_name)?;
                    Self::request(
                        cache_name,
                        WebhookCommand::Delete {
                            name: webhook_name.to_string(),
                        },
                    )
                },
                |payload| matches!(payload, Payload::Unit).then_some(DeleteWebhook::Success),
            )
            .await
    }

    pub async fn list_webhooks(&self, cache_name: &str) -> ListWebhooks {
        self.dispatcher
            .call(
                "list_webhooks",
                cache_name,
                || Self::request(cache_name, WebhookCommand::List),
                |payload| match payload {
                    Payload::Webhooks(webhooks) => Some(ListWebhooks::Success(webhooks)),
                    _ => None,
                },
            )
            .await
    }

    pub async fn get_webhook_secret(&self, cache_name: &str, webhook_name: &str) -> GetWebhookSecret {
        self.dispatcher
            .call(
                "get_webhook_secret",
                cache_name,
                || {
                    validate_webhook_name(webhook_name)?;
                    Self::request(
                        cache_name,
                        WebhookCommand::GetSecret {
                            name: webhook_name.to_string(),
                        },
                    )
                },
                |payload| match payload {
                    Payload::Secret(secret) => Some(GetWebhookSecret::Success(secret)),
                    _ => None,
                },
            )
            .await
    }

    /// Replace the signing secret; the old one stops being valid.
    pub async fn rotate_webhook_secret(
        &self,
        cache_name: &str,
        webhook_name: &str,
    ) -> RotateWebhookSecret {
        self.dispatcher
            .call(
                "rotate_webhook_secret",
                cache_name,
                || {
                    validate_webhook_name(webhook_name)?;
                    Self::request(
                        cache_name,
                        WebhookCommand::RotateSecret {
                            name: webhook_name.to_string(),
                        },
                    )
                },
                |payload| match payload {
                    Payload::Secret(secret) => Some(RotateWebhookSecret::Success(secret)),
                    _ => None,
                },
            )
            .await
    }
}
