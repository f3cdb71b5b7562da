//! Amazon SNS publisher.

use aws_config::BehaviorVersion;
use aws_sdk_sns::config::{Credentials, Region};
use aws_sdk_sns::error::DisplayErrorContext;
use aws_sdk_sns::Client;

use crate::config::MessagingConfig;
use crate::messaging::{MessageStructure, PublishError, PublishReceipt, Publisher};

/// Publishes messages to SNS topics through a shared client handle.
#[derive(Debug, Clone)]
pub struct SnsPublisher {
    client: Client,
}

impl SnsPublisher {
    /// Build the client once from gateway configuration.
    ///
    /// Static credentials are used when both key parts are configured,
    /// otherwise the default AWS credential chain applies.
    pub async fn from_config(config: &MessagingConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }

        if let (Some(access_key), Some(secret_key)) = (&config.access_key_id, &config.secret_access_key) {
            let credentials = Credentials::new(
                access_key,
                secret_key,
                config.session_token.clone(),
                None,
                "api-gateway",
            );
            loader = loader.credentials_provider(credentials);
        }

        if let Some(endpoint) = config.endpoint_url() {
            tracing::info!(endpoint = %endpoint, "Using SNS endpoint override");
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        Self::from_client(Client::new(&sdk_config))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

impl Publisher for SnsPublisher {
    async fn publish(
        &self,
        topic: &str,
        message: String,
        structure: MessageStructure,
    ) -> Result<PublishReceipt, PublishError> {
        let output = self
            .client
            .publish()
            .topic_arn(topic)
            .message(message)
            .message_structure(structure.as_str())
            .send()
            .await
            .map_err(|e| PublishError::rejected(topic, DisplayErrorContext(&e).to_string()))?;

        Ok(PublishReceipt {
            message_id: output.message_id().map(str::to_string),
        })
    }
}
