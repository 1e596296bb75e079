use async_trait::async_trait;
use aws_sdk_ssm::Client as SsmClient;
use aws_sdk_ssm::operation::get_parameter::GetParameterError;
use tracing::{debug, info};

use super::config::AppConfig;
use super::models::Settings;
use crate::errors::DigestError;

/// Read access to a named-parameter store.
///
/// `Ok(None)` means the parameter does not exist or has no value.
#[async_trait]
pub trait ParameterStore: Send + Sync {
    async fn get(&self, name: &str) -> Result<Option<String>, DigestError>;
}

pub struct SsmParameterStore {
    client: SsmClient,
}

impl SsmParameterStore {
    #[must_use]
    pub fn new(client: SsmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ParameterStore for SsmParameterStore {
    async fn get(&self, name: &str) -> Result<Option<String>, DigestError> {
        match self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(true)
            .send()
            .await
        {
            Ok(resp) => Ok(resp
                .parameter
                .and_then(|param| param.value)
                .filter(|value| !value.trim().is_empty())),
            Err(e) => {
                let not_found = e
                    .as_service_error()
                    .is_some_and(GetParameterError::is_parameter_not_found);
                if not_found {
                    Ok(None)
                } else {
                    Err(DigestError::AwsError(format!("ssm get_parameter {name}: {e}")))
                }
            }
        }
    }
}

async fn require(store: &dyn ParameterStore, name: &str) -> Result<String, DigestError> {
    let value = store
        .get(name)
        .await?
        .ok_or_else(|| DigestError::ConfigurationMissing(name.to_string()))?;
    debug!(parameter = name, "Resolved parameter");
    Ok(value)
}

/// Resolves the model id, sender and recipient for this run.
///
/// # Errors
///
/// Returns `ConfigurationMissing` naming the first absent parameter, or an
/// AWS error if the store cannot be reached.
pub async fn resolve_settings(
    store: &dyn ParameterStore,
    config: &AppConfig,
) -> Result<Settings, DigestError> {
    let names = &config.parameters;
    let settings = Settings {
        model_id: require(store, &names.model_id).await?,
        sender_email: require(store, &names.sender_email).await?,
        recipient_email: require(store, &names.recipient_email).await?,
    };
    info!(model_id = %settings.model_id, "Resolved run settings");
    Ok(settings)
}
