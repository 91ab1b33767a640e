//! Privileged account management with the service-role key.

use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use super::{authorize, send_checked};
use crate::config::SupabaseConfig;
use crate::error::ProviderError;
use crate::identity::IdentityAdmin;

pub struct SupabaseAdmin {
    http: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseAdmin {
    /// # Errors
    ///
    /// Returns `NotConfigured` when the config carries no service-role key.
    pub fn from_config(config: &SupabaseConfig) -> Result<Self, ProviderError> {
        let service_key = config
            .service_role_key
            .clone()
            .ok_or(ProviderError::NotConfigured("SUPABASE_SERVICE_ROLE_KEY"))?;
        Ok(Self { http: Client::new(), base_url: config.url.clone(), service_key })
    }
}

#[async_trait(?Send)]
impl IdentityAdmin for SupabaseAdmin {
    async fn delete_user(&self, user_id: &str) -> Result<(), ProviderError> {
        let url = format!("{}/auth/v1/admin/users/{user_id}", self.base_url);
        send_checked(authorize(self.http.delete(url), &self.service_key, &self.service_key)).await?;
        info!(%user_id, "account deleted");
        Ok(())
    }
}
