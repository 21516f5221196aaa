use anyhow::{Context, Result};
use shared_types::RegistrationContact;

use crate::config::PbxConfig;

/// Client for the PBX manager HTTP interface. One call, one blocking
/// round trip; the contact list is never cached.
pub struct ManagerClient {
    http: reqwest::Client,
    base_url: String,
    user: Option<String>,
    secret: Option<String>,
}

impl ManagerClient {
    pub fn new(config: &PbxConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.manager_url.trim_end_matches('/').to_string(),
            user: config.manager_user.clone(),
            secret: config.manager_secret.clone(),
        }
    }

    /// Fetch the live inbound registration contact list, in the order
    /// the manager reports it.
    pub async fn inbound_registrations(&self) -> Result<Vec<RegistrationContact>> {
        let url = format!("{}/registrations", self.base_url);

        let mut request = self.http.get(&url);
        if let Some(user) = &self.user {
            request = request.basic_auth(user, self.secret.as_deref());
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("Manager request to {url} failed"))?
            .error_for_status()
            .context("Manager returned an error status")?;

        let contacts = response
            .json::<Vec<RegistrationContact>>()
            .await
            .context("Manager returned malformed registration JSON")?;

        Ok(contacts)
    }
}
