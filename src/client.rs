use std::ops::Deref;

use token_source::{NoopTokenSourceProvider, TokenSourceProvider};

use crate::http::storage_client::{StorageClient, SCOPES};

#[derive(Debug)]
pub struct ClientConfig {
    pub http: Option<reqwest::Client>,
    pub storage_endpoint: String,
    pub token_source_provider: Option<Box<dyn TokenSourceProvider>>,
    pub project_id: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            http: None,
            storage_endpoint: "https://storage.googleapis.com".to_string(),
            token_source_provider: Some(Box::new(NoopTokenSourceProvider {})),
            project_id: None,
        }
    }
}

impl ClientConfig {
    pub fn anonymous(mut self) -> Self {
        self.token_source_provider = None;
        self
    }

    /// Authenticates with a parsed service-account credentials file. The file
    /// contents are handed to the token source opaquely; this crate never
    /// inspects the key material itself.
    pub async fn with_credentials(
        mut self,
        credentials: google_cloud_auth::credentials::CredentialsFile,
    ) -> Result<Self, google_cloud_auth::error::Error> {
        let ts = google_cloud_auth::token::DefaultTokenSourceProvider::new_with_credentials(
            Self::auth_config(),
            Box::new(credentials),
        )
        .await?;
        self.project_id = ts
            .source_credentials
            .as_ref()
            .and_then(|cred| cred.project_id.clone());
        self.token_source_provider = Some(Box::new(ts));
        Ok(self)
    }

    fn auth_config() -> google_cloud_auth::project::Config<'static> {
        google_cloud_auth::project::Config::default().with_scopes(&SCOPES)
    }
}

#[derive(Clone)]
pub struct Client {
    storage_client: StorageClient,
}

impl Deref for Client {
    type Target = StorageClient;

    fn deref(&self) -> &Self::Target {
        &self.storage_client
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl Client {
    /// New client
    pub fn new(config: ClientConfig) -> Self {
        let ts = match config.token_source_provider {
            Some(tsp) => Some(tsp.token_source()),
            None => {
                tracing::trace!("Use anonymous access due to lack of token");
                None
            }
        };
        let http = config.http.unwrap_or_default();
        Self {
            storage_client: StorageClient::new(ts, config.storage_endpoint.as_str(), http),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Client, ClientConfig};

    #[test]
    fn anonymous_client_builds_without_credentials() {
        // Anonymous access carries no token source; construction must not
        // reach for one.
        let config = ClientConfig::default().anonymous();
        let _client = Client::new(config);
    }
}
