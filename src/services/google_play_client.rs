use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::{StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::{
    config::GooglePlayConfig,
    error::{ClientError, PlayStoreError, Result},
    models::{ProductPurchase, SubscriptionPurchase},
    services::publisher_client::{Connector, PublisherClient},
};

/// OAuth scope for the Android Publisher API
pub const API_SCOPE: &str = "https://www.googleapis.com/auth/androidpublisher";
/// Token endpoint used when the key file doesn't name one
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_API_BASE_URL: &str = "https://androidpublisher.googleapis.com";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
/// Lifetime requested for the signed assertion (Google's maximum)
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Refresh this long before the access token actually expires
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

/// The fields of a Google service-account JSON key we need
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    pub async fn from_file(path: &Path) -> Result<Self> {
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            PlayStoreError::Credentials(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| PlayStoreError::Credentials(format!("Malformed service account key: {}", e)))
    }

    pub fn token_uri(&self) -> &str {
        self.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI)
    }
}

/// HTTP settings for [`GooglePlayClient`]
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub api_base_url: String,
    pub request_timeout_ms: u64,
    pub connect_timeout_ms: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self::from(&GooglePlayConfig::default())
    }
}

impl From<&GooglePlayConfig> for ClientSettings {
    fn from(config: &GooglePlayConfig) -> Self {
        Self {
            api_base_url: config.api_base_url.clone(),
            request_timeout_ms: config.request_timeout_ms,
            connect_timeout_ms: config.connect_timeout_ms,
        }
    }
}

/// Boots a [`GooglePlayClient`] from a service-account key file
#[derive(Debug, Clone, Default)]
pub struct GooglePlayConnector {
    settings: ClientSettings,
}

impl GooglePlayConnector {
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl Connector for GooglePlayConnector {
    type Client = GooglePlayClient;

    async fn connect(&self, config_key_path: &Path) -> Result<GooglePlayClient> {
        let key = ServiceAccountKey::from_file(config_key_path).await?;
        GooglePlayClient::boot(key, &self.settings).await
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// `{"error": {"code": 401, "message": "..."}}`
#[derive(Debug, Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Clone)]
struct AccessToken {
    value: String,
    expires_at: OffsetDateTime,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        OffsetDateTime::now_utc() + time::Duration::seconds(TOKEN_REFRESH_MARGIN_SECS)
            < self.expires_at
    }
}

/// Play Developer API client authorized as a service account
pub struct GooglePlayClient {
    http_client: reqwest::Client,
    api_base_url: Url,
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    /// Cached access token, refreshed when close to expiry
    access_token: RwLock<AccessToken>,
}

impl GooglePlayClient {
    /// Builds the HTTP client and fetches the first access token
    #[instrument(skip(key, settings), fields(client_email = %key.client_email))]
    pub async fn boot(key: ServiceAccountKey, settings: &ClientSettings) -> Result<Self> {
        let api_base_url = Url::parse(&settings.api_base_url).map_err(|e| {
            PlayStoreError::Config(config::ConfigError::Message(format!(
                "Invalid api_base_url '{}': {}",
                settings.api_base_url, e
            )))
        })?;
        if api_base_url.cannot_be_a_base() {
            return Err(PlayStoreError::Config(config::ConfigError::Message(format!(
                "Invalid api_base_url '{}'",
                settings.api_base_url
            ))));
        }

        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| PlayStoreError::Credentials(format!("Invalid private key: {}", e)))?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.request_timeout_ms))
            .connect_timeout(Duration::from_millis(settings.connect_timeout_ms))
            .build()
            .map_err(|e| PlayStoreError::Authorization(format!("Failed to build HTTP client: {}", e)))?;

        let access_token = request_access_token(&http_client, &key, &encoding_key)
            .await
            .map_err(|e| PlayStoreError::Authorization(e.to_string()))?;

        info!("Authorized with Google Play Developer API");

        Ok(Self {
            http_client,
            api_base_url,
            key,
            encoding_key,
            access_token: RwLock::new(access_token),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    async fn bearer(&self) -> std::result::Result<String, ClientError> {
        {
            let token = self.access_token.read().await;
            if token.is_fresh() {
                return Ok(token.value.clone());
            }
        }

        let mut token = self.access_token.write().await;
        // Another caller may have refreshed while we waited for the lock
        if !token.is_fresh() {
            debug!("Refreshing access token");
            *token = request_access_token(&self.http_client, &self.key, &self.encoding_key).await?;
        }
        Ok(token.value.clone())
    }

    /// `{base}/androidpublisher/v3/applications/{package}/purchases/{kind}/{item}/tokens/{token}[:action]`
    fn purchase_url(
        &self,
        kind: &str,
        package: &str,
        item_id: &str,
        token: &str,
        action: Option<&str>,
    ) -> std::result::Result<Url, ClientError> {
        let mut url = self.api_base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ClientError::Transport("API base URL cannot be a base".to_string()))?;
            segments.pop_if_empty().extend([
                "androidpublisher",
                "v3",
                "applications",
                package,
                "purchases",
                kind,
                item_id,
                "tokens",
            ]);
            match action {
                Some(action) => segments.push(&format!("{}:{}", token, action)),
                None => segments.push(token),
            };
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> std::result::Result<T, ClientError> {
        let bearer = self.bearer().await?;
        let response = self
            .http_client
            .get(url)
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn post_empty(&self, url: Url) -> std::result::Result<(), ClientError> {
        let bearer = self.bearer().await?;
        let response = self
            .http_client
            .post(url)
            .bearer_auth(bearer)
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(())
    }
}

#[async_trait]
impl PublisherClient for GooglePlayClient {
    async fn verify(
        &self,
        package: &str,
        product_id: &str,
        token: &str,
    ) -> std::result::Result<ProductPurchase, ClientError> {
        let url = self.purchase_url("products", package, product_id, token, None)?;
        self.get_json(url).await
    }

    async fn verify_subscription(
        &self,
        package: &str,
        subscription_id: &str,
        token: &str,
    ) -> std::result::Result<SubscriptionPurchase, ClientError> {
        let url = self.purchase_url("subscriptions", package, subscription_id, token, None)?;
        self.get_json(url).await
    }

    async fn acknowledge(
        &self,
        package: &str,
        product_id: &str,
        token: &str,
    ) -> std::result::Result<ProductPurchase, ClientError> {
        let url = self.purchase_url("products", package, product_id, token, Some("acknowledge"))?;
        self.post_empty(url).await?;

        // The acknowledge endpoint has an empty body; read the purchase back.
        // Google has accepted the acknowledgement at this point, so a failed
        // read-back still reports success with only what we know.
        match self.verify(package, product_id, token).await {
            Ok(purchase) => Ok(purchase),
            Err(e) => {
                warn!(error = %e, "Acknowledged purchase could not be read back");
                Ok(acknowledged_purchase(product_id))
            }
        }
    }

    async fn acknowledge_subscription_purchase(
        &self,
        package: &str,
        subscription_id: &str,
        token: &str,
    ) -> std::result::Result<(), ClientError> {
        let url = self.purchase_url(
            "subscriptions",
            package,
            subscription_id,
            token,
            Some("acknowledge"),
        )?;
        self.post_empty(url).await
    }
}

/// The record reported for an accepted acknowledgement whose purchase
/// could not be fetched
fn acknowledged_purchase(product_id: &str) -> ProductPurchase {
    ProductPurchase {
        kind: Some("androidpublisher#productPurchase".to_string()),
        product_id: Some(product_id.to_string()),
        acknowledgement_state: Some(1),
        ..ProductPurchase::default()
    }
}

/// Signs a JWT assertion and exchanges it for an access token
async fn request_access_token(
    http_client: &reqwest::Client,
    key: &ServiceAccountKey,
    encoding_key: &EncodingKey,
) -> std::result::Result<AccessToken, ClientError> {
    let now = OffsetDateTime::now_utc();
    let claims = AssertionClaims {
        iss: &key.client_email,
        scope: API_SCOPE,
        aud: key.token_uri(),
        iat: now.unix_timestamp(),
        exp: now.unix_timestamp() + ASSERTION_LIFETIME_SECS,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let assertion = encode(&header, &claims, encoding_key)
        .map_err(|e| ClientError::Transport(format!("Failed to sign assertion: {}", e)))?;

    let response = http_client
        .post(key.token_uri())
        .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
        .send()
        .await
        .map_err(|e| ClientError::Transport(format!("Token request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<OAuthErrorResponse>(&body)
            .ok()
            .map(|e| match e.error_description {
                Some(description) => format!("{}: {}", e.error, description),
                None => e.error,
            });
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| ClientError::Decode(format!("Invalid token response: {}", e)))?;

    // Google never grants more than the assertion lifetime
    let expires_in = token
        .expires_in
        .unwrap_or(ASSERTION_LIFETIME_SECS)
        .clamp(0, ASSERTION_LIFETIME_SECS);
    Ok(AccessToken {
        value: token.access_token,
        expires_at: now + time::Duration::seconds(expires_in),
    })
}

/// Turns a non-2xx Publisher API response into a [`ClientError::Api`]
async fn api_error(response: reqwest::Response) -> ClientError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<GoogleErrorEnvelope>(&body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .filter(|message| !message.is_empty());

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        debug!(status = status.as_u16(), "Publisher API rejected credentials");
    }

    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}
