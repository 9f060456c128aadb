//! Supabase store. The only module that talks to the hosted database.
//!
//! Speaks PostgREST over HTTPS against `{SUPABASE_URL}/rest/v1/{table}`.
//! One `SupabaseClient` is built per store, either eagerly via `initialize`
//! or on first use, and reused for the life of the process.
//! No retries and no client-side timeout: a failed round-trip surfaces as-is.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::models::{NewTalent, Talent, TalentPatch};
use crate::store::{ConfigurationError, StoreError, TalentStore};
use crate::talents::criteria::{Criteria, Predicate};

const REST_PATH: &str = "rest/v1";
/// Asks PostgREST for a bare object instead of a one-element array.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const RETURN_REPRESENTATION: &str = "return=representation";
/// PostgREST code for "single object requested, zero rows returned".
pub const NO_ROWS_CODE: &str = "PGRST116";
pub const DEFAULT_TABLE: &str = "talents";

#[derive(Debug, Clone)]
pub struct SupabaseCredentials {
    pub url: String,
    pub key: String,
    pub table: String,
}

impl SupabaseCredentials {
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key: key.into(),
            table: DEFAULT_TABLE.to_string(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct PostgrestError {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

/// Validated connection to one PostgREST table.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: Client,
    endpoint: Url,
    key: String,
}

impl SupabaseClient {
    pub fn connect(credentials: &SupabaseCredentials) -> Result<Self, ConfigurationError> {
        let url = credentials.url.trim();
        let key = credentials.key.trim();
        if url.is_empty() || key.is_empty() {
            return Err(ConfigurationError::MissingCredentials);
        }

        let endpoint = rest_endpoint(url, &credentials.table)?;
        let http = Client::builder()
            .build()
            .map_err(ConfigurationError::Client)?;

        Ok(Self {
            http,
            endpoint,
            key: key.to_string(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.http
            .request(method, self.endpoint.clone())
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
    }
}

/// Talent store backed by a Supabase project.
pub struct SupabaseStore {
    credentials: SupabaseCredentials,
    client: OnceCell<SupabaseClient>,
}

impl SupabaseStore {
    /// Defers validation and client construction to the first call.
    pub fn new(credentials: SupabaseCredentials) -> Self {
        Self {
            credentials,
            client: OnceCell::new(),
        }
    }

    /// Validates the credentials and builds the client immediately.
    pub fn initialize(credentials: SupabaseCredentials) -> Result<Self, ConfigurationError> {
        let client = SupabaseClient::connect(&credentials)?;
        info!("Supabase client initialized for {}", client.endpoint());
        Ok(Self {
            credentials,
            client: OnceCell::from(client),
        })
    }

    /// Returns the memoized client, building it on first use.
    pub async fn client(&self) -> Result<&SupabaseClient, ConfigurationError> {
        self.client
            .get_or_try_init(|| async {
                debug!("Lazily initializing Supabase client");
                SupabaseClient::connect(&self.credentials)
            })
            .await
    }

    pub fn is_initialized(&self) -> bool {
        self.client.initialized()
    }
}

#[async_trait]
impl TalentStore for SupabaseStore {
    fn backend(&self) -> &'static str {
        "supabase"
    }

    async fn fetch_all(&self) -> Result<Vec<Talent>, StoreError> {
        let context = "Error fetching talents";
        let client = self.client().await?;

        let response = client
            .request(Method::GET)
            .query(&[("select", "*")])
            .send()
            .await
            .map_err(|source| transport(context, source))?;

        read_json(response, context).await
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Option<Talent>, StoreError> {
        let context = format!("Error fetching talent with ID {id}");
        let client = self.client().await?;

        let response = client
            .request(Method::GET)
            .header(ACCEPT, SINGLE_OBJECT)
            .query(&id_params(id))
            .send()
            .await
            .map_err(|source| transport(&context, source))?;

        match read_json(response, &context).await {
            Ok(talent) => Ok(Some(talent)),
            Err(e) if e.code() == Some(NO_ROWS_CODE) => {
                debug!("No talent with id {id}");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn query(&self, criteria: &Criteria) -> Result<Vec<Talent>, StoreError> {
        let context = "Error querying talents";
        let client = self.client().await?;
        let params = filter_params(criteria);
        debug!("Querying talents with filters {:?}", params);

        let response = client
            .request(Method::GET)
            .query(&params)
            .send()
            .await
            .map_err(|source| transport(context, source))?;

        // `*` has no literal form in a PostgREST pattern, so rows are
        // re-checked against the criteria in process
        let rows: Vec<Talent> = read_json(response, context).await?;
        Ok(criteria.filter(&rows))
    }

    async fn create(&self, talent: NewTalent) -> Result<Talent, StoreError> {
        let context = "Error creating talent";
        let client = self.client().await?;

        let response = client
            .request(Method::POST)
            .header(ACCEPT, SINGLE_OBJECT)
            .header("Prefer", RETURN_REPRESENTATION)
            .query(&[("select", "*")])
            .json(&[talent])
            .send()
            .await
            .map_err(|source| transport(context, source))?;

        let created: Talent = read_json(response, context).await?;
        info!("Created talent {}", created.id);
        Ok(created)
    }

    async fn update(&self, id: &str, patch: TalentPatch) -> Result<Talent, StoreError> {
        let context = format!("Error updating talent with ID {id}");
        let client = self.client().await?;

        let response = client
            .request(Method::PATCH)
            .header(ACCEPT, SINGLE_OBJECT)
            .header("Prefer", RETURN_REPRESENTATION)
            .query(&id_params(id))
            .json(&patch)
            .send()
            .await
            .map_err(|source| transport(&context, source))?;

        let updated: Talent = read_json(response, &context).await?;
        info!("Updated talent {id}");
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let context = format!("Error deleting talent with ID {id}");
        let client = self.client().await?;

        let response = client
            .request(Method::DELETE)
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await
            .map_err(|source| transport(&context, source))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body, &context));
        }

        info!("Deleted talent {id}");
        Ok(())
    }
}

/// Builds `{base}/rest/v1/{table}`, tolerating a trailing slash on the base.
fn rest_endpoint(url: &str, table: &str) -> Result<Url, ConfigurationError> {
    let invalid = |reason: String| ConfigurationError::InvalidUrl {
        url: url.to_string(),
        reason,
    };

    let base = Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", base.scheme())));
    }

    let joined = format!("{}/{REST_PATH}/{table}", base.as_str().trim_end_matches('/'));
    Url::parse(&joined).map_err(|e| invalid(e.to_string()))
}

fn id_params(id: &str) -> [(&'static str, String); 2] {
    [("select", "*".to_string()), ("id", format!("eq.{id}"))]
}

/// Renders criteria as PostgREST horizontal filters.
fn filter_params(criteria: &Criteria) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];
    for predicate in criteria.predicates() {
        params.push(match predicate {
            Predicate::KeywordContains(keyword) => (
                "aesthetic->keywords".to_string(),
                format!("cs.{}", Value::Array(vec![Value::String(keyword)])),
            ),
            Predicate::Equals { field, value } => (field, format!("eq.{value}")),
            Predicate::ILike { field, needle } => {
                (field, format!("ilike.*{}*", escape_pattern(&needle)))
            }
        });
    }
    params
}

/// Escapes LIKE metacharacters so the needle matches as a literal substring.
/// PostgREST rewrites every `*` to `%`, so `*` becomes the one-character
/// wildcard `_` instead.
fn escape_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        match c {
            '\\' | '%' | '_' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '*' => escaped.push('_'),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn transport(context: &str, source: reqwest::Error) -> StoreError {
    StoreError::Transport {
        context: context.to_string(),
        source,
    }
}

async fn read_json<T: DeserializeOwned>(response: Response, context: &str) -> Result<T, StoreError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| transport(context, source))?;

    if !status.is_success() {
        return Err(api_error(status.as_u16(), &body, context));
    }

    serde_json::from_str(&body).map_err(|source| StoreError::Decode {
        context: context.to_string(),
        source,
    })
}

/// Decodes a PostgREST error body, falling back to the raw text or status.
fn api_error(status: u16, body: &str, context: &str) -> StoreError {
    let (code, message) = match serde_json::from_str::<PostgrestError>(body) {
        Ok(err) => {
            if err.details.is_some() || err.hint.is_some() {
                debug!(
                    "PostgREST error details: {:?}, hint: {:?}",
                    err.details, err.hint
                );
            }
            let message = err.message.unwrap_or_else(|| status_text(status));
            (err.code, message)
        }
        Err(_) if !body.trim().is_empty() => (None, body.trim().to_string()),
        Err(_) => (None, status_text(status)),
    };

    StoreError::Api {
        context: context.to_string(),
        status,
        code,
        message,
    }
}

fn status_text(status: u16) -> String {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {status}"))
}
