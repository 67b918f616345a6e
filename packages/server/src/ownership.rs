use async_trait::async_trait;
use tracing::{debug, warn};

/// Outcome of asking the user service about a user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserLookup {
    /// 2xx with body `true`.
    Exists,
    /// 2xx with body `false`.
    Absent,
    /// Transport failure, non-2xx status or a body that is not a JSON boolean.
    Indeterminate,
}

/// Source of truth for whether a user id may own plants.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn lookup(&self, user_id: i32) -> UserLookup;

    /// Fail-closed: only a confirmed `Exists` passes. `Indeterminate` is treated as absent.
    async fn user_exists(&self, user_id: i32) -> bool {
        self.lookup(user_id).await == UserLookup::Exists
    }
}

/// [`UserDirectory`] backed by `GET {base_url}/{user_id}` on the user service.
///
/// No retries and no caching; the request uses the HTTP client's default timeouts.
pub struct HttpUserDirectory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpUserDirectory {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn user_url(&self, user_id: i32) -> String {
        format!("{}/{}", self.base_url, user_id)
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn lookup(&self, user_id: i32) -> UserLookup {
        let url = self.user_url(user_id);

        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(user_id, error = %e, "User service unreachable");
                return UserLookup::Indeterminate;
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(user_id, status = status.as_u16(), "User service returned an error status");
            return UserLookup::Indeterminate;
        }

        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => {
                warn!(user_id, error = %e, "Failed to read user service response");
                return UserLookup::Indeterminate;
            }
        };

        let lookup = classify_body(&body);
        if lookup == UserLookup::Indeterminate {
            warn!(user_id, body = %body, "User service returned a non-boolean body");
        } else {
            debug!(user_id, ?lookup, "User lookup finished");
        }
        lookup
    }
}

fn classify_body(body: &str) -> UserLookup {
    match serde_json::from_str::<bool>(body) {
        Ok(true) => UserLookup::Exists,
        Ok(false) => UserLookup::Absent,
        Err(_) => UserLookup::Indeterminate,
    }
}
