//! Common test utilities for integration tests.
//!
//! [`Harness`] wires the production adapters (reqwest client and file
//! credential store) against a wiremock server and a temporary directory.
//!
//! # Example
//!
//! ```ignore
//! let harness = Harness::start(Some(active_credential())).await;
//! let result = harness.session.validate_token().await?;
//! ```

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::{MockServer, ResponseTemplate};

use killstreaks::adapters::{FileCredentialStore, ReqwestHttpClient};
use killstreaks::auth::{Credential, SessionManager};
use killstreaks::config::ClientConfig;
use killstreaks::traits::CredentialStore;

pub const EMAIL: &str = "player@example.com";

/// A signed-in credential as the server issued it.
pub fn active_credential() -> Credential {
    Credential::new(EMAIL, "tok-1", "client-1", "1700000000", "Bearer")
}

/// The credential the server hands out on the next rotation.
pub fn rotated_credential() -> Credential {
    Credential::new(EMAIL, "tok-2", "client-1", "1800000000", "Bearer")
}

/// Response template carrying the five rotation headers for `credential`.
pub fn with_rotation(template: ResponseTemplate, credential: &Credential) -> ResponseTemplate {
    template
        .insert_header("uid", credential.uid.as_str())
        .insert_header("access-token", credential.access_token.as_str())
        .insert_header("client", credential.client.as_str())
        .insert_header("expiry", credential.expiry.as_str())
        .insert_header("token-type", credential.token_type.as_str())
}

/// Production adapters pointed at a mock server.
pub struct Harness {
    pub server: MockServer,
    pub session: SessionManager,
    pub store: Arc<FileCredentialStore>,
    pub credentials_path: PathBuf,
    _temp_dir: TempDir,
}

impl Harness {
    /// Start a server and open a fresh store, optionally seeded.
    pub async fn start(initial: Option<Credential>) -> Self {
        let server = MockServer::start().await;
        let temp_dir = TempDir::new().unwrap();
        let credentials_path = temp_dir.path().join("credentials.json");

        let store = Arc::new(FileCredentialStore::open(&credentials_path).unwrap());
        if let Some(credential) = initial {
            store.save(&credential).await.unwrap();
        }

        let config = ClientConfig::new()
            .with_base_url(server.uri())
            .with_credentials_path(&credentials_path);
        let session = SessionManager::new(
            Arc::new(ReqwestHttpClient::from_config(&config).unwrap()),
            store.clone(),
            Arc::new(config),
        );

        Self {
            server,
            session,
            store,
            credentials_path,
            _temp_dir: temp_dir,
        }
    }

    /// The credential as currently written on disk.
    pub fn credential_on_disk(&self) -> Credential {
        let contents = std::fs::read_to_string(&self.credentials_path).unwrap();
        serde_json::from_str(&contents).unwrap()
    }
}

/// Split a multipart body into `(part headers, data)` pairs.
pub fn multipart_parts(content_type: &str, body: &[u8]) -> Vec<(String, Vec<u8>)> {
    let boundary = content_type
        .split("boundary=")
        .nth(1)
        .expect("multipart content type without boundary")
        .trim_matches('"');
    let delimiter = format!("--{}", boundary).into_bytes();

    let mut parts = Vec::new();
    let mut rest = body;
    while let Some(start) = find(rest, &delimiter) {
        rest = &rest[start + delimiter.len()..];
        if rest.starts_with(b"--") {
            break;
        }
        rest = rest.strip_prefix(b"\r\n").unwrap_or(rest);
        let end = find(rest, &delimiter).unwrap_or(rest.len());
        let part = &rest[..end];
        let split = find(part, b"\r\n\r\n").expect("part without header block");
        let headers = String::from_utf8_lossy(&part[..split]).into_owned();
        let mut data = part[split + 4..].to_vec();
        if data.ends_with(b"\r\n") {
            data.truncate(data.len() - 2);
        }
        parts.push((headers, data));
    }
    parts
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
