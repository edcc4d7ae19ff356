//! Rotating-token header contract.
//!
//! Authenticated requests carry five headers (`uid`, `access-token`,
//! `client`, `expiry`, `token-type`). Successful responses may carry the same
//! five with new values, and the previous token stops working once a new one
//! has been issued. Everything here is pure so the contract can be tested
//! without HTTP.

use crate::auth::credentials::Credential;
use crate::error::SessionError;
use crate::traits::{Headers, Response};

pub const UID: &str = "uid";
pub const ACCESS_TOKEN: &str = "access-token";
pub const CLIENT: &str = "client";
pub const EXPIRY: &str = "expiry";
pub const TOKEN_TYPE: &str = "token-type";

/// Header names of the rotation set, in wire order.
pub const ROTATION_HEADERS: [&str; 5] = [UID, ACCESS_TOKEN, CLIENT, EXPIRY, TOKEN_TYPE];

/// Headers sent with every JSON request.
pub fn shared_headers() -> Headers {
    let mut headers = Headers::new();
    headers.insert("Accept".to_string(), "application/json".to_string());
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    headers.insert(
        "User-Agent".to_string(),
        format!("killstreaks/{}", env!("CARGO_PKG_VERSION")),
    );
    headers
}

/// Project a credential onto the wire header names.
pub fn auth_headers(credential: &Credential) -> Headers {
    let mut headers = Headers::new();
    headers.insert(UID.to_string(), credential.uid.clone());
    headers.insert(ACCESS_TOKEN.to_string(), credential.access_token.clone());
    headers.insert(CLIENT.to_string(), credential.client.clone());
    headers.insert(EXPIRY.to_string(), credential.expiry.clone());
    headers.insert(TOKEN_TYPE.to_string(), credential.token_type.clone());
    headers
}

/// Overlay the credential's headers on `defaults`.
///
/// Credential headers win over any default with the same name, compared
/// case-insensitively. `defaults` is not modified.
pub fn build_request_headers(defaults: &Headers, credential: &Credential) -> Headers {
    let auth = auth_headers(credential);
    let mut headers: Headers = defaults
        .iter()
        .filter(|(name, _)| !auth.keys().any(|key| key.eq_ignore_ascii_case(name)))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();
    headers.extend(auth);
    headers
}

/// Read the full rotation set from a response.
///
/// Fails on the first missing or blank header so a partial set is never
/// persisted.
pub fn credential_from_response(response: &Response) -> Result<Credential, SessionError> {
    let value = |name: &'static str| -> Result<String, SessionError> {
        match response.header(name) {
            Some(v) if !v.is_empty() => Ok(v.to_string()),
            _ => Err(SessionError::MissingHeader(name)),
        }
    };

    Ok(Credential {
        uid: value(UID)?,
        access_token: value(ACCESS_TOKEN)?,
        client: value(CLIENT)?,
        expiry: value(EXPIRY)?,
        token_type: value(TOKEN_TYPE)?,
    })
}

/// Like [`credential_from_response`], but returns `None` for an incomplete set.
pub fn rotated_credential(response: &Response) -> Option<Credential> {
    credential_from_response(response).ok()
}
