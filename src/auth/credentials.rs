//! Session credential record and its file-backed storage.
//!
//! The credential is stored as a single JSON document, by default at
//! `~/.killstreaks/credentials.json`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::PersistenceError;

/// The credentials directory name.
const CREDENTIALS_DIR: &str = ".killstreaks";

/// The credentials file name.
const CREDENTIALS_FILE: &str = "credentials.json";

/// Token scheme used when the service does not say otherwise.
pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

fn default_token_type() -> String {
    DEFAULT_TOKEN_TYPE.to_string()
}

/// The rotating session credential.
///
/// Every field is a plain string issued by the service. A logged-out state is
/// represented by empty strings, not by the absence of a record.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credential {
    /// Service-assigned user identifier (the user's email for this service).
    #[serde(default)]
    pub uid: String,
    /// Current access token. Rotates on every authenticated exchange.
    #[serde(default)]
    pub access_token: String,
    /// Client identifier issued alongside the token.
    #[serde(default)]
    pub client: String,
    /// Service-issued expiry marker. Opaque; never validated locally.
    #[serde(default)]
    pub expiry: String,
    /// Authorization scheme name. Stored records written without one read
    /// back as [`DEFAULT_TOKEN_TYPE`].
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

impl Credential {
    /// The logged-out record: all five fields blank.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a credential from the five rotation values.
    pub fn new(
        uid: impl Into<String>,
        access_token: impl Into<String>,
        client: impl Into<String>,
        expiry: impl Into<String>,
        token_type: impl Into<String>,
    ) -> Self {
        Self {
            uid: uid.into(),
            access_token: access_token.into(),
            client: client.into(),
            expiry: expiry.into(),
            token_type: token_type.into(),
        }
    }

    /// True when both the access token and the uid are present.
    ///
    /// Local check only; the server may already have invalidated the token.
    pub fn is_logged_in(&self) -> bool {
        !self.access_token.is_empty() && !self.uid.is_empty()
    }

    /// True when every field is blank.
    pub fn is_empty(&self) -> bool {
        self.uid.is_empty()
            && self.access_token.is_empty()
            && self.client.is_empty()
            && self.expiry.is_empty()
            && self.token_type.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(value: &str) -> &'static str {
            if value.is_empty() {
                ""
            } else {
                "<redacted>"
            }
        }

        f.debug_struct("Credential")
            .field("uid", &self.uid)
            .field("access_token", &redact(&self.access_token))
            .field("client", &redact(&self.client))
            .field("expiry", &self.expiry)
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// Reads and writes the credential file.
///
/// Writes go to a sibling temporary file which is synced and then renamed
/// over the target, so the file on disk is always a complete record. This
/// type does no locking of its own; see
/// [`FileCredentialStore`](crate::adapters::FileCredentialStore).
#[derive(Debug)]
pub struct CredentialsManager {
    /// Path to the credentials file.
    credentials_path: PathBuf,
}

impl CredentialsManager {
    /// Create a manager for the default location in the home directory.
    ///
    /// Returns `None` if the home directory cannot be determined.
    pub fn new() -> Option<Self> {
        let home = dirs::home_dir()?;
        let credentials_path = home.join(CREDENTIALS_DIR).join(CREDENTIALS_FILE);
        Some(Self { credentials_path })
    }

    /// Create a manager for an explicit file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            credentials_path: path.into(),
        }
    }

    /// Get the path to the credentials file.
    pub fn credentials_path(&self) -> &Path {
        &self.credentials_path
    }

    /// Write the empty record if no record exists yet.
    ///
    /// Returns `true` if the record was created.
    pub fn initialize(&self) -> Result<bool, PersistenceError> {
        if self.credentials_path.exists() {
            return Ok(false);
        }
        self.save(&Credential::empty())?;
        Ok(true)
    }

    /// Load the credential record.
    pub fn load(&self) -> Result<Credential, PersistenceError> {
        let file = match File::open(&self.credentials_path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PersistenceError::Missing {
                    path: self.credentials_path.clone(),
                });
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|source| PersistenceError::Corrupt {
            path: self.credentials_path.clone(),
            source,
        })
    }

    /// Replace the credential record.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save(&self, credential: &Credential) -> Result<(), PersistenceError> {
        if let Some(parent) = self.credentials_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let contents = serde_json::to_vec_pretty(credential)?;
        let tmp_path = self.temp_path();

        let write_tmp = || -> std::io::Result<()> {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            writer.write_all(&contents)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
            Ok(())
        };

        if let Err(e) = write_tmp() {
            let _ = fs::remove_file(&tmp_path);
            return Err(self.io_error(e));
        }

        fs::rename(&tmp_path, &self.credentials_path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            self.io_error(e)
        })
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .credentials_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| CREDENTIALS_FILE.into());
        name.push(".tmp");
        self.credentials_path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.credentials_path.clone(),
            source,
        }
    }
}
