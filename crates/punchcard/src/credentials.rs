//! Credential providers for authenticated service calls.
//!
//! The browser build of this system read its bearer token from a cookie
//! store ambiently; here the token source is an explicit dependency injected
//! into the clients, so tests and embedders can supply their own.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// A source of bearer tokens for the backend services.
pub trait CredentialProvider: Send + Sync {
    /// Get the bearer token to authenticate with.
    ///
    /// # Errors
    ///
    /// Returns an error if no token is available.
    fn bearer_token(&self) -> Result<String>;
}

/// A fixed token, for tests and scripting.
#[derive(Debug, Clone)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    /// Create a provider around the given token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl CredentialProvider for StaticToken {
    fn bearer_token(&self) -> Result<String> {
        if self.token.is_empty() {
            return Err(Error::credential_missing("static token is empty"));
        }
        Ok(self.token.clone())
    }
}

/// A token read from a file on every request.
///
/// The file is the CLI analog of the browser's cookie store: whatever
/// obtained the session (a login script, an operator) writes the token
/// there, and re-reading per request picks up rotations without a restart.
#[derive(Debug, Clone)]
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    /// Create a provider reading from the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path this provider reads from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialProvider for TokenFile {
    fn bearer_token(&self) -> Result<String> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| Error::CredentialRead {
            path: self.path.clone(),
            source: e,
        })?;
        let token = raw.trim();
        if token.is_empty() {
            return Err(Error::credential_missing(format!(
                "token file {} is empty",
                self.path.display()
            )));
        }
        Ok(token.to_string())
    }
}
