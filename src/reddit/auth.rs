// SPDX-License-Identifier: Apache-2.0

//! Credentials for Reddit's app-only OAuth flow.
//!
//! Reddit's public JSON endpoints work without credentials, but are more
//! heavily rate limited. Registering a "script" app at
//! <https://www.reddit.com/prefs/apps> and exporting its ID and secret
//! lets requests go through `oauth.reddit.com` instead.

use std::{env, error, fmt};

/// Environment variable holding the OAuth client ID.
pub const CLIENT_ID_VAR: &str = "REDDIT_CLIENT_ID";

/// Environment variable holding the OAuth client secret.
pub const CLIENT_SECRET_VAR: &str = "REDDIT_CLIENT_SECRET";

/// A Reddit app's client ID and secret.
#[derive(Clone)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
}

impl Credentials {
    /// Creates credentials from a client ID and secret.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Reads credentials from `$REDDIT_CLIENT_ID` and `$REDDIT_CLIENT_SECRET`.
    ///
    /// Returns `Ok(None)` if neither is set, so that requests can be made
    /// anonymously, and an error if only one of them is set or either is
    /// not valid Unicode.
    pub fn from_env() -> AuthResult {
        Self::from_vars(CLIENT_ID_VAR, CLIENT_SECRET_VAR)
    }

    fn from_vars(id_var: &'static str, secret_var: &'static str) -> AuthResult {
        let id = read_var(id_var)?;
        let secret = read_var(secret_var)?;
        match (id, secret) {
            (Some(id), Some(secret)) => Ok(Some(Self::new(id, secret))),
            (None, None) => Ok(None),
            (Some(_), None) => Err(AuthError::Incomplete(secret_var)),
            (None, Some(_)) => Err(AuthError::Incomplete(id_var)),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

fn read_var(name: &'static str) -> Result<Option<String>, AuthError> {
    match env::var(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value.trim().to_string())),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(AuthError::EnvError(name, err)),
    }
}

/// Standard result type for [`Credentials`] creation.
pub type AuthResult = Result<Option<Credentials>, AuthError>;

/// Indicates an error when reading credentials.
#[derive(Debug)]
pub enum AuthError {
    /// One half of the client ID/secret pair is missing.
    Incomplete(&'static str),

    /// An environment variable could not be read.
    EnvError(&'static str, env::VarError),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Incomplete(missing) => write!(
                f,
                "Incomplete Reddit credentials: ${missing} must also be set \
                 (or unset both {CLIENT_ID_VAR} and {CLIENT_SECRET_VAR})"
            ),
            AuthError::EnvError(name, err) => write!(f, "Could not read ${name}: {err}"),
        }
    }
}

impl error::Error for AuthError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            AuthError::Incomplete(_) => None,
            AuthError::EnvError(_, err) => Some(err),
        }
    }
}
