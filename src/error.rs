// SPDX-License-Identifier: Apache-2.0

//! Errors that end a command.

use crate::reddit::client;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// An error that stops the program (or, in monitor mode, a single cycle).
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid arguments, environment, or credentials.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The Reddit API could not be reached or returned something unusable.
    #[error("Remote request error: {0}")]
    RemoteRequest(#[from] client::Error),

    /// Results could not be written to their destination.
    #[error("Could not write to {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Wraps an I/O error that occurred while writing to `path`.
    pub fn output(path: impl Into<PathBuf>, source: impl Into<io::Error>) -> Self {
        Error::OutputWrite {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Process exit code to use when this error ends the program.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::RemoteRequest(_) => 1,
            Error::Configuration(_) => 2,
            Error::OutputWrite { .. } => 3,
        }
    }
}
