// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! The errors returned when talking to FRR daemons.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VtyshError {
    #[error("Unknown daemon '{0}'")]
    UnknownDaemon(String),

    #[error("Failed to connect to {}: {source}", path.display())]
    Connect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to send '{command}': {source}")]
    Send {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to receive reply to '{command}': {source}")]
    Recv {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Reply to '{command}' ended without terminator after {received} octets")]
    Truncated { command: String, received: usize },
}

impl VtyshError {
    /// Tell if this is a configuration error (as opposed to a runtime transport failure).
    /// Configuration errors will not go away by retrying.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, VtyshError::UnknownDaemon(_))
    }

    /// The underlying io error, if any
    #[must_use]
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            VtyshError::Connect { source, .. }
            | VtyshError::Send { source, .. }
            | VtyshError::Recv { source, .. } => Some(source),
            _ => None,
        }
    }
}
