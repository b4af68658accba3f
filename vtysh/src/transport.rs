// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Framed request / response exchange over a vty socket.
//!
//! Wire format: a request is `|command|0x00|` and the reply is `|payload|0x00|`.
//! Every exchange uses a fresh connection which is closed once the reply has been read
//! (or reading it failed).

use std::path::Path;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tracing::{debug, trace};

use crate::errors::VtyshError;

/// Octet terminating requests and replies
pub(crate) const TERMINATOR: u8 = 0x00;

/// Frame a command: the command text followed by the terminator
fn frame(command: &str) -> Vec<u8> {
    let mut wire = Vec::with_capacity(command.len() + 1);
    wire.extend_from_slice(command.as_bytes());
    wire.push(TERMINATOR);
    wire
}

/// Strip the terminator from a received reply. A reply lacking it was cut short.
fn unframe(command: &str, mut data: Vec<u8>) -> Result<Vec<u8>, VtyshError> {
    if data.last() != Some(&TERMINATOR) {
        return Err(VtyshError::Truncated {
            command: command.to_owned(),
            received: data.len(),
        });
    }
    data.pop();
    Ok(data)
}

/// Send `command` to the vty socket at `path` and return the reply payload, without its
/// terminator. Errors are returned as they happen: nothing is retried here.
pub(crate) async fn exchange(path: &Path, command: &str) -> Result<Vec<u8>, VtyshError> {
    let mut sock = UnixStream::connect(path)
        .await
        .map_err(|source| VtyshError::Connect {
            path: path.to_path_buf(),
            source,
        })?;

    trace!("Sending '{command}' to {}", path.display());
    sock.write_all(&frame(command))
        .await
        .map_err(|source| VtyshError::Send {
            command: command.to_owned(),
            source,
        })?;

    let mut data = Vec::new();
    let mut reader = BufReader::new(&mut sock);
    reader
        .read_until(TERMINATOR, &mut data)
        .await
        .map_err(|source| VtyshError::Recv {
            command: command.to_owned(),
            source,
        })?;

    let payload = unframe(command, data)?;
    debug!(
        "Got {} octets from {} for '{command}'",
        payload.len(),
        path.display()
    );
    Ok(payload)
}
