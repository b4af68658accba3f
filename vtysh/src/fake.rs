// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! A fake FRR daemon serving canned replies on a vty socket, for tests.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::daemon::Daemon;
use crate::transport::TERMINATOR;

/// Create (if needed) a per-process scratch directory to host vty sockets
#[must_use]
pub fn scratch_rundir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("frrmon-{}-{name}", std::process::id()));
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// How the fake daemon answers a command
#[derive(Clone, Debug)]
pub enum FakeReply {
    /// Reply with the payload followed by the terminator
    Data(String),
    /// Send the payload without terminator and close the connection
    Partial(String),
    /// Close the connection without replying
    Hangup,
}
impl FakeReply {
    #[must_use]
    pub fn data(payload: &str) -> Self {
        FakeReply::Data(payload.to_owned())
    }
}

#[derive(Default)]
struct FakeState {
    requests: Vec<String>,
    connections: usize,
}

/// A fake daemon. Commands without a canned reply get an empty one.
pub struct FakeDaemon {
    path: PathBuf,
    state: Arc<Mutex<FakeState>>,
    task: JoinHandle<()>,
}

impl FakeDaemon {
    /// Start serving `replies` on the vty socket of `daemon` under `rundir`.
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Fails if the socket cannot be bound.
    pub fn start(
        rundir: &Path,
        daemon: Daemon,
        replies: HashMap<String, FakeReply>,
    ) -> io::Result<Self> {
        let path = daemon.socket_path(rundir);
        let _ = std::fs::remove_file(&path);
        let listener = UnixListener::bind(&path)?;
        debug!("Fake {daemon} listening at {}", path.display());

        let state = Arc::new(Mutex::new(FakeState::default()));
        let replies = Arc::new(replies);
        let task = {
            let state = state.clone();
            tokio::spawn(async move {
                while let Ok((sock, _)) = listener.accept().await {
                    if let Ok(mut state) = state.lock() {
                        state.connections += 1;
                    }
                    tokio::spawn(serve(sock, state.clone(), replies.clone()));
                }
            })
        };
        Ok(Self { path, state, task })
    }

    /// The commands received so far, in order
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|state| state.requests.clone())
            .unwrap_or_default()
    }

    /// The number of connections accepted so far
    #[must_use]
    pub fn connections(&self) -> usize {
        self.state.lock().map(|state| state.connections).unwrap_or(0)
    }

    /// Stop accepting connections and remove the socket
    pub fn stop(self) {
        self.task.abort();
        let _ = std::fs::remove_file(&self.path);
    }
}

async fn serve(
    sock: UnixStream,
    state: Arc<Mutex<FakeState>>,
    replies: Arc<HashMap<String, FakeReply>>,
) {
    let mut reader = BufReader::new(sock);
    loop {
        let mut request = Vec::new();
        match reader.read_until(TERMINATOR, &mut request).await {
            Ok(0) | Err(_) => return,
            Ok(_) => {}
        }
        if request.pop() != Some(TERMINATOR) {
            return;
        }
        let command = String::from_utf8_lossy(&request).into_owned();
        if let Ok(mut state) = state.lock() {
            state.requests.push(command.clone());
        }

        let reply = replies
            .get(&command)
            .cloned()
            .unwrap_or_else(|| FakeReply::Data(String::new()));
        let sock = reader.get_mut();
        match reply {
            FakeReply::Data(payload) => {
                let mut wire = payload.into_bytes();
                wire.push(TERMINATOR);
                if sock.write_all(&wire).await.is_err() {
                    return;
                }
            }
            FakeReply::Partial(payload) => {
                let _ = sock.write_all(payload.as_bytes()).await;
                return;
            }
            FakeReply::Hangup => return,
        }
    }
}
