// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

use model::DecodeError;
use reconcile::MappingError;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use vtysh::VtyshError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml_ng::Error,
    },
    #[error("Invalid VNI mapping: {0}")]
    Mapping(#[from] MappingError),
    #[error("Failed to get the system hostname: {0}")]
    Hostname(#[from] nix::Error),
    #[error("System hostname is not valid UTF-8")]
    HostnameNotUtf8,
    #[error("Invalid parameters: {0}")]
    Params(String),
    #[error("Invalid tracing configuration: {0}")]
    Tracing(String),
}

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Vtysh(#[from] VtyshError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("Daemons did not answer within {0:?}")]
    Timeout(Duration),
    #[error("Failed to start runtime: {0}")]
    Runtime(std::io::Error),
}
