// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Logging setup from a `tag=level,...` string.

use ordermap::OrderMap;
use std::str::FromStr;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, prelude::*};

use crate::errors::ConfigError;

/// Tag setting the level of targets with no specific level
const DEFAULT_TAG: &str = "default";

const DEFAULT_LEVEL: LevelFilter = LevelFilter::INFO;

/// Tags accepted in tracing configurations and the targets they control
const TAGS: &[(&str, &str)] = &[
    ("frrmon", "frrmon"),
    ("kernel", "frrmon_kernel"),
    ("model", "frrmon_model"),
    ("reconcile", "frrmon_reconcile"),
    ("vtysh", "frrmon_vtysh"),
];

fn target_of(tag: &str) -> Option<&'static str> {
    TAGS.iter()
        .find(|(name, _)| *name == tag)
        .map(|(_, target)| *target)
}

/// Parse a string made of comma-separated tag=level, where level=off,error,warn,info,debug,trace
fn parse_tracing_config(input: &str) -> Result<OrderMap<String, LevelFilter>, ConfigError> {
    let mut result = OrderMap::new();
    for item in input.split(',') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        let Some((tag, level)) = item.split_once('=') else {
            return Err(ConfigError::Tracing(format!(
                "invalid item '{item}': it should be tag=loglevel"
            )));
        };
        let level = LevelFilter::from_str(level.trim())
            .map_err(|e| ConfigError::Tracing(format!("invalid level {}: {e}", level.trim())))?;
        result.insert(tag.trim().to_string(), level);
    }
    Ok(result)
}

/// Build the filter for a tracing configuration
fn env_filter(input: &str) -> Result<EnvFilter, ConfigError> {
    let config = parse_tracing_config(input)?;
    let default = config.get(DEFAULT_TAG).copied().unwrap_or(DEFAULT_LEVEL);
    let mut filter = EnvFilter::new(default.to_string());
    for (tag, level) in &config {
        if tag == DEFAULT_TAG {
            continue;
        }
        let target = target_of(tag)
            .ok_or_else(|| ConfigError::Tracing(format!("unknown tag '{tag}'")))?;
        let directive = format!("{target}={level}")
            .parse()
            .map_err(|e| ConfigError::Tracing(format!("{e}")))?;
        filter = filter.add_directive(directive);
    }
    Ok(filter)
}

/// Install the global subscriber: a formatting layer filtered as configured by `config`
pub(crate) fn init_logging(config: Option<&str>) -> Result<(), ConfigError> {
    let filter = env_filter(config.unwrap_or_default())?;
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_line_number(true)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| ConfigError::Tracing(e.to_string()))
}
