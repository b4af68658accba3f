// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! `frrmon`: detect BGP next-hops of EVPN VRFs that FRR has no usable router MAC for.
//!
//! Exits with 0 if nothing was found, 1 if findings were reported and 2 on error.

mod args;
mod checks;
mod config;
mod errors;
mod logging;
mod observer;
mod report;

use std::process::ExitCode;
use tracing::{error, info};

use crate::args::{CmdArgs, Parser};
use crate::config::{ConfigFile, resolve, system_hostname};
use crate::errors::{ConfigError, MonitorError};
use crate::logging::init_logging;

const EXIT_FINDINGS: u8 = 1;
const EXIT_ERROR: u8 = 2;

fn run(args: &CmdArgs, file: Option<&ConfigFile>) -> Result<usize, MonitorError> {
    let params = resolve(args, file, system_hostname)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(MonitorError::Runtime)?;
    runtime.block_on(checks::run(args.mode(), &params))
}

fn main() -> ExitCode {
    let args = CmdArgs::parse();
    let file: Result<Option<ConfigFile>, ConfigError> =
        args.config().map(ConfigFile::load).transpose();

    // the command line wins over the config file, which must be loaded for its tracing config
    let tracing = args.tracing().or_else(|| {
        file.as_ref()
            .ok()
            .and_then(Option::as_ref)
            .and_then(|f| f.tracing.as_deref())
    });
    if let Err(e) = init_logging(tracing) {
        eprintln!("{e}");
        return ExitCode::from(EXIT_ERROR);
    }

    let result = file
        .map_err(MonitorError::from)
        .and_then(|file| run(&args, file.as_ref()));
    match result {
        Ok(0) => {
            info!("No findings");
            ExitCode::SUCCESS
        }
        Ok(count) => {
            info!("Reported {count} findings");
            ExitCode::from(EXIT_FINDINGS)
        }
        Err(e) => {
            error!("{e}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}
