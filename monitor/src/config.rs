// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Configuration: an optional YAML file, overridden by command line options.

use derive_builder::Builder;
use model::bgp::DEFAULT_VRF;
use reconcile::{DEFAULT_VRF_PREFIX, Reconciler, ReconcilerBuilder, VniMapping};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use vtysh::DEFAULT_RUNDIR;

use crate::args::CmdArgs;
use crate::errors::ConfigError;

/// Contents of the configuration file. Every field is optional.
///
/// ```yaml
/// rundir: /var/run/frr
/// hostname: leaf1
/// vrf_prefix: vrf
/// vni_map:
///   red: "1000"
/// exclude_vrfs: [default, mgmt]
/// timeout_secs: 10
/// tracing: default=info,vtysh=debug
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ConfigFile {
    pub rundir: Option<PathBuf>,
    pub hostname: Option<String>,
    pub vrf_prefix: Option<String>,
    /// VRF name to VNI, for VRFs not following the naming convention
    pub vni_map: BTreeMap<String, String>,
    pub exclude_vrfs: Option<Vec<String>>,
    pub timeout_secs: Option<u64>,
    pub tracing: Option<String>,
}

impl ConfigFile {
    pub fn parse(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        serde_yaml_ng::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading config file {}", path.display());
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        // an empty file is an empty config
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Self::parse(path, &contents)
    }
}

fn default_exclusions() -> Vec<String> {
    vec![DEFAULT_VRF.to_string()]
}

/// Effective parameters of a run. N.B. we derive a builder type `MonitorParamsBuilder` and
/// provide defaults for every field but the hostname.
#[derive(Builder, Debug, Clone)]
pub(crate) struct MonitorParams {
    #[builder(setter(into), default = DEFAULT_RUNDIR.into())]
    pub rundir: PathBuf,

    #[builder(setter(into))]
    pub hostname: String,

    #[builder(default)]
    pub mapping: VniMapping,

    #[builder(setter(into), default = default_exclusions())]
    pub exclude_vrfs: Vec<String>,

    #[builder(default)]
    pub timeout: Option<Duration>,
}

impl MonitorParams {
    pub fn reconciler(&self) -> Result<Reconciler, ConfigError> {
        ReconcilerBuilder::default()
            .hostname(self.hostname.as_str())
            .mapping(self.mapping.clone())
            .exclude_vrfs(self.exclude_vrfs.clone())
            .build()
            .map_err(|e| ConfigError::Params(e.to_string()))
    }
}

/// The hostname of this system
pub(crate) fn system_hostname() -> Result<String, ConfigError> {
    nix::unistd::gethostname()?
        .into_string()
        .map_err(|_| ConfigError::HostnameNotUtf8)
}

/// Merge command line options over the config file. The hostname is only looked up with
/// `hostname` if neither provides one.
pub(crate) fn resolve(
    args: &CmdArgs,
    file: Option<&ConfigFile>,
    hostname: impl FnOnce() -> Result<String, ConfigError>,
) -> Result<MonitorParams, ConfigError> {
    let default = ConfigFile::default();
    let file = file.unwrap_or(&default);
    let mut builder = MonitorParamsBuilder::default();

    if let Some(rundir) = args.rundir().or(file.rundir.as_deref()) {
        builder.rundir(rundir);
    }

    match args.hostname().or(file.hostname.as_deref()) {
        Some(name) => builder.hostname(name),
        None => builder.hostname(hostname()?),
    };

    let prefix = args
        .vrf_prefix()
        .or(file.vrf_prefix.as_deref())
        .unwrap_or(DEFAULT_VRF_PREFIX);
    builder.mapping(VniMapping::with_explicit(prefix, file.vni_map.clone())?);

    if let Some(exclude) = &file.exclude_vrfs {
        builder.exclude_vrfs(exclude.clone());
    }
    if let Some(secs) = args.timeout().or(file.timeout_secs) {
        builder.timeout(Some(Duration::from_secs(secs)));
    }

    let params = builder
        .build()
        .map_err(|e| ConfigError::Params(e.to_string()))?;
    debug!("Parameters: {params:?}");
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::Parser;
    use pretty_assertions::assert_eq;
    use reconcile::MappingError;

    const PATH: &str = "/etc/frrmon.yaml";

    fn args(argv: &[&str]) -> CmdArgs {
        CmdArgs::try_parse_from(std::iter::once("frrmon").chain(argv.iter().copied())).unwrap()
    }

    fn parse(contents: &str) -> Result<ConfigFile, ConfigError> {
        ConfigFile::parse(Path::new(PATH), contents)
    }

    fn no_hostname() -> Result<String, ConfigError> {
        Err(ConfigError::HostnameNotUtf8)
    }

    #[test]
    fn full_config_file() {
        let file = parse(
            r#"
rundir: /run/frr
hostname: leaf1
vrf_prefix: tenant-
vni_map:
  red: "1000"
exclude_vrfs: [default, mgmt]
timeout_secs: 10
tracing: default=info,vtysh=debug
"#,
        )
        .unwrap();
        assert_eq!(
            file,
            ConfigFile {
                rundir: Some(PathBuf::from("/run/frr")),
                hostname: Some("leaf1".to_string()),
                vrf_prefix: Some("tenant-".to_string()),
                vni_map: BTreeMap::from([("red".to_string(), "1000".to_string())]),
                exclude_vrfs: Some(vec!["default".to_string(), "mgmt".to_string()]),
                timeout_secs: Some(10),
                tracing: Some("default=info,vtysh=debug".to_string()),
            }
        );

        let params = resolve(&args(&[]), Some(&file), no_hostname).unwrap();
        assert_eq!(params.rundir, PathBuf::from("/run/frr"));
        assert_eq!(params.hostname, "leaf1");
        assert_eq!(params.mapping.vni("red").as_str(), "1000");
        assert_eq!(params.mapping.vni("tenant-7").as_str(), "7");
        assert_eq!(params.exclude_vrfs, vec!["default", "mgmt"]);
        assert_eq!(params.timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = parse("rundir: /run/frr\nrestart: true\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(PATH));
    }

    #[test]
    fn duplicate_vni_is_rejected() {
        let file = parse("vni_map:\n  red: \"100\"\n  blue: \"100\"\n").unwrap();
        let err = resolve(&args(&["--hostname", "leaf1"]), Some(&file), no_hostname).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Mapping(MappingError::DuplicateVni { .. })
        ));
    }

    #[test]
    fn defaults() {
        let params = resolve(&args(&[]), None, || Ok("leaf9".to_string())).unwrap();
        assert_eq!(params.rundir, PathBuf::from(DEFAULT_RUNDIR));
        assert_eq!(params.hostname, "leaf9");
        assert_eq!(params.mapping, VniMapping::default());
        assert_eq!(params.exclude_vrfs, vec![DEFAULT_VRF]);
        assert_eq!(params.timeout, None);
    }

    #[test]
    fn command_line_wins() {
        let file = parse("rundir: /run/frr\nhostname: leaf1\nvrf_prefix: tenant-\ntimeout_secs: 10\n")
            .unwrap();
        let params = resolve(
            &args(&[
                "--rundir",
                "/tmp/frr",
                "--hostname",
                "leaf2",
                "--vrf-prefix",
                "vrf",
                "--timeout",
                "3",
            ]),
            Some(&file),
            no_hostname,
        )
        .unwrap();
        assert_eq!(params.rundir, PathBuf::from("/tmp/frr"));
        assert_eq!(params.hostname, "leaf2");
        assert_eq!(params.mapping.prefix(), "vrf");
        assert_eq!(params.timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn hostname_lookup_failure() {
        let err = resolve(&args(&[]), None, no_hostname).unwrap_err();
        assert!(matches!(err, ConfigError::HostnameNotUtf8));
    }

    #[test]
    fn params_build_a_reconciler() {
        let params = resolve(&args(&["--hostname", "leaf1"]), None, no_hostname).unwrap();
        let reconciler = params.reconciler().unwrap();
        assert_eq!(reconciler.hostname(), "leaf1");
        assert!(reconciler.is_excluded(DEFAULT_VRF));
    }

    #[test]
    fn missing_and_empty_files() {
        let err = ConfigFile::load(Path::new("/nonexistent/frrmon.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(
            err.to_string()
                .starts_with("Failed to read config file /nonexistent/frrmon.yaml: ")
        );

        let path = std::env::temp_dir().join(format!("frrmon-{}-empty.yaml", std::process::id()));
        std::fs::write(&path, "\n").unwrap();
        assert_eq!(ConfigFile::load(&path).unwrap(), ConfigFile::default());
        std::fs::remove_file(&path).unwrap();
    }
}
