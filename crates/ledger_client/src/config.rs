use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use shared::domain::ChaincodeTarget;
use url::Url;

pub const CONFIG_FILE_NAME: &str = "teller.toml";
pub const CONFIG_PATH_ENV_VAR: &str = "TELLER_CONFIG";
const ENV_PREFIX: &str = "TELLER__";

/// Where and as whom chaincode calls are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkProfile {
    pub gateway_url: String,
    pub org: String,
    pub channel: String,
    pub peers: Vec<String>,
    pub chaincode: String,
    pub request_timeout_secs: u64,
}

impl Default for NetworkProfile {
    fn default() -> Self {
        Self {
            gateway_url: "http://127.0.0.1:3000".into(),
            org: "org1.example.com".into(),
            channel: "mychannel".into(),
            peers: vec!["peer0.org1.example.com".into()],
            chaincode: "banking".into(),
            request_timeout_secs: 30,
        }
    }
}

impl NetworkProfile {
    pub fn target(&self) -> ChaincodeTarget {
        ChaincodeTarget {
            channel: self.channel.clone(),
            peers: self.peers.clone(),
            chaincode: self.chaincode.clone(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.gateway_url)
            .with_context(|| format!("invalid gateway_url '{}'", self.gateway_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!(
                "gateway_url '{}' must use http or https, not '{}'",
                self.gateway_url,
                url.scheme()
            );
        }
        for (field, value) in [
            ("org", &self.org),
            ("channel", &self.channel),
            ("chaincode", &self.chaincode),
        ] {
            if value.trim().is_empty() {
                bail!("{field} must not be empty");
            }
        }
        if self.peers.is_empty() || self.peers.iter().any(|peer| peer.trim().is_empty()) {
            bail!("peers must list at least one non-empty peer name");
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than zero");
        }
        Ok(())
    }
}

/// Values given on the command line; they win over file and environment.
#[derive(Debug, Clone, Default)]
pub struct ProfileOverrides {
    pub gateway_url: Option<String>,
    pub org: Option<String>,
    pub channel: Option<String>,
    pub peers: Option<Vec<String>>,
    pub chaincode: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileProfile {
    gateway_url: Option<String>,
    org: Option<String>,
    channel: Option<String>,
    peers: Option<Vec<String>>,
    chaincode: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then the first config file found, then `TELLER__*` variables,
/// then `overrides`. The merged profile is validated.
pub fn load_profile(
    explicit_path: Option<&Path>,
    overrides: &ProfileOverrides,
) -> Result<NetworkProfile> {
    let mut profile = NetworkProfile::default();

    let from_env = env::var_os(CONFIG_PATH_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);
    if let Some(path) = resolve_config_path(explicit_path, from_env)? {
        merge_file(&mut profile, &path)?;
        tracing::info!(path = %path.display(), "loaded network profile");
    }

    apply_env_overrides(&mut profile, |name| env::var(name).ok())?;
    apply_overrides(&mut profile, overrides);
    profile.validate()?;
    Ok(profile)
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ledger-teller").join(CONFIG_FILE_NAME))
}

fn resolve_config_path(
    explicit_path: Option<&Path>,
    from_env: Option<PathBuf>,
) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit_path.map(Path::to_path_buf).or(from_env) {
        if !path.is_file() {
            bail!("config file '{}' does not exist", path.display());
        }
        return Ok(Some(path));
    }

    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Ok(Some(local));
    }
    Ok(default_config_path().filter(|path| path.is_file()))
}

fn merge_file(profile: &mut NetworkProfile, path: &Path) -> Result<()> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    let file: FileProfile = toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file '{}'", path.display()))?;

    if let Some(v) = file.gateway_url {
        profile.gateway_url = v;
    }
    if let Some(v) = file.org {
        profile.org = v;
    }
    if let Some(v) = file.channel {
        profile.channel = v;
    }
    if let Some(v) = file.peers {
        profile.peers = v;
    }
    if let Some(v) = file.chaincode {
        profile.chaincode = v;
    }
    if let Some(v) = file.request_timeout_secs {
        profile.request_timeout_secs = v;
    }
    Ok(())
}

fn apply_env_overrides(
    profile: &mut NetworkProfile,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    let read = |key: &str| {
        lookup(&format!("{ENV_PREFIX}{key}"))
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    if let Some(v) = read("GATEWAY_URL") {
        profile.gateway_url = v;
    }
    if let Some(v) = read("ORG") {
        profile.org = v;
    }
    if let Some(v) = read("CHANNEL") {
        profile.channel = v;
    }
    if let Some(v) = read("PEERS") {
        profile.peers = split_peers(&v);
    }
    if let Some(v) = read("CHAINCODE") {
        profile.chaincode = v;
    }
    if let Some(v) = read("REQUEST_TIMEOUT_SECS") {
        profile.request_timeout_secs = v
            .parse()
            .with_context(|| format!("{ENV_PREFIX}REQUEST_TIMEOUT_SECS is not a number: '{v}'"))?;
    }
    Ok(())
}

fn apply_overrides(profile: &mut NetworkProfile, overrides: &ProfileOverrides) {
    if let Some(v) = &overrides.gateway_url {
        profile.gateway_url = v.clone();
    }
    if let Some(v) = &overrides.org {
        profile.org = v.clone();
    }
    if let Some(v) = &overrides.channel {
        profile.channel = v.clone();
    }
    if let Some(v) = &overrides.peers {
        profile.peers = v.clone();
    }
    if let Some(v) = &overrides.chaincode {
        profile.chaincode = v.clone();
    }
}

pub fn split_peers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|peer| !peer.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
