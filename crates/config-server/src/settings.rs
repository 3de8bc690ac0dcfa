use anyhow::Context;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const BIND_VAR: &str = "AVATAR_BIND";
pub const PUBLIC_DIR_VAR: &str = "AVATAR_PUBLIC_DIR";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_PUBLIC_DIR: &str = "public";

/// Persisted model config, relative to the public directory.
pub const CONFIG_DOCUMENT: &str = "config/config_mark.yml";

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub bind: SocketAddr,
    pub public_dir: PathBuf,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind = lookup(BIND_VAR).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind
            .parse()
            .with_context(|| format!("{BIND_VAR}={bind} is not a socket address"))?;
        let public_dir = lookup(PUBLIC_DIR_VAR)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PUBLIC_DIR.to_string())
            .into();
        Ok(Self { bind, public_dir })
    }

    pub fn config_path(&self) -> PathBuf {
        self.public_dir.join(CONFIG_DOCUMENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let s = Settings::from_lookup(|_| None).unwrap();
        assert_eq!(s.bind, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(s.public_dir, PathBuf::from("public"));
        assert_eq!(s.config_path(), PathBuf::from("public/config/config_mark.yml"));
    }

    #[test]
    fn overrides_are_read() {
        let s = Settings::from_lookup(|k| match k {
            BIND_VAR => Some("0.0.0.0:8080".into()),
            PUBLIC_DIR_VAR => Some("/srv/avatar".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(s.bind.port(), 8080);
        assert_eq!(s.public_dir, PathBuf::from("/srv/avatar"));
    }

    #[test]
    fn bad_bind_address_is_an_error() {
        let err = Settings::from_lookup(|k| (k == BIND_VAR).then(|| "nope".to_string()));
        assert!(err.is_err());
    }
}
