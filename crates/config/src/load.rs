use directories::ProjectDirs;
use figment::Figment;
use figment::providers::{Env, Format, Json, Toml, Yaml};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

use crate::error::{ErrorKind, Result};
use crate::settings::Config;

/// Prefix for environment overrides, e.g. `HASHPREFIX_CACHE__TTL=600`.
pub const ENV_PREFIX: &str = "HASHPREFIX_";

/// Where the config file lives when none is given explicitly, e.g.
/// `~/.config/hashprefix/config.toml` on Linux.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "hashprefix").map(|dirs| dirs.config_dir().join("config.toml"))
}

impl Config {
    /// Load configuration from defaults, a config file and the environment,
    /// in increasing order of precedence, then validate it.
    ///
    /// With `path` set, that file must exist. Without, the
    /// [default path](default_config_path) is used if there's a file there.
    #[instrument(level = "debug")]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) if !path.is_file() => exn::bail!(ErrorKind::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|path| path.is_file()),
        };
        let config = Self::from_figment(Self::figment(file.as_deref())?)?;
        debug!(file = ?file, service = %config.service, "configuration loaded");
        Ok(config)
    }

    /// The layered sources behind [`load()`](Self::load), for callers that
    /// want to merge in their own providers.
    pub fn figment(file: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::new();
        if let Some(file) = file {
            figment = match file.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => figment.merge(Toml::file(file)),
                Some("yaml" | "yml") => figment.merge(Yaml::file(file)),
                Some("json") => figment.merge(Json::file(file)),
                _ => exn::bail!(ErrorKind::UnsupportedFormat(file.to_path_buf())),
            };
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Extract and validate a configuration.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract().map_err(|e| ErrorKind::Load(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{CacheConfig, StoreConfig};
    use figment::Jail;
    use rstest::rstest;

    /// Load `contents` saved as `name` inside a jail, so environment
    /// overrides set by other tests can't leak in.
    fn load_jailed(name: &str, contents: &str, env: &[(&str, &str)]) -> Result<Config> {
        let mut loaded = None;
        Jail::expect_with(|jail| {
            jail.create_file(name, contents)?;
            for (key, value) in env {
                jail.set_env(key, value);
            }
            loaded = Some(Config::load(Some(Path::new(name))));
            Ok(())
        });
        loaded.expect("jail closure ran")
    }

    #[rstest]
    #[case(
        "config.toml",
        "service = \"parental\"\n[cache]\nttl = 60\n[store]\ntype = \"memory\"\n"
    )]
    #[case("config.yaml", "service: parental\ncache:\n  ttl: 60\nstore:\n  type: memory\n")]
    #[case(
        "config.json",
        r#"{"service": "parental", "cache": {"ttl": 60}, "store": {"type": "memory"}}"#
    )]
    fn test_load_formats(#[case] name: &str, #[case] contents: &str) {
        let config = load_jailed(name, contents, &[]).unwrap();
        assert_eq!(config.service, "parental");
        // Unset keys keep their defaults.
        assert_eq!(config.cache, CacheConfig { ttl: 60, capacity: 10_000 });
        assert_eq!(config.store, StoreConfig::Memory);
    }

    #[test]
    fn test_directory_store() {
        let config =
            load_jailed("config.toml", "[store]\ntype = \"directory\"\npath = \"/var/cache/hashprefix\"\n", &[]).unwrap();
        assert_eq!(
            config.store,
            StoreConfig::Directory {
                path: PathBuf::from("/var/cache/hashprefix")
            }
        );
    }

    #[test]
    fn test_missing_explicit_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nope.toml");
        let err = Config::load(Some(&path)).unwrap_err();
        assert_eq!(*err, ErrorKind::NotFound(path));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_jailed("config.ini", "service=parental", &[]).unwrap_err();
        assert!(matches!(&*err, ErrorKind::UnsupportedFormat(_)));
    }

    #[rstest]
    #[case("cache = 5\n")]
    #[case("[cache]\nttl = \"an hour\"\n")]
    #[case("unknown_key = true\n")]
    #[case("[store]\ntype = \"redis\"\n")]
    fn test_unparseable(#[case] contents: &str) {
        let err = load_jailed("config.toml", contents, &[]).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Load(_)));
    }

    #[test]
    fn test_loaded_config_is_validated() {
        let err = load_jailed("config.toml", "[cache]\nttl = 0\n", &[]).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid(_)));
    }

    #[test]
    fn test_env_overrides_file() {
        let config = load_jailed(
            "config.toml",
            "service = \"parental\"\n[cache]\nttl = 60\n",
            &[("HASHPREFIX_CACHE__TTL", "120"), ("HASHPREFIX_STORE__TYPE", "memory")],
        )
        .unwrap();
        assert_eq!(config.service, "parental");
        assert_eq!(config.cache.ttl, 120);
        assert_eq!(config.store, StoreConfig::Memory);
    }

    #[test]
    fn test_default_config_path() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("config.toml"));
        }
    }
}
