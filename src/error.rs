use std::path::PathBuf;

/// Top-level error for anything the library can fail at. The per-frame
/// simulation itself never fails; errors only come from loading things.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("content error: {0}")]
    Content(#[from] ContentError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("failed to read skill file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse skill file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("skill source is unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;

    fn load(raw: &str) -> Result<SceneConfig, Error> {
        Ok(SceneConfig::from_toml_str(raw)?)
    }

    #[test]
    fn test_config_errors_convert() {
        let err = load("[collision]\nevent_lifetime = 0").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Invalid(_))));
        assert!(err.to_string().starts_with("configuration error"));
    }
}
