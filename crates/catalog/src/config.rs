use std::path::Path;

use serde::{Deserialize, Serialize};

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/124.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Per-request timeout applied to every outbound call.
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub proxy: Option<ProxySettings>,
    /// Without a token the TMDB enrichment path is disabled.
    pub tmdb: Option<TmdbSettings>,
    pub portals: PortalSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            request_timeout_secs: 60,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy: None,
            tmdb: None,
            portals: PortalSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxySettings {
    pub address: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbSettings {
    pub access_token: String,
}

/// Per-portal enable switches.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalSettings {
    pub aniworld: bool,
    pub sto: bool,
    pub megakino: bool,
}

impl Default for PortalSettings {
    fn default() -> Self {
        Self {
            aniworld: true,
            sto: true,
            megakino: true,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file, writing the defaults first when the
    /// file does not exist yet.
    pub async fn load_or_create(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if let Some(parent) = path.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }

                let default = Settings::default();
                tokio::fs::write(path, toml::to_string_pretty(&default)?).await?;
                Ok(default)
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.request_timeout_secs, 60);
        assert!(settings.proxy.is_none());
        assert!(settings.tmdb.is_none());
        assert!(settings.portals.aniworld);
        assert!(settings.portals.sto);
        assert!(settings.portals.megakino);
    }

    #[test]
    fn test_parse_partial_file_fills_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            request_timeout_secs = 30

            [tmdb]
            access_token = "token"

            [portals]
            megakino = false
            "#,
        )
        .unwrap();

        assert_eq!(settings.request_timeout_secs, 30);
        assert_eq!(settings.tmdb.unwrap().access_token, "token");
        assert!(settings.portals.aniworld);
        assert!(!settings.portals.megakino);
    }

    #[test]
    fn test_defaults_round_trip_through_toml() {
        let serialized = toml::to_string_pretty(&Settings::default()).unwrap();
        let parsed: Settings = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.user_agent, Settings::default().user_agent);
    }
}
