//! Client configuration loaded from code, a YAML file, or the environment.

use serde::Deserialize;

use crate::error::MarketoError;

/// Connection settings for a Marketo instance.
///
/// Either `url` or `munchkin_id` must be set; the munchkin id derives
/// `https://{munchkin_id}.mktorest.com`.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub munchkin_id: Option<String>,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_version")]
    pub version: u32,
    /// Target the bulk endpoints (`/bulk/v{n}`) instead of `/rest/v{n}`.
    #[serde(default)]
    pub bulk: bool,
}

fn default_version() -> u32 {
    1
}

impl ClientConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            url: None,
            munchkin_id: None,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            version: default_version(),
            bulk: false,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_munchkin_id(mut self, munchkin_id: impl Into<String>) -> Self {
        self.munchkin_id = Some(munchkin_id.into());
        self
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn bulk(mut self, bulk: bool) -> Self {
        self.bulk = bulk;
        self
    }

    /// Load settings from an optional YAML file, overridden by `MARKETO_*`
    /// environment variables (`MARKETO_CLIENT_ID`, `MARKETO_MUNCHKIN_ID`, ...).
    pub fn load(file: Option<&str>) -> Result<Self, MarketoError> {
        Self::load_from(file, None)
    }

    /// `env` replaces the process environment when given.
    fn load_from(file: Option<&str>, env: Option<config::Map<String, String>>) -> Result<Self, MarketoError> {
        let mut builder = config::Config::builder();
        if let Some(file) = file {
            builder = builder.add_source(config::File::with_name(file));
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix("MARKETO")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Instance root URL without a trailing slash.
    pub fn instance_url(&self) -> Result<String, MarketoError> {
        let url = match (non_empty(&self.url), non_empty(&self.munchkin_id)) {
            (Some(url), _) => url.trim_end_matches('/').to_string(),
            (None, Some(munchkin)) => format!("https://{munchkin}.mktorest.com"),
            (None, None) => {
                return Err(MarketoError::Config(
                    "must provide either a URL or a Munchkin id".to_string(),
                ))
            }
        };
        Ok(url)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
