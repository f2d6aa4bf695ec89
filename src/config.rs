use crate::error::{BadEnvVarSnafu, EditorResult, ParseNumberSnafu};
use snafu::ResultExt;
use std::{env::VarError, sync::Arc, time::Duration};

pub const DEFAULT_API_BASE_URL: &str = "https://localhost:44363";
pub const DEFAULT_PROFILE_IMAGE: &str = "/assets/default-student.jpg";
pub const DEFAULT_COLLECTION_PATH: &str = "students";
const DEFAULT_FEEDBACK_MS: u64 = 2000;

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    api_config: Arc<ApiConfig>,
    editor_settings: Arc<EditorSettings>,
}

impl RuntimeConfiguration {
    pub fn new() -> EditorResult<Self> {
        Self::from_lookup(|name| dotenvy::var(name))
    }

    /// Builds the configuration from any env-like lookup. Unset variables fall
    /// back to their defaults, anything else that fails is an error.
    pub fn from_lookup(
        lookup: impl Fn(&'static str) -> Result<String, dotenvy::Error>,
    ) -> EditorResult<Self> {
        let get_env_var = |name: &'static str| -> EditorResult<Option<String>> {
            match lookup(name) {
                Ok(value) => Ok(Some(value)),
                Err(dotenvy::Error::EnvVar(VarError::NotPresent)) => Ok(None),
                Err(source) => Err(source).context(BadEnvVarSnafu { name }),
            }
        };
        let get_millis = |name: &'static str| -> EditorResult<Duration> {
            let Some(raw) = get_env_var(name)? else {
                return Ok(Duration::from_millis(DEFAULT_FEEDBACK_MS));
            };
            let millis = raw.trim().parse::<u64>().context(ParseNumberSnafu {
                name,
                original: raw.clone(),
            })?;
            Ok(Duration::from_millis(millis))
        };

        let api_config = ApiConfig {
            base_url: get_env_var("STUDENT_API_BASE_URL")?
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        };
        let editor_settings = EditorSettings {
            notification_duration: get_millis("EDITOR_NOTIFICATION_MS")?,
            redirect_delay: get_millis("EDITOR_REDIRECT_DELAY_MS")?,
            default_image: get_env_var("EDITOR_DEFAULT_IMAGE")?
                .unwrap_or_else(|| DEFAULT_PROFILE_IMAGE.to_string()),
            collection_path: DEFAULT_COLLECTION_PATH.to_string(),
        };

        Ok(Self {
            api_config: Arc::new(api_config),
            editor_settings: Arc::new(editor_settings),
        })
    }

    pub fn api_config(&self) -> Arc<ApiConfig> {
        self.api_config.clone()
    }

    pub fn editor_settings(&self) -> Arc<EditorSettings> {
        self.editor_settings.clone()
    }
}

#[derive(Debug)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Turns a stored image reference into something the browser can fetch.
    pub fn image_path(&self, relative_path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            relative_path.trim_start_matches('/')
        )
    }
}

/// Timings and paths the editor uses for its feedback.
#[derive(Debug, Clone)]
pub struct EditorSettings {
    pub notification_duration: Duration,
    pub redirect_delay: Duration,
    pub default_image: String,
    pub collection_path: String,
}

impl EditorSettings {
    pub fn detail_path(&self, id: &str) -> String {
        format!("{}/{id}", self.collection_path)
    }
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            notification_duration: Duration::from_millis(DEFAULT_FEEDBACK_MS),
            redirect_delay: Duration::from_millis(DEFAULT_FEEDBACK_MS),
            default_image: DEFAULT_PROFILE_IMAGE.to_string(),
            collection_path: DEFAULT_COLLECTION_PATH.to_string(),
        }
    }
}
