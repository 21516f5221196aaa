use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use shared_types::NumberType;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub server: Option<ServerConfig>,
    pub cors: Option<CorsConfig>,
    pub directory: Option<DirectoryConfig>,
    pub pbx: Option<PbxConfig>,
    pub auth: Option<AuthConfig>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            server: Some(ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            }),
            cors: Some(CorsConfig {
                allowed_origins: vec!["http://localhost:3000".to_string()],
            }),
            directory: Some(DirectoryConfig::default()),
            pbx: Some(PbxConfig::default()),
            auth: Some(AuthConfig::default()),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

/// Settings for the phone-book XML export.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DirectoryConfig {
    /// Group served when the request carries no `cgroup` parameter.
    #[serde(default = "default_group")]
    pub default_group: String,
    /// Emit E164-formatted numbers unless the request says otherwise.
    #[serde(default)]
    pub use_e164_default: bool,
    #[serde(default)]
    pub labels: DirectoryLabels,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            default_group: default_group(),
            use_e164_default: false,
            labels: DirectoryLabels::default(),
        }
    }
}

fn default_group() -> String {
    "User Manager Group".to_string()
}

/// Customizable display labels for the contact-type codes.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DirectoryLabels {
    #[serde(default = "label_internal")]
    pub internal: String,
    #[serde(default = "label_cell")]
    pub cell: String,
    #[serde(default = "label_work")]
    pub work: String,
    #[serde(default = "label_home")]
    pub home: String,
    #[serde(default = "label_other")]
    pub other: String,
}

impl Default for DirectoryLabels {
    fn default() -> Self {
        Self {
            internal: label_internal(),
            cell: label_cell(),
            work: label_work(),
            home: label_home(),
            other: label_other(),
        }
    }
}

fn label_internal() -> String {
    "Extension".to_string()
}

fn label_cell() -> String {
    "Mobile".to_string()
}

fn label_work() -> String {
    "Work".to_string()
}

fn label_home() -> String {
    "Home".to_string()
}

fn label_other() -> String {
    "Other".to_string()
}

impl DirectoryLabels {
    /// Unrecognized codes pass through as their own label.
    pub fn label_for<'a>(&'a self, type_code: &'a NumberType) -> &'a str {
        match type_code {
            NumberType::Internal => &self.internal,
            NumberType::Cell => &self.cell,
            NumberType::Work => &self.work,
            NumberType::Home => &self.home,
            NumberType::Other => &self.other,
            NumberType::Unknown(code) => code,
        }
    }
}

/// Where to reach the PBX manager HTTP interface.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PbxConfig {
    #[serde(default = "default_manager_url")]
    pub manager_url: String,
    pub manager_user: Option<String>,
    pub manager_secret: Option<String>,
}

impl Default for PbxConfig {
    fn default() -> Self {
        Self {
            manager_url: default_manager_url(),
            manager_user: None,
            manager_secret: None,
        }
    }
}

fn default_manager_url() -> String {
    "http://127.0.0.1:8088".to_string()
}

/// Session gate for the extension status page. With no token configured
/// the page always refuses.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthConfig {
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,
    pub session_token: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie: default_session_cookie(),
            session_token: None,
        }
    }
}

fn default_session_cookie() -> String {
    "pbx_session".to_string()
}

impl ApiConfig {
    pub fn load() -> Result<(Self, PathBuf), ConfigError> {
        let config_path = get_config_path();

        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        // Create default config file if it doesn't exist
        if !config_path.exists() {
            let default_config = r#"
[server]
host = "127.0.0.1"
port = 8080

[cors]
allowed_origins = ["http://localhost:3030"]

[directory]
# Group served when the URL carries no ?cgroup= parameter
default_group = "User Manager Group"
use_e164_default = false

[directory.labels]
internal = "Extension"
cell = "Mobile"
work = "Work"
home = "Home"
other = "Other"

[pbx]
# PBX manager HTTP interface serving the registration contact list
manager_url = "http://127.0.0.1:8088"
# manager_user = "admin"
# manager_secret = ""

[auth]
# Cookie checked before rendering the extension status page
session_cookie = "pbx_session"
# session_token = "change-me"
"#;
            std::fs::write(&config_path, default_config).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.clone()))
            .build()?;

        let config: ApiConfig = builder.try_deserialize()?;

        Ok((config, config_path))
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("pbxpages").join("api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}
