#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_parse_or};

/// Database used when neither the environment nor the URI names one.
pub const DEFAULT_DATABASE: &str = "todo";

/// Connection string used when no URI variable is set.
pub const DEFAULT_URL: &str = "mongodb://localhost:27017";

/// MongoDB connection settings
///
/// ```ignore
/// use database::mongodb::MongoConfig;
///
/// let config = MongoConfig::new("mongodb://localhost:27017/todo");
/// assert_eq!(config.database(), "todo");
///
/// // From environment variables (requires `config` feature)
/// let config = MongoConfig::from_env()?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoConfig {
    /// Connection string: mongodb://[username:password@]host[:port][/database][?options]
    pub url: String,

    /// Database name to use
    pub database: String,

    /// Optional application name reported in server logs
    pub app_name: Option<String>,

    /// Pool upper bound; `None` keeps the driver default
    pub max_pool_size: Option<u32>,

    /// Pool lower bound; `None` keeps the driver default
    pub min_pool_size: Option<u32>,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Server selection timeout in seconds
    pub server_selection_timeout_secs: u64,
}

impl MongoConfig {
    /// Build a config from a connection string.
    ///
    /// The database is taken from the URI path, falling back to [`DEFAULT_DATABASE`].
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let database = database_from_url(&url).unwrap_or(DEFAULT_DATABASE).to_string();
        Self {
            url,
            database,
            ..Self::default()
        }
    }

    /// Build a config with an explicit database name
    pub fn with_database(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            ..Self::default()
        }
    }

    /// Set the application name for server logs
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// Connection string with any password replaced, safe for logs.
    pub fn redacted_url(&self) -> String {
        let Some((scheme, rest)) = self.url.split_once("://") else {
            return self.url.clone();
        };
        match rest.split_once('@') {
            Some((credentials, host)) => {
                let user = credentials.split(':').next().unwrap_or_default();
                format!("{scheme}://{user}:***@{host}")
            }
            None => self.url.clone(),
        }
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            app_name: None,
            max_pool_size: None,
            min_pool_size: None,
            connect_timeout_secs: 10,
            server_selection_timeout_secs: 30,
        }
    }
}

/// Extract the default database from the path segment of a connection string.
fn database_from_url(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("://")?;
    let (_, path) = rest.split_once('/')?;
    let name = path.split('?').next().unwrap_or_default();
    (!name.is_empty()).then_some(name)
}

/// Load MongoConfig from environment variables
///
/// - `MONGO_URI`, `MONGODB_URL` or `MONGO_URL` - connection string
///   (default `mongodb://localhost:27017`)
/// - `MONGODB_DATABASE` or `MONGO_DATABASE` - database name
///   (default: database in the URI path, else `todo`)
/// - `MONGODB_APP_NAME` (optional)
/// - `MONGODB_MAX_POOL_SIZE`, `MONGODB_MIN_POOL_SIZE` (optional, driver default)
/// - `MONGODB_CONNECT_TIMEOUT_SECS` (default: 10)
/// - `MONGODB_SERVER_SELECTION_TIMEOUT_SECS` (default: 30)
#[cfg(feature = "config")]
impl FromEnv for MongoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = ["MONGO_URI", "MONGODB_URL", "MONGO_URL"]
            .iter()
            .find_map(|key| std::env::var(key).ok())
            .unwrap_or_else(|| DEFAULT_URL.to_string());

        let mut config = match std::env::var("MONGODB_DATABASE")
            .or_else(|_| std::env::var("MONGO_DATABASE"))
        {
            Ok(database) => Self::with_database(url, database),
            Err(_) => Self::new(url),
        };

        config.app_name = std::env::var("MONGODB_APP_NAME").ok();
        config.max_pool_size = optional_u32("MONGODB_MAX_POOL_SIZE")?;
        config.min_pool_size = optional_u32("MONGODB_MIN_POOL_SIZE")?;
        config.connect_timeout_secs =
            env_parse_or("MONGODB_CONNECT_TIMEOUT_SECS", config.connect_timeout_secs)?;
        config.server_selection_timeout_secs = env_parse_or(
            "MONGODB_SERVER_SELECTION_TIMEOUT_SECS",
            config.server_selection_timeout_secs,
        )?;

        Ok(config)
    }
}

#[cfg(feature = "config")]
fn optional_u32(key: &str) -> Result<Option<u32>, ConfigError> {
    std::env::var(key)
        .ok()
        .map(|raw| {
            raw.parse().map_err(|e: std::num::ParseIntError| ConfigError::ParseError {
                key: key.to_string(),
                details: e.to_string(),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mongo_config_new_without_path_uses_default_database() {
        let config = MongoConfig::new("mongodb://localhost:27017");
        assert_eq!(config.url(), "mongodb://localhost:27017");
        assert_eq!(config.database(), DEFAULT_DATABASE);
        assert_eq!(config.max_pool_size, None);
    }

    #[test]
    fn test_mongo_config_new_takes_database_from_uri() {
        let config = MongoConfig::new("mongodb+srv://u:p@cluster0.example.net/tasks?retryWrites=true");
        assert_eq!(config.database(), "tasks");
    }

    #[test]
    fn test_mongo_config_trailing_slash_falls_back() {
        let config = MongoConfig::new("mongodb://localhost:27017/?directConnection=true");
        assert_eq!(config.database(), DEFAULT_DATABASE);
    }

    #[test]
    fn test_mongo_config_with_database() {
        let config = MongoConfig::with_database("mongodb://localhost:27017/ignored", "mydb");
        assert_eq!(config.database(), "mydb");
    }

    #[test]
    fn test_mongo_config_with_app_name() {
        let config = MongoConfig::new("mongodb://localhost:27017").with_app_name("todo-api");
        assert_eq!(config.app_name.as_deref(), Some("todo-api"));
    }

    #[test]
    fn test_redacted_url_hides_password() {
        let config = MongoConfig::new("mongodb://admin:hunter2@db:27017/todo");
        assert_eq!(config.redacted_url(), "mongodb://admin:***@db:27017/todo");
    }

    #[test]
    fn test_redacted_url_without_credentials_is_unchanged() {
        let config = MongoConfig::new("mongodb://db:27017");
        assert_eq!(config.redacted_url(), "mongodb://db:27017");
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_mongo_config_from_env_prefers_mongo_uri() {
        temp_env::with_vars(
            [
                ("MONGO_URI", Some("mongodb://primary:27017/todo_prod")),
                ("MONGODB_URL", Some("mongodb://secondary:27017")),
                ("MONGODB_DATABASE", None::<&str>),
                ("MONGO_DATABASE", None::<&str>),
            ],
            || {
                let config = MongoConfig::from_env().unwrap();
                assert_eq!(config.url, "mongodb://primary:27017/todo_prod");
                assert_eq!(config.database, "todo_prod");
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_mongo_config_from_env_defaults_when_unset() {
        temp_env::with_vars(
            [
                ("MONGO_URI", None::<&str>),
                ("MONGODB_URL", None::<&str>),
                ("MONGO_URL", None::<&str>),
                ("MONGODB_DATABASE", None::<&str>),
                ("MONGO_DATABASE", None::<&str>),
                ("MONGODB_MAX_POOL_SIZE", None::<&str>),
            ],
            || {
                let config = MongoConfig::from_env().unwrap();
                assert_eq!(config.url, DEFAULT_URL);
                assert_eq!(config.database, DEFAULT_DATABASE);
                assert_eq!(config.max_pool_size, None);
            },
        );
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_mongo_config_from_env_rejects_bad_pool_size() {
        temp_env::with_vars(
            [
                ("MONGO_URI", Some("mongodb://localhost:27017")),
                ("MONGODB_MAX_POOL_SIZE", Some("many")),
            ],
            || {
                let err = MongoConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("MONGODB_MAX_POOL_SIZE"));
            },
        );
    }
}
