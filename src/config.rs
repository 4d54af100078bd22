// Application configuration
// Loaded once from the environment at startup and passed down explicitly

use std::env;
use std::fmt;
use std::str::FromStr;

/// Errors raised while reading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Who may update or delete a quest or unit of measure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationPolicy {
    /// Any authenticated caller may modify any record
    #[default]
    AnyAuthenticated,
    /// Only the record's creator may modify it
    OwnerOnly,
}

impl MutationPolicy {
    /// Whether `caller` may modify a record created by `owner`
    pub fn permits(self, owner: i32, caller: i32) -> bool {
        match self {
            MutationPolicy::AnyAuthenticated => true,
            MutationPolicy::OwnerOnly => owner == caller,
        }
    }
}

impl FromStr for MutationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "any" => Ok(MutationPolicy::AnyAuthenticated),
            "owner" => Ok(MutationPolicy::OwnerOnly),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for MutationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationPolicy::AnyAuthenticated => write!(f, "any"),
            MutationPolicy::OwnerOnly => write!(f, "owner"),
        }
    }
}

/// Whether a user may complete the same quest more than once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionPolicy {
    /// Every completion accrues the reward again
    #[default]
    Repeatable,
    /// A second completion of the same quest is rejected
    OncePerQuest,
}

impl FromStr for CompletionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "repeatable" => Ok(CompletionPolicy::Repeatable),
            "once" => Ok(CompletionPolicy::OncePerQuest),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for CompletionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionPolicy::Repeatable => write!(f, "repeatable"),
            CompletionPolicy::OncePerQuest => write!(f, "once"),
        }
    }
}

/// Policy switches consumed by the quest and unit workflows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Policies {
    pub mutation: MutationPolicy,
    pub completion: CompletionPolicy,
}

/// Complete service configuration
#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub policies: Policies,
}

// Keeps the signing secret and database credentials out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_max_connections", &self.database_max_connections)
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("policies", &self.policies)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// A `.env` file in the working directory is read first when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_or("PORT", 8008u16)?;
        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let database_max_connections = parse_or("DATABASE_MAX_CONNECTIONS", 5u32)?;

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid {
                name: "JWT_SECRET",
                value: "<empty>".to_string(),
            });
        }

        let token_ttl_hours = parse_or("TOKEN_TTL_HOURS", 6i64)?;
        if token_ttl_hours <= 0 {
            return Err(ConfigError::Invalid {
                name: "TOKEN_TTL_HOURS",
                value: token_ttl_hours.to_string(),
            });
        }

        let policies = Policies {
            mutation: parse_or("QUEST_MUTATION_POLICY", MutationPolicy::default())?,
            completion: parse_or("COMPLETION_POLICY", CompletionPolicy::default())?,
        };

        Ok(Self {
            host,
            port,
            database_url,
            database_max_connections,
            jwt_secret,
            token_ttl_hours,
            policies,
        })
    }

    /// Address the HTTP listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        Err(_) => Ok(default),
    }
}
