use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents the marketplace API deployments the client can talk to.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Environment {
    /// Local development backend.
    Local,
    /// Staging backend for pre-production testing.
    Staging,
    /// Live marketplace.
    #[default]
    Production,
    /// Any other backend, addressed by its base URL.
    Custom { api_url: String },
}

impl Environment {
    /// Returns the API base URL associated with the environment.
    pub fn api_url(&self) -> String {
        match self {
            Environment::Local => "http://localhost:8000/api".to_string(),
            Environment::Staging => "https://staging.api.venturehub.io/api".to_string(),
            Environment::Production => "https://api.venturehub.io/api".to_string(),
            Environment::Custom { api_url } => api_url.clone(),
        }
    }

    /// Resolves the environment from `VENTURE_API_URL` / `VENTURE_ENVIRONMENT`,
    /// falling back to the configured name and finally the default.
    pub fn from_env(configured: Option<&str>) -> Self {
        if let Ok(url) = std::env::var("VENTURE_API_URL") {
            if !url.trim().is_empty() {
                return Environment::Custom { api_url: url };
            }
        }
        std::env::var("VENTURE_ENVIRONMENT")
            .ok()
            .or_else(|| configured.map(str::to_string))
            .and_then(|name| name.parse::<Environment>().ok())
            .unwrap_or_default()
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            other if other.starts_with("http://") || other.starts_with("https://") => {
                Ok(Environment::Custom {
                    api_url: s.to_string(),
                })
            }
            _ => Err(()),
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Local => write!(f, "Local"),
            Environment::Staging => write!(f, "Staging"),
            Environment::Production => write!(f, "Production"),
            Environment::Custom { .. } => write!(f, "Custom"),
        }
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Environment::{}, URL: {}", self, self.api_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names_case_insensitively() {
        assert_eq!("STAGING".parse::<Environment>(), Ok(Environment::Staging));
        assert_eq!("prod".parse::<Environment>(), Ok(Environment::Production));
        assert!("nowhere".parse::<Environment>().is_err());
    }

    #[test]
    /// A bare URL is accepted as a custom deployment.
    fn parses_url_as_custom() {
        let env = "http://127.0.0.1:9000".parse::<Environment>().unwrap();
        assert_eq!(env.api_url(), "http://127.0.0.1:9000");
        assert_eq!(env.to_string(), "Custom");
    }
}
