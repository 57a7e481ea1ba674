use serde::Deserialize;

use crate::error::ClientError;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// `velo-api` 的根地址，不带 `/api`
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
        }
    }
}

impl ClientConfig {
    /// 从 `VELO_CLIENT__BASE_URL` 等环境变量读取
    pub fn load() -> Result<Self, ClientError> {
        Self::from_environment(environment())
    }

    fn from_environment(env: config::Environment) -> Result<Self, ClientError> {
        let config = config::Config::builder().add_source(env).build()?;

        Ok(config.try_deserialize()?)
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("VELO_CLIENT")
        .prefix_separator("__")
        .separator("__")
}
