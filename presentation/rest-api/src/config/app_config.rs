use poem::middleware::SetHeader;

use super::{
    cors_config, google_config::GoogleConfig, menu_config::MenuConfig,
    server_config::ServerConfig,
};

pub struct AppConfig {
    pub server: ServerConfig,
    pub cors: SetHeader,
    pub menu: MenuConfig,
    pub google: GoogleConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        Ok(Self {
            server: ServerConfig::from_lookup(&lookup),
            cors: cors_config::init_cors(),
            menu: MenuConfig::from_lookup(&lookup)?,
            google: GoogleConfig::from_lookup(&lookup),
        })
    }
}
