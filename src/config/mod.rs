use anyhow::Result;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub base_url: String,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
}

impl AppConfig {
    /// Load configuration from the environment, falling back to local
    /// development defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = std::env::var("SERVER_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let base_url =
            std::env::var("BASE_URL").unwrap_or_else(|_| format!("http://{}:{}", host, port));
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://desk:@localhost:5432/deskserver".to_string());

        Ok(AppConfig {
            server: ServerConfig {
                host,
                port,
                base_url,
            },
            database: DatabaseConfig { url: database_url },
        })
    }
}
