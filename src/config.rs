use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_host: String,
    pub server_port: u16,
    /// Directory that rendered maps (and a fetched basemap) are written to
    pub maps_dir: PathBuf,
    pub basemap_path: Option<PathBuf>,
    pub basemap_url: Option<String>,
    pub command_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://database.db?mode=rwc".to_string()),
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .expect("DATABASE_MAX_CONNECTIONS must be a number"),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            maps_dir: env::var("MAPS_DIR")
                .unwrap_or_else(|_| "maps".to_string())
                .into(),
            basemap_path: env::var("BASEMAP_PATH").ok().map(PathBuf::from),
            basemap_url: env::var("BASEMAP_URL").ok(),
            command_prefix: env::var("COMMAND_PREFIX")
                .unwrap_or_else(|_| "!".to_string()),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests(maps_dir: impl Into<PathBuf>) -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            database_max_connections: 1,
            server_host: "127.0.0.1".to_string(),
            server_port: 0,
            maps_dir: maps_dir.into(),
            basemap_path: None,
            basemap_url: None,
            command_prefix: "!".to_string(),
        }
    }
}
