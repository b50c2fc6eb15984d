use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use crate::error::{AppError, Result};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://xiaoai.plus/v1";

#[derive(Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        // DOTENV_PATH selects an alternate env file; otherwise use the
        // default .env lookup if one exists
        match env::var("DOTENV_PATH") {
            Ok(path) => {
                dotenv::from_path(&path).ok();
            }
            Err(_) => {
                dotenv::dotenv().ok();
            }
        }

        // The API key is the only value with no default; refuse to start
        // without it
        let openai_api_key = env::var("OPENAI_API_KEY").map_err(|_| {
            AppError::ConfigError("OPENAI_API_KEY is missing. Please set it in your .env file".to_string())
        })?;

        let openai_model = env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let openai_base_url =
            env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        // Load server configuration with defaults
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        let port = port.parse::<u16>().map_err(|e| AppError::ConfigError(format!("Invalid port: {}", e)))?;
        let ip = IpAddr::from_str(&host).map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;

        let server_addr = SocketAddr::new(ip, port);

        Ok(Config {
            server_addr,
            openai_api_key,
            openai_model,
            openai_base_url,
        })
    }
}
