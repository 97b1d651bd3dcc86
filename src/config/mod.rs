use std::env;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub datastore_url: String,
    pub datastore_api_key: String,
    pub analyzer_api_key: String,
    pub analyzer_model: String,
    pub mail_api_url: String,
    pub mail_api_key: String,
    pub mail_sender: String,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        Ok(Config {
            datastore_url: env::var("DATASTORE_URL")?,
            datastore_api_key: env::var("DATASTORE_API_KEY")?,
            analyzer_api_key: env::var("ANALYZER_API_KEY")?,
            analyzer_model: env::var("ANALYZER_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
            mail_api_url: env::var("MAIL_API_URL")?,
            mail_api_key: env::var("MAIL_API_KEY")?,
            mail_sender: env::var("MAIL_SENDER")?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "::".to_string()),
            server_port: env::var("SERVER_PORT")
                .map(|p| p.parse().unwrap_or(8000))
                .unwrap_or(8000),
        })
    }
}
