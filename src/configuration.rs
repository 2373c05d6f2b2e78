use config::ConfigError;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub token: TokenSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    pub port: u16,
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: String,
    pub port: u16,
    pub host: String,
    pub database_name: String,
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database_name
        )
    }

    pub fn connection_string_without_db(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}",
            self.username, self.password, self.host, self.port
        )
    }
}

/// Session token settings
///
/// The signing secret and both TTLs reach the issuer/verifier as explicit
/// constructor inputs; nothing reads this from a global.
#[derive(serde::Deserialize, Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub access_token_expiry: i64,  // seconds (e.g., 900 for 15 minutes)
    pub refresh_token_expiry: i64, // seconds (e.g., 604800 for 7 days)
    pub issuer: String,
    /// Grant-type marker the refresh exchange accepts
    pub refresh_grant_type: String,
    /// Paths the authentication gate skips entirely
    pub public_paths: Vec<String>,
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .set_default("application.port", 8080)?
        .set_default("database.username", "postgres")?
        .set_default("database.password", "password")?
        .set_default("database.port", 5432)?
        .set_default("database.host", "127.0.0.1")?
        .set_default("database.database_name", "authd")?
        .set_default("token.secret", "dev-only-secret-change-me-at-least-32-chars")?
        .set_default("token.access_token_expiry", 900)?
        .set_default("token.refresh_token_expiry", 604800)?
        .set_default("token.issuer", "authd")?
        .set_default("token.refresh_grant_type", "refreshToken")?
        .set_default(
            "token.public_paths",
            vec!["/health_check", "/api/members", "/api/login", "/api/refreshToken"],
        )?
        .add_source(config::File::with_name("configuration").required(false))
        .build()?;
    settings.try_deserialize::<Settings>()
}
