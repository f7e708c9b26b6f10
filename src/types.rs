pub use crate::utils::database;
use crate::modules::notification::bus::Bus;
use async_trait::async_trait;
use std::env;

#[derive(Clone)]
pub enum AppEnvironment {
    Production,
    Development,
}

impl AppEnvironment {
    pub fn from(raw_environment: String) -> Self {
        match raw_environment.as_ref() {
            "production" => Self::Production,
            _ => Self::Development,
        }
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub host: String,
    pub environment: AppEnvironment,
    pub port: u32,
    pub url: String,
}

#[derive(Clone)]
pub struct AuthContext {
    pub token_secret: String,
}

#[derive(Clone)]
pub struct MailContext {
    pub host: String,
    pub sender: String,
    pub user: String,
    pub password: String,
}

#[derive(Clone)]
pub struct StorageContext {
    pub api_key: String,
    pub api_secret: String,
    pub upload_endpoint: String,
    pub upload_preset: String,
}

#[derive(Clone)]
pub struct Context {
    pub app: AppContext,
    pub db_conn: database::DatabaseConnection,
    pub auth: AuthContext,
    pub mail: MailContext,
    pub storage: StorageContext,
    pub bus: Bus,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub environment: AppEnvironment,
    pub port: u32,
    pub url: String,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub token_secret: String,
}

#[derive(Clone)]
pub struct MailConfig {
    pub host: String,
    pub sender: String,
    pub user: String,
    pub password: String,
}

#[derive(Clone)]
pub struct StorageConfig {
    pub api_key: String,
    pub api_secret: String,
    pub upload_endpoint: String,
    pub upload_preset: String,
}

#[derive(Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub app: AppConfig,
    pub auth: AuthConfig,
    pub mail: MailConfig,
    pub storage: StorageConfig,
}

impl Default for Config {
    fn default() -> Self {
        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL not set");
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let environment = env::var("APP_ENV").expect("APP_ENV not set");
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u32>()
            .expect("Invalid PORT number");
        let url = env::var("URL").unwrap_or_else(|_| format!("http://{}:{}", host, port));
        let token_secret = env::var("TOKEN_SECRET").expect("TOKEN_SECRET not set");
        let mail_host = env::var("MAIL_HOST").expect("MAIL_HOST not set");
        let mail_sender = env::var("MAIL_SENDER").expect("MAIL_SENDER not set");
        let mail_user = env::var("MAIL_USER").expect("MAIL_USER not set");
        let mail_password = env::var("MAIL_PASSWORD").expect("MAIL_PASSWORD not set");
        let storage_api_key = env::var("STORAGE_API_KEY").expect("STORAGE_API_KEY not set");
        let storage_api_secret = env::var("STORAGE_API_SECRET").expect("STORAGE_API_SECRET not set");
        let storage_upload_endpoint =
            env::var("STORAGE_UPLOAD_ENDPOINT").expect("STORAGE_UPLOAD_ENDPOINT not set");
        let storage_upload_preset =
            env::var("STORAGE_UPLOAD_PRESET").expect("STORAGE_UPLOAD_PRESET not set");

        Self {
            database: DatabaseConfig { url: database_url },
            app: AppConfig {
                host,
                environment: AppEnvironment::from(environment),
                port,
                url,
            },
            auth: AuthConfig { token_secret },
            mail: MailConfig {
                host: mail_host,
                sender: mail_sender,
                user: mail_user,
                password: mail_password,
            },
            storage: StorageConfig {
                api_key: storage_api_key,
                api_secret: storage_api_secret,
                upload_endpoint: storage_upload_endpoint,
                upload_preset: storage_upload_preset,
            },
        }
    }
}

#[async_trait]
pub trait ToContext {
    async fn to_context(self) -> Context;
}

#[async_trait]
impl ToContext for Config {
    async fn to_context(self) -> Context {
        let db_conn = database::connect(self.database.url.as_str()).await;
        database::migrate(db_conn.clone()).await;

        Context {
            app: AppContext {
                host: self.app.host,
                environment: self.app.environment,
                port: self.app.port,
                url: self.app.url,
            },
            db_conn,
            auth: AuthContext {
                token_secret: self.auth.token_secret,
            },
            mail: MailContext {
                host: self.mail.host,
                sender: self.mail.sender,
                user: self.mail.user,
                password: self.mail.password,
            },
            storage: StorageContext {
                api_key: self.storage.api_key,
                api_secret: self.storage.api_secret,
                upload_endpoint: self.storage.upload_endpoint,
                upload_preset: self.storage.upload_preset,
            },
            bus: Bus::new(),
        }
    }
}
