use config::{Config, File};
use secrecy::SecretString;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Settings{
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub jwt: JWTSettings,
    pub payment: PaymentSettings
}

#[derive(Deserialize, Debug)]
pub struct ApplicationSettings{
    pub host: String,
    pub port: u16
}

#[derive(Deserialize, Debug)]
pub struct DatabaseSettings{
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub name: String
}

impl DatabaseSettings{
    // Url of the postgres instance, without a database selected
    pub fn get_database_url(&self) -> String{
        format!(
            "postgres://{}:{}@{}:{}",
            self.username, self.password, self.host, self.port
        )
    }

    // Url of the configured database itself
    pub fn get_database_table_url(&self) -> String{
        format!("{}/{}", self.get_database_url(), self.name)
    }
}

// Both secrets stay wrapped so a stray debug-print can't leak them
#[derive(Deserialize, Debug)]
pub struct JWTSettings{
    pub secret: SecretString,
    pub expiry_hours: u64
}

#[derive(Deserialize, Debug)]
pub struct PaymentSettings{
    pub api_uri: String,
    pub secret_key: SecretString,
    pub timeout_seconds: u64
}

impl Settings{
    pub fn get() -> Self{
        let config = Config::builder()
            .add_source(File::with_name("configuration/base.yaml"))
            .build()
            .expect("Failed to get configuration")
            .try_deserialize::<Settings>()
            .expect("Failed to deserialize to Settings struct");

        config
    }
}
