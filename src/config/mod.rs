pub mod configs;
pub mod defaults;
pub mod envconfig;
pub mod validate;

pub use configs::{
    AppConfig, CorsConfig, DatabaseConfig, GeneralConfig, JwtConfig, LogFormat, LoggingConfig,
};
pub use envconfig::EnvConfig;
