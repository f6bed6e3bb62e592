use serde::{Deserialize, Serialize};

use config::{Config, ConfigError, Environment};

/// Demo driver configuration.
#[derive(Debug, Serialize, Deserialize)]
pub struct Settings {
    /// Directory the demo writes its artifacts into.
    pub out_dir: String,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let cfg = Config::builder()
            // Значения по умолчанию
            .set_default("out_dir", "./target/zefir-demo")?
            // Переменные окружения с префиксом ZEFIR_
            .add_source(Environment::with_prefix("ZEFIR"))
            .build()?;

        cfg.try_deserialize()
    }
}
