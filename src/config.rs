use anyhow::{anyhow, Result};
use std::env;
use std::path::PathBuf;

/// Runtime settings, read from the environment (and `.env` via dotenv).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_address: String,
    pub upload_dir: PathBuf,
    pub token_ttl_days: i64,
    pub bcrypt_cost: u32,
}

impl Settings {
    pub fn new<S: Into<String>>(jwt_secret: S) -> Self {
        Self {
            database_url: "sqlite:fitfusion.db".to_string(),
            jwt_secret: jwt_secret.into(),
            bind_address: "127.0.0.1:5000".to_string(),
            upload_dir: PathBuf::from("uploads"),
            token_ttl_days: 7,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    pub fn from_env() -> Result<Self> {
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow!("JWT_SECRET must be set"))?;
        if jwt_secret.trim().is_empty() {
            return Err(anyhow!("JWT_SECRET must not be empty"));
        }

        let mut settings = Self::new(jwt_secret);

        if let Ok(url) = env::var("DATABASE_URL") {
            settings.database_url = url;
        }
        if let Ok(addr) = env::var("BIND_ADDRESS") {
            settings.bind_address = addr;
        }
        if let Ok(dir) = env::var("UPLOAD_DIR") {
            settings.upload_dir = PathBuf::from(dir);
        }
        if let Ok(days) = env::var("TOKEN_TTL_DAYS") {
            settings.token_ttl_days = days
                .parse()
                .map_err(|e| anyhow!("invalid TOKEN_TTL_DAYS {}: {}", days, e))?;
        }
        if let Ok(cost) = env::var("BCRYPT_COST") {
            settings.bcrypt_cost = cost
                .parse()
                .map_err(|e| anyhow!("invalid BCRYPT_COST {}: {}", cost, e))?;
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::new("secret");
        assert_eq!(settings.token_ttl_days, 7);
        assert_eq!(settings.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert_eq!(settings.upload_dir, PathBuf::from("uploads"));
    }
}
