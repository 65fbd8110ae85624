use crate::domain::page::DEFAULT_PAGE_SIZE;
use crate::infrastructure::security::MAX_SESSION_TTL_HOURS;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub session_ttl_hours: i64,
    pub posts_per_page: u32,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".into());
        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PORT: {}", e))?;
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let jwt_secret = lookup("JWT_SECRET").ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set"))?;
        let session_ttl_hours: i64 = lookup("SESSION_TTL_HOURS")
            .unwrap_or_else(|| "24".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid SESSION_TTL_HOURS: {}", e))?;
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&session_ttl_hours) {
            anyhow::bail!(
                "SESSION_TTL_HOURS must be between 1 and {}, got {}",
                MAX_SESSION_TTL_HOURS,
                session_ttl_hours
            );
        }
        let posts_per_page: u32 = lookup("POSTS_PER_PAGE")
            .unwrap_or_else(|| DEFAULT_PAGE_SIZE.to_string())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid POSTS_PER_PAGE: {}", e))?;
        if posts_per_page == 0 {
            anyhow::bail!("POSTS_PER_PAGE must be positive");
        }
        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            database_url,
            jwt_secret,
            session_ttl_hours,
            posts_per_page,
            cors_origins,
        })
    }
}
