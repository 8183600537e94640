use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
}

/// Outbound mail relay. Without `api_url` alerts are only logged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MailConfig {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub from: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub cors: CorsConfig,
    pub mail: MailConfig,
    pub host: String,
    pub port: u16,
    pub trust_forwarded_for: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let database_url = match get("DATABASE_URL") {
            Some(url) => url,
            None => database_url_from_parts(&get)?,
        };

        let jwt = JwtConfig {
            secret: get("JWT_SECRET").ok_or_else(|| anyhow::anyhow!("JWT_SECRET is not set"))?,
            issuer: get("JWT_ISSUER").unwrap_or_else(|| "eventhub".into()),
            audience: get("JWT_AUDIENCE").unwrap_or_else(|| "eventhub-users".into()),
            ttl_minutes: get("JWT_TTL_MINUTES")
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60),
        };

        let cors = CorsConfig {
            allowed_origins: split_list(get("CORS_ALLOWED_ORIGINS")),
            allowed_methods: split_list(get("CORS_ALLOWED_METHODS")),
        };

        let mail = MailConfig {
            api_url: get("MAIL_API_URL").filter(|v| !v.is_empty()),
            api_key: get("MAIL_API_KEY").or_else(|| get("EMAIL_PASSWORD")),
            from: get("MAIL_FROM")
                .or_else(|| get("EMAIL_USER"))
                .unwrap_or_else(|| "no-reply@eventhub.local".into()),
        };

        let port = match get("APP_PORT").or_else(|| get("SERVERPORT")) {
            Some(p) => p.parse::<u16>().map_err(|e| anyhow::anyhow!("invalid port {p:?}: {e}"))?,
            None => 3000,
        };

        Ok(Self {
            database_url,
            jwt,
            cors,
            mail,
            host: get("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            trust_forwarded_for: get("TRUST_FORWARDED_FOR")
                .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }
}

fn database_url_from_parts(get: &impl Fn(&str) -> Option<String>) -> anyhow::Result<String> {
    let var = |key: &str| get(key).ok_or_else(|| anyhow::anyhow!("neither DATABASE_URL nor {key} is set"));
    Ok(format!(
        "postgres://{}:{}@{}:{}/{}",
        var("DB_USER")?,
        var("DB_PASSWORD")?,
        get("DB_HOST").unwrap_or_else(|| "localhost".into()),
        get("DB_PORT").unwrap_or_else(|| "5432".into()),
        var("DB_NAME")?,
    ))
}

fn split_list(raw: Option<String>) -> Vec<String> {
    raw.map(|v| {
        v.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}
