//! Authentication configuration

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
}

impl AuthConfig {
    /// Load auth configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        Ok(Self {
            jwt_secret: std::env::var("JWT_SECRET")
                .map_err(|_| "JWT_SECRET environment variable is required".to_string())?,
            issuer: std::env::var("JWT_ISSUER").ok(),
            audience: std::env::var("JWT_AUDIENCE").ok(),
        })
    }
}
