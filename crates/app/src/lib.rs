//! Roster application composition root
//!
//! Wires configuration, stores and notification transports into the
//! invitation router.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use roster_auth::{AuthBackend, AuthConfig};
use roster_common::Config;
use roster_email::{EmailConfig, EmailServiceFactory};
use roster_sms::{SmsConfig, SmsServiceFactory};
use roster_teams::{InvitationService, InvitationSettings, TeamsRepositories, TeamsState};
use sqlx::PgPool;
use tracing_subscriber::EnvFilter;

/// Log filter built from the configured `RUST_LOG` directives
pub fn log_filter(config: &Config) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_new(&config.rust_log)
        .with_context(|| format!("RUST_LOG is not a valid filter: {}", config.rust_log))
}

/// Create the main application router backed by Postgres and the configured transports
pub async fn create_app(config: Config, pool: PgPool) -> Result<Router, anyhow::Error> {
    let repos = TeamsRepositories::new(pool);

    let auth_config = AuthConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;

    let email_config = EmailConfig::from_env()?;
    let email_service = EmailServiceFactory::create(email_config).await?;

    let sms_config = SmsConfig::from_env()?;
    tracing::debug!(?sms_config, "SMS configuration loaded");
    let sms_service = SmsServiceFactory::create(sms_config)?;

    let invitations = InvitationService::new(
        Arc::new(repos.invitations),
        Arc::new(repos.users),
        Arc::from(email_service),
        Arc::from(sms_service),
        InvitationSettings::from(&config),
    );

    let teams_state = TeamsState {
        invitations,
        auth: AuthBackend::new(auth_config),
    };

    Ok(build_router(teams_state))
}

/// Compose domain routers with shared infrastructure routes
pub fn build_router(teams_state: TeamsState) -> Router {
    Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { "Roster API v0.0.1-SNAPSHOT" }),
        )
        .merge(roster_teams::routes().with_state(teams_state))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
