// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use socialhub_server::{
    api::router,
    auth::{SiteUser, UserId},
    config::{LogFormat, Settings, DEFAULT_LOG_FILTER},
    state::AppState,
    store::ContentStore,
};
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.compact().init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() {
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };
    init_tracing(settings.log_format);

    let mut store = ContentStore::new();
    if let Some(login) = settings.seed_admin_login.clone() {
        tracing::info!(login = %login, "seeding administrator account");
        store.insert_user(SiteUser {
            id: UserId(1),
            login,
            roles: vec!["administrator".to_string()],
        });
    }

    let addr = settings.bind_addr().expect("Failed to parse bind address");
    let state = AppState::from_settings(&settings, store);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!(
        %addr,
        rest_prefix = %settings.rest_prefix,
        forwarded_header = %settings.forwarded_auth_header,
        "SocialHub server listening (OpenAPI at /api-doc/openapi.json)"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}
