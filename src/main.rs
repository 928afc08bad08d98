//! Oxiva WhatsApp Order Intake - webhook service

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use oxiva_whatsapp::config::Config;
use oxiva_whatsapp::http::{router, AppState, WEBHOOK_PATH};
use oxiva_whatsapp::notify::{AdminNotifier, LogNotifier, NatsNotifier};
use oxiva_whatsapp::store::{
    InMemoryOrderRepository, InMemorySessionStore, OrderRepository, PgOrderRepository, PgSessionStore, SessionStore,
};
use oxiva_whatsapp::ConversationEngine;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();
    let config = Config::from_env()?;

    let (sessions, orders) = match &config.database_url {
        Some(url) => {
            let db = PgPoolOptions::new().max_connections(config.database_max_connections).connect(url).await?;
            let lock_db = PgPoolOptions::new().max_connections(config.database_max_connections).connect(url).await?;
            sqlx::migrate!("./migrations").run(&db).await?;
            tracing::info!("Sessions and orders stored in PostgreSQL");
            (Arc::new(PgSessionStore::new(db.clone(), lock_db)) as Arc<dyn SessionStore>, Arc::new(PgOrderRepository::new(db)) as Arc<dyn OrderRepository>)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; sessions and orders are kept in memory and lost on restart");
            (Arc::new(InMemorySessionStore::new()) as Arc<dyn SessionStore>, Arc::new(InMemoryOrderRepository::new()) as Arc<dyn OrderRepository>)
        }
    };

    let notifier: Arc<dyn AdminNotifier> = match &config.nats_url {
        Some(url) => match async_nats::connect(url.as_str()).await {
            Ok(client) => {
                tracing::info!(subject = %config.nats_subject, "Publishing order events to NATS");
                Arc::new(NatsNotifier::new(client, config.nats_subject.clone()))
            }
            Err(e) => {
                tracing::warn!(error = %e, "NATS unavailable; order notifications go to the log");
                Arc::new(LogNotifier)
            }
        },
        None => Arc::new(LogNotifier),
    };

    let engine = ConversationEngine::new(sessions, orders, notifier)
        .with_storefront(config.storefront.clone())
        .with_settings(config.engine_settings()?);
    let app = router(AppState { engine: Arc::new(engine) });

    tracing::info!("🚀 Oxiva WhatsApp intake listening on 0.0.0.0:{} (webhook {})", config.port, WEBHOOK_PATH);
    axum::serve(tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?, app).await?;
    Ok(())
}
