//! RentLedger server binary.
//!
//! Wires adapters to ports and starts the HTTP/WebSocket server:
//! - PostgreSQL for bookings, the settlement ledger, notifications,
//!   channel logs, and the event outbox
//! - Redis pub/sub for cross-process event delivery via the outbox relay
//! - JWT verification for callers, HMAC verification for payment webhooks
//! - The property directory REST client for ownership lookups

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use tokio::sync::watch;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rentledger::adapters::auth::{JwtConfig, JwtIdentityProvider};
use rentledger::adapters::events::{OutboxEventBus, OutboxRelay, RedisEventPublisher};
use rentledger::adapters::http::middleware::{auth_middleware, AuthState};
use rentledger::adapters::http::{
    booking_routes, channel_routes, notification_routes, settlement_routes, webhook_routes,
    BookingAppState, NotificationAppState, SettlementAppState,
};
use rentledger::adapters::postgres::{
    PostgresBookingReader, PostgresBookingRepository, PostgresChannelStore,
    PostgresNotificationRepository, PostgresOutboxWriter, PostgresProcessedEventStore,
    PostgresSettlementReader, PostgresSettlementRepository,
};
use rentledger::adapters::property::{HttpPropertyDirectory, PropertyDirectoryConfig};
use rentledger::adapters::websocket::{
    websocket_router, RoomManager, WebSocketEventBridge, WebSocketState,
};
use rentledger::application::handlers::notification::{NotificationFanout, FANOUT_EVENT_TYPES};
use rentledger::config::AppConfig;
use rentledger::domain::settlement::{FeePolicy, PaymentWebhookVerifier};
use rentledger::ports::{
    BookingReader, BookingRepository, ChannelStore, EventPublisher, EventSubscriber,
    IdentityProvider, NotificationRepository, OutboxWriter, ProcessedEventStore,
    PropertyDirectory, SettlementReader, SettlementRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.server.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    config.validate()?;
    tracing::info!(
        environment = ?config.server.environment,
        "Configuration loaded"
    );

    // --- Infrastructure ---

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .idle_timeout(config.database.idle_timeout())
        .max_lifetime(config.database.max_lifetime())
        .connect(&config.database.url)
        .await?;
    tracing::info!("Connected to PostgreSQL");

    if config.database.run_migrations {
        sqlx::migrate!().run(&pool).await?;
        tracing::info!("Migrations applied");
    }

    let redis_client = redis::Client::open(config.redis.url.as_str())?;
    let redis_conn = redis_client.get_multiplexed_tokio_connection().await?;
    tracing::info!("Connected to Redis");

    // --- Adapters ---

    let booking_repository: Arc<dyn BookingRepository> =
        Arc::new(PostgresBookingRepository::new(pool.clone()));
    let booking_reader: Arc<dyn BookingReader> = Arc::new(PostgresBookingReader::new(pool.clone()));
    let settlement_repository: Arc<dyn SettlementRepository> =
        Arc::new(PostgresSettlementRepository::new(pool.clone()));
    let settlement_reader: Arc<dyn SettlementReader> =
        Arc::new(PostgresSettlementReader::new(pool.clone()));
    let notification_repository: Arc<dyn NotificationRepository> =
        Arc::new(PostgresNotificationRepository::new(pool.clone()));
    let channel_store: Arc<dyn ChannelStore> = Arc::new(PostgresChannelStore::new(pool.clone()));
    let outbox_writer: Arc<dyn OutboxWriter> = Arc::new(PostgresOutboxWriter::new(pool.clone()));
    let processed_events: Arc<dyn ProcessedEventStore> =
        Arc::new(PostgresProcessedEventStore::new(pool.clone()));

    let identity_provider: Arc<dyn IdentityProvider> =
        Arc::new(JwtIdentityProvider::new(JwtConfig::new(
            config.auth.jwt_secret.clone(),
            config.auth.jwt_issuer.clone(),
            config.auth.jwt_audience.clone(),
        )));

    let property_directory: Arc<dyn PropertyDirectory> = Arc::new(HttpPropertyDirectory::new(
        PropertyDirectoryConfig::new(
            config.property.directory_url.clone(),
            config.property.directory_token.clone(),
        )
        .with_timeout(Duration::from_secs(config.property.request_timeout_secs)),
    )?);

    let mut fee_policy = FeePolicy::fixed(config.settlement.default_fee_bps)?;
    for (category, fee_bps) in &config.settlement.category_fee_bps {
        fee_policy = fee_policy.with_category_rate(category.clone(), *fee_bps)?;
    }

    let webhook_verifier = Arc::new(PaymentWebhookVerifier::new(
        config.payment.webhook_secret.clone(),
    ));

    // --- Event pipeline ---

    let event_bus = Arc::new(OutboxEventBus::new(outbox_writer.clone()));
    let event_publisher: Arc<dyn EventPublisher> = event_bus.clone();

    let fanout = Arc::new(NotificationFanout::new(
        notification_repository.clone(),
        channel_store.clone(),
        booking_reader.clone(),
        processed_events.clone(),
    ));
    event_bus.subscribe_all(FANOUT_EVENT_TYPES, fanout);

    let room_manager = Arc::new(RoomManager::with_default_capacity());
    WebSocketEventBridge::new_shared(room_manager.clone()).register(&*event_bus);

    let redis_publisher: Arc<dyn EventPublisher> = Arc::new(RedisEventPublisher::new(redis_conn));
    let outbox_relay = OutboxRelay::new(outbox_writer.clone(), redis_publisher);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let relay_task = tokio::spawn(async move {
        if let Err(e) = outbox_relay.run(shutdown_rx).await {
            tracing::error!(error = %e, "Outbox relay stopped with error");
        }
    });

    // --- HTTP surface ---

    let booking_state = BookingAppState {
        booking_repository: booking_repository.clone(),
        booking_reader: booking_reader.clone(),
        property_directory: property_directory.clone(),
        event_publisher: event_publisher.clone(),
    };

    let settlement_state = SettlementAppState {
        settlement_repository,
        settlement_reader,
        booking_repository,
        property_directory: property_directory.clone(),
        event_publisher: event_publisher.clone(),
        fee_policy,
        webhook_verifier,
    };

    let notification_state = NotificationAppState {
        notification_repository,
        channel_store: channel_store.clone(),
        property_directory: property_directory.clone(),
        event_publisher,
    };

    let ws_state = WebSocketState::new(
        room_manager,
        identity_provider.clone(),
        channel_store,
        property_directory,
    );

    let cors = match config.server.cors_origins_list().as_slice() {
        [] => CorsLayer::permissive(),
        origins => {
            let mut parsed: Vec<axum::http::HeaderValue> = Vec::new();
            for origin in origins {
                parsed.push(origin.parse()?);
            }
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(parsed))
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any)
        }
    };

    let app = Router::new()
        .nest("/api/bookings", booking_routes().with_state(booking_state))
        .nest(
            "/api/settlements",
            settlement_routes().with_state(settlement_state.clone()),
        )
        .nest(
            "/api/webhooks",
            webhook_routes().with_state(settlement_state),
        )
        .nest(
            "/api/notifications",
            notification_routes().with_state(notification_state.clone()),
        )
        .nest(
            "/api/channels",
            channel_routes().with_state(notification_state),
        )
        .nest("/api", websocket_router().with_state(ws_state))
        .route("/health", get(|| async { "OK" }))
        .layer(middleware::from_fn_with_state(
            identity_provider as AuthState,
            auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors);

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "RentLedger listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down");
    let _ = shutdown_tx.send(true);
    let _ = relay_task.await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
