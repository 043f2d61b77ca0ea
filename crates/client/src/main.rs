//! Moonhowl runner - composition root binary.
//!
//! Wires a websocket channel, the narration queue, and one session
//! (moderator or player) together and services the connection until it
//! closes for good.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use moonhowl_client::messaging::{EventChannel, SocketChannel};
use moonhowl_client::{
    ClientConfig, GameStateStore, ModeratorSession, NarrationQueue, PlayerSession, SessionMode,
    VisualAlertSynthesizer,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moonhowl=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ClientConfig::from_env()?;
    tracing::info!(
        room = %config.room_code,
        mode = ?config.mode,
        "Starting Moonhowl client"
    );

    let channel = Arc::new(SocketChannel::new(config.ws_url.as_str()));
    let store = GameStateStore::new(config.player_id.clone());
    store.set_role(config.role);
    let narration = NarrationQueue::new(Arc::new(VisualAlertSynthesizer));

    // Service the socket in the background; sessions subscribe on the bus
    // and their subscriptions survive reconnects.
    let driver = {
        let channel = Arc::clone(&channel);
        tokio::spawn(async move { channel.connect().await })
    };

    // The room handshake needs a live socket to go out on.
    let connection = channel.connection();
    while !connection.is_connected() {
        if driver.is_finished() {
            anyhow::bail!("Connection closed before the room handshake");
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    let channel: Arc<dyn EventChannel> = channel;
    match config.mode {
        SessionMode::Moderator => {
            let mut session = ModeratorSession::new(
                store,
                narration,
                channel,
                config.room_code.clone(),
            );
            session.connect()?;
            driver.await??;
        }
        SessionMode::Player => {
            let _session = PlayerSession::new(
                store,
                narration,
                channel,
                config.room_code.clone(),
                config.policy,
            );
            driver.await??;
        }
    }

    tracing::info!("Moonhowl client shut down");
    Ok(())
}
