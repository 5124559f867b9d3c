// WebSocket transport: one socket per client, one outbox per socket.

use crate::coordinator::Hub;
use crate::error::ServerError;
use crate::gateway::short;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use roulette_protocol::{ClientToServer, ServerToClient};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{info, warn};

pub fn router(hub: Hub) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .with_state(hub)
}

/// Binds `addr` and serves until the process exits.
pub async fn serve(addr: &str, hub: Hub) -> Result<(), ServerError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })?;
    info!("server listening on ws://{addr}/ws");
    axum::serve(listener, router(hub)).await?;
    Ok(())
}

async fn ws_handler(ws: WebSocketUpgrade, State(hub): State<Hub>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, hub))
}

async fn handle_socket(socket: WebSocket, hub: Hub) {
    let (mut sender, mut receiver) = socket.split();

    let (tx_out, mut rx_out) = mpsc::unbounded_channel::<ServerToClient>();

    tokio::spawn(async move {
        while let Some(msg) = rx_out.recv().await {
            let text = match serde_json::to_string(&msg) {
                Ok(text) => text,
                Err(e) => {
                    warn!(event = msg.name(), "failed to encode event: {e}");
                    continue;
                }
            };
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    let my_id = hub.connect(tx_out);

    while let Some(Ok(msg)) = receiver.next().await {
        match msg {
            Message::Text(t) => match serde_json::from_str::<ClientToServer>(&t) {
                Ok(cmd) => hub.dispatch(my_id, cmd),
                Err(e) => warn!(conn = %short(my_id), "dropping malformed frame: {e}"),
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    hub.disconnect(my_id);
}
