//! Suscripciones en vivo por WebSocket
//!
//! Al conectar se envía el snapshot de la colección; cada cambio visible
//! para el usuario envía uno nuevo. El mensaje `refresh` vuelve a suscribir.
//! Cerrar el socket suelta el receptor.

use async_trait::async_trait;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::Response,
    routing::get,
    Extension, Router,
};

use crate::middleware::auth::AuthenticatedUser;
use crate::services::change_hub::Collection;
use crate::services::live_service::{self, ClientCommand, LiveSocket};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_live_router() -> Router<AppState> {
    Router::new().route("/:collection", get(subscribe))
}

async fn subscribe(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(segment): Path<String>,
) -> Result<Response, AppError> {
    let collection = Collection::from_path(&segment)
        .ok_or_else(|| AppError::NotFound(format!("Unknown collection '{}'", segment)))?;
    live_service::ensure_can_subscribe(&user, collection)?;

    let receiver = state.changes.subscribe();
    Ok(ws.on_upgrade(move |socket| {
        live_service::run_subscription(socket, state, collection, user, receiver)
    }))
}

#[async_trait]
impl LiveSocket for WebSocket {
    async fn send_text(&mut self, text: String) -> bool {
        self.send(Message::Text(text)).await.is_ok()
    }

    async fn next_command(&mut self) -> Option<ClientCommand> {
        match self.recv().await {
            Some(Ok(Message::Text(text))) if text.trim() == "refresh" => Some(ClientCommand::Refresh),
            Some(Ok(Message::Close(_))) | Some(Err(_)) | None => None,
            Some(Ok(_)) => Some(ClientCommand::Ignored),
        }
    }

    async fn close(&mut self) {
        let _ = self.send(Message::Close(None)).await;
    }
}
