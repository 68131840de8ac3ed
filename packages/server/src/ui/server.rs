//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::usecase::{
    GetSessionDetailUseCase, GetSessionsUseCase, JoinSessionUseCase, LeaveSessionUseCase,
    RaiseHandUseCase, RelaySignalUseCase, SendChatUseCase, UpdateStatusUseCase,
};

use super::{
    handler::{get_session_detail, get_sessions, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Study group session coordinator server
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     join_session_usecase,
///     leave_session_usecase,
///     update_status_usecase,
///     send_chat_usecase,
///     relay_signal_usecase,
///     raise_hand_usecase,
///     get_sessions_usecase,
///     get_session_detail_usecase,
/// );
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    /// JoinSessionUseCase（セッション参加のユースケース）
    join_session_usecase: Arc<JoinSessionUseCase>,
    /// LeaveSessionUseCase（セッション退出のユースケース）
    leave_session_usecase: Arc<LeaveSessionUseCase>,
    /// UpdateStatusUseCase（ステータス更新のユースケース）
    update_status_usecase: Arc<UpdateStatusUseCase>,
    /// SendChatUseCase（チャット送信のユースケース）
    send_chat_usecase: Arc<SendChatUseCase>,
    /// RelaySignalUseCase（シグナリング中継のユースケース）
    relay_signal_usecase: Arc<RelaySignalUseCase>,
    /// RaiseHandUseCase（挙手通知のユースケース）
    raise_hand_usecase: Arc<RaiseHandUseCase>,
    /// GetSessionsUseCase（セッション一覧取得のユースケース）
    get_sessions_usecase: Arc<GetSessionsUseCase>,
    /// GetSessionDetailUseCase（セッション詳細取得のユースケース）
    get_session_detail_usecase: Arc<GetSessionDetailUseCase>,
}

impl Server {
    /// Create a new Server instance
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        join_session_usecase: Arc<JoinSessionUseCase>,
        leave_session_usecase: Arc<LeaveSessionUseCase>,
        update_status_usecase: Arc<UpdateStatusUseCase>,
        send_chat_usecase: Arc<SendChatUseCase>,
        relay_signal_usecase: Arc<RelaySignalUseCase>,
        raise_hand_usecase: Arc<RaiseHandUseCase>,
        get_sessions_usecase: Arc<GetSessionsUseCase>,
        get_session_detail_usecase: Arc<GetSessionDetailUseCase>,
    ) -> Self {
        Self {
            join_session_usecase,
            leave_session_usecase,
            update_status_usecase,
            send_chat_usecase,
            relay_signal_usecase,
            raise_hand_usecase,
            get_sessions_usecase,
            get_session_detail_usecase,
        }
    }

    /// Build the router with all WebSocket and HTTP endpoints
    ///
    /// Exposed separately from [`Server::run`] so that tests can serve the
    /// router on an ephemeral port.
    pub fn into_router(self) -> Router {
        let app_state = Arc::new(AppState {
            join_session_usecase: self.join_session_usecase,
            leave_session_usecase: self.leave_session_usecase,
            update_status_usecase: self.update_status_usecase,
            send_chat_usecase: self.send_chat_usecase,
            relay_signal_usecase: self.relay_signal_usecase,
            raise_hand_usecase: self.raise_hand_usecase,
            get_sessions_usecase: self.get_sessions_usecase,
            get_session_detail_usecase: self.get_session_detail_usecase,
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws/groups/{group_id}", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/sessions", get(get_sessions))
            .route("/api/sessions/{group_id}", get(get_session_detail))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the session coordinator server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.into_router();

        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        // Start the server
        tracing::info!(
            "Session coordinator listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws/groups/{{group_id}}", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
