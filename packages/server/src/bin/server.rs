//! Study group session coordinator server.
//!
//! Accepts WebSocket connections from study group members, tracks presence,
//! and relays chat and WebRTC signaling within each group's session room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin juku-server -- --groups groups.json
//! cargo run --bin juku-server -- --host 0.0.0.0 --port 3000 --groups groups.json
//! ```

use std::{path::PathBuf, sync::Arc};

use clap::Parser;

use juku_server::{
    infrastructure::{group_store::InMemoryGroupStore, registry::InMemoryRoomRegistry},
    ui::Server,
    usecase::{
        GetSessionDetailUseCase, GetSessionsUseCase, JoinSessionUseCase, LeaveSessionUseCase,
        RaiseHandUseCase, RelaySignalUseCase, SendChatUseCase, UpdateStatusUseCase,
    },
};
use juku_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "juku-server")]
#[command(about = "Realtime session coordinator for study groups", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Path to the study group seed file (JSON array of groups)
    #[arg(long)]
    groups: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. GroupStore
    // 2. RoomRegistry
    // 3. UseCases
    // 4. Server

    // 1. Create GroupStore (seeded from file when given)
    let group_store = match &args.groups {
        Some(path) => match InMemoryGroupStore::from_seed_file(path) {
            Ok(store) => {
                tracing::info!(
                    "Loaded {} study groups from {}",
                    store.len(),
                    path.display()
                );
                Arc::new(store)
            }
            Err(e) => {
                tracing::error!("Failed to load group seed file {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            tracing::warn!("No --groups seed file given; every join will be rejected");
            Arc::new(InMemoryGroupStore::new())
        }
    };

    // 2. Create RoomRegistry (in-memory session rooms)
    let registry = Arc::new(InMemoryRoomRegistry::new());

    // 3. Create UseCases
    let join_session_usecase = Arc::new(JoinSessionUseCase::new(
        group_store.clone(),
        registry.clone(),
    ));
    let leave_session_usecase = Arc::new(LeaveSessionUseCase::new(registry.clone()));
    let update_status_usecase = Arc::new(UpdateStatusUseCase::new(registry.clone()));
    let send_chat_usecase = Arc::new(SendChatUseCase::new(registry.clone()));
    let relay_signal_usecase = Arc::new(RelaySignalUseCase::new(registry.clone()));
    let raise_hand_usecase = Arc::new(RaiseHandUseCase::new(registry.clone()));
    let get_sessions_usecase = Arc::new(GetSessionsUseCase::new(registry.clone()));
    let get_session_detail_usecase = Arc::new(GetSessionDetailUseCase::new(registry.clone()));

    // 4. Create and run the server
    let server = Server::new(
        join_session_usecase,
        leave_session_usecase,
        update_status_usecase,
        send_chat_usecase,
        relay_signal_usecase,
        raise_hand_usecase,
        get_sessions_usecase,
        get_session_detail_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
