//! Integration tests for the session coordinator using an in-process server.
//!
//! Each test serves the full router on an ephemeral port and drives it with
//! real WebSocket and HTTP clients, so the wire contract (frame shapes,
//! ordering, error messages) is verified end to end.

use std::{sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

use juku_server::{
    domain::{GroupId, GroupRecord, UserId},
    infrastructure::{group_store::InMemoryGroupStore, registry::InMemoryRoomRegistry},
    ui::Server,
    usecase::{
        GetSessionDetailUseCase, GetSessionsUseCase, JoinSessionUseCase, LeaveSessionUseCase,
        RaiseHandUseCase, RelaySignalUseCase, SendChatUseCase, UpdateStatusUseCase,
    },
};

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

fn seed_group(id: &str, title: &str, subject: &str, members: &[&str]) -> GroupRecord {
    GroupRecord::new(
        GroupId::new(id.to_string()).unwrap(),
        title.to_string(),
        subject.to_string(),
        members
            .iter()
            .map(|m| UserId::new(m.to_string()).unwrap())
            .collect(),
    )
}

/// Serves the full router on an ephemeral port and returns its address.
///
/// Seeded groups: `g1` ("Algebra Study", members u1/u2/u3) and
/// `g2` ("World History", member u1).
async fn spawn_server() -> String {
    let group_store = Arc::new(InMemoryGroupStore::with_groups(vec![
        seed_group("g1", "Algebra Study", "math", &["u1", "u2", "u3"]),
        seed_group("g2", "World History", "history", &["u1"]),
    ]));
    let registry = Arc::new(InMemoryRoomRegistry::new());

    let server = Server::new(
        Arc::new(JoinSessionUseCase::new(
            group_store.clone(),
            registry.clone(),
        )),
        Arc::new(LeaveSessionUseCase::new(registry.clone())),
        Arc::new(UpdateStatusUseCase::new(registry.clone())),
        Arc::new(SendChatUseCase::new(registry.clone())),
        Arc::new(RelaySignalUseCase::new(registry.clone())),
        Arc::new(RaiseHandUseCase::new(registry.clone())),
        Arc::new(GetSessionsUseCase::new(registry.clone())),
        Arc::new(GetSessionDetailUseCase::new(registry.clone())),
    );
    let router = server.into_router();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server exited");
    });

    format!("127.0.0.1:{}", addr.port())
}

/// Opens a WebSocket connection to the given group's endpoint.
async fn connect(addr: &str, group_id: &str) -> WsStream {
    let url = format!("ws://{addr}/ws/groups/{group_id}");
    let (ws, _) = connect_async(url).await.expect("Failed to connect");
    ws
}

async fn send_json(ws: &mut WsStream, value: &serde_json::Value) {
    ws.send(Message::Text(value.to_string().into()))
        .await
        .expect("Failed to send frame");
}

/// Receives the next text frame as JSON, waiting at most 2 seconds.
async fn recv_json(ws: &mut WsStream) -> serde_json::Value {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("Timed out waiting for a frame")
            .expect("Connection closed unexpectedly")
            .expect("WebSocket error");
        match msg {
            Message::Text(text) => return serde_json::from_str(&text).expect("Frame is not JSON"),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("Unexpected frame: {other:?}"),
        }
    }
}

/// Asserts that the server closes the connection without sending anything else.
async fn recv_close(ws: &mut WsStream) {
    loop {
        match tokio::time::timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("Timed out waiting for close")
        {
            None => return,
            Some(Ok(Message::Close(_))) => return,
            Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
            Some(Ok(other)) => panic!("Expected close, got: {other:?}"),
            Some(Err(_)) => return,
        }
    }
}

/// Asserts that no frame arrives within the given window.
async fn assert_no_frame(ws: &mut WsStream, wait: Duration) {
    match tokio::time::timeout(wait, ws.next()).await {
        Err(_) => {}
        Ok(Some(Ok(msg))) => panic!("Expected no frame, got: {msg:?}"),
        Ok(other) => panic!("Expected no frame, got: {other:?}"),
    }
}

/// Connects and completes the join flow, consuming the
/// `connection_established` and `participants_update` frames.
///
/// Returns the stream and the participant ID issued for this connection.
async fn join(addr: &str, group_id: &str, user_id: &str, user_name: &str) -> (WsStream, String) {
    let mut ws = connect(addr, group_id).await;
    send_json(
        &mut ws,
        &serde_json::json!({"user_id": user_id, "user_name": user_name}),
    )
    .await;

    let established = recv_json(&mut ws).await;
    assert_eq!(established["type"], "connection_established");
    let participant_id = established["participant_id"]
        .as_str()
        .expect("participant_id missing")
        .to_string();

    let update = recv_json(&mut ws).await;
    assert_eq!(update["type"], "participants_update");

    (ws, participant_id)
}

/// Polls the session list until the last room has been torn down.
async fn wait_until_no_sessions(addr: &str) {
    let url = format!("http://{addr}/api/sessions");
    for _ in 0..40 {
        let sessions: serde_json::Value = reqwest::get(&url)
            .await
            .expect("Failed to fetch sessions")
            .json()
            .await
            .expect("Sessions response is not JSON");
        if sessions.as_array().expect("Expected an array").is_empty() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("Session room was not torn down in time");
}

#[tokio::test]
async fn test_join_sends_frames_in_order() {
    // テスト項目: 参加直後のフレームが正しい順序と内容で届く
    // given (前提条件):
    let addr = spawn_server().await;
    let mut ws = connect(&addr, "g1").await;

    // when (操作):
    send_json(
        &mut ws,
        &serde_json::json!({"user_id": "u1", "user_name": "Alice"}),
    )
    .await;

    // then (期待する結果): connection_established が最初に届く
    let established = recv_json(&mut ws).await;
    assert_eq!(established["type"], "connection_established");
    assert!(!established["participant_id"].as_str().unwrap().is_empty());
    assert_eq!(established["room_info"]["group_id"], "g1");
    assert_eq!(established["room_info"]["title"], "Algebra Study");
    assert_eq!(established["room_info"]["subject"], "math");

    // 続いて participants_update（参加直後のデフォルト状態）
    let update = recv_json(&mut ws).await;
    assert_eq!(update["type"], "participants_update");
    let participants = update["participants"].as_array().unwrap();
    assert_eq!(participants.len(), 1);
    assert_eq!(participants[0]["name"], "Alice");
    assert_eq!(participants[0]["user_id"], "u1");
    assert_eq!(participants[0]["muted"], true);
    assert_eq!(participants[0]["camera_off"], true);
    assert_eq!(participants[0]["is_screen_sharing"], false);

    // 履歴のない部屋では chat_history は届かない
    assert_no_frame(&mut ws, Duration::from_millis(300)).await;
}

#[tokio::test]
async fn test_presence_updates_reach_existing_participants() {
    // テスト項目: 後から参加した人の情報が既存の参加者に配信される
    // given (前提条件):
    let addr = spawn_server().await;
    let (mut ws_alice, _) = join(&addr, "g1", "u1", "Alice").await;

    // when (操作): bob が同じグループに参加
    let (_ws_bob, _) = join(&addr, "g1", "u2", "Bob").await;

    // then (期待する結果): alice に 2 人分の participants_update が届く
    let update = recv_json(&mut ws_alice).await;
    assert_eq!(update["type"], "participants_update");
    let names: Vec<&str> = update["participants"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"Alice"));
    assert!(names.contains(&"Bob"));
}

#[tokio::test]
async fn test_status_update_is_broadcast_to_all() {
    // テスト項目: ステータス変更が全参加者（本人を含む）に配信される
    // given (前提条件):
    let addr = spawn_server().await;
    let (mut ws_alice, alice_id) = join(&addr, "g1", "u1", "Alice").await;
    let (mut ws_bob, _) = join(&addr, "g1", "u2", "Bob").await;
    let pending = recv_json(&mut ws_alice).await; // bob の参加による配信
    assert_eq!(pending["type"], "participants_update");

    // when (操作): alice がミュートを解除
    send_json(
        &mut ws_alice,
        &serde_json::json!({"type": "status_update", "muted": false}),
    )
    .await;

    // then (期待する結果): 両者に同じ内容の participants_update が届く
    let to_alice = recv_json(&mut ws_alice).await;
    let to_bob = recv_json(&mut ws_bob).await;
    assert_eq!(to_alice, to_bob);
    assert_eq!(to_alice["type"], "participants_update");

    let alice_entry = to_alice["participants"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"] == alice_id.as_str())
        .expect("Alice missing from update");
    assert_eq!(alice_entry["muted"], false);
    assert_eq!(alice_entry["camera_off"], true); // 指定しなかったフィールドは維持
}

#[tokio::test]
async fn test_chat_is_echoed_to_sender_and_replayed_to_late_joiner() {
    // テスト項目: チャットが送信者を含む全員に配信され、後続の参加者には履歴として届く
    // given (前提条件):
    let addr = spawn_server().await;
    let (mut ws_alice, _) = join(&addr, "g1", "u1", "Alice").await;
    let (mut ws_bob, _) = join(&addr, "g1", "u2", "Bob").await;
    let _ = recv_json(&mut ws_alice).await; // bob の参加による配信

    // when (操作):
    send_json(
        &mut ws_alice,
        &serde_json::json!({"type": "chat_message", "message": "Hello from Alice"}),
    )
    .await;

    // then (期待する結果): 送信者にも同じ chat_message が届く
    let to_alice = recv_json(&mut ws_alice).await;
    let to_bob = recv_json(&mut ws_bob).await;
    assert_eq!(to_alice, to_bob);
    assert_eq!(to_alice["type"], "chat_message");
    assert_eq!(to_alice["message"]["message"], "Hello from Alice");
    assert_eq!(to_alice["message"]["sender_name"], "Alice");
    assert_eq!(to_alice["message"]["sender_id"], "u1");

    // 後から参加した carol には履歴として届く
    let (mut ws_carol, _) = join(&addr, "g1", "u3", "Carol").await;
    let history = recv_json(&mut ws_carol).await;
    assert_eq!(history["type"], "chat_history");
    let messages = history["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["message"], "Hello from Alice");
}

#[tokio::test]
async fn test_blank_chat_is_dropped() {
    // テスト項目: 空白のみのチャットは配信されない
    // given (前提条件):
    let addr = spawn_server().await;
    let (mut ws, _) = join(&addr, "g1", "u1", "Alice").await;

    // when (操作): 空白のみのチャットに続けて挙手を送る
    send_json(
        &mut ws,
        &serde_json::json!({"type": "chat_message", "message": "   "}),
    )
    .await;
    send_json(
        &mut ws,
        &serde_json::json!({"type": "hand_raise", "hand_raised": true}),
    )
    .await;

    // then (期待する結果): 次に届くのは挙手通知（チャットは挟まらない）
    let frame = recv_json(&mut ws).await;
    assert_eq!(frame["type"], "hand_raise_update");
    assert_eq!(frame["hand_raised"], true);
    assert_eq!(frame["participant_name"], "Alice");
}

#[tokio::test]
async fn test_webrtc_offer_reaches_only_its_target() {
    // テスト項目: WebRTC フレームが宛先の参加者にのみ届く
    // given (前提条件):
    let addr = spawn_server().await;
    let (mut ws_alice, alice_id) = join(&addr, "g1", "u1", "Alice").await;
    let (mut ws_bob, bob_id) = join(&addr, "g1", "u2", "Bob").await;
    let _ = recv_json(&mut ws_alice).await; // bob の参加による配信

    // when (操作): alice から bob へ offer を送る
    send_json(
        &mut ws_alice,
        &serde_json::json!({
            "type": "webrtc_offer",
            "target_participant_id": bob_id,
            "data": {"sdp": "v=0 test-offer"}
        }),
    )
    .await;

    // then (期待する結果): bob にのみ、送信元が刻印されて届く
    let frame = recv_json(&mut ws_bob).await;
    assert_eq!(frame["type"], "webrtc_offer");
    assert_eq!(frame["from_participant_id"], alice_id.as_str());
    assert_eq!(frame["data"]["sdp"], "v=0 test-offer");

    assert_no_frame(&mut ws_alice, Duration::from_millis(300)).await;
}

#[tokio::test]
async fn test_signal_to_missing_target_is_dropped_silently() {
    // テスト項目: 実在しない宛先へのシグナリングは黙って破棄される
    // given (前提条件):
    let addr = spawn_server().await;
    let (mut ws, _) = join(&addr, "g1", "u1", "Alice").await;

    // when (操作): でたらめな宛先に answer を送り、続けて挙手を送る
    send_json(
        &mut ws,
        &serde_json::json!({
            "type": "webrtc_answer",
            "target_participant_id": "123e4567-e89b-12d3-a456-426614174000",
            "data": {"sdp": "v=0"}
        }),
    )
    .await;
    send_json(
        &mut ws,
        &serde_json::json!({"type": "hand_raise", "hand_raised": false}),
    )
    .await;

    // then (期待する結果): エラーは返らず、次のフレームは挙手通知
    let frame = recv_json(&mut ws).await;
    assert_eq!(frame["type"], "hand_raise_update");
}

#[tokio::test]
async fn test_unknown_group_is_rejected_with_error_frame() {
    // テスト項目: 存在しないグループへの参加はエラーフレーム付きで拒否される
    // given (前提条件):
    let addr = spawn_server().await;
    let mut ws = connect(&addr, "nope").await;

    // when (操作):
    send_json(
        &mut ws,
        &serde_json::json!({"user_id": "u1", "user_name": "Alice"}),
    )
    .await;

    // then (期待する結果):
    let frame = recv_json(&mut ws).await;
    assert_eq!(frame["type"], "error");
    assert_eq!(frame["message"], "Study group not found");
    recv_close(&mut ws).await;
}

#[tokio::test]
async fn test_non_member_is_rejected_with_error_frame() {
    // テスト項目: メンバー外のユーザーはエラーフレーム付きで拒否される
    // given (前提条件):
    let addr = spawn_server().await;
    let mut ws = connect(&addr, "g1").await;

    // when (操作):
    send_json(
        &mut ws,
        &serde_json::json!({"user_id": "outsider", "user_name": "Eve"}),
    )
    .await;

    // then (期待する結果):
    let frame = recv_json(&mut ws).await;
    assert_eq!(frame["type"], "error");
    assert_eq!(frame["message"], "You are not a member of this study group");
    recv_close(&mut ws).await;
}

#[tokio::test]
async fn test_blank_handshake_closes_without_error_frame() {
    // テスト項目: 身元が空のハンドシェイクはフレームなしで切断される
    // given (前提条件):
    let addr = spawn_server().await;
    let mut ws = connect(&addr, "g1").await;

    // when (操作):
    send_json(
        &mut ws,
        &serde_json::json!({"user_id": "", "user_name": "Alice"}),
    )
    .await;

    // then (期待する結果): エラーフレームを待たずに閉じられる
    recv_close(&mut ws).await;
}

#[tokio::test]
async fn test_disconnect_broadcasts_presence_to_remaining() {
    // テスト項目: 切断した参加者が残りの参加者の一覧から消える
    // given (前提条件):
    let addr = spawn_server().await;
    let (mut ws_alice, _) = join(&addr, "g1", "u1", "Alice").await;
    let (mut ws_bob, _) = join(&addr, "g1", "u2", "Bob").await;
    let _ = recv_json(&mut ws_alice).await; // bob の参加による配信

    // when (操作): bob が接続を閉じる
    ws_bob.close(None).await.expect("Failed to close");
    drop(ws_bob);

    // then (期待する結果): alice に 1 人だけの participants_update が届く
    let update = recv_json(&mut ws_alice).await;
    assert_eq!(update["type"], "participants_update");
    let participants = update["participants"].as_array().unwrap();
    assert_eq!(participants.len(), 1);
    assert_eq!(participants[0]["name"], "Alice");
}

#[tokio::test]
async fn test_room_teardown_discards_chat_history() {
    // テスト項目: 全員退出で部屋が解体され、再参加時に履歴が残っていない
    // given (前提条件): alice がチャットを残して退出する
    let addr = spawn_server().await;
    let (mut ws, _) = join(&addr, "g1", "u1", "Alice").await;
    send_json(
        &mut ws,
        &serde_json::json!({"type": "chat_message", "message": "Before teardown"}),
    )
    .await;
    let echo = recv_json(&mut ws).await;
    assert_eq!(echo["type"], "chat_message");
    ws.close(None).await.expect("Failed to close");
    drop(ws);
    wait_until_no_sessions(&addr).await;

    // when (操作): 同じグループに再参加
    let (mut ws, _) = join(&addr, "g1", "u1", "Alice").await;
    send_json(
        &mut ws,
        &serde_json::json!({"type": "hand_raise", "hand_raised": true}),
    )
    .await;

    // then (期待する結果): chat_history は届かず、次のフレームは挙手通知
    let frame = recv_json(&mut ws).await;
    assert_eq!(frame["type"], "hand_raise_update");
}

#[tokio::test]
async fn test_http_endpoints_report_live_sessions() {
    // テスト項目: HTTP API がヘルスチェックとセッション状態を返す
    // given (前提条件):
    let addr = spawn_server().await;

    // when (操作): ヘルスチェック
    let health: serde_json::Value = reqwest::get(format!("http://{addr}/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(health["status"], "ok");

    // given (前提条件): g1 に 2 人参加している
    let (_ws_alice, _) = join(&addr, "g1", "u1", "Alice").await;
    let (_ws_bob, _) = join(&addr, "g1", "u2", "Bob").await;

    // when (操作): セッション一覧を取得
    let sessions: serde_json::Value = reqwest::get(format!("http://{addr}/api/sessions"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果): 稼働中の部屋だけが一覧に載る
    let list = sessions.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["group_id"], "g1");
    assert_eq!(list[0]["title"], "Algebra Study");
    assert_eq!(list[0]["participant_count"], 2);
    assert_eq!(list[0]["chat_message_count"], 0);

    // when (操作): セッション詳細を取得
    let detail: serde_json::Value = reqwest::get(format!("http://{addr}/api/sessions/g1"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(detail["group_id"], "g1");
    let participants = detail["participants"].as_array().unwrap();
    assert_eq!(participants.len(), 2);
    assert_eq!(participants[0]["muted"], true);

    // when (操作): 稼働していないセッションの詳細を要求
    let missing = reqwest::get(format!("http://{addr}/api/sessions/missing"))
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(missing.status().as_u16(), 404);
}

#[tokio::test]
async fn test_unknown_frame_type_is_ignored() {
    // テスト項目: 未知の type のフレームは接続を切らずに無視される
    // given (前提条件):
    let addr = spawn_server().await;
    let (mut ws, _) = join(&addr, "g1", "u1", "Alice").await;

    // when (操作):
    send_json(&mut ws, &serde_json::json!({"type": "totally_new_feature"})).await;
    send_json(
        &mut ws,
        &serde_json::json!({"type": "hand_raise", "hand_raised": true}),
    )
    .await;

    // then (期待する結果): 接続は生きていて挙手通知が届く
    let frame = recv_json(&mut ws).await;
    assert_eq!(frame["type"], "hand_raise_update");
}

#[tokio::test]
async fn test_malformed_json_is_ignored() {
    // テスト項目: JSON として壊れたフレームは接続を切らずに無視される
    // given (前提条件):
    let addr = spawn_server().await;
    let (mut ws, _) = join(&addr, "g1", "u1", "Alice").await;

    // when (操作):
    ws.send(Message::Text("this is not json".into()))
        .await
        .expect("Failed to send frame");
    send_json(
        &mut ws,
        &serde_json::json!({"type": "hand_raise", "hand_raised": true}),
    )
    .await;

    // then (期待する結果): 接続は生きていて挙手通知が届く
    let frame = recv_json(&mut ws).await;
    assert_eq!(frame["type"], "hand_raise_update");
}
