//! Integration tests driving the relay over real WebSocket connections.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

use watchroom_server::infrastructure::registry::InMemoryRelayRegistry;
use watchroom_server::ui::Server;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Boot the relay on the given port and wait until it accepts connections
async fn start_server(port: u16) {
    let registry = Arc::new(InMemoryRelayRegistry::new());
    let server = Server::new(registry, PathBuf::from("does-not-exist"));
    tokio::spawn(async move {
        if let Err(e) = server.run("127.0.0.1".to_string(), port).await {
            panic!("server failed to run: {e}");
        }
    });

    for _ in 0..100 {
        if TcpStream::connect(("127.0.0.1", port)).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("server did not start on port {port}");
}

struct TestClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    client_id: String,
}

impl TestClient {
    /// Connect and consume the one-time `connected` acknowledgment
    async fn connect(port: u16) -> Self {
        let (mut ws, _) = connect_async(format!("ws://127.0.0.1:{port}/ws"))
            .await
            .expect("failed to connect");

        let connected = Self::next_json(&mut ws).await;
        assert_eq!(connected["type"], "connected");
        let client_id = connected["clientId"].as_str().unwrap().to_string();

        Self { ws, client_id }
    }

    async fn send(&mut self, text: &str) {
        self.ws
            .send(Message::Text(text.into()))
            .await
            .expect("failed to send");
    }

    /// Receive the next JSON text frame, skipping everything else
    async fn recv(&mut self) -> serde_json::Value {
        Self::next_json(&mut self.ws).await
    }

    async fn next_json(
        ws: &mut WebSocketStream<MaybeTlsStream<TcpStream>>,
    ) -> serde_json::Value {
        loop {
            let msg = tokio::time::timeout(RECV_TIMEOUT, ws.next())
                .await
                .expect("timed out waiting for a frame")
                .expect("connection closed")
                .expect("websocket error");
            if let Message::Text(text) = msg {
                return serde_json::from_str(text.as_str()).expect("frame is not JSON");
            }
        }
    }

    async fn close(mut self) {
        let _ = self.ws.close(None).await;
    }
}

fn participant_set(value: &serde_json::Value) -> Vec<String> {
    let mut list: Vec<String> = value["list"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    list.sort();
    list
}

#[tokio::test]
async fn test_health_and_empty_rooms() {
    // テスト項目: 起動直後の HTTP API が正常に応答する
    // given (前提条件):
    let port = 18480;
    start_server(port).await;

    // when (操作):
    let health: serde_json::Value = reqwest::get(format!("http://127.0.0.1:{port}/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let rooms: serde_json::Value = reqwest::get(format!("http://127.0.0.1:{port}/api/rooms"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(health["status"], "ok");
    assert_eq!(rooms, serde_json::json!([]));
}

#[tokio::test]
async fn test_watch_together_end_to_end() {
    // テスト項目: 仕様のシナリオ全体が実際の WebSocket 接続で成立する
    // given (前提条件):
    let port = 18481;
    start_server(port).await;

    // when (操作): A がルームを作成して参加する
    let mut a = TestClient::connect(port).await;
    a.send(r#"{"type":"createRoom","room":"x"}"#).await;
    let ack = a.recv().await;

    // then (期待する結果):
    assert_eq!(ack["type"], "roomCreated");
    assert_eq!(ack["room"], "x");

    a.send(r#"{"type":"join","room":"x"}"#).await;
    let participants = a.recv().await;
    assert_eq!(participants["type"], "participants");
    assert_eq!(participant_set(&participants), vec![a.client_id.clone()]);

    // when (操作): B が参加する
    let mut b = TestClient::connect(port).await;
    b.send(r#"{"type":"join","room":"x"}"#).await;

    // then (期待する結果): A と B の両方が {A, B} のリストを受信する
    let mut expected = vec![a.client_id.clone(), b.client_id.clone()];
    expected.sort();
    let msg_b = b.recv().await;
    assert_eq!(msg_b["type"], "participants");
    assert_eq!(participant_set(&msg_b), expected);
    let msg_a = a.recv().await;
    assert_eq!(participant_set(&msg_a), expected);

    // when (操作): A がビデオをロードする
    a.send(r#"{"type":"video","room":"x","mode":"yt","videoId":"v1"}"#)
        .await;

    // then (期待する結果): B は生のメッセージを受信する（A 自身にも届く）
    let video_b = b.recv().await;
    assert_eq!(video_b["type"], "video");
    assert_eq!(video_b["videoId"], "v1");
    let video_a = a.recv().await;
    assert_eq!(video_a["type"], "video");

    // HTTP API でルームの状態を確認する
    let rooms: serde_json::Value = reqwest::get(format!("http://127.0.0.1:{port}/api/rooms"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(rooms[0]["room"], "x");
    assert_eq!(rooms[0]["participants"].as_array().unwrap().len(), 2);
    assert_eq!(rooms[0]["hasPlayback"], true);

    // when (操作): C が後から参加する
    let mut c = TestClient::connect(port).await;
    c.send(r#"{"type":"join","room":"x"}"#).await;

    // then (期待する結果): C は participants の後に roomState を受信する
    let msg_c = c.recv().await;
    assert_eq!(msg_c["type"], "participants");
    let state_c = c.recv().await;
    assert_eq!(state_c["type"], "roomState");
    assert_eq!(state_c["state"]["video"]["videoId"], "v1");
    assert_eq!(state_c["state"]["playing"], false);
    assert_eq!(state_c["state"]["position"], 0.0);

    // A と B にも新しい participants が届く
    assert_eq!(a.recv().await["type"], "participants");
    assert_eq!(b.recv().await["type"], "participants");

    // when (操作): C が切断し、続いて A も切断する
    c.close().await;
    assert_eq!(a.recv().await["type"], "participants");
    assert_eq!(b.recv().await["type"], "participants");

    a.close().await;

    // then (期待する結果): B は自分だけのリストを受信する
    let msg_b = b.recv().await;
    assert_eq!(msg_b["type"], "participants");
    assert_eq!(participant_set(&msg_b), vec![b.client_id.clone()]);

    // when (操作): B も切断するとルームは消える
    b.close().await;
    let mut rooms_empty = false;
    for _ in 0..40 {
        let rooms: serde_json::Value = reqwest::get(format!("http://127.0.0.1:{port}/api/rooms"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        if rooms.as_array().unwrap().is_empty() {
            rooms_empty = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(rooms_empty, "room was not removed after last member left");

    // then (期待する結果): 再生状態のエントリは残っており、新しい参加者に届く
    let mut d = TestClient::connect(port).await;
    d.send(r#"{"type":"join","room":"x"}"#).await;
    let msg_d = d.recv().await;
    assert_eq!(msg_d["type"], "participants");
    assert_eq!(participant_set(&msg_d), vec![d.client_id.clone()]);
    let state_d = d.recv().await;
    assert_eq!(state_d["type"], "roomState");
    assert_eq!(state_d["state"]["video"]["videoId"], "v1");
}
