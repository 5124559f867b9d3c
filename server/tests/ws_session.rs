// End-to-end: real sockets against the axum router.

use futures::{SinkExt, StreamExt};
use rand::rngs::StdRng;
use rand::SeedableRng;
use roulette_protocol::{ClientToServer, ServerToClient};
use roulette_server::draw::RngDraw;
use roulette_server::{ws, Hub, Session};
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start_server(options: &[&str]) -> String {
    let session = Session::new(
        options.iter().map(|s| s.to_string()).collect(),
        Box::new(RngDraw::new(StdRng::seed_from_u64(11))),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, ws::router(Hub::new(session)))
            .await
            .unwrap();
    });
    format!("ws://{addr}/ws")
}

async fn next_event(client: &mut Client) -> ServerToClient {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(10), client.next())
            .await
            .expect("timed out waiting for event")
            .expect("socket closed")
            .expect("socket error");
        if let Message::Text(text) = frame {
            return serde_json::from_str(&text).expect("bad server json");
        }
    }
}

async fn send(client: &mut Client, cmd: &ClientToServer) {
    let json = serde_json::to_string(cmd).unwrap();
    client.send(Message::Text(json)).await.unwrap();
}

async fn join(url: &str) -> (Client, bool, usize) {
    let (mut client, _) = connect_async(url).await.unwrap();
    let is_picker = match next_event(&mut client).await {
        ServerToClient::AdminAssigned(flag) => flag,
        other => panic!("expected admin-assigned, got {other:?}"),
    };
    let init = match next_event(&mut client).await {
        ServerToClient::InitialState(init) => init,
        other => panic!("expected initial-state, got {other:?}"),
    };
    assert_eq!(init.is_admin, is_picker);
    let count = match next_event(&mut client).await {
        ServerToClient::UsersUpdate(n) => n,
        other => panic!("expected users-update, got {other:?}"),
    };
    assert_eq!(count, init.connected_users);
    (client, is_picker, count)
}

#[tokio::test]
async fn picker_edits_reach_spectators_and_role_passes_to_next_joiner() {
    let url = start_server(&["Ana", "Carlos"]).await;

    let (mut a, a_picker, a_count) = join(&url).await;
    assert!(a_picker);
    assert_eq!(a_count, 1);

    let (mut b, b_picker, b_count) = join(&url).await;
    assert!(!b_picker);
    assert_eq!(b_count, 2);
    assert_eq!(next_event(&mut a).await, ServerToClient::UsersUpdate(2));

    // Spectator edit is dropped; the picker's edit reaches both.
    send(&mut b, &ClientToServer::UpdateOptions(vec!["hack".into()])).await;
    b.send(Message::Text("not json".into())).await.unwrap();
    send(&mut a, &ClientToServer::UpdateOptions(vec!["X".into(), "Y".into()])).await;

    let expected = ServerToClient::OptionsUpdated(vec!["X".into(), "Y".into()]);
    assert_eq!(next_event(&mut a).await, expected);
    assert_eq!(next_event(&mut b).await, expected);

    a.close(None).await.unwrap();
    assert_eq!(next_event(&mut b).await, ServerToClient::UsersUpdate(1));

    let (_c, c_picker, c_count) = join(&url).await;
    assert!(c_picker);
    assert_eq!(c_count, 2);
}

#[tokio::test]
async fn spin_is_announced_then_revealed_to_everyone() {
    let url = start_server(&["Ana", "Carlos", "María"]).await;
    let (mut a, _, _) = join(&url).await;
    let (mut b, _, _) = join(&url).await;
    assert_eq!(next_event(&mut a).await, ServerToClient::UsersUpdate(2));

    send(&mut a, &ClientToServer::SpinRoulette).await;

    let mut rotations = Vec::new();
    for client in [&mut a, &mut b] {
        match next_event(client).await {
            ServerToClient::RouletteSpinning(spin) => {
                assert_eq!(spin.duration, 5000);
                rotations.push(spin.rotation);
            }
            other => panic!("expected roulette-spinning, got {other:?}"),
        }
    }
    assert_eq!(rotations[0], rotations[1]);

    let slot = ((rotations[0] % 360.0) / 120.0).round() as usize;
    let expected = ["Ana", "Carlos", "María"][slot];
    for client in [&mut a, &mut b] {
        match next_event(client).await {
            ServerToClient::RouletteResult(result) => assert_eq!(result.winner, expected),
            other => panic!("expected roulette-result, got {other:?}"),
        }
    }
}
