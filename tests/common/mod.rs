//! Loopback game servers for exercising the query path.

#![allow(dead_code)]

use a2s_browser::models::server::Endpoint;
use tokio::net::UdpSocket;

pub struct FakeInfo<'a> {
    pub name: &'a str,
    pub map: &'a str,
    pub players: u8,
    pub max_players: u8,
    pub vac: u8,
}

pub fn info_response(info: &FakeInfo<'_>) -> Vec<u8> {
    let mut packet = vec![0xFF, 0xFF, 0xFF, 0xFF, 0x49, 17];
    for s in [info.name, info.map, "cstrike", "Counter-Strike: Source"] {
        packet.extend_from_slice(s.as_bytes());
        packet.push(0);
    }
    packet.extend_from_slice(&240u16.to_le_bytes());
    packet.extend_from_slice(&[info.players, info.max_players, 0, b'd', b'l', 0, info.vac]);
    packet
}

fn endpoint_of(socket: &UdpSocket) -> Endpoint {
    let addr = socket.local_addr().unwrap();
    Endpoint::new(addr.ip().to_string(), addr.port())
}

/// Answers every query it receives with `reply`.
pub async fn spawn_responder(reply: Vec<u8>) -> Endpoint {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let endpoint = endpoint_of(&socket);

    tokio::spawn(async move {
        let mut buf = [0u8; 1024];
        while let Ok((len, from)) = socket.recv_from(&mut buf).await {
            if buf[..len] == *a2s_browser::protocol::a2s::encode_info_query() {
                let _ = socket.send_to(&reply, from).await;
            }
        }
    });

    endpoint
}

/// Answers each query with two datagrams back to back.
pub async fn spawn_double_responder(first: Vec<u8>, second: Vec<u8>) -> Endpoint {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let endpoint = endpoint_of(&socket);

    tokio::spawn(async move {
        let mut buf = [0u8; 1024];
        while let Ok((_, from)) = socket.recv_from(&mut buf).await {
            let _ = socket.send_to(&first, from).await;
            let _ = socket.send_to(&second, from).await;
        }
    });

    endpoint
}

/// Bound but never answers. The socket stays open until the returned handle
/// is dropped.
pub async fn silent_server() -> (Endpoint, UdpSocket) {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    (endpoint_of(&socket), socket)
}
