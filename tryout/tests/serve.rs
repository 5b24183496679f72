use std::net::SocketAddr;
use std::str::FromStr;

use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

use tryout::body::BodyRendering;
use tryout::config::Config;
use tryout::record::Record;
use tryout::server::serve;

async fn roundtrip(addr: SocketAddr, raw: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

#[tokio::test]
async fn serves_and_persists_to_the_configured_file() {
    let dir = TempDir::new().unwrap();
    let history = dir.path().join("served.history");
    let config = Config {
        address: SocketAddr::from_str("127.0.0.1:0").unwrap(),
        persistence_path: history.clone(),
        body_rendering: BodyRendering::Escaped,
        max_body_size: 1024,
        export_prometheus: false,
    };

    let listener = TcpListener::bind(config.address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();
    let server = tokio::spawn(serve(config, listener, async move {
        stopped.await.unwrap_or_default();
    }));

    let response = roundtrip(
        addr,
        "PUT /hello?x=1 HTTP/1.1\r\nHost: localhost\r\nUser-Agent: test\r\nContent-Length: 5\r\nConnection: close\r\n\r\nping\n",
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
    assert!(response.contains("check your request at server URL: /"));

    let response = roundtrip(
        addr,
        "GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;
    assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
    assert!(response.contains("/hello?x=1"));

    stop.send(()).unwrap();
    server.await.unwrap().unwrap();

    let contents = std::fs::read_to_string(&history).unwrap();
    let records: Vec<Record> = contents
        .lines()
        .map(|line| Record::from_line(line).unwrap())
        .collect();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].origin_ip, "127.0.0.1");
    assert_eq!(records[0].method, "PUT");
    assert_eq!(records[0].path, "/hello?x=1");
    assert_eq!(records[0].body, "ping\\n");
    assert!(records[0].headers.contains("'user-agent': 'test'"));
}
