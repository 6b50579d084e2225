//! Local HTTP/1.1 stub serving canned files by request path.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// `(path, status, content type, body)`
pub(crate) type Route = (&'static str, u16, &'static str, &'static str);

/// Start the stub and return its base URL. Unknown paths answer 404.
pub(crate) async fn serve(routes: Vec<Route>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let routes: Arc<HashMap<&'static str, Route>> =
        Arc::new(routes.into_iter().map(|r| (r.0, r)).collect());

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(answer(stream, Arc::clone(&routes)));
        }
    });

    base_url
}

async fn answer(mut stream: TcpStream, routes: Arc<HashMap<&'static str, Route>>) {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }

    let head = String::from_utf8_lossy(&head);
    let path = head.split_whitespace().nth(1).unwrap_or("/");
    let (_, status, content_type, body) = routes
        .get(path)
        .copied()
        .unwrap_or(("", 404, "text/plain", "not found"));

    let status_line = format!(
        "HTTP/1.1 {} Stub\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        content_type,
        body.len()
    );
    let _ = stream.write_all(status_line.as_bytes()).await;
    let _ = stream.write_all(body.as_bytes()).await;
    let _ = stream.shutdown().await;
}
