//! Range reads against a minimal HTTP/1.1 server on a local socket.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use common::{Method, ZipBuilder};
use followcheck::{Archive, HttpRangeReader, ReadAt, ZipArchive};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// How the server answers Range requests.
#[derive(Clone, Copy, Default)]
struct Behavior {
    /// Largest body sent for one Range request.
    max_chunk: Option<usize>,
    /// Leave this many GET requests unanswered before serving normally.
    stalled_gets: usize,
}

struct Server {
    url: String,
    gets: Arc<AtomicUsize>,
}

async fn serve(body: Vec<u8>, behavior: Behavior) -> Server {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/export.zip", listener.local_addr().unwrap());
    let body = Arc::new(body);
    let gets = Arc::new(AtomicUsize::new(0));

    let counter = gets.clone();
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(respond(stream, body.clone(), behavior, counter.clone()));
        }
    });

    Server { url, gets }
}

async fn respond(mut stream: TcpStream, body: Arc<Vec<u8>>, behavior: Behavior, gets: Arc<AtomicUsize>) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
    let request = String::from_utf8_lossy(&request).to_ascii_lowercase();

    if request.starts_with("head ") {
        let head = format!(
            "HTTP/1.1 200 OK\r\nAccept-Ranges: bytes\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        let _ = stream.write_all(head.as_bytes()).await;
        return;
    }

    if gets.fetch_add(1, Ordering::SeqCst) < behavior.stalled_gets {
        tokio::time::sleep(Duration::from_secs(5)).await;
        return;
    }

    let Some((start, end)) = request
        .lines()
        .find_map(|line| line.strip_prefix("range: bytes="))
        .and_then(|range| range.trim().split_once('-'))
        .and_then(|(start, end)| Some((start.parse::<usize>().ok()?, end.parse::<usize>().ok()?)))
    else {
        let _ = stream
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
            .await;
        return;
    };

    let end = end.min(body.len() - 1);
    let end = match behavior.max_chunk {
        Some(chunk) => end.min(start + chunk - 1),
        None => end,
    };
    let chunk = &body[start..=end];
    let head = format!(
        "HTTP/1.1 206 Partial Content\r\nContent-Range: bytes {}-{}/{}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        start,
        end,
        body.len(),
        chunk.len()
    );
    let _ = stream.write_all(head.as_bytes()).await;
    let _ = stream.write_all(chunk).await;
}

fn sample_body() -> Vec<u8> {
    (0..=255u8).cycle().take(1000).collect()
}

#[tokio::test]
async fn reads_ranges_and_counts_transferred_bytes() {
    let body = sample_body();
    let server = serve(body.clone(), Behavior::default()).await;
    let reader = HttpRangeReader::new(server.url).await.unwrap();
    assert_eq!(reader.size(), 1000);

    let mut buf = [0u8; 100];
    reader.read_exact_at(300, &mut buf).await.unwrap();
    assert_eq!(&buf[..], &body[300..400]);
    assert_eq!(reader.transferred_bytes(), 100);

    // Reads past the end are clamped to the archive size
    let mut tail = [0u8; 64];
    assert_eq!(reader.read_at(980, &mut tail).await.unwrap(), 20);
    assert_eq!(&tail[..20], &body[980..]);
    assert_eq!(reader.read_at(1000, &mut tail).await.unwrap(), 0);
}

#[tokio::test]
async fn short_bodies_are_completed_with_further_requests() {
    let body = sample_body();
    let server = serve(
        body.clone(),
        Behavior {
            max_chunk: Some(7),
            ..Behavior::default()
        },
    )
    .await;
    let reader = HttpRangeReader::new(server.url).await.unwrap();

    let mut buf = [0u8; 50];
    reader.read_exact_at(10, &mut buf).await.unwrap();
    assert_eq!(&buf[..], &body[10..60]);
    assert_eq!(server.gets.load(Ordering::SeqCst), 8);
    assert_eq!(reader.transferred_bytes(), 50);
}

#[tokio::test]
async fn timed_out_requests_are_retried() {
    let body = sample_body();
    let server = serve(
        body.clone(),
        Behavior {
            stalled_gets: 1,
            ..Behavior::default()
        },
    )
    .await;
    let reader = HttpRangeReader::with_timeout(server.url, Duration::from_millis(200))
        .await
        .unwrap();

    let mut buf = [0u8; 32];
    reader.read_exact_at(0, &mut buf).await.unwrap();
    assert_eq!(&buf[..], &body[..32]);
    assert_eq!(server.gets.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn servers_without_range_support_are_rejected() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/export.zip", listener.local_addr().unwrap());
    tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf).await;
            let _ = stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\nConnection: close\r\n\r\n")
                .await;
        }
    });

    assert!(HttpRangeReader::new(url).await.is_err());
}

#[tokio::test]
async fn opens_a_remote_export() {
    let zip = ZipBuilder::default()
        .file("connections/followers_1.json", b"[]", Method::Stored)
        .file("connections/following.txt", b"alice\nbob\n", Method::Deflate)
        .build();
    let server = serve(
        zip,
        Behavior {
            max_chunk: Some(64),
            ..Behavior::default()
        },
    )
    .await;
    let reader = Arc::new(HttpRangeReader::new(server.url).await.unwrap());
    let archive = ZipArchive::open(reader).await.unwrap();

    assert_eq!(
        archive.entry_paths(),
        ["connections/followers_1.json", "connections/following.txt"]
    );
    assert_eq!(
        archive.read_entry_text("connections/following.txt").await.unwrap(),
        "alice\nbob\n"
    );
}
