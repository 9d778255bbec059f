//! Tests de integración para el servidor HTTP
//! tests/integration_test.rs
//!
//! Cada test levanta un servidor real en un puerto efímero sobre un árbol
//! temporal, le habla HTTP/1.0 crudo por `TcpStream` y espera a que el
//! servidor se apague solo al llegar a `max_requests`.

use std::fs;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tempfile::TempDir;
use webserver::config::Config;
use webserver::metrics::MetricsSnapshot;
use webserver::server::Server;

const PNG_BYTES: usize = 3000;

fn set_mode(path: &Path, mode: u32) {
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
}

/// Árbol servido:
///
/// ```text
/// root/
///   hello.html        0644
///   secret.txt        0600
///   image.png         0644  (3000 bytes)
///   docs/             0755
///     index.html      0644
///   files/            0755
///     a.txt           0644
///     sub/            0755
/// ```
fn serve_tree() -> TempDir {
    let root = TempDir::new().unwrap();
    let p = root.path();

    fs::write(p.join("hello.html"), "<h1>Hola</h1>").unwrap();
    fs::write(p.join("secret.txt"), "top secret").unwrap();
    fs::write(p.join("image.png"), vec![0x89u8; PNG_BYTES]).unwrap();
    fs::create_dir(p.join("docs")).unwrap();
    fs::write(p.join("docs/index.html"), "<p>docs</p>").unwrap();
    fs::create_dir_all(p.join("files/sub")).unwrap();
    fs::write(p.join("files/a.txt"), "abc").unwrap();

    for file in ["hello.html", "image.png", "docs/index.html", "files/a.txt"] {
        set_mode(&p.join(file), 0o644);
    }
    set_mode(&p.join("secret.txt"), 0o600);
    for sub in ["docs", "files", "files/sub"] {
        set_mode(&p.join(sub), 0o755);
    }

    root
}

/// Levanta el servidor y retorna su dirección y el handle del accept loop
fn start_server(root: &TempDir, max_requests: u64) -> (SocketAddr, JoinHandle<MetricsSnapshot>) {
    let config = Config {
        port: 0,
        root: root.path().to_path_buf(),
        pool_size: 3,
        max_queue: 8,
        max_requests,
        ..Config::default()
    };

    let server = Server::bind(config).expect("bind");
    let addr = server.local_addr().unwrap();
    let handle = thread::spawn(move || server.run().expect("run"));
    (addr, handle)
}

/// Helper: envía bytes crudos y retorna la response completa
fn send_raw(addr: SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).unwrap();
    stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    stream.write_all(request).unwrap();
    stream.flush().unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).unwrap();
    response
}

fn send(addr: SocketAddr, request: &str) -> String {
    String::from_utf8_lossy(&send_raw(addr, request.as_bytes())).into_owned()
}

/// Separa headers y body de una response
fn split_response(response: &[u8]) -> (String, &[u8]) {
    let pos = response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response sin separador de headers");
    let head = String::from_utf8_lossy(&response[..pos]).into_owned();
    (head, &response[pos + 4..])
}

fn header<'a>(head: &'a str, name: &str) -> Option<&'a str> {
    head.lines().skip(1).find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.eq_ignore_ascii_case(name).then(|| value.trim())
    })
}

#[test]
fn test_serves_files_with_headers() {
    let root = serve_tree();
    let (addr, handle) = start_server(&root, 2);

    let response = send_raw(addr, b"GET /hello.html HTTP/1.0\r\nHost: localhost\r\n\r\n");
    let (head, body) = split_response(&response);
    assert!(head.starts_with("HTTP/1.0 200 OK"), "got: {}", head);
    assert_eq!(header(&head, "Server"), Some("webserver/1.0"));
    assert_eq!(header(&head, "Content-Type"), Some("text/html"));
    assert_eq!(header(&head, "Content-Length"), Some("13"));
    assert_eq!(header(&head, "Connection"), Some("close"));
    assert!(header(&head, "Date").unwrap().ends_with(" GMT"));
    assert!(header(&head, "Last-Modified").is_some());
    assert_eq!(body, b"<h1>Hola</h1>");

    let response = send_raw(addr, b"GET /image.png HTTP/1.0\r\n\r\n");
    let (head, body) = split_response(&response);
    assert_eq!(header(&head, "Content-Type"), Some("image/png"));
    assert_eq!(header(&head, "Content-Length"), Some(PNG_BYTES.to_string().as_str()));
    assert_eq!(body.len(), PNG_BYTES);

    let snapshot = handle.join().unwrap();
    assert_eq!(snapshot.total_requests, 2);
    assert_eq!(snapshot.status_codes.get(&200), Some(&2));
}

#[test]
fn test_directories() {
    let root = serve_tree();
    let (addr, handle) = start_server(&root, 3);

    let redirect = send(addr, "GET /docs HTTP/1.0\r\n\r\n");
    assert!(redirect.starts_with("HTTP/1.0 302 Found\r\n"), "got: {}", redirect);
    assert!(redirect.contains("Location: /docs/\r\n"));

    let index = send(addr, "GET /docs/ HTTP/1.0\r\n\r\n");
    assert!(index.starts_with("HTTP/1.0 200 OK\r\n"));
    assert!(index.ends_with("<p>docs</p>"));

    let listing = send(addr, "GET /files/ HTTP/1.0\r\n\r\n");
    assert!(listing.starts_with("HTTP/1.0 200 OK\r\n"));
    assert!(listing.contains("Index of /files/"));
    assert!(listing.contains("<A HREF=\"a.txt\">a.txt</A>"));
    assert!(listing.contains("<A HREF=\"sub/\">sub</A>"));

    handle.join().unwrap();
}

#[test]
fn test_error_responses() {
    let root = serve_tree();
    let (addr, handle) = start_server(&root, 5);

    let cases = [
        ("GET /missing.txt HTTP/1.0\r\n\r\n", "HTTP/1.0 404 Not Found\r\n"),
        ("GET /secret.txt HTTP/1.0\r\n\r\n", "HTTP/1.0 403 Forbidden\r\n"),
        ("GET /../etc/passwd HTTP/1.0\r\n\r\n", "HTTP/1.0 403 Forbidden\r\n"),
        ("POST /hello.html HTTP/1.0\r\n\r\n", "HTTP/1.0 501 Not Implemented\r\n"),
        ("GARBAGE\r\n\r\n", "HTTP/1.0 400 Bad Request\r\n"),
    ];

    for (request, status_line) in cases {
        let response = send_raw(addr, request.as_bytes());
        let (head, body) = split_response(&response);

        assert!(
            head.starts_with(status_line.trim_end()),
            "{:?} → {}",
            request,
            head
        );
        assert_eq!(header(&head, "Content-Type"), Some("text/html"));
        assert_eq!(header(&head, "Content-Length"), Some(body.len().to_string().as_str()));
    }

    let snapshot = handle.join().unwrap();
    assert_eq!(snapshot.total_requests, 5);
    assert_eq!(snapshot.status_codes.get(&403), Some(&2));
}

#[test]
fn test_concurrent_clients() {
    const CLIENTS: u64 = 12;

    let root = serve_tree();
    let (addr, handle) = start_server(&root, CLIENTS);

    let clients: Vec<_> = (0..CLIENTS)
        .map(|_| thread::spawn(move || send(addr, "GET /hello.html HTTP/1.0\r\n\r\n")))
        .collect();

    for client in clients {
        let response = client.join().unwrap();
        assert!(response.starts_with("HTTP/1.0 200 OK\r\n"));
        assert!(response.ends_with("<h1>Hola</h1>"));
    }

    let snapshot = handle.join().unwrap();
    assert_eq!(snapshot.total_requests, CLIENTS);
    assert_eq!(snapshot.rejected_submissions, 0);
}
