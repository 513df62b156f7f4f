mod common;

use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use std::time::{Duration, Instant};

use common::staging_leftovers;
use drowsy::config::DEFAULT_USER_AGENT;
use drowsy::{Error, ErrorKind, HttpClient, HttpOptions};
use tempfile::tempdir;
use tokio::runtime::Runtime;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock server on its own multi-threaded runtime; the blocking client under
/// test runs on the test thread.
fn start_server() -> (Runtime, MockServer) {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .expect("tokio runtime");
    let server = rt.block_on(MockServer::start());
    (rt, server)
}

fn mount(rt: &Runtime, server: &MockServer, verb: &str, at: &str, response: ResponseTemplate) {
    rt.block_on(
        Mock::given(method(verb))
            .and(path(at))
            .respond_with(response)
            .mount(server),
    );
}

const LISTING: &str = r#"<html><head><title>Index of /data</title></head><body>
<a href="?C=N;O=D">Name</a>
<a href="/">Parent Directory</a>
<a href="a.csv">a.csv</a>
<a href="b.CSV">b.CSV</a>
<a href="c.txt">c.txt</a>
<a href="a.csv">a.csv (again)</a>
</body></html>"#;

#[test]
fn search_returns_matching_absolute_urls() {
    let (rt, server) = start_server();
    mount(&rt, &server, "GET", "/data/", ResponseTemplate::new(200).set_body_string(LISTING));

    let client = HttpClient::new().unwrap();
    let links = client.search(&format!("{}/data/", server.uri()), "csv").unwrap();

    assert_eq!(
        links,
        vec![
            format!("{}/data/a.csv", server.uri()),
            format!("{}/data/b.CSV", server.uri()),
        ]
    );
}

#[test]
fn search_on_missing_or_failing_page_is_empty() {
    let (rt, server) = start_server();
    mount(&rt, &server, "GET", "/gone/", ResponseTemplate::new(404));
    mount(&rt, &server, "GET", "/broken/", ResponseTemplate::new(500));

    let client = HttpClient::new().unwrap();
    assert!(client.search(&format!("{}/gone/", server.uri()), "csv").unwrap().is_empty());
    assert!(client.search(&format!("{}/broken/", server.uri()), "csv").unwrap().is_empty());
}

#[test]
fn check_url_maps_status_codes() {
    let (rt, server) = start_server();
    rt.block_on(
        Mock::given(method("HEAD"))
            .and(path("/ok"))
            .and(header("user-agent", DEFAULT_USER_AGENT))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server),
    );
    mount(&rt, &server, "HEAD", "/missing", ResponseTemplate::new(404));
    mount(&rt, &server, "HEAD", "/down", ResponseTemplate::new(503));

    let client = HttpClient::new().unwrap();
    client.check_url(&format!("{}/ok", server.uri())).unwrap();
    assert!(matches!(
        client.check_url(&format!("{}/missing", server.uri())),
        Err(Error::NotFound(_))
    ));
    assert!(matches!(
        client.check_url(&format!("{}/down", server.uri())),
        Err(Error::ProtocolError { code: 503, .. })
    ));
    assert!(matches!(client.check_url(""), Err(Error::MissingArgument("url"))));
}

#[test]
fn check_url_on_closed_port_is_transport_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = HttpClient::new().unwrap();
    let err = client.check_url(&format!("http://127.0.0.1:{port}/")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportError);
}

#[test]
fn download_streams_into_destination() {
    let (rt, server) = start_server();
    let body: Vec<u8> = (0..=255u8).cycle().take(20_000).collect();
    mount(&rt, &server, "GET", "/f.bin", ResponseTemplate::new(200).set_body_bytes(body.clone()));

    let client = HttpClient::with_options(HttpOptions::default().chunk_size(1000)).unwrap();
    let td = tempdir().unwrap();
    let dest = td.path().join("f.bin");

    let bytes = client.download(&format!("{}/f.bin", server.uri()), &dest, false).unwrap();
    assert_eq!(bytes, 20_000);
    assert_eq!(fs::read(&dest).unwrap(), body);
    assert!(staging_leftovers(td.path()).is_empty());
}

#[test]
fn download_respects_overwrite_flag() {
    let (rt, server) = start_server();
    mount(&rt, &server, "GET", "/a.txt", ResponseTemplate::new(200).set_body_string("fresh"));

    let client = HttpClient::new().unwrap();
    let td = tempdir().unwrap();
    let dest = td.path().join("a.txt");
    fs::write(&dest, "stale").unwrap();
    let url = format!("{}/a.txt", server.uri());

    assert!(matches!(client.download(&url, &dest, false), Err(Error::AlreadyExists(_))));
    assert_eq!(fs::read_to_string(&dest).unwrap(), "stale");

    client.download(&url, &dest, true).unwrap();
    assert_eq!(fs::read_to_string(&dest).unwrap(), "fresh");
    assert!(staging_leftovers(td.path()).is_empty());
}

#[test]
fn download_error_status_creates_nothing() {
    let (rt, server) = start_server();
    mount(&rt, &server, "GET", "/boom", ResponseTemplate::new(500).set_body_string("oops"));
    mount(&rt, &server, "GET", "/nothing", ResponseTemplate::new(404));

    let client = HttpClient::new().unwrap();
    let td = tempdir().unwrap();
    let dest = td.path().join("out.bin");

    assert!(matches!(
        client.download(&format!("{}/boom", server.uri()), &dest, false),
        Err(Error::ProtocolError { code: 500, .. })
    ));
    assert!(matches!(
        client.download(&format!("{}/nothing", server.uri()), &dest, false),
        Err(Error::NotFound(_))
    ));
    assert_eq!(fs::read_dir(td.path()).unwrap().count(), 0);
}

#[test]
fn truncated_body_leaves_no_partial_file() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = [0u8; 2048];
        let _ = stream.read(&mut request);
        stream
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\nConnection: close\r\n\r\n0123456789")
            .unwrap();
    });

    let client = HttpClient::new().unwrap();
    let td = tempdir().unwrap();
    let dest = td.path().join("partial.bin");
    fs::write(&dest, b"keep me").unwrap();

    let err = client
        .download(&format!("http://{addr}/partial.bin"), &dest, true)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportError);
    assert_eq!(fs::read(&dest).unwrap(), b"keep me");
    assert!(staging_leftovers(td.path()).is_empty());

    server.join().unwrap();
}

/// Serve one GET, sending `body` in `piece`-sized writes with `gap` between
/// them, then hang up.
fn trickle_server(body: &'static [u8], piece: usize, gap: Duration) -> (String, thread::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = [0u8; 2048];
        let _ = stream.read(&mut request);
        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        stream.write_all(head.as_bytes()).unwrap();
        for chunk in body.chunks(piece) {
            thread::sleep(gap);
            if stream.write_all(chunk).and_then(|_| stream.flush()).is_err() {
                return;
            }
        }
    });
    (format!("http://{addr}/slow.bin"), server)
}

#[test]
fn slow_but_steady_body_outlives_the_timeout() {
    const BODY: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ!@#$%^&*()-=_+[]";
    let (url, server) = trickle_server(BODY, 10, Duration::from_millis(300));

    let client =
        HttpClient::with_options(HttpOptions::default().timeout(Duration::from_secs(1))).unwrap();
    let td = tempdir().unwrap();
    let dest = td.path().join("slow.bin");

    let started = Instant::now();
    let bytes = client.download(&url, &dest, false).unwrap();
    assert!(started.elapsed() > Duration::from_secs(1));
    assert_eq!(bytes, BODY.len() as u64);
    assert_eq!(fs::read(&dest).unwrap(), BODY);

    server.join().unwrap();
}

#[test]
fn stalled_body_times_out_and_leaves_nothing() {
    let (url, server) = trickle_server(b"0123456789abcdefghij", 10, Duration::from_millis(1500));

    let client =
        HttpClient::with_options(HttpOptions::default().timeout(Duration::from_millis(300)))
            .unwrap();
    let td = tempdir().unwrap();
    let dest = td.path().join("stalled.bin");

    let err = client.download(&url, &dest, false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportError);
    assert!(!dest.exists());
    assert!(staging_leftovers(td.path()).is_empty());

    server.join().unwrap();
}
