// Server loop module
// Accepts connections until the shutdown future resolves

use std::future::Future;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Run the accept loop.
///
/// Each connection is handed to its own task, so a slow download never
/// blocks new clients. When `shutdown` completes the listener is dropped and
/// the function returns; in-flight connection tasks are left to the runtime.
#[allow(clippy::ignored_unit_patterns)]
pub async fn run<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            _ = &mut shutdown => {
                drop(listener);
                logger::log_shutdown(state.active_connections.load(Ordering::SeqCst));
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::server::create_listener;
    use hyper::body::Bytes;
    use http_body_util::{BodyExt, Empty};
    use hyper::{Method, Request, StatusCode};
    use hyper_util::rt::TokioIo;
    use std::net::SocketAddr;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    const CONTENT: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    struct TestServer {
        addr: SocketAddr,
        stop: oneshot::Sender<()>,
        handle: tokio::task::JoinHandle<std::io::Result<()>>,
        state: Arc<AppState>,
        _dir: tempfile::TempDir,
    }

    async fn start_server() -> TestServer {
        start_server_with(|_| {}).await
    }

    async fn start_server_with(configure: impl FnOnce(&mut Config)) -> TestServer {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sample.hic"), CONTENT).unwrap();

        let mut config = Config::default();
        config.serve.directory = dir.path().to_path_buf();
        config.logging.access_log = false;
        configure(&mut config);
        let state = Arc::new(AppState::from_config(config).unwrap());

        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();
        let handle = tokio::spawn(run(listener, Arc::clone(&state), async {
            let _ = stopped.await;
        }));

        TestServer {
            addr,
            stop,
            handle,
            state,
            _dir: dir,
        }
    }

    async fn send(
        addr: SocketAddr,
        method: Method,
        path: &str,
        range: Option<&str>,
    ) -> (StatusCode, hyper::HeaderMap, Bytes) {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
            .await
            .unwrap();
        tokio::spawn(conn);

        let mut builder = Request::builder()
            .method(method)
            .uri(path)
            .header("host", addr.to_string());
        if let Some(range) = range {
            builder = builder.header("range", range);
        }
        let req = builder.body(Empty::<Bytes>::new()).unwrap();

        let resp = sender.send_request(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        (status, headers, body)
    }

    #[tokio::test]
    async fn test_range_request_over_tcp() {
        let server = start_server().await;

        let (status, headers, body) =
            send(server.addr, Method::GET, "/sample.hic", Some("bytes=10-15")).await;
        assert_eq!(status, StatusCode::PARTIAL_CONTENT);
        assert_eq!(headers["content-range"], "bytes 10-15/36");
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(&body[..], b"abcdef");

        server.stop.send(()).unwrap();
        server.handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_head_over_tcp() {
        let server = start_server().await;

        let (status, headers, body) = send(server.addr, Method::HEAD, "/sample.hic", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers["content-length"], "36");
        assert_eq!(headers["accept-ranges"], "bytes");
        assert!(body.is_empty());

        server.stop.send(()).unwrap();
        server.handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_clients() {
        let server = start_server().await;

        let mut tasks = Vec::new();
        for start in 0..8u64 {
            let addr = server.addr;
            tasks.push(tokio::spawn(async move {
                let range = format!("bytes={start}-{}", start + 3);
                let (status, _, body) =
                    send(addr, Method::GET, "/sample.hic", Some(&range)).await;
                (start, status, body)
            }));
        }

        for task in tasks {
            let (start, status, body) = task.await.unwrap();
            let start = usize::try_from(start).unwrap();
            assert_eq!(status, StatusCode::PARTIAL_CONTENT);
            assert_eq!(&body[..], &CONTENT[start..start + 4]);
        }

        server.stop.send(()).unwrap();
        server.handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_closes_listener() {
        let server = start_server().await;
        let addr = server.addr;

        server.stop.send(()).unwrap();
        server.handle.await.unwrap().unwrap();

        assert!(TcpStream::connect(addr).await.is_err());
    }

    #[tokio::test]
    async fn test_connection_limit_drops_extra_clients() {
        let server =
            start_server_with(|config| config.performance.max_connections = Some(1)).await;
        let active = || server.state.active_connections.load(Ordering::SeqCst);

        // first client keeps its connection alive after one request
        let stream = TcpStream::connect(server.addr).await.unwrap();
        let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
            .await
            .unwrap();
        let conn_task = tokio::spawn(conn);
        let req = Request::get("/sample.hic")
            .header("host", server.addr.to_string())
            .body(Empty::<Bytes>::new())
            .unwrap();
        let resp = sender.send_request(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        resp.into_body().collect().await.unwrap();
        assert_eq!(active(), 1);

        // second client is closed without a response
        let mut extra = TcpStream::connect(server.addr).await.unwrap();
        let _ = extra
            .write_all(b"GET /sample.hic HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await;
        let mut received = Vec::new();
        let read = extra.read_to_end(&mut received).await;
        assert!(read.is_err() || received.is_empty());
        assert_eq!(active(), 1);

        drop(sender);
        let _ = conn_task.await;
        for _ in 0..200 {
            if active() == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(active(), 0);

        server.stop.send(()).unwrap();
        server.handle.await.unwrap().unwrap();
    }
}
