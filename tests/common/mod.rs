//! Shared utilities for integration testing.
#![allow(dead_code)]

use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use relic_forge::blockchain::{MintError, MintedToken, Minter};
use relic_forge::display::ScanDisplay;
use relic_forge::printer::{PrintError, PrintSink};
use relic_forge::qr::{QrEncoder, QrError, QrImage, QrRenderer};
use relic_forge::storage::{RelicUploader, StoredRelic, UploadError, UploadRequest};

// ---------------------------------------------------------------------------
// Mock HTTP backend
// ---------------------------------------------------------------------------

/// One request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    /// Header names are lowercased.
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

pub type RequestLog = Arc<Mutex<Vec<RecordedRequest>>>;

/// Start a programmable mock backend on an ephemeral port.
///
/// `f` receives the parsed request and returns `(status, json body)`. Every
/// request is appended to the returned log.
pub async fn start_programmable_backend<F, Fut>(f: F) -> (SocketAddr, RequestLog)
where
    F: Fn(RecordedRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let requests = log.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    let requests = requests.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        requests.lock().unwrap().push(request.clone());

                        let (status, body) = f(request).await;
                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            402 => "402 Payment Required",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, log)
}

/// Mock bundler that answers every upload with a fresh `itemId`.
pub async fn start_mock_bundler() -> (SocketAddr, RequestLog) {
    let counter = Arc::new(AtomicUsize::new(0));
    start_programmable_backend(move |_request| {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        async move { (200, format!(r#"{{"itemId":"item-{}","size":1}}"#, n)) }
    })
    .await
}

async fn read_request(socket: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .get("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buf[header_end..].to_vec();
    while body.len() < content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(RecordedRequest {
        method,
        path,
        headers,
        body,
    })
}

// ---------------------------------------------------------------------------
// Pipeline test doubles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Behavior {
    #[default]
    Succeed,
    Fail,
    Panic,
}

/// Uploader that records requests and returns fixed URIs.
#[derive(Default)]
pub struct FakeUploader {
    pub behavior: Behavior,
    pub calls: Mutex<Vec<UploadRequest>>,
}

impl FakeUploader {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl RelicUploader for FakeUploader {
    async fn upload(&self, request: UploadRequest) -> Result<StoredRelic, UploadError> {
        let id = request.relic_id;
        self.calls.lock().unwrap().push(request);
        match self.behavior {
            Behavior::Succeed => Ok(StoredRelic {
                image_uri: format!("https://arweave.net/image-{}", id),
                token_uri: format!("https://arweave.net/meta-{}", id),
            }),
            Behavior::Fail => Err(UploadError::Rejected {
                status: 503,
                body: "bundler offline".to_string(),
            }),
            Behavior::Panic => panic!("uploader exploded"),
        }
    }
}

/// Minter that records `(token_uri, token_id)` calls.
#[derive(Default)]
pub struct FakeMinter {
    pub behavior: Behavior,
    pub calls: Mutex<Vec<(String, u64)>>,
}

impl FakeMinter {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Minter for FakeMinter {
    async fn mint(&self, token_uri: &str, token_id: u64) -> Result<MintedToken, MintError> {
        self.calls
            .lock()
            .unwrap()
            .push((token_uri.to_string(), token_id));
        match self.behavior {
            Behavior::Succeed => Ok(MintedToken {
                nft_url: format!("https://zora.co/collect/zora:0xc0ffee/{}", token_id),
                tx_hash: format!("0x{:064x}", token_id),
            }),
            Behavior::Fail => Err(MintError::Rpc("eth_estimateGas: execution reverted".into())),
            Behavior::Panic => panic!("minter exploded"),
        }
    }
}

/// QR renderer that counts calls and renders real images.
#[derive(Default)]
pub struct RecordingQr {
    pub behavior: Behavior,
    pub urls: Mutex<Vec<String>>,
    pub rendered: Mutex<Vec<PathBuf>>,
}

impl RecordingQr {
    pub fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.urls.lock().unwrap().len()
    }
}

impl QrRenderer for RecordingQr {
    fn render(&self, url: &str) -> Result<QrImage, QrError> {
        self.urls.lock().unwrap().push(url.to_string());
        match self.behavior {
            Behavior::Succeed => {
                let image = QrEncoder::default().render(url)?;
                self.rendered
                    .lock()
                    .unwrap()
                    .push(image.path().to_path_buf());
                Ok(image)
            }
            Behavior::Fail => Err(QrError::Io(std::io::Error::other("disk full"))),
            Behavior::Panic => panic!("qr renderer exploded"),
        }
    }
}

/// A file handed to the print sink.
#[derive(Debug, Clone)]
pub struct PrintJob {
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

impl PrintJob {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.contents).into_owned()
    }

    pub fn is_png(&self) -> bool {
        self.contents.starts_with(b"\x89PNG")
    }
}

/// Print sink that snapshots every submitted file.
#[derive(Default)]
pub struct RecordingSink {
    pub fail: bool,
    pub jobs: Mutex<Vec<PrintJob>>,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn jobs(&self) -> Vec<PrintJob> {
        self.jobs.lock().unwrap().clone()
    }

    /// Text receipts only, in print order.
    pub fn receipts(&self) -> Vec<String> {
        self.jobs()
            .iter()
            .filter(|job| !job.is_png())
            .map(PrintJob::text)
            .collect()
    }
}

#[async_trait]
impl PrintSink for RecordingSink {
    fn describe(&self) -> String {
        "recording".to_string()
    }

    async fn submit(&self, file: &Path) -> Result<(), PrintError> {
        let contents = tokio::fs::read(file).await?;
        self.jobs.lock().unwrap().push(PrintJob {
            path: file.to_path_buf(),
            contents,
        });
        if self.fail {
            Err(PrintError::CommandFailed {
                program: "lpr".to_string(),
                status: "exit status: 1".to_string(),
                stderr: "printer on fire".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

/// Display that records which images were shown.
#[derive(Default)]
pub struct RecordingDisplay {
    pub shown: Mutex<Vec<PathBuf>>,
}

impl ScanDisplay for RecordingDisplay {
    fn show(&self, image: &Path) {
        self.shown.lock().unwrap().push(image.to_path_buf());
    }
}

/// Write a small fake scan and return its path.
pub fn write_scan(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"\x89PNG\r\n\x1a\nfake scan bytes").unwrap();
    path
}
