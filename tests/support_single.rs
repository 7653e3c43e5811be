use std::ffi::OsStr;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::path::Path;
use std::process::{Command, Output};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

pub struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
    hits: Arc<AtomicU64>,
}

impl ServerHandle {
    /// Requests answered so far.
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawn a swipe server stub that answers every request with `status_line`.
///
/// # Errors
///
/// Returns an error if the listener cannot be created or configured.
pub fn spawn_http_server(status_line: &'static str) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    let hits = Arc::new(AtomicU64::new(0));
    let server_hits = Arc::clone(&hits);

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    let hits = Arc::clone(&server_hits);
                    thread::spawn(move || handle_client(stream, status_line, &hits));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(5));
                }
                Err(_) => break,
            }
        }
    });

    Ok((
        format!("http://{}", addr),
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
            hits,
        },
    ))
}

/// Like [`spawn_http_server`], but skips when sockets are not permitted.
///
/// # Errors
///
/// Returns an error for any failure other than a sandbox denial.
pub fn spawn_http_server_or_skip(
    status_line: &'static str,
) -> Result<Option<(String, ServerHandle)>, String> {
    match spawn_http_server(status_line) {
        Ok(result) => Ok(Some(result)),
        Err(err) if err.contains("Operation not permitted") => {
            eprintln!("Skipping e2e test: {}", err);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

fn handle_client(mut stream: TcpStream, status_line: &str, hits: &AtomicU64) {
    if stream.set_nonblocking(false).is_err() {
        return;
    }
    // Keep-alive: answer every request on the connection until the peer closes it.
    let mut pending: Vec<u8> = Vec::new();
    let mut buffer = [0u8; 4096];
    loop {
        while let Some(consumed) = complete_request_len(&pending) {
            pending.drain(..consumed);
            hits.fetch_add(1, Ordering::SeqCst);
            let response = format!("{}\r\nContent-Length: 0\r\n\r\n", status_line);
            if stream.write_all(response.as_bytes()).is_err() || stream.flush().is_err() {
                return;
            }
        }
        match stream.read(&mut buffer) {
            Ok(0) | Err(_) => break,
            Ok(bytes) => pending.extend_from_slice(buffer.get(..bytes).unwrap_or_default()),
        }
    }
    drop(stream.shutdown(Shutdown::Both));
}

fn complete_request_len(pending: &[u8]) -> Option<usize> {
    let header_end = pending.windows(4).position(|window| window == b"\r\n\r\n")?;
    let head = String::from_utf8_lossy(pending.get(..header_end)?);
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.trim()
                .eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    let total = header_end.checked_add(4)?.checked_add(content_length)?;
    (pending.len() >= total).then_some(total)
}

/// Run the `swipeload` binary in `cwd` with a clean environment and capture output.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_swipeload<I, S>(cwd: &Path, args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = swipeload_bin()?;
    Command::new(bin)
        .args(args)
        .current_dir(cwd)
        .env("RUST_LOG", "error")
        .env_remove("SWIPELOAD_LOG")
        .env_remove("SERVER_URL")
        .env_remove("CLIENT_PORT")
        .env_remove("SWIPELOAD_WORKERS")
        .env_remove("SWIPELOAD_REQUESTS")
        .output()
        .map_err(|err| format!("run swipeload failed: {}", err))
}

fn swipeload_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_swipeload").map_or_else(
        || Err("CARGO_BIN_EXE_swipeload missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}
