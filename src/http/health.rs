use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use crate::error::{AppError, AppResult, HttpError};

const HEALTH_PATH: &str = "/dummy";
const MAX_HEADER_BYTES: usize = 16 * 1024;
const NO_CONTENT: &str = "HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n";
const NOT_FOUND: &str = "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

/// Binds `addr` and answers any request for `/dummy` with `204 No Content`.
///
/// Returns the bound address (useful with port 0) and the accept loop handle;
/// abort the handle to stop listening.
///
/// # Errors
///
/// Returns an error when the address cannot be bound.
pub async fn spawn_health_listener(addr: SocketAddr) -> AppResult<(SocketAddr, JoinHandle<()>)> {
    let listener = TcpListener::bind(addr).await.map_err(|err| {
        AppError::http(HttpError::BindHealthListener { addr, source: err })
    })?;
    let local_addr = listener.local_addr()?;
    tracing::info!("Health listener on {}", local_addr);

    let handle = tokio::spawn(async move {
        loop {
            let (socket, peer) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(err) => {
                    tracing::warn!("Health listener accept failed: {}", err);
                    continue;
                }
            };
            tokio::spawn(async move {
                if let Err(err) = answer(socket).await {
                    tracing::debug!("Health probe from {} failed: {}", peer, err);
                }
            });
        }
    });

    Ok((local_addr, handle))
}

async fn answer(mut socket: TcpStream) -> std::io::Result<()> {
    let response = match read_request_path(&mut socket).await? {
        Some(path) if path == HEALTH_PATH => NO_CONTENT,
        Some(_) | None => NOT_FOUND,
    };
    socket.write_all(response.as_bytes()).await?;
    socket.shutdown().await
}

/// Reads the request head and returns the request-target.
async fn read_request_path(socket: &mut TcpStream) -> std::io::Result<Option<String>> {
    let mut buffer: Vec<u8> = Vec::with_capacity(512);
    let mut chunk = [0u8; 512];
    loop {
        let bytes = socket.read(&mut chunk).await?;
        if bytes == 0 {
            return Ok(None);
        }
        buffer.extend_from_slice(chunk.get(..bytes).unwrap_or_default());
        if find_header_end(&buffer).is_some() || buffer.len() > MAX_HEADER_BYTES {
            break;
        }
    }

    let text = String::from_utf8_lossy(&buffer);
    let mut parts = text.lines().next().unwrap_or_default().split_whitespace();
    let (Some(_method), Some(path)) = (parts.next(), parts.next()) else {
        return Ok(None);
    };
    Ok(Some(path.to_owned()))
}

fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|window| window == b"\r\n\r\n")
}
