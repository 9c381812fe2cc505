//! Wire protocol commands over an established connection
//!
//! The test protocol is line framed. After a HI/HELLO greeting the client
//! issues three commands:
//!
//! - `PING <ms>` answered by a `PONG` line, used for round-trip probes
//! - `DOWNLOAD <n>` answered by exactly `n` payload bytes
//! - `UPLOAD <n> 0` followed by `n` payload bytes, answered by an `OK` line
//!
//! Connections are owned by the caller. Nothing here retries or imposes
//! timeouts; a stalled peer blocks the command until the caller's
//! connection layer gives up.

use crate::error::{AppError, Result};
use crate::models::TransferResult;
use async_trait::async_trait;
use chrono::Utc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

/// Chunk size for streaming payload in both directions
const PAYLOAD_CHUNK: usize = 16 * 1024;

/// An open test connection that can execute protocol commands.
///
/// Mock implementations drive the prober and sampler in tests; the
/// production implementation is [`TcpTestConnection`].
#[async_trait]
pub trait TestConnection: Send {
    /// Issue one round-trip probe and return its round-trip time
    async fn ping(&mut self) -> Result<Duration>;

    /// Pull `bytes` payload bytes from the server
    async fn download(&mut self, bytes: u64) -> Result<TransferResult>;

    /// Push `bytes` payload bytes to the server and await the ack
    async fn upload(&mut self, bytes: u64) -> Result<TransferResult>;
}

/// Factory for opening test connections to a server host
#[async_trait]
pub trait Connector: Send + Sync {
    /// Connect to `host` (in `host:port` form) and complete the greeting
    async fn connect(&self, host: &str) -> Result<Box<dyn TestConnection>>;
}

/// TCP implementation of the test protocol
#[derive(Debug)]
pub struct TcpTestConnection {
    stream: BufReader<TcpStream>,
}

impl TcpTestConnection {
    /// Open a TCP connection and perform the HI/HELLO greeting exchange
    pub async fn open(host: &str) -> Result<Self> {
        let stream = TcpStream::connect(host)
            .await
            .map_err(|e| AppError::connection(format!("Failed to connect to {}: {}", host, e)))?;

        let mut conn = Self {
            stream: BufReader::new(stream),
        };
        conn.greet().await?;
        Ok(conn)
    }

    async fn greet(&mut self) -> Result<()> {
        self.send_line("HI").await?;
        let reply = self.read_line().await?;
        if !reply.starts_with("HELLO") {
            return Err(AppError::protocol(format!(
                "Unexpected greeting reply: {:?}",
                reply
            )));
        }
        Ok(())
    }

    async fn send_line(&mut self, line: &str) -> Result<()> {
        let writer = self.stream.get_mut();
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        Ok(())
    }

    async fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = self.stream.read_line(&mut line).await?;
        if read == 0 {
            return Err(AppError::connection("Connection closed by server"));
        }
        Ok(line.trim_end().to_string())
    }

    /// Read and discard exactly `bytes` payload bytes
    async fn drain_payload(&mut self, bytes: u64) -> Result<()> {
        let mut remaining = bytes;
        let mut chunk = [0u8; PAYLOAD_CHUNK];
        while remaining > 0 {
            let want = remaining.min(PAYLOAD_CHUNK as u64) as usize;
            let read = self.stream.read(&mut chunk[..want]).await?;
            if read == 0 {
                return Err(AppError::connection(format!(
                    "Connection closed with {} payload bytes outstanding",
                    remaining
                )));
            }
            remaining -= read as u64;
        }
        Ok(())
    }

    /// Write exactly `bytes` filler bytes, terminated by a newline so the
    /// server can frame the payload with a line read. Streams in fixed
    /// chunks; the transfer size is never materialized in one buffer.
    async fn send_payload(&mut self, bytes: u64) -> Result<()> {
        if bytes == 0 {
            return Ok(());
        }

        let chunk = [b'9'; PAYLOAD_CHUNK];
        let mut remaining = bytes - 1;
        let writer = self.stream.get_mut();
        while remaining > 0 {
            let want = remaining.min(PAYLOAD_CHUNK as u64) as usize;
            writer.write_all(&chunk[..want]).await?;
            remaining -= want as u64;
        }
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl TestConnection for TcpTestConnection {
    async fn ping(&mut self) -> Result<Duration> {
        let started = Instant::now();
        self.send_line(&format!("PING {}", Utc::now().timestamp_millis()))
            .await?;
        let reply = self.read_line().await?;
        let rtt = started.elapsed();

        if !reply.starts_with("PONG") {
            return Err(AppError::protocol(format!(
                "Unexpected ping reply: {:?}",
                reply
            )));
        }
        Ok(rtt)
    }

    async fn download(&mut self, bytes: u64) -> Result<TransferResult> {
        let start = Utc::now();
        self.send_line(&format!("DOWNLOAD {}", bytes)).await?;
        self.drain_payload(bytes).await?;
        let finish = Utc::now();

        Ok(TransferResult::new(start, finish, bytes))
    }

    async fn upload(&mut self, bytes: u64) -> Result<TransferResult> {
        let start = Utc::now();
        self.send_line(&format!("UPLOAD {} 0", bytes)).await?;
        self.send_payload(bytes).await?;
        let reply = self.read_line().await?;
        let finish = Utc::now();

        if !reply.starts_with("OK") {
            return Err(AppError::protocol(format!(
                "Unexpected upload ack: {:?}",
                reply
            )));
        }
        Ok(TransferResult::new(start, finish, bytes))
    }
}

/// Connector producing [`TcpTestConnection`] handles
#[derive(Debug, Clone, Default)]
pub struct TcpConnector;

impl TcpConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(&self, host: &str) -> Result<Box<dyn TestConnection>> {
        let conn = TcpTestConnection::open(host).await?;
        Ok(Box::new(conn))
    }
}
