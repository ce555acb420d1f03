//! Text Line Protocol Server
//!
//! Accepts TCP connections and runs one task per connection. Each request
//! is a CR/LF-terminated line: the first whitespace-delimited token is
//! the command (case-insensitive), the rest are arguments. Values given
//! to SET/SETEX may span several tokens and are rejoined with single
//! spaces.

use std::path::{Path, PathBuf};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::cache::SharedStore;
use crate::snapshot;
use crate::tcp::Frame;

/// Runs the accept loop until the shutdown channel fires.
///
/// Each accepted connection gets its own task; in-flight connections
/// finish on their own after the listener closes.
pub async fn serve(
    listener: TcpListener,
    store: SharedStore,
    snapshot_path: PathBuf,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        let (socket, addr) = tokio::select! {
            result = listener.accept() => match result {
                Ok(conn) => conn,
                Err(e) => {
                    warn!("TCP accept error: {e}");
                    continue;
                }
            },
            _ = shutdown.recv() => {
                info!("TCP listener shutting down");
                break;
            }
        };

        debug!("TCP connection from {addr}");
        let store = store.clone();
        let snapshot_path = snapshot_path.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, store, snapshot_path).await {
                warn!("TCP connection {addr} error: {e}");
            }
            debug!("TCP connection {addr} closed");
        });
    }
}

/// Per-connection loop: read a line, run the command, write one frame.
async fn handle_connection(
    socket: TcpStream,
    store: SharedStore,
    snapshot_path: PathBuf,
) -> std::io::Result<()> {
    let (reader, mut writer) = socket.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let command = match tokens.next() {
            Some(token) => token.to_uppercase(),
            None => continue,
        };
        let args: Vec<&str> = tokens.collect();

        let response = execute(&command, &args, &store, &snapshot_path).await;
        writer.write_all(&response.to_bytes()).await?;
        writer.flush().await?;

        if command == "QUIT" {
            return Ok(());
        }
    }

    Ok(())
}

/// Maps one parsed command line onto the engine and a response frame.
async fn execute(command: &str, args: &[&str], store: &SharedStore, snapshot_path: &Path) -> Frame {
    match command {
        "PING" => Frame::Simple("PONG".to_string()),

        "SET" => {
            if args.len() < 2 {
                return wrong_arity("SET");
            }
            let value = args[1..].join(" ");
            match store.lock().await.set(args[0], &value) {
                Ok(()) => Frame::ok(),
                Err(e) => Frame::err(e),
            }
        }

        "GET" => {
            if args.is_empty() {
                return wrong_arity("GET");
            }
            match store.lock().await.get(args[0]) {
                Ok(value) => Frame::Bulk(value),
                Err(_) => Frame::Null,
            }
        }

        "DEL" | "DELETE" => {
            if args.is_empty() {
                return wrong_arity("DEL");
            }
            match store.lock().await.delete(args[0]) {
                Ok(()) => Frame::Integer(1),
                Err(_) => Frame::Integer(0),
            }
        }

        "EXISTS" => {
            if args.is_empty() {
                return wrong_arity("EXISTS");
            }
            let present = store.lock().await.exists(args[0]);
            Frame::Integer(if present { 1 } else { 0 })
        }

        "SETEX" => {
            if args.len() < 3 {
                return wrong_arity("SETEX");
            }
            let Ok(seconds) = args[1].parse::<i64>() else {
                return Frame::err("value is not an integer or out of range");
            };
            let value = args[2..].join(" ");
            match store.lock().await.set_with_ttl(args[0], &value, seconds) {
                Ok(()) => Frame::ok(),
                Err(e) => Frame::err(e),
            }
        }

        "TTL" => {
            if args.is_empty() {
                return wrong_arity("TTL");
            }
            match store.lock().await.ttl(args[0]) {
                Ok(Some(seconds)) => Frame::Integer(seconds),
                Ok(None) => Frame::Integer(-1),
                Err(_) => Frame::Integer(-2),
            }
        }

        "EXPIRE" => {
            if args.len() < 2 {
                return wrong_arity("EXPIRE");
            }
            let Ok(seconds) = args[1].parse::<i64>() else {
                return Frame::err("value is not an integer or out of range");
            };
            match store.lock().await.set_expiry(args[0], seconds) {
                Ok(()) => Frame::ok(),
                Err(e) => Frame::err(e),
            }
        }

        "KEYS" => {
            let keys = store.lock().await.keys();
            if keys.is_empty() {
                Frame::Null
            } else {
                Frame::bulk_array(keys)
            }
        }

        "SAVE" => match snapshot::save(store, snapshot_path).await {
            Ok(()) => Frame::ok(),
            Err(e) => Frame::err(e),
        },

        "LOAD" => match snapshot::load(store, snapshot_path).await {
            Ok(()) => Frame::ok(),
            Err(e) => Frame::err(e),
        },

        "CLEAR" => {
            store.lock().await.clear();
            Frame::ok()
        }

        "STATS" => {
            let guard = store.lock().await;
            let stats = guard.stats();
            let mut payload = String::new();
            payload.push_str(&format!("keys:{}\r\n", guard.len()));
            payload.push_str(&format!("capacity:{}\r\n", guard.capacity()));
            payload.push_str(&format!("hits:{}\r\n", stats.hits));
            payload.push_str(&format!("misses:{}\r\n", stats.misses));
            payload.push_str(&format!("evictions:{}\r\n", stats.evictions));
            Frame::Bulk(payload)
        }

        "HELP" => Frame::Bulk(HELP_TEXT.to_string()),

        "QUIT" => Frame::ok(),

        _ => Frame::Error(format!("ERR unknown command '{command}'")),
    }
}

fn wrong_arity(command: &str) -> Frame {
    Frame::err(format!(
        "wrong number of arguments for '{command}' command"
    ))
}

const HELP_TEXT: &str = "Commands:
  PING                        - Test connection
  SET <key> <value>           - Set a key-value pair
  GET <key>                   - Get value by key
  DEL <key>                   - Delete a key
  EXISTS <key>                - Check if key exists (1/0)
  SETEX <key> <sec> <value>   - Set with expiration
  TTL <key>                   - Get time to live
  EXPIRE <key> <seconds>      - Set expiration on key
  KEYS                        - List all keys
  SAVE                        - Save snapshot to disk
  LOAD                        - Load snapshot from disk
  CLEAR                       - Remove all keys
  STATS                       - Show statistics
  HELP                        - Show this help
  QUIT                        - Close connection";
