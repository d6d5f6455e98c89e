//! Line I/O for UHP sessions over stdin/stdout or TCP.

use crate::config::EngineConfig;
use crate::session::{Session, CAPABILITIES, ENGINE_ID};
use std::net::SocketAddr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::{error, info};

/// Run a session until `exit` or end of input.
///
/// The engine announces itself on connect with the same lines `info` prints.
pub async fn serve<R, W>(session: &mut Session, reader: R, mut writer: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    write_lines(&mut writer, &[ENGINE_ID.to_string(), CAPABILITIES.to_string(), "ok".to_string()])
        .await?;

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let response = session.handle_line(&line);
        write_lines(&mut writer, &response).await?;
        if session.is_closed() {
            break;
        }
    }
    Ok(())
}

async fn write_lines<W>(writer: &mut W, lines: &[String]) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    for line in lines {
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
    }
    writer.flush().await?;
    Ok(())
}

/// Single session on the process's stdin and stdout
pub async fn run_stdio(config: &EngineConfig) -> anyhow::Result<()> {
    let mut session = Session::with_seed(config.seed);
    info!(session = %session.id, "UHP session on stdio");

    serve(&mut session, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
}

/// Accept TCP connections, each with its own session
pub async fn run_tcp(addr: SocketAddr, config: &EngineConfig) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("hive-engine listening on {}", addr);

    while let Ok((stream, peer_addr)) = listener.accept().await {
        let seed = config.seed;
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, seed).await {
                error!("Connection error from {}: {}", peer_addr, e);
            }
        });
    }

    Ok(())
}

async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let mut session = Session::with_seed(seed);
    info!(session = %session.id, peer = %addr, "new connection");

    let (read_half, write_half) = stream.into_split();
    serve(&mut session, BufReader::new(read_half), write_half).await?;

    info!(session = %session.id, peer = %addr, "connection closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn run(input: &str) -> Vec<String> {
        let mut session = Session::with_seed(Some(1));
        let mut output = Vec::new();
        serve(&mut session, input.as_bytes(), &mut output).await.unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }

    #[tokio::test]
    async fn test_serve_announces_and_answers() {
        let out = run("u1\nplay wS1\nundo\nexit\nplay wQ\n").await;
        assert_eq!(
            out,
            vec![ENGINE_ID, CAPABILITIES, "ok", "ok", "wS1", "ok", "ok"]
        );
    }

    #[tokio::test]
    async fn test_serve_stops_at_end_of_input() {
        let out = run("newgame Base\n").await;
        assert_eq!(out[3], "Base;NotStarted;White[1]");
        assert_eq!(out.len(), 5);
    }

    #[tokio::test]
    async fn test_serve_over_tcp() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (stream, peer) = listener.accept().await.unwrap();
            handle_connection(stream, peer, Some(5)).await.unwrap();
        });

        let mut client = TcpStream::connect(addr).await.unwrap();
        client.write_all(b"play wQ\nexit\n").await.unwrap();
        let mut reply = String::new();
        let mut reader = BufReader::new(client);
        let mut line = String::new();
        while reader.read_line(&mut line).await.unwrap() > 0 {
            reply.push_str(&line);
            line.clear();
        }
        assert_eq!(
            reply,
            format!("{ENGINE_ID}\n{CAPABILITIES}\nok\nwQ\nok\n")
        );
    }
}
