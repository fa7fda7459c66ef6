use anyhow::{Context, Result};
use nestkv::{Command, Session, SessionConfig};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::info;

/// Line-oriented front end: one command per line, `q` to quit
pub async fn run(config: SessionConfig) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    run_with(config, stdin, &mut stdout).await
}

pub async fn run_with<R, W>(config: SessionConfig, input: R, output: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let session = Session::start(config);
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        let command = Command::from_input(&line);
        if command == Command::Exit {
            info!("exit requested");
            break;
        }

        let view = session.apply(command).await?;
        if let Some(text) = view.display_line() {
            output.write_all(text.as_bytes()).await?;
            output.write_all(b"\n").await?;
            output.flush().await?;
        }
    }

    session.shutdown().await?;
    Ok(())
}
