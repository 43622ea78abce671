use crate::client::ChatClient;
use crate::model::ModelService;
use crate::server::ToolServer;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

const PROMPT: &str = ">>> ";
const EXIT_COMMAND: &str = "exit";

/// Read-eval-print loop: one turn at a time, no history, no multi-line
/// input. A failed turn is printed and the loop continues; the exit sentinel
/// (or end of input) closes the session exactly once and returns.
pub async fn run<M, S, R, W>(mut client: ChatClient<M, S>, mut input: R, mut output: W) -> Result<()>
where
    M: ModelService,
    S: ToolServer,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let mut line = String::new();
        let read = input.read_line(&mut line).await?;
        let query = line.trim();
        if read == 0 || query.eq_ignore_ascii_case(EXIT_COMMAND) {
            client.shutdown().await?;
            output.write_all(b"bye\n").await?;
            output.flush().await?;
            return Ok(());
        }

        match client.process_query(query).await {
            Ok(answer) => {
                output.write_all(answer.as_bytes()).await?;
                output.write_all(b"\n").await?;
            }
            Err(error) => {
                tracing::error!(?error, "query turn failed");
                output
                    .write_all(format!("error: {error:?}\n").as_bytes())
                    .await?;
            }
        }
        output.flush().await?;
    }
}
