//! Operator acknowledgment before the launcher exits

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::debug;

/// Prompt shown while waiting for the operator
pub const PAUSE_PROMPT: &str = "Press Enter to continue . . .";

/// Waits for the operator before the process exits
#[async_trait]
pub trait Pause: Send + Sync {
    async fn wait(&self);
}

/// Prompts on stdout and waits for one line on stdin
#[derive(Debug, Clone, Default)]
pub struct ConsolePause;

impl ConsolePause {
    pub fn new() -> Self {
        Self
    }

    /// Prompt on `writer` and consume one line from `reader`.
    ///
    /// End of input or a read error counts as acknowledgment.
    pub async fn wait_on<R, W>(&self, reader: &mut R, writer: &mut W)
    where
        R: AsyncBufRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        if writer.write_all(PAUSE_PROMPT.as_bytes()).await.is_ok() {
            let _ = writer.flush().await;
        }

        let mut line = String::new();
        match reader.read_line(&mut line).await {
            Ok(0) => debug!("stdin closed, not waiting"),
            Ok(_) => {}
            Err(e) => debug!("Failed to read acknowledgment: {}", e),
        }
    }
}

#[async_trait]
impl Pause for ConsolePause {
    async fn wait(&self) {
        let mut stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        self.wait_on(&mut stdin, &mut stdout).await;
        let _ = stdout.write_all(b"\n").await;
        let _ = stdout.flush().await;
    }
}

/// Never waits
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPause;

#[async_trait]
impl Pause for NoPause {
    async fn wait(&self) {}
}

/// Pick the pause behavior for a configuration flag
pub fn for_config(pause: bool) -> Box<dyn Pause> {
    if pause {
        Box::new(ConsolePause::new())
    } else {
        Box::new(NoPause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_console_pause_prompts_and_consumes_one_line() {
        let mut input: &[u8] = b"\nnext line\n";
        let mut output = Vec::new();

        ConsolePause::new().wait_on(&mut input, &mut output).await;

        assert_eq!(String::from_utf8(output).unwrap(), PAUSE_PROMPT);
        assert_eq!(input, b"next line\n");
    }

    #[tokio::test]
    async fn test_console_pause_returns_on_eof() {
        let mut input: &[u8] = b"";
        let mut output = Vec::new();

        ConsolePause::new().wait_on(&mut input, &mut output).await;

        assert_eq!(String::from_utf8(output).unwrap(), PAUSE_PROMPT);
    }
}
