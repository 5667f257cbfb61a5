//! One interactive request/response cycle.
//!
//! ```text
//! START → REGISTRY_RESOLVED → HANDLE_RESOLVED → INPUT_COLLECTED
//!       → CALL_DISPATCHED → (SUCCESS | FAILURE) → END
//! ```
//!
//! Any failure jumps straight to FAILURE. Nothing is retried. Prompts are
//! only printed once a handle has been resolved.

use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use super::RemoteDirectory;
use crate::transport::TcpConnector;
use crate::{
    // ---
    ConnectorPtr,
    Directory,
    DirectoryPtr,
    Endpoint,
    Result,
    RpcConfig,
    RpcError,
};

/// Printed before reading the first string.
pub const FIRST_PROMPT: &str = "Enter the first string:";

/// Printed before reading the second string.
pub const SECOND_PROMPT: &str = "Enter the second string:";

/// Prefix of the success line.
pub const RESULT_LABEL: &str = "Concatenated String is: ";

/// Prefix of the failure line.
const ERROR_LABEL: &str = "ERROR: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    RegistryResolved,
    HandleResolved,
    InputCollected,
    CallDispatched,
}

/// Drives the prompt → remote call → display cycle.
///
/// # Example
///
/// ```no_run
/// use concat_rpc::{RemoteConcatClient, RpcConfig};
/// use tokio::io::BufReader;
///
/// # async fn example() {
/// let client = RemoteConcatClient::with_tcp(RpcConfig::default());
///
/// let stdin = BufReader::new(tokio::io::stdin());
/// let mut stdout = tokio::io::stdout();
///
/// // Prints either "Concatenated String is: ..." or "ERROR: ..."
/// let _outcome = client.run(stdin, &mut stdout).await;
/// # }
/// ```
pub struct RemoteConcatClient {
    // ---
    config: RpcConfig,
    connector: ConnectorPtr,
}

impl RemoteConcatClient {
    /// Create a client resolving through `connector`.
    pub fn new(config: RpcConfig, connector: ConnectorPtr) -> Self {
        Self { config, connector }
    }

    /// Create a client speaking TCP, bounded by the config's timeout.
    pub fn with_tcp(config: RpcConfig) -> Self {
        let connector = Arc::new(TcpConnector::from_config(&config));
        Self::new(config, connector)
    }

    /// Run one cycle, reading from `input` and writing to `output`.
    ///
    /// Always ends with exactly one line: the labelled result on success,
    /// `ERROR: <message>` on failure, using [`RpcError::message`] without the
    /// kind prefix. The returned value mirrors that line so callers can tell
    /// failure kinds apart without parsing text.
    pub async fn run<R, W>(&self, input: R, output: &mut W) -> Result<String>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        // ---
        let outcome = self.cycle(input, output).await;

        let line = match &outcome {
            Ok(result) => format!("{RESULT_LABEL}{result}"),
            Err(e) => format!("{ERROR_LABEL}{}", e.message()),
        };

        let written = write_line(output, &line).await;
        if let Err(ref e) = written {
            crate::log_error!("{e}");
        }

        match (outcome, written) {
            (Err(e), _) => Err(e),
            (Ok(_), Err(e)) => Err(e),
            (Ok(result), Ok(())) => Ok(result),
        }
    }

    async fn cycle<R, W>(&self, input: R, output: &mut W) -> Result<String>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        // ---
        let mut phase = Phase::Start;
        let registry = self.config.registry_endpoint();

        let directory = match self.locate(&registry).await {
            Ok(directory) => directory,
            Err(e) => return Err(failed(phase, e)),
        };
        advance(&mut phase, Phase::RegistryResolved);

        let outcome = self.converse(directory.as_ref(), input, output, &mut phase).await;

        if let Err(e) = directory.close().await {
            crate::log_warn!("closing registry session failed: {e}");
        }

        outcome.map_err(|e| failed(phase, e))
    }

    async fn locate(&self, registry: &Endpoint) -> Result<DirectoryPtr> {
        let directory = RemoteDirectory::locate(registry, self.connector.clone()).await?;
        Ok(Arc::new(directory))
    }

    async fn converse<R, W>(
        &self,
        directory: &dyn Directory,
        mut input: R,
        output: &mut W,
        phase: &mut Phase,
    ) -> Result<String>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        // ---
        let service = directory.lookup(&self.config.service_name).await?;
        advance(phase, Phase::HandleResolved);

        write_line(output, FIRST_PROMPT).await?;
        let first = read_line(&mut input, "first").await?;

        write_line(output, SECOND_PROMPT).await?;
        let second = read_line(&mut input, "second").await?;
        advance(phase, Phase::InputCollected);

        advance(phase, Phase::CallDispatched);
        let result = service.input(&first, &second).await?;

        crate::log_info!("{} returned {} bytes", self.config.service_name, result.len());
        Ok(result)
    }
}

fn advance(phase: &mut Phase, next: Phase) {
    crate::log_debug!("{phase:?} -> {next:?}");
    *phase = next;
}

fn failed(phase: Phase, err: RpcError) -> RpcError {
    crate::log_debug!("failed after {phase:?}: {err}");
    err
}

/// Read one line, without its terminator.
///
/// End of input is an error; an absent line is never forwarded. Bytes that
/// are not UTF-8 are replaced with U+FFFD.
async fn read_line<R>(input: &mut R, which: &str) -> Result<String>
where
    R: AsyncBufRead + Unpin,
{
    // ---
    let mut buf = Vec::new();
    let n = input
        .read_until(b'\n', &mut buf)
        .await
        .map_err(|e| RpcError::Input(format!("cannot read the {which} string: {e}")))?;

    if n == 0 {
        return Err(RpcError::Input(format!(
            "standard input closed before the {which} string was entered"
        )));
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

async fn write_line<W>(output: &mut W, line: &str) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    // ---
    let console = |e: std::io::Error| RpcError::Input(format!("cannot write to console: {e}"));

    output.write_all(line.as_bytes()).await.map_err(console)?;
    output.write_all(b"\n").await.map_err(console)?;
    output.flush().await.map_err(console)
}
