//! Where command output ends up.
//!
//! Output goes either to stdout (`-`) or to a file. Text written to stdout is
//! newline-terminated; anything written to a file is written exactly as
//! given. Files are created, written, flushed and closed within a single call,
//! and the handle is dropped on every path out of it.

use bytes::Bytes;
use std::{
    convert::Infallible,
    fmt, io,
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
};
use thiserror::Error;
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::info;

/// Command-line sentinel meaning "standard output".
pub const STDOUT_SENTINEL: &str = "-";

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write to stdout: {0}")]
    Stdout(#[source] io::Error),
    #[error("failed to write `{path}`: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl FromStr for Destination {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == STDOUT_SENTINEL {
            Destination::Stdout
        } else {
            Destination::File(PathBuf::from(s))
        })
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Stdout => f.write_str(STDOUT_SENTINEL),
            Destination::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// What to write. The variant decides the write mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// UTF-8 text.
    Text(String),
    /// Bytes written verbatim.
    Binary(Bytes),
}

impl Payload {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Text(text) => text.as_bytes(),
            Payload::Binary(bytes) => &bytes[..],
        }
    }

    /// Payload for file content: lossy text for a terminal, exact bytes for
    /// a file.
    pub fn for_content(data: Bytes, destination: &Destination) -> Self {
        match destination {
            Destination::Stdout => Payload::Text(String::from_utf8_lossy(&data).into_owned()),
            Destination::File(_) => Payload::Binary(data),
        }
    }
}

/// Write `payload` to `destination`.
pub async fn write_output(payload: &Payload, destination: &Destination) -> Result<(), OutputError> {
    match destination {
        Destination::Stdout => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_terminal(&mut handle, payload).map_err(OutputError::Stdout)
        }
        Destination::File(path) => {
            write_file(path, payload)
                .await
                .map_err(|source| OutputError::File {
                    path: path.clone(),
                    source,
                })?;
            info!("Output saved to {}", path.display());
            Ok(())
        }
    }
}

/// Terminal convention: always end on a newline, add nothing else.
pub fn write_terminal<W: Write>(out: &mut W, payload: &Payload) -> io::Result<()> {
    let bytes = payload.as_bytes();
    out.write_all(bytes)?;
    if !bytes.ends_with(b"\n") {
        out.write_all(b"\n")?;
    }
    out.flush()
}

async fn write_file(path: &Path, payload: &Payload) -> io::Result<()> {
    let mut file = File::create(path).await?;
    file.write_all(payload.as_bytes()).await?;
    file.flush().await?;
    file.sync_all().await
}
