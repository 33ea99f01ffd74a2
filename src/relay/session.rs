// ABOUTME: Rendezvous URL parsing and the session protocol itself.
// ABOUTME: Generic over the stream so the protocol runs the same over TLS or in-memory pipes.

use snafu::{OptionExt, ResultExt};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use url::Url;

use super::error::{InvalidUrlSnafu, RelayError, StreamSnafu};
use super::{EXIT_STATUS_MARKER, SessionOutcome};

const RENDEZVOUS_SCHEME: &str = "rendezvous";
const DEFAULT_PORT: u16 = 5000;
/// First line the server sends once the secret is accepted.
const HANDSHAKE_LINE: &[u8] = b"rendezvous";

/// Endpoint and secret extracted from a rendezvous URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendezvousTarget {
    pub host: String,
    pub port: u16,
    pub secret: String,
}

impl RendezvousTarget {
    /// Parse `rendezvous://host[:port]/secret`.
    pub fn parse(raw: &str) -> Result<Self, RelayError> {
        let url = Url::parse(raw).map_err(|e| {
            InvalidUrlSnafu {
                url: raw,
                reason: e.to_string(),
            }
            .build()
        })?;

        if url.scheme() != RENDEZVOUS_SCHEME {
            return InvalidUrlSnafu {
                url: raw,
                reason: format!("unexpected scheme '{}'", url.scheme()),
            }
            .fail();
        }

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .context(InvalidUrlSnafu {
                url: raw,
                reason: "missing host",
            })?
            .to_string();

        let secret = url.path().trim_start_matches('/').to_string();
        if secret.is_empty() {
            return InvalidUrlSnafu {
                url: raw,
                reason: "missing secret",
            }
            .fail();
        }

        Ok(Self {
            host,
            port: url.port().unwrap_or(DEFAULT_PORT),
            secret,
        })
    }
}

/// Run a rendezvous session over an established stream.
///
/// Sends the secret, then copies everything the remote side writes to `out`
/// until it closes the stream. Exit-status marker lines are consumed rather
/// than copied.
pub async fn relay_session<S, W>(
    stream: S,
    secret: &str,
    mut out: W,
) -> Result<SessionOutcome, RelayError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    W: AsyncWrite + Unpin,
{
    let (reader, mut writer) = tokio::io::split(stream);
    writer
        .write_all(format!("{secret}\r\n").as_bytes())
        .await
        .context(StreamSnafu)?;
    writer.flush().await.context(StreamSnafu)?;

    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();
    let mut exit_status = None;
    let mut first_line = true;

    loop {
        line.clear();
        let n = reader
            .read_until(b'\n', &mut line)
            .await
            .context(StreamSnafu)?;
        if n == 0 {
            break;
        }

        if std::mem::take(&mut first_line) && line.trim_ascii() == HANDSHAKE_LINE {
            continue;
        }

        match split_marker(&line) {
            Some((before, status)) => {
                out.write_all(before).await.context(StreamSnafu)?;
                if !before.is_empty() {
                    out.write_all(b"\n").await.context(StreamSnafu)?;
                }
                exit_status = status.or(exit_status);
            }
            None => out.write_all(&line).await.context(StreamSnafu)?,
        }
    }

    out.flush().await.context(StreamSnafu)?;
    Ok(SessionOutcome { exit_status })
}

/// Split a line at the exit-status marker, returning the text before it and
/// the parsed status.
fn split_marker(line: &[u8]) -> Option<(&[u8], Option<i32>)> {
    let marker = EXIT_STATUS_MARKER.as_bytes();
    let pos = line.windows(marker.len()).position(|w| w == marker)?;
    let status = std::str::from_utf8(&line[pos + marker.len()..])
        .ok()
        .and_then(|rest| rest.trim().parse().ok());
    Some((&line[..pos], status))
}
