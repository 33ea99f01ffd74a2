// ABOUTME: Rendezvous relay: attaches to a one-off platform process and streams its output.
// ABOUTME: Also defines the exit-status marker that lets a session report the remote exit code.

mod error;
mod session;

pub use error::{RelayError, RelayErrorKind};
pub use session::{RendezvousTarget, relay_session};

use async_trait::async_trait;
use snafu::{OptionExt, ResultExt};
use std::time::Duration;
use tokio::net::TcpStream;

use error::{ConnectSnafu, ConnectTimeoutSnafu, SessionTimeoutSnafu, TlsSnafu};

/// Marker echoed after an attached command so its exit code can be read back.
pub const EXIT_STATUS_MARKER: &str = "\u{FFFF} headless-command-exit-status:";

/// Append the exit-status echo to a remote shell command.
///
/// The echo goes on its own line so commands ending in `;`, `&`, a comment
/// or a newline still parse.
pub fn with_exit_status(command: &str) -> String {
    format!("{command}\necho \"{EXIT_STATUS_MARKER} $?\"")
}

/// How an attached session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionOutcome {
    /// Remote exit code, when the marker made it through the stream.
    pub exit_status: Option<i32>,
}

impl SessionOutcome {
    /// A session without a reported exit status is treated as successful.
    pub fn success(&self) -> bool {
        self.exit_status.is_none_or(|code| code == 0)
    }
}

/// Attaches to a remote process given its rendezvous URL.
#[async_trait]
pub trait StreamRelay: Send + Sync {
    /// Block until the remote side closes the session.
    async fn attach(&self, url: &str) -> Result<SessionOutcome, RelayError>;
}

/// TLS rendezvous client writing the remote output to stdout.
#[derive(Debug, Clone)]
pub struct RendezvousRelay {
    connect_timeout: Duration,
    session_timeout: Duration,
}

impl RendezvousRelay {
    pub fn new(connect_timeout: Duration, session_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            session_timeout,
        }
    }
}

#[async_trait]
impl StreamRelay for RendezvousRelay {
    async fn attach(&self, url: &str) -> Result<SessionOutcome, RelayError> {
        let target = RendezvousTarget::parse(url)?;
        let (host, port) = (target.host.as_str(), target.port);
        tracing::info!("Attaching to rendezvous session at {}:{}", host, port);

        let tcp = tokio::time::timeout(self.connect_timeout, TcpStream::connect((host, port)))
            .await
            .ok()
            .context(ConnectTimeoutSnafu {
                host,
                port,
                timeout: self.connect_timeout,
            })?
            .context(ConnectSnafu { host, port })?;

        let connector = crate::tls::connector().context(TlsSnafu { host })?;
        let name = crate::tls::server_name(host).context(TlsSnafu { host })?;
        let stream = connector
            .connect(name, tcp)
            .await
            .context(TlsSnafu { host })?;

        let session = relay_session(stream, &target.secret, tokio::io::stdout());
        let outcome = tokio::time::timeout(self.session_timeout, session)
            .await
            .ok()
            .context(SessionTimeoutSnafu {
                timeout: self.session_timeout,
            })??;

        tracing::info!(
            "Rendezvous session closed (exit status: {:?})",
            outcome.exit_status
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_status_echo_is_appended() {
        assert_eq!(
            with_exit_status("rake db:migrate"),
            "rake db:migrate\necho \"\u{FFFF} headless-command-exit-status: $?\""
        );
    }

    #[test]
    fn unknown_exit_status_counts_as_success() {
        assert!(SessionOutcome { exit_status: None }.success());
        assert!(SessionOutcome {
            exit_status: Some(0)
        }
        .success());
        assert!(!SessionOutcome {
            exit_status: Some(2)
        }
        .success());
    }
}
