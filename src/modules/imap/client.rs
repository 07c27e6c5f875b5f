// Copyright © 2025 CattyMail
// Licensed under CattyMail License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use crate::modules::error::code::ErrorCode;
use crate::modules::error::CattyMailResult;
use crate::modules::imap::session::SessionStream;
use crate::modules::imap::tls::establish_tls_stream;
use crate::raise_error;
use async_imap::Client as ImapClient;
use async_imap::Session as ImapSession;
use std::net::SocketAddr;
use std::net::ToSocketAddrs;
use std::ops::Deref;
use std::ops::DerefMut;
use std::pin::Pin;
use std::time::Duration;
use tokio::io::BufWriter;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_io_timeout::TimeoutStream;
use tracing::debug;

const TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug)]
pub(crate) struct Client {
    inner: ImapClient<Box<dyn SessionStream>>,
}

impl Deref for Client {
    type Target = ImapClient<Box<dyn SessionStream>>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for Client {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl Client {
    fn new(stream: Box<dyn SessionStream>) -> Self {
        Self {
            inner: ImapClient::new(stream),
        }
    }

    pub(crate) async fn login(
        self,
        username: &str,
        password: &str,
    ) -> CattyMailResult<ImapSession<Box<dyn SessionStream>>> {
        let Client { inner, .. } = self;
        let session = inner.login(username, password).await.map_err(|(e, _)| {
            raise_error!(format!("{:#?}", e), ErrorCode::ImapAuthenticationFailed)
        })?;
        Ok(session)
    }

    /// Open an implicit-TLS connection to the upstream catch-all host and
    /// consume the server greeting.
    pub(crate) async fn connection(
        host: &str,
        port: u16,
        verify_certificate: bool,
    ) -> CattyMailResult<Self> {
        let resolved_addr = Self::resolve_to_socket_addr(host, port)?;
        debug!("Attempting IMAP connection to {host} ({resolved_addr}).");

        let tcp_stream = Self::establish_tcp_connection_with_timeout(resolved_addr).await?;
        let tls_stream = establish_tls_stream(host, verify_certificate, tcp_stream).await?;
        let buffered_stream = BufWriter::new(tls_stream);
        let session_stream: Box<dyn SessionStream> = Box::new(buffered_stream);
        let mut client = Client::new(session_stream);

        let _greeting = client
            .read_response()
            .await
            .ok_or_else(|| {
                raise_error!(
                    "failed to read greeting".into(),
                    ErrorCode::ImapCommandFailed
                )
            })?
            .map_err(|e| raise_error!(format!("{:#?}", e), ErrorCode::ImapCommandFailed))?;

        Ok(client)
    }

    async fn establish_tcp_connection_with_timeout(
        address: SocketAddr,
    ) -> CattyMailResult<Pin<Box<TimeoutStream<TcpStream>>>> {
        let tcp_stream = timeout(TIMEOUT, TcpStream::connect(address))
            .await
            .map_err(|_| {
                raise_error!(
                    format!("Connection to {} timed out", address),
                    ErrorCode::ConnectionTimeout
                )
            })?
            .map_err(|e| raise_error!(e.to_string(), ErrorCode::NetworkError))?;

        tcp_stream
            .set_nodelay(true)
            .map_err(|e| raise_error!(e.to_string(), ErrorCode::NetworkError))?;

        let mut timeout_stream = TimeoutStream::new(tcp_stream);
        timeout_stream.set_write_timeout(Some(TIMEOUT));
        timeout_stream.set_read_timeout(Some(TIMEOUT));

        Ok(Box::pin(timeout_stream))
    }

    fn resolve_to_socket_addr(host: &str, port: u16) -> CattyMailResult<SocketAddr> {
        if host.is_empty() || host.contains(|c: char| !c.is_ascii() && c != '.') {
            return Err(raise_error!(
                "Invalid host format".into(),
                ErrorCode::InvalidParameter
            ));
        }
        let address = format!("{}:{}", host, port);
        address
            .to_socket_addrs()
            .map_err(|e| raise_error!(e.to_string(), ErrorCode::NetworkError))?
            .next()
            .ok_or_else(|| {
                raise_error!(
                    format!("Could not resolve host {}", host),
                    ErrorCode::NetworkError
                )
            })
    }
}
