//! Transport module - endpoints, sessions and the gRPC channel

mod grpc;
mod traits;

pub use grpc::GrpcTransport;
pub use traits::VectorTransport;

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{Error, Result, TransportError};

/// Trust material for an encrypted channel
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// PEM-encoded CA certificate
    Certificate(Vec<u8>),
    /// The platform's trust store
    SystemTrust,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Certificate(pem) => write!(f, "Certificate({} bytes)", pem.len()),
            Credential::SystemTrust => f.write_str("SystemTrust"),
        }
    }
}

/// Validated server address plus security settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    host_port: String,
    secure: bool,
    credential: Option<Credential>,
}

impl Endpoint {
    /// Plaintext endpoint
    pub fn plaintext(address: &str) -> Result<Self> {
        validate_address(address)?;
        Ok(Self {
            host_port: address.to_string(),
            secure: false,
            credential: None,
        })
    }

    /// Encrypted endpoint
    pub fn secure(address: &str, credential: Credential) -> Result<Self> {
        validate_address(address)?;
        Ok(Self {
            host_port: address.to_string(),
            secure: true,
            credential: Some(credential),
        })
    }

    /// Build from config, reading the certificate file if one is named
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        if !config.use_tls {
            if let Some(path) = &config.cert_file {
                warn!("cert_file {:?} ignored because use_tls is off", path);
            }
            return Self::plaintext(&config.address);
        }

        let credential = match &config.cert_file {
            Some(path) => {
                let pem = std::fs::read(path).map_err(|e| {
                    Error::Configuration(format!("failed to read certificate {:?}: {}", path, e))
                })?;
                Credential::Certificate(pem)
            }
            None => Credential::SystemTrust,
        };
        Self::secure(&config.address, credential)
    }

    pub fn host_port(&self) -> &str {
        &self.host_port
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub(crate) fn uri(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{}://{}", scheme, self.host_port)
    }
}

fn validate_address(address: &str) -> Result<()> {
    let invalid = |reason: &str| {
        Error::Configuration(format!("malformed address '{}': {}", address, reason))
    };

    let (host, port) = address
        .rsplit_once(':')
        .ok_or_else(|| invalid("expected host:port"))?;

    if host.is_empty() {
        return Err(invalid("missing host"));
    }
    if host.chars().any(|c| c.is_whitespace() || c == '/') {
        return Err(invalid("host contains invalid characters"));
    }
    let bracketed = host.starts_with('[') && host.ends_with(']');
    if host.contains(':') && !bracketed {
        return Err(invalid("IPv6 hosts must be bracketed"));
    }
    match port.parse::<u16>() {
        Ok(0) | Err(_) => Err(invalid("port must be in 1-65535")),
        Ok(_) => Ok(()),
    }
}

/// One open channel to a server; `Open -> Closed`, closed is terminal
pub struct Session {
    target: String,
    transport: Mutex<Option<Arc<dyn VectorTransport>>>,
    closed: watch::Sender<bool>,
}

impl Session {
    /// Open a lazily connecting gRPC session
    ///
    /// No network traffic happens here; an unreachable server is reported
    /// by the first call.
    pub fn open(endpoint: &Endpoint, config: &ClientConfig) -> Result<Self> {
        let transport = GrpcTransport::connect_lazy(endpoint, config)?;
        info!(
            "Opened session to {} ({})",
            endpoint.host_port(),
            if endpoint.is_secure() { "tls" } else { "plaintext" }
        );
        Ok(Self::with_target(endpoint.host_port().to_string(), Arc::new(transport)))
    }

    /// Wrap an existing transport
    pub fn from_transport(transport: Arc<dyn VectorTransport>) -> Self {
        Self::with_target("custom transport".to_string(), transport)
    }

    fn with_target(target: String, transport: Arc<dyn VectorTransport>) -> Self {
        let (closed, _) = watch::channel(false);
        Self {
            target,
            transport: Mutex::new(Some(transport)),
            closed,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    /// Release the transport; calling it again is a no-op
    pub fn close(&self) {
        if self.closed.send_replace(true) {
            return;
        }
        let transport = self
            .transport
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(transport);
        info!("Closed session to {}", self.target);
    }

    fn transport(&self) -> Result<Arc<dyn VectorTransport>> {
        self.transport
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| TransportError::SessionClosed.into())
    }

    /// Run one call against the transport
    ///
    /// Fails with `SessionClosed` if the session is closed before the call
    /// starts or while it is in flight.
    pub(crate) async fn call<T, F, Fut>(&self, operation: &'static str, f: F) -> Result<T>
    where
        F: FnOnce(Arc<dyn VectorTransport>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let transport = self.transport()?;
        let mut closed = self.closed.subscribe();
        debug!("{} -> {}", operation, self.target);

        tokio::select! {
            result = f(transport) => result,
            _ = closed.wait_for(|closed| *closed) => {
                debug!("{} interrupted by session close", operation);
                Err(TransportError::SessionClosed.into())
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("target", &self.target)
            .field("closed", &self.is_closed())
            .finish()
    }
}
