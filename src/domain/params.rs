//! Canonical parameter record built from a decoded request.

use std::fmt;

use crate::domain::AppError;

/// Default etcd client port used when none was submitted.
pub const DEFAULT_CLIENT_PORT: u16 = 2379;
/// Default etcd peer port used when none was submitted.
pub const DEFAULT_PEER_PORT: u16 = 2380;

/// Description of where the request came from, kept as a comment in the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin(String);

impl Origin {
    /// Line breaks are folded into spaces so the value stays on one comment line.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let folded = raw
            .as_ref()
            .chars()
            .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
            .collect();
        Self(folded)
    }

    pub fn unknown() -> Self {
        Self("unknown".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Origin {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Peer-to-peer encryption switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encryption {
    On,
    #[default]
    Off,
}

impl Encryption {
    pub fn is_on(self) -> bool {
        matches!(self, Encryption::On)
    }
}

/// Parse the loose boolean spellings an HTML form may submit.
///
/// An empty value counts as unset.
pub fn parse_flag(field: &str, value: &str) -> Result<bool, AppError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "off" | "no" | "0" => Ok(false),
        "true" | "on" | "yes" | "1" => Ok(true),
        _ => Err(AppError::malformed(field, value, "expected true/false or on/off")),
    }
}

/// TCP port, always in `1..=65535`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Port(u16);

impl Port {
    pub fn parse(field: &str, value: &str) -> Result<Self, AppError> {
        let port = value
            .trim()
            .parse::<u16>()
            .map_err(|_| AppError::malformed(field, value, "expected a port number"))?;
        if port == 0 {
            return Err(AppError::malformed(field, value, "port must be positive"));
        }
        Ok(Self(port))
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

/// Every field a manifest template may consume, before derivation.
///
/// Built fresh for each request and dropped once the response is written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    pub origin: Origin,
    /// etcd peers in submission order.
    pub endpoints: Vec<String>,
    pub encryption: Encryption,
    pub initial_token: String,
    pub prefix: String,
    pub client_port: Option<Port>,
    pub peer_port: Option<Port>,
    pub directory: String,
    pub username: String,
    /// Raw Kubernetes version; normalized at render time.
    pub kube_version: String,
    /// Comma-separated storage devices.
    pub drives: String,
    pub force: bool,
    /// Comma-separated `NAME=value` pairs.
    pub env: String,
    /// Container runtime type, e.g. `docker` or `runc`.
    pub runtime_type: String,
    pub master: bool,
    pub openshift: bool,
    pub image: String,
}

impl Params {
    pub fn client_port(&self) -> u16 {
        self.client_port.map_or(DEFAULT_CLIENT_PORT, Port::get)
    }

    pub fn peer_port(&self) -> u16 {
        self.peer_port.map_or(DEFAULT_PEER_PORT, Port::get)
    }
}
