use derive_more::{AsRef, Debug, Display, From};

/// Client address token exactly as it appeared in the log line.
#[derive(Debug, Display, AsRef, From, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientIp(String);

impl ClientIp {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for ClientIp {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

/// Requested path or URI token from the request line.
#[derive(Debug, Display, AsRef, From, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Resource(String);

impl Resource {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for Resource {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}
