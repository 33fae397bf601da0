use thiserror::Error;

/// Problems with the invocation itself; reported without touching the network.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no GitHub username given")]
    MissingHandle,

    #[error(
        "Github token missing. Please generate one and set it through the --token flag \
         or the GH_TOKEN environment variable"
    )]
    MissingToken,

    #[error("GitHub token contains characters not allowed in an HTTP header")]
    InvalidToken,

    #[error("invalid API url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The token was rejected (401).
    #[error("Your Github token seems to be invalid.")]
    Auth,

    /// The handle could not be resolved to a node id.
    #[error("Error fetching user ID: {0}")]
    Lookup(String),

    /// A paginated query failed at any level of the walk.
    #[error("Failed to execute request: {0}")]
    Query(String),

    #[error("building HTTP client: {0}")]
    Http(String),

    #[error("traversal deadline exceeded")]
    Cancelled,

    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Missing input exits cleanly; everything else is fatal.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(ConfigError::MissingHandle | ConfigError::MissingToken) => 0,
            _ => 1,
        }
    }
}
