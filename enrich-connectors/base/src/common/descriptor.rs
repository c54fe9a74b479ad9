use enrich_core::secret::Secret;
use serde::Serialize;

/// Describes how to reach a database
///
/// The password is held as a [`Secret`] so the descriptor is safe to log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionDescriptor {
    /// Identifier of the driver used to connect, eg 'native.mysql'
    pub driver: String,
    /// The connection uri, eg 'mysql://localhost:3306/world'
    pub uri: String,
    /// Connection username
    pub user: Option<String>,
    /// Connection password, `None` connects without a credential
    pub password: Option<Secret>,
}

impl ConnectionDescriptor {
    pub fn new(
        driver: impl Into<String>,
        uri: impl Into<String>,
        user: Option<String>,
        password: Option<Secret>,
    ) -> Self {
        Self {
            driver: driver.into(),
            uri: uri.into(),
            user,
            password,
        }
    }
}
