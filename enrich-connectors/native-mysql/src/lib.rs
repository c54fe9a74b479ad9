use std::time::Duration;

use enrich_connectors_base::{
    common::ConnectionDescriptor,
    interface::{Connector, SetupError},
    SqlLookupEngine,
};
use enrich_core::err::{Context, Error};
use enrich_logging::debug;
use mysql_async::{Conn, Opts, OptsBuilder};
use tokio::time::timeout;

mod conf;
pub use conf::*;
mod connection;
pub use connection::*;
mod data;
pub use data::*;
mod filter;
pub use filter::*;
mod runtime;

/// The uri scheme of mysql connection strings
pub const MYSQL_SCHEME: &str = "mysql";

/// How long to wait for the server to accept a connection
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// The connector for MySQL built on mysql_async
#[derive(Debug, Default)]
pub struct MysqlConnector;

impl Connector for MysqlConnector {
    type TConnection = MysqlConnection;

    const TYPE: &'static str = "native.mysql";

    fn connect(descriptor: &ConnectionDescriptor) -> Result<Self::TConnection, SetupError> {
        let opts = Opts::from_url(&descriptor.uri)
            .map_err(|err| {
                SetupError::MalformedUri(
                    Error::new(err).context(format!("Failed to parse \"{}\"", descriptor.uri)),
                )
            })?;

        let opts = OptsBuilder::from_opts(opts)
            .user(descriptor.user.clone())
            .pass(descriptor.password.as_ref().map(|p| p.reveal().to_string()));

        debug!("Connecting to mysql at {}", descriptor.uri);
        let conn = runtime::runtime()
            .block_on(async move { timeout(CONNECT_TIMEOUT, Conn::new(opts)).await })
            .with_context(|| format!("Timed out connecting to {}", descriptor.uri))
            .and_then(|res| res.with_context(|| format!("Failed to connect to {}", descriptor.uri)))
            .map_err(SetupError::Connection)?;

        Ok(MysqlConnection::new(conn))
    }
}

/// Lookup engine executing statements against mysql
pub type MysqlLookupEngine = SqlLookupEngine<MysqlConnector>;
