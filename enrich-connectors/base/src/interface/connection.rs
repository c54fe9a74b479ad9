use enrich_core::{data::DataValue, err::Result};

use crate::common::{ConnectionDescriptor, LookupQuery, ResultSet};

use super::SetupError;

/// A connector opens connections to a specific database platform
pub trait Connector {
    type TConnection: Connection;

    /// The driver identifier of the connector, eg 'native.mysql'
    const TYPE: &'static str;

    /// Opens a connection described by the supplied descriptor
    fn connect(descriptor: &ConnectionDescriptor) -> Result<Self::TConnection, SetupError>;
}

/// An open connection to a database
pub trait Connection {
    /// Checks the connection is still usable
    fn ping(&mut self) -> Result<()>;

    /// Executes the query with the supplied positional parameters
    fn execute(&mut self, query: &LookupQuery, params: Vec<DataValue>) -> Result<ResultSet>;
}
