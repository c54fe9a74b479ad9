use std::fmt::{self, Display};

use enrich_core::{err::Error, event::Event};

use crate::common::{ConnectionDescriptor, QuerySpec};

/// Executes lookups against a database and merges the results into events
pub trait QueryEngine: Sized {
    /// Loads the driver and validates connectivity
    fn setup(descriptor: &ConnectionDescriptor, spec: &QuerySpec) -> Result<Self, SetupError>;

    /// Performs the lookup for the supplied event.
    ///
    /// On success the result rows are written to the target field. On failure the
    /// failure tags are appended and the event is otherwise left untouched.
    /// This never fails: errors are reported on the event itself.
    fn process(&mut self, event: Event) -> Event;
}

/// Failures while setting up a query engine
#[derive(Debug)]
pub enum SetupError {
    /// No driver is available for the requested identifier
    DriverUnavailable(String),
    /// The statement or target could not be understood
    Configuration(Error),
    /// The connection uri could not be parsed
    MalformedUri(Error),
    /// The database is unreachable or rejected the credentials
    Connection(Error),
}

impl Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::DriverUnavailable(driver) => {
                write!(f, "Driver \"{}\" is not available", driver)
            }
            SetupError::Configuration(err) => write!(f, "Invalid query configuration: {:#}", err),
            SetupError::MalformedUri(err) => write!(f, "Malformed connection uri: {:#}", err),
            SetupError::Connection(err) => write!(f, "Failed to connect: {:#}", err),
        }
    }
}

impl std::error::Error for SetupError {}
