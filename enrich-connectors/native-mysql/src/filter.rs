use enrich_connectors_base::{
    common::{ConnectionDescriptor, QuerySpec},
    interface::QueryEngine,
};
use enrich_core::{
    err::{bail, Error, Result},
    event::Event,
};
use enrich_logging::{error, info};
use enum_as_inner::EnumAsInner;

use crate::{MysqlLookupConfig, MysqlLookupEngine};

/// Enriches events with the results of a lookup against a mysql database.
///
/// The filter is registered once, which sets up the query engine and checks
/// the database is reachable. Events can only be filtered after a successful
/// registration. A failed registration is terminal.
pub struct MysqlLookupFilter<E: QueryEngine = MysqlLookupEngine> {
    config: MysqlLookupConfig,
    descriptor: ConnectionDescriptor,
    spec: QuerySpec,
    state: FilterState<E>,
}

enum FilterState<E> {
    Unregistered,
    Ready(E),
    Failed,
}

/// The lifecycle of a lookup filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumAsInner)]
pub enum FilterStatus {
    Unregistered,
    Ready,
    Failed,
}

impl<E: QueryEngine> MysqlLookupFilter<E> {
    pub fn new(config: MysqlLookupConfig) -> Self {
        Self {
            descriptor: config.connection_descriptor(),
            spec: config.query_spec(),
            config,
            state: FilterState::Unregistered,
        }
    }

    pub fn config(&self) -> &MysqlLookupConfig {
        &self.config
    }

    pub fn connection_descriptor(&self) -> &ConnectionDescriptor {
        &self.descriptor
    }

    pub fn query_spec(&self) -> &QuerySpec {
        &self.spec
    }

    pub fn status(&self) -> FilterStatus {
        match self.state {
            FilterState::Unregistered => FilterStatus::Unregistered,
            FilterState::Ready(_) => FilterStatus::Ready,
            FilterState::Failed => FilterStatus::Failed,
        }
    }

    /// The query engine, once registered
    pub fn engine(&self) -> Option<&E> {
        match &self.state {
            FilterState::Ready(engine) => Some(engine),
            _ => None,
        }
    }

    /// Sets up the query engine
    pub fn register(&mut self) -> Result<()> {
        if !self.status().is_unregistered() {
            bail!(
                "Mysql lookup filter for {} has already been registered",
                self.descriptor.uri
            );
        }

        match E::setup(&self.descriptor, &self.spec) {
            Ok(engine) => {
                info!(
                    "Registered mysql lookup filter for {}, writing results to \"{}\"",
                    self.descriptor.uri, self.spec.target
                );
                self.state = FilterState::Ready(engine);
                Ok(())
            }
            Err(err) => {
                error!(
                    "Failed to register mysql lookup filter for {}: {}",
                    self.descriptor.uri, err
                );
                self.state = FilterState::Failed;
                Err(Error::new(err).context(format!(
                    "Failed to register mysql lookup filter for {}",
                    self.descriptor.uri
                )))
            }
        }
    }

    /// Passes the event to the query engine.
    ///
    /// Lookup failures are reported by tagging the returned event, an
    /// error is only returned when the filter is not ready.
    pub fn filter(&mut self, event: Event) -> Result<Event> {
        match &mut self.state {
            FilterState::Ready(engine) => Ok(engine.process(event)),
            FilterState::Unregistered => bail!("Mysql lookup filter has not been registered"),
            FilterState::Failed => bail!("Mysql lookup filter failed to register"),
        }
    }
}
