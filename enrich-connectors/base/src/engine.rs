use std::marker::PhantomData;

use enrich_core::{
    data::DataValue,
    err::{Context, Result},
    event::{Event, FieldRef},
};
use enrich_logging::{debug, info, warn, MaxLogLength};

use crate::{
    common::{ConnectionDescriptor, LookupQuery, ParameterBinding, QuerySpec, ResultSet},
    interface::{Connection, Connector, QueryEngine, SetupError},
};

const LOG_LIMIT: Option<usize> = Some(512);

/// A query engine which executes a parameterised lookup statement
/// through the connector `C`.
///
/// The engine holds a single connection. When a lookup fails and the
/// connection no longer responds it is dropped and re-opened on the next event.
pub struct SqlLookupEngine<C: Connector> {
    descriptor: ConnectionDescriptor,
    query: LookupQuery,
    parameters: ParameterBinding,
    target: FieldRef,
    tag_on_failure: Vec<String>,
    connection: Option<C::TConnection>,
    _connector: PhantomData<C>,
}

impl<C: Connector> QueryEngine for SqlLookupEngine<C> {
    fn setup(descriptor: &ConnectionDescriptor, spec: &QuerySpec) -> Result<Self, SetupError> {
        if descriptor.driver != C::TYPE {
            return Err(SetupError::DriverUnavailable(descriptor.driver.clone()));
        }

        let query = LookupQuery::parse(&spec.statement)
            .context("Failed to compile lookup statement")
            .map_err(SetupError::Configuration)?;
        let target = FieldRef::parse(&spec.target)
            .context("Failed to parse target field")
            .map_err(SetupError::Configuration)?;

        let mut connection = C::connect(descriptor)?;
        connection
            .ping()
            .with_context(|| format!("Database at {} did not respond", descriptor.uri))
            .map_err(SetupError::Connection)?;

        info!(
            "Lookup engine connected to {} using driver {}",
            descriptor.uri,
            C::TYPE
        );
        debug!("Compiled lookup statement: {:?}", MaxLogLength::new(LOG_LIMIT, &query.sql()));

        let engine = Self {
            descriptor: descriptor.clone(),
            query,
            parameters: spec.parameters.clone(),
            target,
            tag_on_failure: spec.tag_on_failure.clone(),
            connection: Some(connection),
            _connector: PhantomData,
        };

        // every lookup will fail until the binding is fixed, but the filter still starts
        for name in engine.unbound_placeholders() {
            warn!(
                "No event field is bound to placeholder :{}, lookups will be tagged as failed",
                name
            );
        }

        Ok(engine)
    }

    fn process(&mut self, mut event: Event) -> Event {
        match self.lookup(&event) {
            Ok(rs) => {
                debug!(
                    "Lookup returned {} rows into {}: {:?}",
                    rs.len(),
                    self.target,
                    MaxLogLength::new(LOG_LIMIT, &rs)
                );
                event.set(&self.target, rs.into_json());
            }
            Err(err) => {
                warn!("Lookup failed, tagging event: {:#}", err);
                for tag in self.tag_on_failure.iter() {
                    event.tag(tag.clone());
                }
            }
        }

        event
    }
}

impl<C: Connector> SqlLookupEngine<C> {
    pub fn descriptor(&self) -> &ConnectionDescriptor {
        &self.descriptor
    }

    pub fn query(&self) -> &LookupQuery {
        &self.query
    }

    /// Whether the engine currently holds an open connection
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Placeholders in the statement which have no event field bound to them
    pub fn unbound_placeholders(&self) -> Vec<&str> {
        self.query
            .placeholders()
            .into_iter()
            .filter(|name| self.parameters.get(name).is_none())
            .collect()
    }

    /// Resolves the positional parameter values for the supplied event
    pub fn bind(&self, event: &Event) -> Result<Vec<DataValue>> {
        self.query
            .params()
            .iter()
            .map(|name| {
                let field = self
                    .parameters
                    .get(name)
                    .with_context(|| format!("No field is bound to placeholder :{}", name))?;
                let field = FieldRef::parse(field)
                    .with_context(|| format!("Invalid field bound to placeholder :{}", name))?;
                let value = event.get(&field).with_context(|| {
                    format!("Event has no field {} for placeholder :{}", field, name)
                })?;

                Ok(DataValue::from_json(value))
            })
            .collect()
    }

    fn lookup(&mut self, event: &Event) -> Result<ResultSet> {
        let params = self.bind(event)?;

        if self.connection.is_none() {
            info!("Reconnecting lookup engine to {}", self.descriptor.uri);
            self.connection = Some(C::connect(&self.descriptor)?);
        }

        let connection = self
            .connection
            .as_mut()
            .context("Lookup engine has no open connection")?;

        match connection.execute(&self.query, params) {
            Ok(rs) => Ok(rs),
            Err(err) => {
                if let Err(ping) = connection.ping() {
                    warn!("Dropping unresponsive connection: {:#}", ping);
                    self.connection = None;
                }

                Err(err).context("Failed to execute lookup statement")
            }
        }
    }
}
