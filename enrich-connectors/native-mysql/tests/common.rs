#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use enrich_connectors_base::{
    common::{ConnectionDescriptor, QuerySpec},
    interface::{Connector, QueryEngine, SetupError},
    current_dir,
    test::{
        container::{retry, start_containers, ContainerInstances},
        memory::{self, MemoryConnection},
    },
    SqlLookupEngine,
};
use enrich_connectors_native_mysql::{
    MysqlConnection, MysqlConnector, MysqlLookupConfig, MysqlLookupOptions,
};
use enrich_core::{
    err::anyhow,
    event::{Event, FieldRef},
};
use serde_json::json;

/// Connects to in-memory databases while identifying as the mysql driver
pub struct FakeMysql;

impl Connector for FakeMysql {
    type TConnection = MemoryConnection;

    const TYPE: &'static str = MysqlConnector::TYPE;

    fn connect(descriptor: &ConnectionDescriptor) -> Result<Self::TConnection, SetupError> {
        memory::open(descriptor)
    }
}

pub type FakeMysqlEngine = SqlLookupEngine<FakeMysql>;

/// Query engine which records what it was set up with
pub struct RecordingEngine {
    pub descriptor: ConnectionDescriptor,
    pub spec: QuerySpec,
    pub processed: Arc<Mutex<usize>>,
}

impl QueryEngine for RecordingEngine {
    fn setup(descriptor: &ConnectionDescriptor, spec: &QuerySpec) -> Result<Self, SetupError> {
        Ok(Self {
            descriptor: descriptor.clone(),
            spec: spec.clone(),
            processed: Arc::new(Mutex::new(0)),
        })
    }

    fn process(&mut self, mut event: Event) -> Event {
        *self.processed.lock().unwrap() += 1;
        event.set(&FieldRef::parse(&self.spec.target).unwrap(), json!("recorded"));
        event
    }
}

/// Query engine whose setup always fails
pub struct UnreachableEngine;

impl QueryEngine for UnreachableEngine {
    fn setup(descriptor: &ConnectionDescriptor, _spec: &QuerySpec) -> Result<Self, SetupError> {
        Err(SetupError::Connection(anyhow!(
            "Could not reach {}",
            descriptor.uri
        )))
    }

    fn process(&mut self, _event: Event) -> Event {
        unreachable!()
    }
}

/// The country lookup used throughout the tests
pub fn country_options() -> MysqlLookupOptions {
    MysqlLookupOptions {
        host: Some("localhost".into()),
        default_schema: Some("world".into()),
        statement: Some("select * from country where code = :code".into()),
        parameters: [("code", "country_code")].into_iter().collect(),
        target: Some("country_details".into()),
        ..Default::default()
    }
}

pub fn country_config() -> MysqlLookupConfig {
    country_options().validate().unwrap()
}

pub fn event(value: serde_json::Value) -> Event {
    Event::from_json(value).unwrap()
}

/// The host port the mysql container publishes, see infra/docker-compose.yml
pub const MYSQL_PORT: u16 = 33061;

/// Starts the mysql container seeded with infra/world.sql
pub fn start_mysql() -> ContainerInstances {
    let infra_path = current_dir!().join("infra");
    start_containers(
        "enrich-mysql",
        infra_path,
        &[("mysql", MYSQL_PORT)],
        false,
        Duration::from_secs(180),
    )
}

/// Lookup options pointing at the mysql container
pub fn container_options() -> MysqlLookupOptions {
    MysqlLookupOptions {
        host: Some("127.0.0.1".into()),
        port: Some(MYSQL_PORT as i64),
        user: Some("enrich_test".into()),
        password: Some("enrich_testing".into()),
        ..country_options()
    }
}

pub fn container_descriptor() -> ConnectionDescriptor {
    container_options()
        .validate()
        .unwrap()
        .connection_descriptor()
}

/// Connects to the container, retrying while the server finishes initialising
pub fn connect_to_mysql() -> MysqlConnection {
    let descriptor = container_descriptor();
    retry(Duration::from_secs(120), || MysqlConnector::connect(&descriptor))
}
