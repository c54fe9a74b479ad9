use enrich_connectors_base::{
    common::{LookupQuery, ResultSet},
    interface::Connection,
};
use enrich_core::{
    data::DataValue,
    err::{Context, Result},
};
use enrich_logging::warn;
use mysql_async::{prelude::Queryable, Conn, Params, Row, Value};

use crate::{from_mysql, runtime::runtime, to_mysql};

/// Connection to a mysql database
pub struct MysqlConnection {
    /// The underlying connection, taken when closed
    conn: Option<Conn>,
}

impl MysqlConnection {
    pub fn new(conn: Conn) -> Self {
        Self { conn: Some(conn) }
    }

    fn conn(&mut self) -> Result<&mut Conn> {
        self.conn.as_mut().context("Connection has been closed")
    }

    /// Gracefully disconnects from the server
    pub fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            runtime()
                .block_on(conn.disconnect())
                .context("Failed to disconnect from mysql server")?;
        }

        Ok(())
    }
}

impl Connection for MysqlConnection {
    fn ping(&mut self) -> Result<()> {
        let conn = self.conn()?;

        runtime()
            .block_on(conn.ping())
            .context("Failed to ping mysql server")
    }

    fn execute(&mut self, query: &LookupQuery, params: Vec<DataValue>) -> Result<ResultSet> {
        let params = if params.is_empty() {
            Params::Empty
        } else {
            Params::Positional(params.into_iter().map(to_mysql).collect())
        };

        let conn = self.conn()?;
        let rows: Vec<Row> = runtime().block_on(conn.exec(query.sql(), params))?;

        into_result_set(rows)
    }
}

impl Drop for MysqlConnection {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!("{:#}", err);
        }
    }
}

fn into_result_set(rows: Vec<Row>) -> Result<ResultSet> {
    let cols = match rows.first() {
        Some(row) => row
            .columns_ref()
            .iter()
            .map(|c| c.name_str().into_owned())
            .collect(),
        None => vec![],
    };

    let rows = rows
        .into_iter()
        .map(|mut row| {
            (0..row.len())
                .map(|i| from_mysql(row.take::<Value, _>(i).unwrap_or(Value::NULL)))
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    ResultSet::new(cols, rows)
}
