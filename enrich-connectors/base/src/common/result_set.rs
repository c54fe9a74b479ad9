use enrich_core::{
    data::DataValue,
    err::{ensure, Result},
};
use serde_json::{Map, Value};

/// The rows returned by a lookup
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    cols: Vec<String>,
    rows: Vec<Vec<DataValue>>,
}

impl ResultSet {
    pub fn new(cols: Vec<String>, rows: Vec<Vec<DataValue>>) -> Result<Self> {
        for (idx, row) in rows.iter().enumerate() {
            ensure!(
                row.len() == cols.len(),
                "Row {} has {} values but the result set has {} columns",
                idx,
                row.len(),
                cols.len()
            );
        }

        Ok(Self { cols, rows })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn cols(&self) -> &[String] {
        &self.cols
    }

    pub fn rows(&self) -> &[Vec<DataValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Converts the rows into an array of `{column: value}` objects
    pub fn into_json(self) -> Value {
        let cols = self.cols;

        Value::Array(
            self.rows
                .into_iter()
                .map(|row| {
                    Value::Object(
                        cols.iter()
                            .cloned()
                            .zip(row.into_iter().map(DataValue::into_json))
                            .collect::<Map<_, _>>(),
                    )
                })
                .collect(),
        )
    }
}
