use std::io::{BufRead, Write};

use enrich_connectors_base::interface::QueryEngine;
use enrich_connectors_native_mysql::MysqlLookupFilter;
use enrich_core::{
    err::{Context, Result},
    event::{Event, FieldRef},
};
use enrich_logging::{debug, info, warn};
use serde_json::Value;

/// Tag added to input lines which are not JSON objects
pub const JSON_PARSE_FAILURE_TAG: &str = "_jsonparsefailure";

/// Counters reported once the input is exhausted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineStats {
    pub events: usize,
    pub parse_failures: usize,
}

/// Streams newline-delimited JSON events through a registered filter
pub struct Pipeline<E: QueryEngine> {
    filter: MysqlLookupFilter<E>,
}

impl<E: QueryEngine> Pipeline<E> {
    pub fn new(filter: MysqlLookupFilter<E>) -> Self {
        Self { filter }
    }

    /// Filters each line of `input` in order, writing one event per line to `output`
    pub fn run(&mut self, input: impl BufRead, mut output: impl Write) -> Result<PipelineStats> {
        let mut stats = PipelineStats::default();

        for line in input.lines() {
            let line = line.context("Failed to read event")?;
            if line.trim().is_empty() {
                continue;
            }

            let event = match parse_event(&line) {
                Some(event) => event,
                None => {
                    warn!("Received a line which is not a JSON object");
                    stats.parse_failures += 1;
                    let mut event = Event::new();
                    event.set(&FieldRef::parse("message")?, Value::String(line));
                    event.tag(JSON_PARSE_FAILURE_TAG);
                    event
                }
            };

            let event = self.filter.filter(event)?;
            stats.events += 1;

            serde_json::to_writer(&mut output, &event).context("Failed to write event")?;
            output.write_all(b"\n")?;
            output.flush()?;
        }

        debug!("Input exhausted");
        info!(
            "Processed {} events ({} unparseable)",
            stats.events, stats.parse_failures
        );

        Ok(stats)
    }
}

fn parse_event(line: &str) -> Option<Event> {
    match serde_json::from_str::<Value>(line) {
        Ok(value @ Value::Object(_)) => Event::from_json(value).ok(),
        _ => None,
    }
}
