use std::fmt::{self, Display};

use enrich_connectors_base::{
    common::{ConnectionDescriptor, ParameterBinding, QuerySpec},
    interface::Connector,
};
use enrich_core::{
    config::{self, parse_options},
    err::Result,
    event::FieldRef,
    secret::Secret,
};
use serde::{Deserialize, Serialize};

use crate::{MysqlConnector, MYSQL_SCHEME};

/// The port used when none is configured
pub const DEFAULT_PORT: u16 = 3306;

/// The tag appended to events when a lookup fails, unless configured otherwise
pub const DEFAULT_FAILURE_TAG: &str = "_lookupfailure";

/// The options of the mysql lookup filter as they appear in the config file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MysqlLookupOptions {
    /// Database hostname
    pub host: Option<String>,
    /// Database port, defaults to 3306
    pub port: Option<i64>,
    /// Connection username
    pub user: Option<String>,
    /// Connection password
    pub password: Option<Secret>,
    /// Schema selected on connection
    pub default_schema: Option<String>,
    /// SQL text with `:name` placeholders
    pub statement: Option<String>,
    /// Placeholder name to event field
    #[serde(default)]
    pub parameters: ParameterBinding,
    /// Event field receiving the result set
    pub target: Option<String>,
    /// Tags appended on failure, defaults to ["_lookupfailure"]
    pub tag_on_failure: Option<Vec<String>>,
}

impl MysqlLookupOptions {
    pub fn parse(options: config::Value) -> Result<Self> {
        parse_options(options)
    }

    /// Checks every option, collecting all problems rather than stopping at the first
    pub fn validate(&self) -> Result<MysqlLookupConfig, InvalidConfig> {
        let mut errors = vec![];
        let mut error = |field: &'static str, message: String| {
            errors.push(FieldError::new(field, message))
        };

        let host = match self.host.as_deref().map(str::trim) {
            None | Some("") => {
                error("host", "is required".into());
                None
            }
            Some(host) if !is_valid_host(host) => {
                error("host", format!("\"{}\" is not a valid hostname", host));
                None
            }
            Some(host) => Some(host.to_string()),
        };

        let port = match self.port {
            None => Some(DEFAULT_PORT),
            Some(port) => match u16::try_from(port) {
                Ok(port) if port > 0 => Some(port),
                _ => {
                    error("port", format!("{} is not between 1 and 65535", port));
                    None
                }
            },
        };

        if let Some(schema) = self.default_schema.as_deref() {
            if schema
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#'))
            {
                error(
                    "default_schema",
                    format!("\"{}\" is not a valid schema name", schema),
                );
            }
        }

        let statement = match self.statement.as_deref() {
            Some(statement) if !statement.trim().is_empty() => Some(statement.to_string()),
            _ => {
                error("statement", "is required".into());
                None
            }
        };

        let target = match self.target.as_deref() {
            None | Some("") => {
                error("target", "is required".into());
                None
            }
            Some(target) => match FieldRef::parse(target) {
                Ok(_) => Some(target.to_string()),
                Err(err) => {
                    error("target", format!("{:#}", err));
                    None
                }
            },
        };

        for (name, field) in self.parameters.iter() {
            if !is_identifier(name) {
                error(
                    "parameters",
                    format!("\"{}\" is not a valid placeholder name", name),
                );
            }

            if let Err(err) = FieldRef::parse(field) {
                error("parameters", format!("placeholder \"{}\": {:#}", name, err));
            }
        }

        match (host, port, statement, target) {
            (Some(host), Some(port), Some(statement), Some(target)) if errors.is_empty() => {
                Ok(MysqlLookupConfig {
                    host,
                    port,
                    user: self.user.clone(),
                    password: self.password.clone(),
                    default_schema: self.default_schema.clone(),
                    statement,
                    parameters: self.parameters.clone(),
                    target,
                    tag_on_failure: self
                        .tag_on_failure
                        .clone()
                        .unwrap_or_else(|| vec![DEFAULT_FAILURE_TAG.to_string()]),
                })
            }
            _ => Err(InvalidConfig::new(errors)),
        }
    }
}

fn is_valid_host(host: &str) -> bool {
    // bracketed ipv6 literals are the only hosts which may contain ':'
    if let Some(ip) = host.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
        return !ip.is_empty() && ip.chars().all(|c| c.is_ascii_hexdigit() || c == ':' || c == '.');
    }

    !host
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '@' | ':' | '[' | ']'))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();

    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A validated mysql lookup configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MysqlLookupConfig {
    host: String,
    port: u16,
    user: Option<String>,
    password: Option<Secret>,
    default_schema: Option<String>,
    statement: String,
    parameters: ParameterBinding,
    target: String,
    tag_on_failure: Vec<String>,
}

impl MysqlLookupConfig {
    /// Parses and validates the filter options
    pub fn parse(options: config::Value) -> Result<Self> {
        Ok(MysqlLookupOptions::parse(options)?.validate()?)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn password(&self) -> Option<&Secret> {
        self.password.as_ref()
    }

    pub fn default_schema(&self) -> Option<&str> {
        self.default_schema.as_deref()
    }

    pub fn statement(&self) -> &str {
        &self.statement
    }

    pub fn parameters(&self) -> &ParameterBinding {
        &self.parameters
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn tag_on_failure(&self) -> &[String] {
        &self.tag_on_failure
    }

    /// The uri of the database, eg `mysql://localhost:3306/world`.
    /// Without a default schema the uri ends in '/'.
    pub fn connection_uri(&self) -> String {
        format!(
            "{}://{}:{}/{}",
            MYSQL_SCHEME,
            self.host,
            self.port,
            self.default_schema.as_deref().unwrap_or_default()
        )
    }

    pub fn connection_descriptor(&self) -> ConnectionDescriptor {
        ConnectionDescriptor::new(
            MysqlConnector::TYPE,
            self.connection_uri(),
            self.user.clone(),
            self.password.clone(),
        )
    }

    pub fn query_spec(&self) -> QuerySpec {
        QuerySpec::new(
            self.statement.clone(),
            self.parameters.clone(),
            self.target.clone(),
            self.tag_on_failure.clone(),
        )
    }
}

/// A problem with a single option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Returned when the options of the lookup filter are invalid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidConfig {
    pub errors: Vec<FieldError>,
}

impl InvalidConfig {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    /// Whether the supplied option was reported as invalid
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl Display for InvalidConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid mysql lookup configuration")?;

        for error in self.errors.iter() {
            write!(f, "\n  {}", error)?;
        }

        Ok(())
    }
}

impl std::error::Error for InvalidConfig {}
