//! The per-operation facade: one `MarketoClient` method per remote call.
//!
//! Methods take typed arguments plus free-form `options` that are merged
//! into the request parameters, and return a `Command` ready for
//! `MarketoClient::prepare` or `Session::send`.

mod activities;
mod bulk;
mod campaigns;
mod emails;
mod leads;
mod lists;
mod objects;
mod programs;

use chrono::{DateTime, FixedOffset, SecondsFormat, TimeZone};
use serde_json::Value;

/// ISO-8601 with a numeric offset, e.g. `2024-03-01T09:30:00+00:00`.
pub(crate) fn iso8601<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.to_rfc3339_opts(SecondsFormat::Secs, false)
}

pub(crate) fn parse_datetime(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).ok()
}

/// Comma-separated list, as Marketo expects for `fields`, `filterValues`
/// and similar parameters.
pub(crate) fn join<T: ToString>(items: &[T]) -> String {
    items.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
}

pub(crate) fn ids(items: &[i64]) -> Value {
    Value::Array(items.iter().map(|&id| Value::from(id)).collect())
}

/// Missing, null, `""`, `0`, `false`, `[]` or `{}`.
pub(crate) fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(fields)) => fields.is_empty(),
    }
}
