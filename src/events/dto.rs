use serde::Deserialize;
use serde_json::Value;
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    UtcOffset,
};

use crate::error::{AppError, AppResult};

/// Request body for `POST /event`. Fields stay loosely typed so that falsy
/// values can be told apart from wrong types.
#[derive(Debug, Default, Deserialize)]
pub struct CreateEventRequest {
    pub title: Option<Value>,
    pub description: Option<Value>,
    pub date: Option<Value>,
}

/// Request body for `PUT /event/:id`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<Value>,
    pub description: Option<Value>,
    pub date: Option<Value>,
}

/// `null`, `false`, `0` and `""` count as not supplied.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// The string carried by a truthy field, `None` for a falsy or absent one.
pub(crate) fn truthy_string(value: Option<&Value>, field: &str) -> AppResult<Option<String>> {
    match value {
        Some(v) if is_truthy(v) => match v {
            Value::String(s) => Ok(Some(s.clone())),
            _ => Err(AppError::validation(format!("{field} must be a string"))),
        },
        _ => Ok(None),
    }
}

/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (midnight UTC).
/// The result is always in UTC.
pub(crate) fn parse_event_date(raw: &str) -> AppResult<OffsetDateTime> {
    if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(ts.to_offset(UtcOffset::UTC));
    }
    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .map(|d| d.midnight().assume_utc())
        .map_err(|_| AppError::validation("date must be an RFC 3339 timestamp or YYYY-MM-DD"))
}
