//! Request validation — typed path parameters and JSON body schemas.
//!
//! Validation runs before handler logic. Failures surface as a `422
//! Unprocessable Entity` response whose body lists one entry per offending
//! field:
//!
//! ```json
//! {"detail": [{"loc": ["path", "student_id"], "msg": "...", "type": "..."}]}
//! ```
//!
//! Path parameters are parsed as integers, optionally against declared
//! `gt`/`lt` bounds. Body schemas are plain serde types; the decode error
//! message (which names the offending field and expected type) is carried
//! into the detail entry verbatim.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::context::{Context, PathParams};
use crate::http::{Response, StatusCode};

/// One entry in a 422 `detail` list.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    /// Location of the offending input, e.g. `["path", "student_id"]` or `["body"]`.
    pub loc: Vec<String>,
    /// Human-readable description.
    pub msg: String,
    /// Machine-readable error code.
    #[serde(rename = "type")]
    pub kind: String,
}

/// A failed validation, convertible into a 422 response.
#[derive(Debug, Error)]
#[error("request validation failed")]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

impl ValidationError {
    fn single(loc: Vec<String>, msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError {
                loc,
                msg: msg.into(),
                kind: kind.into(),
            }],
        }
    }

    /// Returns the per-field errors.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Converts this error into a `422` response with the `detail` payload.
    pub fn into_response(self) -> Response {
        Response::json(
            StatusCode::UnprocessableEntity,
            &serde_json::json!({ "detail": self.errors }),
        )
    }
}

fn path_loc(name: &str) -> Vec<String> {
    vec!["path".to_owned(), name.to_owned()]
}

/// Parses the named path parameter as a `u32`.
///
/// # Errors
///
/// - the parameter is missing from the route captures → `value_error.missing`
/// - the value is not a valid integer → `type_error.integer`
pub fn path_u32(params: &PathParams, name: &str) -> Result<u32, ValidationError> {
    let raw = params.get(name).ok_or_else(|| {
        ValidationError::single(path_loc(name), "field required", "value_error.missing")
    })?;

    raw.parse().map_err(|_| {
        ValidationError::single(
            path_loc(name),
            "value is not a valid integer",
            "type_error.integer",
        )
    })
}

/// Parses the named path parameter as a `u32` constrained to the open range
/// (`gt`, `lt`).
///
/// The bounds are checked after parsing, in declaration order: `gt` first,
/// then `lt`.
///
/// # Errors
///
/// Everything [`path_u32`] produces, plus:
/// - value ≤ `gt` → `value_error.number.not_gt`
/// - value ≥ `lt` → `value_error.number.not_lt`
pub fn path_u32_bounded(
    params: &PathParams,
    name: &str,
    gt: u32,
    lt: u32,
) -> Result<u32, ValidationError> {
    let value = path_u32(params, name)?;

    if value <= gt {
        return Err(ValidationError::single(
            path_loc(name),
            format!("ensure this value is greater than {gt}"),
            "value_error.number.not_gt",
        ));
    }
    if value >= lt {
        return Err(ValidationError::single(
            path_loc(name),
            format!("ensure this value is less than {lt}"),
            "value_error.number.not_lt",
        ));
    }

    Ok(value)
}

/// Decodes the request body as JSON into the schema type `T`.
///
/// # Errors
///
/// Any decode failure (malformed JSON, missing required field, wrong type)
/// → one `body`-located entry carrying the serde error text.
pub fn json_body<T: DeserializeOwned>(ctx: &Context) -> Result<T, ValidationError> {
    ctx.json().map_err(|e| {
        ValidationError::single(
            vec!["body".to_owned()],
            e.to_string(),
            "value_error.jsondecode",
        )
    })
}
