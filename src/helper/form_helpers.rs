use crate::error::MultimediaError;
use actix_web::web;
use serde_json::{Map, Value};

pub const INVALID_ATTRIBUTES: &str = "Los atributos dados no son válidos.";

/// Parses a request body as a JSON object. Anything else (bad UTF-8, bad JSON,
/// arrays, scalars) is a validation error with the generic attributes message.
pub fn parse_json_object(body: &web::Bytes) -> Result<Map<String, Value>, MultimediaError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(attributes)) => Ok(attributes),
        Ok(_) | Err(_) => Err(MultimediaError::Validation(INVALID_ATTRIBUTES.to_string())),
    }
}
