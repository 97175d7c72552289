//! JSON-schema validation of OCPP payloads
//!
//! One schema file per (action, direction) pair, per OCPP version, loaded
//! from a directory tree:
//!
//! ```text
//! <root>/ocpp16/BootNotification.json
//! <root>/ocpp16/BootNotificationResponse.json
//! <root>/ocpp20/BootNotification.json
//! …
//! ```
//!
//! The schema bundle itself is external input; this module only compiles
//! and applies it. A known action without a schema file validates as-is
//! (the bundle decides coverage, not the stack).

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use jsonschema::error::ValidationErrorKind;
use jsonschema::JSONSchema;
use serde_json::Value;
use tracing::{debug, warn};

use crate::rpc::{RpcErrorCode, RpcProblem};
use crate::version::OcppVersion;

// ── Direction ──────────────────────────────────────────────────

/// Whether a payload is the request or the response half of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Request,
    Response,
}

// ── ValidationFailure ──────────────────────────────────────────

/// A schema violation, carrying the RPC error code it maps to.
#[derive(Debug)]
pub struct ValidationFailure {
    pub code: RpcErrorCode,
    /// JSON pointer to the offending field ("" for the document root).
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at '{}': {}", self.code, self.field, self.message)
    }
}

impl std::error::Error for ValidationFailure {}

impl From<ValidationFailure> for RpcProblem {
    fn from(failure: ValidationFailure) -> Self {
        RpcProblem::new(failure.code, failure.to_string())
    }
}

// ── SchemaValidator ────────────────────────────────────────────

type SchemaKey = (OcppVersion, String, Direction);

/// Compiled schema set for all supported versions.
pub struct SchemaValidator {
    schemas: HashMap<SchemaKey, JSONSchema>,
}

impl SchemaValidator {
    /// Empty validator (every payload passes). Used by tests and by
    /// embedders that disable schema checking.
    pub fn empty() -> Self {
        Self {
            schemas: HashMap::new(),
        }
    }

    /// Load and compile every schema below `root` for the given versions.
    ///
    /// Fails if `root` or a version sub-directory is missing or unreadable;
    /// the session refuses to start without its schema bundle.
    pub fn load(root: &Path, versions: &[OcppVersion]) -> Result<Self, SchemaLoadError> {
        let mut schemas = HashMap::new();

        for version in versions {
            let dir = root.join(version.schema_dir());
            let entries = std::fs::read_dir(&dir).map_err(|e| SchemaLoadError {
                path: dir.display().to_string(),
                message: e.to_string(),
            })?;

            for entry in entries {
                let entry = entry.map_err(|e| SchemaLoadError {
                    path: dir.display().to_string(),
                    message: e.to_string(),
                })?;
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) != Some("json") {
                    continue;
                }
                let stem = match path.file_stem().and_then(|s| s.to_str()) {
                    Some(s) => s.to_string(),
                    None => continue,
                };

                let text = std::fs::read_to_string(&path).map_err(|e| SchemaLoadError {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
                let value: Value = serde_json::from_str(&text).map_err(|e| SchemaLoadError {
                    path: path.display().to_string(),
                    message: format!("Invalid schema JSON: {}", e),
                })?;
                let compiled = JSONSchema::compile(&value).map_err(|e| SchemaLoadError {
                    path: path.display().to_string(),
                    message: format!("Schema does not compile: {}", e),
                })?;

                let (action, direction) = match stem.strip_suffix("Response") {
                    Some(action) => (action.to_string(), Direction::Response),
                    None => (stem, Direction::Request),
                };
                schemas.insert((*version, action, direction), compiled);
            }
        }

        debug!(count = schemas.len(), "Compiled OCPP schemas");
        Ok(Self { schemas })
    }

    /// Register a single schema. Used by tests to build small validators
    /// without touching the filesystem.
    pub fn insert(
        &mut self,
        version: OcppVersion,
        action: &str,
        direction: Direction,
        schema: &Value,
    ) -> Result<(), SchemaLoadError> {
        let compiled = JSONSchema::compile(schema).map_err(|e| SchemaLoadError {
            path: action.to_string(),
            message: format!("Schema does not compile: {}", e),
        })?;
        self.schemas
            .insert((version, action.to_string(), direction), compiled);
        Ok(())
    }

    pub fn has_schema(&self, version: OcppVersion, action: &str, direction: Direction) -> bool {
        self.schemas
            .contains_key(&(version, action.to_string(), direction))
    }

    /// Validate `payload` against the schema for (version, action,
    /// direction). Passing when no schema is registered.
    pub fn validate(
        &self,
        version: OcppVersion,
        action: &str,
        direction: Direction,
        payload: &Value,
    ) -> Result<(), ValidationFailure> {
        let schema = match self
            .schemas
            .get(&(version, action.to_string(), direction))
        {
            Some(s) => s,
            None => {
                debug!(%version, action, ?direction, "No schema registered; skipping validation");
                return Ok(());
            }
        };

        if let Err(mut errors) = schema.validate(payload) {
            // The first error decides the wire error code
            if let Some(error) = errors.next() {
                let code = error_code_for(&error.kind);
                let failure = ValidationFailure {
                    code,
                    field: error.instance_path.to_string(),
                    message: error.to_string(),
                };
                warn!(%version, action, ?direction, failure = %failure, "Schema validation failed");
                return Err(failure);
            }
        }
        Ok(())
    }
}

/// Map a schema violation kind onto the RPC error code taxonomy.
fn error_code_for(kind: &ValidationErrorKind) -> RpcErrorCode {
    match kind {
        ValidationErrorKind::Required { .. } => RpcErrorCode::OccurenceConstraintViolation,
        ValidationErrorKind::Type { .. } => RpcErrorCode::TypeConstraintViolation,
        _ => RpcErrorCode::PropertyConstraintViolation,
    }
}

// ── Errors ─────────────────────────────────────────────────────

/// Failure to load or compile the schema bundle.
#[derive(Debug)]
pub struct SchemaLoadError {
    pub path: String,
    pub message: String,
}

impl fmt::Display for SchemaLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Schema bundle error at {}: {}", self.path, self.message)
    }
}

impl std::error::Error for SchemaLoadError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn boot_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "chargePointVendor": { "type": "string", "maxLength": 20 },
                "chargePointModel": { "type": "string", "maxLength": 20 }
            },
            "required": ["chargePointVendor", "chargePointModel"],
            "additionalProperties": false
        })
    }

    fn validator() -> SchemaValidator {
        let mut v = SchemaValidator::empty();
        v.insert(
            OcppVersion::V16,
            "BootNotification",
            Direction::Request,
            &boot_schema(),
        )
        .unwrap();
        v
    }

    #[test]
    fn valid_payload_passes() {
        let v = validator();
        let payload = json!({"chargePointVendor": "ACME", "chargePointModel": "X1"});
        assert!(v
            .validate(OcppVersion::V16, "BootNotification", Direction::Request, &payload)
            .is_ok());
    }

    #[test]
    fn missing_required_field_is_occurence_violation() {
        let v = validator();
        let payload = json!({"chargePointVendor": "ACME"});
        let failure = v
            .validate(OcppVersion::V16, "BootNotification", Direction::Request, &payload)
            .unwrap_err();
        assert_eq!(failure.code, RpcErrorCode::OccurenceConstraintViolation);
        assert!(failure.message.contains("chargePointModel"));
    }

    #[test]
    fn wrong_type_is_type_violation() {
        let v = validator();
        let payload = json!({"chargePointVendor": 42, "chargePointModel": "X1"});
        let failure = v
            .validate(OcppVersion::V16, "BootNotification", Direction::Request, &payload)
            .unwrap_err();
        assert_eq!(failure.code, RpcErrorCode::TypeConstraintViolation);
        assert_eq!(failure.field, "/chargePointVendor");
    }

    #[test]
    fn out_of_range_is_property_violation() {
        let v = validator();
        let payload = json!({
            "chargePointVendor": "a vendor name that is far too long for the schema",
            "chargePointModel": "X1"
        });
        let failure = v
            .validate(OcppVersion::V16, "BootNotification", Direction::Request, &payload)
            .unwrap_err();
        assert_eq!(failure.code, RpcErrorCode::PropertyConstraintViolation);
    }

    #[test]
    fn unknown_action_passes_without_schema() {
        let v = validator();
        assert!(v
            .validate(OcppVersion::V16, "Heartbeat", Direction::Request, &json!({}))
            .is_ok());
    }

    #[test]
    fn load_from_directory() {
        let dir = std::env::temp_dir().join(format!("ocpp-schemas-{}", std::process::id()));
        let v16 = dir.join("ocpp16");
        std::fs::create_dir_all(&v16).unwrap();
        std::fs::write(
            v16.join("BootNotification.json"),
            serde_json::to_string(&boot_schema()).unwrap(),
        )
        .unwrap();
        std::fs::write(v16.join("BootNotificationResponse.json"), "{}").unwrap();

        let validator = SchemaValidator::load(&dir, &[OcppVersion::V16]).unwrap();
        assert!(validator.has_schema(OcppVersion::V16, "BootNotification", Direction::Request));
        assert!(validator.has_schema(OcppVersion::V16, "BootNotification", Direction::Response));
        assert!(!validator.has_schema(OcppVersion::V16, "Heartbeat", Direction::Request));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_directory_fails_load() {
        let dir = std::env::temp_dir().join("ocpp-schemas-does-not-exist");
        assert!(SchemaValidator::load(&dir, &[OcppVersion::V16]).is_err());
    }
}
