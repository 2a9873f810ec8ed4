//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names consistent across log events and error reports.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Resource identity
pub const FIELD_RESOURCE_KIND: &str = "resource_kind";
pub const FIELD_RESOURCE_NAME: &str = "resource_name";
pub const FIELD_PATH: &str = "path";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
