//! Canonical logging macros
//!
//! These macros provide a structured, consistent way to log operations.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use helminspect_core::log_op_start;
/// log_op_start!("check_release");
/// log_op_start!("check_release", release = "web");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        $crate::logging_facility::__tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::__schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        $crate::logging_facility::__tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::__schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use helminspect_core::log_op_end;
/// log_op_end!("check_release", duration_ms = 42);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        $crate::logging_facility::__tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::__schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        $crate::logging_facility::__tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::__schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// Accepts anything convertible into [`ExError`](crate::errors::ExError);
/// the error is cloned, not consumed.
///
/// # Example
///
/// ```
/// # use helminspect_core::log_op_error;
/// # use helminspect_core::errors::DriftError;
/// let err = DriftError::CommandNotAllowed { program: "rm".to_string() };
/// log_op_error!("run_command", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err = $crate::errors::ExError::from(::std::clone::Clone::clone(&$err));
        $crate::logging_facility::__tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::__schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            "{}", ex_err
        );
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err = $crate::errors::ExError::from(::std::clone::Clone::clone(&$err));
        $crate::logging_facility::__tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::__schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            $($field)*
        );
    }};
}
