//! Operation bracket macros
//!
//! Every command run is bracketed by a start event and either an end or an
//! end_error event carrying the elapsed time. Field names are the keys in
//! [`crate::schema`]: `component`, `op`, `event`, then caller fields.

#[doc(hidden)]
#[macro_export]
macro_rules! __op_event {
    ($level:expr, $op:expr, $event:expr $(, $($rest:tt)*)?) => {
        tracing::event!(
            $level,
            component = module_path!(),
            op = $op,
            event = $event
            $(, $($rest)*)?
        )
    };
}

/// Log the start of an operation
///
/// ```
/// # use nwcloud_core::log_op_start;
/// log_op_start!("enable-deploy");
/// log_op_start!("enable-deploy", capability = "deploy");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__op_event!(
            tracing::Level::INFO,
            $op,
            $crate::schema::EVENT_START
            $(, $($field)*)?
        )
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use nwcloud_core::log_op_end;
/// log_op_end!("enable-deploy", duration_ms = 42);
/// log_op_end!("enable-deploy", duration_ms = 42, changes = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__op_event!(
            tracing::Level::INFO,
            $op,
            $crate::schema::EVENT_END,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

/// Log a failed operation
///
/// Records the error kind and code, plus the file or template the error
/// names. The message is the error's display form.
///
/// ```
/// # use nwcloud_core::{log_op_error, errors::template_missing};
/// let err = template_missing("configuration.xml");
/// log_op_error!("enable-deploy", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let failure: &$crate::errors::ExError = &$err;
        $crate::__op_event!(
            tracing::Level::ERROR,
            $op,
            $crate::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?failure.kind(),
            err_code = failure.code(),
            path = failure.path().map(|p| tracing::field::display(p.display())),
            template = failure.template(),
            $($($field)*,)?
            "{}",
            failure
        )
    }};
}
