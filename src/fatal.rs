/// Logs a diagnostic at the highest severity and panics with it.
///
/// Used for broken usage preconditions (empty heap, duplicate or unknown
/// key) and allocation failures. None of these are recoverable: continuing
/// on a corrupted heap is worse than stopping.
macro_rules! fatal {
    ($($arg:tt)+) => {{
        let msg = format!($($arg)+);
        log::error!("{}", msg);
        panic!("{}", msg)
    }};
}

pub(crate) use fatal;
