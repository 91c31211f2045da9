//! Utility macros shared by the parsing and marshalling code.

/// Early-returns `Err($error)` when `$predicate` does not hold.
///
/// Works like `assert!`, but for validation paths that must hand an error
/// back to the caller instead of panicking.
///
/// # Example
///
/// ```ignore
/// ensure!(!host.is_empty(), InvalidUri::new(raw));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
