//! Domain error types.
//!
//! These cover data errors that make a load or a record unusable. Expected
//! "no result" outcomes (unknown stop, no route under a restrictive profile)
//! are not errors; they are [`crate::router::RouteResult`] values.

/// Data-level errors for loading and record consistency.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// The closure fetch stopped making progress: the data source keeps
    /// failing to supply records for ids it itself referenced. Cyclic or
    /// inconsistent upstream data; the load should be abandoned, not retried.
    #[error("load stalled with {missing} referenced stops still unresolved")]
    StalledLoad { missing: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::StalledLoad { missing: 3 };
        assert_eq!(
            err.to_string(),
            "load stalled with 3 referenced stops still unresolved"
        );
    }
}
