use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

pub type SearchResult<T> = Result<T, SearchError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Failures of the bisection and table-search primitives.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    #[error("Cannot search an empty list")]
    EmptyList,

    #[error("Invalid search value ({value}): outside list range ({first} - {last})")]
    OutOfRange { value: f64, first: f64, last: f64 },

    #[error("Invalid search domain: {what}")]
    InvalidDomain { what: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_message_names_bounds() {
        let err = SearchError::OutOfRange {
            value: 6.0,
            first: 1.0,
            last: 5.0,
        };
        let msg = err.to_string();
        assert!(msg.contains('6'));
        assert!(msg.contains("1 - 5"));
    }

    #[test]
    fn search_error_lifts_into_core_error() {
        let err: CoreError = SearchError::EmptyList.into();
        assert!(matches!(err, CoreError::Search(SearchError::EmptyList)));
    }
}
