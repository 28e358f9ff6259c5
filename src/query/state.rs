//! Query state exposed to pages

use std::sync::Arc;

use crate::error::Error;

/// Outcome of a fetch, as seen by a page.
///
/// Fetches are awaited, so there is no in-flight state here; pages show a
/// spinner while waiting instead.
#[derive(Debug)]
pub struct QueryState<T> {
    pub data: Option<Arc<T>>,
    pub error: Option<Error>,
    pub has_active_filters: bool,
    /// Served from the cache without a request
    pub from_cache: bool,
    /// A newer fetch for the same feature completed first; the response
    /// was dropped
    pub is_stale: bool,
}

impl<T> QueryState<T> {
    /// Nothing requested: the filters are empty or the query is disabled
    pub fn idle(has_active_filters: bool) -> Self {
        Self {
            data: None,
            error: None,
            has_active_filters,
            from_cache: false,
            is_stale: false,
        }
    }

    pub fn success(data: Arc<T>, from_cache: bool) -> Self {
        Self {
            data: Some(data),
            from_cache,
            ..Self::idle(true)
        }
    }

    pub fn failure(error: Error) -> Self {
        Self {
            error: Some(error),
            ..Self::idle(true)
        }
    }

    pub fn stale() -> Self {
        Self {
            is_stale: true,
            ..Self::idle(true)
        }
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Turn the state into a plain result: error if failed, `None` when
    /// there is nothing to show.
    pub fn into_result(self) -> Result<Option<Arc<T>>, Error> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    #[test]
    fn test_idle_has_no_data() {
        let state: QueryState<u8> = QueryState::idle(false);
        assert!(!state.has_data());
        assert!(!state.is_error());
        assert!(!state.has_active_filters);
    }

    #[test]
    fn test_failure_into_result() {
        let state: QueryState<u8> = QueryState::failure(ApiError::Forbidden.into());
        assert!(state.is_error());
        assert!(!state.has_data());
        assert!(state.into_result().is_err());
    }

    #[test]
    fn test_success_into_result() {
        let state = QueryState::success(Arc::new(3u8), true);
        assert!(state.from_cache);
        assert_eq!(*state.into_result().unwrap().unwrap(), 3);
    }
}
