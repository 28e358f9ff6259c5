//! Memoized transforms over query results

use std::sync::Arc;

use super::QueryState;

/// Pure transform from a raw payload to a view model.
///
/// The transform runs again only when the payload `Arc` changes.
pub struct FeatureQuery<T, U, F>
where
    F: Fn(&T) -> U,
{
    transform: F,
    memo: Option<(Arc<T>, Arc<U>)>,
    runs: usize,
}

impl<T, U, F> FeatureQuery<T, U, F>
where
    F: Fn(&T) -> U,
{
    pub fn new(transform: F) -> Self {
        Self {
            transform,
            memo: None,
            runs: 0,
        }
    }

    /// View model for the state's payload, if any
    pub fn apply(&mut self, state: &QueryState<T>) -> Option<Arc<U>> {
        let data = state.data.as_ref()?;

        if let Some((input, output)) = &self.memo {
            if Arc::ptr_eq(input, data) {
                return Some(output.clone());
            }
        }

        let output = Arc::new((self.transform)(data));
        self.runs += 1;
        self.memo = Some((data.clone(), output.clone()));
        Some(output)
    }

    /// How many times the transform actually ran
    pub fn runs(&self) -> usize {
        self.runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_memoized_on_same_payload() {
        let mut query = FeatureQuery::new(|v: &Vec<i32>| v.iter().sum::<i32>());
        let state = QueryState::success(Arc::new(vec![1, 2, 3]), false);

        assert_eq!(*query.apply(&state).unwrap(), 6);
        assert_eq!(*query.apply(&state).unwrap(), 6);
        assert_eq!(query.runs(), 1);
    }

    #[test]
    fn test_transform_reruns_on_new_payload() {
        let mut query = FeatureQuery::new(|v: &Vec<i32>| v.len());
        query.apply(&QueryState::success(Arc::new(vec![1]), false));
        let out = query.apply(&QueryState::success(Arc::new(vec![1, 2]), false));
        assert_eq!(*out.unwrap(), 2);
        assert_eq!(query.runs(), 2);
    }

    #[test]
    fn test_no_data_no_transform() {
        let mut query = FeatureQuery::new(|v: &u8| *v);
        assert!(query.apply(&QueryState::idle(false)).is_none());
        assert_eq!(query.runs(), 0);
    }
}
