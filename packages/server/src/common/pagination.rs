//! Offset pagination shared by list endpoints.

use serde::Deserialize;

use super::error::ApiError;

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 100;

/// Raw `limit` / `offset` query parameters.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Validated pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl PageParams {
    /// Apply defaults and reject nonsense values.
    ///
    /// Limits above `max_limit` are clamped rather than rejected.
    pub fn validate(self, default_limit: i64, max_limit: i64) -> Result<Page, ApiError> {
        let limit = self.limit.unwrap_or(default_limit);
        if limit < 1 {
            return Err(ApiError::validation("limit must be at least 1"));
        }
        let offset = self.offset.unwrap_or(0);
        if offset < 0 {
            return Err(ApiError::validation("offset must not be negative"));
        }

        Ok(Page {
            limit: limit.min(max_limit),
            offset,
        })
    }
}

impl Page {
    /// Slice an in-memory result set (used after post-filtering).
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset as usize)
            .take(self.limit as usize)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_clamping() {
        let page = PageParams::default().validate(DEFAULT_LIMIT, MAX_LIMIT).unwrap();
        assert_eq!(page, Page::default());

        let page = PageParams {
            limit: Some(500),
            offset: Some(20),
        }
        .validate(DEFAULT_LIMIT, MAX_LIMIT)
        .unwrap();
        assert_eq!(page.limit, MAX_LIMIT);
        assert_eq!(page.offset, 20);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(PageParams {
            limit: Some(0),
            offset: None
        }
        .validate(10, 100)
        .is_err());
        assert!(PageParams {
            limit: None,
            offset: Some(-1)
        }
        .validate(10, 100)
        .is_err());
    }

    #[test]
    fn test_apply_slices_window() {
        let page = Page {
            limit: 2,
            offset: 1,
        };
        assert_eq!(page.apply(vec![1, 2, 3, 4]), vec![2, 3]);
        assert!(page.apply(Vec::<i32>::new()).is_empty());
    }
}
