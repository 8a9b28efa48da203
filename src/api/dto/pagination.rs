//! Pagination query parameters and the shared list envelope.

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_with::{DisplayFromStr, serde_as};
use utoipa::{IntoParams, ToSchema};

use crate::domain::entities::{PageRequest, Paginated};
use crate::error::AppError;

pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination query parameters.
///
/// Uses `serde_with` to parse page numbers from query strings as integers,
/// which also keeps them working inside `#[serde(flatten)]` filter structs.
#[serde_as]
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Page number, starting at 1 (default 1).
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    #[param(minimum = 1)]
    pub page: Option<u32>,

    /// Items per page, 1..=100 (default 25).
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: Option<u32>,
}

impl PaginationParams {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Validates the parameters and converts them to a database window.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `page` is 0 or `page_size` is
    /// outside 1..=100.
    pub fn to_page_request(&self) -> Result<PageRequest, AppError> {
        let page = self.page();
        let page_size = self.page_size();

        if page == 0 {
            return Err(AppError::bad_request(
                "Page must be greater than 0",
                json!({"page": page}),
            ));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(AppError::bad_request(
                format!("Page size must be between 1 and {MAX_PAGE_SIZE}"),
                json!({"page_size": page_size}),
            ));
        }

        let offset = i64::from(page - 1) * i64::from(page_size);
        Ok(PageRequest::new(offset, i64::from(page_size)))
    }
}

/// Envelope shared by every list endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total: i64,
}

impl<T> ListResponse<T> {
    /// Converts a repository page into the response envelope.
    pub fn from_page<E>(page: Paginated<E>, params: &PaginationParams) -> Self
    where
        T: From<E>,
    {
        Self {
            items: page.items.into_iter().map(T::from).collect(),
            page: params.page(),
            page_size: params.page_size(),
            total: page.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: Option<u32>, page_size: Option<u32>) -> PaginationParams {
        PaginationParams { page, page_size }
    }

    #[test]
    fn test_defaults() {
        let page = params(None, None).to_page_request().unwrap();
        assert_eq!(page.offset, 0);
        assert_eq!(page.limit, 25);
    }

    #[test]
    fn test_page_2_with_default_size() {
        let page = params(Some(2), None).to_page_request().unwrap();
        assert_eq!(page.offset, 25);
        assert_eq!(page.limit, 25);
    }

    #[test]
    fn test_custom_page_and_size() {
        let page = params(Some(3), Some(50)).to_page_request().unwrap();
        assert_eq!(page.offset, 100);
        assert_eq!(page.limit, 50);
    }

    #[test]
    fn test_page_zero_is_error() {
        assert!(matches!(
            params(Some(0), None).to_page_request(),
            Err(AppError::Validation { .. })
        ));
    }

    #[test]
    fn test_page_size_bounds() {
        assert!(params(None, Some(0)).to_page_request().is_err());
        assert!(params(None, Some(1)).to_page_request().is_ok());
        assert!(params(None, Some(100)).to_page_request().is_ok());
        assert!(params(None, Some(101)).to_page_request().is_err());
    }

    #[test]
    fn test_parses_from_query_string_strings() {
        let p: PaginationParams = serde_json::from_str(r#"{"page": "4", "page_size": "10"}"#).unwrap();
        assert_eq!(p.page(), 4);
        assert_eq!(p.page_size(), 10);
    }

    #[test]
    fn test_list_response_from_page() {
        let page = Paginated::new(vec![1_i32, 2, 3], 42);
        let resp: ListResponse<i64> = ListResponse::from_page(page, &params(Some(2), Some(3)));
        assert_eq!(resp.items, vec![1, 2, 3]);
        assert_eq!(resp.page, 2);
        assert_eq!(resp.page_size, 3);
        assert_eq!(resp.total, 42);
    }
}
