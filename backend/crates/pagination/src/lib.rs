//! Limit/offset pagination primitives shared by list endpoints.
//!
//! Query strings carry `limit` and `offset` as decimal strings. [`PageRequest`]
//! validates them once at the HTTP boundary so repositories only ever see
//! well-formed, non-negative values.
//!
//! ```
//! use pagination::PageRequest;
//!
//! let page = PageRequest::from_query(Some("2"), None).expect("valid page");
//! assert_eq!(page.limit(), 2);
//! assert_eq!(page.offset(), 0);
//! ```

use serde::{Deserialize, Serialize};

/// Number of items returned when the caller does not supply a limit.
pub const DEFAULT_LIMIT: u64 = 10;

/// Offset applied when the caller does not supply one.
pub const DEFAULT_OFFSET: u64 = 0;

/// Query parameter that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageParam {
    /// The `limit` query parameter.
    Limit,
    /// The `offset` query parameter.
    Offset,
}

impl PageParam {
    /// Wire name of the parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Limit => "limit",
            Self::Offset => "offset",
        }
    }
}

/// Errors raised while parsing pagination parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// The parameter was not a non-negative base-10 integer.
    #[error("{} must be a non-negative integer", param.as_str())]
    NotANumber {
        /// Offending parameter.
        param: PageParam,
        /// Raw value supplied by the caller.
        value: String,
    },
}

impl PaginationError {
    /// Parameter that failed validation.
    #[must_use]
    pub const fn param(&self) -> PageParam {
        match self {
            Self::NotANumber { param, .. } => *param,
        }
    }

    /// Raw value supplied by the caller.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::NotANumber { value, .. } => value.as_str(),
        }
    }
}

/// Validated page window.
///
/// No upper bound is applied to either value: digit strings too long for a
/// `u64` saturate, and the SQL accessors clamp to `i64::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    limit: u64,
    offset: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, DEFAULT_OFFSET)
    }
}

impl PageRequest {
    /// Build a page window from already-validated numbers.
    #[must_use]
    pub const fn new(limit: u64, offset: u64) -> Self {
        Self { limit, offset }
    }

    /// Parse optional query-string values, applying defaults when absent.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::NotANumber`] when either value is present
    /// but is not a non-negative integer.
    pub fn from_query(limit: Option<&str>, offset: Option<&str>) -> Result<Self, PaginationError> {
        let limit = parse_param(limit, PageParam::Limit, DEFAULT_LIMIT)?;
        let offset = parse_param(offset, PageParam::Offset, DEFAULT_OFFSET)?;
        Ok(Self::new(limit, offset))
    }

    /// Maximum number of items in the page.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Number of items skipped before the page starts.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Limit for SQL `LIMIT` clauses.
    #[must_use]
    pub fn sql_limit(&self) -> i64 {
        i64::try_from(self.limit).unwrap_or(i64::MAX)
    }

    /// Offset for SQL `OFFSET` clauses.
    #[must_use]
    pub fn sql_offset(&self) -> i64 {
        i64::try_from(self.offset).unwrap_or(i64::MAX)
    }
}

fn parse_param(raw: Option<&str>, param: PageParam, default: u64) -> Result<u64, PaginationError> {
    let Some(value) = raw else {
        return Ok(default);
    };
    let trimmed = value.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(PaginationError::NotANumber {
            param,
            value: value.to_owned(),
        });
    }
    // Only overflow can fail here once the digits check passed.
    Ok(trimmed.parse::<u64>().unwrap_or(u64::MAX))
}
