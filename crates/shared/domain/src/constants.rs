//! Domain-level constants.
//!
//! These constants define catalog paging defaults and validation requirements.

// =============================================================================
// Paging
// =============================================================================

/// First page index; page indexes are 1-based
pub const DEFAULT_PAGE_INDEX: u64 = 1;

/// Page size used when the caller does not ask for one
pub const DEFAULT_PAGE_SIZE: u64 = 6;

/// Upper bound for a requested page size
pub const MAX_PAGE_SIZE: u64 = 50;

// =============================================================================
// Sorting
// =============================================================================

/// Sort key for ascending price order
pub const SORT_PRICE_ASC: &str = "priceAsc";

/// Sort key for descending price order
pub const SORT_PRICE_DESC: &str = "priceDesc";
