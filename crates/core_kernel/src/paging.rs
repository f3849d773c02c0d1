//! Paging primitives
//!
//! `PageRequest` describes a zero-based slice of a result set and `Page<T>`
//! carries that slice together with its position and the total element count.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Page size used when the caller does not ask for one
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// A request for one page of results
///
/// Pages are zero-based; the size is always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// Creates a page request
    ///
    /// # Arguments
    ///
    /// * `page` - Zero-based page number
    /// * `size` - Number of elements per page (must be positive)
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` when `size` is zero
    pub fn new(page: u32, size: u32) -> Result<Self, CoreError> {
        if size == 0 {
            return Err(CoreError::validation("Page size must not be less than one"));
        }
        Ok(Self { page, size })
    }

    /// Zero-based page number
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Requested page size
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of elements to skip before this page starts
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// A bounded slice of a larger result set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Elements of this page, in store order
    pub content: Vec<T>,
    /// Zero-based page number that was requested
    pub number: u32,
    /// Page size that was requested
    pub size: u32,
    /// Number of elements across all pages
    pub total_elements: u64,
}

impl<T> Page<T> {
    /// Creates a page for the given request
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            number: request.page(),
            size: request.size(),
            total_elements,
        }
    }

    /// Creates an empty page for the given request
    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }

    /// Slices an in-memory, already ordered result set
    pub fn from_slice(all: &[T], request: PageRequest) -> Self
    where
        T: Clone,
    {
        let start = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let content = all
            .iter()
            .skip(start)
            .take(request.size() as usize)
            .cloned()
            .collect();
        Self::new(content, request, all.len() as u64)
    }

    /// Total number of pages for this page size
    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total_elements.div_ceil(u64::from(self.size))
    }

    /// Number of elements actually on this page
    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    /// Whether this is the first page
    pub fn is_first(&self) -> bool {
        self.number == 0
    }

    /// Whether there are no pages after this one
    pub fn is_last(&self) -> bool {
        u64::from(self.number) + 1 >= self.total_pages()
    }

    /// Converts the content while keeping the page metadata
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
        }
    }
}
