//! Pagination and sorting types for store listings.
//!
//! Listings use an explicit `(page, page_size, sort_key, direction)`
//! request and return a `Page` carrying the items plus total counts, so no
//! framework-managed query object leaks into the workflow layer.

use serde::{Deserialize, Serialize};

/// Sort direction for paginated listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
	Ascending,
	Descending,
}

/// Field an order listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSortKey {
	/// Sort by the last status transition time.
	UpdatedAt,
	/// Sort by placement time.
	CreatedAt,
}

/// A request for one page of a listing. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
	/// 1-based page number.
	pub page: u32,
	/// Number of items per page, always positive.
	pub page_size: u32,
	/// Field to sort by.
	pub sort_key: OrderSortKey,
	/// Sort direction.
	pub direction: SortDirection,
}

impl PageRequest {
	/// Creates a request sorted newest-updated first, the default for both
	/// order history and the admin listing.
	pub fn newest_updated_first(page: u32, page_size: u32) -> Self {
		Self {
			page: page.max(1),
			page_size,
			sort_key: OrderSortKey::UpdatedAt,
			direction: SortDirection::Descending,
		}
	}

	/// Number of items to skip before this page starts.
	pub fn offset(&self) -> usize {
		(self.page.saturating_sub(1) as usize) * (self.page_size as usize)
	}
}

/// One page of a listing, with total counts for pager rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
	/// The items on this page.
	pub items: Vec<T>,
	/// 1-based page number that was requested.
	pub page: u32,
	/// Requested page size.
	pub page_size: u32,
	/// Total number of items across all pages.
	pub total_items: u64,
	/// Total number of pages at this page size.
	pub total_pages: u32,
}

impl<T> Page<T> {
	/// Slices one page out of a fully sorted item list.
	///
	/// The caller is responsible for sorting according to the request's
	/// sort key and direction before slicing.
	pub fn slice(sorted: Vec<T>, request: &PageRequest) -> Self {
		let total_items = sorted.len() as u64;
		let total_pages = if request.page_size == 0 {
			0
		} else {
			sorted.len().div_ceil(request.page_size as usize) as u32
		};

		let items = sorted
			.into_iter()
			.skip(request.offset())
			.take(request.page_size as usize)
			.collect();

		Self {
			items,
			page: request.page,
			page_size: request.page_size,
			total_items,
			total_pages,
		}
	}

	/// Maps the page's items into another shape, keeping the counts.
	pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
		Page {
			items: self.items.into_iter().map(f).collect(),
			page: self.page,
			page_size: self.page_size,
			total_items: self.total_items,
			total_pages: self.total_pages,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn first_page_of_five_items_at_size_two() {
		let request = PageRequest::newest_updated_first(1, 2);
		let page = Page::slice(vec![1, 2, 3, 4, 5], &request);

		assert_eq!(page.items, vec![1, 2]);
		assert_eq!(page.total_items, 5);
		assert_eq!(page.total_pages, 3);
	}

	#[test]
	fn last_page_is_partial() {
		let request = PageRequest {
			page: 3,
			..PageRequest::newest_updated_first(3, 2)
		};
		let page = Page::slice(vec![1, 2, 3, 4, 5], &request);

		assert_eq!(page.items, vec![5]);
		assert_eq!(page.total_pages, 3);
	}

	#[test]
	fn page_past_the_end_is_empty() {
		let request = PageRequest::newest_updated_first(9, 2);
		let page = Page::slice(vec![1, 2, 3], &request);

		assert!(page.items.is_empty());
		assert_eq!(page.total_items, 3);
		assert_eq!(page.total_pages, 2);
	}

	#[test]
	fn page_zero_is_clamped_to_one() {
		let request = PageRequest::newest_updated_first(0, 2);
		assert_eq!(request.page, 1);
		assert_eq!(request.offset(), 0);
	}
}
