//! Filter/sort/paginate engine over in-memory book sequences.
//!
//! # Responsibility
//! - Apply a predicate, a composite multi-key sort, and page arithmetic to
//!   the full book collection.
//! - Validate search arguments at the call boundary, before any filtering.
//!
//! # Invariants
//! - Filtering preserves the original relative order of retained books.
//! - Sorting covers the whole filtered sequence, never just the page slice,
//!   so cross-page ordering stays globally consistent.
//! - Sorting is stable; equal keys keep their original relative order.
//! - `total_elements` counts the filtered sequence before slicing.

use crate::model::book::Book;
use crate::model::{YEAR_MAX, YEAR_MIN};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type QueryResult<T> = Result<T, QueryError>;

/// Boundary validation failure for query arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Search keyword is missing or blank after trim.
    BlankKeyword,
    /// Author search argument is missing or blank after trim.
    BlankAuthor,
    /// Year search argument outside `[YEAR_MIN, YEAR_MAX]`.
    YearOutOfRange(i32),
    /// Combined title/author search given neither argument.
    MissingSearchTerms,
    /// Page size of zero can never produce a page.
    InvalidPageSize,
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankKeyword => write!(f, "search keyword must not be blank"),
            Self::BlankAuthor => write!(f, "author search argument must not be blank"),
            Self::YearOutOfRange(year) => write!(
                f,
                "year search argument {year} must be in range {YEAR_MIN}..={YEAR_MAX}"
            ),
            Self::MissingSearchTerms => {
                write!(f, "at least one of title or author must be provided")
            }
            Self::InvalidPageSize => write!(f, "page size must be at least 1"),
        }
    }
}

impl Error for QueryError {}

/// Sortable book field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Title,
    Author,
    Year,
}

impl SortField {
    /// Parses a field name, falling back to id order for unknown or empty
    /// keys rather than failing the whole query.
    pub fn parse(value: &str) -> SortField {
        match value.trim().to_ascii_lowercase().as_str() {
            "title" => SortField::Title,
            "author" => SortField::Author,
            "year" => SortField::Year,
            _ => SortField::Id,
        }
    }
}

/// Sort direction for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One (field, direction) sort key. Earlier keys take precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(field: SortField) -> SortKey {
        SortKey {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: SortField) -> SortKey {
        SortKey {
            field,
            direction: SortDirection::Desc,
        }
    }
}

/// Zero-based page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> PageRequest {
        PageRequest { page, size }
    }
}

/// One page of query results plus the pre-pagination match count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookPage {
    /// Page contents, at most `size` books.
    pub books: Vec<Book>,
    pub page: u32,
    pub size: u32,
    /// Count of all books matching the predicate, before slicing.
    pub total_elements: usize,
}

impl BookPage {
    /// Total page count implied by `total_elements` and `size`.
    pub fn total_pages(&self) -> usize {
        self.total_elements.div_ceil(self.size as usize)
    }
}

/// Filters, sorts, and paginates the given books.
///
/// The predicate runs first and preserves relative order; the composite sort
/// is then applied to the whole filtered sequence; the page slice is cut
/// last. An out-of-range page index yields empty contents, not an error.
///
/// # Errors
/// - [`QueryError::InvalidPageSize`] when `request.size == 0`.
pub fn run_query(
    books: Vec<Book>,
    predicate: impl Fn(&Book) -> bool,
    sort_keys: &[SortKey],
    request: PageRequest,
) -> QueryResult<BookPage> {
    if request.size == 0 {
        return Err(QueryError::InvalidPageSize);
    }

    let mut filtered: Vec<Book> = books.into_iter().filter(|book| predicate(book)).collect();
    let total_elements = filtered.len();

    if !sort_keys.is_empty() {
        // Vec::sort_by is stable, so equal keys keep their original order.
        filtered.sort_by(|a, b| compare_books(a, b, sort_keys));
    }

    let start = request.page as usize * request.size as usize;
    let books = if start >= total_elements {
        Vec::new()
    } else {
        let end = (start + request.size as usize).min(total_elements);
        filtered[start..end].to_vec()
    };

    Ok(BookPage {
        books,
        page: request.page,
        size: request.size,
        total_elements,
    })
}

/// Builds the identity predicate for unfiltered listing.
pub fn match_all() -> impl Fn(&Book) -> bool {
    |_: &Book| true
}

/// Builds a case-insensitive keyword predicate over title OR author.
///
/// # Errors
/// - [`QueryError::BlankKeyword`] when the keyword is blank after trim.
pub fn keyword_predicate(keyword: &str) -> QueryResult<impl Fn(&Book) -> bool> {
    let needle = non_blank(keyword).ok_or(QueryError::BlankKeyword)?;
    Ok(move |book: &Book| {
        contains_ignore_case(&book.title, &needle) || contains_ignore_case(&book.author, &needle)
    })
}

/// Builds a case-insensitive substring predicate over the author field.
///
/// # Errors
/// - [`QueryError::BlankAuthor`] when the argument is blank after trim.
pub fn author_predicate(author: &str) -> QueryResult<impl Fn(&Book) -> bool> {
    let needle = non_blank(author).ok_or(QueryError::BlankAuthor)?;
    Ok(move |book: &Book| contains_ignore_case(&book.author, &needle))
}

/// Builds an exact-year predicate.
///
/// # Errors
/// - [`QueryError::YearOutOfRange`] outside `[YEAR_MIN, YEAR_MAX]`.
pub fn year_predicate(year: i32) -> QueryResult<impl Fn(&Book) -> bool> {
    if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
        return Err(QueryError::YearOutOfRange(year));
    }
    Ok(move |book: &Book| book.year == year)
}

/// Builds the combined title+author predicate.
///
/// The two conditions are ANDed; a blank or absent side matches vacuously.
///
/// # Errors
/// - [`QueryError::MissingSearchTerms`] when both sides are absent or blank.
pub fn title_author_predicate(
    title: Option<&str>,
    author: Option<&str>,
) -> QueryResult<impl Fn(&Book) -> bool> {
    let title_needle = title.and_then(non_blank);
    let author_needle = author.and_then(non_blank);

    if title_needle.is_none() && author_needle.is_none() {
        return Err(QueryError::MissingSearchTerms);
    }

    Ok(move |book: &Book| {
        let matches_title = title_needle
            .as_deref()
            .is_none_or(|needle| contains_ignore_case(&book.title, needle));
        let matches_author = author_needle
            .as_deref()
            .is_none_or(|needle| contains_ignore_case(&book.author, needle));
        matches_title && matches_author
    })
}

fn compare_books(a: &Book, b: &Book, keys: &[SortKey]) -> Ordering {
    for key in keys {
        let ordering = match key.field {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Title => compare_ignore_case(&a.title, &b.title),
            SortField::Author => compare_ignore_case(&a.author, &b.author),
            SortField::Year => a.year.cmp(&b.year),
        };
        let ordering = match key.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        author_predicate, keyword_predicate, match_all, run_query, title_author_predicate,
        year_predicate, PageRequest, QueryError, SortDirection, SortField, SortKey,
    };
    use crate::model::book::Book;

    fn book(id: i64, title: &str, author: &str, year: i32) -> Book {
        Book {
            id,
            title: title.to_string(),
            author: author.to_string(),
            year,
            shelf_id: None,
        }
    }

    #[test]
    fn sort_field_parse_falls_back_to_id() {
        assert_eq!(SortField::parse("Title"), SortField::Title);
        assert_eq!(SortField::parse(" YEAR "), SortField::Year);
        assert_eq!(SortField::parse(""), SortField::Id);
        assert_eq!(SortField::parse("publisher"), SortField::Id);
    }

    #[test]
    fn filtering_preserves_relative_order_and_counts_all_matches() {
        let books = vec![
            book(1, "Dune", "Herbert", 1965),
            book(2, "dune club", "X", 1970),
            book(3, "Foundation", "Asimov", 1951),
        ];

        let predicate = keyword_predicate("dune").unwrap();
        let page = run_query(books, predicate, &[], PageRequest::new(0, 10)).unwrap();

        let ids: Vec<i64> = page.books.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(page.total_elements, 2);
    }

    #[test]
    fn sort_is_applied_before_slicing() {
        let books = vec![
            book(1, "c", "a", 1), // titles chosen so id order != title order
            book(2, "a", "a", 1),
            book(3, "b", "a", 1),
        ];

        let keys = [SortKey::asc(SortField::Title)];
        let first = run_query(books.clone(), match_all(), &keys, PageRequest::new(0, 2)).unwrap();
        let second = run_query(books, match_all(), &keys, PageRequest::new(1, 2)).unwrap();

        let ids: Vec<i64> = first
            .books
            .iter()
            .chain(second.books.iter())
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn text_sort_is_case_insensitive_and_stable() {
        let books = vec![
            book(1, "alpha", "x", 1),
            book(2, "Alpha", "y", 2),
            book(3, "ALPHA", "z", 3),
        ];

        let keys = [SortKey::asc(SortField::Title)];
        let page = run_query(books, match_all(), &keys, PageRequest::new(0, 10)).unwrap();

        let ids: Vec<i64> = page.books.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn later_keys_break_ties_and_desc_reverses_per_key() {
        let books = vec![
            book(1, "same", "b", 1),
            book(2, "same", "a", 1),
            book(3, "other", "c", 1),
        ];

        let keys = [
            SortKey::asc(SortField::Title),
            SortKey {
                field: SortField::Author,
                direction: SortDirection::Desc,
            },
        ];
        let page = run_query(books, match_all(), &keys, PageRequest::new(0, 10)).unwrap();

        let ids: Vec<i64> = page.books.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn pagination_arithmetic_matches_contract() {
        let books: Vec<Book> = (1..=5).map(|id| book(id, "t", "a", 2000)).collect();

        let page0 = run_query(books.clone(), match_all(), &[], PageRequest::new(0, 2)).unwrap();
        assert_eq!(page0.books.len(), 2);
        assert_eq!(page0.total_elements, 5);
        assert_eq!(page0.total_pages(), 3);

        let page2 = run_query(books.clone(), match_all(), &[], PageRequest::new(2, 2)).unwrap();
        assert_eq!(page2.books.len(), 1);
        assert_eq!(page2.books[0].id, 5);
        assert_eq!(page2.total_elements, 5);

        let page3 = run_query(books, match_all(), &[], PageRequest::new(3, 2)).unwrap();
        assert!(page3.books.is_empty());
        assert_eq!(page3.total_elements, 5);
    }

    #[test]
    fn zero_page_size_is_rejected_before_filtering() {
        let err = run_query(Vec::new(), match_all(), &[], PageRequest::new(0, 0)).unwrap_err();
        assert_eq!(err, QueryError::InvalidPageSize);
    }

    #[test]
    fn blank_search_arguments_fail_at_the_boundary() {
        assert!(matches!(
            keyword_predicate("  ").err().unwrap(),
            QueryError::BlankKeyword
        ));
        assert!(matches!(
            author_predicate("").err().unwrap(),
            QueryError::BlankAuthor
        ));
        assert!(matches!(
            year_predicate(2101).err().unwrap(),
            QueryError::YearOutOfRange(2101)
        ));
        assert!(matches!(
            title_author_predicate(Some("  "), None).err().unwrap(),
            QueryError::MissingSearchTerms
        ));
    }

    #[test]
    fn title_author_blank_side_matches_vacuously() {
        let books = vec![
            book(1, "Dune", "Herbert", 1965),
            book(2, "Dune Messiah", "Herbert", 1969),
            book(3, "Foundation", "Asimov", 1951),
        ];

        let predicate = title_author_predicate(Some("dune"), Some(" ")).unwrap();
        let page = run_query(books.clone(), predicate, &[], PageRequest::new(0, 10)).unwrap();
        assert_eq!(page.total_elements, 2);

        let predicate = title_author_predicate(Some("dune"), Some("asimov")).unwrap();
        let page = run_query(books, predicate, &[], PageRequest::new(0, 10)).unwrap();
        assert_eq!(page.total_elements, 0);
        assert!(page.books.is_empty());
    }
}
