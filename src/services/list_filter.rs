//! Field-scoped, case-insensitive search shared by every list screen.

use std::borrow::Cow;

use crate::client::{Listing, PageMeta};

/// A record that can be searched and grouped by category.
pub trait Searchable {
    /// String attributes consulted when searching across all fields.
    const SEARCH_FIELDS: &'static [&'static str];

    /// Value of a named attribute, `None` when absent or unknown.
    fn field_value(&self, field: &str) -> Option<Cow<'_, str>>;

    /// Controlled-vocabulary attribute used by the category tabs.
    fn category(&self) -> Option<&str> {
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum SearchField {
    #[default]
    All,
    Named(String),
}

impl From<&str> for SearchField {
    fn from(value: &str) -> Self {
        match value.trim() {
            "" | "all" => SearchField::All,
            name => SearchField::Named(name.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        match value {
            "" | "all" => CategoryFilter::All,
            other => CategoryFilter::Only(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ListQuery {
    pub text: String,
    pub field: SearchField,
    pub category: CategoryFilter,
}

impl ListQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_field(mut self, field: impl Into<SearchField>) -> Self {
        self.field = field.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<CategoryFilter>) -> Self {
        self.category = category.into();
        self
    }

    /// Normalized needle, `None` when the text filter is a no-op.
    fn needle(&self) -> Option<String> {
        let needle = self.text.trim().to_lowercase();
        if needle.is_empty() {
            None
        } else {
            Some(needle)
        }
    }
}

fn contains_ci(value: Option<Cow<'_, str>>, needle: &str) -> bool {
    value
        .map(|v| v.to_lowercase().contains(needle))
        .unwrap_or(false)
}

fn passes_category<T: Searchable>(record: &T, category: &CategoryFilter) -> bool {
    match category {
        CategoryFilter::All => true,
        CategoryFilter::Only(expected) => record.category() == Some(expected.as_str()),
    }
}

fn passes_text<T: Searchable>(record: &T, field: &SearchField, needle: Option<&str>) -> bool {
    let Some(needle) = needle else {
        return true;
    };

    match field {
        SearchField::All => T::SEARCH_FIELDS
            .iter()
            .any(|name| contains_ci(record.field_value(name), needle)),
        SearchField::Named(name) => contains_ci(record.field_value(name), needle),
    }
}

pub fn matches<T: Searchable>(record: &T, query: &ListQuery) -> bool {
    passes_category(record, &query.category)
        && passes_text(record, &query.field, query.needle().as_deref())
}

/// Order-preserving filter; the source slice is left untouched.
pub fn filter_records<T: Searchable + Clone>(records: &[T], query: &ListQuery) -> Vec<T> {
    let needle = query.needle();
    records
        .iter()
        .filter(|r| passes_category(*r, &query.category))
        .filter(|r| passes_text(*r, &query.field, needle.as_deref()))
        .cloned()
        .collect()
}

/// First `n` records of the filtered view, in source order.
pub fn take_top<T: Searchable + Clone>(records: &[T], query: &ListQuery, n: usize) -> Vec<T> {
    let mut selected = filter_records(records, query);
    selected.truncate(n);
    selected
}

/// Slices an in-memory list into a page, reporting metadata the way the
/// backend's paginated envelope does (`from`/`to` are 1-based, absent when
/// the page is empty).
pub fn paginate<T: Clone>(items: &[T], page: u32, per_page: u32) -> Listing<T> {
    let per_page = per_page.max(1);
    let total = items.len() as u64;
    let last_page = (total.div_ceil(per_page as u64)).max(1) as u32;
    let current_page = page.clamp(1, last_page);

    let start = ((current_page - 1) as usize) * per_page as usize;
    let end = (start + per_page as usize).min(items.len());
    let slice = if start < items.len() {
        items[start..end].to_vec()
    } else {
        Vec::new()
    };

    let (from, to) = if slice.is_empty() {
        (None, None)
    } else {
        (Some(start as u64 + 1), Some(end as u64))
    };

    Listing {
        items: slice,
        page: Some(PageMeta {
            current_page,
            last_page,
            per_page,
            total,
            from,
            to,
        }),
    }
}

/// Memoized filtered view over a record list.
///
/// The derived list is recomputed only when the records or one of the
/// query parts actually change.
#[derive(Debug, Clone)]
pub struct FilteredView<T> {
    records: Vec<T>,
    query: ListQuery,
    cache: Option<Vec<T>>,
    recomputations: usize,
}

impl<T: Searchable + Clone> Default for FilteredView<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: Searchable + Clone> FilteredView<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self {
            records,
            query: ListQuery::default(),
            cache: None,
            recomputations: 0,
        }
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn set_records(&mut self, records: Vec<T>) {
        self.records = records;
        self.cache = None;
    }

    /// Mutates records in place (e.g. reconciling a bulk update) and
    /// invalidates the derived list.
    pub fn update_records(&mut self, update: impl FnOnce(&mut Vec<T>)) {
        update(&mut self.records);
        self.cache = None;
    }

    pub fn set_query(&mut self, query: ListQuery) {
        if self.query != query {
            self.query = query;
            self.cache = None;
        }
    }

    pub fn set_text(&mut self, text: &str) {
        let query = ListQuery {
            text: text.to_string(),
            ..self.query.clone()
        };
        self.set_query(query);
    }

    pub fn set_field(&mut self, field: impl Into<SearchField>) {
        let query = self.query.clone().with_field(field);
        self.set_query(query);
    }

    pub fn set_category(&mut self, category: impl Into<CategoryFilter>) {
        let query = self.query.clone().with_category(category);
        self.set_query(query);
    }

    pub fn view(&mut self) -> &[T] {
        if self.cache.is_none() {
            self.recomputations += 1;
            self.cache = Some(filter_records(&self.records, &self.query));
        }
        self.cache.as_deref().unwrap_or(&[])
    }

    pub fn recomputations(&self) -> usize {
        self.recomputations
    }
}
