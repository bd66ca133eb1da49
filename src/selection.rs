//! Operator category selection
//!
//! Interactive menus live outside the library. Whatever front end is used
//! only has to turn the listed categories into the subset it wants downloaded.

use crate::types::{Category, CategoryId};

/// Chooses which of the listed categories to download
pub trait CategorySelector: Send + Sync {
    /// Return the chosen categories, in the order they should be processed
    fn select(&self, available: &[Category]) -> Vec<Category>;
}

/// Select every listed category
#[derive(Clone, Copy, Debug, Default)]
pub struct SelectAll;

impl CategorySelector for SelectAll {
    fn select(&self, available: &[Category]) -> Vec<Category> {
        available.to_vec()
    }
}

/// Select categories by title, ignoring case
///
/// Titles are not unique; every category carrying a wanted title is selected.
/// Unknown titles are ignored.
#[derive(Clone, Debug, Default)]
pub struct SelectByTitle {
    titles: Vec<String>,
}

impl SelectByTitle {
    /// Create a selector for the given titles
    pub fn new<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            titles: titles
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .collect(),
        }
    }
}

impl CategorySelector for SelectByTitle {
    fn select(&self, available: &[Category]) -> Vec<Category> {
        available
            .iter()
            .filter(|c| self.titles.contains(&c.title.trim().to_lowercase()))
            .cloned()
            .collect()
    }
}

/// Select categories by id
#[derive(Clone, Debug, Default)]
pub struct SelectById {
    ids: Vec<CategoryId>,
}

impl SelectById {
    /// Create a selector for the given ids
    pub fn new<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<CategoryId>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }
}

impl CategorySelector for SelectById {
    fn select(&self, available: &[Category]) -> Vec<Category> {
        available
            .iter()
            .filter(|c| self.ids.contains(&c.id))
            .cloned()
            .collect()
    }
}
