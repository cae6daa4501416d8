//! Presentation state: the add form, the delete confirmation, and list
//! rendering grouped by category.

use clap::ValueEnum;
use std::fmt::Write;

use crate::models::{Category, NewPrayerEntry, PrayerEntry, ValidationError};

/// Which entries a list view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StatusFilter {
    #[default]
    All,
    Unanswered,
    Answered,
}

impl StatusFilter {
    pub fn matches(&self, entry: &PrayerEntry) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Unanswered => !entry.is_resolved,
            StatusFilter::Answered => entry.is_resolved,
        }
    }
}

/// The "add prayer" modal and its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct PrayerForm {
    pub open: bool,
    pub name: String,
    pub description: String,
    pub category: Category,
}

impl PrayerForm {
    pub fn new(category: Category) -> Self {
        Self {
            open: false,
            name: String::new(),
            description: String::new(),
            category,
        }
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Clears the fields and closes the modal. The category is kept.
    pub fn reset(&mut self) {
        *self = Self::new(self.category);
    }

    /// Validates the fields into a create request.
    pub fn to_new_entry(&self) -> Result<NewPrayerEntry, ValidationError> {
        NewPrayerEntry {
            name: self.name.clone(),
            description: Some(self.description.clone()),
            category: self.category,
        }
        .validate()
    }
}

/// The delete confirmation dialog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfirmDialog {
    target: Option<i64>,
}

impl ConfirmDialog {
    pub fn open(&mut self, id: i64) {
        self.target = Some(id);
    }

    pub fn close(&mut self) {
        self.target = None;
    }

    pub fn target(&self) -> Option<i64> {
        self.target
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }
}

/// Entries of `category` passing `filter`, in list order.
pub fn section<'a>(
    entries: &'a [PrayerEntry],
    category: Category,
    filter: StatusFilter,
) -> Vec<&'a PrayerEntry> {
    entries
        .iter()
        .filter(|e| e.category == category && filter.matches(e))
        .collect()
}

/// Renders one section per category (or just `only`), with a placeholder
/// line for empty sections.
pub fn render_list(
    entries: &[PrayerEntry],
    only: Option<Category>,
    filter: StatusFilter,
) -> String {
    let mut out = String::new();

    let categories: Vec<Category> = match only {
        Some(category) => vec![category],
        None => Category::ALL.to_vec(),
    };

    for (i, category) in categories.into_iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let title = category.title();
        let _ = writeln!(out, "{}", title);
        let _ = writeln!(out, "{}", "=".repeat(title.len()));

        let rows = section(entries, category, filter);
        if rows.is_empty() {
            let _ = writeln!(out, "No prayers found.");
        }
        for entry in rows {
            let _ = writeln!(out, "{}", entry);
        }
    }

    out
}
