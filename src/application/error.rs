use thiserror::Error;

use crate::domain::MAX_ENTRIES;

/// What a submission was recording, for user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Expense,
    Income,
}

/// Rejected user input. Always recoverable; nothing has been written when
/// one of these is returned. Messages are meant to be shown as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid date '{0}'. Please enter a valid date in YYYY-MM-DD format.")]
    InvalidDate(String),

    #[error("Invalid month '{0}'. Please enter a valid month in YYYY-MM format.")]
    InvalidMonth(String),

    #[error("{}", no_valid_entries_message(.0))]
    NoValidEntries(EntryKind),

    #[error("Too many entries: {0} given, at most {max} allowed", max = MAX_ENTRIES)]
    TooManyEntries(usize),

    #[error("Invalid record ID '{0}'. Please enter a valid ID.")]
    InvalidId(String),

    #[error("Unknown table '{0}'. Valid tables: expenses, income")]
    UnknownTable(String),
}

fn no_valid_entries_message(kind: &EntryKind) -> &'static str {
    match kind {
        EntryKind::Expense => "No valid expenses were entered!",
        EntryKind::Income => "No valid income details were entered!",
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Database error: {0:#}")]
    Database(#[from] anyhow::Error),
}
