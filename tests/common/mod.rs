// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use expensa::application::LedgerService;
use expensa::domain::EntryInput;
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::open(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to build raw entries from (name, amount) text pairs
pub fn entries(pairs: &[(&str, &str)]) -> Vec<EntryInput> {
    pairs
        .iter()
        .map(|(name, amount)| EntryInput::new(*name, *amount))
        .collect()
}
