mod common;

use anyhow::Result;
use common::{entries, test_service};
use expensa::application::{AppError, EntryKind, ValidationError};

#[tokio::test]
async fn test_add_then_list_income() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let saved = service
        .add_income("2024-01", &entries(&[("salary", "1500"), ("freelance", "250.75")]))
        .await?;

    let records = service.list_income().await?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, saved.id);
    assert_eq!(records[0].month.to_string(), "2024-01");
    assert_eq!(records[0].details.get("salary"), Some(1500.0));
    assert_eq!(records[0].details.get("freelance"), Some(250.75));
    assert_eq!(records[0].total(), 1750.75);

    Ok(())
}

#[tokio::test]
async fn test_income_rejects_invalid_month() -> Result<()> {
    let (service, _temp) = test_service().await?;

    for month in ["2024-13", "2024-01-05", "2024", "", "Jan 2024", "24-01"] {
        let result = service.add_income(month, &entries(&[("salary", "100")])).await;
        assert!(
            matches!(result, Err(AppError::Validation(ValidationError::InvalidMonth(_)))),
            "month {:?} should be rejected",
            month
        );
    }
    assert!(service.list_income().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_income_rejects_when_no_entry_is_valid() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let result = service
        .add_income("2024-01", &entries(&[("", "100"), ("bonus", "lots")]))
        .await;

    match result {
        Err(AppError::Validation(err)) => {
            assert_eq!(err, ValidationError::NoValidEntries(EntryKind::Income));
            assert_eq!(err.to_string(), "No valid income details were entered!");
        }
        other => panic!("expected validation error, got {:?}", other.map(|r| r.id)),
    }

    Ok(())
}

#[tokio::test]
async fn test_list_income_ordered_by_month() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .add_income("2024-03", &entries(&[("salary", "1000")]))
        .await?;
    service
        .add_income("2023-12", &entries(&[("salary", "900")]))
        .await?;
    service
        .add_income("2024-03", &entries(&[("bonus", "50")]))
        .await?;

    let months: Vec<String> = service
        .list_income()
        .await?
        .iter()
        .map(|r| r.month.to_string())
        .collect();
    assert_eq!(months, vec!["2023-12", "2024-03", "2024-03"]);

    Ok(())
}

#[tokio::test]
async fn test_income_view_lists_shared_months_separately() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service
        .add_income("2024-01", &entries(&[("salary", "1000"), ("tips", "20")]))
        .await?;
    service
        .add_income("2024-01", &entries(&[("bonus", "300")]))
        .await?;

    let lines = service.income_view().await?;
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].monthly_total, 1020.0);
    assert_eq!(lines[1].monthly_total, 300.0);

    Ok(())
}
