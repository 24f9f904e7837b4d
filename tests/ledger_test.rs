mod common;

use anyhow::Result;
use chrono::Local;
use common::{parse_date, test_service};
use fiscus::application::AppError;
use fiscus::domain::DEFAULT_CATEGORY;

#[tokio::test]
async fn test_add_income_appears_in_report() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.add_income("Salary", 300000, None).await?;

    let report = service.report().await?;
    assert_eq!(report.income.len(), 1);
    assert_eq!(report.income[0].source, "Salary");
    assert_eq!(report.income[0].amount_cents, 300000);
    // Date defaults to the call date when omitted
    assert_eq!(report.income[0].date, Local::now().date_naive());

    Ok(())
}

#[tokio::test]
async fn test_add_income_with_explicit_date() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let date = parse_date("2024-01-15");
    let entry = service.add_income("Freelance", 50000, Some(date)).await?;
    assert_eq!(entry.date, date);

    let report = service.report().await?;
    assert_eq!(report.income[0].date, date);

    Ok(())
}

#[tokio::test]
async fn test_add_income_accepts_values_verbatim() -> Result<()> {
    let (service, _temp) = test_service().await?;

    // No validation on amount sign or source emptiness
    service.add_income("", -12345, None).await?;

    let report = service.report().await?;
    assert_eq!(report.income[0].source, "");
    assert_eq!(report.income[0].amount_cents, -12345);

    Ok(())
}

#[tokio::test]
async fn test_add_expense_defaults() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let entry = service.add_expense("Coffee", 350, None, None, None).await?;
    assert_eq!(entry.category, DEFAULT_CATEGORY);
    assert_eq!(entry.date, Local::now().date_naive());
    assert_eq!(entry.income_id, None);

    // An empty category also falls back to the default
    let entry = service
        .add_expense("Snack", 200, None, Some("".to_string()), None)
        .await?;
    assert_eq!(entry.category, DEFAULT_CATEGORY);

    Ok(())
}

#[tokio::test]
async fn test_delete_expense_removes_exactly_one_row() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let first = service.add_expense("Rent", 120000, None, None, None).await?;
    let second = service
        .add_expense("Groceries", 20000, None, None, None)
        .await?;

    service.delete_expense(first.id).await?;

    // Deleted row is gone, the other survives
    assert!(service.get_expense(first.id).await?.is_none());
    assert!(service.get_expense(second.id).await?.is_some());

    let report = service.report().await?;
    assert_eq!(report.expenses.len(), 1);
    assert_eq!(report.expenses[0].id, second.id);

    Ok(())
}

#[tokio::test]
async fn test_delete_expense_missing_id_signals_not_found() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.add_expense("Rent", 120000, None, None, None).await?;

    let err = service.delete_expense(9999).await.unwrap_err();
    assert!(matches!(err, AppError::ExpenseNotFound(9999)));
    // Error message carries the offending id
    assert!(err.to_string().contains("9999"));

    // Table unchanged
    let report = service.report().await?;
    assert_eq!(report.expenses.len(), 1);

    // Repeating the call is a no-op reporting the same condition
    let err = service.delete_expense(9999).await.unwrap_err();
    assert!(matches!(err, AppError::ExpenseNotFound(9999)));

    Ok(())
}

#[tokio::test]
async fn test_total_expenses_empty_is_zero() -> Result<()> {
    let (service, _temp) = test_service().await?;

    assert_eq!(service.total_expenses().await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_savings_goal_deadline_stored_as_free_text() -> Result<()> {
    let (service, _temp) = test_service().await?;

    // Deadline is not validated as a date
    let goal = service
        .add_savings_goal("Emergency Fund", 500000, "whenever possible", None)
        .await?;
    assert_eq!(goal.deadline, "whenever possible");

    let goals = service.list_savings_goals().await?;
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].deadline, "whenever possible");

    Ok(())
}

#[tokio::test]
async fn test_savings_goal_target_clamped() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let goal = service
        .add_savings_goal("Vacation", -10000, "2026-12-31", None)
        .await?;
    assert_eq!(goal.target_cents, 0);

    Ok(())
}
