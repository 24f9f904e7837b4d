mod common;

use anyhow::Result;
use common::test_service;

#[tokio::test]
async fn test_summary_scenario() -> Result<()> {
    let (service, _temp) = test_service().await?;

    service.add_income("Salary", 300000, None).await?;
    service
        .add_expense("Rent", 120000, None, Some("Housing".to_string()), None)
        .await?;
    service
        .add_expense("Groceries", 20000, None, Some("Groceries".to_string()), None)
        .await?;

    assert_eq!(service.total_expenses().await?, 140000);

    // Income rows first, then expenses, each block in insertion order
    let report = service.report().await?;
    assert_eq!(report.income.len(), 1);
    assert_eq!(report.income[0].source, "Salary");
    assert_eq!(report.expenses.len(), 2);
    assert_eq!(report.expenses[0].name, "Rent");
    assert_eq!(report.expenses[1].name, "Groceries");

    assert_eq!(report.net(), 160000);

    Ok(())
}

#[tokio::test]
async fn test_report_insertion_order_survives_deletes() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let a = service.add_expense("A", 100, None, None, None).await?;
    service.add_expense("B", 200, None, None, None).await?;
    service.add_expense("C", 300, None, None, None).await?;

    service.delete_expense(a.id).await?;

    let report = service.report().await?;
    let names: Vec<&str> = report.expenses.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["B", "C"]);

    Ok(())
}

#[tokio::test]
async fn test_join_report_empty_without_links() -> Result<()> {
    let (service, _temp) = test_service().await?;

    // Plenty of rows, but no income_id/budget_id links anywhere
    service.add_income("Salary", 300000, None).await?;
    service
        .add_expense("Rent", 120000, None, Some("Housing".to_string()), None)
        .await?;
    service.create_budget("Housing", 150000).await?;
    service
        .add_savings_goal("Emergency Fund", 500000, "2026-12-31", None)
        .await?;

    let rows = service.join_report().await?;
    assert!(rows.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_join_report_with_linked_rows() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let income = service.add_income("Salary", 300000, None).await?;
    let budget = service.create_budget("Groceries", 30000).await?;
    service
        .add_expense(
            "Weekly shop",
            8500,
            None,
            Some("Groceries".to_string()),
            Some(income.id),
        )
        .await?;
    service
        .add_savings_goal("Emergency Fund", 500000, "2026-12-31", Some(budget.id))
        .await?;

    let rows = service.join_report().await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].income_source, "Salary");
    assert_eq!(rows[0].expense_name, "Weekly shop");
    assert_eq!(rows[0].budget_category, "Groceries");
    assert_eq!(rows[0].goal_name, "Emergency Fund");

    Ok(())
}

#[tokio::test]
async fn test_join_report_requires_all_three_links() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let income = service.add_income("Salary", 300000, None).await?;
    let budget = service.create_budget("Groceries", 30000).await?;

    // Expense linked to income but filed under a category no budget tracks
    service
        .add_expense(
            "Cinema",
            1500,
            None,
            Some("Entertainment".to_string()),
            Some(income.id),
        )
        .await?;
    service
        .add_savings_goal("Emergency Fund", 500000, "2026-12-31", Some(budget.id))
        .await?;

    let rows = service.join_report().await?;
    assert!(rows.is_empty());

    Ok(())
}
