mod common;

use common::{date, open_manager, setup_test_env, temp_base};
use finance_core::{
    core::services::{BudgetService, DebtService, SavingsService, SummaryService, TransactionService},
    ledger::{Budget, Category, Debt, DebtStatus, MonthPeriod, SavingsGoal, Transaction},
    storage::{StorageBackend, BUDGETS_KEY},
};

#[test]
fn recurring_templates_materialize_once_per_month_across_reopens() {
    let base = temp_base();
    {
        let mut manager = open_manager(&base, date(2024, 6, 5));
        let clock_today = manager.today();
        let template = Transaction::expense(500.0, Category::Housing, date(2024, 6, 1), "Rent")
            .recurring_on(1);
        let ledger = manager.ledger_mut();
        ledger.transactions.push(template);
        assert_eq!(clock_today, date(2024, 6, 5));
        manager.save().unwrap();
    }

    let manager = open_manager(&base, date(2024, 6, 5));
    assert_eq!(manager.materialized_on_open().len(), 1);
    assert_eq!(manager.ledger().transactions.len(), 2);

    let again = open_manager(&base, date(2024, 6, 28));
    assert!(again.materialized_on_open().is_empty());
    assert_eq!(again.ledger().transactions.len(), 2);

    let july = open_manager(&base, date(2024, 7, 1));
    assert_eq!(july.materialized_on_open().len(), 1);
    let generated = july
        .ledger()
        .transactions
        .iter()
        .filter(|txn| txn.template_id.is_some())
        .count();
    assert_eq!(generated, 2);
}

#[test]
fn services_changes_survive_save_and_reload() {
    let today = date(2024, 3, 15);
    let (mut manager, _config, base) = setup_test_env(today);
    let march = MonthPeriod::of(today);
    let clock = finance_core::core::FixedClock::on(today);

    let ledger = manager.ledger_mut();
    TransactionService::add(
        ledger,
        Transaction::income(3000.0, Category::Salary, date(2024, 3, 1), "pay"),
        &clock,
    )
    .unwrap();
    TransactionService::add(
        ledger,
        Transaction::expense(450.0, Category::Food, date(2024, 3, 4), "market"),
        &clock,
    )
    .unwrap();
    let budget_id =
        BudgetService::add(ledger, Budget::new(Category::Food, 600.0, march), &clock).unwrap();
    let goal_id = SavingsService::add(
        ledger,
        SavingsGoal::new("Vacaciones", 2000.0, date(2024, 12, 31)),
        &clock,
    )
    .unwrap();
    SavingsService::contribute(ledger, &goal_id, 500.0, &clock).unwrap();
    let debt_id =
        DebtService::add(ledger, Debt::new("Tarjeta", 1000.0, 0.0, 250.0), &clock).unwrap();
    DebtService::add_payment(ledger, &debt_id, 1000.0, &clock).unwrap();
    manager.save().unwrap();

    let reopened = open_manager(&base, today);
    let ledger = reopened.ledger();
    let budget = ledger.budget(&budget_id).unwrap();
    assert_eq!(BudgetService::evaluate(ledger, budget).percentage, 75.0);
    assert_eq!(ledger.goal(&goal_id).unwrap().current_amount, 500.0);
    assert_eq!(ledger.debt(&debt_id).unwrap().status, DebtStatus::Paid);
    assert_eq!(SummaryService::monthly_balance(ledger, march).balance, 2550.0);
}

#[test]
fn export_then_import_into_fresh_directory() {
    let today = date(2024, 6, 10);
    let (mut manager, _config, base) = setup_test_env(today);
    manager.ledger_mut().transactions.push(Transaction::expense(
        80.0,
        Category::Transportation,
        date(2024, 6, 2),
        "bus",
    ));
    manager.save().unwrap();

    let export_path = base.join("export.json");
    manager.export_to(&export_path).unwrap();
    let json = std::fs::read_to_string(&export_path).unwrap();
    assert!(json.contains("\"version\": \"1.0\""));

    let other = temp_base();
    let mut target = open_manager(&other, today);
    target.import_from(&export_path).unwrap();
    assert_eq!(target.ledger().transactions, manager.ledger().transactions);

    let reopened = open_manager(&other, today);
    assert_eq!(reopened.ledger().transactions.len(), 1);
}

#[test]
fn invalid_import_leaves_storage_untouched() {
    let today = date(2024, 6, 10);
    let (mut manager, _config, _base) = setup_test_env(today);
    manager
        .ledger_mut()
        .budgets
        .push(Budget::new(Category::Food, 100.0, MonthPeriod::of(today)));
    manager.save().unwrap();
    let before = manager.storage().read(BUDGETS_KEY).unwrap();

    let bad = r#"{
        "transactions": [],
        "budgets": [{"id": "b1", "category": "food", "plannedAmount": 10, "month": 12, "year": 2024}]
    }"#;
    assert!(manager.import_json(bad).is_err());
    assert_eq!(manager.storage().read(BUDGETS_KEY).unwrap(), before);
    assert_eq!(manager.ledger().budgets.len(), 1);
}

#[test]
fn imports_records_written_by_the_web_app() {
    let today = date(2024, 6, 10);
    let (mut manager, _config, _base) = setup_test_env(today);
    let json = r##"{
        "transactions": [
            {"id": "txn_1717200000000_abc", "type": "expense", "amount": 1200,
             "category": "other-expense", "date": "2024-06-01T03:00:00.000Z",
             "note": "Gimnasio", "isRecurring": true, "recurringDay": 1,
             "createdAt": "2024-06-01T10:00:00.000Z", "updatedAt": "2024-06-01T10:00:00.000Z"}
        ],
        "budgets": [],
        "savings": [
            {"id": "goal_1", "name": "Auto", "targetAmount": 5000, "currentAmount": 1000,
             "deadline": "2025-01-01", "color": "#3b82f6"}
        ],
        "holiday": {"budgets": [], "aguinaldo": null},
        "exportDate": "2024-06-10T12:00:00.000Z",
        "version": "1.0"
    }"##;
    manager.import_json(json).unwrap();
    let ledger = manager.ledger();
    assert_eq!(ledger.transactions[0].category, Category::OtherExpense);
    assert_eq!(ledger.transactions[0].date, date(2024, 6, 1));
    assert!(ledger.transactions[0].is_template());
    assert_eq!(ledger.savings_goals[0].color, "#3b82f6");
}

#[test]
fn backup_restore_returns_to_snapshot() {
    let today = date(2024, 6, 10);
    let (mut manager, _config, _base) = setup_test_env(today);
    manager.ledger_mut().transactions.push(Transaction::income(
        10.0,
        Category::Freelance,
        date(2024, 6, 3),
        "gig",
    ));
    manager.save().unwrap();
    let name = manager.backup(Some("one gig")).unwrap();

    manager.clear_all().unwrap();
    assert!(manager.ledger().is_empty());

    manager.restore_backup(&name).unwrap();
    assert_eq!(manager.ledger().transactions.len(), 1);
    assert_eq!(manager.list_backups().unwrap(), vec![name]);
}
