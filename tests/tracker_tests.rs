// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use pocketbook::aggregate::{DateRange, GoalStatus};
use pocketbook::errors::{FinanceError, RemoteError};
use pocketbook::models::{
    DebtPatch, GoalPatch, NewDebt, NewGoal, NewIncome, OwnerId, PaymentMethod,
};
use pocketbook::store::{MemoryStore, SqliteStore};
use pocketbook::store::FinanceStore;
use pocketbook::tracker::{ExportTemplate, Tracker, OPENING_BALANCE};
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn noon(s: &str) -> NaiveDateTime {
    day(s).and_hms_opt(12, 0, 0).unwrap()
}

fn income(category: &str, value: &str, date: &str) -> NewIncome {
    NewIncome {
        category: category.into(),
        subcategory: String::new(),
        value: dec(value),
        date: day(date),
    }
}

fn debt(category: &str, value: &str, method: PaymentMethod) -> NewDebt {
    NewDebt {
        category: category.into(),
        subcategory: String::new(),
        value: dec(value),
        interest: dec("3"),
        installments: 12,
        due_date: Some(day("2024-01-20")),
        payment_method: method,
    }
}

fn goal(name: &str, target: &str) -> NewGoal {
    NewGoal {
        name: name.into(),
        category: "Travel".into(),
        subcategory: String::new(),
        target_value: dec(target),
        accumulated_value: Decimal::ZERO,
        start_date: day("2024-01-01"),
        end_date: Some(day("2024-12-31")),
    }
}

#[test]
fn writes_reload_the_record_sets() {
    let mut store = MemoryStore::new();
    let mut t = Tracker::load(&mut store, OwnerId::new("u")).unwrap();
    t.add_income(income("Salary", "1000", "2024-01-15")).unwrap();
    t.add_debt(debt("Housing", "400", PaymentMethod::BankSlip)).unwrap();
    assert_eq!(t.incomes().len(), 1);
    assert_eq!(t.debts().len(), 1);

    let jan = DateRange::month(2024, 1).unwrap();
    let s = t.summary(&jan);
    assert_eq!(s.balance, dec("600"));
    assert_eq!(t.totals().total_debts, dec("400"));
}

#[test]
fn validation_rejects_before_touching_store() {
    let mut store = MemoryStore::new();
    let mut t = Tracker::load(&mut store, OwnerId::new("u")).unwrap();

    let err = t.add_income(income("  ", "10", "2024-01-01")).unwrap_err();
    assert!(matches!(err, FinanceError::Validation(_)));
    let err = t.add_income(income("Salary", "-1", "2024-01-01")).unwrap_err();
    assert!(matches!(err, FinanceError::Validation(_)));
    let err = t.add_goal(goal("", "100")).unwrap_err();
    assert!(matches!(err, FinanceError::Validation(_)));
    let err = t.add_goal(goal("Trip", "0")).unwrap_err();
    assert!(matches!(err, FinanceError::Validation(_)));

    let backwards = NewGoal {
        end_date: Some(day("2023-12-31")),
        ..goal("Trip", "100")
    };
    assert!(matches!(
        t.add_goal(backwards).unwrap_err(),
        FinanceError::Validation(_)
    ));

    assert!(t.incomes().is_empty());
    assert!(t.goals().is_empty());
}

#[test]
fn instant_payments_drop_credit_fields() {
    let mut store = MemoryStore::new();
    let mut t = Tracker::load(&mut store, OwnerId::new("u")).unwrap();
    t.add_debt(debt("Groceries", "80", PaymentMethod::InstantTransfer))
        .unwrap();
    let d = &t.debts()[0];
    assert_eq!(d.interest, Decimal::ZERO);
    assert_eq!(d.installments, 0);
    assert_eq!(d.due_date, None);
}

#[test]
fn switching_debt_to_cash_clears_schedule() {
    let mut store = MemoryStore::new();
    let mut t = Tracker::load(&mut store, OwnerId::new("u")).unwrap();
    let id = t.add_debt(debt("Card", "300", PaymentMethod::CreditCard)).unwrap();
    t.update_debt(
        id,
        DebtPatch {
            payment_method: Some(PaymentMethod::Cash),
            ..DebtPatch::default()
        },
    )
    .unwrap();
    let d = &t.debts()[0];
    assert_eq!(d.payment_method, PaymentMethod::Cash);
    assert_eq!(d.installments, 0);
    assert_eq!(d.due_date, None);
}

#[test]
fn failed_write_keeps_loaded_sets() {
    let mut store = MemoryStore::new();
    let mut t = Tracker::load(&mut store, OwnerId::new("u")).unwrap();
    t.add_income(income("Salary", "10", "2024-01-01")).unwrap();
    let before = t.records().clone();
    let err = t.delete_income(9999).unwrap_err();
    assert!(matches!(
        err,
        FinanceError::Remote(RemoteError::NotFound { .. })
    ));
    assert_eq!(t.records(), &before);
}

#[test]
fn contributions_track_goal_progress() {
    let mut store = SqliteStore::in_memory().unwrap();
    let mut t = Tracker::load(&mut store, OwnerId::new("u")).unwrap();
    let goal_id = t.add_goal(goal("Trip", "500")).unwrap();
    let income_id = t.add_income(income("Bonus", "200", "2024-02-01")).unwrap();

    t.contribute(goal_id, dec("300"), Some("  ".into()), noon("2024-02-01"))
        .unwrap();
    let linked = t
        .contribute_income(goal_id, income_id, None, noon("2024-02-02"))
        .unwrap();

    let p = t.goal_progress(goal_id, noon("2024-03-01")).unwrap();
    assert_eq!(p.accumulated, dec("500"));
    assert_eq!(p.status, GoalStatus::Completed);
    assert_eq!(p.contributions.len(), 2);
    assert_eq!(p.contributions[0].description, None);
    assert_eq!(p.contributions[1].income_id, Some(income_id));

    t.remove_contribution(linked).unwrap();
    let p = t.goal_progress(goal_id, noon("2024-03-01")).unwrap();
    assert_eq!(p.accumulated, dec("300"));
    assert_eq!(p.progress, dec("60"));
    assert_eq!(p.status, GoalStatus::InProgress);
}

#[test]
fn contribution_value_must_be_positive() {
    let mut store = MemoryStore::new();
    let mut t = Tracker::load(&mut store, OwnerId::new("u")).unwrap();
    let goal_id = t.add_goal(goal("Trip", "500")).unwrap();
    let err = t
        .contribute(goal_id, Decimal::ZERO, None, noon("2024-02-01"))
        .unwrap_err();
    assert!(matches!(err, FinanceError::Validation(_)));
    assert!(t.contributions().is_empty());
}

#[test]
fn deleting_goal_removes_its_contributions() {
    let mut store = MemoryStore::new();
    let mut t = Tracker::load(&mut store, OwnerId::new("u")).unwrap();
    let keep = t.add_goal(goal("Car", "9000")).unwrap();
    let drop = t.add_goal(goal("Trip", "500")).unwrap();
    t.contribute(keep, dec("10"), None, noon("2024-02-01")).unwrap();
    t.contribute(drop, dec("20"), None, noon("2024-02-01")).unwrap();
    t.contribute(drop, dec("30"), None, noon("2024-02-02")).unwrap();

    t.delete_goal(drop).unwrap();
    assert_eq!(t.goals().len(), 1);
    assert_eq!(t.contributions().len(), 1);
    assert_eq!(t.contributions()[0].goal_id, keep);
}

#[test]
fn reconcile_rewrites_drifted_goal() {
    let mut store = MemoryStore::new();
    let mut t = Tracker::load(&mut store, OwnerId::new("u")).unwrap();
    let id = t.add_goal(goal("Trip", "500")).unwrap();
    t.contribute(id, dec("120"), None, noon("2024-02-01")).unwrap();
    assert!(t.reconcile_goal(id).unwrap().is_none());

    t.update_goal(
        id,
        GoalPatch {
            accumulated_value: Some(dec("999")),
            ..GoalPatch::default()
        },
    )
    .unwrap();
    assert_eq!(t.drifted_goals().len(), 1);

    let fixed = t.reconcile_goal(id).unwrap().unwrap();
    assert_eq!(fixed.stored, dec("999"));
    assert_eq!(fixed.actual, dec("120"));
    assert_eq!(t.goal(id).unwrap().accumulated_value, dec("120"));
    assert!(t.drifted_goals().is_empty());
}

#[test]
fn opening_balance_survives_contributions_and_reconcile() {
    let backings: Vec<Box<dyn FinanceStore>> = vec![
        Box::new(MemoryStore::new()),
        Box::new(SqliteStore::in_memory().unwrap()),
    ];
    for mut store in backings {
        let mut t = Tracker::load(store.as_mut(), OwnerId::new("u")).unwrap();
        let seeded = NewGoal {
            accumulated_value: dec("100"),
            ..goal("Trip", "500")
        };
        let id = t.add_goal(seeded).unwrap();
        assert_eq!(t.goal(id).unwrap().accumulated_value, dec("100"));
        assert_eq!(t.contributions().len(), 1);
        assert_eq!(t.contributions()[0].description.as_deref(), Some(OPENING_BALANCE));
        assert_eq!(t.contributions()[0].created_at, day("2024-01-01").and_hms_opt(0, 0, 0).unwrap());

        let c = t.contribute(id, dec("50"), None, noon("2024-02-01")).unwrap();
        assert_eq!(t.goal(id).unwrap().accumulated_value, dec("150"));
        assert!(t.drifted_goals().is_empty());
        assert!(t.reconcile_goal(id).unwrap().is_none());

        t.remove_contribution(c).unwrap();
        assert_eq!(t.goal(id).unwrap().accumulated_value, dec("100"));
        assert!(t.drifted_goals().is_empty());
    }
}

#[test]
fn goal_edit_checks_the_merged_window() {
    let mut store = MemoryStore::new();
    let mut t = Tracker::load(&mut store, OwnerId::new("u")).unwrap();
    let id = t.add_goal(goal("Trip", "500")).unwrap();
    let err = t
        .update_goal(
            id,
            GoalPatch {
                start_date: Some(day("2025-06-01")),
                ..GoalPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, FinanceError::Validation(_)));

    t.update_goal(
        id,
        GoalPatch {
            end_date: Some(None),
            name: Some(" Japan ".into()),
            ..GoalPatch::default()
        },
    )
    .unwrap();
    let g = t.goal(id).unwrap();
    assert_eq!(g.name, "Japan");
    assert_eq!(g.end_date, None);
}

#[test]
fn statistics_follow_the_range() {
    let mut store = MemoryStore::new();
    let mut t = Tracker::load(&mut store, OwnerId::new("u")).unwrap();
    t.add_debt(debt("Housing", "800", PaymentMethod::BankSlip)).unwrap();
    t.add_debt(debt("Food", "200", PaymentMethod::CreditCard)).unwrap();
    t.add_debt(debt("Snacks", "5", PaymentMethod::Cash)).unwrap();

    let all = t.statistics(&DateRange::all()).unwrap();
    assert_eq!(all.total_debts, dec("1005"));

    let jan = t.statistics(&DateRange::month(2024, 1).unwrap()).unwrap();
    assert_eq!(jan.total_debts, dec("1000"));
    assert_eq!(jan.max_category, "Housing");

    assert!(t.statistics(&DateRange::month(2023, 1).unwrap()).is_none());
}

#[test]
fn export_uses_loaded_records() {
    let mut store = MemoryStore::new();
    let mut t = Tracker::load(&mut store, OwnerId::new("u")).unwrap();
    t.add_income(income("Salary", "1000", "2024-01-15")).unwrap();
    t.add_income(income("Gift", "50", "2024-02-15")).unwrap();

    let jan = DateRange::month(2024, 1).unwrap();
    let csv = t.export(ExportTemplate::Incomes, &jan).unwrap();
    assert_eq!(csv, "Category,Subcategory,Value,Date\nSalary,,1000,2024-01-15\n");

    let summary = t.export(ExportTemplate::Summary, &DateRange::all()).unwrap();
    assert_eq!(summary, "Incomes,Debts,Balance\n1050,0,1050\n");
}

#[test]
fn owners_do_not_see_each_other() {
    let mut store = MemoryStore::new();
    {
        let mut a = Tracker::load(&mut store, OwnerId::new("a")).unwrap();
        a.add_income(income("Salary", "1", "2024-01-01")).unwrap();
    }
    let b = Tracker::load(&mut store, OwnerId::new("b")).unwrap();
    assert!(b.incomes().is_empty());
}
