// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, NaiveDateTime};
use pocketbook::aggregate::{
    end_of_day, filter_by_date_range, filter_dated, goal_progress, monthly_series, percent_of,
    reconciled_accumulated, statistics, summary, totals, DateRange, GoalStatus, MAX_SERIES_MONTHS,
};
use pocketbook::models::{Debt, Goal, GoalContribution, Income, OwnerId, PaymentMethod};
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").unwrap()
}

fn income(id: i64, value: &str, date: &str) -> Income {
    Income {
        id,
        owner: OwnerId::new("u1"),
        category: "Salary".into(),
        subcategory: String::new(),
        value: dec(value),
        date: day(date),
    }
}

fn debt(id: i64, category: &str, value: &str, due: Option<&str>) -> Debt {
    Debt {
        id,
        owner: OwnerId::new("u1"),
        category: category.into(),
        subcategory: String::new(),
        value: dec(value),
        interest: Decimal::ZERO,
        installments: 0,
        due_date: due.map(day),
        payment_method: PaymentMethod::CreditCard,
    }
}

fn goal(target: &str, accumulated: &str, end: Option<&str>) -> Goal {
    Goal {
        id: 1,
        owner: OwnerId::new("u1"),
        name: "Trip".into(),
        category: "Travel".into(),
        subcategory: String::new(),
        target_value: dec(target),
        accumulated_value: dec(accumulated),
        start_date: day("2024-01-01"),
        end_date: end.map(day),
    }
}

fn contribution(id: i64, goal_id: i64, value: &str) -> GoalContribution {
    GoalContribution {
        id,
        owner: OwnerId::new("u1"),
        goal_id,
        income_id: None,
        value: dec(value),
        description: None,
        created_at: at("2024-02-01 10:00:00"),
    }
}

#[test]
fn january_summary_matches_hand_totals() {
    let incomes = vec![income(1, "1000", "2024-01-15")];
    let debts = vec![debt(1, "Housing", "400", Some("2024-01-20"))];
    let jan = DateRange::month(2024, 1).unwrap();
    let s = summary(&incomes, &debts, &jan);
    assert_eq!(s.incomes, dec("1000"));
    assert_eq!(s.debts, dec("400"));
    assert_eq!(s.balance, dec("600"));
}

#[test]
fn balance_may_go_negative() {
    let incomes = vec![income(1, "100", "2024-03-01")];
    let debts = vec![debt(1, "Food", "250.50", Some("2024-03-02"))];
    let s = summary(&incomes, &debts, &DateRange::all());
    assert_eq!(s.balance, dec("-150.50"));
}

#[test]
fn totals_ignore_order() {
    let a = vec![
        income(1, "10.10", "2024-01-01"),
        income(2, "20.20", "2024-02-01"),
        income(3, "0.01", "2024-03-01"),
    ];
    let mut b = a.clone();
    b.reverse();
    assert_eq!(totals(&a, &[]), totals(&b, &[]));
    assert_eq!(totals(&a, &[]).total_incomes, dec("30.31"));
}

#[test]
fn statistics_breaks_down_categories() {
    let debts = vec![
        debt(1, "Housing", "800", Some("2024-01-05")),
        debt(2, "Food", "200", Some("2024-01-06")),
    ];
    let stats = statistics(&debts).unwrap();
    assert_eq!(stats.max_category, "Housing");
    assert_eq!(stats.max_debt.id, 1);
    assert_eq!(stats.total_debts, dec("1000"));
    assert_eq!(stats.percentages.len(), 2);
    assert_eq!(stats.percentages[0].category, "Housing");
    assert_eq!(stats.percentages[0].percentage, dec("80"));
    assert_eq!(stats.percentages[0].value, dec("800"));
    assert_eq!(stats.percentages[1].category, "Food");
    assert_eq!(stats.percentages[1].percentage, dec("20"));
}

#[test]
fn statistics_none_only_when_empty() {
    assert!(statistics(&[]).is_none());
    let zero = vec![debt(1, "Food", "0", None)];
    let stats = statistics(&zero).unwrap();
    assert_eq!(stats.percentages[0].percentage, Decimal::ZERO);
}

#[test]
fn statistics_debt_ties_go_first_category_ties_go_last() {
    let debts = vec![
        debt(1, "Food", "100", None),
        debt(2, "Housing", "100", None),
        debt(3, "Food", "50", None),
        debt(4, "Housing", "50", None),
    ];
    let stats = statistics(&debts).unwrap();
    assert_eq!(stats.max_debt.id, 1);
    assert_eq!(stats.max_category, "Housing");
    // percentages still follow first appearance
    assert_eq!(stats.percentages[0].category, "Food");
}

#[test]
fn percentages_sum_to_one_hundred() {
    let debts = vec![
        debt(1, "A", "1", None),
        debt(2, "B", "1", None),
        debt(3, "C", "1", None),
    ];
    let stats = statistics(&debts).unwrap();
    let sum: Decimal = stats.percentages.iter().map(|c| c.percentage).sum();
    assert!((sum - Decimal::ONE_HUNDRED).abs() < dec("0.000001"));
}

#[test]
fn completed_wins_over_overdue() {
    let g = goal("500", "500", Some("2024-01-31"));
    let p = goal_progress(&g, &[], at("2024-02-01 09:00:00"));
    assert_eq!(p.status, GoalStatus::Completed);
    assert_eq!(p.progress, Decimal::ONE_HUNDRED);
    assert_eq!(p.remaining, Decimal::ZERO);
}

#[test]
fn deadline_day_is_still_on_time() {
    let g = goal("500", "100", Some("2024-01-31"));
    let on_day = goal_progress(&g, &[], at("2024-01-31 23:59:59"));
    assert_eq!(on_day.status, GoalStatus::InProgress);
    let after = goal_progress(&g, &[], at("2024-02-01 00:00:00"));
    assert_eq!(after.status, GoalStatus::Overdue);
}

#[test]
fn progress_stays_within_bounds() {
    let over = goal_progress(&goal("100", "250", None), &[], at("2024-01-01 00:00:00"));
    assert_eq!(over.progress, Decimal::ONE_HUNDRED);
    assert_eq!(over.remaining, Decimal::ZERO);

    let zero_target = goal_progress(&goal("0", "50", None), &[], at("2024-01-01 00:00:00"));
    assert_eq!(zero_target.progress, Decimal::ZERO);

    let huge = goal_progress(
        &goal("0.0000000000000000000000001", "79228162514264337593543950335", None),
        &[],
        at("2024-01-01 00:00:00"),
    );
    assert_eq!(huge.progress, Decimal::ONE_HUNDRED);
}

#[test]
fn progress_lists_only_own_contributions() {
    let g = goal("1000", "150", None);
    let cs = vec![
        contribution(1, 1, "100"),
        contribution(2, 2, "70"),
        contribution(3, 1, "50"),
    ];
    let p = goal_progress(&g, &cs, at("2024-03-01 00:00:00"));
    assert_eq!(p.contributions.len(), 2);
    assert_eq!(p.progress, dec("15"));
    assert_eq!(reconciled_accumulated(&g, &cs), dec("150"));
}

#[test]
fn percent_of_zero_whole_is_zero() {
    assert_eq!(percent_of(dec("5"), Decimal::ZERO), Decimal::ZERO);
    assert_eq!(percent_of(dec("1"), dec("4")), dec("25"));
}

#[test]
fn range_filter_is_inclusive_and_idempotent() {
    let incomes = vec![
        income(1, "1", "2024-01-01"),
        income(2, "2", "2024-01-31"),
        income(3, "3", "2024-02-01"),
        income(4, "4", "2023-12-31"),
    ];
    let jan = DateRange::month(2024, 1).unwrap();
    let once = filter_dated(&incomes, &jan);
    assert_eq!(once.iter().map(|i| i.id).collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(filter_dated(&once, &jan), once);
}

#[test]
fn inactive_range_returns_everything() {
    let debts = vec![debt(1, "A", "1", None), debt(2, "B", "2", Some("2024-05-05"))];
    assert_eq!(filter_dated(&debts, &DateRange::all()), debts);
}

#[test]
fn dateless_debts_drop_out_of_active_ranges() {
    let debts = vec![debt(1, "A", "1", None), debt(2, "B", "2", Some("2024-05-05"))];
    let open_end = DateRange::new(Some(day("2024-01-01")), None);
    let kept = filter_dated(&debts, &open_end);
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].id, 2);
}

#[test]
fn end_bound_covers_the_whole_day() {
    let cs = vec![
        GoalContribution {
            created_at: at("2024-01-31 23:59:59.500"),
            ..contribution(1, 1, "1")
        },
        GoalContribution {
            created_at: at("2024-02-01 00:00:00"),
            ..contribution(2, 1, "1")
        },
    ];
    let range = DateRange::new(None, Some(day("2024-01-31")));
    let kept = filter_by_date_range(&cs, &range, |c| Some(c.created_at));
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].id, 1);
    assert!(end_of_day(day("2024-01-31")) < at("2024-02-01 00:00:00"));
}

#[test]
fn month_range_handles_leap_february() {
    let feb = DateRange::month(2024, 2).unwrap();
    assert_eq!(feb.end, Some(day("2024-02-29")));
    assert!(DateRange::month(2024, 13).is_none());
}

#[test]
fn monthly_series_runs_oldest_first() {
    let incomes = vec![
        income(1, "1000", "2024-01-15"),
        income(2, "500", "2024-03-02"),
        income(3, "999", "2023-10-01"),
    ];
    let debts = vec![
        debt(1, "Housing", "400", Some("2024-01-20")),
        debt(2, "Food", "75", None),
    ];
    let series = monthly_series(&incomes, &debts, 3, day("2024-03-10"));
    let months: Vec<_> = series.iter().map(|p| p.month.as_str()).collect();
    assert_eq!(months, vec!["2024-01", "2024-02", "2024-03"]);
    assert_eq!(series[0].balance, dec("600"));
    assert_eq!(series[1].incomes, Decimal::ZERO);
    assert_eq!(series[2].incomes, dec("500"));
}

#[test]
fn monthly_series_is_capped() {
    let series = monthly_series(&[], &[], usize::MAX, day("2024-01-05"));
    assert_eq!(series.len(), MAX_SERIES_MONTHS);
    assert_eq!(series.last().unwrap().month, "2024-01");
    assert_eq!(series[0].month, "2004-02");
}

#[test]
fn monthly_series_crosses_year_boundary() {
    let series = monthly_series(&[], &[], 3, day("2024-01-05"));
    let months: Vec<_> = series.iter().map(|p| p.month.clone()).collect();
    assert_eq!(months, vec!["2023-11", "2023-12", "2024-01"]);
}
