// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use pocketbook::aggregate::Summary;
use pocketbook::export::export_csv;
use pocketbook::models::{Debt, Goal, GoalContribution, Income, OwnerId, PaymentMethod};
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn debts_render_blank_optional_columns() {
    let debts = vec![
        Debt {
            id: 1,
            owner: OwnerId::new("u"),
            category: "Housing".into(),
            subcategory: "Rent".into(),
            value: dec("800.00"),
            interest: dec("1.50"),
            installments: 12,
            due_date: Some(day("2024-01-20")),
            payment_method: PaymentMethod::BankSlip,
        },
        Debt {
            id: 2,
            owner: OwnerId::new("u"),
            category: "Food".into(),
            subcategory: String::new(),
            value: dec("42.5"),
            interest: Decimal::ZERO,
            installments: 0,
            due_date: None,
            payment_method: PaymentMethod::Cash,
        },
    ];
    let csv = export_csv(&debts).unwrap();
    assert_eq!(
        csv,
        "Category,Subcategory,Value,Interest,Installments,Due Date,Payment Method\n\
         Housing,Rent,800,1.5,12,2024-01-20,bank_slip\n\
         Food,,42.5,,,,cash\n"
    );
}

#[test]
fn commas_in_text_are_not_quoted() {
    let incomes = vec![Income {
        id: 1,
        owner: OwnerId::new("u"),
        category: "Freelance, design".into(),
        subcategory: "Logo".into(),
        value: dec("300"),
        date: day("2024-04-01"),
    }];
    let csv = export_csv(&incomes).unwrap();
    assert_eq!(
        csv,
        "Category,Subcategory,Value,Date\nFreelance, design,Logo,300,2024-04-01\n"
    );
}

#[test]
fn empty_set_yields_header_only() {
    let csv = export_csv::<Goal>(&[]).unwrap();
    assert_eq!(
        csv,
        "Name,Category,Subcategory,Target,Accumulated,Start Date,End Date\n"
    );
}

#[test]
fn goals_and_contributions_layout() {
    let goals = vec![Goal {
        id: 3,
        owner: OwnerId::new("u"),
        name: "Trip".into(),
        category: "Travel".into(),
        subcategory: "Flights".into(),
        target_value: dec("5000"),
        accumulated_value: dec("1250.50"),
        start_date: day("2024-01-01"),
        end_date: Some(day("2024-12-31")),
    }];
    assert_eq!(
        export_csv(&goals).unwrap(),
        "Name,Category,Subcategory,Target,Accumulated,Start Date,End Date\n\
         Trip,Travel,Flights,5000,1250.5,2024-01-01,2024-12-31\n"
    );

    let contributions = vec![GoalContribution {
        id: 9,
        owner: OwnerId::new("u"),
        goal_id: 3,
        income_id: Some(4),
        value: dec("100"),
        description: Some("bonus".into()),
        created_at: day("2024-02-01").and_hms_opt(8, 30, 0).unwrap(),
    }];
    assert_eq!(
        export_csv(&contributions).unwrap(),
        "Goal,Income,Value,Description,Created At\n3,4,100,bonus,2024-02-01 08:30:00\n"
    );
}

#[test]
fn summary_row_keeps_negative_balance() {
    let s = Summary {
        incomes: dec("100"),
        debts: dec("250.75"),
        balance: dec("-150.75"),
    };
    assert_eq!(
        export_csv(&[s]).unwrap(),
        "Incomes,Debts,Balance\n100,250.75,-150.75\n"
    );
}
