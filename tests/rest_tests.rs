// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use pocketbook::config::RestConfig;
use pocketbook::models::{Debt, GoalContribution, Income, PaymentMethod};
use pocketbook::store::rest::order_param;
use pocketbook::store::{decode_rows, RestStore};
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;

#[test]
fn order_params_follow_listing_order() {
    assert_eq!(order_param::<Income>(), "date.desc.nullslast,id.desc");
    assert_eq!(order_param::<Debt>(), "due_date.desc.nullslast,id.desc");
    assert_eq!(order_param::<GoalContribution>(), "created_at.asc,id.asc");
}

#[test]
fn endpoint_joins_table_under_rest_root() {
    let cfg = RestConfig {
        url: "https://abc.example.co/".into(),
        api_key: "anon".into(),
    };
    let store = RestStore::new(&cfg, None).unwrap();
    assert_eq!(store.endpoint("incomes"), "https://abc.example.co/rest/v1/incomes");
}

#[test]
fn hosted_rows_decode_with_loose_numbers() {
    let rows = vec![
        json!({"id": 1, "user_id": "u", "category": "Card", "subcategory": null,
               "value": "120.50", "interest": 2, "installments": "3",
               "due_date": null, "payment_method": "credit_card"}),
        json!({"id": 2, "user_id": "u", "category": "Misc", "value": "n/a",
               "payment_method": "crypto"}),
    ];
    let debts: Vec<Debt> = decode_rows(rows).unwrap();
    assert_eq!(debts[0].value, Decimal::from_str("120.50").unwrap());
    assert_eq!(debts[0].interest, Decimal::from(2));
    assert_eq!(debts[0].installments, 3);
    assert_eq!(debts[1].value, Decimal::ZERO);
    assert_eq!(debts[1].payment_method, PaymentMethod::Other);
}

#[test]
fn contribution_timestamps_accept_offsets() {
    let rows = vec![json!({"id": 1, "user_id": "u", "goal_id": 2, "value": 10,
                           "created_at": "2024-02-01T10:00:00+00:00"})];
    let cs: Vec<GoalContribution> = decode_rows(rows).unwrap();
    assert_eq!(cs[0].created_at.to_string(), "2024-02-01 10:00:00");
    assert_eq!(cs[0].income_id, None);
}
