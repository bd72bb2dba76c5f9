// Copyright (c) 2025 TaskNest.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Derived views over in-memory snapshots: monthly budget totals, category
//! breakdowns, habit completion rates, task counts, and the transaction list
//! filter. Pure functions, no persistence of their own.

use std::collections::HashMap;

use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{
    CompletionStatus, ExpenseSubType, Habit, Task, Transaction, TransactionKind,
};

#[derive(Debug, Clone, Serialize)]
pub struct MonthlySummary {
    pub total_income: Decimal,
    pub needs_total: Decimal,
    pub wants_total: Decimal,
    pub total_spending: Decimal,
    pub remaining: Decimal,
}

fn in_month(date: NaiveDate, year: i32, month: u32) -> bool {
    date.year() == year && date.month() == month
}

/// Income, Need/Want expense totals, and what is left for one calendar month.
/// Transfers contribute nothing; an expense without a sub-type counts as a
/// Need, matching the entry form's default.
pub fn monthly_summary(transactions: &[Transaction], year: i32, month: u32) -> MonthlySummary {
    let mut total_income = Decimal::ZERO;
    let mut needs_total = Decimal::ZERO;
    let mut wants_total = Decimal::ZERO;
    for t in transactions.iter().filter(|t| in_month(t.date, year, month)) {
        match t.kind {
            TransactionKind::Income => total_income += t.amount,
            TransactionKind::Expense => match t.sub_type {
                Some(ExpenseSubType::Want) => wants_total += t.amount,
                _ => needs_total += t.amount,
            },
            TransactionKind::Transfer => {}
        }
    }
    let total_spending = needs_total + wants_total;
    MonthlySummary {
        total_income,
        needs_total,
        wants_total,
        total_spending,
        remaining: total_income - total_spending,
    }
}

/// Monthly expenses grouped by category name, summed, sorted descending.
pub fn category_breakdown(
    transactions: &[Transaction],
    year: i32,
    month: u32,
) -> Vec<(String, Decimal)> {
    let mut agg: HashMap<String, Decimal> = HashMap::new();
    for t in transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Expense && in_month(t.date, year, month))
    {
        let cat = t.category.clone().unwrap_or_else(|| "(uncategorized)".into());
        *agg.entry(cat).or_insert(Decimal::ZERO) += t.amount;
    }
    let mut items: Vec<_> = agg.into_iter().collect();
    items.sort_by(|a, b| b.1.cmp(&a.1));
    items
}

/// Rolling completion rate over the trailing 7 days inclusive of `today`.
/// Only dates with an explicit entry count as an opportunity; a missing entry
/// is "pending", not a miss. `0.0` when there are no opportunities.
pub fn completion_rate(habits: &[Habit], today: NaiveDate) -> f64 {
    let mut successes = 0u32;
    let mut opportunities = 0u32;
    for i in 0..7u64 {
        let Some(date) = today.checked_sub_days(Days::new(i)) else {
            continue;
        };
        for habit in habits {
            if let Some(entry) = habit.completions.get(&date) {
                opportunities += 1;
                if entry.status == CompletionStatus::Completed {
                    successes += 1;
                }
            }
        }
    }
    if opportunities == 0 {
        0.0
    } else {
        f64::from(successes) / f64::from(opportunities) * 100.0
    }
}

/// Per-habit variant of [`completion_rate`], used by the habits report.
pub fn habit_completion_rate(habit: &Habit, today: NaiveDate) -> f64 {
    completion_rate(std::slice::from_ref(habit), today)
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TaskSummary {
    pub completed: usize,
    pub pending: usize,
}

pub fn task_summary(tasks: &[Task]) -> TaskSummary {
    let completed = tasks.iter().filter(|t| t.completed).count();
    TaskSummary {
        completed,
        pending: tasks.len() - completed,
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// `yyyy-MM`, matched against the calendar month of `date`.
    pub month: Option<String>,
    pub kind: Option<TransactionKind>,
    pub category: Option<String>,
}

/// Intersect the filter predicates and sort descending by the creation
/// timestamp. The category predicate never excludes a transfer: transfers
/// carry no category, so that filter is inert for them.
pub fn filter_transactions(
    transactions: &[Transaction],
    filter: &TransactionFilter,
) -> Vec<Transaction> {
    let mut out: Vec<Transaction> = transactions
        .iter()
        .filter(|t| {
            filter
                .month
                .as_deref()
                .is_none_or(|m| t.date.format("%Y-%m").to_string() == m)
        })
        .filter(|t| filter.kind.is_none_or(|k| t.kind == k))
        .filter(|t| {
            filter.category.as_deref().is_none_or(|c| {
                t.kind == TransactionKind::Transfer || t.category.as_deref() == Some(c)
            })
        })
        .cloned()
        .collect();
    out.sort_by_key(|t| std::cmp::Reverse(t.sort_timestamp()));
    out
}

/// Net flow of a filtered set: income adds, expense subtracts, transfers are
/// internal moves and contribute zero.
pub fn net_flow(transactions: &[Transaction]) -> Decimal {
    transactions.iter().fold(Decimal::ZERO, |acc, t| match t.kind {
        TransactionKind::Income => acc + t.amount,
        TransactionKind::Expense => acc - t.amount,
        TransactionKind::Transfer => acc,
    })
}

/// Distinct `yyyy-MM` months present in the ledger, newest first. Drives the
/// month selectors for filtering and export.
pub fn available_months(transactions: &[Transaction]) -> Vec<String> {
    let mut months: Vec<String> = transactions
        .iter()
        .map(|t| t.date.format("%Y-%m").to_string())
        .collect();
    months.sort();
    months.dedup();
    months.reverse();
    months
}
