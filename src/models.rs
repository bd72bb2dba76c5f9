// Copyright (c) 2025 TaskNest.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use anyhow::{Result, anyhow};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
            TransactionKind::Transfer => "transfer",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            "transfer" => Ok(TransactionKind::Transfer),
            other => Err(anyhow!(
                "Invalid transaction kind '{}', expected income|expense|transfer",
                other
            )),
        }
    }
}

/// Need/Want split used for the monthly budget view. Only meaningful on expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpenseSubType {
    Need,
    Want,
}

impl ExpenseSubType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseSubType::Need => "Need",
            ExpenseSubType::Want => "Want",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "Need" => Ok(ExpenseSubType::Need),
            "Want" => Ok(ExpenseSubType::Want),
            other => Err(anyhow!("Invalid expense sub-type '{}', expected Need|Want", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub balance: Decimal,
    pub opening_balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionCategory {
    pub id: i64,
    pub name: String,
    pub kind: TransactionKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    /// Millisecond timestamp used as a sort tie-break. Legacy rows may lack it
    /// until the lazy backfill runs.
    pub created_at: Option<i64>,
    pub kind: TransactionKind,
    pub account_id: i64,
    pub to_account_id: Option<i64>,
    pub category: Option<String>,
    pub sub_type: Option<ExpenseSubType>,
}

impl Transaction {
    /// Sort key: `created_at`, falling back to midnight of `date` for legacy
    /// rows recorded before the tie-break column existed.
    pub fn sort_timestamp(&self) -> i64 {
        self.created_at
            .unwrap_or_else(|| self.date.and_time(NaiveTime::MIN).and_utc().timestamp_millis())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionStatus {
    Completed,
    Missed,
}

impl CompletionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionStatus::Completed => "completed",
            CompletionStatus::Missed => "missed",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "completed" => Ok(CompletionStatus::Completed),
            "missed" => Ok(CompletionStatus::Missed),
            other => Err(anyhow!("Invalid completion status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionEntry {
    pub status: CompletionStatus,
    pub timestamp: Option<i64>,
}

/// Absence of a date key means "pending": the habit was neither completed nor
/// explicitly missed that day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: i64,
    pub name: String,
    pub created_at: i64,
    pub completions: BTreeMap<NaiveDate, CompletionEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "Low" => Ok(Priority::Low),
            "Medium" => Ok(Priority::Medium),
            "High" => Ok(Priority::High),
            other => Err(anyhow!("Invalid priority '{}', expected Low|Medium|High", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: Option<String>,
    pub content: String,
    pub created_at: i64,
    pub updated_at: i64,
}
