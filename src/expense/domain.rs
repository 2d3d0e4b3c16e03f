//! Core expense domain types and business rules.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::Error;

/// Database identifier for an expense.
pub type ExpenseId = i64;

/// How an expense is paid.
///
/// The serialized names are the exact values used on the wire and in the
/// database, in the language of the API client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpenseKind {
    /// A recurring credit expense with a fixed amount.
    #[serde(rename = "CRÉDITO FIXO")]
    FixedCredit,
    /// A credit expense paid off over time, tracking the remaining installment count.
    #[serde(rename = "CRÉDITO PARCELADO")]
    InstallmentCredit,
    /// A payment made through the PIX instant payment system.
    #[serde(rename = "PIX")]
    Pix,
    /// A payment made with a boleto bancário slip.
    #[serde(rename = "BOLETO")]
    Boleto,
}

impl ExpenseKind {
    /// The wire and database representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseKind::FixedCredit => "CRÉDITO FIXO",
            ExpenseKind::InstallmentCredit => "CRÉDITO PARCELADO",
            ExpenseKind::Pix => "PIX",
            ExpenseKind::Boleto => "BOLETO",
        }
    }
}

impl FromStr for ExpenseKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CRÉDITO FIXO" => Ok(ExpenseKind::FixedCredit),
            "CRÉDITO PARCELADO" => Ok(ExpenseKind::InstallmentCredit),
            "PIX" => Ok(ExpenseKind::Pix),
            "BOLETO" => Ok(ExpenseKind::Boleto),
            other => Err(Error::UnknownExpenseKind(other.to_string())),
        }
    }
}

impl Display for ExpenseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for ExpenseKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ExpenseKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// A validated, non-empty expense title.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseTitle(String);

impl ExpenseTitle {
    /// Create an expense title.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyTitle] if `title` is an empty
    /// or whitespace-only string.
    pub fn new(title: &str) -> Result<Self, Error> {
        let title = title.trim();

        if title.is_empty() {
            Err(Error::EmptyTitle)
        } else {
            Ok(Self(title.to_string()))
        }
    }

    /// Create an expense title without validation.
    ///
    /// The caller should ensure that the string is not empty.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because
    /// if the non-empty invariant is violated it will cause incorrect behaviour
    /// but not affect memory safety.
    pub fn new_unchecked(title: &str) -> Self {
        Self(title.to_string())
    }
}

impl AsRef<str> for ExpenseTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ExpenseTitle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExpenseTitle::new(s)
    }
}

impl Display for ExpenseTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A monthly expense record.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// How the expense is paid.
    pub kind: ExpenseKind,
    /// A short description of what the expense is for.
    pub title: ExpenseTitle,
    /// The amount of money owed each month.
    pub amount: f64,
    /// The day of the month (1-31) the payment is due.
    pub due_day: u8,
    /// The number of installments left to pay.
    ///
    /// Only meaningful for [ExpenseKind::InstallmentCredit]; always `None` for
    /// every other kind.
    pub installments: Option<i64>,
    /// Whether the expense has been paid this month.
    pub paid: bool,
    /// When the expense was recorded, in UTC.
    pub created_at: OffsetDateTime,
}

/// A validated expense that has not been stored yet.
///
/// The ID and creation timestamp are assigned by the database layer on
/// insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// How the expense is paid.
    pub kind: ExpenseKind,
    /// A short description of what the expense is for.
    pub title: ExpenseTitle,
    /// The amount of money owed each month.
    pub amount: f64,
    /// The day of the month (1-31) the payment is due.
    pub due_day: u8,
    /// The number of installments left to pay, only for installment credit.
    pub installments: Option<i64>,
    /// Whether the expense has already been paid this month.
    pub paid: bool,
}

/// The set of fields supplied to an update.
///
/// `None` means the field was not supplied and keeps its stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseChanges {
    /// A new expense kind.
    pub kind: Option<ExpenseKind>,
    /// A new title.
    pub title: Option<ExpenseTitle>,
    /// A new amount.
    pub amount: Option<f64>,
    /// A new due day.
    pub due_day: Option<u8>,
    /// A new installment count.
    pub installments: Option<i64>,
    /// A new payment status.
    pub paid: Option<bool>,
}

impl ExpenseChanges {
    /// Whether no fields were supplied.
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.title.is_none()
            && self.amount.is_none()
            && self.due_day.is_none()
            && self.installments.is_none()
            && self.paid.is_none()
    }
}

impl Expense {
    /// Return a copy of the expense with `changes` applied.
    ///
    /// Two rules connect the kind and the installment count:
    /// - Changing the kind away from CRÉDITO PARCELADO clears the count, and a
    ///   supplied count only lands while the expense is (or is becoming)
    ///   CRÉDITO PARCELADO.
    /// - Marking a CRÉDITO PARCELADO expense as paid consumes one remaining
    ///   installment.
    pub fn apply(&self, changes: ExpenseChanges) -> Expense {
        let mut updated = self.clone();

        if let Some(kind) = changes.kind {
            updated.kind = kind;

            if kind != ExpenseKind::InstallmentCredit {
                updated.installments = None;
            }
        }

        if let Some(title) = changes.title {
            updated.title = title;
        }

        if let Some(amount) = changes.amount {
            updated.amount = amount;
        }

        if let Some(due_day) = changes.due_day {
            updated.due_day = due_day;
        }

        if let Some(installments) = changes.installments {
            if updated.kind == ExpenseKind::InstallmentCredit {
                updated.installments = Some(installments);
            }
        }

        if let Some(paid) = changes.paid {
            let pays_off_installment =
                paid && !updated.paid && updated.kind == ExpenseKind::InstallmentCredit;

            if pays_off_installment {
                if let Some(remaining) = updated.installments.filter(|&remaining| remaining > 0) {
                    updated.installments = Some(remaining - 1);
                }
            }

            updated.paid = paid;
        }

        updated
    }
}
