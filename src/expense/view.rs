//! JSON representations of expenses returned by the API.

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::expense::domain::{Expense, ExpenseId, ExpenseKind};

/// Creation timestamps are rendered as day/month/year hour:minute.
const CREATED_AT_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[day]/[month]/[year] [hour]:[minute]");

/// A single expense as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseView {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// How the expense is paid.
    pub tipo: ExpenseKind,
    /// A short description of what the expense is for.
    pub titulo: String,
    /// The amount of money owed each month.
    pub valor: f64,
    /// The number of installments left to pay, when applicable.
    pub parcelas: Option<i64>,
    /// The day of the month the payment is due.
    pub dia_vencimento: u8,
    /// Whether the expense has been paid this month.
    pub paga: bool,
    /// When the expense was recorded, rendered as day/month/year hour:minute.
    pub data_insercao: String,
}

impl From<&Expense> for ExpenseView {
    fn from(expense: &Expense) -> Self {
        Self {
            id: expense.id,
            tipo: expense.kind,
            titulo: expense.title.to_string(),
            valor: expense.amount,
            parcelas: expense.installments,
            dia_vencimento: expense.due_day,
            paga: expense.paid,
            data_insercao: format_created_at(expense.created_at),
        }
    }
}

/// The list of all expenses as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseListView {
    /// All stored expenses ordered by ID.
    pub despesas: Vec<ExpenseView>,
}

impl ExpenseListView {
    /// Build the list view for `expenses`.
    pub fn new(expenses: &[Expense]) -> Self {
        Self {
            despesas: expenses.iter().map(ExpenseView::from).collect(),
        }
    }
}

/// The confirmation payload returned after deleting an expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    /// A confirmation message.
    pub message: String,
    /// The ID of the removed expense.
    pub id: ExpenseId,
}

impl DeleteConfirmation {
    /// The confirmation for removing the expense with `id`.
    pub fn removed(id: ExpenseId) -> Self {
        Self {
            message: "Despesa removida".to_owned(),
            id,
        }
    }
}

fn format_created_at(created_at: OffsetDateTime) -> String {
    created_at
        .format(&CREATED_AT_FORMAT)
        .expect("formatting a timestamp with a constant format cannot fail")
}
