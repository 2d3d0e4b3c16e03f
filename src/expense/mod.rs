//! Expense (despesa) management: domain model, persistence and endpoints.

mod create;
mod db;
mod delete;
mod domain;
mod fetch;
mod form;
mod list;
mod update;

pub(crate) mod view;

pub use create::create_expense_endpoint;
pub use db::{
    create_expense, create_expense_table, delete_expense, get_all_expenses, get_expense,
    update_expense,
};
pub use delete::delete_expense_endpoint;
pub use domain::{Expense, ExpenseChanges, ExpenseId, ExpenseKind, ExpenseTitle, NewExpense};
pub use fetch::get_expense_endpoint;
pub use form::{CreateExpenseForm, ExpenseIdQuery, UpdateExpenseForm};
pub use list::list_expenses_endpoint;
pub use update::update_expense_endpoint;
pub use view::{DeleteConfirmation, ExpenseListView, ExpenseView};
