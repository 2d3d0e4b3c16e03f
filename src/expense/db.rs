//! Database operations for expenses.

use rusqlite::{Connection, Row, Transaction as SqlTransaction, TransactionBehavior};
use time::OffsetDateTime;

use crate::{
    Error,
    expense::domain::{Expense, ExpenseChanges, ExpenseId, ExpenseTitle, NewExpense},
};

/// Store a new expense and return it with its generated ID and creation
/// timestamp.
pub fn create_expense(new_expense: NewExpense, connection: &Connection) -> Result<Expense, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO despesa (tipo, titulo, valor, dia_vencimento, parcelas, paga, data_insercao)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
        (
            new_expense.kind,
            new_expense.title.as_ref(),
            new_expense.amount,
            new_expense.due_day,
            new_expense.installments,
            new_expense.paid,
            created_at,
        ),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Expense {
        id,
        kind: new_expense.kind,
        title: new_expense.title,
        amount: new_expense.amount,
        due_day: new_expense.due_day,
        installments: new_expense.installments,
        paid: new_expense.paid,
        created_at,
    })
}

/// Retrieve a single expense by ID.
pub fn get_expense(id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    connection
        .prepare(
            "SELECT id, tipo, titulo, valor, dia_vencimento, parcelas, paga, data_insercao
            FROM despesa WHERE id = :id;",
        )?
        .query_row(&[(":id", &id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all expenses ordered by ID ascending.
///
/// The ordering makes repeated reads deterministic when no writes happen in
/// between.
pub fn get_all_expenses(connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, tipo, titulo, valor, dia_vencimento, parcelas, paga, data_insercao
            FROM despesa ORDER BY id ASC;",
        )?
        .query_map([], map_row)?
        .map(|maybe_expense| maybe_expense.map_err(|error| error.into()))
        .collect()
}

/// Apply `changes` to the stored expense with `id` and return the updated
/// record.
///
/// The read and the write happen inside a single SQLite transaction so the
/// whole set of field changes lands atomically.
///
/// # Errors
/// Returns an [Error::UpdateMissingExpense] if the expense doesn't exist.
pub fn update_expense(
    id: ExpenseId,
    changes: ExpenseChanges,
    connection: &Connection,
) -> Result<Expense, Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let expense = match get_expense(id, &transaction) {
        Ok(expense) => expense,
        Err(Error::NotFound) => return Err(Error::UpdateMissingExpense),
        Err(error) => return Err(error),
    };

    let updated = expense.apply(changes);

    let rows_affected = transaction.execute(
        "UPDATE despesa
        SET tipo = ?1, titulo = ?2, valor = ?3, dia_vencimento = ?4, parcelas = ?5, paga = ?6
        WHERE id = ?7;",
        (
            updated.kind,
            updated.title.as_ref(),
            updated.amount,
            updated.due_day,
            updated.installments,
            updated.paid,
            id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingExpense);
    }

    transaction.commit()?;

    Ok(updated)
}

/// Delete an expense by ID.
///
/// # Errors
/// Returns an [Error::DeleteMissingExpense] if the expense doesn't exist.
pub fn delete_expense(id: ExpenseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM despesa WHERE id = ?1;", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingExpense);
    }

    Ok(())
}

/// Initialize the expense table.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS despesa (
            id INTEGER PRIMARY KEY,
            tipo TEXT NOT NULL,
            titulo TEXT NOT NULL,
            valor REAL NOT NULL,
            dia_vencimento INTEGER NOT NULL,
            parcelas INTEGER,
            paga INTEGER NOT NULL DEFAULT 0,
            data_insercao TEXT NOT NULL
        );",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let raw_title: String = row.get(2)?;

    Ok(Expense {
        id: row.get(0)?,
        kind: row.get(1)?,
        title: ExpenseTitle::new_unchecked(&raw_title),
        amount: row.get(3)?,
        due_day: row.get(4)?,
        installments: row.get(5)?,
        paid: row.get(6)?,
        created_at: row.get(7)?,
    })
}
