//! Request payloads and field validation for the expense endpoints.
//!
//! Every field is decoded as an optional string so that missing and malformed
//! values are reported through the API's own error body instead of the
//! framework's default rejection. The front-end submits empty strings for
//! untouched optional fields, so `""` and `"null"` are treated as absent.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    expense::domain::{ExpenseChanges, ExpenseId, ExpenseKind, ExpenseTitle, NewExpense},
};

/// The form payload for creating an expense.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreateExpenseForm {
    /// The expense kind, one of the names accepted by [ExpenseKind].
    pub tipo: Option<String>,
    /// The expense title.
    pub titulo: Option<String>,
    /// The monthly amount, greater than zero.
    pub valor: Option<String>,
    /// The day of the month (1-31) the payment is due.
    pub dia_vencimento: Option<String>,
    /// The remaining installment count, required for CRÉDITO PARCELADO.
    pub parcelas: Option<String>,
    /// Whether the expense has already been paid. Defaults to false.
    pub paga: Option<String>,
}

impl CreateExpenseForm {
    /// Validate the form and produce a [NewExpense].
    ///
    /// Kinds other than CRÉDITO PARCELADO store no installment count
    /// regardless of what was submitted; CRÉDITO PARCELADO requires one.
    ///
    /// # Errors
    /// Returns the first field-level error found.
    pub fn parse(self) -> Result<NewExpense, Error> {
        let kind: ExpenseKind = require(self.tipo, "tipo")?.parse()?;
        let title = ExpenseTitle::new(&require(self.titulo, "titulo")?)?;
        let amount = parse_amount(&require(self.valor, "valor")?)?;
        let due_day = parse_due_day(&require(self.dia_vencimento, "dia_vencimento")?)?;
        let installments = parse_installments(self.parcelas)?;
        let paid = match non_empty(self.paga) {
            Some(value) => parse_flag(&value)?,
            None => false,
        };

        let installments = match kind {
            ExpenseKind::InstallmentCredit => match installments {
                Some(count) => Some(count),
                None => return Err(Error::MissingInstallments),
            },
            _ => None,
        };

        Ok(NewExpense {
            kind,
            title,
            amount,
            due_day,
            installments,
            paid,
        })
    }
}

/// The form payload for updating an expense.
///
/// `id` is required; at least one other field must be supplied.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateExpenseForm {
    /// The ID of the expense to update.
    pub id: Option<String>,
    /// A new expense kind.
    pub tipo: Option<String>,
    /// A new title.
    pub titulo: Option<String>,
    /// A new amount, greater than zero.
    pub valor: Option<String>,
    /// A new due day (1-31).
    pub dia_vencimento: Option<String>,
    /// A new installment count, only meaningful for CRÉDITO PARCELADO.
    pub parcelas: Option<String>,
    /// A new payment status.
    pub paga: Option<String>,
}

impl UpdateExpenseForm {
    /// Validate the form and produce the target expense ID and the set of
    /// changes to apply.
    ///
    /// # Errors
    /// Returns an [Error::EmptyUpdate] when no optional field was supplied,
    /// or the first field-level error found.
    pub fn parse(self) -> Result<(ExpenseId, ExpenseChanges), Error> {
        let id = parse_id(self.id)?;

        let mut changes = ExpenseChanges::default();

        if let Some(tipo) = non_empty(self.tipo) {
            changes.kind = Some(tipo.parse()?);
        }

        if let Some(titulo) = non_empty(self.titulo) {
            changes.title = Some(ExpenseTitle::new(&titulo)?);
        }

        if let Some(valor) = non_empty(self.valor) {
            changes.amount = Some(parse_amount(&valor)?);
        }

        if let Some(dia_vencimento) = non_empty(self.dia_vencimento) {
            changes.due_day = Some(parse_due_day(&dia_vencimento)?);
        }

        changes.installments = parse_installments(self.parcelas)?;

        if let Some(paga) = non_empty(self.paga) {
            changes.paid = Some(parse_flag(&paga)?);
        }

        if changes.is_empty() {
            return Err(Error::EmptyUpdate);
        }

        Ok((id, changes))
    }
}

/// The query parameters identifying a single expense.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ExpenseIdQuery {
    /// The ID of the expense.
    pub id: Option<String>,
}

impl ExpenseIdQuery {
    /// Parse the ID out of the query parameters.
    ///
    /// # Errors
    /// Returns an error if the ID is missing or is not an integer.
    pub fn parse(self) -> Result<ExpenseId, Error> {
        parse_id(self.id)
    }
}

fn parse_id(raw: Option<String>) -> Result<ExpenseId, Error> {
    let raw = raw.ok_or(Error::MissingField("id"))?;

    raw.trim().parse().map_err(|_| Error::MalformedField("id"))
}

fn require(value: Option<String>, field: &'static str) -> Result<String, Error> {
    value.ok_or(Error::MissingField(field))
}

fn non_empty(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();

    if trimmed.is_empty() || trimmed == "null" {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_amount(raw: &str) -> Result<f64, Error> {
    let amount: f64 = raw
        .trim()
        .parse()
        .map_err(|_| Error::MalformedField("valor"))?;

    if amount > 0.0 {
        Ok(amount)
    } else {
        Err(Error::NonPositiveAmount)
    }
}

fn parse_due_day(raw: &str) -> Result<u8, Error> {
    let due_day: i64 = raw
        .trim()
        .parse()
        .map_err(|_| Error::MalformedField("dia_vencimento"))?;

    if (1..=31).contains(&due_day) {
        Ok(due_day as u8)
    } else {
        Err(Error::DueDayOutOfRange)
    }
}

fn parse_installments(raw: Option<String>) -> Result<Option<i64>, Error> {
    let raw = match non_empty(raw) {
        Some(value) => value,
        None => return Ok(None),
    };

    let installments: i64 = raw.parse().map_err(|_| Error::MalformedField("parcelas"))?;

    if installments > 0 {
        Ok(Some(installments))
    } else {
        Err(Error::NonPositiveInstallments)
    }
}

fn parse_flag(raw: &str) -> Result<bool, Error> {
    match raw {
        "true" | "True" | "1" => Ok(true),
        "false" | "False" | "0" => Ok(false),
        _ => Err(Error::MalformedField("paga")),
    }
}
