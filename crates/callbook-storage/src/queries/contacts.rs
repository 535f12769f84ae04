// SPDX-FileCopyrightText: 2026 Callbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact queries: lookup by name, insert, delete by identity, and per-day views.

use std::collections::BTreeMap;

use callbook_core::dates::{DAY_FORMAT, format_day};
use callbook_core::{CallbookError, Contact, ContactId, StoredContact};
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{Row, params};

use crate::database::Database;

const CONTACT_COLUMNS: &str =
    "id, name, phone, email, next_call_date, times_called, description";

fn row_to_contact(row: &Row<'_>) -> rusqlite::Result<StoredContact> {
    let day: String = row.get(4)?;
    let next_call_date = NaiveDate::parse_from_str(&day, DAY_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;
    Ok(StoredContact {
        id: ContactId(row.get(0)?),
        contact: Contact {
            name: row.get(1)?,
            phone: row.get(2)?,
            email: row.get(3)?,
            next_call_date,
            times_called: row.get(5)?,
            description: row.get(6)?,
        },
    })
}

/// True only for the `UNIQUE(name)` index; NOT NULL and CHECK failures stay storage errors.
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Get the contact stored under exactly `name`.
pub async fn find_by_name(
    db: &Database,
    name: &str,
) -> Result<Option<StoredContact>, CallbookError> {
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CONTACT_COLUMNS} FROM contacts WHERE name = ?1"
            ))?;
            match stmt.query_row(params![name], row_to_contact) {
                Ok(contact) => Ok(Some(contact)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert a contact. A name that is already stored yields [`CallbookError::DuplicateName`].
pub async fn insert(db: &Database, contact: &Contact) -> Result<StoredContact, CallbookError> {
    let row = contact.clone();
    let inserted = db
        .connection()
        .call(move |conn| {
            let result = conn.execute(
                "INSERT INTO contacts (name, phone, email, next_call_date, times_called, description)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    row.name,
                    row.phone,
                    row.email,
                    format_day(row.next_call_date),
                    row.times_called,
                    row.description,
                ],
            );
            match result {
                Ok(_) => Ok(Some(conn.last_insert_rowid())),
                Err(e) if is_unique_violation(&e) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    match inserted {
        Some(id) => Ok(StoredContact {
            id: ContactId(id),
            contact: contact.clone(),
        }),
        None => Err(CallbookError::DuplicateName {
            name: contact.name.clone(),
        }),
    }
}

/// Delete the row with the identity of `stored`.
///
/// Deleting a row that is already gone yields [`CallbookError::StaleRecord`].
pub async fn delete_by_identity(
    db: &Database,
    stored: &StoredContact,
) -> Result<(), CallbookError> {
    let id = stored.id.0;
    let affected = db
        .connection()
        .call(move |conn| conn.execute("DELETE FROM contacts WHERE id = ?1", params![id]))
        .await
        .map_err(crate::database::map_tr_err)?;
    if affected == 0 {
        return Err(CallbookError::StaleRecord {
            name: stored.name().to_string(),
            id,
        });
    }
    Ok(())
}

/// Count contacts per `next_call_date` within `[start, end]`.
pub async fn count_by_day_in_range(
    db: &Database,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<BTreeMap<String, u32>, CallbookError> {
    let (start, end) = (format_day(start), format_day(end));
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT next_call_date, COUNT(*) FROM contacts
                 WHERE next_call_date BETWEEN ?1 AND ?2
                 GROUP BY next_call_date",
            )?;
            let rows = stmt.query_map(params![start, end], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?))
            })?;
            let mut counts = BTreeMap::new();
            for row in rows {
                let (day, count) = row?;
                counts.insert(day, count);
            }
            Ok(counts)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List the contacts scheduled on `day`, oldest insert first.
pub async fn find_by_day(
    db: &Database,
    day: NaiveDate,
) -> Result<Vec<StoredContact>, CallbookError> {
    let day = format_day(day);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CONTACT_COLUMNS} FROM contacts WHERE next_call_date = ?1 ORDER BY id"
            ))?;
            let rows = stmt.query_map(params![day], row_to_contact)?;
            let contacts = rows.collect::<Result<Vec<_>, _>>()?;
            Ok(contacts)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
