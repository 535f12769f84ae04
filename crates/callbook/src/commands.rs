// SPDX-FileCopyrightText: 2026 Callbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot commands: `check`, `submit`, `calendar`, `day`.
//!
//! Each command opens the configured store, runs a single service call,
//! prints the result, and closes the store again. The returned integer is
//! the process exit code: 0 success, 1 failure, 2 name conflict.

use std::io::IsTerminal;

use callbook_config::model::CallbookConfig;
use callbook_contacts::{CheckResponse, CheckStatus, SubmitResponse, SubmitStatus};
use callbook_core::dates::format_day;
use callbook_core::{
    CallbookError, ContactDraft, DayCount, DayLoad, LoadThresholds, StoredContact,
};

use crate::serve::open_service;

/// Exit code for a name that is already taken.
pub const EXIT_CONFLICT: i32 = 2;

/// Run `callbook check <name>`.
pub async fn run_check(
    config: &CallbookConfig,
    name: &str,
    json: bool,
) -> Result<i32, CallbookError> {
    let service = open_service(config).await?;
    let result = service.check_contact(name).await;
    service.shutdown().await?;
    let check = result?;

    if json {
        println!("{}", to_json(&check));
    } else {
        println!("{}", render_check(name, &check));
    }
    Ok(match check.status {
        CheckStatus::Ok => 0,
        CheckStatus::Conflict => EXIT_CONFLICT,
    })
}

/// Run `callbook submit`.
pub async fn run_submit(
    config: &CallbookConfig,
    draft: &ContactDraft,
    overwrite: bool,
    json: bool,
    plain: bool,
) -> Result<i32, CallbookError> {
    let service = open_service(config).await?;
    let response = service.submit_contact(draft, overwrite).await;
    service.shutdown().await?;

    if json {
        println!("{}", to_json(&response));
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        println!("{}", render_submit(&response, use_color));
    }
    Ok(submit_exit_code(response.status))
}

/// Run `callbook calendar`.
pub async fn run_calendar(
    config: &CallbookConfig,
    anchor: Option<&str>,
    window_days: Option<u32>,
    json: bool,
    plain: bool,
) -> Result<i32, CallbookError> {
    let service = open_service(config).await?;
    let result = service.get_daily_counts(anchor, window_days).await;
    service.shutdown().await?;
    let series = result?;

    if json {
        println!("{}", to_json(&series));
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        println!("{}", render_calendar(&series, &service.thresholds(), use_color));
    }
    Ok(0)
}

/// Run `callbook day <date>`.
pub async fn run_day(
    config: &CallbookConfig,
    date: &str,
    json: bool,
) -> Result<i32, CallbookError> {
    let service = open_service(config).await?;
    let result = service.get_contacts_on_day(date).await;
    service.shutdown().await?;
    let contacts = result?;

    if json {
        println!("{}", to_json(&contacts));
    } else {
        println!("{}", render_day(date, &contacts));
    }
    Ok(0)
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

fn submit_exit_code(status: SubmitStatus) -> i32 {
    match status {
        SubmitStatus::Created => 0,
        SubmitStatus::Conflict => EXIT_CONFLICT,
        SubmitStatus::ValidationError | SubmitStatus::StorageError => 1,
    }
}

fn contact_line(contact: &StoredContact) -> String {
    let c = &contact.contact;
    format!(
        "#{} {} <{}> {} next call {} (called {}x)",
        contact.id,
        c.name,
        c.email,
        c.phone,
        format_day(c.next_call_date),
        c.times_called
    )
}

fn render_check(name: &str, check: &CheckResponse) -> String {
    match &check.contact {
        Some(existing) => format!("taken: {}", contact_line(existing)),
        None => format!("free: no contact named \"{}\"", name.trim()),
    }
}

fn render_submit(response: &SubmitResponse, use_color: bool) -> String {
    use colored::Colorize;

    let mut lines = Vec::new();
    match response.status {
        SubmitStatus::Created => {
            let head = if use_color {
                "created".green().to_string()
            } else {
                "[OK] created".to_string()
            };
            lines.push(head);
        }
        SubmitStatus::Conflict => {
            let head = if use_color {
                "conflict".yellow().to_string()
            } else {
                "[WARN] conflict".to_string()
            };
            lines.push(format!("{head}: a contact with this name already exists"));
        }
        SubmitStatus::ValidationError => {
            let head = if use_color {
                "invalid".red().to_string()
            } else {
                "[FAIL] invalid".to_string()
            };
            lines.push(head);
            if let Some(errors) = &response.errors {
                for e in &errors.0 {
                    lines.push(format!("    {:<14} {}", e.field.to_string(), e.message));
                }
            }
        }
        SubmitStatus::StorageError => {
            let head = if use_color {
                "failed".red().to_string()
            } else {
                "[FAIL] failed".to_string()
            };
            let detail = response.message.as_deref().unwrap_or("storage error");
            lines.push(format!("{head}: {detail}"));
        }
    }
    if let Some(contact) = &response.contact {
        lines.push(format!("    {}", contact_line(contact)));
    }
    if response.status == SubmitStatus::Conflict {
        lines.push("  Re-run with --overwrite to replace it.".to_string());
    }
    lines.join("\n")
}

fn render_calendar(series: &[DayCount], thresholds: &LoadThresholds, use_color: bool) -> String {
    use colored::Colorize;

    let total: u32 = series.iter().map(|d| d.count).sum();
    let mut lines = Vec::with_capacity(series.len() + 1);
    for day in series {
        let date = format!("{} {}", format_day(day.date), day.date.format("%a"));
        let load = day.load(thresholds);
        let line = if use_color {
            let count = day.count.to_string();
            let count = match load {
                DayLoad::Light if day.count == 0 => count.dimmed(),
                DayLoad::Light => count.green(),
                DayLoad::Busy => count.yellow(),
                DayLoad::Overloaded => count.red().bold(),
            };
            format!("  {date}  {count:>4}")
        } else {
            let marker = match load {
                DayLoad::Light => "",
                DayLoad::Busy => "  [busy]",
                DayLoad::Overloaded => "  [overloaded]",
            };
            format!("  {date}  {:>4}{marker}", day.count)
        };
        lines.push(line);
    }
    lines.push(format!("  {total} calls over {} days", series.len()));
    lines.join("\n")
}

fn render_day(date: &str, contacts: &[StoredContact]) -> String {
    if contacts.is_empty() {
        return format!("no calls scheduled on {}", date.trim());
    }
    contacts
        .iter()
        .map(contact_line)
        .collect::<Vec<_>>()
        .join("\n")
}
