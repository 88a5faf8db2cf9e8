//! Listing rendering

use serde::Serialize;
use vnodectl_core::{ConnectionEntry, LoginEntry};

/// Render rows as pretty JSON
pub fn to_json<T: Serialize>(rows: &[T]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}

/// Render login entries as an aligned table
pub fn login_table(rows: &[LoginEntry]) -> String {
    table(
        &["TYPE", "VNODE", "ACCOUNT"],
        rows.iter()
            .map(|r| vec![r.scope.as_str(), r.vnode.as_str(), r.account.as_str()])
            .collect(),
    )
}

/// Render connection entries as an aligned table
pub fn connection_table(rows: &[ConnectionEntry]) -> String {
    table(
        &["TYPE", "VNODE", "ADDRESS", "PROTOCOL", "LISTEN"],
        rows.iter()
            .map(|r| {
                vec![
                    r.scope.as_str(),
                    r.vnode.as_str(),
                    r.address.as_str(),
                    r.protocol.as_str(),
                    r.listen.as_str(),
                ]
            })
            .collect(),
    )
}

fn table(header: &[&str], rows: Vec<Vec<&str>>) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render = |cells: &[&str]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = render(header);
    for row in &rows {
        out.push('\n');
        out.push_str(&render(row));
    }
    out
}
