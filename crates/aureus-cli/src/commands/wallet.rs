//! Wallet statement rendering.

use comfy_table::{Cell, Table};

use aureus_core::ledger::{Transaction, TransactionKind, Wallet};

/// Bars in the earnings chart.
const CHART_DAYS: usize = 7;
const CHART_WIDTH: u128 = 30;

/// Render the balance, the transaction ledger and a chart of recent earnings.
pub fn render_statement(wallet: &Wallet) -> String {
    let mut out = format!(
        "{}'s wallet: {} coins\n",
        wallet.username(),
        wallet.balance()
    );

    let mut table = Table::new();
    table.set_header(vec!["Date", "Description", "Amount"]);
    for tx in wallet.transactions().iter().rev() {
        table.add_row(vec![
            Cell::new(tx.timestamp.format("%Y-%m-%d %H:%M")),
            Cell::new(&tx.title),
            Cell::new(signed_amount(tx)),
        ]);
    }
    out.push_str(&format!("{table}\n"));

    let recent = wallet.recent(CHART_DAYS);
    let peak = recent.iter().map(|tx| tx.amount).max().unwrap_or(0);
    if peak > 0 {
        out.push_str("\nRecent earnings\n");
        // Oldest at the top, like reading a ledger.
        for tx in recent.iter().rev() {
            let width =
                (u128::from(tx.amount) * CHART_WIDTH).div_ceil(u128::from(peak)) as usize;
            out.push_str(&format!(
                "{:>5} | {} {}\n",
                tx.timestamp.format("%a"),
                "#".repeat(width),
                tx.amount
            ));
        }
    }

    out
}

fn signed_amount(tx: &Transaction) -> String {
    match tx.kind {
        TransactionKind::Credit => format!("+{}", tx.amount),
        TransactionKind::Debit => format!("-{}", tx.amount),
    }
}
