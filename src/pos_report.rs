//! Status table rendering
//!
//! Purely an observer: takes snapshots produced by the simulator and renders
//! them for the console. Nothing in the engine depends on this module.

use std::fmt::Write;

use crate::pos_validator::ValidatorSnapshot;

const HEADERS: [&str; 5] = ["Validator Name", "ID", "Status", "Stake", "Total Rewards"];

/// Render validators as a table, highest stake first
pub fn render_status_table(title: &str, snapshot: &[ValidatorSnapshot]) -> String {
    let mut sorted: Vec<&ValidatorSnapshot> = snapshot.iter().collect();
    sorted.sort_by(|a, b| b.staked_amount.total_cmp(&a.staked_amount));

    let rows: Vec<[String; 5]> = sorted
        .iter()
        .map(|v| {
            [
                v.name.clone(),
                format!("{:016x}", v.id),
                v.status().to_string(),
                format!("{:.4}", v.staked_amount),
                format!("{:.6}", v.rewards_earned),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = |left: &str, mid: &str, right: &str| -> String {
        let segments: Vec<String> = widths.iter().map(|w| "═".repeat(w + 2)).collect();
        format!("{}{}{}", left, segments.join(mid), right)
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", border("╔", "╦", "╗"));

    let header: Vec<String> = HEADERS
        .iter()
        .zip(widths.iter())
        .map(|(h, w)| format!(" {:<w$} ", h, w = *w))
        .collect();
    let _ = writeln!(out, "║{}║", header.join("║"));
    let _ = writeln!(out, "{}", border("╠", "╬", "╣"));

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(widths.iter())
            .enumerate()
            .map(|(i, (cell, w))| {
                // numeric columns are right aligned
                if i >= 3 {
                    format!(" {:>w$} ", cell, w = *w)
                } else if i == 2 {
                    format!(" {:^w$} ", cell, w = *w)
                } else {
                    format!(" {:<w$} ", cell, w = *w)
                }
            })
            .collect();
        let _ = writeln!(out, "║{}║", cells.join("║"));
    }

    let _ = write!(out, "{}", border("╚", "╩", "╝"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(id: u64, stake: f64, active: bool) -> ValidatorSnapshot {
        ValidatorSnapshot {
            id,
            name: format!("validator-test-{:04x}", id),
            is_active: active,
            staked_amount: stake,
            rewards_earned: 0.125,
        }
    }

    #[test]
    fn test_sorted_by_stake_descending() {
        let table = render_status_table(
            "Status",
            &[snapshot(1, 40.0, true), snapshot(2, 90.0, false), snapshot(3, 60.0, true)],
        );

        let pos = |needle: &str| table.find(needle).unwrap();
        assert!(pos("90.0000") < pos("60.0000"));
        assert!(pos("60.0000") < pos("40.0000"));
    }

    #[test]
    fn test_contains_status_and_rewards() {
        let table = render_status_table("Epoch 3", &[snapshot(2, 90.0, false)]);

        assert!(table.starts_with("Epoch 3\n"));
        assert!(table.contains("Slashed"));
        assert!(table.contains("0.125000"));
        assert!(table.contains("0000000000000002"));
    }

    #[test]
    fn test_rows_have_equal_width() {
        let table = render_status_table(
            "t",
            &[snapshot(1, 1234.5, true), snapshot(2, 32.0, true)],
        );
        let widths: Vec<usize> = table.lines().skip(1).map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_empty_snapshot_renders_header_only() {
        let table = render_status_table("empty", &[]);
        assert_eq!(table.lines().count(), 5);
    }
}
