use crate::cli::OutputFormat;
use crate::logic::client::broker::BrokerClient;
use crate::logic::client::status::StatusReader;
use crate::logic::config::BrokerConfig;
use crate::logic::dashboard::{region_text, Region};
use crate::logic::types::{StatusSnapshot, SESSIONS_PER_CYCLE};
use colored::*;

/// JSON view of a snapshot with the derived display fields included
pub fn snapshot_json(snapshot: &StatusSnapshot) -> serde_json::Value {
    serde_json::json!({
        "status": snapshot.status,
        "label": snapshot.label(),
        "icon": snapshot.icon(),
        "remaining": snapshot.remaining,
        "sessions": snapshot.sessions,
        "cycles": snapshot.cycles,
        "break_minutes": snapshot.break_minutes,
        "next_break": snapshot.next_break,
        "next_break_label": snapshot.next_break_label(),
    })
}

/// One-line summary used by the compact format
pub fn compact_line(snapshot: &StatusSnapshot) -> String {
    format!(
        "{} {} {} | {}/{} sessions | {} cycles | next: {}",
        snapshot.icon(),
        snapshot.label(),
        snapshot.remaining,
        snapshot.sessions,
        SESSIONS_PER_CYCLE,
        snapshot.cycles,
        snapshot.next_break_label()
    )
}

fn display_table(snapshot: &StatusSnapshot) {
    println!("{}", "Device status".bright_green().bold());
    println!("{}", "─".repeat(65).bright_blue());
    for region in [
        Region::Status,
        Region::Remaining,
        Region::Sessions,
        Region::Cycles,
        Region::NextBreak,
    ] {
        println!("{}", region_text(region, snapshot));
    }
}

/// Read the twin once and print it
pub async fn run(config: BrokerConfig, format: OutputFormat) -> anyhow::Result<()> {
    let reader = StatusReader::new(BrokerClient::new(&config));
    let snapshot = reader.get_status().await;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot_json(&snapshot))?),
        OutputFormat::Table => display_table(&snapshot),
        OutputFormat::Compact => println!("{}", compact_line(&snapshot)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::types::{BreakKind, SessionStatus};

    #[test]
    fn test_compact_line() {
        let snapshot = StatusSnapshot {
            status: SessionStatus::Paused,
            sessions: 1,
            cycles: 0,
            remaining: "04:10".to_string(),
            break_minutes: 3,
            next_break: BreakKind::Short,
        };
        assert_eq!(
            compact_line(&snapshot),
            "⏸️ PAUSED 04:10 | 1/4 sessions | 0 cycles | next: 3 min (short break)"
        );
    }

    #[test]
    fn test_snapshot_json_includes_derived_fields() {
        let json = snapshot_json(&StatusSnapshot::disconnected());
        assert_eq!(json["status"], "DESCONECTADO");
        assert_eq!(json["label"], "DESCONECTADO");
        assert_eq!(json["remaining"], "00:00");
        assert_eq!(json["next_break"], "curta");
        assert_eq!(json["next_break_label"], "5 min (short break)");
    }
}
