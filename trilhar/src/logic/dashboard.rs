use crate::logic::client::broker::BrokerClient;
use crate::logic::client::command::CommandSender;
use crate::logic::client::status::StatusReader;
use crate::logic::config::BrokerConfig;
use crate::logic::types::{
    Notification, SessionStatus, StatusSnapshot, CMD_SET_BREAK, CMD_SET_DURATION,
    SESSIONS_PER_CYCLE,
};
use chrono::Local;
use colored::*;
use std::collections::HashMap;
use std::io::{self, Write};
use std::io::BufRead;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

/// A key the user can type to send one preset command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    pub key: &'static str,
    pub label: &'static str,
    pub command: &'static str,
    pub value: &'static str,
}

pub const DURATION_CONTROLS: [Control; 3] = [
    Control { key: "1", label: "Set 15 minutes", command: CMD_SET_DURATION, value: "15" },
    Control { key: "2", label: "Set 25 minutes", command: CMD_SET_DURATION, value: "25" },
    Control { key: "3", label: "Set 50 minutes", command: CMD_SET_DURATION, value: "50" },
];

pub const BREAK_CONTROLS: [Control; 3] = [
    Control { key: "4", label: "Set 3 minutes", command: CMD_SET_BREAK, value: "3" },
    Control { key: "5", label: "Set 5 minutes", command: CMD_SET_BREAK, value: "5" },
    Control { key: "6", label: "Set 10 minutes", command: CMD_SET_BREAK, value: "10" },
];

pub fn control_for_key(key: &str) -> Option<Control> {
    DURATION_CONTROLS
        .iter()
        .chain(BREAK_CONTROLS.iter())
        .find(|c| c.key == key)
        .copied()
}

/// Screen lines that are rewritten after the first draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Status,
    Remaining,
    Sessions,
    Cycles,
    NextBreak,
    Updated,
    Notice,
    Prompt,
}

const SNAPSHOT_REGIONS: [Region; 5] = [
    Region::Status,
    Region::Remaining,
    Region::Sessions,
    Region::Cycles,
    Region::NextBreak,
];

fn colored_label(status: &SessionStatus, label: String) -> ColoredString {
    match status {
        SessionStatus::Focus => label.bright_green().bold(),
        SessionStatus::FocusComplete => label.green().bold(),
        SessionStatus::Resting | SessionStatus::Paused | SessionStatus::Away => label.yellow().bold(),
        SessionStatus::Disconnected => label.red().bold(),
        SessionStatus::Idle | SessionStatus::Other(_) => label.bright_white().bold(),
    }
}

/// Text of one status region for the given snapshot
pub fn region_text(region: Region, snapshot: &StatusSnapshot) -> String {
    match region {
        Region::Status => format!(
            "  {:<30} {} {}",
            "Session status".cyan(),
            snapshot.icon(),
            colored_label(&snapshot.status, snapshot.label())
        ),
        Region::Remaining => format!(
            "  {:<30} {}",
            "Remaining time".cyan(),
            snapshot.remaining.bright_white().bold()
        ),
        Region::Sessions => format!(
            "  {:<30} {}",
            "Completed sessions (goal 4)".cyan(),
            format!("{} / {}", snapshot.sessions, SESSIONS_PER_CYCLE).bright_white()
        ),
        Region::Cycles => format!(
            "  {:<30} {}",
            "Total cycles (4x4)".cyan(),
            format!("{} completed", snapshot.cycles).bright_white()
        ),
        Region::NextBreak => format!(
            "  {:<30} {}",
            "Next break".cyan(),
            snapshot.next_break_label().bright_white()
        ),
        Region::Updated => format!(
            "{} {}",
            "Last updated:".bright_cyan(),
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ),
        Region::Notice | Region::Prompt => String::new(),
    }
}

/// Terminal dashboard: drawn once, then updated line by line
pub struct Dashboard<W: Write> {
    out: W,
    rows: HashMap<Region, u16>,
    next_row: u16,
}

impl<W: Write> Dashboard<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            rows: HashMap::new(),
            next_row: 1,
        }
    }

    fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text)?;
        self.next_row += 1;
        Ok(())
    }

    fn region_line(&mut self, region: Region, text: &str) -> io::Result<()> {
        self.rows.insert(region, self.next_row);
        self.line(text)
    }

    fn controls(&mut self, controls: &[Control]) -> io::Result<()> {
        let row = controls
            .iter()
            .map(|c| format!("[{}] {}", c.key.bright_white().bold(), c.label))
            .collect::<Vec<_>>()
            .join("    ");
        self.line(&format!("  {}", row))
    }

    /// Clear the screen and draw the full layout with placeholder values
    pub fn draw(&mut self) -> io::Result<()> {
        write!(self.out, "\x1B[2J\x1B[1;1H")?;
        self.rows.clear();
        self.next_row = 1;

        self.line(&"🚀 Trilhar Pomodoro Dashboard".bright_blue().bold().to_string())?;
        self.line(&"Digital twin of your study session".dimmed().to_string())?;
        self.line("")?;
        self.line(&"1. Focus duration (command)".bright_green().bold().to_string())?;
        self.controls(&DURATION_CONTROLS)?;
        self.line("")?;
        self.line(&"2. Break length (command)".bright_green().bold().to_string())?;
        self.controls(&BREAK_CONTROLS)?;
        self.line(&"─".repeat(65).bright_blue().to_string())?;
        self.line(&"3. Device status (telemetry)".bright_green().bold().to_string())?;

        let placeholder = StatusSnapshot::disconnected();
        for region in SNAPSHOT_REGIONS {
            self.region_line(region, &region_text(region, &placeholder))?;
        }
        self.line("")?;
        self.region_line(Region::Updated, &"Waiting for first update...".dimmed().to_string())?;
        self.region_line(Region::Notice, "")?;
        self.region_line(Region::Prompt, "> ")?;
        self.park_cursor()?;
        self.out.flush()
    }

    /// Row of a region, once the layout has been drawn
    pub fn row(&self, region: Region) -> Option<u16> {
        self.rows.get(&region).copied()
    }

    fn park_cursor(&mut self) -> io::Result<()> {
        if let Some(row) = self.row(Region::Prompt) {
            write!(self.out, "\x1B[{};3H", row)?;
        }
        Ok(())
    }

    fn write_region(&mut self, region: Region, text: &str) -> io::Result<()> {
        if let Some(row) = self.row(region) {
            write!(self.out, "\x1B[{};1H\x1B[2K{}", row, text)?;
        }
        Ok(())
    }

    /// Overwrite the status regions with the latest snapshot
    pub fn apply(&mut self, snapshot: &StatusSnapshot) -> io::Result<()> {
        for region in SNAPSHOT_REGIONS {
            self.write_region(region, &region_text(region, snapshot))?;
        }
        self.write_region(Region::Updated, &region_text(Region::Updated, snapshot))?;
        self.park_cursor()?;
        self.out.flush()
    }

    /// Show a transient message on the notification line
    pub fn notify(&mut self, text: &str) -> io::Result<()> {
        self.write_region(Region::Notice, text)?;
        self.park_cursor()?;
        self.out.flush()
    }

    /// Blank the prompt and whatever the echoed input left below it
    pub fn reset_prompt(&mut self) -> io::Result<()> {
        self.write_region(Region::Prompt, "> \x1B[J")?;
        self.park_cursor()?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn notification_text(notification: &Notification) -> String {
    match notification {
        Notification::Sent { .. } => notification.to_string().green().to_string(),
        Notification::Failed { .. } => notification.to_string().red().to_string(),
    }
}

/// React to one line of input: a preset key spawns its command, anything else gets a hint.
/// The command's outcome comes back later over `tx`.
pub fn handle_key<W: Write>(
    dashboard: &mut Dashboard<W>,
    key: &str,
    sender: &CommandSender,
    tx: &mpsc::UnboundedSender<Notification>,
) -> io::Result<()> {
    if key.is_empty() {
        return Ok(());
    }
    match control_for_key(key) {
        Some(control) => {
            dashboard.notify(&format!("… sending {} = {}", control.command, control.value))?;
            let sender = sender.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let notification = sender.send_command(control.command, control.value).await;
                let _ = tx.send(notification);
            });
        }
        None => {
            dashboard.notify(&format!(
                "{} unknown key '{}': use 1-3 for focus duration, 4-6 for break length",
                "?".yellow().bold(),
                key
            ))?;
        }
    }
    Ok(())
}

/// Forward stdin lines from a plain thread so a pending read never holds up shutdown
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });
    rx
}

/// Run the dashboard until the process is stopped
pub async fn run(config: BrokerConfig) -> anyhow::Result<()> {
    let broker = BrokerClient::new(&config);
    info!(url = broker.entity_url(), interval = ?config.poll_interval(), "starting dashboard");
    let reader = StatusReader::new(broker.clone());
    let sender = CommandSender::new(broker);

    let mut dashboard = Dashboard::new(io::stdout());
    dashboard.draw()?;

    let (tx, mut rx) = mpsc::unbounded_channel::<Notification>();
    let mut lines = spawn_stdin_reader();
    let mut stdin_open = true;

    let mut ticker = interval(config.poll_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let snapshot = reader.get_status().await;
                dashboard.apply(&snapshot)?;
            }
            Some(notification) = rx.recv() => {
                dashboard.notify(&notification_text(&notification))?;
            }
            line = lines.recv(), if stdin_open => match line {
                Some(input) => {
                    dashboard.reset_prompt()?;
                    handle_key(&mut dashboard, input.trim(), &sender, &tx)?;
                }
                None => {
                    debug!("stdin closed, controls disabled");
                    stdin_open = false;
                }
            },
            _ = &mut shutdown => {
                let mut out = dashboard.into_inner();
                writeln!(out)?;
                out.flush()?;
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::client::fake_broker::{FakeBroker, Reply};
    use crate::logic::types::BreakKind;
    use serde_json::json;
    use std::time::Duration;

    fn focus_snapshot() -> StatusSnapshot {
        StatusSnapshot {
            status: SessionStatus::Focus,
            sessions: 2,
            cycles: 1,
            remaining: "12:30".to_string(),
            break_minutes: 5,
            next_break: BreakKind::Long,
        }
    }

    fn drawn() -> Dashboard<Vec<u8>> {
        let mut dashboard = Dashboard::new(Vec::new());
        dashboard.draw().unwrap();
        dashboard
    }

    fn take_output(dashboard: &mut Dashboard<Vec<u8>>) -> String {
        String::from_utf8(std::mem::take(&mut dashboard.out)).unwrap()
    }

    #[test]
    fn test_controls_cover_all_presets() {
        let duration: Vec<_> = DURATION_CONTROLS.iter().map(|c| c.value).collect();
        let pause: Vec<_> = BREAK_CONTROLS.iter().map(|c| c.value).collect();
        assert_eq!(duration, ["15", "25", "50"]);
        assert_eq!(pause, ["3", "5", "10"]);
        assert!(DURATION_CONTROLS.iter().all(|c| c.command == "set_duracao"));
        assert!(BREAK_CONTROLS.iter().all(|c| c.command == "set_pausa"));

        assert_eq!(control_for_key("2").map(|c| c.value), Some("25"));
        assert_eq!(control_for_key("6").map(|c| (c.command, c.value)), Some(("set_pausa", "10")));
        assert_eq!(control_for_key("7"), None);
    }

    #[test]
    fn test_draw_lays_out_every_region_once() {
        let mut dashboard = drawn();
        let output = take_output(&mut dashboard);
        assert!(output.starts_with("\x1B[2J"));
        assert!(output.contains("DESCONECTADO"));
        assert!(output.contains("Set 25 minutes"));
        assert!(output.contains("Set 10 minutes"));

        let regions = [
            Region::Status,
            Region::Remaining,
            Region::Sessions,
            Region::Cycles,
            Region::NextBreak,
            Region::Updated,
            Region::Notice,
            Region::Prompt,
        ];
        let mut rows: Vec<u16> = regions.iter().map(|r| dashboard.row(*r).unwrap()).collect();
        rows.sort_unstable();
        rows.dedup();
        assert_eq!(rows.len(), regions.len());
        assert_eq!(dashboard.row(Region::Remaining), dashboard.row(Region::Status).map(|r| r + 1));
    }

    #[test]
    fn test_apply_rewrites_regions_in_place() {
        let mut dashboard = drawn();
        take_output(&mut dashboard);

        dashboard.apply(&focus_snapshot()).unwrap();
        let output = take_output(&mut dashboard);

        assert!(!output.contains("\x1B[2J"), "apply must not clear the screen");
        for region in SNAPSHOT_REGIONS {
            let row = dashboard.row(region).unwrap();
            assert!(output.contains(&format!("\x1B[{};1H\x1B[2K", row)), "{:?} not updated", region);
        }
        assert!(output.contains("🎯"));
        assert!(output.contains("FOCO"));
        assert!(output.contains("12:30"));
        assert!(output.contains("2 / 4"));
        assert!(output.contains("1 completed"));
        assert!(output.contains("20 min (long break)"));
        assert!(!output.contains("Set 25 minutes"), "controls are not redrawn");
    }

    #[test]
    fn test_notify_touches_only_the_notice_line() {
        let mut dashboard = drawn();
        take_output(&mut dashboard);

        dashboard.notify("✓ Command sent: set_duracao = 25").unwrap();
        let output = take_output(&mut dashboard);
        let notice = dashboard.row(Region::Notice).unwrap();
        let status = dashboard.row(Region::Status).unwrap();
        assert!(output.contains(&format!("\x1B[{};1H\x1B[2K✓ Command sent", notice)));
        assert!(!output.contains(&format!("\x1B[{};1H", status)));
    }

    #[test]
    fn test_updates_before_draw_are_ignored() {
        let mut dashboard = Dashboard::new(Vec::new());
        dashboard.apply(&focus_snapshot()).unwrap();
        dashboard.notify("hello").unwrap();
        let output = String::from_utf8(dashboard.into_inner()).unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_region_text_for_disconnected_snapshot() {
        let snapshot = StatusSnapshot::disconnected();
        assert!(region_text(Region::Status, &snapshot).contains("DESCONECTADO"));
        assert!(region_text(Region::Remaining, &snapshot).contains("00:00"));
        assert!(region_text(Region::Sessions, &snapshot).contains("0 / 4"));
        assert!(region_text(Region::NextBreak, &snapshot).contains("5 min (short break)"));
    }

    #[test]
    fn test_notification_text_keeps_message() {
        let sent = Notification::Sent {
            command: "set_pausa".to_string(),
            value: "3".to_string(),
        };
        assert!(notification_text(&sent).contains("Command sent: set_pausa = 3"));
    }

    #[tokio::test]
    async fn test_preset_key_sends_one_command_and_reports_back() {
        let broker = FakeBroker::start(Reply::Status(200), Reply::Status(204)).await;
        let sender = CommandSender::new(BrokerClient::new(&broker.config()));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut dashboard = drawn();
        take_output(&mut dashboard);

        handle_key(&mut dashboard, "2", &sender, &tx).unwrap();
        let output = take_output(&mut dashboard);
        let notice = dashboard.row(Region::Notice).unwrap();
        assert!(output.contains(&format!("\x1B[{};1H\x1B[2K… sending set_duracao = 25", notice)));

        let notification = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            notification,
            Notification::Sent {
                command: "set_duracao".to_string(),
                value: "25".to_string(),
            }
        );

        let requests = broker.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "PATCH");
        assert_eq!(
            requests[0].body,
            Some(json!({ "set_duracao": { "type": "command", "value": "25" } }))
        );
    }

    #[tokio::test]
    async fn test_unknown_key_shows_hint_and_sends_nothing() {
        let broker = FakeBroker::start(Reply::Status(200), Reply::Status(204)).await;
        let sender = CommandSender::new(BrokerClient::new(&broker.config()));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut dashboard = drawn();
        take_output(&mut dashboard);

        handle_key(&mut dashboard, "9", &sender, &tx).unwrap();
        let output = take_output(&mut dashboard);
        let notice = dashboard.row(Region::Notice).unwrap();
        assert!(output.contains(&format!("\x1B[{};1H\x1B[2K", notice)));
        assert!(output.contains("unknown key '9'"));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(rx.try_recv().is_err());
        assert!(broker.requests().is_empty());
    }

    #[tokio::test]
    async fn test_empty_key_is_ignored() {
        let broker = FakeBroker::start(Reply::Status(200), Reply::Status(204)).await;
        let sender = CommandSender::new(BrokerClient::new(&broker.config()));
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut dashboard = drawn();
        take_output(&mut dashboard);

        handle_key(&mut dashboard, "", &sender, &tx).unwrap();
        assert!(take_output(&mut dashboard).is_empty());
        assert!(broker.requests().is_empty());
    }
}
