use serde::{Serialize, Serializer};
use std::fmt;

/// Twin entity that mirrors the study-timer device
pub const ENTITY_ID: &str = "urn:ngsi-ld:SessaoEstudo:001";

/// FIWARE service group and path sent with every broker request
pub const FIWARE_SERVICE: &str = "smart";
pub const FIWARE_SERVICE_PATH: &str = "/";

// Twin attribute names
pub const ATTR_STATUS: &str = "status_sessao";
pub const ATTR_SESSIONS: &str = "sessoes_completas";
pub const ATTR_CYCLES: &str = "ciclos_totais";
pub const ATTR_REMAINING: &str = "tempo_restante_seg";
pub const ATTR_BREAK_MINUTES: &str = "duracao_pausa_configurada";
pub const ATTR_NEXT_BREAK: &str = "proxima_pausa_tipo";

// Command attribute names
pub const CMD_SET_DURATION: &str = "set_duracao";
pub const CMD_SET_BREAK: &str = "set_pausa";

pub const DEFAULT_BREAK_MINUTES: i64 = 5;
pub const LONG_BREAK_LABEL: &str = "20 min (long break)";

/// Partial sessions that make up one full cycle
pub const SESSIONS_PER_CYCLE: i64 = 4;

/// Session phase as reported by the device
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Idle,          // ocioso
    Focus,         // foco
    Resting,       // pausa_descanso
    Paused,        // pausa_foco
    Away,          // pausa_automatica
    FocusComplete, // foco_concluido
    Disconnected,  // broker unreachable
    Other(String), // anything the device reports that we do not know yet
}

impl SessionStatus {
    /// Map a twin value. `Disconnected` is never produced here, only by a failed read.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "ocioso" | "" => SessionStatus::Idle,
            "foco" => SessionStatus::Focus,
            "pausa_descanso" => SessionStatus::Resting,
            "pausa_foco" => SessionStatus::Paused,
            "pausa_automatica" => SessionStatus::Away,
            "foco_concluido" => SessionStatus::FocusComplete,
            other => SessionStatus::Other(other.to_string()),
        }
    }

    /// Value as it appears on the twin
    pub fn raw(&self) -> &str {
        match self {
            SessionStatus::Idle => "ocioso",
            SessionStatus::Focus => "foco",
            SessionStatus::Resting => "pausa_descanso",
            SessionStatus::Paused => "pausa_foco",
            SessionStatus::Away => "pausa_automatica",
            SessionStatus::FocusComplete => "foco_concluido",
            SessionStatus::Disconnected => "DESCONECTADO",
            SessionStatus::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> String {
        match self {
            SessionStatus::Idle => "IDLE".to_string(),
            SessionStatus::Focus => "FOCO".to_string(),
            SessionStatus::Resting => "RESTING".to_string(),
            SessionStatus::Paused => "PAUSED".to_string(),
            SessionStatus::Away => "AWAY (auto-pause)".to_string(),
            SessionStatus::FocusComplete => "FOCUS COMPLETE".to_string(),
            SessionStatus::Disconnected => "DESCONECTADO".to_string(),
            SessionStatus::Other(raw) => raw.to_uppercase(),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SessionStatus::Idle | SessionStatus::Other(_) => "💤",
            SessionStatus::Focus => "🎯",
            SessionStatus::Resting => "☕",
            SessionStatus::Paused => "⏸️",
            SessionStatus::Away => "🚶",
            SessionStatus::FocusComplete => "✅",
            SessionStatus::Disconnected => "—",
        }
    }
}

impl Serialize for SessionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.raw())
    }
}

/// Kind of the break that follows the current focus block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum BreakKind {
    #[default]
    #[serde(rename = "curta")]
    Short,
    #[serde(rename = "longa")]
    Long,
}

impl BreakKind {
    /// Only `longa` selects the long break; anything else is a short one.
    /// Map a twin value. `Disconnected` is never produced here, only by a failed read.
    pub fn from_raw(raw: &str) -> Self {
        if raw == "longa" {
            BreakKind::Long
        } else {
            BreakKind::Short
        }
    }
}

/// Display-ready view of the twin, recomputed on every poll
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    pub status: SessionStatus,
    pub sessions: i64,
    pub cycles: i64,
    pub remaining: String,
    pub break_minutes: i64,
    pub next_break: BreakKind,
}

impl StatusSnapshot {
    /// Snapshot shown whenever the broker cannot be read
    pub fn disconnected() -> Self {
        Self {
            status: SessionStatus::Disconnected,
            sessions: 0,
            cycles: 0,
            remaining: "00:00".to_string(),
            break_minutes: DEFAULT_BREAK_MINUTES,
            next_break: BreakKind::Short,
        }
    }

    pub fn label(&self) -> String {
        self.status.label()
    }

    pub fn icon(&self) -> &'static str {
        self.status.icon()
    }

    pub fn next_break_label(&self) -> String {
        match self.next_break {
            BreakKind::Long => LONG_BREAK_LABEL.to_string(),
            BreakKind::Short => format!("{} min (short break)", self.break_minutes),
        }
    }
}

/// Transient result of a command, shown once to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Sent { command: String, value: String },
    Failed { command: String, reason: String },
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::Sent { command, value } => {
                write!(f, "✓ Command sent: {} = {}", command, value)
            }
            Notification::Failed { command, reason } => {
                write!(f, "✗ Connection error sending {}: {}", command, reason)
            }
        }
    }
}
