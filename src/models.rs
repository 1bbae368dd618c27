use std::str::FromStr;

/// Review status reported by the homework API.
///
/// The set is closed: anything else the API returns is surfaced as
/// [`crate::FieldError::UnrecognizedStatus`] so the set can be extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    Approved,
    Reviewing,
    Rejected,
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(StatusCode::Approved),
            "reviewing" => Ok(StatusCode::Reviewing),
            "rejected" => Ok(StatusCode::Rejected),
            other => Err(other.to_string()),
        }
    }
}

impl StatusCode {
    /// Wire value as returned by the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCode::Approved => "approved",
            StatusCode::Reviewing => "reviewing",
            StatusCode::Rejected => "rejected",
        }
    }

    /// Human-readable verdict sent to the chat.
    pub fn verdict(&self) -> &'static str {
        match self {
            StatusCode::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            StatusCode::Reviewing => "Работа взята на проверку ревьюером.",
            StatusCode::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }

    pub fn all() -> &'static [StatusCode] {
        &[
            StatusCode::Approved,
            StatusCode::Reviewing,
            StatusCode::Rejected,
        ]
    }
}

/// Newest homework entry from a poll response.
///
/// Fields stay optional here; completeness is checked when the
/// notification text is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkItem {
    pub name: Option<String>,
    pub status: Option<String>,
}

impl WorkItem {
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            status: Some(status.into()),
        }
    }

    /// Build from one element of the `homeworks` array.
    ///
    /// The API calls the identifier `homework_name`; `name` is accepted too.
    /// A non-string status is kept in its JSON form so it is reported as
    /// unrecognized rather than missing.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        let name = object
            .get("homework_name")
            .filter(|v| !v.is_null())
            .or_else(|| object.get("name"))
            .and_then(|v| v.as_str())
            .map(str::to_string);

        let status = match object.get("status") {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        };

        Self { name, status }
    }

    /// True when the item's status is the one already notified.
    pub fn matches(&self, last: Option<StatusCode>) -> bool {
        match (self.status.as_deref(), last) {
            (Some(status), Some(last)) => status == last.as_str(),
            _ => false,
        }
    }
}

/// Process-lifetime state carried between poll cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopState {
    pub last_notified_status: Option<StatusCode>,
    /// Unix seconds passed as `from_date` on the next fetch.
    pub last_poll_timestamp: i64,
}

impl LoopState {
    pub fn new(from_date: i64) -> Self {
        Self {
            last_notified_status: None,
            last_poll_timestamp: from_date,
        }
    }

    /// State after a confirmed notification.
    pub fn notified(&self, status: StatusCode, now: i64) -> Self {
        Self {
            last_notified_status: Some(status),
            last_poll_timestamp: now,
        }
    }
}
