use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CommandResultViewModel<T>
where
    T: Serialize,
{
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<StatusBadge>,

    pub content: T,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Guidance>,
}

impl<T> CommandResultViewModel<T>
where
    T: Serialize,
{
    pub fn new(content: T) -> Self {
        Self {
            badge: None,
            content,
            suggestions: Vec::new(),
        }
    }

    pub fn with_badge(mut self, badge: StatusBadge) -> Self {
        self.badge = Some(badge);
        self
    }

    pub fn with_suggestion(mut self, guide: Guidance) -> Self {
        self.suggestions.push(guide);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusBadge {
    pub level: StatusLevel,
    pub label: String,
}

impl StatusBadge {
    pub fn success(label: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Success,
            label: label.into(),
        }
    }

    pub fn info(label: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Info,
            label: label.into(),
        }
    }

    pub fn warning(label: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Warning,
            label: label.into(),
        }
    }

    pub fn error(label: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Error,
            label: label.into(),
        }
    }

    pub fn icon(&self) -> &str {
        match self.level {
            StatusLevel::Success => "✅",
            StatusLevel::Info => "ℹ️",
            StatusLevel::Warning => "⚠️",
            StatusLevel::Error => "❌",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct Guidance {
    pub description: String,
    pub command: Option<String>,
}

impl Guidance {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            command: None,
        }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }
}
