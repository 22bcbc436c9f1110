use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const INCOGNITO_SPACE_TITLE: &str = "Incognito";
pub const CONTEXT_MARKER: &str = "⭕️ ";

pub const ICON_SPACE: &str = "./script-filter-item-icons/iconSpace.png";
pub const ICON_TOP_APP_TAB: &str = "./script-filter-item-icons/iconTabTopApp.png";
pub const ICON_PINNED_TAB: &str = "./script-filter-item-icons/iconTabPinned.png";
pub const ICON_UNPINNED_TAB: &str = "./script-filter-item-icons/iconTabUnpinned.png";
pub const ICON_ALERT: &str = "./script-filter-item-icons/iconAlert.png";

/// Static, cacheable record collected from the canonical window.
///
/// Indices are positional within the source window or space, so a record is
/// only meaningful alongside the snapshot it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TabRecord {
    TopApp {
        title: String,
        url: String,
        tab_index: usize,
    },
    Pinned {
        title: String,
        url: String,
        space_index: usize,
        tab_index: usize,
        space_title: String,
    },
    Unpinned {
        title: String,
        url: String,
        space_index: usize,
        tab_index: usize,
        space_title: String,
    },
    Space {
        title: String,
        space_index: usize,
    },
}

impl TabRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::TopApp { .. } => RecordKind::TopApp,
            Self::Pinned { .. } => RecordKind::Pinned,
            Self::Unpinned { .. } => RecordKind::Unpinned,
            Self::Space { .. } => RecordKind::Space,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::TopApp { title, .. }
            | Self::Pinned { title, .. }
            | Self::Unpinned { title, .. }
            | Self::Space { title, .. } => title,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Self::TopApp { url, .. } | Self::Pinned { url, .. } | Self::Unpinned { url, .. } => {
                Some(url)
            }
            Self::Space { .. } => None,
        }
    }

    /// Title of the space a tab lives in. Top app tabs and spaces have none.
    pub fn space_title(&self) -> Option<&str> {
        match self {
            Self::Pinned { space_title, .. } | Self::Unpinned { space_title, .. } => {
                Some(space_title)
            }
            Self::TopApp { .. } | Self::Space { .. } => None,
        }
    }

    pub fn is_space(&self) -> bool {
        matches!(self, Self::Space { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    TopApp,
    Pinned,
    Unpinned,
    Space,
}

impl RecordKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::TopApp => "Top App Tab",
            Self::Pinned => "Pinned Tab",
            Self::Unpinned => "Unpinned Tab",
            Self::Space => "Space",
        }
    }

    pub fn icon_path(self) -> &'static str {
        match self {
            Self::TopApp => ICON_TOP_APP_TAB,
            Self::Pinned => ICON_PINNED_TAB,
            Self::Unpinned => ICON_UNPINNED_TAB,
            Self::Space => ICON_SPACE,
        }
    }
}

/// Point-in-time focus state. Rebuilt on every query, never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DynamicState {
    pub number_of_windows: usize,
    pub window_active_spaces: BTreeMap<usize, String>,
}

impl DynamicState {
    pub fn active_space(&self, window_index: usize) -> Option<&str> {
        self.window_active_spaces
            .get(&window_index)
            .map(String::as_str)
    }
}

/// Positional address handed to the action runner.
///
/// Serialized as a JSON array: `["space", w, s]`, `["topTab", w, t]`,
/// `["full", w, s, t]` or `["error"]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Value>", try_from = "Vec<Value>")]
pub enum ActionDescriptor {
    Space {
        window: usize,
        space: usize,
    },
    TopTab {
        window: usize,
        tab: usize,
    },
    Full {
        window: usize,
        space: usize,
        tab: usize,
    },
    Error,
}

impl From<ActionDescriptor> for Vec<Value> {
    fn from(value: ActionDescriptor) -> Self {
        match value {
            ActionDescriptor::Space { window, space } => {
                vec!["space".into(), window.into(), space.into()]
            }
            ActionDescriptor::TopTab { window, tab } => {
                vec!["topTab".into(), window.into(), tab.into()]
            }
            ActionDescriptor::Full { window, space, tab } => {
                vec!["full".into(), window.into(), space.into(), tab.into()]
            }
            ActionDescriptor::Error => vec!["error".into()],
        }
    }
}

impl TryFrom<Vec<Value>> for ActionDescriptor {
    type Error = String;

    fn try_from(value: Vec<Value>) -> Result<Self, String> {
        let kind = value
            .first()
            .and_then(Value::as_str)
            .ok_or_else(|| "action descriptor must start with a kind string".to_string())?;
        let coordinate = |position: usize| -> Result<usize, String> {
            value
                .get(position)
                .and_then(Value::as_u64)
                .map(|n| n as usize)
                .ok_or_else(|| format!("'{kind}' descriptor is missing coordinate {position}"))
        };

        let expected_len = match kind {
            "space" | "topTab" => 3,
            "full" => 4,
            "error" => 1,
            other => return Err(format!("unknown action descriptor kind '{other}'")),
        };
        if value.len() != expected_len {
            return Err(format!(
                "'{kind}' descriptor expects {expected_len} elements, got {}",
                value.len()
            ));
        }

        match kind {
            "space" => Ok(Self::Space {
                window: coordinate(1)?,
                space: coordinate(2)?,
            }),
            "topTab" => Ok(Self::TopTab {
                window: coordinate(1)?,
                tab: coordinate(2)?,
            }),
            "full" => Ok(Self::Full {
                window: coordinate(1)?,
                space: coordinate(2)?,
                tab: coordinate(3)?,
            }),
            _ => Ok(ActionDescriptor::Error),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKey {
    Ctrl,
    Shift,
    Alt,
    Cmd,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModifierArg {
    Action(ActionDescriptor),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifierAction {
    pub arg: Option<ModifierArg>,
    pub subtitle: String,
    pub valid: bool,
    pub icon: Option<String>,
}

impl ModifierAction {
    pub fn new(arg: ModifierArg, subtitle: &str) -> Self {
        Self {
            arg: Some(arg),
            subtitle: subtitle.to_string(),
            valid: true,
            icon: None,
        }
    }

    pub fn disabled(subtitle: &str) -> Self {
        Self {
            arg: None,
            subtitle: subtitle.to_string(),
            valid: false,
            icon: None,
        }
    }
}

/// One display row, produced fresh per query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultItem {
    pub title: String,
    pub subtitle: String,
    pub arg: ActionDescriptor,
    pub icon: String,
    pub modifier_actions: BTreeMap<ModifierKey, ModifierAction>,
    pub is_context_match: bool,
    pub kind: Option<RecordKind>,
    pub window_index: usize,
    pub valid: Option<bool>,
}

impl ResultItem {
    /// Informational row with no record behind it (errors, empty results).
    pub fn notice(title: &str, subtitle: &str) -> Self {
        Self {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            arg: ActionDescriptor::Error,
            icon: ICON_ALERT.to_string(),
            modifier_actions: BTreeMap::new(),
            is_context_match: false,
            kind: None,
            window_index: 0,
            valid: None,
        }
    }

    pub fn is_space(&self) -> bool {
        self.kind == Some(RecordKind::Space)
    }

    /// Title without the context marker. Titles of other rows are returned
    /// whole, even when the page title itself starts with the marker.
    pub fn plain_title(&self) -> &str {
        if !self.is_context_match {
            return &self.title;
        }
        self.title
            .strip_prefix(CONTEXT_MARKER)
            .unwrap_or(&self.title)
    }
}
