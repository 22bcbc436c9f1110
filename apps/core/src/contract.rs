use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{ActionDescriptor, ModifierAction, ModifierArg, ModifierKey, ResultItem};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IconDto {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModifierDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg: Option<ModifierArg>,
    pub subtitle: String,
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<IconDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemDto {
    pub title: String,
    pub subtitle: String,
    pub arg: ActionDescriptor,
    pub icon: IconDto,
    pub mods: BTreeMap<ModifierKey, ModifierDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
}

/// The document handed to the launcher: `{"items": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScriptFilterResponse {
    pub items: Vec<ItemDto>,
}

impl ScriptFilterResponse {
    pub fn to_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

impl From<Vec<ResultItem>> for ScriptFilterResponse {
    fn from(value: Vec<ResultItem>) -> Self {
        Self {
            items: value.into_iter().map(ItemDto::from).collect(),
        }
    }
}

impl From<ModifierAction> for ModifierDto {
    fn from(value: ModifierAction) -> Self {
        Self {
            arg: value.arg,
            subtitle: value.subtitle,
            valid: value.valid,
            icon: value.icon.map(|path| IconDto { path }),
        }
    }
}

impl From<ResultItem> for ItemDto {
    fn from(value: ResultItem) -> Self {
        Self {
            title: value.title,
            subtitle: value.subtitle,
            arg: value.arg,
            icon: IconDto { path: value.icon },
            mods: value
                .modifier_actions
                .into_iter()
                .map(|(key, action)| (key, ModifierDto::from(action)))
                .collect(),
            valid: value.valid,
        }
    }
}
