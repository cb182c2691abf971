use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

/// Icon family used when a customer mapping falls back to a generic asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconCategory {
    Device,
    System,
    Brand,
}

impl IconCategory {
    pub fn legacy_prefix(self) -> &'static str {
        match self {
            Self::Device => "generic-device-",
            Self::System => "generic-system-",
            Self::Brand => "generic-brand-",
        }
    }

    /// Suffix carried by keys that already name a concrete generic asset.
    pub fn semantic_suffix(self) -> Option<&'static str> {
        match self {
            Self::Device => Some("-station"),
            Self::System => Some("-system"),
            Self::Brand => None,
        }
    }
}

/// Reference to an icon asset.
///
/// Authored diagram data usually carries plain keys (`Named`); the other variants are
/// produced by the customer overlay so the lookup rule is explicit in the type instead of
/// being encoded in string prefixes. Serialized with the variant name as the key
/// (`{"custom": "/acme/mill.svg"}`); a bare string reads back as `Named`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "IconRefRepr")]
pub enum IconRef {
    /// Key from the static diagram definition, looked up as-is.
    Named(String),
    /// Generic key that already carries its semantic suffix (`welding-station`).
    Semantic(String),
    /// Legacy generic key, looked up as `<category prefix><key>`.
    Generic { category: IconCategory, key: String },
    /// Literal asset path supplied by the customer; bypasses the registry.
    Custom(String),
}

impl IconRef {
    pub fn named(key: &str) -> Self {
        Self::Named(key.to_string())
    }

    pub fn generic(category: IconCategory, key: &str) -> Self {
        Self::Generic {
            category,
            key: key.to_string(),
        }
    }

    /// Key used against the registry table. Custom paths return the path itself.
    pub fn lookup_key(&self) -> Cow<'_, str> {
        match self {
            Self::Named(key) | Self::Semantic(key) | Self::Custom(key) => Cow::Borrowed(key),
            Self::Generic { category, key } => {
                Cow::Owned(format!("{}{}", category.legacy_prefix(), key))
            }
        }
    }
}

impl From<String> for IconRef {
    fn from(value: String) -> Self {
        Self::Named(value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IconRefRepr {
    Key(String),
    Tagged(TaggedIconRef),
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
enum TaggedIconRef {
    Named(String),
    Semantic(String),
    Generic { category: IconCategory, key: String },
    Custom(String),
}

impl From<IconRefRepr> for IconRef {
    fn from(value: IconRefRepr) -> Self {
        match value {
            IconRefRepr::Key(key) => Self::Named(key),
            IconRefRepr::Tagged(TaggedIconRef::Named(key)) => Self::Named(key),
            IconRefRepr::Tagged(TaggedIconRef::Semantic(key)) => Self::Semantic(key),
            IconRefRepr::Tagged(TaggedIconRef::Generic { category, key }) => {
                Self::Generic { category, key }
            }
            IconRefRepr::Tagged(TaggedIconRef::Custom(path)) => Self::Custom(path),
        }
    }
}

impl fmt::Display for IconRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lookup_key())
    }
}

/// Resolves icon references to asset paths. Unknown keys resolve to `None` so renderers can
/// draw a placeholder.
pub trait IconResolver {
    fn resolve(&self, icon: &IconRef) -> Option<String>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IconRegistry {
    table: BTreeMap<String, String>,
}

impl IconRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_table(table: BTreeMap<String, String>) -> Self {
        Self { table }
    }

    pub fn insert(&mut self, key: &str, path: &str) {
        self.table.insert(key.to_string(), path.to_string());
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl IconResolver for IconRegistry {
    fn resolve(&self, icon: &IconRef) -> Option<String> {
        if let IconRef::Custom(path) = icon {
            return Some(path.clone());
        }
        let key = icon.lookup_key();
        let found = self.table.get(key.as_ref()).cloned();
        if found.is_none() {
            debug!(icon_key = key.as_ref(); "Unknown icon key");
        }
        found
    }
}
