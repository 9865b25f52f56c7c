use crate::utils::error::{ImportError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// 保留插入順序、不含重複元素的集合。標籤和 URL 都用它。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<T>", into = "Vec<T>")]
#[serde(bound(
    serialize = "T: Serialize + Clone",
    deserialize = "T: Deserialize<'de> + PartialEq"
))]
pub struct OrderedSet<T> {
    items: Vec<T>,
}

impl<T> OrderedSet<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: PartialEq> OrderedSet<T> {
    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    /// Returns false when the item was already present.
    pub fn insert(&mut self, item: T) -> bool {
        if self.items.contains(&item) {
            return false;
        }
        self.items.push(item);
        true
    }
}

impl<T> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> From<Vec<T>> for OrderedSet<T> {
    fn from(items: Vec<T>) -> Self {
        items.into_iter().collect()
    }
}

impl<T> From<OrderedSet<T>> for Vec<T> {
    fn from(set: OrderedSet<T>) -> Self {
        set.items
    }
}

impl<T: PartialEq> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for item in iter {
            set.insert(item);
        }
        set
    }
}

impl<'a, T> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(String);

impl Tag {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub type TagSet = OrderedSet<Tag>;

/// 舊版匯出檔把標籤存成以空白分隔的單一字串
pub const LEGACY_TAG_SEPARATOR: char = ' ';

impl OrderedSet<Tag> {
    pub fn from_delimited(raw: &str) -> Self {
        raw.split(LEGACY_TAG_SEPARATOR)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(Tag::new)
            .collect()
    }

    /// Display form only.
    pub fn joined(&self) -> String {
        let separator = LEGACY_TAG_SEPARATOR.to_string();
        self.iter()
            .map(Tag::as_str)
            .collect::<Vec<_>>()
            .join(separator.as_str())
    }
}

/// Accepts both `["a", "b"]` and the legacy `"a b"` form.
pub fn deserialize_tags<'de, D>(deserializer: D) -> std::result::Result<TagSet, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TagsRepr {
        List(Vec<String>),
        Delimited(String),
    }

    Ok(match Option::<TagsRepr>::deserialize(deserializer)? {
        Some(TagsRepr::List(tokens)) => tokens
            .into_iter()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .map(Tag::new)
            .collect(),
        Some(TagsRepr::Delimited(raw)) => TagSet::from_delimited(&raw),
        None => TagSet::new(),
    })
}

/// 正規化後的端點 URL，相等性以正規化字串比較
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Url(String);

impl Url {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ImportError::ValidationError {
                message: "URL cannot be empty".to_string(),
            });
        }

        let candidate = if has_scheme(trimmed) {
            trimmed.to_string()
        } else {
            format!("http://{}", trimmed)
        };

        let parsed = url::Url::parse(&candidate).map_err(|e| ImportError::ValidationError {
            message: format!("invalid URL '{}': {}", trimmed, e),
        })?;

        match parsed.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(ImportError::ValidationError {
                    message: format!("unsupported URL scheme '{}' in '{}'", scheme, trimmed),
                })
            }
        }

        let mut normalized = parsed.to_string();
        if parsed.path() == "/" && parsed.query().is_none() && parsed.fragment().is_none() {
            normalized.pop();
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 只看開頭的 `scheme://`，query 裡出現的 `://` 不算
fn has_scheme(raw: &str) -> bool {
    let Some((scheme, _)) = raw.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|first| first.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

impl TryFrom<String> for Url {
    type Error = ImportError;

    fn try_from(raw: String) -> Result<Self> {
        Self::parse(&raw)
    }
}

impl From<Url> for String {
    fn from(url: Url) -> Self {
        url.0
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub type UrlSet = OrderedSet<Url>;

fn default_http_status() -> u16 {
    200
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: TagSet,
    #[serde(default)]
    pub response_body: String,
    #[serde(default = "default_http_status")]
    pub http_status: u16,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: TagSet::new(),
            response_body: String::new(),
            http_status: default_http_status(),
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| Tag::new(*t)).collect();
        self
    }

    pub fn with_response(mut self, http_status: u16, body: impl Into<String>) -> Self {
        self.http_status = http_status;
        self.response_body = body.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: TagSet,
    #[serde(default)]
    pub real_urls: UrlSet,
    #[serde(default)]
    scenarios: Vec<Scenario>,
}

impl Service {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            tags: TagSet::new(),
            real_urls: UrlSet::new(),
            scenarios: Vec::new(),
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| Tag::new(*t)).collect();
        self
    }

    pub fn with_urls(mut self, urls: &[&str]) -> Result<Self> {
        self.real_urls = urls
            .iter()
            .map(|raw| Url::parse(raw))
            .collect::<Result<Vec<_>>>()?
            .into();
        Ok(self)
    }

    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.upsert_scenario(scenario);
        self
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn scenario_mut(&mut self, name: &str) -> Option<&mut Scenario> {
        self.scenarios.iter_mut().find(|s| s.name == name)
    }

    /// 同名 scenario 會被取代並保留原位置，否則附加在最後
    pub fn upsert_scenario(&mut self, scenario: Scenario) {
        match self.scenario_mut(&scenario.name) {
            Some(existing) => *existing = scenario,
            None => self.scenarios.push(scenario),
        }
    }

    /// Drops every scenario `keep` rejects and returns how many were dropped.
    pub fn retain_scenarios<F: FnMut(&Scenario) -> bool>(&mut self, keep: F) -> usize {
        let before = self.scenarios.len();
        self.scenarios.retain(keep);
        before - self.scenarios.len()
    }

    /// 空白名稱不算重複，交給 reconcile 當成無效 identity 處理
    pub fn duplicate_scenario_name(&self) -> Option<&str> {
        self.scenarios.iter().enumerate().find_map(|(idx, scenario)| {
            if scenario.name.trim().is_empty() {
                return None;
            }
            self.scenarios[..idx]
                .iter()
                .any(|earlier| earlier.name == scenario.name)
                .then_some(scenario.name.as_str())
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxySettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<Url>,
}

impl fmt::Display for ProxySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.url {
            Some(url) => write!(f, "enabled={}, url={}", self.enabled, url),
            None => write!(f, "enabled={}", self.enabled),
        }
    }
}

/// 一份完整解析後的匯出內容
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub services: Vec<Service>,
    pub proxy: Option<ProxySettings>,
}

impl Snapshot {
    pub fn new(services: Vec<Service>) -> Self {
        Self {
            services,
            proxy: None,
        }
    }
}
