use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread;

use nalgebra::Point3;
use serde::Deserialize;

use crate::error::ContentError;

pub mod layout;

/// One skill as it comes out of the content store. Only the name is
/// required; everything else falls back to the procedural layout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SkillRecord {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    /// Hex, `"#rrggbb"` or `"rrggbb"`.
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub orbit: Option<OrbitOverride>,
}

impl SkillRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: None,
            color: None,
            icon: None,
            orbit: None,
        }
    }
}

/// Hand-tuned orbit parameters for a single skill. Anything left out comes
/// from the layout.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OrbitOverride {
    pub semimajor_axis: Option<f64>,
    pub eccentricity: Option<f64>,
    pub mean_anomaly: Option<f64>,
    pub angular_rate: Option<f64>,
    pub clockwise: Option<bool>,
    pub size: Option<f64>,
    pub depth: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct SkillQuery {
    pub category: Option<String>,
    pub limit: Option<usize>,
}

impl SkillQuery {
    pub fn matches(&self, record: &SkillRecord) -> bool {
        match &self.category {
            Some(category) => record.category.as_deref() == Some(category.as_str()),
            None => true,
        }
    }

    fn apply(&self, records: impl IntoIterator<Item = SkillRecord>) -> Vec<SkillRecord> {
        let filtered = records.into_iter().filter(|r| self.matches(r));
        match self.limit {
            Some(limit) => filtered.take(limit).collect(),
            None => filtered.collect(),
        }
    }
}

/// Somewhere skills come from. Read-only.
pub trait SkillSource: Send {
    fn fetch(&self, query: &SkillQuery) -> Result<Vec<SkillRecord>, ContentError>;
}

#[derive(Debug, Deserialize)]
struct SkillFile {
    #[serde(default)]
    skills: Vec<SkillRecord>,
}

/// Reads `[[skills]]` tables out of a TOML file.
#[derive(Debug, Clone)]
pub struct TomlSkillSource {
    path: PathBuf,
}

impl TomlSkillSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn parse(raw: &str) -> Result<Vec<SkillRecord>, toml::de::Error> {
        let file: SkillFile = toml::from_str(raw)?;
        Ok(file.skills)
    }
}

impl SkillSource for TomlSkillSource {
    fn fetch(&self, query: &SkillQuery) -> Result<Vec<SkillRecord>, ContentError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| ContentError::Io {
            path: self.path.clone(),
            source,
        })?;
        let records = Self::parse(&raw).map_err(|source| ContentError::Parse {
            path: self.path.clone(),
            source,
        })?;
        log::debug!(
            "read {} skills from {}",
            records.len(),
            self.path.display()
        );
        Ok(query.apply(records))
    }
}

/// Skills held in memory. Mostly for tests and demos.
#[derive(Debug, Clone, Default)]
pub struct StaticSkillSource {
    records: Vec<SkillRecord>,
}

impl StaticSkillSource {
    pub fn new(records: Vec<SkillRecord>) -> Self {
        Self { records }
    }
}

impl SkillSource for StaticSkillSource {
    fn fetch(&self, query: &SkillQuery) -> Result<Vec<SkillRecord>, ContentError> {
        Ok(query.apply(self.records.iter().cloned()))
    }
}

/// Runs the fetch on its own thread. The receiver gets exactly one list,
/// which is empty if the fetch failed.
pub fn spawn_fetch(source: Box<dyn SkillSource>, query: SkillQuery) -> Receiver<Vec<SkillRecord>> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let records = match source.fetch(&query) {
            Ok(records) => records,
            Err(err) => {
                log::warn!("skill fetch failed, showing no skills: {}", err);
                Vec::new()
            }
        };
        // Nobody listening any more is fine
        let _ = sender.send(records);
    });
    receiver
}

/// Parses `"#rrggbb"` (the `#` is optional). Returns `None` for anything else.
pub fn parse_color(s: &str) -> Option<Point3<f32>> {
    let s = s.strip_prefix('#').unwrap_or(s);
    if s.len() != 6 || !s.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&s[0..2], 16).ok()?;
    let g = u8::from_str_radix(&s[2..4], 16).ok()?;
    let b = u8::from_str_radix(&s[4..6], 16).ok()?;

    Some(Point3::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
    ))
}
