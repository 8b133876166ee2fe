//! Configuration management
//!
//! Reads `settings.json` from the kpi directory:
//! ```json
//! {
//!   "sources": {
//!     "membership": { "career": "https://...", "design": "https://..." },
//!     "partner": { "career": "https://..." },
//!     "sales": { "design": "https://..." }
//!   },
//!   "http": { "timeoutSecs": 30 },
//!   "calendar": { "eventsFile": "events.json" }
//! }
//! ```
//!
//! Source URLs can also come from the environment
//! (`MEMBERSHIP_KPI_CSV_URL_CAREER`, `SALES_KPI_CSV_URL_DESIGN`, ...), which
//! wins over the file. The unsuffixed legacy variables apply to Career only.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{BusinessVertical, MetricFamily};

const SETTINGS_FILE: &str = "settings.json";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_EVENTS_FILE: &str = "events.json";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    sources: SourcesSettings,
    #[serde(default)]
    http: HttpSettings,
    #[serde(default)]
    calendar: CalendarSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SourcesSettings {
    #[serde(default)]
    membership: VerticalUrls,
    #[serde(default)]
    partner: VerticalUrls,
    #[serde(default)]
    sales: VerticalUrls,
}

impl SourcesSettings {
    fn family(&self, family: MetricFamily) -> &VerticalUrls {
        match family {
            MetricFamily::Membership => &self.membership,
            MetricFamily::Partner => &self.partner,
            MetricFamily::Sales => &self.sales,
        }
    }

    fn family_mut(&mut self, family: MetricFamily) -> &mut VerticalUrls {
        match family {
            MetricFamily::Membership => &mut self.membership,
            MetricFamily::Partner => &mut self.partner,
            MetricFamily::Sales => &mut self.sales,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerticalUrls {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    career: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    design: Option<String>,
}

impl VerticalUrls {
    fn get(&self, vertical: BusinessVertical) -> Option<&str> {
        match vertical {
            BusinessVertical::Career => self.career.as_deref(),
            BusinessVertical::Design => self.design.as_deref(),
        }
    }

    fn set(&mut self, vertical: BusinessVertical, url: Option<String>) {
        match vertical {
            BusinessVertical::Career => self.career = url,
            BusinessVertical::Design => self.design = url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HttpSettings {
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarSettings {
    #[serde(default = "default_events_file")]
    events_file: String,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            events_file: DEFAULT_EVENTS_FILE.to_string(),
        }
    }
}

fn default_events_file() -> String {
    DEFAULT_EVENTS_FILE.to_string()
}

/// Where a source URL came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceOrigin {
    Env,
    LegacyEnv,
    Settings,
}

/// Effective source URL for one (family, vertical) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceEntry {
    pub url: String,
    pub origin: SourceOrigin,
}

/// KPI configuration (effective view of settings + environment)
#[derive(Debug, Clone)]
pub struct Config {
    pub sources: BTreeMap<(MetricFamily, BusinessVertical), SourceEntry>,
    pub http_timeout: Duration,
    /// Absolute path of the calendar events file
    pub events_file: PathBuf,
    // Keep the raw settings for preservation when saving
    raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: BTreeMap::new(),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            events_file: PathBuf::from(DEFAULT_EVENTS_FILE),
            raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the kpi directory, reading overrides from the process environment
    pub fn load(kpi_dir: &Path) -> Result<Self> {
        Self::load_with_env(kpi_dir, |key| std::env::var(key).ok())
    }

    /// Load config with an explicit environment lookup
    ///
    /// A missing or unparsable settings.json falls back to defaults.
    pub fn load_with_env<F>(kpi_dir: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = read_settings(kpi_dir)?;

        let mut sources = BTreeMap::new();
        for family in MetricFamily::ALL {
            for vertical in BusinessVertical::ALL {
                if let Some(entry) = resolve_source(&raw.sources, family, vertical, &env) {
                    debug!(
                        family = family.as_str(),
                        vertical = vertical.as_str(),
                        origin = ?entry.origin,
                        "source configured"
                    );
                    sources.insert((family, vertical), entry);
                }
            }
        }

        let events_file = {
            let path = PathBuf::from(&raw.calendar.events_file);
            if path.is_absolute() {
                path
            } else {
                kpi_dir.join(path)
            }
        };

        Ok(Self {
            sources,
            http_timeout: Duration::from_secs(raw.http.timeout_secs),
            events_file,
            raw_settings: raw,
        })
    }

    /// Source URL for a family and vertical, if any
    pub fn source_url(&self, family: MetricFamily, vertical: BusinessVertical) -> Option<&str> {
        self.sources
            .get(&(family, vertical))
            .map(|entry| entry.url.as_str())
    }

    /// Set (or clear, with `None`) a settings.json source URL
    ///
    /// Environment overrides still win on the next load.
    pub fn set_source(
        &mut self,
        family: MetricFamily,
        vertical: BusinessVertical,
        url: Option<String>,
    ) {
        let url = url.and_then(non_blank);
        self.raw_settings
            .sources
            .family_mut(family)
            .set(vertical, url.clone());

        let env_backed = self
            .sources
            .get(&(family, vertical))
            .is_some_and(|entry| entry.origin != SourceOrigin::Settings);
        if env_backed {
            return;
        }
        match url {
            Some(url) => {
                self.sources.insert(
                    (family, vertical),
                    SourceEntry {
                        url,
                        origin: SourceOrigin::Settings,
                    },
                );
            }
            None => {
                self.sources.remove(&(family, vertical));
            }
        }
    }

    /// Save config to the kpi directory
    /// Preserves other settings that this crate doesn't manage
    pub fn save(&self, kpi_dir: &Path) -> Result<()> {
        let mut settings = read_settings(kpi_dir)?;

        // Update only the fields we manage
        settings.sources = self.raw_settings.sources.clone();
        settings.http = self.raw_settings.http.clone();
        settings.calendar = self.raw_settings.calendar.clone();

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(kpi_dir.join(SETTINGS_FILE), content)?;
        Ok(())
    }
}

fn read_settings(kpi_dir: &Path) -> Result<SettingsFile> {
    let settings_path = kpi_dir.join(SETTINGS_FILE);
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }

    let content = std::fs::read_to_string(&settings_path)?;
    Ok(serde_json::from_str(&content).unwrap_or_else(|e| {
        warn!(path = %settings_path.display(), error = %e, "ignoring unreadable settings file");
        SettingsFile::default()
    }))
}

/// `{PREFIX}_{SUFFIX}` env, then legacy `{PREFIX}` (Career only), then settings
fn resolve_source<F>(
    settings: &SourcesSettings,
    family: MetricFamily,
    vertical: BusinessVertical,
    env: &F,
) -> Option<SourceEntry>
where
    F: Fn(&str) -> Option<String>,
{
    let prefix = family.env_prefix();
    let scoped = format!("{}_{}", prefix, vertical.env_suffix());

    if let Some(url) = env(&scoped).and_then(non_blank) {
        return Some(SourceEntry {
            url,
            origin: SourceOrigin::Env,
        });
    }

    if vertical == BusinessVertical::Career {
        if let Some(url) = env(prefix).and_then(non_blank) {
            return Some(SourceEntry {
                url,
                origin: SourceOrigin::LegacyEnv,
            });
        }
    }

    settings
        .family(family)
        .get(vertical)
        .map(str::to_string)
        .and_then(non_blank)
        .map(|url| SourceEntry {
            url,
            origin: SourceOrigin::Settings,
        })
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
