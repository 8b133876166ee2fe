//! KPI metric domain model

use std::fmt;

use serde::{Deserialize, Serialize};

/// One spreadsheet document: the unit that gets fetched and tokenized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricFamily {
    Membership,
    Partner,
    Sales,
}

impl MetricFamily {
    pub const ALL: [MetricFamily; 3] = [
        MetricFamily::Membership,
        MetricFamily::Partner,
        MetricFamily::Sales,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricFamily::Membership => "membership",
            MetricFamily::Partner => "partner",
            MetricFamily::Sales => "sales",
        }
    }

    /// Series carried by a document of this family
    pub fn kinds(&self) -> &'static [MetricKind] {
        match self {
            MetricFamily::Membership => &[MetricKind::Membership],
            MetricFamily::Partner => &[MetricKind::Partner],
            MetricFamily::Sales => &[MetricKind::EventSales, MetricKind::TotalSales],
        }
    }

    /// Prefix of the environment variables holding source URLs
    /// (e.g. `MEMBERSHIP_KPI_CSV_URL`)
    pub fn env_prefix(&self) -> &'static str {
        match self {
            MetricFamily::Membership => "MEMBERSHIP_KPI_CSV_URL",
            MetricFamily::Partner => "PARTNER_KPI_CSV_URL",
            MetricFamily::Sales => "SALES_KPI_CSV_URL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "membership" => Some(MetricFamily::Membership),
            "partner" => Some(MetricFamily::Partner),
            "sales" => Some(MetricFamily::Sales),
            _ => None,
        }
    }
}

impl fmt::Display for MetricFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single time series derived from a family document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKind {
    Membership,
    Partner,
    EventSales,
    TotalSales,
}

impl MetricKind {
    pub fn family(&self) -> MetricFamily {
        match self {
            MetricKind::Membership => MetricFamily::Membership,
            MetricKind::Partner => MetricFamily::Partner,
            MetricKind::EventSales | MetricKind::TotalSales => MetricFamily::Sales,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::Membership => "Membership",
            MetricKind::Partner => "Partners",
            MetricKind::EventSales => "Event sales",
            MetricKind::TotalSales => "Total sales",
        }
    }
}

/// Organizational axis selecting which spreadsheet feeds a family
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusinessVertical {
    #[default]
    Career,
    Design,
}

impl BusinessVertical {
    pub const ALL: [BusinessVertical; 2] = [BusinessVertical::Career, BusinessVertical::Design];

    /// Query-string semantics: only `design` selects Design, anything else is Career
    pub fn from_query(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("design") => BusinessVertical::Design,
            _ => BusinessVertical::Career,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessVertical::Career => "career",
            BusinessVertical::Design => "design",
        }
    }

    pub fn env_suffix(&self) -> &'static str {
        match self {
            BusinessVertical::Career => "CAREER",
            BusinessVertical::Design => "DESIGN",
        }
    }
}

impl fmt::Display for BusinessVertical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One canonical row of one metric kind
///
/// `year` and `month` are always valid; every other field may be absent.
/// `None` (missing) and `Some(0.0)` (observed zero) are kept distinct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRow {
    pub year: i32,
    /// 1..=12
    pub month: u32,
    pub actual: Option<f64>,
    pub target: Option<f64>,
    pub cumulative_actual: Option<f64>,
    pub cumulative_target: Option<f64>,
    pub annual_target: Option<f64>,
    pub note: Option<String>,
}

impl MetricRow {
    /// Create a row with only the period set
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            actual: None,
            target: None,
            cumulative_actual: None,
            cumulative_target: None,
            annual_target: None,
            note: None,
        }
    }

    pub fn with_actual(mut self, actual: f64) -> Self {
        self.actual = Some(actual);
        self
    }

    pub fn with_target(mut self, target: f64) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_cumulative_actual(mut self, value: f64) -> Self {
        self.cumulative_actual = Some(value);
        self
    }

    pub fn with_annual_target(mut self, value: f64) -> Self {
        self.annual_target = Some(value);
        self
    }

    /// Chart label in `'YY/MM` form
    pub fn label(&self) -> String {
        format!("'{:02}/{:02}", self.year.rem_euclid(100), self.month)
    }

    /// Whether the row carries a real observation (cumulative or plain, non-zero)
    pub fn has_observation(&self) -> bool {
        nonzero(self.cumulative_actual).is_some() || nonzero(self.actual).is_some()
    }
}

/// `Some(v)` only for present, non-zero values
pub fn nonzero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}
