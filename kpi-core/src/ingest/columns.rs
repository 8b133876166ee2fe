//! Column resolution: header row -> semantic fields per metric kind
//!
//! Every kind has an ordered list of `(field, strategies)`. Strategies are
//! tried in order; an exact header name comes first, keyword predicates after
//! it absorb header drift between spreadsheet editions
//! (`event_sales_target_annual` vs `event_sale_target_annual`).
//! Supporting a new edition means adding a strategy, not new control flow.

use tracing::debug;

use crate::domain::MetricKind;

/// Semantic field of a metric row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Year,
    Month,
    Actual,
    Target,
    CumulativeActual,
    CumulativeTarget,
    AnnualTarget,
    Note,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Year,
        Field::Month,
        Field::Actual,
        Field::Target,
        Field::CumulativeActual,
        Field::CumulativeTarget,
        Field::AnnualTarget,
        Field::Note,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// "starts with X, contains all of Y, contains none of Z"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderPredicate {
    pub starts_with: &'static str,
    pub contains: &'static [&'static str],
    pub excludes: &'static [&'static str],
}

impl HeaderPredicate {
    pub fn matches(&self, header: &str) -> bool {
        header.starts_with(self.starts_with)
            && self.contains.iter().all(|word| header.contains(word))
            && !self.excludes.iter().any(|word| header.contains(word))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    Exact(&'static str),
    Predicate(HeaderPredicate),
}

impl MatchStrategy {
    /// First matching header index, scanning left to right
    pub fn locate(&self, header: &[String]) -> Option<usize> {
        match self {
            MatchStrategy::Exact(name) => header.iter().position(|h| h == name),
            MatchStrategy::Predicate(predicate) => {
                header.iter().position(|h| predicate.matches(h))
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: Field,
    pub strategies: &'static [MatchStrategy],
}

/// Named field list for one metric kind
#[derive(Debug, Clone, Copy)]
pub struct ColumnSchema {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl ColumnSchema {
    pub fn for_kind(kind: MetricKind) -> &'static ColumnSchema {
        match kind {
            MetricKind::Membership => &MEMBERSHIP_SCHEMA,
            MetricKind::Partner => &PARTNER_SCHEMA,
            MetricKind::EventSales => &EVENT_SALES_SCHEMA,
            MetricKind::TotalSales => &TOTAL_SALES_SCHEMA,
        }
    }

    /// Resolve every field of this schema against a header row
    pub fn resolve(&self, header: &[String]) -> ResolvedColumns {
        let mut resolved = ResolvedColumns::default();
        for spec in self.fields {
            let index = spec
                .strategies
                .iter()
                .find_map(|strategy| strategy.locate(header));
            if index.is_none() {
                debug!(schema = self.name, field = ?spec.field, "column not found");
            }
            resolved.slots[spec.field.index()] = index;
        }
        resolved
    }
}

/// Field -> column index; absent fields stay `None` for every row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolvedColumns {
    slots: [Option<usize>; 8],
}

impl ResolvedColumns {
    pub fn get(&self, field: Field) -> Option<usize> {
        self.slots[field.index()]
    }

    pub fn has_period(&self) -> bool {
        self.get(Field::Year).is_some() && self.get(Field::Month).is_some()
    }
}

const YEAR: FieldSpec = FieldSpec {
    field: Field::Year,
    strategies: &[MatchStrategy::Exact("year")],
};

const MONTH: FieldSpec = FieldSpec {
    field: Field::Month,
    strategies: &[MatchStrategy::Exact("month")],
};

const NOTE: FieldSpec = FieldSpec {
    field: Field::Note,
    strategies: &[MatchStrategy::Exact("note")],
};

pub static MEMBERSHIP_SCHEMA: ColumnSchema = ColumnSchema {
    name: "membership",
    fields: &[
        YEAR,
        MONTH,
        FieldSpec {
            field: Field::Actual,
            strategies: &[MatchStrategy::Exact("membership_actual")],
        },
        FieldSpec {
            field: Field::Target,
            strategies: &[MatchStrategy::Exact("membership_target")],
        },
        FieldSpec {
            field: Field::CumulativeActual,
            strategies: &[MatchStrategy::Exact("membership_cumulative_actual")],
        },
        FieldSpec {
            field: Field::CumulativeTarget,
            strategies: &[MatchStrategy::Exact("membership_cumulative_target")],
        },
        FieldSpec {
            field: Field::AnnualTarget,
            strategies: &[MatchStrategy::Exact("membership_target_annual")],
        },
        NOTE,
    ],
};

pub static PARTNER_SCHEMA: ColumnSchema = ColumnSchema {
    name: "partner",
    fields: &[
        YEAR,
        MONTH,
        FieldSpec {
            field: Field::Actual,
            strategies: &[MatchStrategy::Exact("partner_actual")],
        },
        FieldSpec {
            field: Field::Target,
            strategies: &[MatchStrategy::Exact("partner_target")],
        },
        FieldSpec {
            field: Field::CumulativeActual,
            strategies: &[MatchStrategy::Exact("partner_cumulative_actual")],
        },
        FieldSpec {
            field: Field::CumulativeTarget,
            strategies: &[MatchStrategy::Exact("partner_cumulative_target")],
        },
        FieldSpec {
            field: Field::AnnualTarget,
            strategies: &[MatchStrategy::Exact("partner_target_annual")],
        },
        NOTE,
    ],
};

pub static EVENT_SALES_SCHEMA: ColumnSchema = ColumnSchema {
    name: "event_sales",
    fields: &[
        YEAR,
        MONTH,
        FieldSpec {
            field: Field::Actual,
            strategies: &[
                MatchStrategy::Exact("event_sales_actual"),
                MatchStrategy::Predicate(HeaderPredicate {
                    starts_with: "event_sale",
                    contains: &[],
                    excludes: &["target"],
                }),
            ],
        },
        FieldSpec {
            field: Field::Target,
            strategies: &[
                MatchStrategy::Exact("event_sales_target"),
                MatchStrategy::Predicate(HeaderPredicate {
                    starts_with: "event_sale",
                    contains: &["target"],
                    excludes: &["annual"],
                }),
            ],
        },
        FieldSpec {
            field: Field::AnnualTarget,
            strategies: &[
                MatchStrategy::Exact("event_sales_target_annual"),
                MatchStrategy::Predicate(HeaderPredicate {
                    starts_with: "event_sale",
                    contains: &["target", "annual"],
                    excludes: &[],
                }),
            ],
        },
        NOTE,
    ],
};

pub static TOTAL_SALES_SCHEMA: ColumnSchema = ColumnSchema {
    name: "total_sales",
    fields: &[
        YEAR,
        MONTH,
        FieldSpec {
            field: Field::Actual,
            strategies: &[
                MatchStrategy::Exact("total_sales_actual"),
                MatchStrategy::Predicate(HeaderPredicate {
                    starts_with: "total_sale",
                    contains: &[],
                    excludes: &["target"],
                }),
            ],
        },
        FieldSpec {
            field: Field::Target,
            strategies: &[
                MatchStrategy::Exact("total_sales_target"),
                MatchStrategy::Predicate(HeaderPredicate {
                    starts_with: "total_sale",
                    contains: &["target"],
                    excludes: &["annual"],
                }),
            ],
        },
        FieldSpec {
            field: Field::AnnualTarget,
            strategies: &[
                MatchStrategy::Exact("total_sales_target_annual"),
                MatchStrategy::Predicate(HeaderPredicate {
                    starts_with: "total_sale",
                    contains: &["target", "annual"],
                    excludes: &[],
                }),
            ],
        },
        NOTE,
    ],
};
