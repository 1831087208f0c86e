//! Metadata filters for search requests
//!
//! Filters are evaluated by the server against the string metadata stored
//! with each vector. Comparison values are sent as strings; the server
//! compares numerically when the value parses as a number.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::proto;

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "eq",
            CompareOp::Ne => "ne",
            CompareOp::Gt => "gt",
            CompareOp::Gte => "gte",
            CompareOp::Lt => "lt",
            CompareOp::Lte => "lte",
        }
    }
}

/// Bounds of a range filter; at least one must be set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeBounds {
    pub gt: Option<String>,
    pub gte: Option<String>,
    pub lt: Option<String>,
    pub lte: Option<String>,
}

/// Predicate over vector metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    Compare {
        field: String,
        op: CompareOp,
        value: String,
    },
    Range {
        field: String,
        bounds: RangeBounds,
    },
    In {
        field: String,
        values: Vec<String>,
    },
    NotIn {
        field: String,
        values: Vec<String>,
    },
    GeoRadius {
        field: String,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    },
    Exists {
        field: String,
    },
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl ToString) -> Self {
        Self::compare(field, CompareOp::Eq, value)
    }

    pub fn ne(field: impl Into<String>, value: impl ToString) -> Self {
        Self::compare(field, CompareOp::Ne, value)
    }

    pub fn gt(field: impl Into<String>, value: impl ToString) -> Self {
        Self::compare(field, CompareOp::Gt, value)
    }

    pub fn gte(field: impl Into<String>, value: impl ToString) -> Self {
        Self::compare(field, CompareOp::Gte, value)
    }

    pub fn lt(field: impl Into<String>, value: impl ToString) -> Self {
        Self::compare(field, CompareOp::Lt, value)
    }

    pub fn lte(field: impl Into<String>, value: impl ToString) -> Self {
        Self::compare(field, CompareOp::Lte, value)
    }

    pub fn compare(field: impl Into<String>, op: CompareOp, value: impl ToString) -> Self {
        Filter::Compare {
            field: field.into(),
            op,
            value: value.to_string(),
        }
    }

    /// Inclusive range `[min, max]`
    pub fn between(field: impl Into<String>, min: impl ToString, max: impl ToString) -> Self {
        Filter::Range {
            field: field.into(),
            bounds: RangeBounds {
                gte: Some(min.to_string()),
                lte: Some(max.to_string()),
                ..RangeBounds::default()
            },
        }
    }

    pub fn is_in<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Filter::In {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn not_in<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Filter::NotIn {
            field: field.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn within_km(field: impl Into<String>, latitude: f64, longitude: f64, radius_km: f64) -> Self {
        Filter::GeoRadius {
            field: field.into(),
            latitude,
            longitude,
            radius_km,
        }
    }

    pub fn exists(field: impl Into<String>) -> Self {
        Filter::Exists {
            field: field.into(),
        }
    }

    pub fn and(filters: Vec<Filter>) -> Self {
        Filter::And(filters)
    }

    pub fn or(filters: Vec<Filter>) -> Self {
        Filter::Or(filters)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(filter: Filter) -> Self {
        Filter::Not(Box::new(filter))
    }

    /// Convert to the wire predicate, rejecting shapes the server refuses
    pub(crate) fn to_wire(&self) -> Result<proto::Filter> {
        use proto::filter::FilterType;

        let filter_type = match self {
            Filter::Compare { field, op, value } => FilterType::Comparison(proto::ComparisonFilter {
                field: non_empty_field(field)?,
                operator: op.as_str().to_string(),
                value: value.clone(),
            }),
            Filter::Range { field, bounds } => {
                if bounds == &RangeBounds::default() {
                    return Err(Error::validation(format!(
                        "range filter on '{}' has no bounds",
                        field
                    )));
                }
                FilterType::Range(proto::RangeFilter {
                    field: non_empty_field(field)?,
                    gt: bounds.gt.clone(),
                    gte: bounds.gte.clone(),
                    lt: bounds.lt.clone(),
                    lte: bounds.lte.clone(),
                })
            }
            Filter::In { field, values } => FilterType::List(proto::ListFilter {
                field: non_empty_field(field)?,
                operator: "in".to_string(),
                values: values.clone(),
            }),
            Filter::NotIn { field, values } => FilterType::List(proto::ListFilter {
                field: non_empty_field(field)?,
                operator: "not_in".to_string(),
                values: values.clone(),
            }),
            Filter::GeoRadius {
                field,
                latitude,
                longitude,
                radius_km,
            } => FilterType::GeoRadius(proto::GeoRadiusFilter {
                field: non_empty_field(field)?,
                latitude: *latitude,
                longitude: *longitude,
                radius_km: *radius_km,
            }),
            Filter::Exists { field } => FilterType::Exists(proto::ExistsFilter {
                field: non_empty_field(field)?,
            }),
            Filter::And(filters) => composite("and", filters)?,
            Filter::Or(filters) => composite("or", filters)?,
            Filter::Not(inner) => FilterType::Composite(proto::CompositeFilter {
                operator: "not".to_string(),
                filters: vec![inner.to_wire()?],
            }),
        };

        Ok(proto::Filter {
            filter_type: Some(filter_type),
        })
    }
}

fn non_empty_field(field: &str) -> Result<String> {
    if field.is_empty() {
        return Err(Error::validation("filter field name is empty"));
    }
    Ok(field.to_string())
}

fn composite(operator: &str, filters: &[Filter]) -> Result<proto::filter::FilterType> {
    if filters.is_empty() {
        return Err(Error::validation(format!(
            "'{}' filter needs at least one sub-filter",
            operator
        )));
    }
    let filters = filters
        .iter()
        .map(Filter::to_wire)
        .collect::<Result<Vec<_>>>()?;
    Ok(proto::filter::FilterType::Composite(proto::CompositeFilter {
        operator: operator.to_string(),
        filters,
    }))
}
