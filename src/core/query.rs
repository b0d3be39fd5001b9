//! Query parameters, filter resolution and sorting
//!
//! A [`SockQuery`] carries the seven optional parameters of a listing
//! request. [`SockQuery::resolve`] turns them into exactly one
//! [`FilterPlan`], and [`SortSpec`] reorders whatever the plan returned.

use serde::{Deserialize, Deserializer};
use std::cmp::Ordering;

use crate::core::error::{InventoryError, InventoryResult, MISSING_FILTER_MESSAGE};
use crate::core::sock::Sock;

/// Query parameters for listing socks
///
/// Extracted from URL query strings; every field is optional.
///
/// # Example
/// ```text
/// GET /api/socks?color=red&operation=greaterThan&cottonPercentage=50
/// GET /api/socks?cottonPercentageFrom=30&cottonPercentageTo=80&sortBy=color&sortDirection=desc
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SockQuery {
    pub color: Option<String>,
    /// `greaterThan`, `lessThan` or `equalTo`, case-insensitive
    pub operation: Option<String>,
    #[serde(deserialize_with = "blank_as_none")]
    pub cotton_percentage: Option<i32>,
    #[serde(deserialize_with = "blank_as_none")]
    pub cotton_percentage_from: Option<i32>,
    #[serde(deserialize_with = "blank_as_none")]
    pub cotton_percentage_to: Option<i32>,
    /// `color` or `cottonPercentage`, case-insensitive
    pub sort_by: Option<String>,
    /// `desc` reverses, anything else is ascending
    pub sort_direction: Option<String>,
}

/// `?cottonPercentage=` counts as absent; anything else must parse
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i32),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(value)) => Ok(Some(value)),
        Some(Raw::Text(text)) => match text.trim() {
            "" => Ok(None),
            value => value.parse().map(Some).map_err(|e| {
                serde::de::Error::custom(format!("invalid integer '{}': {}", value, e))
            }),
        },
    }
}

impl SockQuery {
    /// True when none of the five filter fields was supplied
    ///
    /// Sort parameters do not count: a query carrying only `sortBy` is an
    /// unfiltered listing that gets sorted.
    pub fn is_unfiltered(&self) -> bool {
        self.color.is_none()
            && self.operation.is_none()
            && self.cotton_percentage.is_none()
            && self.cotton_percentage_from.is_none()
            && self.cotton_percentage_to.is_none()
    }

    /// Resolve the filter fields into one plan
    ///
    /// Branches are tried in a fixed order and the first match wins:
    /// 1. `color` without `operation` → exact color
    /// 2. `color` with `operation` → comparison scoped to the color
    /// 3. `cottonPercentage` → comparison over every color
    /// 4. both range bounds → inclusive range
    ///
    /// Anything else is an [`InventoryError::InvalidFilter`], including a
    /// query with no filter at all. Callers that want the full listing for an
    /// empty query check [`is_unfiltered`](Self::is_unfiltered) first.
    pub fn resolve(&self) -> InventoryResult<FilterPlan> {
        if let Some(color) = non_empty(&self.color) {
            return match non_empty(&self.operation) {
                None => Ok(FilterPlan::Color(color.to_string())),
                Some(operation) => Ok(FilterPlan::Compare {
                    color: Some(color.to_string()),
                    comparison: Comparison::parse(operation)?,
                    value: self.comparison_value()?,
                }),
            };
        }

        if let Some(value) = self.cotton_percentage {
            let operation = non_empty(&self.operation).ok_or_else(InventoryError::invalid_operation)?;
            return Ok(FilterPlan::Compare {
                color: None,
                comparison: Comparison::parse(operation)?,
                value,
            });
        }

        if let (Some(from), Some(to)) = (self.cotton_percentage_from, self.cotton_percentage_to) {
            return Ok(FilterPlan::Between { from, to });
        }

        Err(InventoryError::invalid_filter(MISSING_FILTER_MESSAGE))
    }

    /// The sort requested alongside the filter, if it names a known field
    pub fn sort(&self) -> Option<SortSpec> {
        SortSpec::parse(self.sort_by.as_deref(), self.sort_direction.as_deref())
    }

    fn comparison_value(&self) -> InventoryResult<i32> {
        self.cotton_percentage.ok_or_else(|| {
            InventoryError::invalid_filter("cottonPercentage is required when operation is given")
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Cotton percentage comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    GreaterThan,
    LessThan,
    EqualTo,
}

impl Comparison {
    /// Parse an operation name, ignoring case
    pub fn parse(operation: &str) -> InventoryResult<Self> {
        if operation.eq_ignore_ascii_case("greaterThan") {
            Ok(Comparison::GreaterThan)
        } else if operation.eq_ignore_ascii_case("lessThan") {
            Ok(Comparison::LessThan)
        } else if operation.eq_ignore_ascii_case("equalTo") {
            Ok(Comparison::EqualTo)
        } else {
            Err(InventoryError::invalid_operation())
        }
    }

    pub fn matches(self, cotton_percentage: i32, value: i32) -> bool {
        match self {
            Comparison::GreaterThan => cotton_percentage > value,
            Comparison::LessThan => cotton_percentage < value,
            Comparison::EqualTo => cotton_percentage == value,
        }
    }
}

/// The single store lookup a filtered query maps to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterPlan {
    /// Exact color match
    Color(String),
    /// Cotton percentage comparison, optionally scoped to one color
    Compare {
        color: Option<String>,
        comparison: Comparison,
        value: i32,
    },
    /// Inclusive cotton percentage range
    Between { from: i32, to: i32 },
}

impl FilterPlan {
    /// Evaluate the plan against one record
    ///
    /// Stores that filter in memory use this; SQL stores translate the plan
    /// into a `WHERE` clause instead.
    pub fn matches(&self, sock: &Sock) -> bool {
        match self {
            FilterPlan::Color(color) => &sock.color == color,
            FilterPlan::Compare {
                color,
                comparison,
                value,
            } => {
                color.as_ref().is_none_or(|c| &sock.color == c)
                    && comparison.matches(sock.cotton_percentage, *value)
            }
            FilterPlan::Between { from, to } => {
                *from <= sock.cotton_percentage && sock.cotton_percentage <= *to
            }
        }
    }
}

/// Field a result set can be sorted on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Color,
    CottonPercentage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Secondary ordering applied after filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Parse `sortBy` / `sortDirection`
    ///
    /// Returns `None` for a missing or unknown `sortBy`; that is never an error.
    pub fn parse(sort_by: Option<&str>, sort_direction: Option<&str>) -> Option<Self> {
        let sort_by = sort_by?;
        let field = if sort_by.eq_ignore_ascii_case("color") {
            SortField::Color
        } else if sort_by.eq_ignore_ascii_case("cottonPercentage") {
            SortField::CottonPercentage
        } else {
            return None;
        };

        let direction = match sort_direction {
            Some(d) if d.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        };

        Some(Self { field, direction })
    }

    /// Stable sort; equal elements keep their relative order in both directions
    pub fn apply(&self, socks: &mut [Sock]) {
        let compare = |a: &Sock, b: &Sock| -> Ordering {
            match self.field {
                SortField::Color => a.color.cmp(&b.color),
                SortField::CottonPercentage => a.cotton_percentage.cmp(&b.cotton_percentage),
            }
        };

        match self.direction {
            SortDirection::Asc => socks.sort_by(compare),
            SortDirection::Desc => socks.sort_by(|a, b| compare(b, a)),
        }
    }
}
