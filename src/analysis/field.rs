//! Explicit "Missing Data" sentinel for nullable scalar fields

use serde::{Serialize, Serializer};
use std::fmt;

/// Display/serialized form of a missing value
pub const MISSING_DATA: &str = "Missing Data";

/// A scalar that is either a real value or explicitly missing
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    Value(T),
    Missing,
}

impl<T> Field<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Value(v) => Some(v),
            Field::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Field::Missing)
    }
}

impl<T: Clone> Field<T> {
    pub fn cloned_from(value: &Option<T>) -> Self {
        value.clone().into()
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Field::Value(v),
            None => Field::Missing,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Value(v) => v.fmt(f),
            Field::Missing => f.write_str(MISSING_DATA),
        }
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Value(v) => v.serialize(serializer),
            Field::Missing => serializer.serialize_str(MISSING_DATA),
        }
    }
}
