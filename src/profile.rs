use std::collections::HashSet;

use itertools::Itertools;
use log::warn;

use crate::{config::NormalizeMethod, math::arithmetic_mean};

/// An ordered gene expression profile with unique identifiers
///
/// Identifiers and values are stored as parallel columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Profile {
    identifiers: Vec<String>,
    values: Vec<f64>,
}

impl Profile {
    /// Builds a profile from raw (identifier, value) rows
    ///
    /// Repeated identifiers are collapsed into a single row holding the
    /// arithmetic mean of their values. The result is ordered by identifier,
    /// so the row order of the input does not matter.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let (identifiers, values): (Vec<String>, Vec<f64>) = pairs
            .into_iter()
            .map(|(id, value)| (id.into(), value))
            .into_group_map()
            .into_iter()
            .sorted_unstable_by(|a, b| a.0.cmp(&b.0))
            .map(|(id, group)| (id, arithmetic_mean(&group)))
            .unzip();
        Self {
            identifiers,
            values,
        }
    }

    /// Builds a profile from columns already known to hold unique identifiers
    pub(crate) fn from_columns(identifiers: Vec<String>, values: Vec<f64>) -> Self {
        debug_assert_eq!(identifiers.len(), values.len());
        debug_assert!(identifiers.iter().all_unique());
        Self {
            identifiers,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.identifiers
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    pub fn get(&self, identifier: &str) -> Option<f64> {
        self.identifiers
            .iter()
            .position(|id| id == identifier)
            .map(|idx| self.values[idx])
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.identifiers.iter().any(|id| id == identifier)
    }

    pub(crate) fn identifier_set(&self) -> HashSet<&str> {
        self.identifiers.iter().map(String::as_str).collect()
    }

    /// Returns a copy ordered by identifier
    pub fn sorted(&self) -> Self {
        let (identifiers, values): (Vec<String>, Vec<f64>) = self
            .iter()
            .sorted_unstable_by(|a, b| a.0.cmp(b.0))
            .map(|(id, value)| (id.to_string(), value))
            .unzip();
        Self {
            identifiers,
            values,
        }
    }

    /// Returns a copy with the value column rescaled; identifiers and order are kept
    pub fn normalized(&self, method: NormalizeMethod) -> Self {
        let values = method.transform(&self.values);
        let undefined = values.iter().filter(|v| !v.is_finite()).count();
        if undefined > 0 {
            warn!(
                "{:?} normalization produced {} undefined values out of {}",
                method,
                undefined,
                values.len()
            );
        }
        Self {
            identifiers: self.identifiers.clone(),
            values,
        }
    }

    pub(crate) fn into_pairs(self) -> impl Iterator<Item = (String, f64)> {
        self.identifiers.into_iter().zip(self.values)
    }
}

/// Rescales the value column of a profile with the given method
pub fn normalize(profile: &Profile, method: NormalizeMethod) -> Profile {
    profile.normalized(method)
}
