// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Derived grids whose rows and columns come from growable collections or
//! fixed enumerations.
//!
//! A [`MatrixView`] is never stored. Callers rebuild it from the live axis
//! sources on every read, so header counts always match the current
//! collection lengths. Cell values live next to the view in a
//! [`MatrixCells`] map keyed by `(row key, column key)`.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::collection::{EntityCollectionStore, Record};

/// A record that can head a matrix row or column.
pub trait Labeled: Record {
    /// Placeholder noun used when the name is blank, e.g. `Source 2`.
    const NOUN: &'static str;

    fn name(&self) -> &str;

    fn category(&self) -> Option<&str> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisHeader<K> {
    pub key: K,
    pub position: usize,
    pub label: String,
    pub category: Option<String>,
}

/// Anything that yields ordered axis headers.
pub trait AxisSource {
    type Key: Copy + Eq + Hash;

    fn headers(&self) -> Vec<AxisHeader<Self::Key>>;
}

impl<T: Labeled> AxisSource for EntityCollectionStore<T> {
    type Key = T::Id;

    fn headers(&self) -> Vec<AxisHeader<T::Id>> {
        self.iter()
            .enumerate()
            .map(|(position, record)| AxisHeader {
                key: record.id(),
                position,
                label: display_label(record.name(), T::NOUN, position),
                category: record
                    .category()
                    .filter(|category| !category.trim().is_empty())
                    .map(str::to_owned),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedEntry {
    pub label: &'static str,
    pub category: Option<&'static str>,
}

/// A design-time axis, e.g. the upstream/downstream value-chain categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAxis {
    pub entries: &'static [FixedEntry],
}

impl AxisSource for FixedAxis {
    type Key = &'static str;

    fn headers(&self) -> Vec<AxisHeader<&'static str>> {
        self.entries
            .iter()
            .enumerate()
            .map(|(position, entry)| AxisHeader {
                key: entry.label,
                position,
                label: entry.label.to_owned(),
                category: entry.category.map(str::to_owned),
            })
            .collect()
    }
}

pub fn display_label(name: &str, noun: &str, position: usize) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        format!("{noun} {}", position + 1)
    } else {
        trimmed.to_owned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellCoord<R, C> {
    pub row: R,
    pub column: C,
    pub row_position: usize,
    pub column_position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixView<R, C> {
    rows: Vec<AxisHeader<R>>,
    columns: Vec<AxisHeader<C>>,
}

pub struct MatrixViewBuilder;

impl MatrixViewBuilder {
    pub fn build<A: AxisSource, B: AxisSource>(rows: &A, columns: &B) -> MatrixView<A::Key, B::Key> {
        MatrixView {
            rows: rows.headers(),
            columns: columns.headers(),
        }
    }
}

impl<R: Copy + Eq + Hash, C: Copy + Eq + Hash> MatrixView<R, C> {
    pub fn rows(&self) -> &[AxisHeader<R>] {
        &self.rows
    }

    pub fn columns(&self) -> &[AxisHeader<C>] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_labels(&self) -> Vec<&str> {
        self.rows.iter().map(|header| header.label.as_str()).collect()
    }

    pub fn column_labels(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(|header| header.label.as_str())
            .collect()
    }

    /// Row-major, `row_count() * column_count()` coordinates.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord<R, C>> + '_ {
        self.rows.iter().flat_map(move |row| {
            self.columns.iter().map(move |column| CellCoord {
                row: row.key,
                column: column.key,
                row_position: row.position,
                column_position: column.position,
            })
        })
    }

    pub fn contains(&self, row: R, column: C) -> bool {
        self.rows.iter().any(|header| header.key == row)
            && self.columns.iter().any(|header| header.key == column)
    }

    /// Cell values in display order; blank where nothing was entered.
    pub fn value_grid<'a>(&self, cells: &'a MatrixCells<R, C>) -> Vec<Vec<&'a str>> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|column| cells.get(row.key, column.key).unwrap_or(""))
                    .collect()
            })
            .collect()
    }
}

/// Free-text values per `(row, column)` coordinate.
#[derive(Debug, Clone)]
pub struct MatrixCells<R, C> {
    values: HashMap<(R, C), String>,
}

impl<R, C> Default for MatrixCells<R, C> {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
        }
    }
}

impl<R: Copy + Eq + Hash, C: Copy + Eq + Hash> MatrixCells<R, C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A blank value clears the cell. Returns whether the stored value changed.
    pub fn set(&mut self, row: R, column: C, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.is_empty() {
            return self.values.remove(&(row, column)).is_some();
        }
        match self.values.get(&(row, column)) {
            Some(current) if *current == value => false,
            _ => {
                self.values.insert((row, column), value);
                true
            }
        }
    }

    pub fn get(&self, row: R, column: C) -> Option<&str> {
        self.values.get(&(row, column)).map(String::as_str)
    }

    /// Drops values whose row or column is no longer part of `view`.
    /// Returns how many values were dropped.
    pub fn prune_to(&mut self, view: &MatrixView<R, C>) -> usize {
        let rows = view
            .rows()
            .iter()
            .map(|header| header.key)
            .collect::<HashSet<_>>();
        let columns = view
            .columns()
            .iter()
            .map(|header| header.key)
            .collect::<HashSet<_>>();
        let before = self.values.len();
        self.values
            .retain(|(row, column), _| rows.contains(row) && columns.contains(column));
        before - self.values.len()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
