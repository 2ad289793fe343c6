// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::HashSet;

/// Multi-select membership over a fixed option vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSetStore {
    options: &'static [&'static str],
    selected: Vec<String>,
    index: HashSet<String>,
}

impl SelectionSetStore {
    /// An empty vocabulary accepts any option.
    pub fn new(options: &'static [&'static str]) -> Self {
        Self {
            options,
            selected: Vec::new(),
            index: HashSet::new(),
        }
    }

    /// Returns whether membership changed.
    pub fn toggle(&mut self, option: &str, checked: bool) -> bool {
        if !self.accepts(option) {
            return false;
        }
        match (checked, self.index.contains(option)) {
            (true, false) => {
                self.index.insert(option.to_owned());
                self.selected.push(option.to_owned());
                true
            }
            (false, true) => {
                self.index.remove(option);
                self.selected.retain(|member| member != option);
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, option: &str) -> bool {
        self.index.contains(option)
    }

    pub fn accepts(&self, option: &str) -> bool {
        self.options.is_empty() || self.options.contains(&option)
    }

    pub fn options(&self) -> &'static [&'static str] {
        self.options
    }

    /// Members in the order they were checked.
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
