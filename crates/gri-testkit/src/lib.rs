// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use gri_app::{EnergyQuestionnaire, QuestionnaireSeed, SourceCategory, SourceSeed};
use std::path::PathBuf;

const ACTIVITY_NAMES: [&str; 12] = [
    "Manufacturing",
    "Offices",
    "Logistics",
    "Warehousing",
    "Data center",
    "Retail stores",
    "Assembly line",
    "Paint shop",
    "Cold storage",
    "Laboratory",
    "Fleet",
    "Canteen",
];

const RENEWABLE_SOURCES: [&str; 6] = [
    "Solar PV",
    "Onshore wind",
    "Biomass",
    "Hydropower",
    "Geothermal",
    "Biogas",
];

const NON_RENEWABLE_SOURCES: [&str; 6] = [
    "Natural gas",
    "Grid electricity",
    "Diesel",
    "Fuel oil",
    "LPG",
    "Coal",
];

const PERCENTAGES: [&str; 6] = ["10", "25", "40", "55", "80", "100"];

/// One step of a generated collection session. Slots index into every
/// identity the session has handed out so far, so removed records can be
/// targeted again to exercise stale-identity handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Add,
    Update {
        slot: usize,
        field: usize,
        value: String,
    },
    Remove {
        slot: usize,
    },
}

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

#[derive(Debug, Clone)]
pub struct QuestionnaireFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl QuestionnaireFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub const fn seed(&self) -> u64 {
        self.seed
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn activity_name(&mut self) -> String {
        pick(&mut self.rng, &ACTIVITY_NAMES).to_owned()
    }

    pub fn source(&mut self) -> SourceSeed {
        let renewable = self.rng.bool();
        let (names, category) = if renewable {
            (&RENEWABLE_SOURCES, SourceCategory::Renewable)
        } else {
            (&NON_RENEWABLE_SOURCES, SourceCategory::NonRenewable)
        };
        SourceSeed {
            name: pick(&mut self.rng, names).to_owned(),
            category: Some(category),
        }
    }

    pub fn percentage(&mut self) -> String {
        pick(&mut self.rng, &PERCENTAGES).to_owned()
    }

    pub fn questionnaire_seed(&mut self, activities: usize, sources: usize) -> QuestionnaireSeed {
        QuestionnaireSeed {
            activities: (0..activities).map(|_| self.activity_name()).collect(),
            sources: (0..sources).map(|_| self.source()).collect(),
        }
    }

    /// A session of `count` steps over a record type with `field_count`
    /// fields. Roughly half the steps add, so collections keep growing.
    pub fn store_ops(&mut self, count: usize, field_count: usize) -> Vec<StoreOp> {
        let mut handed_out = 0usize;
        let mut ops = Vec::with_capacity(count);
        for _ in 0..count {
            let roll = self.rng.int_n(10);
            let op = if handed_out == 0 || roll < 4 {
                handed_out += 1;
                StoreOp::Add
            } else if roll < 8 {
                StoreOp::Update {
                    slot: self.rng.int_n(handed_out),
                    field: self.rng.int_n(field_count),
                    value: format!("v{}", self.rng.int_n(1_000)),
                }
            } else {
                StoreOp::Remove {
                    slot: self.rng.int_n(handed_out),
                }
            };
            ops.push(op);
        }
        ops
    }
}

fn pick<'a>(rng: &mut DeterministicRng, items: &[&'a str]) -> &'a str {
    items[rng.int_n(items.len())]
}

/// The page as it looks on first mount: default seed rows, every gate unset.
pub fn seeded_questionnaire() -> EnergyQuestionnaire {
    EnergyQuestionnaire::seeded(&QuestionnaireSeed::default())
}

pub fn temp_config_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join("config.toml");
    Ok((dir, path))
}

pub fn activity_names() -> &'static [&'static str] {
    &ACTIVITY_NAMES
}

#[cfg(test)]
mod tests {
    use super::{QuestionnaireFaker, StoreOp, activity_names, seeded_questionnaire};

    #[test]
    fn same_seed_same_session() {
        let mut left = QuestionnaireFaker::new(42);
        let mut right = QuestionnaireFaker::new(42);

        assert_eq!(left.store_ops(50, 4), right.store_ops(50, 4));
        assert_eq!(left.source(), right.source());
    }

    #[test]
    fn sessions_start_with_an_add() {
        for seed in 0..20 {
            let ops = QuestionnaireFaker::new(seed).store_ops(10, 3);
            assert_eq!(ops[0], StoreOp::Add, "seed {seed}");
        }
    }

    #[test]
    fn slots_only_reference_handed_out_identities() {
        let ops = QuestionnaireFaker::new(7).store_ops(200, 5);
        let mut handed_out = 0;
        for op in ops {
            match op {
                StoreOp::Add => handed_out += 1,
                StoreOp::Update { slot, field, .. } => {
                    assert!(slot < handed_out);
                    assert!(field < 5);
                }
                StoreOp::Remove { slot } => assert!(slot < handed_out),
            }
        }
    }

    #[test]
    fn faker_names_come_from_vocabulary() {
        let mut faker = QuestionnaireFaker::new(3);
        let name = faker.activity_name();
        assert!(activity_names().contains(&name.as_str()));
        assert!(faker.source().category.is_some());
        assert_eq!(faker.seed(), 3);
    }

    #[test]
    fn seeded_questionnaire_matches_first_mount() {
        let questionnaire = seeded_questionnaire();
        assert_eq!(questionnaire.activities().len(), 3);
        assert_eq!(questionnaire.sources().len(), 3);
        assert!(!questionnaire.is_complete());
    }
}
