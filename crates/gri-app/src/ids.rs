// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use time::OffsetDateTime;

/// Identity of a record inside one collection: a category prefix plus a
/// time-based token.
pub trait RecordId: Copy + Eq + Ord + Hash + fmt::Debug + fmt::Display {
    const PREFIX: &'static str;

    fn from_token(token: i64) -> Self;
    fn token(self) -> i64;
}

macro_rules! record_id {
    ($name:ident, $prefix:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(i64);

        impl $name {
            pub const fn new(token: i64) -> Self {
                Self(token)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl RecordId for $name {
            const PREFIX: &'static str = $prefix;

            fn from_token(token: i64) -> Self {
                Self(token)
            }

            fn token(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }
    };
}

record_id!(TargetId, "target");
record_id!(InstrumentId, "instrument");
record_id!(FactorId, "factor");
record_id!(ActivityId, "activity");
record_id!(SourceId, "source");

/// Hands out strictly increasing millisecond tokens. Two calls in the same
/// millisecond still get distinct tokens.
#[derive(Debug, Clone)]
pub struct IdentityGenerator {
    last: i64,
    clock: fn() -> i64,
}

impl Default for IdentityGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityGenerator {
    pub fn new() -> Self {
        Self {
            last: i64::MIN,
            clock: unix_millis,
        }
    }

    /// Deterministic generator: ignores the wall clock and counts up from
    /// `token`.
    pub fn starting_at(token: i64) -> Self {
        Self {
            last: token.saturating_sub(1),
            clock: frozen_clock,
        }
    }

    pub fn next_id<I: RecordId>(&mut self) -> I {
        I::from_token(self.next_token())
    }

    fn next_token(&mut self) -> i64 {
        let now = (self.clock)();
        let token = if now > self.last {
            now
        } else {
            self.last.saturating_add(1)
        };
        self.last = token;
        token
    }
}

fn unix_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

const fn frozen_clock() -> i64 {
    i64::MIN
}

#[cfg(test)]
mod tests {
    use super::{IdentityGenerator, RecordId, SourceId, TargetId};
    use std::collections::BTreeSet;

    #[test]
    fn tokens_are_strictly_increasing_within_one_millisecond() {
        let mut ids = IdentityGenerator::new();
        let tokens = (0..500)
            .map(|_| ids.next_id::<TargetId>().get())
            .collect::<Vec<_>>();

        assert!(tokens.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(tokens.iter().collect::<BTreeSet<_>>().len(), 500);
    }

    #[test]
    fn wall_clock_tokens_are_recent_unix_millis() {
        let mut ids = IdentityGenerator::new();
        let token = ids.next_id::<SourceId>().get();
        // 2020-01-01T00:00:00Z in milliseconds.
        assert!(token > 1_577_836_800_000);
    }

    #[test]
    fn fixed_start_counts_up() {
        let mut ids = IdentityGenerator::starting_at(100);
        assert_eq!(ids.next_id::<TargetId>(), TargetId::new(100));
        assert_eq!(ids.next_id::<TargetId>(), TargetId::new(101));
    }

    #[test]
    fn display_carries_category_prefix() {
        assert_eq!(SourceId::new(42).to_string(), "source-42");
        assert_eq!(TargetId::PREFIX, "target");
    }
}
