// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::collection::{FieldKey, Record};
use crate::ids::*;
use crate::matrix::{FixedEntry, Labeled};

macro_rules! record_fields {
    ($field:ident { $($variant:ident => $member:ident, $label:literal;)+ }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $field {
            $($variant,)+
        }

        impl $field {
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl FieldKey for $field {
            fn all() -> &'static [Self] {
                Self::ALL
            }

            fn label(self) -> &'static str {
                $field::label(self)
            }
        }
    };
}

macro_rules! impl_record {
    ($record:ident, $id:ident, $field:ident { $($variant:ident => $member:ident, $label:literal;)+ }) => {
        record_fields!($field { $($variant => $member, $label;)+ });

        impl Record for $record {
            type Id = $id;
            type Field = $field;

            fn blank(id: $id) -> Self {
                Self {
                    id,
                    $($member: String::new(),)+
                }
            }

            fn id(&self) -> $id {
                self.id
            }

            fn field(&self, field: $field) -> &str {
                match field {
                    $($field::$variant => &self.$member,)+
                }
            }

            fn set_field(&mut self, field: $field, value: String) {
                match field {
                    $($field::$variant => self.$member = value,)+
                }
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub name: String,
    pub description: String,
}

impl_record!(Activity, ActivityId, ActivityField {
    Name => name, "activity";
    Description => description, "description";
});

impl Labeled for Activity {
    const NOUN: &'static str = "Activity";

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergySource {
    pub id: SourceId,
    pub name: String,
    pub category: String,
    pub unit: String,
}

impl_record!(EnergySource, SourceId, SourceField {
    Name => name, "source";
    Category => category, "category";
    Unit => unit, "unit";
});

impl Labeled for EnergySource {
    const NOUN: &'static str = "Source";

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> Option<&str> {
        Some(&self.category)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyTarget {
    pub id: TargetId,
    pub description: String,
    pub baseline_year: String,
    pub target_year: String,
    pub reduction_percentage: String,
    pub scope: String,
}

impl_record!(EnergyTarget, TargetId, TargetField {
    Description => description, "target";
    BaselineYear => baseline_year, "baseline year";
    TargetYear => target_year, "target year";
    ReductionPercentage => reduction_percentage, "reduction %";
    Scope => scope, "scope";
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractualInstrument {
    pub id: InstrumentId,
    pub instrument_type: String,
    pub energy_source: String,
    pub percentage: String,
}

impl_record!(ContractualInstrument, InstrumentId, InstrumentField {
    InstrumentType => instrument_type, "instrument";
    EnergySource => energy_source, "energy source";
    Percentage => percentage, "share %";
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionFactor {
    pub id: FactorId,
    pub fuel: String,
    pub factor: String,
    pub unit: String,
    pub reference: String,
}

impl_record!(ConversionFactor, FactorId, FactorField {
    Fuel => fuel, "fuel";
    Factor => factor, "factor";
    Unit => unit, "unit";
    Reference => reference, "reference";
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceCategory {
    Renewable,
    NonRenewable,
}

impl SourceCategory {
    pub const ALL: [Self; 2] = [Self::Renewable, Self::NonRenewable];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Renewable => "renewable",
            Self::NonRenewable => "non-renewable",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "renewable" => Some(Self::Renewable),
            "non-renewable" => Some(Self::NonRenewable),
            _ => None,
        }
    }
}

/// Option lists for enumerated fields and multi-selects.
pub mod vocab {
    pub const SOURCE_CATEGORIES: [&str; 2] = ["renewable", "non-renewable"];

    pub const ENERGY_UNITS: [&str; 4] = ["GJ", "MWh", "kWh", "TJ"];

    pub const INSTRUMENT_TYPES: [&str; 4] = [
        "Power purchase agreement",
        "Renewable energy certificate",
        "Green tariff",
        "Guarantee of origin",
    ];

    pub const TARGET_SCOPES: [&str; 3] = [
        "Within the organization",
        "Outside the organization",
        "Both",
    ];

    pub const INTENSITY_ENERGY_TYPES: [&str; 5] =
        ["fuel", "electricity", "heating", "cooling", "steam"];

    pub const METHODOLOGIES: [&str; 4] = [
        "GHG Protocol",
        "ISO 50001",
        "IEA conversion factors",
        "National grid factors",
    ];
}

/// The fifteen value-chain categories used for energy consumed outside the
/// organization, upstream first.
pub const VALUE_CHAIN_CATEGORIES: [FixedEntry; 15] = [
    upstream("Purchased goods and services"),
    upstream("Capital goods"),
    upstream("Fuel- and energy-related activities"),
    upstream("Upstream transportation and distribution"),
    upstream("Waste generated in operations"),
    upstream("Business travel"),
    upstream("Employee commuting"),
    upstream("Upstream leased assets"),
    downstream("Downstream transportation and distribution"),
    downstream("Processing of sold products"),
    downstream("Use of sold products"),
    downstream("End-of-life treatment of sold products"),
    downstream("Downstream leased assets"),
    downstream("Franchises"),
    downstream("Investments"),
];

const fn upstream(label: &'static str) -> FixedEntry {
    FixedEntry {
        label,
        category: Some("upstream"),
    }
}

const fn downstream(label: &'static str) -> FixedEntry {
    FixedEntry {
        label,
        category: Some("downstream"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionKind {
    Consumption,
    Outside,
    Intensity,
    Reductions,
    Instruments,
    ConversionFactors,
}

impl SectionKind {
    pub const ALL: [Self; 6] = [
        Self::Consumption,
        Self::Outside,
        Self::Intensity,
        Self::Reductions,
        Self::Instruments,
        Self::ConversionFactors,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Consumption => "consumption",
            Self::Outside => "outside",
            Self::Intensity => "intensity",
            Self::Reductions => "reductions",
            Self::Instruments => "instruments",
            Self::ConversionFactors => "factors",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "consumption" => Some(Self::Consumption),
            "outside" => Some(Self::Outside),
            "intensity" => Some(Self::Intensity),
            "reductions" => Some(Self::Reductions),
            "instruments" => Some(Self::Instruments),
            "factors" => Some(Self::ConversionFactors),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Consumption => "302-1 within org",
            Self::Outside => "302-2 outside org",
            Self::Intensity => "302-3 intensity",
            Self::Reductions => "302-4 reductions",
            Self::Instruments => "instruments",
            Self::ConversionFactors => "factors",
        }
    }

    pub const fn guidance(self) -> &'static str {
        match self {
            Self::Consumption => {
                "Energy consumption within the organization: list the activities that consume energy and the fuel or energy sources they draw on, then fill in consumption per activity and source."
            }
            Self::Outside => {
                "Energy consumption outside the organization: report energy consumed in upstream and downstream value-chain categories, per energy source."
            }
            Self::Intensity => {
                "Energy intensity ratio: choose the energy types included and name the organization-specific denominator (units produced, revenue, floor area)."
            }
            Self::Reductions => {
                "Reduction of energy consumption: describe targets with their baseline year, target year and expected reduction."
            }
            Self::Instruments => {
                "Contractual instruments: power purchase agreements, certificates and tariffs backing the reported renewable share."
            }
            Self::ConversionFactors => {
                "Standards, methodologies, assumptions and conversion factors used to calculate the figures above."
            }
        }
    }

    /// The yes/no question gating this section, if any.
    pub const fn gate_question(self) -> Option<&'static str> {
        match self {
            Self::Outside => Some("Is energy consumed outside the organization tracked?"),
            Self::Reductions => Some("Has the organization set energy reduction targets?"),
            Self::Instruments => Some("Are contractual instruments used for energy sourcing?"),
            Self::Consumption | Self::Intensity | Self::ConversionFactors => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageMode {
    Nav,
    Edit,
}
