// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! The Energy disclosure questionnaire: collections, multi-selects, gates
//! and derived matrices composed into one page.

use serde::Serialize;

use crate::collection::{EntityCollectionStore, FieldKey, Record};
use crate::gate::{GateAnswer, GatedSection};
use crate::ids::*;
use crate::matrix::{FixedAxis, MatrixCells, MatrixView, MatrixViewBuilder};
use crate::model::*;
use crate::selection::SelectionSetStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CollectionKind {
    Activities,
    Sources,
    Targets,
    Instruments,
    Factors,
}

impl CollectionKind {
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Activities => "activity",
            Self::Sources => "source",
            Self::Targets => "target",
            Self::Instruments => "instrument",
            Self::Factors => "conversion factor",
        }
    }

    /// The section the collection is edited in.
    pub const fn section(self) -> SectionKind {
        match self {
            Self::Activities | Self::Sources => SectionKind::Consumption,
            Self::Targets => SectionKind::Reductions,
            Self::Instruments => SectionKind::Instruments,
            Self::Factors => SectionKind::ConversionFactors,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecordRef {
    Activity(ActivityId),
    Source(SourceId),
    Target(TargetId),
    Instrument(InstrumentId),
    Factor(FactorId),
}

impl RecordRef {
    pub const fn kind(self) -> CollectionKind {
        match self {
            Self::Activity(_) => CollectionKind::Activities,
            Self::Source(_) => CollectionKind::Sources,
            Self::Target(_) => CollectionKind::Targets,
            Self::Instrument(_) => CollectionKind::Instruments,
            Self::Factor(_) => CollectionKind::Factors,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEdit {
    Activity(ActivityId, ActivityField),
    Source(SourceId, SourceField),
    Target(TargetId, TargetField),
    Instrument(InstrumentId, InstrumentField),
    Factor(FactorId, FactorField),
}

impl FieldEdit {
    pub const fn record(self) -> RecordRef {
        match self {
            Self::Activity(id, _) => RecordRef::Activity(id),
            Self::Source(id, _) => RecordRef::Source(id),
            Self::Target(id, _) => RecordRef::Target(id),
            Self::Instrument(id, _) => RecordRef::Instrument(id),
            Self::Factor(id, _) => RecordRef::Factor(id),
        }
    }

    /// Only names and source categories appear in matrix headers.
    pub const fn relabels_headers(self) -> bool {
        matches!(
            self,
            Self::Activity(_, ActivityField::Name)
                | Self::Source(_, SourceField::Name | SourceField::Category)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SelectionKind {
    IntensityEnergyTypes,
    Methodologies,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GateKind {
    Outside,
    Reductions,
    Instruments,
}

impl GateKind {
    pub const ALL: [Self; 3] = [Self::Outside, Self::Reductions, Self::Instruments];

    pub const fn section(self) -> SectionKind {
        match self {
            Self::Outside => SectionKind::Outside,
            Self::Reductions => SectionKind::Reductions,
            Self::Instruments => SectionKind::Instruments,
        }
    }

    pub fn for_section(section: SectionKind) -> Option<Self> {
        Self::ALL.into_iter().find(|gate| gate.section() == section)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatrixKind {
    Consumption,
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CellRef {
    Consumption(ActivityId, SourceId),
    Outside(&'static str, SourceId),
}

impl CellRef {
    pub const fn matrix(self) -> MatrixKind {
        match self {
            Self::Consumption(..) => MatrixKind::Consumption,
            Self::Outside(..) => MatrixKind::Outside,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextField {
    IntensityDenominator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionnaireCommand {
    Add(CollectionKind),
    Update(FieldEdit, String),
    Remove(RecordRef),
    Toggle {
        set: SelectionKind,
        option: String,
        checked: bool,
    },
    Answer {
        gate: GateKind,
        answer: GateAnswer,
    },
    SetCell(CellRef, String),
    SetText(TextField, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionnaireEvent {
    RecordAdded(RecordRef),
    RecordUpdated(RecordRef),
    RecordRemoved(RecordRef),
    MatrixReshaped(MatrixKind),
    CellsPruned { matrix: MatrixKind, count: usize },
    OptionToggled {
        set: SelectionKind,
        option: String,
        checked: bool,
    },
    GateChanged { gate: GateKind, answer: GateAnswer },
    CellUpdated(CellRef),
    TextUpdated(TextField),
}

impl QuestionnaireEvent {
    /// Short status-line text.
    pub fn status_label(&self) -> String {
        match self {
            Self::RecordAdded(record) => format!("added {}", record.kind().noun()),
            Self::RecordUpdated(record) => format!("updated {}", record.kind().noun()),
            Self::RecordRemoved(record) => format!("removed {}", record.kind().noun()),
            Self::MatrixReshaped(MatrixKind::Consumption) => "consumption grid updated".to_owned(),
            Self::MatrixReshaped(MatrixKind::Outside) => "value-chain grid updated".to_owned(),
            Self::CellsPruned { count, .. } => format!("cleared {count} orphaned cell(s)"),
            Self::OptionToggled {
                option, checked, ..
            } => {
                if *checked {
                    format!("checked {option}")
                } else {
                    format!("unchecked {option}")
                }
            }
            Self::GateChanged { gate, answer } => {
                let answer = match answer {
                    GateAnswer::Unset => "unanswered",
                    GateAnswer::Yes => "yes",
                    GateAnswer::No => "no",
                };
                format!("{}: {answer}", gate.section().as_str())
            }
            Self::CellUpdated(_) => "cell updated".to_owned(),
            Self::TextUpdated(TextField::IntensityDenominator) => {
                "ratio denominator updated".to_owned()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RequiredField {
    Gate(GateKind),
    AtLeastOne(CollectionKind),
    Field {
        record: RecordRef,
        field: &'static str,
    },
    Text(TextField),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSeed {
    pub name: String,
    pub category: Option<SourceCategory>,
}

/// Pre-populated rows supplied by the page shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionnaireSeed {
    pub activities: Vec<String>,
    pub sources: Vec<SourceSeed>,
}

impl Default for QuestionnaireSeed {
    fn default() -> Self {
        let source = |name: &str, category| SourceSeed {
            name: name.to_owned(),
            category: Some(category),
        };
        Self {
            activities: ["Manufacturing", "Offices", "Logistics"]
                .map(str::to_owned)
                .to_vec(),
            sources: vec![
                source("Natural gas", SourceCategory::NonRenewable),
                source("Grid electricity", SourceCategory::NonRenewable),
                source("Solar PV", SourceCategory::Renewable),
            ],
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConsumptionSection {
    pub activities: EntityCollectionStore<Activity>,
    pub sources: EntityCollectionStore<EnergySource>,
    pub cells: MatrixCells<ActivityId, SourceId>,
}

#[derive(Debug, Clone)]
pub struct IntensitySection {
    pub energy_types: SelectionSetStore,
    pub denominator: String,
}

#[derive(Debug, Clone)]
pub struct FactorsSection {
    pub methodologies: SelectionSetStore,
    pub factors: EntityCollectionStore<ConversionFactor>,
}

#[derive(Debug, Clone)]
pub struct EnergyQuestionnaire {
    consumption: ConsumptionSection,
    outside: GatedSection<MatrixCells<&'static str, SourceId>>,
    intensity: IntensitySection,
    reductions: GatedSection<EntityCollectionStore<EnergyTarget>>,
    instruments: GatedSection<EntityCollectionStore<ContractualInstrument>>,
    factors: FactorsSection,
}

impl Default for EnergyQuestionnaire {
    fn default() -> Self {
        Self::new()
    }
}

const VALUE_CHAIN: FixedAxis = FixedAxis {
    entries: &VALUE_CHAIN_CATEGORIES,
};

const REQUIRED_ACTIVITY: [ActivityField; 1] = [ActivityField::Name];
const REQUIRED_SOURCE: [SourceField; 2] = [SourceField::Name, SourceField::Category];
const REQUIRED_TARGET: [TargetField; 3] = [
    TargetField::Description,
    TargetField::TargetYear,
    TargetField::ReductionPercentage,
];
const REQUIRED_INSTRUMENT: [InstrumentField; 2] =
    [InstrumentField::InstrumentType, InstrumentField::Percentage];
const REQUIRED_FACTOR: [FactorField; 2] = [FactorField::Fuel, FactorField::Factor];

impl EnergyQuestionnaire {
    pub fn new() -> Self {
        Self {
            consumption: ConsumptionSection::default(),
            outside: GatedSection::new(MatrixCells::new()),
            intensity: IntensitySection {
                energy_types: SelectionSetStore::new(&vocab::INTENSITY_ENERGY_TYPES),
                denominator: String::new(),
            },
            reductions: GatedSection::new(EntityCollectionStore::new()),
            instruments: GatedSection::new(EntityCollectionStore::new()),
            factors: FactorsSection {
                methodologies: SelectionSetStore::new(&vocab::METHODOLOGIES),
                factors: EntityCollectionStore::new(),
            },
        }
    }

    pub fn seeded(seed: &QuestionnaireSeed) -> Self {
        let mut questionnaire = Self::new();
        for name in &seed.activities {
            questionnaire
                .consumption
                .activities
                .add_with([(ActivityField::Name, name.as_str())]);
        }
        for source in &seed.sources {
            let category = source.category.map_or("", SourceCategory::as_str);
            questionnaire.consumption.sources.add_with([
                (SourceField::Name, source.name.as_str()),
                (SourceField::Category, category),
            ]);
        }
        questionnaire
    }

    pub fn dispatch(&mut self, command: QuestionnaireCommand) -> Vec<QuestionnaireEvent> {
        match command {
            QuestionnaireCommand::Add(kind) => self.add(kind),
            QuestionnaireCommand::Update(edit, value) => self.update(edit, value),
            QuestionnaireCommand::Remove(record) => self.remove(record),
            QuestionnaireCommand::Toggle {
                set,
                option,
                checked,
            } => {
                if !self.selection_mut(set).toggle(&option, checked) {
                    return Vec::new();
                }
                vec![QuestionnaireEvent::OptionToggled {
                    set,
                    option,
                    checked,
                }]
            }
            QuestionnaireCommand::Answer { gate, answer } => {
                if !self.set_gate(gate, answer) {
                    return Vec::new();
                }
                vec![QuestionnaireEvent::GateChanged { gate, answer }]
            }
            QuestionnaireCommand::SetCell(cell, value) => self.set_cell(cell, value),
            QuestionnaireCommand::SetText(TextField::IntensityDenominator, value) => {
                if self.intensity.denominator == value {
                    return Vec::new();
                }
                self.intensity.denominator = value;
                vec![QuestionnaireEvent::TextUpdated(
                    TextField::IntensityDenominator,
                )]
            }
        }
    }

    fn add(&mut self, kind: CollectionKind) -> Vec<QuestionnaireEvent> {
        let record = match kind {
            CollectionKind::Activities => RecordRef::Activity(self.consumption.activities.add()),
            CollectionKind::Sources => RecordRef::Source(self.consumption.sources.add()),
            CollectionKind::Targets => RecordRef::Target(self.reductions.content_mut().add()),
            CollectionKind::Instruments => {
                RecordRef::Instrument(self.instruments.content_mut().add())
            }
            CollectionKind::Factors => RecordRef::Factor(self.factors.factors.add()),
        };
        let mut events = vec![QuestionnaireEvent::RecordAdded(record)];
        events.extend(reshaped(kind));
        events
    }

    fn update(&mut self, edit: FieldEdit, value: String) -> Vec<QuestionnaireEvent> {
        let touched = match edit {
            FieldEdit::Activity(id, field) => self.consumption.activities.update(id, field, value),
            FieldEdit::Source(id, field) => self.consumption.sources.update(id, field, value),
            FieldEdit::Target(id, field) => self.reductions.content_mut().update(id, field, value),
            FieldEdit::Instrument(id, field) => {
                self.instruments.content_mut().update(id, field, value)
            }
            FieldEdit::Factor(id, field) => self.factors.factors.update(id, field, value),
        };
        if !touched {
            return Vec::new();
        }
        let record = edit.record();
        let mut events = vec![QuestionnaireEvent::RecordUpdated(record)];
        if edit.relabels_headers() {
            events.extend(reshaped(record.kind()));
        }
        events
    }

    fn remove(&mut self, record: RecordRef) -> Vec<QuestionnaireEvent> {
        let removed = match record {
            RecordRef::Activity(id) => self.consumption.activities.remove(id),
            RecordRef::Source(id) => self.consumption.sources.remove(id),
            RecordRef::Target(id) => self.reductions.content_mut().remove(id),
            RecordRef::Instrument(id) => self.instruments.content_mut().remove(id),
            RecordRef::Factor(id) => self.factors.factors.remove(id),
        };
        if !removed {
            return Vec::new();
        }

        let mut events = vec![QuestionnaireEvent::RecordRemoved(record)];
        for &matrix in reshaped_matrices(record.kind()) {
            events.push(QuestionnaireEvent::MatrixReshaped(matrix));
            let count = self.prune(matrix);
            if count > 0 {
                events.push(QuestionnaireEvent::CellsPruned { matrix, count });
            }
        }
        events
    }

    fn prune(&mut self, matrix: MatrixKind) -> usize {
        match matrix {
            MatrixKind::Consumption => {
                let view = self.consumption_matrix();
                self.consumption.cells.prune_to(&view)
            }
            MatrixKind::Outside => {
                let view = self.outside_matrix();
                self.outside.content_mut().prune_to(&view)
            }
        }
    }

    fn set_cell(&mut self, cell: CellRef, value: String) -> Vec<QuestionnaireEvent> {
        let changed = match cell {
            CellRef::Consumption(activity, source) => {
                if !self.consumption_matrix().contains(activity, source) {
                    return Vec::new();
                }
                self.consumption.cells.set(activity, source, value)
            }
            CellRef::Outside(category, source) => {
                if !self.outside_matrix().contains(category, source) {
                    return Vec::new();
                }
                self.outside.content_mut().set(category, source, value)
            }
        };
        if !changed {
            return Vec::new();
        }
        vec![QuestionnaireEvent::CellUpdated(cell)]
    }

    fn set_gate(&mut self, gate: GateKind, answer: GateAnswer) -> bool {
        match gate {
            GateKind::Outside => self.outside.set_answer(answer),
            GateKind::Reductions => self.reductions.set_answer(answer),
            GateKind::Instruments => self.instruments.set_answer(answer),
        }
    }

    fn selection_mut(&mut self, set: SelectionKind) -> &mut SelectionSetStore {
        match set {
            SelectionKind::IntensityEnergyTypes => &mut self.intensity.energy_types,
            SelectionKind::Methodologies => &mut self.factors.methodologies,
        }
    }

    pub fn selection(&self, set: SelectionKind) -> &SelectionSetStore {
        match set {
            SelectionKind::IntensityEnergyTypes => &self.intensity.energy_types,
            SelectionKind::Methodologies => &self.factors.methodologies,
        }
    }

    pub fn gate(&self, gate: GateKind) -> GateAnswer {
        match gate {
            GateKind::Outside => self.outside.answer(),
            GateKind::Reductions => self.reductions.answer(),
            GateKind::Instruments => self.instruments.answer(),
        }
    }

    /// Whether the section body (beyond its gate question) is shown.
    pub fn section_visible(&self, section: SectionKind) -> bool {
        GateKind::for_section(section).is_none_or(|gate| self.gate(gate) == GateAnswer::Yes)
    }

    pub fn activities(&self) -> &EntityCollectionStore<Activity> {
        &self.consumption.activities
    }

    pub fn sources(&self) -> &EntityCollectionStore<EnergySource> {
        &self.consumption.sources
    }

    /// Includes targets hidden behind an unanswered or "no" gate.
    pub fn targets(&self) -> &EntityCollectionStore<EnergyTarget> {
        self.reductions.content()
    }

    pub fn instruments(&self) -> &EntityCollectionStore<ContractualInstrument> {
        self.instruments.content()
    }

    pub fn factors(&self) -> &EntityCollectionStore<ConversionFactor> {
        &self.factors.factors
    }

    pub fn intensity_denominator(&self) -> &str {
        &self.intensity.denominator
    }

    pub fn consumption_matrix(&self) -> MatrixView<ActivityId, SourceId> {
        MatrixViewBuilder::build(&self.consumption.activities, &self.consumption.sources)
    }

    pub fn outside_matrix(&self) -> MatrixView<&'static str, SourceId> {
        MatrixViewBuilder::build(&VALUE_CHAIN, &self.consumption.sources)
    }

    pub fn consumption_cells(&self) -> &MatrixCells<ActivityId, SourceId> {
        &self.consumption.cells
    }

    pub fn outside_cells(&self) -> &MatrixCells<&'static str, SourceId> {
        self.outside.content()
    }

    /// Presence checks only; field formats are never validated.
    pub fn missing_required(&self) -> Vec<RequiredField> {
        let mut missing = Vec::new();
        require_rows(
            &mut missing,
            &self.consumption.activities,
            CollectionKind::Activities,
            &REQUIRED_ACTIVITY,
            RecordRef::Activity,
        );
        require_rows(
            &mut missing,
            &self.consumption.sources,
            CollectionKind::Sources,
            &REQUIRED_SOURCE,
            RecordRef::Source,
        );
        for gate in GateKind::ALL {
            if !self.gate(gate).is_answered() {
                missing.push(RequiredField::Gate(gate));
            }
        }
        if !self.intensity.energy_types.is_empty() && self.intensity.denominator.trim().is_empty()
        {
            missing.push(RequiredField::Text(TextField::IntensityDenominator));
        }
        if self.reductions.is_required() {
            require_rows(
                &mut missing,
                self.reductions.content(),
                CollectionKind::Targets,
                &REQUIRED_TARGET,
                RecordRef::Target,
            );
        }
        if self.instruments.is_required() {
            require_rows(
                &mut missing,
                self.instruments.content(),
                CollectionKind::Instruments,
                &REQUIRED_INSTRUMENT,
                RecordRef::Instrument,
            );
        }
        require_fields(
            &mut missing,
            &self.factors.factors,
            &REQUIRED_FACTOR,
            RecordRef::Factor,
        );
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_required().is_empty()
    }

    /// Snapshot of what the page currently shows. Content behind a closed
    /// gate stays in its store but is left out here.
    pub fn answers(&self) -> QuestionnaireAnswers {
        QuestionnaireAnswers {
            activities: self.consumption.activities.iter().cloned().collect(),
            sources: self.consumption.sources.iter().cloned().collect(),
            consumption: MatrixAnswers::from_view(
                &self.consumption_matrix(),
                &self.consumption.cells,
            ),
            outside_tracked: self.outside.answer(),
            outside: self
                .outside
                .visible()
                .map(|cells| MatrixAnswers::from_view(&self.outside_matrix(), cells)),
            intensity_energy_types: self.intensity.energy_types.selected().to_vec(),
            intensity_denominator: self.intensity.denominator.clone(),
            targets_set: self.reductions.answer(),
            targets: self
                .reductions
                .visible()
                .map(|targets| targets.iter().cloned().collect()),
            instruments_used: self.instruments.answer(),
            instruments: self
                .instruments
                .visible()
                .map(|instruments| instruments.iter().cloned().collect()),
            methodologies: self.factors.methodologies.selected().to_vec(),
            conversion_factors: self.factors.factors.iter().cloned().collect(),
        }
    }
}

fn reshaped(kind: CollectionKind) -> impl Iterator<Item = QuestionnaireEvent> {
    reshaped_matrices(kind)
        .iter()
        .copied()
        .map(QuestionnaireEvent::MatrixReshaped)
}

fn reshaped_matrices(kind: CollectionKind) -> &'static [MatrixKind] {
    match kind {
        CollectionKind::Activities => &[MatrixKind::Consumption],
        CollectionKind::Sources => &[MatrixKind::Consumption, MatrixKind::Outside],
        CollectionKind::Targets | CollectionKind::Instruments | CollectionKind::Factors => &[],
    }
}

fn require_rows<T: Record>(
    missing: &mut Vec<RequiredField>,
    store: &EntityCollectionStore<T>,
    kind: CollectionKind,
    required: &[T::Field],
    to_ref: fn(T::Id) -> RecordRef,
) {
    if store.is_empty() {
        missing.push(RequiredField::AtLeastOne(kind));
    }
    require_fields(missing, store, required, to_ref);
}

fn require_fields<T: Record>(
    missing: &mut Vec<RequiredField>,
    store: &EntityCollectionStore<T>,
    required: &[T::Field],
    to_ref: fn(T::Id) -> RecordRef,
) {
    for record in store.iter() {
        for field in required {
            if record.field(*field).trim().is_empty() {
                missing.push(RequiredField::Field {
                    record: to_ref(record.id()),
                    field: field.label(),
                });
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixAnswers {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub values: Vec<Vec<String>>,
}

impl MatrixAnswers {
    fn from_view<R, C>(view: &MatrixView<R, C>, cells: &MatrixCells<R, C>) -> Self
    where
        R: Copy + Eq + std::hash::Hash,
        C: Copy + Eq + std::hash::Hash,
    {
        Self {
            rows: view.row_labels().into_iter().map(str::to_owned).collect(),
            columns: view.column_labels().into_iter().map(str::to_owned).collect(),
            values: view
                .value_grid(cells)
                .into_iter()
                .map(|row| row.into_iter().map(str::to_owned).collect())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionnaireAnswers {
    pub activities: Vec<Activity>,
    pub sources: Vec<EnergySource>,
    pub consumption: MatrixAnswers,
    pub outside_tracked: GateAnswer,
    pub outside: Option<MatrixAnswers>,
    pub intensity_energy_types: Vec<String>,
    pub intensity_denominator: String,
    pub targets_set: GateAnswer,
    pub targets: Option<Vec<EnergyTarget>>,
    pub instruments_used: GateAnswer,
    pub instruments: Option<Vec<ContractualInstrument>>,
    pub methodologies: Vec<String>,
    pub conversion_factors: Vec<ConversionFactor>,
}
