// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use gri_app::{
    ActivityField, AxisHeader, CellRef, CollectionKind, EnergyQuestionnaire, EntityCollectionStore,
    FactorField, FieldEdit, FieldKey, GateAnswer, GateKind, InstrumentField, PageCommand,
    PageMode, PageState, QuestionnaireAnswers, QuestionnaireCommand, QuestionnaireEvent, Record,
    RecordRef, SectionKind, SelectionKind, SourceCategory, SourceField, TargetField, TextField,
    vocab,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap};
use std::io;
use std::time::Duration;

/// Where "back" leads: the environmental topics index.
pub const BACK_PATH: &str = "/environmental";
const CURSOR_MARK: &str = ">";
const CELL_WIDTH: usize = 14;
const MAX_LABEL_WIDTH: usize = 32;

/// Collaborators owned by the surrounding application.
pub trait PageShell {
    fn navigate_to(&mut self, path: &str) -> Result<()>;
    fn explanatory_text(&mut self, section: SectionKind) -> String;
    /// Returns a status message for the page.
    fn save(&mut self, answers: &QuestionnaireAnswers) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FocusRow {
    Gate(GateKind),
    Record(RecordRef),
    Option(SelectionKind, &'static str),
    Text(TextField),
    Cell(CellRef),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditTarget {
    Field(FieldEdit),
    Text(TextField),
    Cell(CellRef),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct InputState {
    target: EditTarget,
    buffer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct HelpUiState {
    visible: bool,
    text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    row: usize,
    field: usize,
    input: Option<InputState>,
    help: HelpUiState,
}

pub fn run_app<S: PageShell>(
    state: &mut PageState,
    questionnaire: &mut EnergyQuestionnaire,
    shell: &mut S,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    let mut view_data = ViewData::default();

    let mut result = Ok(());
    loop {
        if let Err(error) =
            terminal.draw(|frame| render(frame, state, questionnaire, &view_data))
        {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if !has_event {
            continue;
        }
        match event::read().context("read event") {
            Ok(Event::Key(key)) => {
                if handle_key_event(state, questionnaire, shell, &mut view_data, key) {
                    break;
                }
            }
            Ok(_) => {}
            Err(error) => {
                result = Err(error);
                break;
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

/// Returns true when the page should close.
fn handle_key_event<S: PageShell>(
    state: &mut PageState,
    questionnaire: &mut EnergyQuestionnaire,
    shell: &mut S,
    view_data: &mut ViewData,
    key: KeyEvent,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    if view_data.help.visible {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            view_data.help.visible = false;
        }
        return false;
    }

    if view_data.input.is_some() {
        handle_input_key(state, questionnaire, view_data, key);
        return false;
    }

    let section = state.active_section;
    let rows = focus_rows(questionnaire, section);
    let focused = rows.get(view_data.row).copied();

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            return match shell.navigate_to(BACK_PATH) {
                Ok(()) => true,
                Err(error) => {
                    state.dispatch(PageCommand::SetStatus(format!("navigation failed: {error}")));
                    false
                }
            };
        }
        KeyCode::Tab => {
            state.dispatch(PageCommand::NextSection);
            reset_cursor(view_data);
        }
        KeyCode::BackTab => {
            state.dispatch(PageCommand::PrevSection);
            reset_cursor(view_data);
        }
        KeyCode::Char('j') | KeyCode::Down => {
            view_data.row = (view_data.row + 1).min(rows.len().saturating_sub(1));
            view_data.field = 0;
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view_data.row = view_data.row.saturating_sub(1);
            view_data.field = 0;
        }
        KeyCode::Char('l') | KeyCode::Right => {
            let count = focused.map_or(0, field_count);
            view_data.field = (view_data.field + 1).min(count.saturating_sub(1));
        }
        KeyCode::Char('h') | KeyCode::Left => {
            view_data.field = view_data.field.saturating_sub(1);
        }
        KeyCode::Char('y') | KeyCode::Char('n') => {
            if let Some(gate) = GateKind::for_section(section) {
                let answer = if key.code == KeyCode::Char('y') {
                    GateAnswer::Yes
                } else {
                    GateAnswer::No
                };
                apply(state, questionnaire, QuestionnaireCommand::Answer { gate, answer });
            }
        }
        KeyCode::Char('a') => {
            if let Some(kind) = primary_collection(section) {
                if questionnaire.section_visible(section) {
                    add_and_focus(state, questionnaire, view_data, kind);
                } else {
                    state.dispatch(PageCommand::SetStatus(
                        "answer yes to the question first".to_owned(),
                    ));
                }
            }
        }
        KeyCode::Char('s') if section == SectionKind::Consumption => {
            add_and_focus(state, questionnaire, view_data, CollectionKind::Sources);
        }
        KeyCode::Char('d') => {
            if let Some(FocusRow::Record(record)) = focused {
                apply(state, questionnaire, QuestionnaireCommand::Remove(record));
            }
        }
        KeyCode::Char(' ') => {
            if let Some(FocusRow::Option(set, option)) = focused {
                let checked = !questionnaire.selection(set).contains(option);
                apply(
                    state,
                    questionnaire,
                    QuestionnaireCommand::Toggle {
                        set,
                        option: option.to_owned(),
                        checked,
                    },
                );
            }
        }
        KeyCode::Char('c') => {
            if let Some(edit) = focused.and_then(|row| focused_field(row, view_data.field)) {
                cycle_choice(state, questionnaire, edit);
            }
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(target) = focused.and_then(|row| edit_target(row, view_data.field)) {
                view_data.input = Some(InputState {
                    target,
                    buffer: current_value(questionnaire, target),
                });
                state.dispatch(PageCommand::EnterEditMode);
            }
        }
        KeyCode::Char('?') => {
            view_data.help = HelpUiState {
                visible: true,
                text: shell.explanatory_text(section),
            };
        }
        KeyCode::Char('w') => {
            let message = match shell.save(&questionnaire.answers()) {
                Ok(message) => message,
                Err(error) => format!("save failed: {error}"),
            };
            state.dispatch(PageCommand::SetStatus(message));
        }
        _ => {}
    }

    clamp_cursor(questionnaire, state.active_section, view_data);
    false
}

fn handle_input_key(
    state: &mut PageState,
    questionnaire: &mut EnergyQuestionnaire,
    view_data: &mut ViewData,
    key: KeyEvent,
) {
    let Some(input) = view_data.input.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Esc => {
            view_data.input = None;
            state.dispatch(PageCommand::ExitToNav);
        }
        KeyCode::Enter => {
            let target = input.target;
            let value = std::mem::take(&mut input.buffer);
            view_data.input = None;
            state.dispatch(PageCommand::ExitToNav);
            let command = match target {
                EditTarget::Field(edit) => QuestionnaireCommand::Update(edit, value),
                EditTarget::Text(field) => QuestionnaireCommand::SetText(field, value),
                EditTarget::Cell(cell) => QuestionnaireCommand::SetCell(cell, value),
            };
            apply(state, questionnaire, command);
            clamp_cursor(questionnaire, state.active_section, view_data);
        }
        KeyCode::Backspace => {
            input.buffer.pop();
        }
        KeyCode::Char(ch) => {
            input.buffer.push(ch);
        }
        _ => {}
    }
}

fn apply(
    state: &mut PageState,
    questionnaire: &mut EnergyQuestionnaire,
    command: QuestionnaireCommand,
) -> Vec<QuestionnaireEvent> {
    let events = questionnaire.dispatch(command);
    if let Some(event) = events.first() {
        state.dispatch(PageCommand::SetStatus(event.status_label()));
    }
    events
}

fn add_and_focus(
    state: &mut PageState,
    questionnaire: &mut EnergyQuestionnaire,
    view_data: &mut ViewData,
    kind: CollectionKind,
) {
    let events = apply(state, questionnaire, QuestionnaireCommand::Add(kind));
    let Some(QuestionnaireEvent::RecordAdded(record)) = events.first() else {
        return;
    };
    let rows = focus_rows(questionnaire, state.active_section);
    if let Some(index) = rows.iter().position(|row| *row == FocusRow::Record(*record)) {
        view_data.row = index;
        view_data.field = 0;
    }
}

fn cycle_choice(state: &mut PageState, questionnaire: &mut EnergyQuestionnaire, edit: FieldEdit) {
    let Some(choices) = field_choices(edit) else {
        state.dispatch(PageCommand::SetStatus("no choices for this field".to_owned()));
        return;
    };
    let current = current_value(questionnaire, EditTarget::Field(edit));
    let next = choices
        .iter()
        .position(|choice| *choice == current)
        .map_or(0, |index| (index + 1) % choices.len());
    apply(
        state,
        questionnaire,
        QuestionnaireCommand::Update(edit, choices[next].to_owned()),
    );
}

fn reset_cursor(view_data: &mut ViewData) {
    view_data.row = 0;
    view_data.field = 0;
}

fn clamp_cursor(questionnaire: &EnergyQuestionnaire, section: SectionKind, view_data: &mut ViewData) {
    let rows = focus_rows(questionnaire, section);
    view_data.row = view_data.row.min(rows.len().saturating_sub(1));
    let count = rows.get(view_data.row).map_or(0, |row| field_count(*row));
    view_data.field = view_data.field.min(count.saturating_sub(1));
}

fn primary_collection(section: SectionKind) -> Option<CollectionKind> {
    match section {
        SectionKind::Consumption => Some(CollectionKind::Activities),
        SectionKind::Reductions => Some(CollectionKind::Targets),
        SectionKind::Instruments => Some(CollectionKind::Instruments),
        SectionKind::ConversionFactors => Some(CollectionKind::Factors),
        SectionKind::Outside | SectionKind::Intensity => None,
    }
}

/// Everything the cursor can land on in `section`, top to bottom.
fn focus_rows(questionnaire: &EnergyQuestionnaire, section: SectionKind) -> Vec<FocusRow> {
    let mut rows = Vec::new();
    if let Some(gate) = GateKind::for_section(section) {
        rows.push(FocusRow::Gate(gate));
    }
    if !questionnaire.section_visible(section) {
        return rows;
    }

    match section {
        SectionKind::Consumption => {
            rows.extend(record_rows(questionnaire.activities(), RecordRef::Activity));
            rows.extend(record_rows(questionnaire.sources(), RecordRef::Source));
            rows.extend(
                questionnaire
                    .consumption_matrix()
                    .cells()
                    .map(|cell| FocusRow::Cell(CellRef::Consumption(cell.row, cell.column))),
            );
        }
        SectionKind::Outside => {
            rows.extend(
                questionnaire
                    .outside_matrix()
                    .cells()
                    .map(|cell| FocusRow::Cell(CellRef::Outside(cell.row, cell.column))),
            );
        }
        SectionKind::Intensity => {
            rows.extend(option_rows(questionnaire, SelectionKind::IntensityEnergyTypes));
            rows.push(FocusRow::Text(TextField::IntensityDenominator));
        }
        SectionKind::Reductions => {
            rows.extend(record_rows(questionnaire.targets(), RecordRef::Target));
        }
        SectionKind::Instruments => {
            rows.extend(record_rows(questionnaire.instruments(), RecordRef::Instrument));
        }
        SectionKind::ConversionFactors => {
            rows.extend(option_rows(questionnaire, SelectionKind::Methodologies));
            rows.extend(record_rows(questionnaire.factors(), RecordRef::Factor));
        }
    }
    rows
}

fn record_rows<T: Record>(
    store: &EntityCollectionStore<T>,
    to_ref: fn(T::Id) -> RecordRef,
) -> impl Iterator<Item = FocusRow> + '_ {
    store
        .ids()
        .iter()
        .map(move |id| FocusRow::Record(to_ref(*id)))
}

fn option_rows(
    questionnaire: &EnergyQuestionnaire,
    set: SelectionKind,
) -> impl Iterator<Item = FocusRow> + '_ {
    questionnaire
        .selection(set)
        .options()
        .iter()
        .map(move |option| FocusRow::Option(set, *option))
}

fn field_count(row: FocusRow) -> usize {
    match row {
        FocusRow::Record(RecordRef::Activity(_)) => ActivityField::ALL.len(),
        FocusRow::Record(RecordRef::Source(_)) => SourceField::ALL.len(),
        FocusRow::Record(RecordRef::Target(_)) => TargetField::ALL.len(),
        FocusRow::Record(RecordRef::Instrument(_)) => InstrumentField::ALL.len(),
        FocusRow::Record(RecordRef::Factor(_)) => FactorField::ALL.len(),
        FocusRow::Gate(_) | FocusRow::Option(..) | FocusRow::Text(_) | FocusRow::Cell(_) => 1,
    }
}

fn focused_field(row: FocusRow, index: usize) -> Option<FieldEdit> {
    let FocusRow::Record(record) = row else {
        return None;
    };
    match record {
        RecordRef::Activity(id) => ActivityField::ALL
            .get(index)
            .map(|field| FieldEdit::Activity(id, *field)),
        RecordRef::Source(id) => SourceField::ALL
            .get(index)
            .map(|field| FieldEdit::Source(id, *field)),
        RecordRef::Target(id) => TargetField::ALL
            .get(index)
            .map(|field| FieldEdit::Target(id, *field)),
        RecordRef::Instrument(id) => InstrumentField::ALL
            .get(index)
            .map(|field| FieldEdit::Instrument(id, *field)),
        RecordRef::Factor(id) => FactorField::ALL
            .get(index)
            .map(|field| FieldEdit::Factor(id, *field)),
    }
}

fn edit_target(row: FocusRow, field: usize) -> Option<EditTarget> {
    match row {
        FocusRow::Record(_) => focused_field(row, field).map(EditTarget::Field),
        FocusRow::Text(text) => Some(EditTarget::Text(text)),
        FocusRow::Cell(cell) => Some(EditTarget::Cell(cell)),
        FocusRow::Gate(_) | FocusRow::Option(..) => None,
    }
}

fn field_choices(edit: FieldEdit) -> Option<&'static [&'static str]> {
    let choices: &'static [&'static str] = match edit {
        FieldEdit::Source(_, SourceField::Category) => &vocab::SOURCE_CATEGORIES,
        FieldEdit::Source(_, SourceField::Unit) | FieldEdit::Factor(_, FactorField::Unit) => {
            &vocab::ENERGY_UNITS
        }
        FieldEdit::Instrument(_, InstrumentField::InstrumentType) => &vocab::INSTRUMENT_TYPES,
        FieldEdit::Target(_, TargetField::Scope) => &vocab::TARGET_SCOPES,
        _ => return None,
    };
    Some(choices)
}

fn current_value(questionnaire: &EnergyQuestionnaire, target: EditTarget) -> String {
    match target {
        EditTarget::Field(edit) => match edit {
            FieldEdit::Activity(id, field) => field_value(questionnaire.activities(), id, field),
            FieldEdit::Source(id, field) => field_value(questionnaire.sources(), id, field),
            FieldEdit::Target(id, field) => field_value(questionnaire.targets(), id, field),
            FieldEdit::Instrument(id, field) => {
                field_value(questionnaire.instruments(), id, field)
            }
            FieldEdit::Factor(id, field) => field_value(questionnaire.factors(), id, field),
        },
        EditTarget::Text(TextField::IntensityDenominator) => {
            questionnaire.intensity_denominator().to_owned()
        }
        EditTarget::Cell(CellRef::Consumption(activity, source)) => questionnaire
            .consumption_cells()
            .get(activity, source)
            .unwrap_or_default()
            .to_owned(),
        EditTarget::Cell(CellRef::Outside(category, source)) => questionnaire
            .outside_cells()
            .get(category, source)
            .unwrap_or_default()
            .to_owned(),
    }
}

fn field_value<T: Record>(store: &EntityCollectionStore<T>, id: T::Id, field: T::Field) -> String {
    store
        .get(id)
        .map(|record| record.field(field).to_owned())
        .unwrap_or_default()
}

fn render(
    frame: &mut ratatui::Frame<'_>,
    state: &PageState,
    questionnaire: &EnergyQuestionnaire,
    view_data: &ViewData,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let selected = SectionKind::ALL
        .iter()
        .position(|section| *section == state.active_section)
        .unwrap_or(0);
    let titles = SectionKind::ALL
        .iter()
        .map(|section| section.label())
        .collect::<Vec<_>>();
    let tabs = Tabs::new(titles)
        .block(Block::default().title("energy").borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    let body = Paragraph::new(section_lines(
        questionnaire,
        state.active_section,
        view_data,
    ))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(state.active_section.label()),
    );
    frame.render_widget(body, layout[1]);

    let status = Paragraph::new(status_text(state, questionnaire, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    if view_data.help.visible {
        let area = centered_rect(70, 50, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(format!("{}\n\n{}", view_data.help.text, key_help_text()))
            .wrap(Wrap { trim: true })
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn section_lines(
    questionnaire: &EnergyQuestionnaire,
    section: SectionKind,
    view_data: &ViewData,
) -> Vec<Line<'static>> {
    let rows = focus_rows(questionnaire, section);
    let focused = rows.get(view_data.row).copied();
    let mut lines = Vec::new();

    if let (Some(gate), Some(question)) = (GateKind::for_section(section), section.gate_question())
    {
        let answer = match questionnaire.gate(gate) {
            GateAnswer::Unset => "[ ] yes  [ ] no",
            GateAnswer::Yes => "[x] yes  [ ] no",
            GateAnswer::No => "[ ] yes  [x] no",
        };
        lines.push(Line::from(format!(
            "{} {question}  {answer}",
            marker(focused == Some(FocusRow::Gate(gate)))
        )));
        if !questionnaire.section_visible(section) {
            return lines;
        }
        lines.push(Line::default());
    }

    match section {
        SectionKind::Consumption => {
            lines.push(Line::from("activities"));
            push_records(&mut lines, questionnaire.activities(), RecordRef::Activity, focused, view_data);
            lines.push(Line::from("sources"));
            push_records(&mut lines, questionnaire.sources(), RecordRef::Source, focused, view_data);
            lines.push(Line::default());
            let view = questionnaire.consumption_matrix();
            push_grid(
                &mut lines,
                view.rows(),
                view.columns(),
                &view.value_grid(questionnaire.consumption_cells()),
                focused.and_then(|row| match row {
                    FocusRow::Cell(CellRef::Consumption(activity, source)) => Some((
                        questionnaire.activities().position(activity)?,
                        questionnaire.sources().position(source)?,
                    )),
                    _ => None,
                }),
            );
        }
        SectionKind::Outside => {
            let view = questionnaire.outside_matrix();
            let focus = focused.and_then(|row| match row {
                FocusRow::Cell(CellRef::Outside(category, source)) => Some((
                    view.rows().iter().position(|header| header.key == category)?,
                    questionnaire.sources().position(source)?,
                )),
                _ => None,
            });
            push_grid(
                &mut lines,
                view.rows(),
                view.columns(),
                &view.value_grid(questionnaire.outside_cells()),
                focus,
            );
        }
        SectionKind::Intensity => {
            push_options(&mut lines, questionnaire, SelectionKind::IntensityEnergyTypes, focused);
            lines.push(Line::from(format!(
                "{} denominator: {}",
                marker(focused == Some(FocusRow::Text(TextField::IntensityDenominator))),
                questionnaire.intensity_denominator()
            )));
        }
        SectionKind::Reductions => {
            push_records(&mut lines, questionnaire.targets(), RecordRef::Target, focused, view_data);
        }
        SectionKind::Instruments => {
            push_records(
                &mut lines,
                questionnaire.instruments(),
                RecordRef::Instrument,
                focused,
                view_data,
            );
        }
        SectionKind::ConversionFactors => {
            push_options(&mut lines, questionnaire, SelectionKind::Methodologies, focused);
            lines.push(Line::default());
            push_records(&mut lines, questionnaire.factors(), RecordRef::Factor, focused, view_data);
        }
    }
    lines
}

fn marker(focused: bool) -> &'static str {
    if focused { CURSOR_MARK } else { " " }
}

fn push_records<T: Record>(
    lines: &mut Vec<Line<'static>>,
    store: &EntityCollectionStore<T>,
    to_ref: fn(T::Id) -> RecordRef,
    focused: Option<FocusRow>,
    view_data: &ViewData,
) {
    if store.is_empty() {
        lines.push(Line::from("  (none yet -- press a to add)"));
        return;
    }
    for record in store.iter() {
        let is_focused = focused == Some(FocusRow::Record(to_ref(record.id())));
        let cells = T::Field::all()
            .iter()
            .enumerate()
            .map(|(index, field)| {
                let value = record.field(*field);
                let shown = if value.is_empty() { "-" } else { value };
                if is_focused && index == view_data.field {
                    format!("[{}: {shown}]", field.label())
                } else {
                    format!("{}: {shown}", field.label())
                }
            })
            .collect::<Vec<_>>();
        lines.push(Line::from(format!("{} {}", marker(is_focused), cells.join(" | "))));
    }
}

fn push_options(
    lines: &mut Vec<Line<'static>>,
    questionnaire: &EnergyQuestionnaire,
    set: SelectionKind,
    focused: Option<FocusRow>,
) {
    let selection = questionnaire.selection(set);
    for option in selection.options().iter().copied() {
        let check = if selection.contains(option) { "[x]" } else { "[ ]" };
        lines.push(Line::from(format!(
            "{} {check} {option}",
            marker(focused == Some(FocusRow::Option(set, option)))
        )));
    }
}

fn push_grid<R, C>(
    lines: &mut Vec<Line<'static>>,
    rows: &[AxisHeader<R>],
    columns: &[AxisHeader<C>],
    values: &[Vec<&str>],
    focus: Option<(usize, usize)>,
) {
    if rows.is_empty() || columns.is_empty() {
        lines.push(Line::from("  (grid appears once both axes have entries)"));
        return;
    }
    let label_width = rows
        .iter()
        .map(|header| header.label.chars().count())
        .max()
        .unwrap_or(0)
        .min(MAX_LABEL_WIDTH);

    let mut header = vec![Span::raw(format!("  {}", fit("", label_width)))];
    for column in columns {
        header.push(Span::raw(" "));
        header.push(Span::styled(
            fit(&column.label, CELL_WIDTH),
            category_style(column.category.as_deref()).add_modifier(Modifier::BOLD),
        ));
    }
    lines.push(Line::from(header));

    for (row_index, row) in rows.iter().enumerate() {
        let is_focused_row = focus.is_some_and(|(focused_row, _)| focused_row == row_index);
        let mut spans = vec![
            Span::raw(format!("{} ", marker(is_focused_row))),
            Span::styled(
                fit(&row.label, label_width),
                category_style(row.category.as_deref()),
            ),
        ];
        for column_index in 0..columns.len() {
            let value = values
                .get(row_index)
                .and_then(|row| row.get(column_index))
                .copied()
                .unwrap_or("");
            let shown = if value.is_empty() { "." } else { value };
            let cell = if focus == Some((row_index, column_index)) {
                format!("[{shown}]")
            } else {
                shown.to_owned()
            };
            spans.push(Span::raw(" "));
            spans.push(Span::raw(fit(&cell, CELL_WIDTH)));
        }
        lines.push(Line::from(spans));
    }
}

/// Source categories and value-chain phases get their own header colour.
fn category_style(category: Option<&str>) -> Style {
    let color = match category {
        Some("upstream") => Color::Cyan,
        Some("downstream") => Color::Magenta,
        Some(other) => match SourceCategory::parse(other) {
            Some(SourceCategory::Renewable) => Color::Green,
            Some(SourceCategory::NonRenewable) => Color::Red,
            None => return Style::default(),
        },
        None => return Style::default(),
    };
    Style::default().fg(color)
}

/// Pads to exactly `width` characters, cutting only what does not fit.
fn fit(value: &str, width: usize) -> String {
    let truncated = value.chars().take(width).collect::<String>();
    format!("{truncated:<width$}")
}

fn status_text(state: &PageState, questionnaire: &EnergyQuestionnaire, view_data: &ViewData) -> String {
    if let Some(input) = &view_data.input {
        return format!("edit: {}_  (enter saves, esc cancels)", input.buffer);
    }
    let mode = match state.mode {
        PageMode::Nav => "NAV",
        PageMode::Edit => "EDIT",
    };
    let missing = questionnaire.missing_required().len();
    let completeness = if missing == 0 {
        "complete".to_owned()
    } else {
        format!("{missing} required missing")
    };
    match &state.status_line {
        Some(status) => format!("{mode} | {completeness} | {status}"),
        None => format!("{mode} | {completeness} | ? help"),
    }
}

fn key_help_text() -> &'static str {
    "tab/shift-tab section  j/k row  h/l field  e edit  c cycle choice\n\
     a add  s add source  d delete  space toggle  y/n answer  w save  q back"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::{
        BACK_PATH, FocusRow, PageShell, ViewData, fit, focus_rows, handle_key_event,
        section_lines, status_text,
    };
    use anyhow::{Result, bail};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use gri_app::{
        EnergyQuestionnaire, GateAnswer, GateKind, PageMode, PageState, QuestionnaireAnswers,
        QuestionnaireCommand, QuestionnaireSeed, RecordRef, SectionKind, SelectionKind,
    };
    use ratatui::style::Color;
    use ratatui::text::Line;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    fn render_section_text(
        questionnaire: &EnergyQuestionnaire,
        section: SectionKind,
        view: &ViewData,
    ) -> String {
        section_lines(questionnaire, section, view)
            .iter()
            .map(line_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn span_color(lines: &[Line<'_>], label: &str) -> Option<Color> {
        lines
            .iter()
            .flat_map(|line| line.spans.iter())
            .find(|span| span.content.trim() == label)
            .and_then(|span| span.style.fg)
    }

    #[derive(Debug, Default)]
    struct TestShell {
        navigated: Vec<String>,
        saves: usize,
        fail_navigation: bool,
    }

    impl PageShell for TestShell {
        fn navigate_to(&mut self, path: &str) -> Result<()> {
            if self.fail_navigation {
                bail!("router unavailable");
            }
            self.navigated.push(path.to_owned());
            Ok(())
        }

        fn explanatory_text(&mut self, section: SectionKind) -> String {
            section.guidance().to_owned()
        }

        fn save(&mut self, _answers: &QuestionnaireAnswers) -> Result<String> {
            self.saves += 1;
            Ok("saving is not available yet".to_owned())
        }
    }

    struct Harness {
        state: PageState,
        questionnaire: EnergyQuestionnaire,
        shell: TestShell,
        view: ViewData,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                state: PageState::default(),
                questionnaire: EnergyQuestionnaire::seeded(&QuestionnaireSeed::default()),
                shell: TestShell::default(),
                view: ViewData::default(),
            }
        }

        fn press(&mut self, code: KeyCode) -> bool {
            handle_key_event(
                &mut self.state,
                &mut self.questionnaire,
                &mut self.shell,
                &mut self.view,
                KeyEvent::new(code, KeyModifiers::NONE),
            )
        }

        fn type_text(&mut self, text: &str) {
            for ch in text.chars() {
                self.press(KeyCode::Char(ch));
            }
        }

        fn jump(&mut self, section: SectionKind) {
            while self.state.active_section != section {
                self.press(KeyCode::Tab);
            }
        }
    }

    #[test]
    fn consumption_rows_cover_records_and_grid() {
        let harness = Harness::new();
        let rows = focus_rows(&harness.questionnaire, SectionKind::Consumption);
        assert_eq!(rows.len(), 3 + 3 + 9);
        assert!(matches!(rows[0], FocusRow::Record(RecordRef::Activity(_))));
        assert!(matches!(rows[3], FocusRow::Record(RecordRef::Source(_))));
    }

    #[test]
    fn closed_gate_shows_only_the_question() {
        let harness = Harness::new();
        assert_eq!(
            focus_rows(&harness.questionnaire, SectionKind::Instruments),
            vec![FocusRow::Gate(GateKind::Instruments)]
        );
        let text = render_section_text(
            &harness.questionnaire,
            SectionKind::Instruments,
            &harness.view,
        );
        assert!(text.contains("Are contractual instruments used"));
        assert!(!text.contains("none yet"));
    }

    #[test]
    fn answering_yes_reveals_section_and_add_focuses_new_row() {
        let mut harness = Harness::new();
        harness.jump(SectionKind::Instruments);
        harness.press(KeyCode::Char('y'));
        assert_eq!(
            harness.questionnaire.gate(GateKind::Instruments),
            GateAnswer::Yes
        );

        harness.press(KeyCode::Char('a'));
        assert_eq!(harness.questionnaire.instruments().len(), 1);
        assert_eq!(harness.view.row, 1);
        assert_eq!(harness.state.status_line.as_deref(), Some("added instrument"));
    }

    #[test]
    fn edit_flow_updates_focused_field() {
        let mut harness = Harness::new();
        harness.press(KeyCode::Char('e'));
        assert_eq!(harness.state.mode, PageMode::Edit);
        assert_eq!(
            harness.view.input.as_ref().map(|input| input.buffer.as_str()),
            Some("Manufacturing")
        );

        for _ in 0.."Manufacturing".len() {
            harness.press(KeyCode::Backspace);
        }
        harness.type_text("Foundry");
        harness.press(KeyCode::Enter);

        assert_eq!(harness.state.mode, PageMode::Nav);
        assert_eq!(
            harness.questionnaire.consumption_matrix().row_labels()[0],
            "Foundry"
        );
    }

    #[test]
    fn escape_cancels_edit_without_changes() {
        let mut harness = Harness::new();
        harness.press(KeyCode::Char('e'));
        harness.type_text("zzz");
        harness.press(KeyCode::Esc);

        assert!(harness.view.input.is_none());
        assert_eq!(
            harness.questionnaire.consumption_matrix().row_labels()[0],
            "Manufacturing"
        );
    }

    #[test]
    fn delete_removes_focused_record_and_clamps_cursor() {
        let mut harness = Harness::new();
        harness.press(KeyCode::Char('j'));
        harness.press(KeyCode::Char('j'));
        harness.press(KeyCode::Char('d'));

        assert_eq!(harness.questionnaire.activities().len(), 2);
        assert_eq!(
            harness.questionnaire.consumption_matrix().row_labels(),
            ["Manufacturing", "Offices"]
        );
        assert_eq!(harness.view.row, 2);
    }

    #[test]
    fn space_toggles_focused_option() {
        let mut harness = Harness::new();
        harness.jump(SectionKind::Intensity);
        harness.press(KeyCode::Char('j'));
        harness.press(KeyCode::Char(' '));
        assert!(
            harness
                .questionnaire
                .selection(SelectionKind::IntensityEnergyTypes)
                .contains("electricity")
        );
        harness.press(KeyCode::Char(' '));
        assert!(
            harness
                .questionnaire
                .selection(SelectionKind::IntensityEnergyTypes)
                .is_empty()
        );
    }

    #[test]
    fn cycle_choice_walks_vocabulary() {
        let mut harness = Harness::new();
        // First source row, category field.
        for _ in 0..3 {
            harness.press(KeyCode::Char('j'));
        }
        harness.press(KeyCode::Char('l'));
        harness.press(KeyCode::Char('c'));

        let source = harness.questionnaire.sources().ids()[0];
        let category = &harness
            .questionnaire
            .sources()
            .get(source)
            .expect("first source")
            .category;
        // Seeded as non-renewable, which wraps back to the first option.
        assert_eq!(category, "renewable");
    }

    #[test]
    fn grid_cell_edit_lands_in_answers() {
        let mut harness = Harness::new();
        for _ in 0..6 {
            harness.press(KeyCode::Char('j'));
        }
        harness.press(KeyCode::Enter);
        harness.type_text("1500");
        harness.press(KeyCode::Enter);

        let answers = harness.questionnaire.answers();
        assert_eq!(answers.consumption.values[0][0], "1500");
        let text = render_section_text(
            &harness.questionnaire,
            SectionKind::Consumption,
            &harness.view,
        );
        assert!(text.contains("[1500]"));
    }

    #[test]
    fn quit_navigates_back() {
        let mut harness = Harness::new();
        assert!(harness.press(KeyCode::Char('q')));
        assert_eq!(harness.shell.navigated, vec![BACK_PATH.to_owned()]);
    }

    #[test]
    fn failed_navigation_keeps_page_open() {
        let mut harness = Harness::new();
        harness.shell.fail_navigation = true;
        assert!(!harness.press(KeyCode::Esc));
        assert!(
            harness
                .state
                .status_line
                .as_deref()
                .is_some_and(|status| status.contains("router unavailable"))
        );
    }

    #[test]
    fn help_overlay_uses_shell_text() {
        let mut harness = Harness::new();
        harness.press(KeyCode::Char('?'));
        assert!(harness.view.help.visible);
        assert!(harness.view.help.text.contains("Energy consumption within"));
        harness.press(KeyCode::Char('j'));
        assert_eq!(harness.view.row, 0);
        harness.press(KeyCode::Esc);
        assert!(!harness.view.help.visible);
    }

    #[test]
    fn save_reports_shell_message() {
        let mut harness = Harness::new();
        harness.press(KeyCode::Char('w'));
        assert_eq!(harness.shell.saves, 1);
        assert_eq!(
            harness.state.status_line.as_deref(),
            Some("saving is not available yet")
        );
    }

    #[test]
    fn status_reports_missing_required() {
        let harness = Harness::new();
        let status = status_text(&harness.state, &harness.questionnaire, &harness.view);
        assert!(status.starts_with("NAV | 3 required missing"));
    }

    #[test]
    fn fit_cuts_only_what_overflows() {
        assert_eq!(fit("Grid electricity", 8), "Grid ele");
        assert_eq!(fit("GJ", 4), "GJ  ");
        assert_eq!(fit("A1", 2), "A1");
    }

    #[test]
    fn placeholder_and_duplicate_rows_stay_distinct() {
        let mut questionnaire = EnergyQuestionnaire::new();
        questionnaire.dispatch(QuestionnaireCommand::Add(gri_app::CollectionKind::Activities));
        questionnaire.dispatch(QuestionnaireCommand::Add(gri_app::CollectionKind::Activities));
        questionnaire.dispatch(QuestionnaireCommand::Add(gri_app::CollectionKind::Sources));

        let text = render_section_text(
            &questionnaire,
            SectionKind::Consumption,
            &ViewData::default(),
        );
        assert!(text.contains("Activity 1"), "{text}");
        assert!(text.contains("Activity 2"), "{text}");
        assert!(text.contains("Source 1"), "{text}");
    }

    #[test]
    fn short_row_labels_render_in_full() {
        let seed = QuestionnaireSeed {
            activities: vec!["A1".to_owned(), "A2".to_owned()],
            sources: Vec::new(),
        };
        let mut questionnaire = EnergyQuestionnaire::seeded(&seed);
        questionnaire.dispatch(QuestionnaireCommand::Add(gri_app::CollectionKind::Sources));

        let text = render_section_text(
            &questionnaire,
            SectionKind::Consumption,
            &ViewData::default(),
        );
        let grid_rows = text
            .lines()
            .filter(|line| line.starts_with("  A1 ") || line.starts_with("  A2 "))
            .count();
        assert_eq!(grid_rows, 2, "{text}");
    }

    #[test]
    fn grid_headers_are_styled_by_category() {
        let mut harness = Harness::new();
        let lines = section_lines(
            &harness.questionnaire,
            SectionKind::Consumption,
            &harness.view,
        );
        assert_eq!(span_color(&lines, "Solar PV"), Some(Color::Green));
        assert_eq!(span_color(&lines, "Natural gas"), Some(Color::Red));
        assert_eq!(span_color(&lines, "Manufacturing"), None);

        harness.jump(SectionKind::Outside);
        harness.press(KeyCode::Char('y'));
        let lines = section_lines(&harness.questionnaire, SectionKind::Outside, &harness.view);
        assert_eq!(
            span_color(&lines, "Purchased goods and services"),
            Some(Color::Cyan)
        );
    }

    #[test]
    fn add_is_refused_while_gate_is_closed() {
        let mut harness = Harness::new();
        harness.jump(SectionKind::Reductions);
        harness.press(KeyCode::Char('a'));
        assert!(harness.questionnaire.targets().is_empty());
        assert_eq!(
            harness.state.status_line.as_deref(),
            Some("answer yes to the question first")
        );

        harness.press(KeyCode::Char('n'));
        harness.press(KeyCode::Char('a'));
        assert!(harness.questionnaire.targets().is_empty());

        harness.press(KeyCode::Char('y'));
        harness.press(KeyCode::Char('a'));
        assert_eq!(harness.questionnaire.targets().len(), 1);
    }
}
