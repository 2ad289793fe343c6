// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{PageMode, SectionKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    pub mode: PageMode,
    pub active_section: SectionKind,
    pub status_line: Option<String>,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            mode: PageMode::Nav,
            active_section: SectionKind::Consumption,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCommand {
    NextSection,
    PrevSection,
    JumpTo(SectionKind),
    EnterEditMode,
    ExitToNav,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    ModeChanged(PageMode),
    SectionChanged(SectionKind),
    StatusUpdated(String),
    StatusCleared,
}

impl PageState {
    pub fn dispatch(&mut self, command: PageCommand) -> Vec<PageEvent> {
        match command {
            PageCommand::NextSection => self.rotate_section(1),
            PageCommand::PrevSection => self.rotate_section(-1),
            PageCommand::JumpTo(section) => {
                if self.active_section == section {
                    return Vec::new();
                }
                self.active_section = section;
                vec![PageEvent::SectionChanged(section)]
            }
            PageCommand::EnterEditMode => {
                self.mode = PageMode::Edit;
                vec![PageEvent::ModeChanged(self.mode), self.set_status("edit")]
            }
            PageCommand::ExitToNav => {
                self.mode = PageMode::Nav;
                vec![PageEvent::ModeChanged(self.mode), self.set_status("nav")]
            }
            PageCommand::SetStatus(message) => vec![self.set_status(&message)],
            PageCommand::ClearStatus => {
                self.status_line = None;
                vec![PageEvent::StatusCleared]
            }
        }
    }

    fn rotate_section(&mut self, delta: isize) -> Vec<PageEvent> {
        let sections = SectionKind::ALL;
        let current = sections
            .iter()
            .position(|section| *section == self.active_section)
            .unwrap_or(0) as isize;
        let len = sections.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.active_section = sections[next];
        vec![PageEvent::SectionChanged(self.active_section)]
    }

    fn set_status(&mut self, message: &str) -> PageEvent {
        self.status_line = Some(message.to_owned());
        PageEvent::StatusUpdated(message.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::{PageCommand, PageEvent, PageState};
    use crate::{PageMode, SectionKind};

    #[test]
    fn section_rotation_wraps() {
        let mut state = PageState {
            active_section: SectionKind::ConversionFactors,
            ..PageState::default()
        };

        let events = state.dispatch(PageCommand::NextSection);
        assert_eq!(state.active_section, SectionKind::Consumption);
        assert_eq!(
            events,
            vec![PageEvent::SectionChanged(SectionKind::Consumption)]
        );

        state.dispatch(PageCommand::PrevSection);
        assert_eq!(state.active_section, SectionKind::ConversionFactors);
    }

    #[test]
    fn jump_to_current_section_is_quiet() {
        let mut state = PageState::default();
        assert!(
            state
                .dispatch(PageCommand::JumpTo(SectionKind::Consumption))
                .is_empty()
        );
        assert_eq!(
            state.dispatch(PageCommand::JumpTo(SectionKind::Instruments)),
            vec![PageEvent::SectionChanged(SectionKind::Instruments)]
        );
    }

    #[test]
    fn mode_transitions_update_status() {
        let mut state = PageState::default();

        state.dispatch(PageCommand::EnterEditMode);
        assert_eq!(state.mode, PageMode::Edit);
        assert_eq!(state.status_line.as_deref(), Some("edit"));

        let events = state.dispatch(PageCommand::ExitToNav);
        assert_eq!(state.mode, PageMode::Nav);
        assert_eq!(
            events,
            vec![
                PageEvent::ModeChanged(PageMode::Nav),
                PageEvent::StatusUpdated("nav".to_owned()),
            ]
        );

        state.dispatch(PageCommand::ClearStatus);
        assert_eq!(state.status_line, None);
    }
}
