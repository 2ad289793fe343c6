// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GateAnswer {
    #[default]
    Unset,
    Yes,
    No,
}

impl GateAnswer {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::Yes => "yes",
            Self::No => "no",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "" => Some(Self::Unset),
            "yes" => Some(Self::Yes),
            "no" => Some(Self::No),
            _ => None,
        }
    }

    pub const fn is_answered(self) -> bool {
        !matches!(self, Self::Unset)
    }
}

/// A yes/no question and the subsection it reveals. The subsection is only
/// visible while the answer is `Yes`, but its content survives every flip.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GatedSection<S> {
    answer: GateAnswer,
    content: S,
}

impl<S> GatedSection<S> {
    pub fn new(content: S) -> Self {
        Self {
            answer: GateAnswer::Unset,
            content,
        }
    }

    pub const fn answer(&self) -> GateAnswer {
        self.answer
    }

    /// Returns whether the answer changed. Content is never cleared.
    pub fn set_answer(&mut self, answer: GateAnswer) -> bool {
        if self.answer == answer {
            return false;
        }
        self.answer = answer;
        true
    }

    pub const fn is_open(&self) -> bool {
        matches!(self.answer, GateAnswer::Yes)
    }

    /// Dependent fields are required exactly while the section is shown.
    pub const fn is_required(&self) -> bool {
        self.is_open()
    }

    pub fn visible(&self) -> Option<&S> {
        self.is_open().then_some(&self.content)
    }

    /// Reaches hidden content too.
    pub fn content(&self) -> &S {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut S {
        &mut self.content
    }
}

#[cfg(test)]
mod tests {
    use super::{GateAnswer, GatedSection};

    #[test]
    fn starts_unset_and_hidden() {
        let section = GatedSection::new(vec!["draft".to_owned()]);
        assert_eq!(section.answer(), GateAnswer::Unset);
        assert!(section.visible().is_none());
        assert!(!section.is_required());
    }

    #[test]
    fn hiding_keeps_content_for_reopen() {
        let mut section = GatedSection::new(Vec::<String>::new());
        section.set_answer(GateAnswer::Yes);
        section.content_mut().push("PPA 40%".to_owned());

        section.set_answer(GateAnswer::No);
        assert!(section.visible().is_none());
        assert_eq!(section.content().len(), 1);

        section.set_answer(GateAnswer::Yes);
        assert_eq!(
            section.visible().map(Vec::as_slice),
            Some(["PPA 40%".to_owned()].as_slice())
        );
    }

    #[test]
    fn repeating_an_answer_is_a_no_op() {
        let mut section = GatedSection::new(());
        assert!(section.set_answer(GateAnswer::No));
        assert!(!section.set_answer(GateAnswer::No));
        assert!(section.answer().is_answered());
    }

    #[test]
    fn answer_parse_round_trips_storage_strings() {
        for answer in [GateAnswer::Unset, GateAnswer::Yes, GateAnswer::No] {
            assert_eq!(GateAnswer::parse(answer.as_str()), Some(answer));
        }
        assert_eq!(GateAnswer::parse("maybe"), None);
    }
}
