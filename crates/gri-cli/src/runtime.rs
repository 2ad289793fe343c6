// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use gri_app::{QuestionnaireAnswers, SectionKind};

pub const SAVE_UNAVAILABLE: &str = "saving is not available yet; answers stay in this session";

/// Page collaborators for the standalone binary. There is no router, so
/// navigation is recorded and ends the session.
#[derive(Debug, Default)]
pub struct CliShell {
    visited: Vec<String>,
}

impl CliShell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visited(&self) -> &[String] {
        &self.visited
    }
}

impl gri_tui::PageShell for CliShell {
    fn navigate_to(&mut self, path: &str) -> Result<()> {
        if !path.starts_with('/') {
            bail!("cannot navigate to {path:?}; paths must be absolute, e.g. /environmental");
        }
        self.visited.push(path.to_owned());
        Ok(())
    }

    fn explanatory_text(&mut self, section: SectionKind) -> String {
        match section.gate_question() {
            Some(question) => format!("{}\n\n{question}", section.guidance()),
            None => section.guidance().to_owned(),
        }
    }

    fn save(&mut self, _answers: &QuestionnaireAnswers) -> Result<String> {
        Ok(SAVE_UNAVAILABLE.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::{CliShell, SAVE_UNAVAILABLE};
    use anyhow::Result;
    use gri_app::SectionKind;
    use gri_testkit::seeded_questionnaire;
    use gri_tui::PageShell;

    #[test]
    fn navigation_is_recorded() -> Result<()> {
        let mut shell = CliShell::new();
        shell.navigate_to("/environmental")?;
        assert_eq!(shell.visited(), ["/environmental".to_owned()]);
        Ok(())
    }

    #[test]
    fn relative_navigation_is_rejected() {
        let mut shell = CliShell::new();
        let error = shell
            .navigate_to("environmental")
            .expect_err("relative path should fail");
        assert!(error.to_string().contains("must be absolute"));
        assert!(shell.visited().is_empty());
    }

    #[test]
    fn explanatory_text_includes_gate_question() {
        let mut shell = CliShell::new();
        let text = shell.explanatory_text(SectionKind::Reductions);
        assert!(text.starts_with(SectionKind::Reductions.guidance()));
        assert!(text.ends_with(SectionKind::Reductions.gate_question().unwrap_or_default()));

        let plain = shell.explanatory_text(SectionKind::Intensity);
        assert_eq!(plain, SectionKind::Intensity.guidance());
    }

    #[test]
    fn save_reports_placeholder() -> Result<()> {
        let mut shell = CliShell::new();
        let message = shell.save(&seeded_questionnaire().answers())?;
        assert_eq!(message, SAVE_UNAVAILABLE);
        Ok(())
    }
}
