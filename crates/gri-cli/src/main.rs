// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use gri_app::{EnergyQuestionnaire, PageState};
use runtime::CliShell;
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1))?;
    if options.action == Action::Help {
        print!("{}", help_text());
        return Ok(());
    }

    let config_path = match options.config_path {
        Some(path) => path,
        None => Config::default_path()?,
    };
    match options.action {
        Action::PrintConfigPath => {
            println!("{}", config_path.display());
            return Ok(());
        }
        Action::PrintExampleConfig => {
            print!("{}", Config::example_config(&config_path));
            return Ok(());
        }
        Action::Run | Action::Check | Action::PrintAnswers | Action::Help => {}
    }

    let config = Config::load(&config_path).with_context(|| {
        format!(
            "load config {}; run `gri --print-example-config` to generate a v1 template",
            config_path.display()
        )
    })?;

    let mut questionnaire = EnergyQuestionnaire::seeded(&config.seed());
    match options.action {
        Action::PrintAnswers => {
            let json = serde_json::to_string_pretty(&questionnaire.answers())
                .context("encode answers as JSON")?;
            println!("{json}");
            Ok(())
        }
        Action::Check => Ok(()),
        _ => {
            let mut state = PageState {
                active_section: config.start_section(),
                ..PageState::default()
            };
            let mut shell = CliShell::new();
            gri_tui::run_app(&mut state, &mut questionnaire, &mut shell)
        }
    }
}

/// What one invocation does. Everything except `Run` exits right away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Action {
    #[default]
    Run,
    Help,
    PrintConfigPath,
    PrintExampleConfig,
    PrintAnswers,
    Check,
}

impl Action {
    const FLAGS: [(Self, &'static str, &'static str); 5] = [
        (Self::PrintConfigPath, "--print-config-path", "print the resolved config path"),
        (
            Self::PrintExampleConfig,
            "--print-example-config",
            "print a v1 config template",
        ),
        (
            Self::PrintAnswers,
            "--print-answers",
            "print the seeded answers as JSON",
        ),
        (Self::Check, "--check", "validate config and seed data"),
        (Self::Help, "--help", "show this help (also -h)"),
    ];

    fn from_flag(flag: &str) -> Option<Self> {
        if flag == "-h" {
            return Some(Self::Help);
        }
        Self::FLAGS
            .iter()
            .find(|(_, name, _)| *name == flag)
            .map(|(action, _, _)| *action)
    }

    fn flag(self) -> &'static str {
        Self::FLAGS
            .iter()
            .find(|(action, _, _)| *action == self)
            .map_or("", |(_, name, _)| *name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct CliOptions {
    /// `None` resolves through `GRI_CONFIG_PATH` or the platform config dir.
    config_path: Option<PathBuf>,
    action: Action,
}

fn parse_cli_args<I, S>(args: I) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let arg = arg.as_ref();
        if let Some(path) = arg.strip_prefix("--config=") {
            options.config_path = Some(config_value(path)?);
            continue;
        }
        if arg == "--config" {
            let path = args.next().ok_or_else(|| anyhow!("--config requires a file path"))?;
            options.config_path = Some(config_value(path.as_ref())?);
            continue;
        }

        let Some(action) = Action::from_flag(arg) else {
            bail!("unknown argument {arg:?}; run `gri --help` to list options");
        };
        if options.action != Action::Run && options.action != action {
            bail!(
                "{} cannot be combined with {}; pass one of them",
                action.flag(),
                options.action.flag()
            );
        }
        options.action = action;
    }
    Ok(options)
}

fn config_value(raw: &str) -> Result<PathBuf> {
    if raw.trim().is_empty() {
        bail!("--config requires a file path");
    }
    Ok(PathBuf::from(raw))
}

fn help_text() -> String {
    let mut text = String::from(
        "gri: GRI 302 energy disclosure questionnaire\n\nusage: gri [--config <path>] [action]\n\n",
    );
    text.push_str(&format!("  {:<24} {}\n", "--config <path>", "use a specific config file"));
    for (_, flag, description) in Action::FLAGS {
        text.push_str(&format!("  {flag:<24} {description}\n"));
    }
    text.push_str("\nWith no action, the questionnaire opens in the terminal.\n");
    text
}
