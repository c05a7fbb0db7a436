// src/cli.rs
use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use std::{env, path::PathBuf};

use crate::infra::t;

pub mod commands;

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` argument.
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    args.iter()
        .position(|arg| arg == "--lang")
        .and_then(|pos| args.get(pos + 1))
        .cloned()
}

fn config_arg(locale: &str) -> Arg {
    Arg::new("config")
        .short('c')
        .long("config")
        .help(t!("arg.config", locale = locale).to_string())
        .value_name("CONFIG")
        .value_parser(clap::value_parser!(PathBuf))
        .action(ArgAction::Set)
}

fn html_arg(locale: &str) -> Arg {
    Arg::new("html")
        .long("html")
        .help(t!("arg.html", locale = locale).to_string())
        .value_name("HTML")
        .value_parser(clap::value_parser!(PathBuf))
        .action(ArgAction::Set)
}

fn suites_only_arg(locale: &str) -> Arg {
    Arg::new("suites-only")
        .long("suites-only")
        .help(t!("arg.suites_only", locale = locale).to_string())
        .action(ArgAction::SetTrue)
}

pub fn build_cli(locale: &str) -> Command {
    Command::new("suite-tally")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli.about", locale = locale).to_string())
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli.lang", locale = locale).to_string())
                .value_name("LANGUAGE")
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand(
            Command::new("render")
                .about(t!("cmd.render_about", locale = locale).to_string())
                .arg(
                    Arg::new("events")
                        .help(t!("arg.events", locale = locale).to_string())
                        .value_name("EVENTS")
                        .default_value("-")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(config_arg(locale))
                .arg(html_arg(locale))
                .arg(suites_only_arg(locale)),
        )
        .subcommand(
            Command::new("run")
                .about(t!("cmd.run_about", locale = locale).to_string())
                .arg(
                    Arg::new("command")
                        .help(t!("arg.command", locale = locale).to_string())
                        .value_name("COMMAND")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("project-dir")
                        .long("project-dir")
                        .help(t!("arg.project_dir", locale = locale).to_string())
                        .value_name("PROJECT_DIR")
                        .default_value(".")
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(config_arg(locale))
                .arg(html_arg(locale))
                .arg(suites_only_arg(locale)),
        )
        .subcommand(
            Command::new("init")
                .about(t!("cmd.init_about", locale = locale).to_string())
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help(t!("arg.output", locale = locale).to_string())
                        .value_name("OUTPUT")
                        .default_value(crate::core::config::DEFAULT_CONFIG_FILE)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .help(t!("arg.force", locale = locale).to_string())
                        .action(ArgAction::SetTrue),
                ),
        )
}

pub async fn run() -> Result<()> {
    // The explicit --lang wins; otherwise the locale detected at startup is used.
    let explicit_lang = pre_parse_language();
    if let Some(lang) = &explicit_lang {
        rust_i18n::set_locale(lang);
    }
    let language = rust_i18n::locale().to_string();

    let matches = build_cli(&language).get_matches();

    match matches.subcommand() {
        Some(("render", render_matches)) => {
            let events = render_matches
                .get_one::<PathBuf>("events")
                .cloned()
                .unwrap_or_else(|| PathBuf::from("-"));
            commands::render::execute(
                events,
                render_matches.get_one::<PathBuf>("config").cloned(),
                render_matches.get_one::<PathBuf>("html").cloned(),
                render_matches.get_flag("suites-only"),
                explicit_lang,
            )
            .await?;
        }
        Some(("run", run_matches)) => {
            let project_dir = run_matches
                .get_one::<PathBuf>("project-dir")
                .cloned()
                .unwrap_or_else(|| PathBuf::from("."));
            commands::run::execute(
                run_matches.get_one::<String>("command").cloned(),
                run_matches.get_one::<PathBuf>("config").cloned(),
                run_matches.get_one::<PathBuf>("html").cloned(),
                run_matches.get_flag("suites-only"),
                explicit_lang,
                project_dir,
            )
            .await?;
        }
        Some(("init", init_matches)) => {
            let output = init_matches
                .get_one::<PathBuf>("output")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(crate::core::config::DEFAULT_CONFIG_FILE));

            // Show language detection message if it was auto-detected
            if explicit_lang.is_none() {
                println!(
                    "{}",
                    t!("system_language_detected", locale = &language, lang = &language)
                );
            }
            commands::init::execute(output, init_matches.get_flag("force"), &language)?;
        }
        _ => {
            // Clap has already printed help for a missing subcommand.
        }
    }
    Ok(())
}
