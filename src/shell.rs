//! Interactive exploration over stdin. Each filter change recomputes the view.

use crate::render;
use analytics::DashboardSession;
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use configuration::settings::Config;
use core_types::{parse_date, Dimension};
use exporter::CsvExporter;
use std::io::{self, BufRead, Write};

const HELP: &str = "\
Commands:
  select <dimension> <v1,v2,..>   restrict platform, gender, category or source
  select <dimension> *            every observed value again
  range <start|-> <end|->         ROAS-over-time bounds; '-' keeps the observed bound
  reset                           default selection and date range
  show                            print the full dashboard
  export csv|pdf                  write an artifact to the output directory
  options                         list observed filter values
  help                            this message
  quit                            leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    Select(Dimension, Vec<String>),
    SelectObserved(Dimension),
    Range(Option<NaiveDate>, Option<NaiveDate>),
    Reset,
    Show,
    Export(Artifact),
    Options,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Artifact {
    Csv,
    Pdf,
}

fn parse_bound(raw: &str) -> Result<Option<NaiveDate>> {
    if raw == "-" {
        return Ok(None);
    }
    match parse_date(raw) {
        Some(date) => Ok(Some(date)),
        None => bail!("'{raw}' is not a date"),
    }
}

fn parse_command(line: &str) -> Result<ShellCommand> {
    let line = line.trim();
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match verb.to_lowercase().as_str() {
        "select" => {
            let (dimension, values) = rest
                .split_once(char::is_whitespace)
                .context("usage: select <dimension> <v1,v2,..>")?;
            let dimension: Dimension = dimension.parse()?;
            let values = values.trim();
            if values == "*" {
                ShellCommand::SelectObserved(dimension)
            } else {
                let values = values
                    .split(',')
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
                    .collect();
                ShellCommand::Select(dimension, values)
            }
        }
        "range" => {
            let bounds: Vec<&str> = rest.split_whitespace().collect();
            let [start, end] = bounds.as_slice() else {
                bail!("usage: range <start|-> <end|->");
            };
            ShellCommand::Range(parse_bound(start)?, parse_bound(end)?)
        }
        "reset" => ShellCommand::Reset,
        "show" => ShellCommand::Show,
        "export" => match rest.to_lowercase().as_str() {
            "csv" => ShellCommand::Export(Artifact::Csv),
            "pdf" => ShellCommand::Export(Artifact::Pdf),
            _ => bail!("usage: export csv|pdf"),
        },
        "options" => ShellCommand::Options,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => bail!("unknown command '{other}' (try 'help')"),
    };
    Ok(command)
}

/// Runs the shell until `quit` or end of input.
pub fn run(mut session: DashboardSession, config: &Config) -> Result<()> {
    // One exporter for the whole session so repeated exports reuse the cache.
    let mut exporter = CsvExporter::new();
    let currency = config.report.currency_label.as_str();

    println!("{HELP}\n");
    let view = session.view();
    render::print_summary(&view.summary, view.filtered_rows, currency);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("roi> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read from stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match command {
            ShellCommand::Select(dimension, values) => session.select(dimension, values),
            ShellCommand::SelectObserved(dimension) => session.select_observed(dimension),
            ShellCommand::Range(start, end) => {
                if let Err(e) = session.set_date_range(start, end) {
                    println!("{e}");
                    continue;
                }
            }
            ShellCommand::Reset => session.reset(),
            ShellCommand::Show => {
                render::print_dashboard(&session.view(), currency);
                continue;
            }
            ShellCommand::Export(artifact) => {
                export(&session, &mut exporter, artifact, config);
                continue;
            }
            ShellCommand::Options => {
                render::print_options(session.options(), session.observed_range());
                continue;
            }
            ShellCommand::Help => {
                println!("{HELP}");
                continue;
            }
            ShellCommand::Quit => break,
        }

        let view = session.view();
        println!("Filters: {}", render::describe_predicate(&view.predicate));
        println!("Date range: {}", render::describe_range(view.date_range));
        render::print_summary(&view.summary, view.filtered_rows, currency);
    }
    Ok(())
}

/// Export failures are reported and the shell keeps running.
fn export(session: &DashboardSession, exporter: &mut CsvExporter, artifact: Artifact, config: &Config) {
    let out_dir = config.output.dir.as_path();
    let result = match artifact {
        Artifact::Csv => crate::export_csv(session, exporter, out_dir, config),
        Artifact::Pdf => crate::export_pdf(session, out_dir, config),
    };
    match result {
        Ok(path) => println!("Wrote {}", path.display()),
        Err(e) => {
            tracing::error!(error = %e, "Export failed.");
            println!("Export failed: {e:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn select_splits_and_trims_values() {
        let command = parse_command("select platform Instagram, YouTube ,").unwrap();
        assert_eq!(
            command,
            ShellCommand::Select(
                Dimension::Platform,
                vec!["Instagram".to_string(), "YouTube".to_string()]
            )
        );
    }

    #[test]
    fn select_accepts_brand_alias_and_star() {
        assert_eq!(
            parse_command("select brand *").unwrap(),
            ShellCommand::SelectObserved(Dimension::Source)
        );
    }

    #[test]
    fn select_rejects_unknown_dimension() {
        assert!(parse_command("select country IN").is_err());
        assert!(parse_command("select platform").is_err());
    }

    #[test]
    fn range_accepts_open_bounds() {
        assert_eq!(
            parse_command("range 2024-01-01 -").unwrap(),
            ShellCommand::Range(Some(ymd(2024, 1, 1)), None)
        );
        assert!(parse_command("range 2024-01-01").is_err());
        assert!(parse_command("range soon later").is_err());
    }

    #[test]
    fn simple_verbs() {
        assert_eq!(parse_command("  SHOW ").unwrap(), ShellCommand::Show);
        assert_eq!(parse_command("export PDF").unwrap(), ShellCommand::Export(Artifact::Pdf));
        assert!(parse_command("export xlsx").is_err());
        assert_eq!(parse_command("exit").unwrap(), ShellCommand::Quit);
        assert!(parse_command("frobnicate").is_err());
    }
}
