//! Unknown subcommands: report them and suggest the closest known one.

use wpr_core::suggest::DistanceDictionary;

use crate::output::{CliError, OutputMode, fail};

/// Every subcommand name, in the order suggestions prefer on ties.
pub static COMMAND_NAMES: [&str; 10] = [
    "weekly",
    "summary",
    "today",
    "daily",
    "memo",
    "set-memo",
    "add",
    "complete",
    "groups",
    "completions",
];

/// Closest command name, if it is close enough to be a plausible typo.
///
/// A candidate must be fewer edits away than the input is long, so that
/// arbitrary words do not produce suggestions.
pub fn suggest(input: &str) -> Option<&'static str> {
    let dict = DistanceDictionary::levenshtein(&COMMAND_NAMES);
    dict.nearest_with_distance(input)
        .filter(|&(_, distance)| distance < input.chars().count())
        .map(|(name, _)| name)
}

pub fn run_unknown(args: &[String], output: OutputMode) -> anyhow::Error {
    let name = args.first().map_or("", String::as_str);
    let mut error = CliError::new(format!("unknown command '{name}'"));
    if let Some(candidate) = suggest(name) {
        error = error.with_suggestion(format!("did you mean '{candidate}'?"));
    }
    fail(output, &error)
}
