use std::io::{self, BufRead, Write};
use std::ops::ControlFlow;

use anyhow::{Context, Result, anyhow};
use countryguessr_core::{Country, GuessError, GuessOutcome, RoundController};

const MAX_LISTED_SUGGESTIONS: usize = 10;

pub fn run(round: &mut RoundController) -> Result<()> {
    print_intro(round);
    print_flag(round.target());
    let stdin = io::stdin();

    loop {
        print!("guess> ");
        io::stdout().flush().context("failed to flush the prompt")?;

        let mut line = String::new();
        let bytes = stdin
            .lock()
            .read_line(&mut line)
            .context("failed to read input")?;

        if bytes == 0 {
            println!("End of input, goodbye.");
            return Ok(());
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match dispatch_command(round, trimmed) {
            Ok(ControlFlow::Break(())) => return Ok(()),
            Ok(ControlFlow::Continue(())) => {}
            Err(error) => println!("Error: {error}"),
        }
    }
}

fn dispatch_command(round: &mut RoundController, input: &str) -> Result<ControlFlow<()>> {
    match input.to_ascii_lowercase().as_str() {
        "help" => {
            print_help();
            return Ok(ControlFlow::Continue(()));
        }
        "quit" | "exit" => {
            println!("Goodbye.");
            return Ok(ControlFlow::Break(()));
        }
        _ => {}
    }

    if let Some(query) = input.strip_prefix('?') {
        round.update_query(query.trim_start());
        print_suggestions(round);
    } else if let Some(index) = input.strip_prefix('#') {
        let name = pick_suggestion(round, index)?;
        round.select_suggestion(&name);
        submit(round, &name);
    } else {
        submit(round, input);
    }
    Ok(ControlFlow::Continue(()))
}

fn submit(round: &mut RoundController, guess: &str) {
    match round.submit_guess(guess) {
        Ok(GuessOutcome::Correct { solved }) => {
            println!("Correct! It was {solved}.");
            println!();
            print_flag(round.target());
        }
        Ok(GuessOutcome::Incorrect(result)) => {
            println!("Incorrect. {:.0}km away.", result.distance_km.round());
            if let (Some(bearing), Some(compass)) = (result.bearing_degrees, result.compass()) {
                println!("Bearing {bearing:.2}º {} ({compass})", compass.arrow());
            }
        }
        Err(GuessError::UnknownCountry { guess }) => {
            println!("'{guess}' is not a country I know. Try ?{guess} for suggestions.");
        }
    }
}

fn pick_suggestion(round: &RoundController, token: &str) -> Result<String> {
    let position: usize = token
        .trim()
        .parse()
        .map_err(|_| anyhow!("expected a suggestion number after '#', got '{token}'"))?;
    position
        .checked_sub(1)
        .and_then(|idx| round.suggestions().get(idx))
        .cloned()
        .ok_or_else(|| anyhow!("no suggestion #{position}; list suggestions with ?<text> first"))
}

fn print_intro(round: &RoundController) {
    println!("Country Guessr");
    println!("{} countries in play.", round.catalog().len());
    println!("Type a country name to guess, ?<text> for suggestions, help for commands.");
    println!();
}

fn print_help() {
    println!("Commands:");
    println!("  <country>      submit a guess");
    println!("  ?<text>        list countries whose name contains <text>");
    println!("  #<n>           guess the n-th listed suggestion");
    println!("  help           show this list");
    println!("  quit           leave the game");
}

fn print_flag(country: &Country) {
    println!(
        "Which country flies this flag?  {}  [{}]",
        flag_emoji(&country.code),
        country.code
    );
}

/// Lists suggestions whether or not the panel is open; `?` is an explicit request.
fn print_suggestions(round: &RoundController) {
    let mut stdout = io::stdout().lock();
    if let Err(error) = write_suggestions(&mut stdout, round.suggestions()) {
        tracing::warn!(%error, "failed to print suggestions");
    }
}

fn write_suggestions<W: Write>(out: &mut W, suggestions: &[String]) -> io::Result<()> {
    if suggestions.is_empty() {
        return writeln!(out, "No matching countries.");
    }
    for (idx, name) in suggestions.iter().take(MAX_LISTED_SUGGESTIONS).enumerate() {
        writeln!(out, "{:>3}. {}", idx + 1, name)?;
    }
    if suggestions.len() > MAX_LISTED_SUGGESTIONS {
        writeln!(
            out,
            "     ... and {} more",
            suggestions.len() - MAX_LISTED_SUGGESTIONS
        )?;
    }
    Ok(())
}

/// Regional-indicator pair for a two-letter country code.
fn flag_emoji(code: &str) -> String {
    code.chars()
        .filter(|c| c.is_ascii_alphabetic())
        .filter_map(|c| char::from_u32(0x1F1E6 + (c.to_ascii_uppercase() as u32 - 'A' as u32)))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use countryguessr_core::Catalog;

    use super::*;

    fn sample_round() -> RoundController {
        let catalog = Catalog::from_slice(
            br#"[
            {
                "country": "France",
                "countryCode": "FR",
                "countryCode3": "FRA",
                "numericCode": 250,
                "latitude": 46.2276,
                "longitude": 2.2137
            },
            {
                "country": "Finland",
                "countryCode": "FI",
                "countryCode3": "FIN",
                "numericCode": 246,
                "latitude": 61.9241,
                "longitude": 25.7482
            }
        ]"#,
        )
        .unwrap();
        RoundController::with_seed(Arc::new(catalog), 3)
    }

    #[test]
    fn flag_emoji_uses_regional_indicators() {
        assert_eq!(flag_emoji("fr"), "\u{1F1EB}\u{1F1F7}");
        assert_eq!(flag_emoji("DE"), "\u{1F1E9}\u{1F1EA}");
    }

    #[test]
    fn suggestion_numbers_are_one_based() {
        let mut round = sample_round();
        round.update_query("f");
        assert_eq!(pick_suggestion(&round, "2").unwrap(), "Finland");
        assert!(pick_suggestion(&round, "0").is_err());
        assert!(pick_suggestion(&round, "3").is_err());
        assert!(pick_suggestion(&round, "x").is_err());
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut round = sample_round();
        assert_eq!(
            dispatch_command(&mut round, "QUIT").unwrap(),
            ControlFlow::Break(())
        );
        assert_eq!(
            dispatch_command(&mut round, "?fi").unwrap(),
            ControlFlow::Continue(())
        );
        assert_eq!(round.suggestions(), ["Finland"]);
    }

    #[test]
    fn picking_a_suggestion_submits_it() {
        let mut round = sample_round();
        let answer = round.target().name.clone();
        dispatch_command(&mut round, "?").unwrap();
        let position = round
            .suggestions()
            .iter()
            .position(|name| *name == answer)
            .unwrap()
            + 1;
        dispatch_command(&mut round, &format!("#{position}")).unwrap();
        assert!(round.is_round_over());
    }

    #[test]
    fn bare_query_after_a_correct_guess_lists_everything() {
        let mut round = sample_round();
        let answer = round.target().name.clone();
        dispatch_command(&mut round, &answer).unwrap();
        assert!(round.is_round_over());

        dispatch_command(&mut round, "?").unwrap();
        assert_eq!(round.suggestions(), ["France", "Finland"]);

        let mut out = Vec::new();
        write_suggestions(&mut out, round.suggestions()).unwrap();
        let listing = String::from_utf8(out).unwrap();
        assert_eq!(listing, "  1. France\n  2. Finland\n");
    }

    #[test]
    fn long_listings_are_truncated() {
        let names: Vec<String> = (0..13).map(|idx| format!("Country {idx}")).collect();
        let mut out = Vec::new();
        write_suggestions(&mut out, &names).unwrap();
        let listing = String::from_utf8(out).unwrap();
        assert!(listing.contains(" 10. Country 9\n"));
        assert!(!listing.contains("Country 10"));
        assert!(listing.ends_with("... and 3 more\n"));
    }

    #[test]
    fn empty_listing_says_so() {
        let mut out = Vec::new();
        write_suggestions(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No matching countries.\n");
    }
}
