use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use crate::catalog::{Catalog, Country, fold_name};
use crate::error::GuessError;
use crate::geodesy::{CompassPoint, bearing_degrees, distance_km};
use crate::suggestions::filter_suggestions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundOptions {
    /// Attach the bearing from the guessed country toward the target to
    /// every scored guess.
    pub report_bearing: bool,
}

impl Default for RoundOptions {
    fn default() -> Self {
        Self {
            report_bearing: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    AwaitingGuess,
    /// Set by a correct guess and consumed by the next input event.
    RoundOver,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuessResult {
    pub guessed: String,
    pub distance_km: f64,
    pub bearing_degrees: Option<f64>,
}

impl GuessResult {
    pub fn compass(&self) -> Option<CompassPoint> {
        self.bearing_degrees.map(CompassPoint::from_bearing)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GuessOutcome {
    Correct { solved: String },
    Incorrect(GuessResult),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RoundEvent {
    TargetChanged { code: String },
    SuggestionsChanged { suggestions: Vec<String>, visible: bool },
    GuessScored(GuessResult),
    GuessRejected { guess: String },
    RoundOver { solved: String },
}

pub trait RoundObserver {
    fn notify(&mut self, event: &RoundEvent);
}

impl<F> RoundObserver for F
where
    F: FnMut(&RoundEvent),
{
    fn notify(&mut self, event: &RoundEvent) {
        self(event)
    }
}

pub struct RoundController {
    catalog: Arc<Catalog>,
    rng: StdRng,
    options: RoundOptions,
    target: usize,
    guess_text: String,
    phase: RoundPhase,
    last_result: Option<GuessResult>,
    last_guess_unresolved: bool,
    suggestions: Vec<String>,
    suggestions_visible: bool,
    selected_suggestion: Option<String>,
    observers: Vec<Box<dyn RoundObserver>>,
}

impl RoundController {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_rng(catalog, StdRng::from_entropy())
    }

    pub fn with_seed(catalog: Arc<Catalog>, seed: u64) -> Self {
        Self::with_rng(catalog, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(catalog: Arc<Catalog>, rng: StdRng) -> Self {
        let mut controller = Self {
            catalog,
            rng,
            options: RoundOptions::default(),
            target: 0,
            guess_text: String::new(),
            phase: RoundPhase::AwaitingGuess,
            last_result: None,
            last_guess_unresolved: false,
            suggestions: Vec::new(),
            suggestions_visible: false,
            selected_suggestion: None,
            observers: Vec::new(),
        };
        controller.target = controller.draw_target();
        controller
    }

    pub fn with_options(mut self, options: RoundOptions) -> Self {
        self.options = options;
        self
    }

    pub fn subscribe<O>(&mut self, observer: O)
    where
        O: RoundObserver + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn options(&self) -> RoundOptions {
        self.options
    }

    pub fn target(&self) -> &Country {
        &self.catalog.countries()[self.target]
    }

    pub fn guess_text(&self) -> &str {
        &self.guess_text
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_round_over(&self) -> bool {
        self.phase == RoundPhase::RoundOver
    }

    pub fn last_result(&self) -> Option<&GuessResult> {
        self.last_result.as_ref()
    }

    pub fn last_guess_unresolved(&self) -> bool {
        self.last_guess_unresolved
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn suggestions_visible(&self) -> bool {
        self.suggestions_visible
    }

    /// Records the current input text and recomputes the suggestion list.
    ///
    /// The panel stays closed when the update only echoes a cleared field
    /// after a correct guess, or the suggestion that was just picked.
    pub fn update_query(&mut self, text: &str) -> &[String] {
        self.guess_text = text.to_string();
        self.suggestions = filter_suggestions(text, &self.catalog)
            .into_iter()
            .map(str::to_string)
            .collect();

        let echoes_round_over = self.phase == RoundPhase::RoundOver && text.is_empty();
        let echoes_selection = self.selected_suggestion.as_deref() == Some(text);
        self.phase = RoundPhase::AwaitingGuess;
        self.selected_suggestion = None;
        self.suggestions_visible = !(echoes_round_over || echoes_selection);

        self.emit(RoundEvent::SuggestionsChanged {
            suggestions: self.suggestions.clone(),
            visible: self.suggestions_visible,
        });
        &self.suggestions
    }

    /// Puts a picked suggestion into the input and closes the panel.
    pub fn select_suggestion(&mut self, name: &str) {
        self.guess_text = name.to_string();
        self.selected_suggestion = Some(name.to_string());
        self.suggestions_visible = false;
        self.emit(RoundEvent::SuggestionsChanged {
            suggestions: self.suggestions.clone(),
            visible: false,
        });
    }

    pub fn submit_guess(&mut self, text: &str) -> Result<GuessOutcome, GuessError> {
        let catalog = Arc::clone(&self.catalog);
        let target = &catalog.countries()[self.target];

        self.phase = RoundPhase::AwaitingGuess;
        self.guess_text = text.to_string();
        self.selected_suggestion = None;
        self.suggestions_visible = false;

        if fold_name(text.trim()) == fold_name(&target.name) {
            return Ok(self.finish_round(target));
        }

        let Some(guessed) = catalog.find_by_name(text) else {
            let guess = text.trim().to_string();
            debug!(%guess, "guess does not name a known country");
            self.last_guess_unresolved = true;
            self.emit(RoundEvent::GuessRejected {
                guess: guess.clone(),
            });
            return Err(GuessError::UnknownCountry { guess });
        };

        let result = GuessResult {
            guessed: guessed.name.clone(),
            distance_km: distance_km(guessed, target),
            bearing_degrees: self
                .options
                .report_bearing
                .then(|| bearing_degrees(guessed, target)),
        };
        debug!(
            guessed = %result.guessed,
            distance_km = result.distance_km,
            "scored incorrect guess"
        );
        self.last_result = Some(result.clone());
        self.last_guess_unresolved = false;
        self.emit(RoundEvent::GuessScored(result.clone()));
        Ok(GuessOutcome::Incorrect(result))
    }

    fn finish_round(&mut self, solved: &Country) -> GuessOutcome {
        let solved = solved.name.clone();
        self.phase = RoundPhase::RoundOver;
        self.last_result = None;
        self.last_guess_unresolved = false;
        self.guess_text.clear();
        self.suggestions.clear();
        self.emit(RoundEvent::RoundOver {
            solved: solved.clone(),
        });

        self.target = self.draw_target();
        let code = self.target().code.clone();
        self.emit(RoundEvent::TargetChanged { code });
        GuessOutcome::Correct { solved }
    }

    fn draw_target(&mut self) -> usize {
        let idx = self.rng.gen_range(0..self.catalog.len());
        debug!(index = idx, "drew new target");
        idx
    }

    fn emit(&mut self, event: RoundEvent) {
        for observer in &mut self.observers {
            observer.notify(&event);
        }
    }

    #[cfg(test)]
    fn set_target(&mut self, name: &str) {
        self.target = self
            .catalog
            .position_by_name(name)
            .expect("fixture country should exist");
    }
}
