//! Deterministic, template-driven critique.
//!
//! A pure function of `(swara, deviation, stability, FeedbackContext)`: no
//! randomness, no I/O, same input gives byte-identical text.

use serde::Serialize;

use super::bands::{AccuracyBand, DetailBand, QuickVerdict};
use super::features::FeedbackContext;
use super::generator::{FeedbackError, FeedbackGenerator};
use super::request::FeedbackRequest;

/// A composed critique together with the bands that selected it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Critique {
    /// Opening-line classification (10/20/35)
    pub accuracy: AccuracyBand,
    /// Paragraph classification (15/30)
    pub detail: DetailBand,
    /// One-sentence opening for headlines and prompts
    pub opening_line: String,
    /// The full critique
    pub text: String,
}

/// Builds the critique for one analysed note.
pub fn compose_critique(
    swara: &str,
    deviation: f32,
    stability: f32,
    context: &FeedbackContext,
) -> Critique {
    let accuracy = AccuracyBand::classify(deviation);
    let detail = DetailBand::classify(deviation);

    let text = match detail {
        DetailBand::OnShruti => on_shruti_paragraph(swara, stability, context),
        DetailBand::Close => close_paragraph(swara, context),
        DetailBand::FarOff => far_off_paragraph(swara, context),
    };

    Critique {
        accuracy,
        detail,
        opening_line: accuracy.opening_line(swara),
        text,
    }
}

/// The one-line verdict for displays that have no room for a paragraph.
pub fn quick_verdict(swara: &str, deviation: f32) -> String {
    QuickVerdict::classify(deviation).sentence(swara)
}

fn on_shruti_paragraph(swara: &str, stability: f32, context: &FeedbackContext) -> String {
    let mut text = format!("Beautiful {}! Your pitch was right on the shruti. ", swara);

    if stability < 10.0 {
        text.push_str(
            "You started strong and held it perfectly steady throughout - your voice didn't waver even a bit. \
             That shows excellent breath control and pitch awareness. ",
        );
    } else if let Some(drift) = context.drift {
        text.push_str(&format!(
            "You came in perfectly, but {}. Next time, imagine the shruti as a fixed point and keep your voice \
             locked onto it from beginning to end. ",
            drift.sentence().to_lowercase()
        ));
    } else {
        text.push_str("Your pitch was clean and confident from start to finish. ");
    }

    text.push_str("Keep practicing like this!");
    text
}

fn close_paragraph(swara: &str, context: &FeedbackContext) -> String {
    let mut text = format!("Your {} was in the right area but went off the shruti. ", swara);

    if let Some(drift) = context.drift {
        text.push_str(&format!(
            "I noticed that {}. This usually happens when you lose focus on the tanpura - try to keep listening \
             to it throughout the note. ",
            drift.sentence().to_lowercase()
        ));
    } else if let Some(wobble) = context.wobble {
        text.push_str(&format!("{}. This often means uneven breath support. ", wobble.sentence()));
    } else {
        text.push_str("You started close but your pitch wandered away from the target. ");
    }

    if let Some(timing) = context.timing_sentence() {
        text.push_str(&format!("{}. ", timing));
    }

    text.push_str(
        "Practice holding the note for at least 3-4 seconds while keeping your voice steady and matching \
         the tanpura exactly.",
    );
    text
}

fn far_off_paragraph(swara: &str, context: &FeedbackContext) -> String {
    let mut text = format!(
        "Your {} didn't land on the shruti - I could hear it was quite far off. ",
        swara
    );

    let observations = context.observations();
    match observations.first() {
        Some(first) => text.push_str(&format!("{}. ", first)),
        None => text.push_str("The pitch wasn't stable and it didn't match the tanpura. "),
    }

    // Never repeat the drift sentence if it already led
    if let Some(drift) = context.drift {
        if observations.first() != Some(&drift.sentence()) {
            text.push_str(&format!("Additionally, {}. ", drift.sentence().to_lowercase()));
        }
    }

    text.push_str(&format!(
        "Let's break this down: First, listen carefully to the tanpura and hum the {} until you can match it \
         perfectly. Then, practice singing that same pitch with an open voice. Start very slowly - accuracy is \
         more important than anything else right now.",
        swara
    ));
    text
}

/// The built-in generator: always available, never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedFeedback;

impl RuleBasedFeedback {
    pub fn critique(&self, request: &FeedbackRequest) -> Critique {
        let context = request.context();
        compose_critique(&request.swara, request.deviation, request.stability, &context)
    }
}

impl FeedbackGenerator for RuleBasedFeedback {
    fn generate(&self, request: &FeedbackRequest) -> Result<String, FeedbackError> {
        Ok(self.critique(request).text)
    }
}
