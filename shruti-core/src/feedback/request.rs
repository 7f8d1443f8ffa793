//! What a critique generator is given, and the prompt rendered from it.

use serde::Serialize;

use super::bands::AccuracyBand;
use super::features::FeedbackContext;
use crate::AnalysisResult;

/// Everything a generator may look at: the typed result, never raw frames.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackRequest {
    /// Swara the singer was asked to hold
    pub swara: String,
    /// Signed deviation from the target in cents
    pub deviation: f32,
    /// Standard deviation of the contour in cents
    pub stability: f32,
    /// Sampled contour, folded cents
    pub contour: Vec<f32>,
    /// Time axis aligned with `contour`
    pub times: Vec<f32>,
}

impl FeedbackRequest {
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self {
            swara: result.target_swara.clone(),
            deviation: result.deviation,
            stability: result.stability,
            contour: result.pitch_contour.clone(),
            times: result.time_points.clone(),
        }
    }

    /// Re-derives contour features for this request.
    pub fn context(&self) -> FeedbackContext {
        FeedbackContext::extract(&self.contour, &self.times, self.stability)
    }

    /// Instruction text for an external language model.
    ///
    /// Carries the same observations the rule-based engine uses, phrased
    /// without technical units so the model does not echo them back.
    pub fn prompt(&self) -> String {
        let band = AccuracyBand::classify(self.deviation);
        let context = self.context();
        let observations = context.observations();
        let direction = context.trend_sentence().unwrap_or("Held level throughout");
        let heard = if observations.is_empty() {
            "Clean, steady singing".to_string()
        } else {
            observations.join(". ")
        };

        format!(
            "You are an experienced Carnatic music teacher giving a lesson in person. \
             The student just sang {swara}.\n\
             \n\
             What you heard:\n\
             - The swara was {accuracy}\n\
             - Observations: {heard}\n\
             - Overall direction: {direction}\n\
             - Skill level: {skill}\n\
             \n\
             Speak warmly and honestly, like a real teacher. Never mention cents, Hz, \
             deviation or any other measurement; describe what you heard in everyday words.\n\
             \n\
             Structure your reply as:\n\
             1. One opening sentence, for example: \"{opening}\".\n\
             2. Two or three sentences on how the note started, how it was held in the \
             middle and how it ended.\n\
             3. One specific practice tip the student can do today.\n\
             \n\
             Keep it personal (use \"you\"), conversational, and between 5 and 7 sentences.",
            swara = self.swara,
            accuracy = band.accuracy_phrase(),
            heard = heard,
            direction = direction,
            skill = band.skill_level(),
            opening = band.opening_line(&self.swara),
        )
    }
}
