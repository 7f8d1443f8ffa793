//! # Shruti - Sa practice viewer
//!
//! Desktop front end for the shruti analysis core. It loads a pitch track
//! written by an external extractor, analyses it against the chosen tonic
//! and shows the contour trace, deviation meter, swara strip and critique.
//!
//! ## Architecture
//! - **Main Thread**: Iced GUI application with dark theme
//! - **Worker Thread**: One short-lived thread per analysis run
//! - **Communication**: Crossbeam channel carrying finished outcomes back
//! - **Updates**: Timer subscription polls the channel

mod ui;

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, Sender};
use iced::{Element, Subscription, Theme};
use shruti_core::feedback::quick_verdict;
use shruti_core::{analyze_track, AnalysisConfig, AnalysisError, AnalysisResult, FeedbackService, PitchTrack};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use ui::main_display::create_main_view;

/// Optional analysis configuration read at startup from the working directory.
const CONFIG_FILE: &str = "shruti.json";

/// How often the worker channel is polled.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Main entry point for the Shruti viewer.
///
/// An optional first argument names a pitch track to analyse right away.
pub fn main() -> iced::Result {
    env_logger::init();
    log::info!("Starting Shruti viewer...");
    let result = iced::application("Shruti", ShrutiApp::update, ShrutiApp::view)
        .subscription(ShrutiApp::subscription)
        .theme(ShrutiApp::theme)
        .run();
    log::info!("Application finished with result: {:?}", result);
    result
}

/// Application message types for the Iced GUI framework.
#[derive(Debug, Clone)]
pub enum Message {
    // Inputs
    TrackPathChanged(String),
    TonicChanged(String),
    AnalyzeClicked,

    // Swara strip interaction
    SwaraSelected(usize), // Table index of the clicked swara

    // Working tool visibility toggles
    ToggleContour,
    ToggleMeter,
    ToggleSwaraStrip,
    ToggleSummary,

    // Timer tick for polling the worker
    Tick,
}

/// What a finished analysis run hands back to the GUI thread.
#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    Analyzed {
        result: AnalysisResult,
        verdict: String,
        feedback: String,
    },
    /// Nothing voiced and confident enough was found
    NoVoice,
    /// The track could not be read or the input was rejected
    Failed(String),
}

/// Progress of the current analysis run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunState {
    Idle,
    Running,
    Done,
}

/// UI-specific data needed for rendering the interface.
#[derive(Debug, Clone)]
pub struct AppDisplayData {
    // Inputs
    pub track_path: String,
    pub tonic_input: String,

    // Analysis state
    pub run_state: RunState,
    pub outcome: Option<AnalysisOutcome>,
    pub selected_swara: Option<usize>,

    // UI visibility states
    pub contour_visible: bool,
    pub meter_visible: bool,
    pub swara_strip_visible: bool,
    pub summary_visible: bool,
}

impl AppDisplayData {
    /// The successful result, if the last run produced one.
    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.outcome {
            Some(AnalysisOutcome::Analyzed { result, .. }) => Some(result),
            _ => None,
        }
    }
}

/// Main application state for the Shruti viewer.
#[derive(Debug)]
struct ShrutiApp {
    // Configuration the tonic field is layered over
    base_config: AnalysisConfig,

    // Worker communication
    outcome_sender: Sender<AnalysisOutcome>,
    outcome_receiver: Receiver<AnalysisOutcome>,

    // Single source of truth for all display data
    display_data: AppDisplayData,
}

impl Default for ShrutiApp {
    /// Creates the app, reading `shruti.json` if present and starting an
    /// analysis when a track path was given on the command line.
    fn default() -> Self {
        let base_config = load_base_config(Path::new(CONFIG_FILE));
        let (outcome_sender, outcome_receiver) = crossbeam_channel::unbounded();
        let track_path = std::env::args().nth(1).unwrap_or_default();

        let mut app = Self {
            outcome_sender,
            outcome_receiver,
            display_data: AppDisplayData {
                track_path,
                tonic_input: format!("{:.2}", base_config.tonic_hz),
                run_state: RunState::Idle,
                outcome: None,
                selected_swara: None,
                contour_visible: true,
                meter_visible: true,
                swara_strip_visible: true,
                summary_visible: true,
            },
            base_config,
        };

        if !app.display_data.track_path.is_empty() {
            app.start_analysis();
        }
        app
    }
}

impl ShrutiApp {
    /// Spawns a worker that loads the track, analyses it and sends the outcome back.
    fn start_analysis(&mut self) {
        if self.display_data.run_state == RunState::Running {
            return;
        }

        let tonic_hz = match self.display_data.tonic_input.trim().parse::<f32>() {
            Ok(hz) => hz,
            Err(_) => {
                self.display_data.outcome = Some(AnalysisOutcome::Failed(format!(
                    "Tonic must be a frequency in Hz, got \"{}\"",
                    self.display_data.tonic_input
                )));
                self.display_data.run_state = RunState::Done;
                return;
            }
        };

        let config = AnalysisConfig {
            tonic_hz,
            ..self.base_config.clone()
        };
        let path = PathBuf::from(self.display_data.track_path.trim());
        let sender = self.outcome_sender.clone();

        log::info!("Analysing {} with tonic {:.2} Hz", path.display(), tonic_hz);
        self.display_data.run_state = RunState::Running;

        thread::spawn(move || {
            let outcome = run_analysis(&path, &config, &FeedbackService::rule_based());
            if sender.send(outcome).is_err() {
                log::warn!("GUI went away before the analysis finished");
            }
        });
    }

    /// Handles application state updates based on incoming messages.
    fn update(&mut self, message: Message) {
        log::trace!("Received message: {:?}", message);

        match message {
            Message::TrackPathChanged(path) => {
                self.display_data.track_path = path;
            }
            Message::TonicChanged(tonic) => {
                self.display_data.tonic_input = tonic;
            }
            Message::AnalyzeClicked => {
                self.start_analysis();
            }
            Message::SwaraSelected(index) => {
                // Clicking the selected swara again clears the reference line
                self.display_data.selected_swara = if self.display_data.selected_swara == Some(index) {
                    None
                } else {
                    Some(index)
                };
            }
            Message::ToggleContour => {
                self.display_data.contour_visible = !self.display_data.contour_visible;
            }
            Message::ToggleMeter => {
                self.display_data.meter_visible = !self.display_data.meter_visible;
            }
            Message::ToggleSwaraStrip => {
                self.display_data.swara_strip_visible = !self.display_data.swara_strip_visible;
            }
            Message::ToggleSummary => {
                self.display_data.summary_visible = !self.display_data.summary_visible;
            }
            Message::Tick => {
                while let Ok(outcome) = self.outcome_receiver.try_recv() {
                    self.process_outcome(outcome);
                }
            }
        }
    }

    /// Stores a finished outcome for display.
    fn process_outcome(&mut self, outcome: AnalysisOutcome) {
        match &outcome {
            AnalysisOutcome::Analyzed { result, .. } => log::info!(
                "Analysis done: sang {}, deviation {:.1}, stability {:.1}",
                result.detected_swara,
                result.deviation,
                result.stability
            ),
            AnalysisOutcome::NoVoice => log::info!("Analysis done: no voice detected"),
            AnalysisOutcome::Failed(msg) => log::warn!("Analysis failed: {}", msg),
        }
        self.display_data.outcome = Some(outcome);
        self.display_data.run_state = RunState::Done;
    }

    fn view(&self) -> Element<'_, Message> {
        create_main_view(&self.display_data)
    }

    fn subscription(&self) -> Subscription<Message> {
        iced::time::every(POLL_INTERVAL).map(|_| Message::Tick)
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Reads the startup configuration, falling back to defaults.
fn load_base_config(path: &Path) -> AnalysisConfig {
    if !path.exists() {
        return AnalysisConfig::default();
    }
    match AnalysisConfig::load(path) {
        Ok(config) => {
            log::info!("Using analysis config from {}", path.display());
            config
        }
        Err(e) => {
            log::warn!("Ignoring {}: {}", path.display(), e);
            AnalysisConfig::default()
        }
    }
}

/// Loads a pitch track written as JSON.
fn load_track(path: &Path) -> Result<PitchTrack> {
    let data = fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    let track = serde_json::from_str(&data)
        .with_context(|| format!("{} is not a pitch track", path.display()))?;
    Ok(track)
}

/// Runs the whole pipeline for one file; always produces an outcome.
fn run_analysis(path: &Path, config: &AnalysisConfig, service: &FeedbackService) -> AnalysisOutcome {
    let track = match load_track(path) {
        Ok(track) => track,
        Err(e) => return AnalysisOutcome::Failed(format!("{:#}", e)),
    };

    match analyze_track(&track, config) {
        Ok(result) => {
            let feedback = service.feedback(&result.feedback_request());
            let verdict = quick_verdict(&result.target_swara, result.deviation);
            AnalysisOutcome::Analyzed {
                result,
                verdict,
                feedback,
            }
        }
        Err(AnalysisError::NoVoiceDetected) => AnalysisOutcome::NoVoice,
        Err(e) => AnalysisOutcome::Failed(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("shruti-gui-{}-{}", std::process::id(), name));
        fs::write(&path, contents).expect("temp file should be writable");
        path
    }

    #[test]
    fn test_run_analysis_on_tonic() {
        let path = write_temp(
            "tonic.json",
            r#"{ "frequencies": [261.63, 261.63, null], "voiced": [true, true, false], "confidences": [0.9, 0.95, 0.0] }"#,
        );
        let outcome = run_analysis(&path, &AnalysisConfig::default(), &FeedbackService::rule_based());
        match outcome {
            AnalysisOutcome::Analyzed { result, verdict, feedback } => {
                assert_eq!(result.detected_swara, "Sa");
                assert!(verdict.starts_with("Excellent!"));
                assert!(feedback.starts_with("Beautiful Sa!"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_run_analysis_silent_track() {
        let path = write_temp(
            "silent.json",
            r#"{ "frequencies": [null, null], "voiced": [false, false], "confidences": [0.1, 0.2] }"#,
        );
        let outcome = run_analysis(&path, &AnalysisConfig::default(), &FeedbackService::rule_based());
        assert!(matches!(outcome, AnalysisOutcome::NoVoice));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_run_analysis_missing_file() {
        let outcome = run_analysis(
            Path::new("/no/such/track.json"),
            &AnalysisConfig::default(),
            &FeedbackService::rule_based(),
        );
        match outcome {
            AnalysisOutcome::Failed(msg) => assert!(msg.contains("cannot read")),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let config = load_base_config(Path::new("/no/such/shruti.json"));
        assert_eq!(config, AnalysisConfig::default());
    }
}
