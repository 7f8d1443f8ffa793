//! # Main Display Module
//!
//! This module contains the main display components and layout logic
//! for the Shruti practice viewer.

use iced::widget::{button, column, container, horizontal_space, row, text, text_input, Space};
use iced::{Alignment, Element, Length};
use shruti_core::swara::{swara_index, swara_table};

use super::{contour_plot, deviation_meter, metrics_display, swara_strip};
use crate::{AnalysisOutcome, AppDisplayData, Message, RunState};

/// Configuration for a single button in the tools sidebar
#[derive(Clone)]
struct ButtonConfig {
    label: &'static str,
    message: Message,
    /// Reads whether the panel this button toggles is showing
    is_active: fn(&AppDisplayData) -> bool,
}

const SETTINGS_CONFIG: &[(&str, &[ButtonConfig])] = &[(
    "Tools",
    &[
        ButtonConfig { label: "Contour", message: Message::ToggleContour, is_active: |d| d.contour_visible },
        ButtonConfig { label: "Deviation meter", message: Message::ToggleMeter, is_active: |d| d.meter_visible },
        ButtonConfig { label: "Swara strip", message: Message::ToggleSwaraStrip, is_active: |d| d.swara_strip_visible },
        ButtonConfig { label: "Summary", message: Message::ToggleSummary, is_active: |d| d.summary_visible },
    ],
)];

/// Creates the complete main application view
pub fn create_main_view(data: &AppDisplayData) -> Element<'static, Message> {
    log::trace!("Rendering main view");

    let title = text("Shruti").size(28);
    let inputs = create_input_row(data);
    let status = text(status_line(data)).size(14);

    let contour_panel = create_contour_panel(data);
    let meter_panel = create_meter_panel(data);
    let strip_panel = create_swara_strip_panel(data);
    let summary_panel = create_summary_panel(data);

    let sidebar = create_sidebar(data);

    // Build top row dynamically based on visibility
    let top_row = match (contour_panel, meter_panel) {
        (Some(c), Some(m)) => row![c, Space::with_width(10), m],
        (Some(c), None) => row![c],
        (None, Some(m)) => row![m],
        (None, None) => row![],
    }
    .align_y(Alignment::Start);

    let bottom_row = match (strip_panel, summary_panel) {
        (Some(s), Some(m)) => row![s, Space::with_width(10), m],
        (Some(s), None) => row![s],
        (None, Some(m)) => row![m],
        (None, None) => row![],
    }
    .align_y(Alignment::Start);

    let main_content = row![
        column![
            title,
            Space::with_height(10),
            inputs,
            status,
            Space::with_height(10),
            top_row,
            Space::with_height(10),
            bottom_row,
        ]
        .width(Length::Fill)
        .spacing(10),
        Space::with_width(10),
        sidebar,
    ]
    .align_y(Alignment::Start)
    .padding(20);

    container(main_content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Track path, tonic and the Analyze button.
fn create_input_row(data: &AppDisplayData) -> Element<'static, Message> {
    let can_analyze = data.run_state != RunState::Running && !data.track_path.trim().is_empty();

    row![
        text_input("Pitch track (.json)", &data.track_path)
            .on_input(Message::TrackPathChanged)
            .on_submit(Message::AnalyzeClicked)
            .width(Length::FillPortion(3)),
        text_input("Tonic Hz", &data.tonic_input)
            .on_input(Message::TonicChanged)
            .on_submit(Message::AnalyzeClicked)
            .width(Length::Fixed(110.0)),
        button(text("Analyze").size(14))
            .padding([6, 14])
            .on_press_maybe(can_analyze.then_some(Message::AnalyzeClicked)),
    ]
    .spacing(10)
    .align_y(Alignment::Center)
    .into()
}

fn status_line(data: &AppDisplayData) -> String {
    match (data.run_state, &data.outcome) {
        (RunState::Running, _) => "Analysing...".to_string(),
        (_, None) => "Load a pitch track to begin".to_string(),
        (_, Some(AnalysisOutcome::Analyzed { result, .. })) => {
            format!("Analysed against {:.2} Hz", result.tonic_hz)
        }
        (_, Some(AnalysisOutcome::NoVoice)) => {
            "No voice detected. Sing a little louder and hold the note.".to_string()
        }
        (_, Some(AnalysisOutcome::Failed(msg))) => format!("Error: {}", msg),
    }
}

/// Creates the contour panel
fn create_contour_panel(data: &AppDisplayData) -> Option<Element<'static, Message>> {
    if !data.contour_visible {
        return None;
    }

    let reference = data
        .selected_swara
        .and_then(|i| swara_table().get(i))
        .map(|swara| (swara.name, swara.cents));

    let plot = match data.result() {
        Some(r) => contour_plot::ContourPlot::new(&r.pitch_contour, &r.time_points, &r.deviation_colors, reference),
        None => contour_plot::ContourPlot::new(&[], &[], &[], reference),
    };

    let panel = container(
        column![
            text("Pitch Contour").size(18),
            Space::with_height(10),
            container(plot.view()).width(Length::Fill).height(Length::Fill),
        ]
        .spacing(5)
        .padding(15),
    )
    .width(Length::FillPortion(2))
    .height(Length::Fixed(280.0));

    Some(panel.into())
}

/// Creates the deviation meter panel
fn create_meter_panel(data: &AppDisplayData) -> Option<Element<'static, Message>> {
    if !data.meter_visible {
        return None;
    }

    let result = data.result();
    let (deviation_text, score_text) = match result {
        Some(r) => (format!("{:+.1}c", r.deviation), format!("{}", r.score)),
        None => ("--".to_string(), "--".to_string()),
    };

    let content = column![
        row![text("Deviation").size(14), horizontal_space(), text("Score").size(14)],
        Space::with_height(5),
        row![text(deviation_text).size(24), horizontal_space(), text(score_text).size(24)]
            .align_y(Alignment::Center),
        Space::with_height(10),
        deviation_meter::DeviationMeter::new(result.map(|r| r.deviation)).view(),
    ]
    .spacing(5);

    let panel = container(
        column![text("Deviation Meter").size(18), Space::with_height(10), content]
            .spacing(5)
            .padding(15),
    )
    .width(Length::FillPortion(1))
    .height(Length::Fixed(280.0));

    Some(panel.into())
}

/// Creates the swara strip panel
fn create_swara_strip_panel(data: &AppDisplayData) -> Option<Element<'static, Message>> {
    if !data.swara_strip_visible {
        return None;
    }

    let result = data.result();
    let detected_index = result.and_then(|r| swara_index(&r.detected_swara));
    let strip = swara_strip::SwaraStrip::new(detected_index, data.selected_swara, result.map(|r| r.median_cents));

    let panel = container(
        column![
            text("Swara Select").size(18),
            Space::with_height(10),
            strip.view(),
        ]
        .spacing(5)
        .padding(15),
    )
    .width(Length::FillPortion(2))
    .height(Length::Fixed(220.0));

    Some(panel.into())
}

/// Creates the summary panel: metrics plus the written critique
fn create_summary_panel(data: &AppDisplayData) -> Option<Element<'static, Message>> {
    if !data.summary_visible {
        return None;
    }

    let (verdict, feedback) = match &data.outcome {
        Some(AnalysisOutcome::Analyzed { verdict, feedback, .. }) => (verdict.clone(), feedback.clone()),
        _ => (String::new(), String::new()),
    };

    let panel = container(
        column![
            text("Summary").size(18),
            Space::with_height(10),
            container(metrics_display::MetricsDisplay::new(data.result()).view())
                .width(Length::Fill)
                .height(Length::Fixed(190.0)),
            text(verdict).size(16),
            text(feedback).size(14),
        ]
        .spacing(5)
        .padding(15),
    )
    .width(Length::FillPortion(1));

    Some(panel.into())
}

/// Creates the tools sidebar widget.
fn create_sidebar(data: &AppDisplayData) -> Element<'static, Message> {
    let mut sections = column![].spacing(10);

    for (title, buttons) in SETTINGS_CONFIG {
        sections = sections.push(make_settings_section(title, buttons, data));
    }

    container(sections.padding(15))
        .width(Length::Fixed(200.0))
        .height(Length::Fill)
        .into()
}

/// Creates a toggle button; hidden panels get a dimmed style.
fn make_button(config: &ButtonConfig, data: &AppDisplayData) -> Element<'static, Message> {
    let mut button = button(text(config.label).size(14).width(Length::Fill)).padding([6, 10]);

    if !(config.is_active)(data) {
        button = button.style(|_theme, _status| {
            use iced::widget::button;
            button::Style {
                background: Some(iced::Background::Color(iced::Color::from_rgb(0.3, 0.3, 0.3))),
                text_color: iced::Color::from_rgb(0.6, 0.6, 0.6),
                ..button::Style::default()
            }
        });
    }

    button.on_press(config.message.clone()).into()
}

/// Creates a settings section with title and buttons.
fn make_settings_section(
    title: &'static str,
    buttons: &[ButtonConfig],
    data: &AppDisplayData,
) -> Element<'static, Message> {
    let items_widget = buttons
        .iter()
        .fold(column![].spacing(8), |col, config| col.push(make_button(config, data)));

    column![text(title).size(18), Space::with_height(10), items_widget]
        .spacing(5)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle_data() -> AppDisplayData {
        AppDisplayData {
            track_path: String::new(),
            tonic_input: "261.63".to_string(),
            run_state: RunState::Idle,
            outcome: None,
            selected_swara: None,
            contour_visible: true,
            meter_visible: true,
            swara_strip_visible: true,
            summary_visible: true,
        }
    }

    #[test]
    fn test_status_line_states() {
        let mut data = idle_data();
        assert_eq!(status_line(&data), "Load a pitch track to begin");

        data.run_state = RunState::Running;
        assert_eq!(status_line(&data), "Analysing...");

        data.run_state = RunState::Done;
        data.outcome = Some(AnalysisOutcome::NoVoice);
        assert!(status_line(&data).starts_with("No voice detected"));

        data.outcome = Some(AnalysisOutcome::Failed("bad track".to_string()));
        assert_eq!(status_line(&data), "Error: bad track");
    }

    #[test]
    fn test_toggle_buttons_track_visibility() {
        let mut data = idle_data();
        data.meter_visible = false;
        let (_, buttons) = SETTINGS_CONFIG[0];
        let active: Vec<bool> = buttons.iter().map(|b| (b.is_active)(&data)).collect();
        assert_eq!(active, vec![true, false, true, true]);
    }
}
