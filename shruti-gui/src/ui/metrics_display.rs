//! # Metrics Display Widget
//!
//! Lists the numbers behind a run (target, sung swara, deviation,
//! stability, score, trend) as labelled rows on a canvas.

use iced::widget::canvas::{self, Frame, Geometry, Text};
use iced::widget::container;
use iced::{Element, Point, Rectangle, Renderer, Theme};
use shruti_core::{AnalysisResult, PitchBand};

use super::deviation_meter::band_color;

pub struct MetricsDisplay {
    /// Label, value, and whether the value takes the deviation band color.
    rows: Vec<(&'static str, String, bool)>,
    deviation: f32,
}

impl MetricsDisplay {
    pub fn new(result: Option<&AnalysisResult>) -> Self {
        match result {
            Some(r) => {
                let trend = r
                    .feedback_request()
                    .context()
                    .trend_cents_per_sec
                    .map_or_else(|| "--".to_string(), |slope| format!("{:+.1} cents/s", slope));
                Self {
                    rows: vec![
                        ("Target", r.target_swara.clone(), false),
                        ("Sung", format!("{} ({:.0}c)", r.detected_swara, r.median_cents), false),
                        ("Deviation", format!("{:+.1} cents", r.deviation), true),
                        ("Stability", format!("{:.1} cents", r.stability), false),
                        ("Score", format!("{}/100", r.score), true),
                        ("Band", PitchBand::classify(r.deviation).label().to_string(), true),
                        ("Trend", trend, false),
                        ("Points", r.pitch_contour.len().to_string(), false),
                    ],
                    deviation: r.deviation,
                }
            }
            None => Self {
                rows: Vec::new(),
                deviation: 0.0,
            },
        }
    }

    pub fn view(self) -> Element<'static, crate::Message> {
        container(
            canvas::Canvas::new(self)
                .width(iced::Length::Fill)
                .height(iced::Length::Fill),
        )
        .into()
    }
}

impl<Message> canvas::Program<Message> for MetricsDisplay {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        theme: &Theme,
        bounds: Rectangle,
        _cursor: iced::mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let text_color = theme.palette().text;

        if self.rows.is_empty() {
            frame.fill_text(Text {
                content: "No analysis yet".to_string(),
                position: frame.center(),
                color: text_color,
                size: 14.0.into(),
                horizontal_alignment: iced::alignment::Horizontal::Center,
                vertical_alignment: iced::alignment::Vertical::Center,
                ..Text::default()
            });
            return vec![frame.into_geometry()];
        }

        let start_y: f32 = 10.0;
        let line_height: f32 = 22.0;
        let value_x = bounds.width * 0.45;
        let accent = band_color(PitchBand::classify(self.deviation));

        for (i, (label, value, banded)) in self.rows.iter().enumerate() {
            let y = start_y + i as f32 * line_height;
            frame.fill_text(Text {
                content: format!("{}:", label),
                position: Point::new(10.0, y),
                color: text_color,
                size: 14.0.into(),
                ..Text::default()
            });
            frame.fill_text(Text {
                content: value.clone(),
                position: Point::new(value_x, y),
                color: if *banded { accent } else { text_color },
                size: 14.0.into(),
                ..Text::default()
            });
        }

        vec![frame.into_geometry()]
    }
}
