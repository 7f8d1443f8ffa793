//! # Contour Plot Widget
//!
//! Draws the sampled pitch contour over time as offsets from Sa, with the
//! flat target line, the band edges, and each point colored by its band.

use iced::widget::canvas::{self, Geometry, Path, Stroke, Text};
use iced::widget::container;
use iced::{mouse, Color, Element, Point, Rectangle, Renderer, Size, Theme};
use shruti_core::annotate::{NEAR_CENTS, ON_TARGET_CENTS};
use shruti_core::cents::{wrap_deviation, HALF_OCTAVE_CENTS};
use shruti_core::PitchBand;

use super::deviation_meter::band_color;

/// Smallest vertical half-range, so a perfect take still shows the band edges.
const MIN_HALF_RANGE: f32 = 50.0;

/// Gap left for the axis labels.
const LABEL_MARGIN: f32 = 36.0;

pub struct ContourPlot {
    /// Contour as signed offsets from Sa
    offsets: Vec<f32>,
    times: Vec<f32>,
    bands: Vec<PitchBand>,
    /// Offset of an extra swara to draw as a reference line
    reference: Option<(String, f32)>,
}

impl ContourPlot {
    /// `contour` is in folded cents; `reference` is a swara name and its position.
    pub fn new(
        contour: &[f32],
        times: &[f32],
        bands: &[PitchBand],
        reference: Option<(&str, f32)>,
    ) -> Self {
        Self {
            offsets: contour.iter().map(|&c| wrap_deviation(c, 0.0)).collect(),
            times: times.to_vec(),
            bands: bands.to_vec(),
            reference: reference.map(|(name, cents)| (name.to_string(), wrap_deviation(cents, 0.0))),
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

    /// Half of the vertical range, rounded up to a multiple of 25 cents.
    fn half_range(&self) -> f32 {
        let reference = self.reference.as_ref().map_or(0.0, |(_, offset)| offset.abs());
        let widest = self
            .offsets
            .iter()
            .fold(reference, |max, &v| v.abs().max(max));
        ((widest.max(MIN_HALF_RANGE) / 25.0).ceil() * 25.0).min(HALF_OCTAVE_CENTS)
    }
}

impl<Message> canvas::Program<Message> for ContourPlot {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let text_color = theme.palette().text;

        if !bounds.width.is_finite() || !bounds.height.is_finite() || bounds.width <= LABEL_MARGIN {
            return vec![frame.into_geometry()];
        }

        let plot_width = bounds.width - LABEL_MARGIN;
        let half_range = self.half_range();
        let y_for = |cents: f32| {
            let clamped = cents.clamp(-half_range, half_range);
            bounds.height / 2.0 - clamped / half_range * (bounds.height / 2.0)
        };

        frame.fill_rectangle(
            Point::new(LABEL_MARGIN, 0.0),
            Size::new(plot_width, bounds.height),
            Color::from_rgb8(0x30, 0x30, 0x30),
        );

        // Band edges
        for (limit, alpha) in [(NEAR_CENTS, 0.08), (ON_TARGET_CENTS, 0.12)] {
            let top = y_for(limit);
            let bottom = y_for(-limit);
            frame.fill_rectangle(
                Point::new(LABEL_MARGIN, top),
                Size::new(plot_width, bottom - top),
                Color::from_rgba(1.0, 1.0, 1.0, alpha),
            );
        }

        // Target line and axis labels
        let target_y = y_for(0.0);
        frame.stroke(
            &Path::line(Point::new(LABEL_MARGIN, target_y), Point::new(bounds.width, target_y)),
            Stroke::default().with_width(1.5).with_color(Color::WHITE),
        );
        for cents in [half_range, 0.0, -half_range] {
            frame.fill_text(Text {
                content: format!("{:+.0}", cents),
                position: Point::new(LABEL_MARGIN - 4.0, y_for(cents)),
                color: text_color,
                size: 11.0.into(),
                horizontal_alignment: iced::alignment::Horizontal::Right,
                vertical_alignment: iced::alignment::Vertical::Center,
                ..Text::default()
            });
        }

        if let Some((name, offset)) = &self.reference {
            let y = y_for(*offset);
            let color = Color::from_rgb8(0x34, 0x98, 0xDB);
            frame.stroke(
                &Path::line(Point::new(LABEL_MARGIN, y), Point::new(bounds.width, y)),
                Stroke::default().with_width(1.0).with_color(color),
            );
            frame.fill_text(Text {
                content: name.clone(),
                position: Point::new(bounds.width - 4.0, y - 2.0),
                color,
                size: 12.0.into(),
                horizontal_alignment: iced::alignment::Horizontal::Right,
                vertical_alignment: iced::alignment::Vertical::Bottom,
                ..Text::default()
            });
        }

        if self.offsets.is_empty() || self.offsets.len() != self.times.len() {
            return vec![frame.into_geometry()];
        }

        let start = self.times[0];
        let span = (self.times[self.times.len() - 1] - start).max(f32::EPSILON);
        let points: Vec<Point> = self
            .times
            .iter()
            .zip(&self.offsets)
            .map(|(&t, &c)| {
                let x = if self.times.len() == 1 {
                    LABEL_MARGIN + plot_width / 2.0
                } else {
                    LABEL_MARGIN + (t - start) / span * plot_width
                };
                Point::new(x, y_for(c))
            })
            .collect();

        let trace = Path::new(|builder| {
            builder.move_to(points[0]);
            for &point in &points[1..] {
                builder.line_to(point);
            }
        });
        frame.stroke(
            &trace,
            Stroke::default()
                .with_width(1.0)
                .with_color(Color::from_rgb8(0x90, 0x90, 0x90)),
        );

        for (point, band) in points.iter().zip(&self.bands) {
            frame.fill(&Path::circle(*point, 2.5), band_color(*band));
        }

        vec![frame.into_geometry()]
    }
}
