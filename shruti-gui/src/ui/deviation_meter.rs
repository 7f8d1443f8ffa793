//! # Deviation Meter Widget
//!
//! Horizontal needle meter for the overall deviation from Sa, colored with
//! the same three bands used for the contour points.

use iced::widget::canvas::{self, Geometry, Path, Stroke};
use iced::widget::container;
use iced::{mouse, Color, Element, Point, Rectangle, Renderer, Size, Theme};
use shruti_core::annotate::{NEAR_CENTS, ON_TARGET_CENTS};
use shruti_core::PitchBand;

/// The meter shows deviations from -50 to +50 cents; anything further pins the needle.
const METER_RANGE: f32 = 50.0;

/// Fill color for each accuracy band.
pub fn band_color(band: PitchBand) -> Color {
    match band {
        PitchBand::OnTarget => Color::from_rgb8(0x34, 0xDB, 0x98),
        PitchBand::Near => Color::from_rgb8(0xFF, 0xC3, 0x00),
        PitchBand::Off => Color::from_rgb8(0xFF, 0x33, 0x33),
    }
}

pub struct DeviationMeter {
    /// Signed deviation in cents (None before a successful run)
    deviation: Option<f32>,
}

impl DeviationMeter {
    pub fn new(deviation: Option<f32>) -> Self {
        Self { deviation }
    }

    pub fn view(self) -> Element<'static, crate::Message> {
        container(
            canvas::Canvas::new(self)
                .width(iced::Length::Fill)
                .height(iced::Length::Fixed(80.0)),
        )
        .into()
    }

    fn x_for(cents: f32, width: f32) -> f32 {
        (cents.clamp(-METER_RANGE, METER_RANGE) + METER_RANGE) / (2.0 * METER_RANGE) * width
    }
}

impl<Message> canvas::Program<Message> for DeviationMeter {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        let background = Path::rectangle(Point::ORIGIN, bounds.size());
        frame.fill(&background, Color::from_rgb8(0x40, 0x40, 0x40));

        // Shade the near and on-target zones behind the needle
        for (limit, alpha) in [(NEAR_CENTS, 0.15), (ON_TARGET_CENTS, 0.25)] {
            let left = Self::x_for(-limit, bounds.width);
            let right = Self::x_for(limit, bounds.width);
            let zone = Path::rectangle(Point::new(left, 0.0), Size::new(right - left, bounds.height));
            frame.fill(&zone, Color::from_rgba(1.0, 1.0, 1.0, alpha));
        }

        let center_x = bounds.width / 2.0;
        let center_line = Path::line(Point::new(center_x, 0.0), Point::new(center_x, bounds.height));
        frame.stroke(
            &center_line,
            Stroke::default().with_width(2.0).with_color(Color::WHITE),
        );

        if let Some(deviation) = self.deviation {
            let needle_pos = Self::x_for(deviation, bounds.width);
            let color = band_color(PitchBand::classify(deviation));
            let needle = Path::rectangle(Point::new(needle_pos - 2.0, 0.0), Size::new(4.0, bounds.height));
            frame.fill(&needle, color);
        }

        vec![frame.into_geometry()]
    }
}
