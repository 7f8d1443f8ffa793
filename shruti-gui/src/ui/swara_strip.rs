//! # Swara Strip Widget
//!
//! One octave laid out left to right from Sa, with a tick for every swara
//! in the table. The detected swara is highlighted, the sung median is
//! marked, and clicking near a tick selects that swara as a reference.

use iced::widget::canvas::{self, event, Event, Fill, Geometry, Path, Stroke, Text};
use iced::widget::container;
use iced::{mouse, Color, Element, Point, Rectangle, Renderer, Size, Theme};
use shruti_core::cents::OCTAVE_CENTS;
use shruti_core::swara::{find_nearest_swara, swara_index, swara_table};

/// Height of the strip in pixels.
const STRIP_HEIGHT: f32 = 90.0;

const NEUTRAL: Color = iced::color!(0xC0, 0xC0, 0xC0);

#[derive(Debug, Clone)]
pub struct SwaraStrip {
    /// Table index of the detected swara
    detected_index: Option<usize>,
    /// Table index of the user-selected reference swara
    selected_index: Option<usize>,
    /// Median of the sung contour in cents
    sung_cents: Option<f32>,
}

impl SwaraStrip {
    pub fn new(detected_index: Option<usize>, selected_index: Option<usize>, sung_cents: Option<f32>) -> Self {
        Self {
            detected_index,
            selected_index,
            sung_cents,
        }
    }

    pub fn view(self) -> Element<'static, crate::Message> {
        container(
            canvas::Canvas::new(self)
                .width(iced::Length::Fill)
                .height(iced::Length::Fixed(STRIP_HEIGHT)),
        )
        .into()
    }

    fn x_for(cents: f32, width: f32) -> f32 {
        cents / OCTAVE_CENTS * width
    }

    /// Table index of the swara nearest to a click.
    fn swara_from_pos(bounds: Size, pos: Point) -> Option<usize> {
        if bounds.width <= 0.0 {
            return None;
        }
        let cents = pos.x / bounds.width * OCTAVE_CENTS;
        swara_index(find_nearest_swara(cents).name)
    }

    fn tick_color(&self, index: usize) -> Color {
        let is_detected = self.detected_index == Some(index);
        let is_selected = self.selected_index == Some(index);
        match (is_selected, is_detected) {
            (true, _) => Color::from_rgb8(0xFF, 0x33, 0x33),      // Red (Selected)
            (false, true) => Color::from_rgb8(0x34, 0xDB, 0x98),  // Green (Detected)
            _ => NEUTRAL,
        }
    }
}

impl canvas::Program<crate::Message> for SwaraStrip {
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> (event::Status, Option<crate::Message>) {
        if let Some(position) = cursor.position_in(bounds) {
            if let Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) = event {
                if let Some(index) = Self::swara_from_pos(bounds.size(), position) {
                    return (event::Status::Captured, Some(crate::Message::SwaraSelected(index)));
                }
            }
        }
        (event::Status::Ignored, None)
    }

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
        let baseline = bounds.height * 0.55;

        frame.fill_rectangle(
            Point::ORIGIN,
            Size::new(bounds.width, bounds.height),
            Fill::from(Color::from_rgb8(0x30, 0x30, 0x30)),
        );
        frame.stroke(
            &Path::line(Point::new(0.0, baseline), Point::new(bounds.width, baseline)),
            Stroke::default().with_color(Color::from_rgb8(0x80, 0x80, 0x80)),
        );

        // Aliases share a tick; their labels are stacked
        let table = swara_table();
        let mut stacked = 0;
        for (i, swara) in table.iter().enumerate() {
            let x = Self::x_for(swara.cents, bounds.width);
            let alias_of_previous = i > 0 && table[i - 1].cents == swara.cents;
            stacked = if alias_of_previous { stacked + 1 } else { 0 };

            let color = self.tick_color(i);
            if !alias_of_previous || color != NEUTRAL {
                frame.fill_rectangle(
                    Point::new(x - 1.5, baseline - 18.0),
                    Size::new(3.0, 36.0),
                    Fill::from(color),
                );
            }
            frame.fill_text(Text {
                content: swara.name.to_string(),
                position: Point::new(x + 3.0, baseline + 20.0 + stacked as f32 * 13.0),
                color: if color == NEUTRAL { text_color } else { color },
                size: 12.0.into(),
                horizontal_alignment: iced::alignment::Horizontal::Left,
                vertical_alignment: iced::alignment::Vertical::Top,
                ..Text::default()
            });
        }

        // Where the voice actually sat
        if let Some(cents) = self.sung_cents {
            let x = Self::x_for(cents, bounds.width);
            let marker = Path::new(|builder| {
                builder.move_to(Point::new(x, baseline - 20.0));
                builder.line_to(Point::new(x - 6.0, baseline - 32.0));
                builder.line_to(Point::new(x + 6.0, baseline - 32.0));
                builder.close();
            });
            frame.fill(&marker, Color::from_rgb8(0xFF, 0xC3, 0x00));
        }

        vec![frame.into_geometry()]
    }
}
