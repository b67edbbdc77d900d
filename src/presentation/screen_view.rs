use iced::mouse;
use iced::widget::{canvas, container, image, stack};
use iced::{Element, Length, Point, Rectangle, Size};

use crate::core::models::DisplayedImage;
use crate::global_constants::{PLACEHOLDER_HEIGHT, PLACEHOLDER_WIDTH};
use crate::presentation::app_theme;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScreenViewMessage {
    PointerPressed(Point),
    PointerReleased(Point),
}

/// Transparent layer over the device image reporting pointer positions in image pixels.
#[derive(Debug, Default)]
pub struct PointerSurface;

#[derive(Debug, Default)]
pub struct PointerSurfaceState {
    pressed_inside: bool,
}

impl canvas::Program<ScreenViewMessage> for PointerSurface {
    type State = PointerSurfaceState;

    fn update(
        &self,
        state: &mut Self::State,
        event: &iced::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<ScreenViewMessage>> {
        match event {
            iced::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let position = cursor.position_in(bounds)?;
                state.pressed_inside = true;
                Some(canvas::Action::publish(ScreenViewMessage::PointerPressed(position)).and_capture())
            }
            iced::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if !state.pressed_inside {
                    return None;
                }
                state.pressed_inside = false;
                let absolute = cursor.position()?;
                let position = relative_to_bounds(absolute, bounds);
                Some(canvas::Action::publish(ScreenViewMessage::PointerReleased(position)).and_capture())
            }
            _ => None,
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        _renderer: &iced::Renderer,
        _theme: &iced::Theme,
        _bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry<iced::Renderer>> {
        Vec::new()
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if cursor.is_over(bounds) {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }
}

/// Two diagonals across an empty frame, shown when no capture is available.
#[derive(Debug, Default)]
pub struct PlaceholderArt;

impl canvas::Program<ScreenViewMessage> for PlaceholderArt {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &iced::Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry<iced::Renderer>> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let stroke = canvas::Stroke::default()
            .with_color(app_theme::PLACEHOLDER_LINE_COLOR)
            .with_width(1.0);

        frame.stroke(
            &canvas::Path::line(Point::ORIGIN, Point::new(bounds.width, bounds.height)),
            stroke,
        );
        frame.stroke(
            &canvas::Path::line(Point::new(0.0, bounds.height), Point::new(bounds.width, 0.0)),
            stroke,
        );

        vec![frame.into_geometry()]
    }
}

pub fn relative_to_bounds(absolute: Point, bounds: Rectangle) -> Point {
    Point::new(absolute.x - bounds.x, absolute.y - bounds.y)
}

pub fn placeholder_size() -> Size {
    Size::new(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT)
}

/// Device image at its rendered pixel size with the pointer layer stacked on top.
pub fn render_screen(displayed: Option<&DisplayedImage>) -> Element<'_, ScreenViewMessage> {
    let surface: Element<'_, ScreenViewMessage> = match displayed {
        Some(displayed) => {
            let width = Length::Fixed(displayed.width as f32);
            let height = Length::Fixed(displayed.height as f32);

            stack![
                image(displayed.image_handle.clone())
                    .width(width)
                    .height(height),
                canvas(PointerSurface).width(width).height(height),
            ]
            .into()
        }
        None => {
            let size = placeholder_size();
            canvas(PlaceholderArt)
                .width(Length::Fixed(size.width))
                .height(Length::Fixed(size.height))
                .into()
        }
    };

    container(surface)
        .padding(1)
        .style(app_theme::screen_frame_style)
        .into()
}
