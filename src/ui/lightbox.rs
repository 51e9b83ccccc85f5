use iced::advanced::image::Renderer as _;
use iced::keyboard::key::Named;
use iced::keyboard::{Key, Modifiers};
use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Program};
use iced::widget::{button, canvas as canvas_widget, column, container, image, row, text};
use iced::{Element, Length, Point, Rectangle, Renderer, Size, Theme, Vector};

use crate::state::data::Mix;
use crate::ui::modal;
use crate::{ImageState, Message};

/// Zoom limits. Scroll zooms, dragging pans, Prev/Next reset both.
pub const MIN_ZOOM: f32 = 0.25;
pub const MAX_ZOOM: f32 = 8.0;

const CANVAS_WIDTH: f32 = 780.0;
const CANVAS_HEIGHT: f32 = 500.0;

/// Full-screen lightbox over the gallery: the image at inspection size
/// with zoom/pan, prev/next navigation through the displayed list, and
/// the prompt caption. Clicking the backdrop closes it.
pub fn view<'a>(
    base: Element<'a, Message>,
    mix: &Mix,
    image_state: Option<&ImageState>,
    zoom: f32,
    offset: Vector,
) -> Element<'a, Message> {
    let picture: Element<'a, Message> = match image_state {
        Some(ImageState::Loaded(handle)) => canvas_widget(ZoomView {
            handle: handle.clone(),
            zoom,
            offset,
        })
        .width(Length::Fixed(CANVAS_WIDTH))
        .height(Length::Fixed(CANVAS_HEIGHT))
        .into(),
        Some(ImageState::Loading) => empty_canvas("Loading image…"),
        _ => empty_canvas("Image unavailable"),
    };

    let nav = |label, message| {
        button(text(label).size(22))
            .on_press(message)
            .style(button::secondary)
            .padding(8)
    };
    let stage = row![
        nav("‹", Message::LightboxPrev),
        picture,
        nav("›", Message::LightboxNext),
    ]
    .spacing(12)
    .align_y(iced::Alignment::Center);

    let mut title_line = mix.title.clone();
    if zoom > 1.0 {
        // Match the caption's zoom readout
        title_line.push_str(&format!(" ({}%)", (zoom * 100.0).round() as i32));
    }
    let mut caption = column![text(title_line).size(20)].spacing(4);
    caption = caption.push(text(mix.prompt.clone()).size(14));
    if let Some(negative) = &mix.negative_prompt {
        caption = caption.push(text(format!("Negative: {}", negative)).size(13));
    }

    let content = column![
        stage,
        caption,
        row![button("Close")
            .on_press(Message::LightboxClosed)
            .style(button::secondary)
            .padding(8)],
    ]
    .spacing(16);

    let panel = container(content)
        .width(Length::Fixed(920.0))
        .padding(24)
        .style(container::rounded_box)
        .into();

    modal::overlay(base, panel, Message::LightboxClosed)
}

fn empty_canvas<'a>(label: &'a str) -> Element<'a, Message> {
    container(text(label).size(14))
        .width(Length::Fixed(CANVAS_WIDTH))
        .height(Length::Fixed(CANVAS_HEIGHT))
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
}

/// Keyboard bindings while the lightbox is open
pub fn handle_key(key: Key, _modifiers: Modifiers) -> Option<Message> {
    match key {
        Key::Named(Named::Escape) => Some(Message::LightboxClosed),
        Key::Named(Named::ArrowRight) => Some(Message::LightboxNext),
        Key::Named(Named::ArrowLeft) => Some(Message::LightboxPrev),
        _ => None,
    }
}

/// Next position in the displayed list, wrapping at the end
pub fn next_index(current: usize, len: usize) -> usize {
    (current + 1) % len
}

/// Previous position in the displayed list, wrapping at the start
pub fn prev_index(current: usize, len: usize) -> usize {
    (current + len - 1) % len
}

pub fn clamp_zoom(zoom: f32) -> f32 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Canvas renderer for the lightbox image with zoom/pan support
pub struct ZoomView {
    pub handle: image::Handle,
    /// Zoom level (1.0 = fit to frame)
    pub zoom: f32,
    /// Pan offset in frame pixels
    pub offset: Vector,
}

impl Program<Message> for ZoomView {
    type State = DragState;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());

        let dimensions = renderer.measure_image(&self.handle);
        let (width, height) = (dimensions.width as f32, dimensions.height as f32);
        if width > 0.0 && height > 0.0 {
            // Fit the image inside the frame, then apply the user zoom
            let fit = (bounds.width / width).min(bounds.height / height);
            let scale = fit * self.zoom;
            let drawn = Size::new(width * scale, height * scale);
            let top_left = Point::new(
                (bounds.width - drawn.width) / 2.0 + self.offset.x,
                (bounds.height - drawn.height) / 2.0 + self.offset.y,
            );

            frame.draw_image(Rectangle::new(top_left, drawn), &self.handle);
        }

        vec![frame.into_geometry()]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        _bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        match event {
            // Mouse wheel for zooming
            canvas::Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                let zoom_delta = match delta {
                    mouse::ScrollDelta::Lines { y, .. } => y * 0.1,
                    mouse::ScrollDelta::Pixels { y, .. } => y * 0.01,
                };
                return (
                    canvas::event::Status::Captured,
                    Some(Message::LightboxZoomed(zoom_delta)),
                );
            }

            // Mouse button press - start dragging
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if let Some(pos) = cursor.position() {
                    state.is_dragging = true;
                    state.last_position = Some(pos);
                    return (canvas::event::Status::Captured, None);
                }
            }

            // Mouse button release - stop dragging
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                state.is_dragging = false;
                state.last_position = None;
                return (canvas::event::Status::Captured, None);
            }

            // Mouse move - pan if dragging
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                if state.is_dragging {
                    if let (Some(current), Some(last)) = (cursor.position(), state.last_position) {
                        let delta = Vector::new(current.x - last.x, current.y - last.y);
                        state.last_position = Some(current);
                        return (
                            canvas::event::Status::Captured,
                            Some(Message::LightboxPanned(delta)),
                        );
                    }
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }
}

/// State for drag interactions
#[derive(Debug, Clone, Default)]
pub struct DragState {
    pub is_dragging: bool,
    pub last_position: Option<Point>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_wraps_both_ways() {
        assert_eq!(next_index(0, 3), 1);
        assert_eq!(next_index(2, 3), 0);
        assert_eq!(prev_index(1, 3), 0);
        assert_eq!(prev_index(0, 3), 2);

        // A single image navigates to itself
        assert_eq!(next_index(0, 1), 0);
        assert_eq!(prev_index(0, 1), 0);
    }

    #[test]
    fn test_zoom_is_clamped() {
        assert_eq!(clamp_zoom(1.0), 1.0);
        assert_eq!(clamp_zoom(0.0), MIN_ZOOM);
        assert_eq!(clamp_zoom(100.0), MAX_ZOOM);
    }

    #[test]
    fn test_key_bindings() {
        let mods = Modifiers::default();
        assert!(matches!(
            handle_key(Key::Named(Named::Escape), mods),
            Some(Message::LightboxClosed)
        ));
        assert!(matches!(
            handle_key(Key::Named(Named::ArrowRight), mods),
            Some(Message::LightboxNext)
        ));
        assert!(matches!(
            handle_key(Key::Named(Named::ArrowLeft), mods),
            Some(Message::LightboxPrev)
        ));
        assert!(handle_key(Key::Named(Named::Enter), mods).is_none());
    }
}
