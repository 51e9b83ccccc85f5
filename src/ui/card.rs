use iced::widget::{button, column, container, horizontal_space, image, mouse_area, row, text};
use iced::{Alignment, ContentFit, Element, Length};

use crate::state::data::{Mix, ViewMode};
use crate::{ImageState, Message};

/// Height of the image area in grid cards
const GRID_IMAGE_HEIGHT: f32 = 180.0;
/// Thumbnail size in list rows
const LIST_IMAGE_WIDTH: f32 = 140.0;
const LIST_IMAGE_HEIGHT: f32 = 90.0;
/// Image size in details rows
const DETAILS_IMAGE_WIDTH: f32 = 260.0;
const DETAILS_IMAGE_HEIGHT: f32 = 170.0;
/// Prompt preview cutoff before an ellipsis is appended
const PREVIEW_CHARS: usize = 140;

/// Build the card for one mix.
///
/// All widget content is cloned out of the mix, so the returned element
/// does not borrow the processed list the view derived it from.
pub fn view<'a>(
    mix: &Mix,
    image_state: Option<&ImageState>,
    mode: ViewMode,
    copied: bool,
) -> Element<'a, Message> {
    match mode {
        ViewMode::Details => details_row(mix, image_state, copied),
        ViewMode::Grid => grid_card(mix, image_state, copied),
        ViewMode::List => list_row(mix, image_state, copied),
    }
}

fn grid_card<'a>(mix: &Mix, image_state: Option<&ImageState>, copied: bool) -> Element<'a, Message> {
    let content = column![
        image_area(mix, image_state, Length::Fill, GRID_IMAGE_HEIGHT),
        column![
            text(mix.title.clone()).size(16),
            text(preview(&mix.prompt)).size(13),
        ]
        .spacing(4)
        .padding(10),
        actions(mix, copied, false, false),
    ]
    .spacing(4);

    container(content)
        .width(Length::Fixed(280.0))
        .padding(6)
        .style(container::rounded_box)
        .into()
}

fn list_row<'a>(mix: &Mix, image_state: Option<&ImageState>, copied: bool) -> Element<'a, Message> {
    let content = row![
        image_area(
            mix,
            image_state,
            Length::Fixed(LIST_IMAGE_WIDTH),
            LIST_IMAGE_HEIGHT,
        ),
        column![
            text(mix.title.clone()).size(16),
            text(preview(&mix.prompt)).size(13),
        ]
        .spacing(4)
        .width(Length::Fill),
        horizontal_space(),
        actions(mix, copied, true, true),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    container(content)
        .width(Length::Fill)
        .padding(8)
        .style(container::rounded_box)
        .into()
}

/// Full-width row showing the complete prompt and, when present, the
/// negative prompt
fn details_row<'a>(
    mix: &Mix,
    image_state: Option<&ImageState>,
    copied: bool,
) -> Element<'a, Message> {
    let mut details = column![
        text(mix.title.clone()).size(18),
        text(mix.prompt.clone()).size(13),
    ]
    .spacing(6);
    if let Some(negative) = &mix.negative_prompt {
        details = details.push(text(format!("Negative: {}", negative)).size(13));
    }

    let content = row![
        image_area(
            mix,
            image_state,
            Length::Fixed(DETAILS_IMAGE_WIDTH),
            DETAILS_IMAGE_HEIGHT,
        ),
        details.width(Length::Fill),
        horizontal_space(),
        actions(mix, copied, true, true),
    ]
    .spacing(12)
    .align_y(Alignment::Center);

    container(content)
        .width(Length::Fill)
        .padding(10)
        .style(container::rounded_box)
        .into()
}

/// The image (or its loading/placeholder stand-in), clickable to open
/// the lightbox once loaded.
fn image_area<'a>(
    mix: &Mix,
    image_state: Option<&ImageState>,
    width: Length,
    height: f32,
) -> Element<'a, Message> {
    match image_state {
        Some(ImageState::Loaded(handle)) => mouse_area(
            image(handle.clone())
                .width(width)
                .height(Length::Fixed(height))
                .content_fit(ContentFit::Cover),
        )
        .on_press(Message::OpenLightbox(mix.id.clone()))
        .into(),
        Some(ImageState::Loading) => placeholder("Loading…", width, height),
        _ => placeholder("No image", width, height),
    }
}

fn placeholder<'a>(label: &'a str, width: Length, height: f32) -> Element<'a, Message> {
    container(text(label).size(13))
        .width(width)
        .height(Length::Fixed(height))
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .style(container::bordered_box)
        .into()
}

fn actions<'a>(
    mix: &Mix,
    copied: bool,
    with_labels: bool,
    with_open_link: bool,
) -> Element<'a, Message> {
    let copy_label = if copied { "Copied" } else { "Copy" };

    let mut buttons = row![].spacing(6);
    if with_open_link {
        buttons = buttons.push(
            button(text("Open Link").size(13))
                .on_press(Message::OpenLink(mix.url.clone()))
                .style(button::secondary)
                .padding(6),
        );
    }
    buttons = buttons.push(
        button(text(copy_label).size(13))
            .on_press(Message::CopyPrompt(mix.id.clone()))
            .style(button::secondary)
            .padding(6),
    );
    buttons = buttons.push(
        button(text(if with_labels { "Edit" } else { "✎" }).size(13))
            .on_press(Message::OpenEdit(mix.id.clone()))
            .style(button::secondary)
            .padding(6),
    );
    buttons = buttons.push(
        button(text(if with_labels { "Delete" } else { "🗑" }).size(13))
            .on_press(Message::DeleteRequested(mix.id.clone()))
            .style(button::danger)
            .padding(6),
    );

    container(buttons).padding(4).into()
}

/// Shorten long prompts for card display
fn preview(prompt: &str) -> String {
    if prompt.chars().count() <= PREVIEW_CHARS {
        return prompt.to_string();
    }

    let cut: String = prompt.chars().take(PREVIEW_CHARS).collect();
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Mix {
        Mix {
            id: "m1".to_string(),
            url: "https://example.com/a.png".to_string(),
            title: "Sample".to_string(),
            prompt: "a prompt".to_string(),
            negative_prompt: Some("blurry".to_string()),
            created_at: 1,
        }
    }

    #[test]
    fn test_card_builds_in_every_view_mode() {
        let mix = sample();
        for mode in [ViewMode::Details, ViewMode::Grid, ViewMode::List] {
            let _ = view(&mix, None, mode, false);
            let _ = view(&mix, Some(&ImageState::Loading), mode, true);
        }
    }

    #[test]
    fn test_preview_leaves_short_prompts_alone() {
        assert_eq!(preview("short prompt"), "short prompt");
    }

    #[test]
    fn test_preview_truncates_on_char_boundaries() {
        let long: String = "é".repeat(400);
        let cut = preview(&long);
        assert!(cut.ends_with('…'));
        assert!(cut.chars().count() <= PREVIEW_CHARS + 1);
    }
}
