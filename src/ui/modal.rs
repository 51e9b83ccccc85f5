use iced::widget::{
    button, center, column, container, mouse_area, opaque, row, stack, text, text_editor,
    text_input,
};
use iced::{Element, Length};

use crate::state::data::{Mix, MixDraft};
use crate::Message;

/// Lay `content` over `base` with a click-to-dismiss backdrop.
///
/// The inner opaque wrapper keeps presses on the content itself from
/// reaching the backdrop, so only clicks outside it dismiss.
pub fn overlay<'a>(
    base: Element<'a, Message>,
    content: Element<'a, Message>,
    on_dismiss: Message,
) -> Element<'a, Message> {
    stack![
        base,
        opaque(mouse_area(center(opaque(content))).on_press(on_dismiss))
    ]
    .into()
}

/// Form state for the add/edit modal
///
/// `editing` holds the id of the mix being edited; None means the form
/// will create a new record on submit.
pub struct MixEditor {
    pub editing: Option<String>,
    pub url: String,
    pub title: String,
    pub prompt: text_editor::Content,
    pub negative_prompt: text_editor::Content,
}

impl MixEditor {
    /// Empty form for a new mix
    pub fn add() -> Self {
        MixEditor {
            editing: None,
            url: String::new(),
            title: String::new(),
            prompt: text_editor::Content::new(),
            negative_prompt: text_editor::Content::new(),
        }
    }

    /// Form pre-filled from an existing mix
    pub fn edit(mix: &Mix) -> Self {
        MixEditor {
            editing: Some(mix.id.clone()),
            url: mix.url.clone(),
            title: mix.title.clone(),
            prompt: text_editor::Content::with_text(&mix.prompt),
            negative_prompt: text_editor::Content::with_text(
                mix.negative_prompt.as_deref().unwrap_or(""),
            ),
        }
    }

    /// Current form contents as a store draft.
    ///
    /// The text editor appends a trailing newline to its contents, so
    /// both prompts are right-trimmed; an empty negative prompt maps to
    /// None.
    pub fn draft(&self) -> MixDraft {
        let negative = self.negative_prompt.text().trim_end().to_string();

        MixDraft {
            url: self.url.trim().to_string(),
            title: self.title.trim().to_string(),
            prompt: self.prompt.text().trim_end().to_string(),
            negative_prompt: (!negative.is_empty()).then_some(negative),
        }
    }

    /// A mix needs at least a title before it can be saved
    pub fn can_submit(&self) -> bool {
        !self.title.trim().is_empty()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let heading = if self.editing.is_some() {
            "Edit Mix"
        } else {
            "Add Mix"
        };

        let form = column![
            text(heading).size(24),
            column![
                text("Title").size(13),
                text_input("A name for this mix", &self.title)
                    .on_input(Message::EditorTitleChanged)
                    .padding(8),
            ]
            .spacing(4),
            column![
                text("Image URL").size(13),
                text_input("https://… or a local path", &self.url)
                    .on_input(Message::EditorUrlChanged)
                    .padding(8),
            ]
            .spacing(4),
            column![
                text("Prompt").size(13),
                text_editor(&self.prompt)
                    .on_action(Message::EditorPromptEdited)
                    .height(Length::Fixed(110.0)),
            ]
            .spacing(4),
            column![
                text("Negative Prompt").size(13),
                text_editor(&self.negative_prompt)
                    .on_action(Message::EditorNegativeEdited)
                    .height(Length::Fixed(70.0)),
            ]
            .spacing(4),
            row![
                button("Cancel")
                    .on_press(Message::EditorDismissed)
                    .style(button::secondary)
                    .padding(8),
                button("Save")
                    .on_press_maybe(self.can_submit().then_some(Message::EditorSubmitted))
                    .padding(8),
            ]
            .spacing(12),
        ]
        .spacing(14);

        container(form)
            .width(Length::Fixed(480.0))
            .padding(24)
            .style(container::rounded_box)
            .into()
    }
}

/// Confirmation dialog shown before a delete goes through
pub fn delete_confirm<'a>() -> Element<'a, Message> {
    let content = column![
        text("Delete this mix?").size(20),
        text("The record is removed from the library immediately.").size(14),
        row![
            button("Cancel")
                .on_press(Message::DeleteDismissed)
                .style(button::secondary)
                .padding(8),
            button("Delete")
                .on_press(Message::DeleteConfirmed)
                .style(button::danger)
                .padding(8),
        ]
        .spacing(12),
    ]
    .spacing(16);

    container(content)
        .width(Length::Fixed(380.0))
        .padding(24)
        .style(container::rounded_box)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_trims_and_maps_empty_negative_to_none() {
        let mut editor = MixEditor::add();
        editor.title = "  Title  ".to_string();
        editor.url = " https://example.com/a.png ".to_string();

        let draft = editor.draft();
        assert_eq!(draft.title, "Title");
        assert_eq!(draft.url, "https://example.com/a.png");
        assert_eq!(draft.negative_prompt, None);
    }

    #[test]
    fn test_edit_form_round_trips_the_mix() {
        let mix = Mix {
            id: "m1".to_string(),
            url: "file:///a.png".to_string(),
            title: "T".to_string(),
            prompt: "a prompt".to_string(),
            negative_prompt: Some("blurry".to_string()),
            created_at: 7,
        };

        let editor = MixEditor::edit(&mix);
        assert_eq!(editor.editing.as_deref(), Some("m1"));

        let draft = editor.draft();
        assert_eq!(draft.prompt, "a prompt");
        assert_eq!(draft.negative_prompt.as_deref(), Some("blurry"));
    }

    #[test]
    fn test_empty_title_blocks_submit() {
        let mut editor = MixEditor::add();
        assert!(!editor.can_submit());

        editor.title = "   ".to_string();
        assert!(!editor.can_submit());

        editor.title = "Named".to_string();
        assert!(editor.can_submit());
    }
}
