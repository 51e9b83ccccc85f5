use std::collections::HashMap;
use std::time::Duration;

use iced::widget::{
    button, column, container, horizontal_space, image, pick_list, row, scrollable, text,
    text_editor, text_input,
};
use iced::{clipboard, keyboard, Element, Length, Subscription, Task, Theme, Vector};
use rfd::FileDialog;
use chrono::Utc;

// Declare the modules
mod media;
mod state;
mod ui;

use state::data::{AppTheme, Mix, SortOption, ViewMode};
use state::store::Storage;
use state::{query, store, transfer};
use ui::modal::MixEditor;

/// Display state of a mix image, keyed by mix id
#[derive(Debug, Clone)]
enum ImageState {
    /// Fetch in flight
    Loading,
    /// Decoded and ready to draw
    Loaded(image::Handle),
    /// Fetch or decode failed; the card shows a placeholder
    Failed,
}

/// Main application state
struct MixGallery {
    /// On-disk persistence for the library and preferences
    storage: Storage,
    /// The canonical mix list; every view derives from this
    mixes: Vec<Mix>,
    /// Library display name shown in the header
    library_name: String,
    theme: AppTheme,
    view_mode: ViewMode,
    search_query: String,
    sort_by: SortOption,
    /// Image load state per mix id
    images: HashMap<String, ImageState>,
    /// Add/edit form, when open
    editor: Option<MixEditor>,
    /// Id awaiting delete confirmation
    pending_delete: Option<String>,
    /// Position in the displayed list shown in the lightbox
    lightbox: Option<usize>,
    /// Lightbox zoom level (1.0 = fit), reset on navigation
    lightbox_zoom: f32,
    /// Lightbox pan offset, reset on navigation
    lightbox_offset: Vector,
    /// Id whose prompt was just copied (clears after two seconds)
    copied: Option<String>,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    // Header controls
    LibraryNameChanged(String),
    SearchChanged(String),
    SortChanged(SortOption),
    ViewModeChanged(ViewMode),
    ToggleTheme,
    // Card actions
    OpenLightbox(String),
    OpenLink(String),
    CopyPrompt(String),
    CopiedReset,
    // Lightbox
    LightboxClosed,
    LightboxNext,
    LightboxPrev,
    LightboxZoomed(f32),
    LightboxPanned(Vector),
    // Add/edit modal
    OpenAdd,
    OpenEdit(String),
    EditorTitleChanged(String),
    EditorUrlChanged(String),
    EditorPromptEdited(text_editor::Action),
    EditorNegativeEdited(text_editor::Action),
    EditorSubmitted,
    EditorDismissed,
    // Delete modal
    DeleteRequested(String),
    DeleteConfirmed,
    DeleteDismissed,
    // Import / export
    ImportRequested,
    ImportLoaded(Result<String, String>),
    ExportRequested,
    ExportFinished(Result<String, String>),
    // Images
    ImageLoaded(String, Result<image::Handle, String>),
    FallbackLoaded(String, Result<image::Handle, String>),
}

impl MixGallery {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let storage = Storage::new();

        let mut mixes = storage.load_mixes();
        if mixes.is_empty() {
            // First run: materialize and persist the sample records
            mixes = store::seed_mixes();
            storage.save_mixes(&mixes);
            println!("🌱 Seeded library with {} sample mixes", mixes.len());
        }

        let theme = storage.load_theme();
        let library_name = storage.load_library_name();

        println!("🎨 Mix Gallery initialized with {} mixes", mixes.len());
        let status = format!("Ready. {} mixes in library.", mixes.len());

        let mut app = MixGallery {
            storage,
            mixes,
            library_name,
            theme,
            view_mode: ViewMode::Grid,
            search_query: String::new(),
            sort_by: SortOption::Newest,
            images: HashMap::new(),
            editor: None,
            pending_delete: None,
            lightbox: None,
            lightbox_zoom: 1.0,
            lightbox_offset: Vector::new(0.0, 0.0),
            copied: None,
            status,
        };

        let load = app.load_missing_images();
        (app, load)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::LibraryNameChanged(name) => {
                self.library_name = name;
                self.storage.save_library_name(&self.library_name);
                Task::none()
            }
            Message::SearchChanged(query) => {
                self.search_query = query;
                Task::none()
            }
            Message::SortChanged(sort) => {
                self.sort_by = sort;
                Task::none()
            }
            Message::ViewModeChanged(mode) => {
                self.view_mode = mode;
                Task::none()
            }
            Message::ToggleTheme => {
                self.theme = self.theme.toggled();
                self.storage.save_theme(self.theme);
                Task::none()
            }

            Message::OpenLightbox(id) => {
                self.lightbox = self.displayed().iter().position(|m| m.id == id);
                self.reset_lightbox_view();
                Task::none()
            }
            Message::LightboxClosed => {
                self.lightbox = None;
                Task::none()
            }
            Message::LightboxNext => {
                if let Some(index) = self.lightbox {
                    let len = self.displayed().len();
                    if len > 0 {
                        self.lightbox = Some(ui::lightbox::next_index(index, len));
                        self.reset_lightbox_view();
                    }
                }
                Task::none()
            }
            Message::LightboxPrev => {
                if let Some(index) = self.lightbox {
                    let len = self.displayed().len();
                    if len > 0 {
                        self.lightbox = Some(ui::lightbox::prev_index(index, len));
                        self.reset_lightbox_view();
                    }
                }
                Task::none()
            }
            Message::LightboxZoomed(delta) => {
                self.lightbox_zoom = ui::lightbox::clamp_zoom(self.lightbox_zoom + delta);
                Task::none()
            }
            Message::LightboxPanned(delta) => {
                self.lightbox_offset = self.lightbox_offset + delta;
                Task::none()
            }
            Message::OpenLink(url) => {
                if let Err(e) = open::that(&url) {
                    eprintln!("⚠️  Failed to open {}: {}", url, e);
                }
                Task::none()
            }
            Message::CopyPrompt(id) => {
                let Some(mix) = self.mixes.iter().find(|m| m.id == id) else {
                    return Task::none();
                };

                self.copied = Some(id);
                Task::batch([
                    clipboard::write(mix.prompt.clone()),
                    Task::perform(tokio::time::sleep(Duration::from_secs(2)), |_| {
                        Message::CopiedReset
                    }),
                ])
            }
            Message::CopiedReset => {
                self.copied = None;
                Task::none()
            }

            Message::OpenAdd => {
                self.editor = Some(MixEditor::add());
                Task::none()
            }
            Message::OpenEdit(id) => {
                if let Some(mix) = self.mixes.iter().find(|m| m.id == id) {
                    self.editor = Some(MixEditor::edit(mix));
                }
                Task::none()
            }
            Message::EditorTitleChanged(title) => {
                if let Some(editor) = &mut self.editor {
                    editor.title = title;
                }
                Task::none()
            }
            Message::EditorUrlChanged(url) => {
                if let Some(editor) = &mut self.editor {
                    editor.url = url;
                }
                Task::none()
            }
            Message::EditorPromptEdited(action) => {
                if let Some(editor) = &mut self.editor {
                    editor.prompt.perform(action);
                }
                Task::none()
            }
            Message::EditorNegativeEdited(action) => {
                if let Some(editor) = &mut self.editor {
                    editor.negative_prompt.perform(action);
                }
                Task::none()
            }
            Message::EditorSubmitted => {
                let Some(editor) = self.editor.take() else {
                    return Task::none();
                };
                if !editor.can_submit() {
                    // Save stays disabled without a title; keep the form open
                    self.editor = Some(editor);
                    return Task::none();
                }

                let draft = editor.draft();
                match &editor.editing {
                    Some(id) => {
                        store::update_mix(&mut self.mixes, id, &draft);
                        // The url may have changed; drop any stale image
                        media::fetch::evict_cached_image(id);
                        self.images.remove(id);
                        self.status = format!("Updated \"{}\"", draft.title);
                    }
                    None => {
                        let mix = store::create_mix(&draft);
                        self.status = format!("Added \"{}\"", mix.title);
                        self.mixes.insert(0, mix);
                    }
                }

                self.storage.save_mixes(&self.mixes);
                self.load_missing_images()
            }
            Message::EditorDismissed => {
                self.editor = None;
                Task::none()
            }

            Message::DeleteRequested(id) => {
                self.pending_delete = Some(id);
                Task::none()
            }
            Message::DeleteConfirmed => {
                if let Some(id) = self.pending_delete.take() {
                    store::delete_mix(&mut self.mixes, &id);
                    self.storage.save_mixes(&self.mixes);
                    media::fetch::evict_cached_image(&id);
                    self.images.remove(&id);
                    self.status = format!("Mix deleted. {} mixes in library.", self.mixes.len());
                }
                Task::none()
            }
            Message::DeleteDismissed => {
                self.pending_delete = None;
                Task::none()
            }

            Message::ImportRequested => {
                let file = FileDialog::new()
                    .set_title("Import Mix Library")
                    .add_filter("JSON", &["json"])
                    .pick_file();

                if let Some(path) = file {
                    self.status = format!("Importing {}...", path.display());
                    return Task::perform(
                        async move {
                            tokio::fs::read_to_string(&path)
                                .await
                                .map_err(|e| format!("Failed to read {}: {}", path.display(), e))
                        },
                        Message::ImportLoaded,
                    );
                }

                Task::none()
            }
            Message::ImportLoaded(Ok(text)) => {
                match transfer::import_document(&text, &self.mixes) {
                    Ok(import) => {
                        let added = import.new_mixes.len();

                        // Imported records land before the existing ones
                        let mut merged = import.new_mixes;
                        merged.append(&mut self.mixes);
                        self.mixes = merged;
                        self.storage.save_mixes(&self.mixes);

                        if let Some(title) = import.library_title {
                            self.library_name = title;
                            self.storage.save_library_name(&self.library_name);
                        }

                        self.status = format!(
                            "✅ Import complete! Added {} mixes, skipped {} duplicates.",
                            added, import.duplicates
                        );
                        println!(
                            "📊 Import summary: {} new, {} skipped",
                            added, import.duplicates
                        );

                        self.load_missing_images()
                    }
                    Err(e) => {
                        self.status = format!("❌ Import failed: {}", e);
                        Task::none()
                    }
                }
            }
            Message::ImportLoaded(Err(e)) => {
                self.status = format!("❌ Import failed: {}", e);
                Task::none()
            }

            Message::ExportRequested => {
                let suggested = transfer::export_file_name(
                    self.mixes.len(),
                    &self.library_name,
                    Utc::now().date_naive(),
                );

                let file = FileDialog::new()
                    .set_title("Export Mix Library")
                    .set_file_name(suggested)
                    .add_filter("JSON", &["json"])
                    .save_file();

                if let Some(path) = file {
                    let json = transfer::export_json(&self.library_name, &self.mixes);
                    return Task::perform(
                        async move {
                            tokio::fs::write(&path, json)
                                .await
                                .map(|_| path.display().to_string())
                                .map_err(|e| format!("Failed to write {}: {}", path.display(), e))
                        },
                        Message::ExportFinished,
                    );
                }

                Task::none()
            }
            Message::ExportFinished(Ok(path)) => {
                self.status = format!("✅ Exported library to {}", path);
                Task::none()
            }
            Message::ExportFinished(Err(e)) => {
                self.status = format!("❌ Export failed: {}", e);
                Task::none()
            }

            Message::ImageLoaded(id, Ok(handle)) => {
                self.images.insert(id, ImageState::Loaded(handle));
                Task::none()
            }
            Message::ImageLoaded(id, Err(e)) => {
                eprintln!("⚠️  Failed to load image for {}: {}", id, e);
                // Try the stock placeholder before giving up on an image entirely
                self.images.insert(id.clone(), ImageState::Loading);
                Task::perform(
                    media::fetch::load_image(
                        media::fetch::DEFAULT_IMAGE_CACHE_ID.to_string(),
                        media::fetch::DEFAULT_IMAGE_URL.to_string(),
                    ),
                    move |result| {
                        Message::FallbackLoaded(id.clone(), result.map(image::Handle::from_bytes))
                    },
                )
            }
            Message::FallbackLoaded(id, Ok(handle)) => {
                self.images.insert(id, ImageState::Loaded(handle));
                Task::none()
            }
            Message::FallbackLoaded(id, Err(e)) => {
                eprintln!("⚠️  Placeholder image unavailable for {}: {}", id, e);
                self.images.insert(id, ImageState::Failed);
                Task::none()
            }
        }
    }

    /// The mixes currently visible, after search and sort
    fn displayed(&self) -> Vec<Mix> {
        query::process(&self.mixes, &self.search_query, self.sort_by)
    }

    fn reset_lightbox_view(&mut self) {
        self.lightbox_zoom = 1.0;
        self.lightbox_offset = Vector::new(0.0, 0.0);
    }

    /// Kick off loads for every mix without an image state yet
    fn load_missing_images(&mut self) -> Task<Message> {
        let missing: Vec<(String, String)> = self
            .mixes
            .iter()
            .filter(|m| !self.images.contains_key(&m.id))
            .map(|m| (m.id.clone(), m.url.clone()))
            .collect();

        let mut tasks = Vec::new();
        for (id, url) in missing {
            self.images.insert(id.clone(), ImageState::Loading);
            tasks.push(Task::perform(
                media::fetch::load_image(id.clone(), url),
                move |result| {
                    Message::ImageLoaded(id.clone(), result.map(image::Handle::from_bytes))
                },
            ));
        }

        Task::batch(tasks)
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let base: Element<Message> = column![self.header(), self.gallery(), self.status_bar()]
            .spacing(12)
            .padding(16)
            .into();

        if let Some(editor) = &self.editor {
            return ui::modal::overlay(base, editor.view(), Message::EditorDismissed);
        }

        if self.pending_delete.is_some() {
            return ui::modal::overlay(base, ui::modal::delete_confirm(), Message::DeleteDismissed);
        }

        if let Some(index) = self.lightbox {
            let displayed = self.displayed();
            if let Some(mix) = displayed.get(index) {
                return ui::lightbox::view(
                    base,
                    mix,
                    self.images.get(&mix.id),
                    self.lightbox_zoom,
                    self.lightbox_offset,
                );
            }
        }

        base
    }

    /// Arrow keys step through the lightbox; Escape closes it
    fn subscription(&self) -> Subscription<Message> {
        if self.lightbox.is_some() {
            keyboard::on_key_press(ui::lightbox::handle_key)
        } else {
            Subscription::none()
        }
    }

    fn header(&self) -> Element<Message> {
        let theme_label = match self.theme {
            AppTheme::Light => "🌙",
            AppTheme::Dark => "☀",
        };

        let view_toggle = |label, mode| {
            let style = if self.view_mode == mode {
                button::primary
            } else {
                button::secondary
            };
            button(text(label).size(13))
                .on_press(Message::ViewModeChanged(mode))
                .style(style)
                .padding(8)
        };

        row![
            text_input("Library name", &self.library_name)
                .on_input(Message::LibraryNameChanged)
                .size(20)
                .width(Length::Fixed(260.0)),
            horizontal_space(),
            text_input("Search mixes...", &self.search_query)
                .on_input(Message::SearchChanged)
                .padding(8)
                .width(Length::Fixed(220.0)),
            pick_list(SortOption::ALL, Some(self.sort_by), Message::SortChanged)
                .padding(8),
            button(text(theme_label).size(13))
                .on_press(Message::ToggleTheme)
                .style(button::secondary)
                .padding(8),
            view_toggle("Details", ViewMode::Details),
            view_toggle("Grid", ViewMode::Grid),
            view_toggle("List", ViewMode::List),
            button(text("Import").size(13))
                .on_press(Message::ImportRequested)
                .style(button::secondary)
                .padding(8),
            button(text("Export").size(13))
                .on_press(Message::ExportRequested)
                .style(button::secondary)
                .padding(8),
            button(text("＋ Add Mix").size(13))
                .on_press(Message::OpenAdd)
                .padding(8),
        ]
        .spacing(8)
        .align_y(iced::Alignment::Center)
        .into()
    }

    fn gallery(&self) -> Element<Message> {
        let displayed = self.displayed();

        if displayed.is_empty() {
            return self.empty_state();
        }

        let copied = self.copied.as_deref();
        let cards: Vec<Element<Message>> = displayed
            .iter()
            .map(|mix| {
                ui::card::view(
                    mix,
                    self.images.get(&mix.id),
                    self.view_mode,
                    copied == Some(mix.id.as_str()),
                )
            })
            .collect();

        let body: Element<Message> = match self.view_mode {
            ViewMode::Grid => iced_aw::Wrap::with_elements(cards)
                .spacing(16.0)
                .line_spacing(16.0)
                .into(),
            ViewMode::List => column(cards).spacing(10).into(),
            ViewMode::Details => column(cards).spacing(14).into(),
        };

        scrollable(container(body).width(Length::Fill).padding(4))
            .height(Length::Fill)
            .into()
    }

    fn empty_state(&self) -> Element<Message> {
        let searching = !self.search_query.trim().is_empty();
        let (heading, hint) = if searching {
            ("No matches found", "Try adjusting your search terms.")
        } else {
            ("No mixes yet", "Click \"Add Mix\" to start your library.")
        };

        container(
            column![text(heading).size(24), text(hint).size(14)]
                .spacing(8)
                .align_x(iced::Alignment::Center),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .center_x(Length::Fill)
        .center_y(Length::Fill)
        .into()
    }

    fn status_bar(&self) -> Element<Message> {
        container(text(self.status.clone()).size(13))
            .width(Length::Fill)
            .padding(6)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        match self.theme {
            AppTheme::Light => Theme::Light,
            AppTheme::Dark => Theme::Dark,
        }
    }
}

fn main() -> iced::Result {
    iced::application("Mix Gallery", MixGallery::update, MixGallery::view)
        .theme(MixGallery::theme)
        .subscription(MixGallery::subscription)
        .centered()
        .run_with(MixGallery::new)
}
