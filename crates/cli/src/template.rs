// Opening a template: settings -> backend client -> loaded editor

use std::path::Path;
use std::time::Duration;

use labsheet_client::{load_token, ClientOptions, TemplateClient};
use labsheet_config::Settings;
use labsheet_engine::{FontSize, ResolvedStyle, TemplateEditor};
use labsheet_io::{DocumentError, DocumentIo};

use crate::exit_codes::{EXIT_ERROR, EXIT_LOAD_FAILED, EXIT_SAVE_FAILED};
use crate::CliError;

/// A loaded template plus the adapter that saves it back.
pub struct OpenTemplate {
    pub io: DocumentIo<TemplateClient>,
    pub editor: TemplateEditor,
}

impl OpenTemplate {
    pub fn open(settings: &Settings) -> Result<Self, CliError> {
        let doc = &settings.document;
        let default_size = FontSize::new(doc.default_font_size)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("document.default_font_size: {}", e)))?;

        let client = TemplateClient::new(client_options(settings))
            .map_err(|e| CliError::new(EXIT_ERROR, e.to_string()))?;
        let mut io = DocumentIo::new(client, doc.row_count)
            .with_section(doc.section.clone())
            .with_default_font_size(default_size);

        log::debug!("opening section '{}' from {}", doc.section, settings.backend.api_base);
        let loaded = io.load().map_err(load_error)?;
        let editor = TemplateEditor::new(loaded.content, loaded.overlay, doc.col_count)
            .with_defaults(ResolvedStyle::with_font_size(default_size));

        Ok(Self { io, editor })
    }

    pub fn save(&mut self) -> Result<(), CliError> {
        let editor = &self.editor;
        self.io
            .save(editor.content(), editor.overlay())
            .map_err(|e| CliError::new(EXIT_SAVE_FAILED, e.to_string()))
    }
}

fn client_options(settings: &Settings) -> ClientOptions {
    let backend = &settings.backend;
    let mut options = ClientOptions::new(backend.api_base.clone(), backend.media_base.clone())
        .with_timeout(Duration::from_secs(backend.timeout_secs));

    // Settings win over the token file
    let token = backend.token.clone().or_else(|| {
        load_token()
            .filter(|stored| stored.applies_to(&backend.api_base))
            .map(|stored| stored.token)
    });
    if let Some(token) = token {
        options = options.with_token(token);
    }
    options
}

fn load_error(e: DocumentError) -> CliError {
    let error = CliError::new(EXIT_LOAD_FAILED, e.to_string());
    if e.is_retryable() {
        error.with_hint("check backend.api_base and backend.media_base in the settings file")
    } else {
        error
    }
}

/// Settings from `path`, or from the default location.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, CliError> {
    let result = match path {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    result.map_err(|e| {
        CliError::new(EXIT_ERROR, e.to_string())
            .with_hint(format!("default settings file: {}", Settings::path().display()))
    })
}
