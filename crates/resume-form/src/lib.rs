#![allow(missing_docs)]

pub mod collab;
pub mod data;
pub mod i18n;
pub mod image;
pub mod layout;
pub mod navigation;
pub mod progress;
pub mod repository;
pub mod rules;
pub mod session;
pub mod store;
pub mod validate;

pub use collab::{DocumentExporter, ExportError, PreviewRenderer, RenderError, export_file_stem};
pub use data::{ResumeData, ResumeSnapshot, keys};
pub use i18n::{Catalog, SUPPORTED_LOCALES};
pub use image::{CodecError, EncodedImage, ImageCodec, ImageError, ProfileImagePipeline};
pub use layout::{FormLayout, InputKind, InputSpec, label_marks_optional, step_layout};
pub use navigation::{Advance, NavigationController, NavigationError, Transition, WizardState};
pub use progress::{Page, Progress, ProgressError, Step};
pub use repository::{
    ACCENT_COLOR_KEY, AccentColorError, ClearError, DEFAULT_ACCENT_COLOR, FORM_PROGRESS_KEY,
    PROFILE_IMAGE_KEY, RESUME_DATA_KEY, ResumeRepository, SaveOutcome,
};
pub use rules::rule_for;
pub use session::{AlertChannel, ErrorDisplay, FieldState, FormSession, LogAlert};
pub use store::{KeyValueStore, MemoryStore, StoreError};
pub use validate::{FieldRule, Validation, Validator, validate};
