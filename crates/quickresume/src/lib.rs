#![allow(missing_docs)]

pub mod cli;
pub mod cmd;
pub mod codec;
pub mod config;
pub mod export;
pub mod locale;
pub mod logging;
pub mod render;
pub mod storage;

pub use codec::JpegCodec;
pub use config::{Config, ImageConfig, LogConfig, PreviewConfig, StorageConfig};
pub use export::MarkdownExporter;
pub use render::{TemplateName, TemplatePreview, Templates};
pub use storage::FileStore;
