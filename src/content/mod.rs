pub mod extractor;
pub mod sanitizer;
pub mod wait;

pub use extractor::{ContentExtractor, Extraction, convert_markup};
pub use sanitizer::{CleanupRule, ContentSanitizer, SanitizeOptions, sanitize, sanitize_document};
pub use wait::ContentWait;
