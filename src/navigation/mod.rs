pub mod navigator;
pub mod resolver;
pub mod retry;
pub mod state;

pub use navigator::{Navigator, RevealOutcome, TocTarget};
pub use resolver::{Expansion, ExpansionPath, PathLookup, PathResolver, UNKNOWN_MENU};
pub use retry::{DEFAULT_MAX_ATTEMPTS, RetryPolicy};
pub use state::{ExpansionStateCache, MenuState};
