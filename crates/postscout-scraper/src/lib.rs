pub mod chromium;
pub mod collect;
pub mod driver;
pub mod error;
pub mod extract;
pub mod identity;
pub mod normalize;
pub mod pacing;
pub mod report;
pub mod run;
pub mod selectors;
pub mod session;

pub use chromium::{ChromiumPage, LaunchOptions};
pub use collect::{CollectOptions, CollectionLoop, Step};
pub use driver::{FeedPage, PostElement, WaitState};
pub use error::{DriverError, ScraperError};
pub use extract::extract_post;
pub use identity::resolve_identity;
pub use pacing::Pacing;
pub use report::write_report;
pub use run::{execute, run};
pub use session::{Authentication, SessionGate, SessionState};
