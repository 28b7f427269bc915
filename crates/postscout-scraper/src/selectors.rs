//! CSS selectors for the feed's rendered markup.
//!
//! The markup is third-party and unversioned; when the site changes, this is
//! the file to update.

// Login form
pub const LOGIN_FIELD: &str = r#"input[name="session_key"]"#;
pub const PASSWORD_FIELD: &str = r#"input[name="session_password"]"#;
pub const LOGIN_SUBMIT: &str = r#"button[type="submit"]"#;
/// Appears only once the home feed has rendered after a successful sign-in.
pub const FEED_LANDMARK: &str = "div.feed-shared-update-v2";

// Activity feed
pub const RECENT_ACTIVITY_LINK: &str = r#"a[href*="/recent-activity/"]"#;
pub const POST_LIST_ITEM: &str = "div.scaffold-finite-scroll__content > ul > li";
pub const POST: &str = "div[role='article']";

// Post fields, relative to a `POST` element
pub const POST_URN_ATTRIBUTE: &str = "data-urn";
pub const AUTHOR_LINK: &str = "a.update-components-actor__meta-link";
pub const POST_TIME: &str =
    "span.update-components-actor__sub-description > span:nth-of-type(1)";
pub const POST_BODY: &str = r#"div[dir="ltr"]"#;
pub const REACTIONS_COUNT: &str = "span.social-details-social-counts__reactions-count";
pub const COMMENTS_COUNT: &str = "li.social-details-social-counts__comments > button > span";
