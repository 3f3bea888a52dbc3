pub mod dom;
pub mod protocol;
pub mod url_match;

pub use dom::{DocumentQuery, DomElement};
pub use protocol::{SelectorMeta, SelectorResult};
pub use url_match::matches_url;
