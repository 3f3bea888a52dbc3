//! In-memory HTML document with a CSS selector engine.
//!
//! Good enough to run the selector and candidate engine outside a browser:
//! parse a page snapshot, point at an element, count selector matches.

pub mod document;
pub mod html;
pub mod selector;

pub use document::{Document, DocumentError, ElementRef, NodeId};
pub use html::{parse_html, HtmlError};
pub use selector::{SelectorError, SelectorList};
