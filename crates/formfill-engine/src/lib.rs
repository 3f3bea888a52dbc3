//! Selector and candidate engine for recording and replaying form fills.
//!
//! The core ([`is_generated_id`], [`generate_selector`], [`is_semantic_element`],
//! [`build_candidate_list`]) is synchronous and works over the DOM capability
//! traits in [`dom`]. The remaining modules cover what surrounds it: turning
//! picks into entries, persisting them, and replaying them.

pub mod candidates;
pub mod classifier;
pub mod config;
pub mod formatter;
pub mod picker;
pub mod replay;
pub mod semantic;
pub mod store;
pub mod synthesizer;

pub use candidates::{Candidate, CandidateOptions, CandidateSummary, build_candidate_list};
pub use classifier::is_generated_id;
pub use formfill_common::dom;
pub use formfill_common::protocol;
pub use picker::{PickMode, PickerError, PickerSession};
pub use replay::{ReplayDriver, ReplayError, ReplayRunner, ReplayStep, entries_to_run, plan_entry};
pub use semantic::is_semantic_element;
pub use store::{EntryStore, EntryUpdate, GlobalSettingsUpdate, StoreError};
pub use synthesizer::{SelectorOptions, generate_selector};
