//! # Merge Strategies
//!
//! Pure functions that fold one source's partial result into the result
//! accumulated so far.
//!
//! | Strategy | On key collision |
//! |---|---|
//! | [`MultivaluedAttributeMerger`] | append values (optionally de-duplicated) |
//! | [`ReplacingAttributeMerger`] | later source replaces the whole list |
//! | [`NoncollidingAttributeMerger`] | earlier source wins |
//! | [`ReturnChangesAttributeMerger`] | only the later map survives |
//! | [`ReturnOriginalAttributeMerger`] | only the earlier map survives |
//!
//! Strategies are not commutative: the configured source order decides which
//! side of a collision a value lands on.
//!
//! ## Example
//!
//! ```rust
//! use persondir::merge::{AttributeMerger, MultivaluedAttributeMerger};
//! use persondir::AttributeMap;
//!
//! let merger = MultivaluedAttributeMerger::new();
//! let merged = merger.merge(
//!     AttributeMap::new().with("group", ["staff"]),
//!     &AttributeMap::new().with("group", ["faculty"]),
//! );
//! assert_eq!(merged.get("group").unwrap().len(), 2);
//! ```

mod merger;
mod multivalued;
mod simple;

pub use merger::{AttributeMerger, MergeStrategy};
pub use multivalued::MultivaluedAttributeMerger;
pub use simple::{
    NoncollidingAttributeMerger, ReplacingAttributeMerger, ReturnChangesAttributeMerger,
    ReturnOriginalAttributeMerger,
};
