//! Typed parameters for endpoint inputs: path segments, query strings and
//! request bodies that are specific to the web layer.

pub(crate) mod approval;
pub(crate) mod preferences;
pub(crate) mod stats;
pub(crate) mod team;
