//! Share-message rendering for FRR.
//!
//! After a report is normalized and frozen, a reporter can push it to a
//! messaging app. This crate produces that outbound representation: a flat
//! text rendering of the report (uppercased key/value lines, sentinel-valued
//! fields omitted) and a `wa.me` share link wrapping the text.
//!
//! Rendering is presentation only: it never mutates the report, and it
//! consumes the normalized form. Blank leaves should already have been
//! replaced by the sentinel before anything reaches this crate.

mod message;

pub use message::{share_link, share_text};
