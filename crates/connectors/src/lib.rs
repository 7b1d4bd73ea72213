//! `connectors` crate — the `RecordSource` trait and source implementations.
//!
//! A record source is any external system that can serve flat records page
//! by page.  The engine crate drives the sync through this trait object, so
//! the real HTTP client and the test mock are interchangeable.

pub mod error;
pub mod traits;
pub mod airtable;
pub mod mock;

pub use error::SourceError;
pub use traits::{RawRecord, RecordPage, RecordSource};
pub use airtable::AirtableSource;
