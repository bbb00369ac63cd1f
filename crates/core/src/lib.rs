//! Core of the speech markup example agent.
//!
//! Everything here is synchronous and side-effect free:
//! - `markup` escapes interpolated values and compacts authored templates
//! - `catalog` renders the fixed topic -> document mapping once at startup
//! - `composer` builds the user-facing sentences around the catalog
//! - `dispatch` maps a classified intent to a reply
//!
//! Transport lives in `speakmark-server`; this crate never sees HTTP.

pub mod catalog;
pub mod composer;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod markup;

pub use catalog::{Catalog, CatalogError, ExampleTemplate};
pub use composer::ResponseComposer;
pub use dispatch::{Intent, IntentDispatcher, Outcome, Reply, RequestContext};
pub use errors::{ApplicationError, InterfaceError, RequestError};
