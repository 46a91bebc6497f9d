//! rf-client: the transport seam of the pipeline.
//!
//! Exposes the abstract backend trait ([`SimApi`]), the client-side
//! error taxonomy, and the memoized async resource cache every fetcher
//! above it goes through. Request signing, auth headers, and base URLs
//! live in the trait implementations, outside this workspace.

pub mod api;
pub mod cache;
pub mod error;

pub use api::SimApi;
pub use cache::{ReadPolicy, ResourceCache};
pub use error::{ClientError, ClientResult};
