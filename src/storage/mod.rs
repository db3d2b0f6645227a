//! Storage module
//!
//! Uploads raw archive files to object storage.
//!
//! Destinations are `object_store` backends: Google Cloud Storage for real
//! runs, the local filesystem for dry runs, any other store in tests.

mod destination;

pub use destination::CloudDestination;
