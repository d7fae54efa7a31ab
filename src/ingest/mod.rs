//! Data ingestion from the remote form-collection service.
//!
//! Submodules:
//! - `kobo` — KoboToolbox v2 API client (the only data source).

pub mod kobo;
