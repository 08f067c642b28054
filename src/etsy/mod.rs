// Etsy Open API client — shop lookup and paginated active-listing retrieval.
//
// The client is a thin reqwest wrapper with request throttling and retry.
// Each submodule handles one concern of the API boundary.

pub mod client;
pub mod error;
pub mod listings;
pub mod rate_limit;
pub mod traits;
