#![deny(clippy::future_not_send)]

mod assemble;
mod classify;
mod client;
mod config;
mod fetch;
mod operation;
mod outcome;
mod policy;

pub mod link;

pub use assemble::{assemble, FinalResponse};
pub use classify::classify;
pub use client::{BuildError, Client, ClientBuilder, Subscription};
pub use config::{ClientConfig, RetryConfig};
pub use error::{CombinedError, ErrorPath, ErrorPathSegment, GraphqlError, Location, NetworkError};
pub use fetch::{FetchRequest, FetchResult, Fetcher, FetcherInner};
pub use operation::Operation;
pub use outcome::Outcome;
pub use policy::ErrorPolicy;
