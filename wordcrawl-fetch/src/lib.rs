pub mod error;
pub mod fetcher;
pub mod fixture;
pub mod http;
pub mod page;

pub use error::FetchError;
pub use fetcher::PageFetcher;
pub use fixture::FixtureFetcher;
pub use http::HttpPageFetcher;
pub use page::PageContents;
