pub mod config;
pub mod graph_resolver;
mod relay_store;
pub mod relay_store_extractor;
pub mod requests;
mod scrape_error;
mod scraping_context;
mod teacher;
mod text_manipulators;

pub use relay_store::{FlatStore, Fragment, ReferenceKey};
pub use relay_store_extractor::RelayStoreExtractor;
pub use requests::{PageFetcher, RequestClient};
pub use scrape_error::ScrapeError;
pub use scraping_context::ScrapingContext;
pub use teacher::{
    CourseRecord, RatingRecord, RatingsDistribution, SchoolRecord, TeacherDetail, TeacherSummary,
};
pub use text_manipulators::encode_query_component;
