use log::{debug, info};

use crate::{
    FlatStore, ScrapeError, TeacherDetail, TeacherSummary,
    config::ScrapingConfig,
    graph_resolver::{resolve_search_results, resolve_teacher_detail},
    relay_store_extractor::RelayStoreExtractor,
    requests::{PageFetcher, RequestClient},
    text_manipulators::encode_query_component,
};

/// Everything one fetch-extract-resolve pipeline needs. Holds no per-request
/// state, so one context can serve any number of concurrent lookups.
///
/// The fetcher's connection pool is shared between lookups; it carries no
/// request data, so each lookup still runs its own independent exchange.
pub struct ScrapingContext<F = RequestClient> {
    pub scraping_config: ScrapingConfig,
    pub relay_store_extractor: RelayStoreExtractor,
    pub page_fetcher: F,
}

impl ScrapingContext<RequestClient> {
    pub fn new() -> anyhow::Result<Self> {
        let scraping_config = ScrapingConfig::new()?;
        let request_client = RequestClient::new()?;
        Self::with_fetcher(scraping_config, request_client)
    }
}

impl<F: PageFetcher> ScrapingContext<F> {
    pub fn with_fetcher(scraping_config: ScrapingConfig, page_fetcher: F) -> anyhow::Result<Self> {
        let relay_store_extractor = RelayStoreExtractor::new()?;
        Ok(Self {
            scraping_config,
            relay_store_extractor,
            page_fetcher,
        })
    }

    pub fn search_url(&self, name: &str) -> String {
        format!(
            "{}/search/teachers?query={}",
            self.scraping_config.base_url(),
            encode_query_component(name)
        )
    }

    pub fn teacher_url(&self, legacy_id: u64) -> String {
        format!(
            "{}/ShowRatings.jsp?tid={}",
            self.scraping_config.base_url(),
            legacy_id
        )
    }

    pub fn school_url(&self, legacy_id: u64) -> String {
        format!(
            "{}/campusRatings.jsp?sid={}",
            self.scraping_config.base_url(),
            legacy_id
        )
    }

    /// Teachers matching `name`, in the order the site listed them.
    ///
    /// `Ok(None)` when the page carried no relay store. An empty list is a
    /// valid answer: the search simply matched nobody.
    pub async fn search_teachers(
        &self,
        name: &str,
    ) -> Result<Option<Vec<TeacherSummary>>, ScrapeError> {
        let Some(store) = self.fetch_store(&self.search_url(name)).await? else {
            return Ok(None);
        };
        let teachers = resolve_search_results(&store);
        info!("search for {name:?} matched {} teachers", teachers.len());
        Ok(Some(teachers))
    }

    /// The fully resolved teacher behind a legacy id, or `Ok(None)` when the
    /// page has no relay store or no teacher in it.
    pub async fn get_teacher_detail(
        &self,
        legacy_id: u64,
    ) -> Result<Option<TeacherDetail>, ScrapeError> {
        let Some(store) = self.fetch_store(&self.teacher_url(legacy_id)).await? else {
            return Ok(None);
        };
        let teacher = resolve_teacher_detail(&store);
        if teacher.is_none() {
            debug!("no teacher fragment for legacy id {legacy_id}");
        }
        Ok(teacher)
    }

    async fn fetch_store(&self, url: &str) -> Result<Option<FlatStore>, ScrapeError> {
        let page_text = self.page_fetcher.fetch(url).await?;
        let store = self.relay_store_extractor.extract(&page_text)?;
        if let Some(store) = &store {
            debug!("{url}: relay store with {} fragments", store.len());
        }
        Ok(store)
    }
}
