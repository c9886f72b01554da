use log::{debug, error};
use regex::Regex;
use serde_json::{Map, Value};

use crate::{FlatStore, ScrapeError};

pub struct RelayStoreExtractor {
    // Captures the object literal assigned to the relay store, up to but not
    // including the first `};` on the same line.
    relay_store_regex: Regex,
}

impl RelayStoreExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        let relay_store_regex = Regex::new(r"RELAY_STORE__ = (.*?)\};")?;
        Ok(Self { relay_store_regex })
    }

    /// Carves the relay store out of a server-rendered page.
    ///
    /// `Ok(None)` means the page has no relay store at all (unknown name or id,
    /// or a layout change) and is not an error. A store that is found but does
    /// not parse is [`ScrapeError::MalformedPayload`].
    pub fn extract(&self, page_text: &str) -> Result<Option<FlatStore>, ScrapeError> {
        let Some(caps) = self.relay_store_regex.captures(page_text) else {
            debug!("no relay store in page ({} bytes)", page_text.len());
            return Ok(None);
        };
        let Some(match_) = caps.get(1) else {
            return Ok(None);
        };

        // The sentinel swallowed the closing brace of the literal.
        let mut literal = String::with_capacity(match_.len() + 1);
        literal.push_str(match_.as_str());
        literal.push('}');

        let entries = serde_json::from_str::<Map<String, Value>>(&literal).map_err(|e| {
            error!("relay store found but payload is malformed: {e}");
            ScrapeError::MalformedPayload(e)
        })?;
        Ok(Some(FlatStore::new(entries)))
    }
}
