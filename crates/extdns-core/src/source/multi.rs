// # Multi Source
//
// Combines several sources into one. Endpoints are concatenated in source
// order; the first failing source aborts the whole call.

use async_trait::async_trait;
use tracing::debug;

use crate::endpoint::Endpoint;
use crate::traits::Source;
use crate::Error;

/// A source that concatenates the endpoints of its children
pub struct MultiSource {
    children: Vec<Box<dyn Source>>,
}

impl MultiSource {
    /// Create a multi source over the given children
    pub fn new(children: Vec<Box<dyn Source>>) -> Self {
        Self { children }
    }

    /// Number of child sources
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// True if there are no child sources
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

#[async_trait]
impl Source for MultiSource {
    async fn endpoints(&self) -> Result<Vec<Endpoint>, Error> {
        let mut endpoints = Vec::new();

        for child in &self.children {
            let found = child.endpoints().await?;
            debug!(
                source = child.source_name(),
                count = found.len(),
                "Collected endpoints"
            );
            endpoints.extend(found);
        }

        Ok(endpoints)
    }

    fn source_name(&self) -> &'static str {
        "multi"
    }
}
