//! Batch resolution
//!
//! Drives the matcher over a list of inputs with bounded concurrency,
//! producing one independent result per input. A failure (or a degraded
//! store) on one input never aborts the rest of the batch; each input's
//! outcome is captured in its own `ResolveResult`.

use crate::matcher::{PlayerResolver, ResolveRequest};
use crate::types::ResolveResult;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One batch entry: the name plus the optional hints its source carried
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchInput {
    pub name: String,
    pub position: Option<String>,
    pub team: Option<String>,
}

impl BatchInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), position: None, team: None }
    }
}

/// Options shared by every input in a batch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchOptions {
    pub source: Option<String>,
    pub fuzzy_threshold: Option<f64>,
    pub max_suggestions: Option<usize>,
    pub auto_quarantine: Option<bool>,

    /// Override for the configured concurrency bound
    pub concurrency: Option<usize>,
}

impl PlayerResolver {
    /// Resolve a batch of inputs, returning a map from input name to its
    /// result.
    ///
    /// Inputs resolve with bounded concurrency; no cross-input ordering is
    /// guaranteed. Duplicate names keep the last-resolved result, though
    /// every input is still resolved (and possibly quarantined)
    /// individually.
    pub async fn resolve_batch(
        &self,
        inputs: Vec<BatchInput>,
        options: &BatchOptions,
    ) -> HashMap<String, ResolveResult> {
        let concurrency = options.concurrency.unwrap_or(self.config().batch_concurrency).max(1);

        stream::iter(inputs.into_iter().map(|input| {
            let request = ResolveRequest {
                name: input.name.clone(),
                position: input.position,
                team: input.team,
                source: options.source.clone(),
                fuzzy_threshold: options.fuzzy_threshold,
                max_suggestions: options.max_suggestions,
                auto_quarantine: options.auto_quarantine,
            };
            async move { (input.name, self.resolve(&request).await) }
        }))
        .buffer_unordered(concurrency)
        .collect::<HashMap<String, ResolveResult>>()
        .await
    }
}
