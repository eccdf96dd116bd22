// Copyright 2025 the Diptych Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Feature store: the load lifecycle and the data it produces.

use alloc::sync::Arc;
use core::fmt;
use core::future::Future;

use crate::error::LoadError;
use crate::feature::MapData;
use crate::topology::decode_map;

/// Whether the store's content is usable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing has been requested yet.
    #[default]
    Idle,
    /// A load is in flight.
    Loading,
    /// Data is available.
    Loaded,
    /// The last load failed; the reason is shown to the user.
    Failed(String),
}

impl LoadState {
    /// Returns `true` once data has been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded)
    }

    /// The failure reason, if the last load failed.
    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        match self {
            Self::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Loading => f.write_str("loading"),
            Self::Loaded => f.write_str("loaded"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Identifies one load attempt.
///
/// Only the ticket from the most recent [`FeatureStore::begin_load`] may
/// complete a load; older tickets are stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    /// The attempt number this ticket belongs to.
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.generation
    }
}

/// What [`FeatureStore::finish_load`] did with a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The data was stored.
    Loaded,
    /// The failure was recorded.
    Failed,
    /// The ticket was superseded and the result was dropped.
    Stale,
}

/// Provides raw topology documents.
///
/// This is the only asynchronous boundary of the system.
pub trait TopologySource {
    /// Fetches the document at `url`.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, LoadError>>;
}

/// A source that always answers with the same bytes or the same failure.
#[derive(Clone, Debug)]
pub struct StaticSource {
    response: Result<Arc<[u8]>, String>,
}

impl StaticSource {
    /// Serves `bytes` for every URL.
    #[must_use]
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            response: Ok(bytes.into()),
        }
    }

    /// Fails every fetch with a network error carrying `reason`.
    #[must_use]
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            response: Err(reason.into()),
        }
    }
}

impl TopologySource for StaticSource {
    async fn fetch(&self, _url: &str) -> Result<Vec<u8>, LoadError> {
        match &self.response {
            Ok(bytes) => Ok(bytes.to_vec()),
            Err(reason) => Err(LoadError::Network(reason.clone())),
        }
    }
}

/// Fetches documents over HTTP(S).
///
/// The request runs to completion inside the returned future, so it blocks
/// whichever executor polls it.
#[cfg(feature = "http")]
#[derive(Debug)]
pub struct HttpSource {
    agent: ureq::Agent,
}

#[cfg(feature = "http")]
impl HttpSource {
    /// Creates a source with a default agent.
    #[must_use]
    pub fn new() -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
        }
    }
}

#[cfg(feature = "http")]
impl Default for HttpSource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "http")]
impl TopologySource for HttpSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, LoadError> {
        let mut response = self
            .agent
            .get(url)
            .call()
            .map_err(|err| LoadError::Network(err.to_string()))?;
        response
            .body_mut()
            .read_to_vec()
            .map_err(|err| LoadError::Network(err.to_string()))
    }
}

/// Fetches and decodes one object of a topology.
pub async fn fetch_map<S: TopologySource>(
    source: &S,
    url: &str,
    object: &str,
) -> Result<MapData, LoadError> {
    let bytes = source.fetch(url).await?;
    Ok(decode_map(&bytes, object)?)
}

/// Holds the decoded data and its [`LoadState`].
#[derive(Clone, Debug, Default)]
pub struct FeatureStore {
    state: LoadState,
    data: Option<Arc<MapData>>,
    generation: u64,
}

impl FeatureStore {
    /// Creates an idle, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current load state.
    #[must_use]
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// The most recently loaded data.
    ///
    /// A failed reload leaves earlier data in place.
    #[must_use]
    pub fn data(&self) -> Option<&Arc<MapData>> {
        self.data.as_ref()
    }

    /// Starts a new load attempt, superseding any in flight.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = LoadState::Loading;
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Returns `true` if `ticket` belongs to the most recent attempt.
    #[must_use]
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Records the result of the attempt identified by `ticket`.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<MapData, LoadError>,
    ) -> LoadOutcome {
        if !self.is_current(ticket) || self.state != LoadState::Loading {
            return LoadOutcome::Stale;
        }
        match result {
            Ok(data) => {
                self.data = Some(Arc::new(data));
                self.state = LoadState::Loaded;
                LoadOutcome::Loaded
            }
            Err(err) => {
                self.state = LoadState::Failed(err.to_string());
                LoadOutcome::Failed
            }
        }
    }

    /// Runs a whole attempt: begin, fetch, decode, and finish.
    pub async fn load<S: TopologySource>(
        &mut self,
        source: &S,
        url: &str,
        object: &str,
    ) -> LoadOutcome {
        let ticket = self.begin_load();
        let result = fetch_map(source, url, object).await;
        self.finish_load(ticket, result)
    }
}
