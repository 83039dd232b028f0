// Prepared statement cache. Every distinct query text is prepared once and the handle is shared by
// all later callers, including the ones that arrive while the first preparation is still in flight.
// A failed preparation is handed to everyone waiting on it, then the entry is dropped so the next
// caller prepares again.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use futures::prelude::*;
use futures::future::{self, Shared};

use engine::{DataEngine, EngineFuture};

pub type PrepareFuture<S> = Box<Future<Item = S, Error = PrepareError> + Send>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrepareError {
    EmptyQuery,
    Failed {
        query: String,
        reason: String,
    },
}

impl fmt::Display for PrepareError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            &PrepareError::EmptyQuery => write!(f, "cannot prepare an empty query"),
            &PrepareError::Failed { ref query, ref reason } =>
                write!(f, "cannot prepare '{}': {}", query, reason),
        }
    }
}

impl Error for PrepareError {}

struct CacheEntry<S> {
    // distinguishes a retried preparation from the failed one it replaced
    generation: u64,
    prepared: Shared<EngineFuture<S>>,
}

struct Entries<S> {
    next_generation: u64,
    map: HashMap<String, CacheEntry<S>>,
}

pub struct StatementCache<E> where E: DataEngine {
    engine: Arc<E>,
    entries: Arc<Mutex<Entries<E::Statement>>>,
}

impl <E> StatementCache<E> where E: DataEngine {
    pub fn new(engine: &Arc<E>) -> StatementCache<E> {
        StatementCache {
            engine: engine.clone(),
            entries: Arc::new(Mutex::new(Entries {
                next_generation: 0,
                map: HashMap::new(),
            })),
        }
    }

    /// Get the prepared handle for `query`, preparing it on first use.
    /// Concurrent first callers share the one in-flight preparation.
    pub fn get_or_add(&self, query: &str) -> PrepareFuture<E::Statement> {
        if query.is_empty() {
            return Box::new(future::err(PrepareError::EmptyQuery));
        }
        let (generation, prepared) = {
            let mut guard = self.entries.lock();
            let entries = &mut *guard;
            let settled_failure = entries.map
                .get(query)
                .map(|entry| match entry.prepared.peek() {
                    Some(Err(_)) => true,
                    _ => false
                })
                .unwrap_or(false);
            if settled_failure {
                entries.map.remove(query);
            }
            let engine = &self.engine;
            let next_generation = &mut entries.next_generation;
            let entry = entries.map
                .entry(query.to_owned())
                .or_insert_with(|| {
                    *next_generation += 1;
                    debug!("preparing statement: {}", query);
                    CacheEntry {
                        generation: *next_generation,
                        prepared: engine.prepare(query).shared(),
                    }
                });
            (entry.generation, entry.prepared.clone())
        };
        let entries = self.entries.clone();
        let query = query.to_owned();
        Box::new(prepared
            .map(|statement| (*statement).clone())
            .map_err(move |e| {
                let reason = (*e).clone();
                if evict(&entries, &query, generation) {
                    warn!("preparing '{}' failed, evicted from cache: {}", query, reason);
                }
                PrepareError::Failed { query, reason }
            }))
    }

    /// Prepare every query in one go. All preparations are issued before any is awaited and the
    /// handles come back in the order of `queries`. The batch settles once every member has, so
    /// a failed member is always evicted; the first failure in query order fails the batch.
    pub fn get_or_add_all<Q>(&self, queries: &[Q]) -> PrepareFuture<Vec<E::Statement>>
        where Q: AsRef<str>
    {
        let prepares: Vec<_> = queries
            .iter()
            .map(|query| self.get_or_add(query.as_ref()).then(|result| Ok::<_, PrepareError>(result)))
            .collect();
        Box::new(future::join_all(prepares)
            .and_then(|results| results.into_iter().collect::<Result<Vec<_>, _>>()))
    }

    pub fn contains(&self, query: &str) -> bool {
        self.entries.lock().map.contains_key(query)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// only removes the entry if it is still the one that failed
fn evict<S>(entries: &Mutex<Entries<S>>, query: &str, generation: u64) -> bool {
    let mut entries = entries.lock();
    let failed = entries.map
        .get(query)
        .map(|entry| entry.generation == generation)
        .unwrap_or(false);
    if failed {
        entries.map.remove(query);
    }
    failed
}
