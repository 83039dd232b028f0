// Range sampler. Picks a random pivot, scans the id column forward and backward from the pivot's
// token with a pair of prepared range queries and merges the two windows into a sample.
// Short samples are padded by repeating what was found, so callers always get `count` ids back.

pub mod pivot;

use std::error::Error;
use std::fmt;
use std::i32;
use std::sync::Arc;

use futures::prelude::*;
use futures::future::{self, Either};

use engine::{DataEngine, BoundStatement, Row, Value};
use statements::{StatementCache, PrepareError};
use utils::stream::RepeatVec;
use utils::uuid::UUID;

pub use self::pivot::{PivotSource, RandomPivots, FixedPivot};

pub type SampleFuture = Box<Future<Item = Vec<UUID>, Error = SampleError> + Send>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleError {
    NoDataAvailable(String),
    Preparation(PrepareError),
    Execution(String),
    InvalidRow(String),
    InvalidCount(usize),
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            &SampleError::NoDataAvailable(ref resource) =>
                write!(f, "there are currently no sample {} available", resource),
            &SampleError::Preparation(ref e) => write!(f, "{}", e),
            &SampleError::Execution(ref reason) => write!(f, "range query failed: {}", reason),
            &SampleError::InvalidRow(ref reason) => write!(f, "cannot read sampled row: {}", reason),
            &SampleError::InvalidCount(count) =>
                write!(f, "sample size {} exceeds the query limit", count),
        }
    }
}

impl Error for SampleError {
    fn source(&self) -> Option<&(Error + 'static)> {
        match self {
            &SampleError::Preparation(ref e) => Some(e),
            _ => None
        }
    }
}

impl From<PrepareError> for SampleError {
    fn from(e: PrepareError) -> SampleError {
        SampleError::Preparation(e)
    }
}

/// Where samples of one kind of identifier live. `resource` names them in errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleTable {
    pub resource: String,
    pub table: String,
    pub id_column: String,
}

impl SampleTable {
    pub fn new(resource: &str, table: &str, id_column: &str) -> SampleTable {
        SampleTable {
            resource: resource.to_owned(),
            table: table.to_owned(),
            id_column: id_column.to_owned(),
        }
    }
    pub fn users() -> SampleTable {
        SampleTable::new("users", "sample_data_users", "userid")
    }
    pub fn videos() -> SampleTable {
        SampleTable::new("videos", "sample_data_videos", "videoid")
    }
    /// Forward scan from the pivot's token, then backward scan below it.
    /// Both take the pivot and the row limit as bind markers.
    pub fn range_queries(&self) -> [String; 2] {
        [
            format!("SELECT {col} FROM {table} WHERE token({col}) >= token(?) LIMIT ?",
                    col = self.id_column, table = self.table),
            format!("SELECT {col} FROM {table} WHERE token({col}) < token(?) LIMIT ?",
                    col = self.id_column, table = self.table),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerOptions {
    pub users: SampleTable,
    pub videos: SampleTable,
}

impl Default for SamplerOptions {
    fn default() -> SamplerOptions {
        SamplerOptions {
            users: SampleTable::users(),
            videos: SampleTable::videos(),
        }
    }
}

pub struct SampleFetcher<E, P = RandomPivots> where E: DataEngine, P: PivotSource {
    engine: Arc<E>,
    statements: Arc<StatementCache<E>>,
    pivots: P,
    options: SamplerOptions,
}

impl <E, P> SampleFetcher<E, P> where E: DataEngine, P: PivotSource {
    pub fn new(engine: &Arc<E>, statements: &Arc<StatementCache<E>>, pivots: P) -> SampleFetcher<E, P> {
        Self::with_options(engine, statements, pivots, SamplerOptions::default())
    }

    pub fn with_options(
        engine: &Arc<E>,
        statements: &Arc<StatementCache<E>>,
        pivots: P,
        options: SamplerOptions
    ) -> SampleFetcher<E, P> {
        SampleFetcher {
            engine: engine.clone(),
            statements: statements.clone(),
            pivots,
            options,
        }
    }

    pub fn options(&self) -> &SamplerOptions {
        &self.options
    }

    /// Random sample user ids, may contain duplicates
    pub fn random_user_ids(&self, count: usize) -> SampleFuture {
        self.sample(&self.options.users, count)
    }

    /// Random video ids, may contain duplicates
    pub fn random_video_ids(&self, count: usize) -> SampleFuture {
        self.sample(&self.options.videos, count)
    }

    /// Fetch exactly `count` ids from `table`. Ids from the forward scan come first, then the
    /// backward scan. When fewer than `count` rows exist the found ids are repeated from the start.
    pub fn sample(&self, table: &SampleTable, count: usize) -> SampleFuture {
        if count == 0 {
            return Box::new(future::ok(Vec::new()));
        }
        if count > i32::MAX as usize {
            return Box::new(future::err(SampleError::InvalidCount(count)));
        }
        let limit = count as i32;
        let pivot = self.pivots.next_pivot();
        debug!("sampling {} {} from {} at pivot {}", count, table.resource, table.table, pivot);
        let engine = self.engine.clone();
        let column = table.id_column.clone();
        let resource = table.resource.clone();
        let fut = self.statements
            .get_or_add_all(&table.range_queries())
            .map_err(SampleError::Preparation)
            .and_then(move |prepared| {
                // both scans are in flight before either is awaited
                let scans: Vec<_> = prepared
                    .into_iter()
                    .map(|statement| {
                        let values = vec![Value::Uuid(pivot), Value::Int(limit)];
                        engine.execute(BoundStatement::new(statement, values))
                    })
                    .collect();
                future::join_all(scans).map_err(SampleError::Execution)
            })
            .and_then(move |row_sets| collect_ids(row_sets, &column, count))
            .and_then(move |ids| backfill(ids, count, resource));
        Box::new(fut)
    }
}

fn collect_ids<R>(row_sets: Vec<Vec<R>>, column: &str, count: usize) -> Result<Vec<UUID>, SampleError>
    where R: Row
{
    row_sets
        .iter()
        .flat_map(|rows| rows.iter())
        .take(count)
        .map(|row| row.get_uuid(column).map_err(SampleError::InvalidRow))
        .collect()
}

fn backfill(ids: Vec<UUID>, count: usize, resource: String)
    -> impl Future<Item = Vec<UUID>, Error = SampleError>
{
    if ids.is_empty() {
        warn!("no sample {} available", resource);
        return Either::A(future::err::<Vec<UUID>, _>(SampleError::NoDataAvailable(resource)));
    }
    if ids.len() < count {
        debug!("only {} of {} {} found, repeating", ids.len(), count, resource);
    }
    Either::B(RepeatVec::<UUID, SampleError>::new(ids).take(count as u64).collect())
}
