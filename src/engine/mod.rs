// The data engine is the already-connected session of the column store.
// Sessions, consistency levels and schema are configured upstream and handed in here ready to use.

use futures::Future;
use utils::uuid::UUID;

pub type EngineFuture<T> = Box<Future<Item = T, Error = String> + Send>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Uuid(UUID),
    Int(i32),
}

/// A prepared statement together with the values for its `?` markers, in marker order
#[derive(Debug, Clone)]
pub struct BoundStatement<S> {
    pub statement: S,
    pub values: Vec<Value>,
}

impl <S> BoundStatement<S> {
    pub fn new(statement: S, values: Vec<Value>) -> BoundStatement<S> {
        BoundStatement { statement, values }
    }
}

pub trait Row {
    fn get_uuid(&self, column: &str) -> Result<UUID, String>;
}

/// Client side of the column store. Must tolerate many operations in flight at once.
pub trait DataEngine: Send + Sync + 'static {
    type Statement: Clone + Send + Sync + 'static;
    type Row: Row + Send + 'static;

    fn prepare(&self, query: &str) -> EngineFuture<Self::Statement>;
    fn execute(&self, bound: BoundStatement<Self::Statement>) -> EngineFuture<Vec<Self::Row>>;
}
