use std::sync::{Arc, Barrier};
use std::thread;
use sampledata::statements::*;
use memory::MemoryEngine;
use futures::prelude::*;

const Q1: &str = "SELECT userid FROM sample_data_users WHERE token(userid) >= token(?) LIMIT ?";
const Q2: &str = "SELECT userid FROM sample_data_users WHERE token(userid) < token(?) LIMIT ?";

#[test]
pub fn prepares_once_for_concurrent_callers() {
    let engine = Arc::new(MemoryEngine::empty().slow_prepare("userid", 100));
    let cache = Arc::new(StatementCache::new(&engine));
    let callers = 8;
    let barrier = Arc::new(Barrier::new(callers));
    let handles: Vec<_> = (0..callers)
        .map(|_| {
            let cache = cache.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                cache.get_or_add(Q1).wait()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), Q1);
    }
    assert_eq!(engine.prepares(), 1);
    assert_eq!(cache.len(), 1);
}

#[test]
pub fn resolved_statements_are_reused() {
    let engine = Arc::new(MemoryEngine::empty());
    let cache = StatementCache::new(&engine);
    assert!(cache.is_empty());
    cache.get_or_add(Q1).wait().unwrap();
    cache.get_or_add(Q1).wait().unwrap();
    cache.get_or_add(Q2).wait().unwrap();
    assert_eq!(engine.prepares(), 2);
    assert!(cache.contains(Q1));
    assert!(cache.contains(Q2));
}

#[test]
pub fn batch_keeps_input_order() {
    // the first query finishes preparing last
    let engine = Arc::new(MemoryEngine::empty().slow_prepare(">=", 200));
    let cache = StatementCache::new(&engine);
    let prepared = cache.get_or_add_all(&[Q1, Q2]).wait().unwrap();
    assert_eq!(prepared, vec![Q1.to_owned(), Q2.to_owned()]);
    let prepared = cache.get_or_add_all(&[Q2, Q1]).wait().unwrap();
    assert_eq!(prepared, vec![Q2.to_owned(), Q1.to_owned()]);
    assert_eq!(engine.prepares(), 2);
}

#[test]
pub fn empty_query_rejected() {
    let engine = Arc::new(MemoryEngine::empty());
    let cache = StatementCache::new(&engine);
    assert_eq!(cache.get_or_add("").wait(), Err(PrepareError::EmptyQuery));
    assert_eq!(engine.prepares(), 0);
    assert!(cache.is_empty());
}

#[test]
pub fn failed_preparation_evicted_and_retried() {
    let engine = Arc::new(MemoryEngine::empty().failing_prepares(1));
    let cache = StatementCache::new(&engine);
    match cache.get_or_add(Q1).wait() {
        Err(PrepareError::Failed { query, reason }) => {
            assert_eq!(query, Q1);
            assert!(reason.contains("syntax error"));
        },
        other => panic!("expected preparation failure, got {:?}", other)
    }
    assert!(!cache.contains(Q1));
    assert_eq!(cache.get_or_add(Q1).wait().unwrap(), Q1);
    assert_eq!(engine.prepares(), 2);
    assert!(cache.contains(Q1));
}

#[test]
pub fn waiters_share_failure() {
    let engine = Arc::new(MemoryEngine::empty().slow_prepare("userid", 100).failing_prepares(1));
    let cache = StatementCache::new(&engine);
    let first = cache.get_or_add(Q1);
    let second = cache.get_or_add(Q1);
    assert!(first.wait().is_err());
    assert!(second.wait().is_err());
    assert_eq!(engine.prepares(), 1);
    assert_eq!(cache.get_or_add(Q1).wait().unwrap(), Q1);
    assert_eq!(engine.prepares(), 2);
}

#[test]
pub fn batch_fails_on_first_error() {
    let engine = Arc::new(MemoryEngine::empty().failing_prepares(1));
    let cache = StatementCache::new(&engine);
    match cache.get_or_add_all(&[Q1, Q2]).wait() {
        Err(PrepareError::Failed { query, .. }) => assert_eq!(query, Q1),
        other => panic!("expected preparation failure, got {:?}", other)
    }
    // the successful sibling stays cached
    assert!(cache.contains(Q2));
    assert!(!cache.contains(Q1));
}

#[test]
pub fn slow_sibling_failure_evicted_after_batch_fails() {
    // both fail, and the forward query settles well after the backward one
    let engine = Arc::new(MemoryEngine::empty().slow_prepare(">=", 200).failing_prepares(2));
    let cache = StatementCache::new(&engine);
    match cache.get_or_add_all(&[Q1, Q2]).wait() {
        Err(PrepareError::Failed { query, .. }) => assert_eq!(query, Q1),
        other => panic!("expected preparation failure, got {:?}", other)
    }
    assert!(!cache.contains(Q1));
    assert!(!cache.contains(Q2));
    assert_eq!(cache.get_or_add(Q1).wait().unwrap(), Q1);
    assert_eq!(cache.get_or_add(Q2).wait().unwrap(), Q2);
    assert_eq!(engine.prepares(), 4);
}
