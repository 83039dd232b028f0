use std::marker::PhantomData;
use futures::{Stream, Async, Poll};

// Yields the elements of `vec` in order, starting over from the head forever.
// An empty vector ends the stream at once.
pub struct RepeatVec<T, E = ()> where T: Clone {
    vec: Vec<T>,
    pos: usize,
    _error: PhantomData<E>
}

impl <T, E> RepeatVec<T, E> where T: Clone {
    pub fn new(vec: Vec<T>) -> RepeatVec<T, E> {
        RepeatVec {
            vec, pos: 0, _error: PhantomData
        }
    }
}

impl <T, E> Stream for RepeatVec<T, E> where T: Clone {
    type Item = T;
    type Error = E;

    fn poll(&mut self) -> Poll<Option<Self::Item>, Self::Error> {
        if self.vec.is_empty() {
            return Ok(Async::Ready(None));
        }
        let item = self.vec[self.pos % self.vec.len()].clone();
        self.pos += 1;
        Ok(Async::Ready(Some(item)))
    }
}
