extern crate serde;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate log;
extern crate uuid;
extern crate parking_lot;
extern crate futures;

pub mod utils;
pub mod engine;
pub mod statements;
pub mod sampler;
