pub mod uuid;
pub mod stream;
