//! Clock port
//!
//! Wall-clock time in epoch seconds, injectable for tests.

pub trait Clock {
    fn now(&self) -> i64;
}
