/// This module provides the CSV item readers and writers, blocking and async.
pub mod csv;
