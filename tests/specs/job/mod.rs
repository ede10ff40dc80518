//! Job creation specs

mod create;
#[cfg(unix)]
mod callback;
