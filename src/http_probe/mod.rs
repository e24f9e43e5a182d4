pub mod matcher;
pub mod probe;
pub mod request;
pub mod result;
pub mod sanitize;
pub mod transport;

#[cfg(test)]
mod test_server;

pub mod prelude {
    pub use super::probe::{classify, execute_probe, run_probe};
    pub use super::result::{FailureKind, FieldValue, ProbeOutcome, ProbeResult};
}

use std::fmt::Write;

/// Flatten an error and its sources into one message.
fn report(mut err: &(dyn std::error::Error + 'static)) -> String {
    let mut s = format!("{}", err);
    while let Some(src) = err.source() {
        let _ = write!(s, "\n\nCaused by: {}", src);
        err = src;
    }
    s
}
