//! Root span for one CLI invocation.
//!
//! # Design
//! - Every event emitted while the command runs is nested under this span,
//!   so log lines carry the command name and the build SHA recorded by
//!   [`crate::init_logging`].

use tracing::Span;

use crate::init::build_sha;

/// Span wrapping a whole command; instrument the command future with it.
#[must_use]
pub fn command_span(command: &str) -> Span {
    tracing::info_span!("esmbuild", command = %command, build_sha = %build_sha())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("capture lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn events_inside_the_span_carry_command_and_build_sha() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let span = command_span("build");
            let _entered = span.enter();
            tracing::info!("building bundle");
        });

        let output = String::from_utf8(captured.0.lock().expect("capture lock").clone())
            .expect("utf8 log output");
        assert!(output.contains("building bundle"), "{output}");
        assert!(output.contains("command=build"), "{output}");
        assert!(
            output.contains(&format!("build_sha={}", build_sha())),
            "{output}"
        );
    }
}
