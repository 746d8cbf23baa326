//! Console status lines printed by the commands.

use std::fmt::Display;
use std::path::Path;

const WHITE: u8 = 37;
const GREEN: u8 = 32;
const RED: u8 = 31;

/// Wrap `value` in an ANSI color escape.
pub(crate) fn color(code: u8, value: impl Display) -> String {
    format!("\x1b[{code}m{value}\x1b[0m")
}

/// `METHOD STATUS PATH [Nms]`, status green for 2xx and red otherwise.
pub(crate) fn request_line(method: &str, status: u16, path: &str, elapsed_ms: u64) -> String {
    let status_color = if (200..300).contains(&status) {
        GREEN
    } else {
        RED
    };
    color(
        WHITE,
        format!(
            "{method} {} {path} [{elapsed_ms}ms]",
            color(status_color, status)
        ),
    )
}

pub(crate) fn build_done(outdir: &Path) -> String {
    format!("Build done at {}", outdir.display())
}

pub(crate) fn server_listening(port: u16) -> String {
    format!("Server listening at http://127.0.0.1:{port}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_status_is_green() {
        assert_eq!(
            request_line("GET", 200, "/index.js", 3),
            "\x1b[37mGET \x1b[32m200\x1b[0m /index.js [3ms]\x1b[0m"
        );
    }

    #[test]
    fn other_statuses_are_red() {
        assert!(request_line("GET", 404, "/missing", 0).contains("\x1b[31m404\x1b[0m"));
        assert!(request_line("GET", 503, "/", 12).contains("\x1b[31m503\x1b[0m"));
    }

    #[test]
    fn status_messages_name_the_location() {
        assert_eq!(
            build_done(Path::new("/tmp/dist")),
            "Build done at /tmp/dist"
        );
        assert_eq!(
            server_listening(8000),
            "Server listening at http://127.0.0.1:8000"
        );
    }
}
