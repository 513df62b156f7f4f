//! I/O error descriptions.
//!
//! Builds the Display text for `Error::Io`: operation, path, the untouched
//! io::Error text, then a platform-aware hint. The io::Error itself stays
//! available through `source()`.

use std::io;
use std::path::Path;

/// Format a human-friendly message with op/path plus platform-aware hints.
pub(crate) fn describe_io_error(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);

    if let Some(code) = e.raw_os_error() {
        if let Some(hint) = os_hint(code) {
            msg.push_str(&format!(" (hint: {})", hint.trim_end_matches('.')));
        }
        msg.push_str(&format!(" [os code: {}]", code));
    } else if let Some(hint) = kind_hint(e.kind()) {
        msg.push_str(&format!(" (hint: {})", hint.trim_end_matches('.')));
    }

    msg
}

#[cfg(unix)]
fn os_hint(code: i32) -> Option<&'static str> {
    match code {
        libc::EACCES | libc::EPERM => Some("permission denied; check ownership and write permissions."),
        libc::EXDEV => Some("cross-filesystem; atomic rename not possible."),
        libc::EBUSY => Some("resource busy; ensure no other process is writing."),
        libc::ENOENT => Some("path not found; verify it exists."),
        libc::EEXIST => Some("already exists; pick a unique name or remove the target."),
        libc::EISDIR => Some("is a directory; only regular files are handled here."),
        libc::ENOTDIR => Some("a parent component is not a directory."),
        libc::ENOSPC => Some("insufficient space on device."),
        libc::EROFS => Some("read-only filesystem; cannot write here."),
        libc::ENAMETOOLONG => Some("filename or path too long; shorten path segments."),
        libc::EMFILE => Some("process file descriptor limit reached; close files or raise limits."),
        _ => None,
    }
}

#[cfg(windows)]
fn os_hint(code: i32) -> Option<&'static str> {
    match code {
        5 => Some("access denied; check permissions."),     // ERROR_ACCESS_DENIED
        17 => Some("not same device; cross-filesystem move."), // ERROR_NOT_SAME_DEVICE
        32 => Some("sharing violation; file is in use."),   // ERROR_SHARING_VIOLATION
        2 | 3 => Some("path not found; verify it exists."), // FILE/PATH NOT FOUND
        80 | 183 => Some("already exists; pick a unique name."),
        112 => Some("insufficient disk space."),            // ERROR_DISK_FULL
        _ => None,
    }
}

#[cfg(not(any(unix, windows)))]
fn os_hint(_code: i32) -> Option<&'static str> {
    None
}

fn kind_hint(kind: io::ErrorKind) -> Option<&'static str> {
    match kind {
        io::ErrorKind::PermissionDenied => Some("permission denied; check ownership and write permissions."),
        io::ErrorKind::NotFound => Some("path not found; verify it exists."),
        io::ErrorKind::AlreadyExists => Some("already exists; remove or choose a unique name."),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => Some("busy/timed out; retry later."),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notfound_fallback_hint_includes_path() {
        let p = Path::new("/nonexistent/path/for/test");
        let msg = describe_io_error("open", p, &io::Error::from(io::ErrorKind::NotFound));
        assert!(msg.contains("open"));
        assert!(msg.contains(p.to_string_lossy().as_ref()));
        assert!(msg.contains("path not found"));
    }

    #[cfg(unix)]
    #[test]
    fn enospc_hint_present() {
        let msg = describe_io_error(
            "write",
            Path::new("/tmp"),
            &io::Error::from_raw_os_error(libc::ENOSPC),
        );
        assert!(msg.contains("insufficient space"), "msg was: {}", msg);
        assert!(msg.contains("os code"), "should include os code in message");
    }

    #[cfg(unix)]
    #[test]
    fn exdev_hint_present() {
        let msg = describe_io_error(
            "rename",
            Path::new("/tmp"),
            &io::Error::from_raw_os_error(libc::EXDEV),
        );
        assert!(msg.contains("cross-filesystem"));
    }
}
