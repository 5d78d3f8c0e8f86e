//! Pure text extraction from the Linux process status format, kept separate from the
//! platform bindings so it can be unit tested anywhere.

/// Finds the `VmRSS` line in `/proc/self/status` contents.
pub(crate) fn vm_rss_line(status: &str) -> Option<&str> {
    status.lines().find(|line| line.starts_with("VmRSS:"))
}

/// Extracts the resident set size in kilobytes from `/proc/self/status` contents.
///
/// The line has the shape `VmRSS:      123456 kB`. Anything malformed yields `None`.
pub(crate) fn resident_kb_from_status(status: &str) -> Option<u64> {
    vm_rss_line(status)?
        .strip_prefix("VmRSS:")?
        .split_whitespace()
        .next()?
        .parse()
        .ok()
}
