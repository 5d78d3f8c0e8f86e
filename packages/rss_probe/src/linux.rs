use std::fs;

use crate::parse;

/// Reads `/proc/self/status`, yielding `None` if the pseudo-file is unavailable.
fn status_contents() -> Option<String> {
    fs::read_to_string("/proc/self/status").ok()
}

pub(crate) fn resident_kb() -> Option<u64> {
    parse::resident_kb_from_status(&status_contents()?)
}

pub(crate) fn vm_rss_line() -> Option<String> {
    parse::vm_rss_line(&status_contents()?).map(ToOwned::to_owned)
}
