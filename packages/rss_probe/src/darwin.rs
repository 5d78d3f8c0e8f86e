use std::process::Command;

/// Runs `ps` with header-suppressed output columns for the current process.
fn ps_columns(keywords: &str) -> Option<String> {
    let output = Command::new("ps")
        .arg("-o")
        .arg(keywords)
        .arg("-p")
        .arg(std::process::id().to_string())
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    String::from_utf8(output.stdout).ok()
}

pub(crate) fn resident_kb() -> Option<u64> {
    // ps reports RSS in kilobytes already.
    ps_columns("rss=")?.split_whitespace().next()?.parse().ok()
}

pub(crate) fn process_table_line() -> Option<String> {
    let table = ps_columns("pid=,rss=,vsz=,command=")?;
    let line = table.lines().next()?.trim();

    if line.is_empty() {
        None
    } else {
        Some(line.to_owned())
    }
}
