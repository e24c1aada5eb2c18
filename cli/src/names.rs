//! Where the names to reveal come from.

use std::ffi::OsString;

/// Command-line arguments as names. Bytes that are not valid UTF-8 become U+FFFD
/// instead of aborting the run.
pub fn lossy_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

/// Command-line names win; otherwise the configured list is used.
///
/// Names are trimmed, control characters are stripped so they cannot move the cursor,
/// and blank entries are dropped.
pub fn collect_names<I>(args: I, configured: Vec<String>) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let from_args = clean(args);
    if from_args.is_empty() {
        clean(configured)
    } else {
        from_args
    }
}

fn clean<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    names
        .into_iter()
        .map(|name| {
            name.chars()
                .filter(|c| !c.is_control())
                .collect::<String>()
                .trim()
                .to_string()
        })
        .filter(|name| !name.is_empty())
        .collect()
}
