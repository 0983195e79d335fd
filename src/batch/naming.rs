use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// First free output path for `input`: `<stem><suffix>.zip` in the input's
/// directory, else `<stem><suffix>_<n>.zip` for n = 1, 2, ...
pub fn unique_output_path(input: &Path, suffix: &str) -> PathBuf {
    let parent = input.parent().unwrap_or_else(|| Path::new(""));
    let stem = input
        .file_stem()
        .map(OsStr::to_os_string)
        .unwrap_or_else(|| OsString::from("archive"));

    let candidate = parent.join(output_name(&stem, suffix, None));
    if !candidate.exists() {
        return candidate;
    }

    let mut count = 1u64;
    loop {
        let candidate = parent.join(output_name(&stem, suffix, Some(count)));
        if !candidate.exists() {
            return candidate;
        }
        count += 1;
    }
}

// Stems that are not UTF-8 keep their bytes.
fn output_name(stem: &OsStr, suffix: &str, count: Option<u64>) -> OsString {
    let mut name = stem.to_os_string();
    name.push(suffix);
    if let Some(count) = count {
        name.push(format!("_{}", count));
    }
    name.push(".zip");
    name
}
