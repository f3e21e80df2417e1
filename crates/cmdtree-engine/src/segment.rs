use cmdtree_types::COMMAND_FILLER;
use std::path::Path;

/// Split a discovered file path into command-name tokens, outermost first.
///
/// The base directory prefix and any leading separators are stripped, the
/// remainder is split on path separators, and every raw segment is split
/// again on literal `.` so dot-delimited filenames produce multi-level
/// commands (`studio.start.ts` -> `studio`, `start`, `ts`). Empty tokens
/// and the reserved `command` filler are dropped.
///
/// Pure; never fails. An empty result is rejected by the caller, not here.
/// The trailing extension token is intentionally *not* stripped; see
/// [`drop_extension_token`].
pub fn segment(full_path: &Path, base_dir: &Path) -> Vec<String> {
    let rel = match full_path.strip_prefix(base_dir) {
        Ok(rel) => rel.to_string_lossy().into_owned(),
        Err(_) => {
            // Component-wise stripping fails for backslash-delimited paths
            // on unix; fall back to a string prefix strip, but only at a
            // separator boundary so a sibling like `/based` under base
            // `/base` is not mistaken for a child.
            let full = full_path.to_string_lossy();
            let base = base_dir.to_string_lossy();
            match full.strip_prefix(base.as_ref()) {
                Some(rest) if rest.is_empty() || rest.starts_with(['/', '\\']) => rest.to_string(),
                _ => full.into_owned(),
            }
        }
    };
    let rel = rel.trim_start_matches(['/', '\\']);

    rel.split(['/', '\\'])
        .flat_map(|raw| raw.split('.'))
        .filter(|token| !token.is_empty() && *token != COMMAND_FILLER)
        .map(str::to_string)
        .collect()
}

/// Drop the trailing extension token from a segment list before tree
/// construction.
///
/// Single-token lists are left untouched: with nothing besides the
/// trailing token, it stays as the command name rather than reducing the
/// list to empty. Callers relying on segmentation must keep this exact
/// boundary.
pub fn drop_extension_token(segments: &mut Vec<String>) {
    if segments.len() > 1 {
        segments.pop();
    }
}
