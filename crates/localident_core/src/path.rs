//! Posix path helpers that behave the same on every host.
//!
//! Resource paths reach us as plain strings from the build pipeline, possibly
//! with `\` separators on Windows. Everything here treats both `/` and `\` as
//! separators and always produces `/`, so identifiers never depend on the
//! platform that computed them.

/// Split a path into normalized segments, resolving `.` and `..`.
///
/// Returns the segments and whether the path was absolute.
fn segments(path: &str) -> (Vec<&str>, bool) {
    let absolute = path.starts_with('/') || path.starts_with('\\');
    let mut out: Vec<&str> = Vec::new();

    for seg in path.split(['/', '\\']) {
        match seg {
            "" | "." => {}
            ".." => match out.last() {
                Some(&last) if last != ".." => {
                    out.pop();
                }
                // `/..` is still `/`
                _ if absolute => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }

    (out, absolute)
}

fn is_absolute(path: &str) -> bool {
    if path.starts_with('/') || path.starts_with('\\') {
        return true;
    }
    // Drive prefix, e.g. `C:\project`
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Normalize a path to `/` separators with `.` and `..` resolved.
pub fn normalize(path: &str) -> String {
    let (segs, absolute) = segments(path);
    let joined = segs.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

/// Relative path from `from` to `to`, `/`-separated.
///
/// A relative `to` is taken to be relative to `from` already. Returns an empty
/// string when both name the same location.
pub fn relative(from: &str, to: &str) -> String {
    let to_abs;
    let to = if is_absolute(to) {
        to
    } else {
        to_abs = format!("{from}/{to}");
        &to_abs
    };

    let (from_segs, _) = segments(from);
    let (to_segs, _) = segments(to);

    let common = from_segs
        .iter()
        .zip(to_segs.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::with_capacity(from_segs.len() - common + to_segs.len() - common);
    parts.extend(std::iter::repeat("..").take(from_segs.len() - common));
    parts.extend(&to_segs[common..]);
    parts.join("/")
}

/// Last segment of the path.
pub fn basename(path: &str) -> &str {
    path.trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
}

/// Everything before the last segment, `/`-separated.
pub fn dirname(path: &str) -> String {
    let (mut segs, absolute) = segments(path);
    segs.pop();
    let joined = segs.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Extension of the last segment without the dot, if any.
///
/// Leading dots do not start an extension: `.gitignore` has none.
pub fn extension(path: &str) -> Option<&str> {
    let base = basename(path);
    match base.rfind('.') {
        Some(0) | None => None,
        Some(idx) => Some(&base[idx + 1..]),
    }
}

/// Last segment with its final extension removed.
pub fn stem(path: &str) -> &str {
    let base = basename(path);
    match base.rfind('.') {
        Some(0) | None => base,
        Some(idx) => &base[..idx],
    }
}

/// `[path]` value: the directory part of a root-relative path with a trailing
/// slash, `..` rendered as `_`.
pub fn relative_dir(relative: &str) -> String {
    let mut dir: Vec<&str> = relative
        .split('/')
        .map(|s| if s == ".." { "_" } else { s })
        .collect();
    dir.pop();

    if dir.is_empty() {
        String::new()
    } else {
        format!("{}/", dir.join("/"))
    }
}
