use regex::Regex;
use walkdir::WalkDir;

use crate::file_util;
use crate::hverr;
use crate::result::{ErrorKind, HvResult};

/// Translates a shell-style pattern into an anchored regex. `*` and `?` do
/// not cross path separators, `**` does. Everything else is literal.
fn glob_to_regex(pattern: &str) -> HvResult<Regex> {
    let mut re = String::with_capacity(pattern.len() * 2 + 2);
    re.push('^');
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    re.push_str(".*");
                } else {
                    re.push_str("[^/]*");
                }
            }
            '?' => re.push_str("[^/]"),
            '.' | '+' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$' | '|' | '\\' => {
                re.push('\\');
                re.push(c);
            }
            c => re.push(c),
        }
    }
    re.push('$');
    Regex::new(&re).map_err(|e| hverr!(ErrorKind::Load, "cannot match pattern {:?}, {:?}", pattern, e))
}

/// Longest directory prefix of the pattern without a wildcard, the walk root.
fn wildcard_free_root(pattern: &str) -> &str {
    let first_wild = pattern
        .find(&['*', '?'][..])
        .unwrap_or(pattern.len());
    match pattern[..first_wild].rfind('/') {
        Some(0) => "/",
        Some(idx) => &pattern[..idx],
        None => ".",
    }
}

/// Expands a shell-style pattern to the lexicographically sorted list of
/// matching file paths. Deterministic on an unchanged filesystem. An empty
/// result is not an error here; callers decide whether zero matches is one.
pub fn glob_paths(pattern: &str) -> HvResult<Vec<String>> {
    let pattern = pattern.replace('\\', "/");
    let re = glob_to_regex(&pattern)?;
    let mut paths = WalkDir::new(wildcard_free_root(&pattern))
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            file_util::path_to_str(entry.path())
                .ok()
                .map(|p| p.replace('\\', "/"))
        })
        .map(|p| match p.strip_prefix("./") {
            Some(stripped) => stripped.to_string(),
            None => p,
        })
        .filter(|p| re.is_match(p))
        .collect::<Vec<_>>();
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
use {crate::defer_folder_removal, std::fs};

#[test]
fn test_glob_to_regex() {
    let re = glob_to_regex("imgs/*.png").unwrap();
    assert!(re.is_match("imgs/a.png"));
    assert!(re.is_match("imgs/im_10.png"));
    assert!(!re.is_match("imgs/a.jpg"));
    assert!(!re.is_match("imgs/sub/a.png"));
    assert!(!re.is_match("other/a.png"));
    let re = glob_to_regex("imgs/im_?.png").unwrap();
    assert!(re.is_match("imgs/im_1.png"));
    assert!(!re.is_match("imgs/im_10.png"));
    let re = glob_to_regex("data/**/*.png").unwrap();
    assert!(re.is_match("data/a/b/c.png"));
    // `**/` requires at least one separator between prefix and filename
    assert!(!re.is_match("data/c.png"));
    let re = glob_to_regex("a+b/*.png").unwrap();
    assert!(re.is_match("a+b/x.png"));
}

#[test]
fn test_wildcard_free_root() {
    assert_eq!(wildcard_free_root("imgs/*.png"), "imgs");
    assert_eq!(wildcard_free_root("*.png"), ".");
    assert_eq!(wildcard_free_root("/tmp/data/masks/*.png"), "/tmp/data/masks");
    assert_eq!(wildcard_free_root("/"), "/");
    assert_eq!(wildcard_free_root("imgs/a.png"), "imgs");
}

#[test]
fn test_glob_paths() {
    let folder = std::env::temp_dir().join("handview_testdata_glob");
    defer_folder_removal!(&folder);
    fs::create_dir_all(folder.join("sub")).unwrap();
    for name in ["im_2.png", "im_10.png", "im_1.jpg", "sub/im_3.png"] {
        file_util::write(folder.join(name), b"x").unwrap();
    }
    let folder_str = file_util::path_to_str(&folder).unwrap().to_string();
    let matched = glob_paths(&format!("{folder_str}/*.png")).unwrap();
    assert_eq!(
        matched,
        vec![
            format!("{folder_str}/im_10.png"),
            format!("{folder_str}/im_2.png")
        ]
    );
    let matched = glob_paths(&format!("{folder_str}/**/*.png")).unwrap();
    assert_eq!(matched, vec![format!("{folder_str}/sub/im_3.png")]);
    let matched = glob_paths(&format!("{folder_str}/*.bmp")).unwrap();
    assert!(matched.is_empty());
}
