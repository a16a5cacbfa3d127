use lazy_static::lazy_static;
use regex::Regex;

use crate::domain::BB;
use crate::file_util;
use crate::hverr;
use crate::result::{ErrorKind, HvResult};

lazy_static! {
    static ref FIELD_SEP: Regex = Regex::new(r"[,\s]+").unwrap();
}

fn parse_record(line: &str, path: &str, lineno: usize) -> HvResult<BB> {
    let fields = FIELD_SEP
        .split(line.trim())
        .filter(|f| !f.is_empty())
        .collect::<Vec<_>>();
    if fields.len() != 4 {
        return Err(hverr!(
            ErrorKind::Parse,
            "expected 4 fields in line {} of {:?}, found {}",
            lineno,
            path,
            fields.len()
        ));
    }
    let mut vals = [0i64; 4];
    for (v, f) in vals.iter_mut().zip(fields.iter()) {
        *v = f.parse::<i64>().map_err(|_| {
            hverr!(
                ErrorKind::Parse,
                "non-numeric field {:?} in line {} of {:?}",
                f,
                lineno,
                path
            )
        })?;
    }
    if vals.iter().any(|v| *v < 0) {
        return Err(hverr!(
            ErrorKind::Parse,
            "negative value in record {:?} in line {} of {:?}",
            line.trim(),
            lineno,
            path
        ));
    }
    Ok(BB::from_arr(&[
        vals[0] as u32,
        vals[1] as u32,
        vals[2] as u32,
        vals[3] as u32,
    ]))
}

/// Reads the hand boxes of one image, one `x y w h` record per non-empty
/// line, fields separated by commas and/or whitespace. A file of only blank
/// lines is a valid empty box list.
pub fn read_boxes(path: &str) -> HvResult<Vec<BB>> {
    let content = file_util::read_to_string(path)?;
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| parse_record(line, path, idx + 1))
        .collect()
}

#[cfg(test)]
use crate::defer_folder_removal;

#[test]
fn test_parse_record() {
    let bb = parse_record("10,20,30,40", "f.txt", 1).unwrap();
    assert_eq!(bb, BB::from_arr(&[10, 20, 30, 40]));
    let bb = parse_record("10 20 30 40", "f.txt", 1).unwrap();
    assert_eq!(bb, BB::from_arr(&[10, 20, 30, 40]));
    let bb = parse_record("  10, 20,\t30 40 ", "f.txt", 1).unwrap();
    assert_eq!(bb, BB::from_arr(&[10, 20, 30, 40]));
    assert_eq!(
        parse_record("10,20,-5,30", "f.txt", 1).unwrap_err().kind(),
        ErrorKind::Parse
    );
    assert_eq!(
        parse_record("10,20,30", "f.txt", 1).unwrap_err().kind(),
        ErrorKind::Parse
    );
    assert_eq!(
        parse_record("10,20,30,40,50", "f.txt", 1).unwrap_err().kind(),
        ErrorKind::Parse
    );
    assert_eq!(
        parse_record("10,twenty,30,40", "f.txt", 1).unwrap_err().kind(),
        ErrorKind::Parse
    );
    assert_eq!(
        parse_record("10.5,20,30,40", "f.txt", 1).unwrap_err().kind(),
        ErrorKind::Parse
    );
}

#[test]
fn test_read_boxes() {
    let folder = std::env::temp_dir().join("handview_testdata_boxio");
    defer_folder_removal!(&folder);
    std::fs::create_dir_all(&folder).unwrap();
    let path = folder.join("img_0.txt");
    let path_str = file_util::path_to_str(&path).unwrap().to_string();
    file_util::write(&path, "1 2 3 4\n\n5,6,7,8\n").unwrap();
    let boxes = read_boxes(&path_str).unwrap();
    assert_eq!(
        boxes,
        vec![BB::from_arr(&[1, 2, 3, 4]), BB::from_arr(&[5, 6, 7, 8])]
    );
    file_util::write(&path, "\n  \n").unwrap();
    assert!(read_boxes(&path_str).unwrap().is_empty());
    file_util::write(&path, "1 2 3 4\n1 2 x 4\n").unwrap();
    assert_eq!(read_boxes(&path_str).unwrap_err().kind(), ErrorKind::Parse);
}
