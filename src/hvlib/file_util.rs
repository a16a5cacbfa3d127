use crate::hverr;
use crate::result::{ErrorKind, HvResult};
use lazy_static::lazy_static;
use std::{
    ffi::OsStr,
    fmt::Debug,
    fs, io,
    path::{Path, PathBuf},
};
use tracing::{error, info};

lazy_static! {
    pub static ref DEFAULT_HOMEDIR: PathBuf = match dirs::home_dir() {
        Some(p) => p.join(".handview"),
        _ => std::env::temp_dir().join("handview"),
    };
}

pub fn read_to_string<P>(p: P) -> HvResult<String>
where
    P: AsRef<Path> + Debug,
{
    fs::read_to_string(&p).map_err(|e| hverr!(ErrorKind::Load, "could not read {:?} due to {:?}", p, e))
}

pub fn write<P, C>(path: P, contents: C) -> HvResult<()>
where
    P: AsRef<Path> + Debug,
    C: AsRef<[u8]>,
{
    fs::write(&path, contents)
        .map_err(|e| hverr!(ErrorKind::Load, "could not write to {:?} since {:?}", path, e))
}

pub fn osstr_to_str(p: Option<&OsStr>) -> io::Result<&str> {
    p.ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{p:?} not found")))?
        .to_str()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{p:?} not convertible to unicode"),
            )
        })
}

pub fn path_to_str(p: &Path) -> HvResult<&str> {
    osstr_to_str(Some(p.as_os_str()))
        .map_err(|e| hverr!(ErrorKind::Load, "could not transform '{:?}' due to '{:?}'", p, e))
}

pub fn to_stem_str(p: &Path) -> HvResult<&str> {
    osstr_to_str(p.file_stem())
        .map_err(|e| hverr!(ErrorKind::Load, "could not transform '{:?}' due to '{:?}'", p, e))
}

pub struct Defer<F: FnMut()> {
    pub func: F,
}
impl<F: FnMut()> Drop for Defer<F> {
    fn drop(&mut self) {
        (self.func)();
    }
}
#[macro_export]
macro_rules! defer {
    ($f:expr) => {
        let _dfr = $crate::file_util::Defer { func: $f };
    };
}
pub fn checked_remove<'a, P: AsRef<Path> + Debug>(
    path: &'a P,
    func: fn(p: &'a P) -> io::Result<()>,
) {
    match func(path) {
        Ok(_) => info!("removed {path:?}"),
        Err(e) => error!("could not remove {path:?} due to {e:?}"),
    }
}
#[macro_export]
macro_rules! defer_folder_removal {
    ($path:expr) => {
        let func = || $crate::file_util::checked_remove($path, std::fs::remove_dir_all);
        $crate::defer!(func);
    };
}
#[macro_export]
macro_rules! defer_file_removal {
    ($path:expr) => {
        let func = || $crate::file_util::checked_remove($path, std::fs::remove_file);
        $crate::defer!(func);
    };
}

#[test]
fn test_stem() {
    assert_eq!(to_stem_str(Path::new("a/b/img_01.png")).unwrap(), "img_01");
    assert_eq!(to_stem_str(Path::new("img_01.txt")).unwrap(), "img_01");
    assert!(to_stem_str(Path::new("")).is_err());
}
