use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::extract::ExtractOptions;
use crate::file_util::{self, DEFAULT_HOMEDIR};
use crate::overlay::OverlayOptions;
use crate::result::{to_hv, ErrorKind, HvResult};

const CFG_DEFAULT: &str = r#"
    [extract]
    threshold = 0
    background = [0, 0, 0, 0]
    [overlay]
    color = [255, 0, 0]
    alpha = 120
    threshold = 0
    "#;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cfg {
    #[serde(default)]
    pub extract: ExtractOptions,
    #[serde(default)]
    pub overlay: OverlayOptions,
}

pub fn get_default_cfg() -> Cfg {
    toml::from_str(CFG_DEFAULT).expect("default config broken")
}

pub fn get_cfg_path() -> PathBuf {
    DEFAULT_HOMEDIR.join("hv_cfg.toml")
}

pub fn get_log_folder() -> PathBuf {
    DEFAULT_HOMEDIR.join("logs")
}

pub fn get_cfg() -> HvResult<Cfg> {
    let cfg_toml_path = get_cfg_path();
    if cfg_toml_path.exists() {
        let toml_str = file_util::read_to_string(cfg_toml_path)?;
        toml::from_str(&toml_str).map_err(to_hv(ErrorKind::Parse))
    } else {
        Ok(get_default_cfg())
    }
}

#[test]
fn test_default_cfg() {
    let cfg = get_default_cfg();
    assert_eq!(cfg.extract, ExtractOptions::default());
    assert_eq!(cfg.overlay, OverlayOptions::default());
}

#[test]
fn test_partial_cfg() {
    let cfg: Cfg = toml::from_str(
        r#"
        [extract]
        threshold = 10
        "#,
    )
    .unwrap();
    assert_eq!(cfg.extract.threshold, 10);
    assert_eq!(cfg.extract.background, [0, 0, 0, 0]);
    assert_eq!(cfg.overlay, OverlayOptions::default());
    let cfg: Cfg = toml::from_str("").unwrap();
    assert_eq!(cfg.extract, ExtractOptions::default());
}
