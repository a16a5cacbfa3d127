#![deny(clippy::all)]
#![forbid(unsafe_code)]

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use hvlib::cfg::{get_cfg, get_default_cfg};
use hvlib::extract::extract_true_region;
use hvlib::overlay::{show_with_boxes, show_with_masks, DirViewer};
use hvlib::result::{trace_ok_err, ErrorKind};
use hvlib::tracing_setup::tracing_setup;
use hvlib::{hverr, DatasetStore, HvResult};

#[derive(Parser)]
#[command(name = "handview", version, about = "Inspect a hand detection and segmentation dataset")]
struct Args {
    /// pattern selecting the dataset images, e.g. 'data/imgs/*.png'
    #[arg(long)]
    images: Option<String>,
    /// pattern selecting the per-image hand box record files
    #[arg(long)]
    boxes: Option<String>,
    /// pattern selecting the ground-truth segmentation masks
    #[arg(long)]
    masks: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// render every image with its hand boxes drawn on top
    Boxes {
        #[arg(long, default_value = "handview-out")]
        out: PathBuf,
    },
    /// render every image with its binarized mask blended on top
    Masks {
        #[arg(long, default_value = "handview-out")]
        out: PathBuf,
    },
    /// write the masked true region of one image
    Extract {
        /// image ID, i.e. position in the load order
        #[arg(long)]
        id: usize,
        #[arg(long, default_value = "handview-out")]
        out: PathBuf,
    },
}

fn run(args: &Args) -> HvResult<()> {
    let cfg = trace_ok_err(get_cfg()).unwrap_or_else(get_default_cfg);
    let mut store = DatasetStore::new();
    if let Some(pattern) = &args.images {
        let n = store.load_images(pattern)?;
        info!("loaded {n} images from {pattern:?}");
    }
    if let Some(pattern) = &args.boxes {
        let n = store.load_boxes(pattern)?;
        info!("loaded {n} box lists from {pattern:?}");
    }
    if let Some(pattern) = &args.masks {
        let n = store.load_masks(pattern)?;
        info!("loaded {n} masks from {pattern:?}");
    }
    match &args.command {
        Command::Boxes { out } => {
            let mut viewer = DirViewer::new(out.clone())?;
            let n = show_with_boxes(&store, &mut viewer, &cfg.overlay)?;
            info!("wrote {n} box overlays to {out:?}");
        }
        Command::Masks { out } => {
            let mut viewer = DirViewer::new(out.clone())?;
            let n = show_with_masks(&store, &mut viewer, &cfg.overlay)?;
            info!("wrote {n} mask overlays to {out:?}");
        }
        Command::Extract { id, out } => {
            let region = extract_true_region(&store, *id, &cfg.extract)?;
            fs::create_dir_all(out)
                .map_err(|e| hverr!(ErrorKind::Load, "could not create {:?} due to {:?}", out, e))?;
            let path = out.join(format!("region_{id:04}.png"));
            region
                .save(&path)
                .map_err(|e| hverr!(ErrorKind::Load, "could not write {:?} due to {:?}", path, e))?;
            info!("wrote true region of image {id} to {path:?}");
        }
    }
    Ok(())
}

fn main() {
    let _guard = tracing_setup();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("{e}");
        std::process::exit(1);
    }
}
