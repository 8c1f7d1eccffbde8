use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use pixpost::{
    rasterize, CloudConfig, MosaicConfig, PublishConfig, Session, Transformations,
};

/// Pixelate a local image and publish the rendered snapshot
#[derive(Parser, Debug)]
#[command(name = "pixpost", version, about)]
struct Args {
    /// Image file to select
    input: PathBuf,

    /// Upload endpoint URL
    #[arg(long, default_value = "http://127.0.0.1:3000/api/upload")]
    endpoint: String,

    /// Side length of one sampling block, in source pixels
    #[arg(long, default_value_t = 10)]
    sample_size: u32,

    /// Display width of the rendered mosaic
    #[arg(long, default_value_t = 500)]
    width: u32,

    /// Display height of the rendered mosaic
    #[arg(long, default_value_t = 300)]
    height: u32,

    /// Fill color for transparent regions, as RRGGBB hex
    #[arg(long, default_value = "ffffff")]
    fill: String,

    /// Write the rendered mosaic preview to this PNG file
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Asset-host account name for derived links
    #[arg(long, default_value = "dogjmmett")]
    cloud_name: String,

    /// Blur radius for the derived link
    #[arg(long, default_value_t = 10)]
    blur: u32,

    /// Delivery quality for the derived link (1..=100)
    #[arg(long, default_value_t = 1)]
    quality: u32,

    /// Render (and optionally save) the preview without uploading
    #[arg(long)]
    skip_publish: bool,
}

fn parse_fill(hex: &str) -> anyhow::Result<[u8; 3]> {
    let bytes = hex::decode(hex.trim_start_matches('#'))
        .with_context(|| format!("invalid fill color `{}`", hex))?;
    if bytes.len() != 3 {
        bail!("fill color must be exactly RRGGBB, got `{}`", hex);
    }
    Ok([bytes[0], bytes[1], bytes[2]])
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mosaic_config = MosaicConfig {
        display_width: args.width,
        display_height: args.height,
        sample_size: args.sample_size,
        fill_color: parse_fill(&args.fill)?,
    };
    let publish_config = PublishConfig {
        endpoint: args.endpoint,
        ..Default::default()
    };
    let cloud = CloudConfig {
        cloud_name: args.cloud_name,
    };

    let mut session = Session::new(mosaic_config, publish_config, cloud)?;
    session
        .select_path(&args.input)
        .with_context(|| format!("could not select {}", args.input.display()))?;

    let mosaic = session
        .render()
        .expect("a selection was just staged");

    if let Some(preview) = &args.preview {
        mosaic
            .image()
            .save(preview)
            .with_context(|| format!("could not write preview to {}", preview.display()))?;
        println!("preview: {}", preview.display());
    }

    if args.skip_publish {
        let snapshot = rasterize(&mosaic)?;
        println!(
            "rendered {}x{} mosaic ({} bytes PNG), publish skipped",
            snapshot.width,
            snapshot.height,
            snapshot.png_data.len()
        );
        return Ok(());
    }

    let link = session.publish().context("publish failed")?;
    println!("published: {}", link.url);

    let blurred = session
        .derived_link(&Transformations {
            effect: Some(format!("blur:{}", args.blur)),
            quality: Some(args.quality),
        })
        .expect("publish just succeeded");
    println!("blurred:   {}", blurred.url);

    Ok(())
}
