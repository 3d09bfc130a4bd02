use clap::Parser;
use controlnet_unit::{ControlNetUnit, ControlNetUnitConfig, UnitParams};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Prints the ControlNet unit payload for an image as JSON
#[derive(Parser, Debug)]
#[command(name = "controlnet_unit")]
#[command(about = "Normalize a ControlNet unit and print its API payload")]
struct Args {
    /// Control image file
    image: PathBuf,

    /// Optional mask image file
    mask: Option<PathBuf>,

    /// JSON file with tuning parameters
    #[arg(long, env = "CONTROLNET_PRESET")]
    preset: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let params = match &args.preset {
        Some(preset_path) => {
            tracing::info!("Loading preset from: {:?}", preset_path);
            UnitParams::from_reader(std::fs::File::open(preset_path)?)?
        }
        None => UnitParams::default(),
    };

    let mut config = ControlNetUnitConfig::new(std::fs::read(&args.image)?).with_params(params);
    if let Some(mask_path) = &args.mask {
        config = config.mask(std::fs::read(mask_path)?);
    }

    let unit = ControlNetUnit::new(config);
    let payload = unit.to_json().await?;
    println!("{}", serde_json::to_string_pretty(&payload)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_image_and_mask() {
        let args = Args::try_parse_from(["controlnet_unit", "depth.png", "mask.png"]).unwrap();
        assert_eq!(args.image, PathBuf::from("depth.png"));
        assert_eq!(args.mask, Some(PathBuf::from("mask.png")));
    }

    #[test]
    fn image_is_required() {
        assert!(Args::try_parse_from(["controlnet_unit"]).is_err());
    }

    #[test]
    fn preset_flag_is_optional() {
        let args =
            Args::try_parse_from(["controlnet_unit", "depth.png", "--preset", "canny.json"]).unwrap();
        assert_eq!(args.mask, None);
        assert_eq!(args.preset, Some(PathBuf::from("canny.json")));
    }
}
