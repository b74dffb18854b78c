use std::env;
use std::fs::create_dir_all;
use std::io;
use std::path::{Path, PathBuf};

use structured_logger::json::new_writer;
use structured_logger::Builder;

use shp2osm::errors::Result;
use shp2osm::etl::shp_to_osm::ShpToOsmEtl;
use shp2osm::etl::Etl;
use shp2osm::{load_user_config, UserConfig};

const DEFAULT_CONFIG_PATH: &str = "config/shp2osm.json";

fn create_output_dir(config: &UserConfig) -> Result<PathBuf> {
    let output_dir = PathBuf::from(&config.output_dir);
    create_dir_all(&output_dir)?;
    Ok(output_dir)
}

fn setup_logging(level: &str) {
    Builder::with_level(level)
        .with_target_writer("*", new_writer(io::stdout()))
        .init();
}

fn main() -> Result<()> {
    let config_path = env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let user_config = load_user_config(Path::new(&config_path))?;
    setup_logging(&user_config.log_level);

    let output_dir = create_output_dir(&user_config)?;
    let mut etl = ShpToOsmEtl::new(&user_config);
    etl.process(&output_dir)?;

    Ok(())
}
