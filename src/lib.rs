pub mod data;
pub mod errors;
pub mod etl;
pub mod post_process;

use std::fs::File;
use std::path::Path;

use serde::Deserialize;

use crate::errors::Result;
use crate::etl::graph_builder::TagVocabulary;
use crate::post_process::PostProcessorConfig;

fn default_output_file_name() -> String {
    "network.osm".to_string()
}

fn default_generator() -> String {
    "shp2osm".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Debug)]
pub struct UserConfig {
    /// Point layer exported as lon/lat GeoJSON, optionally `.xz` compressed.
    pub node_path: String,
    /// Line string layer, same format as the point layer.
    pub link_path: String,
    pub output_dir: String,
    #[serde(default = "default_output_file_name")]
    pub output_file_name: String,
    #[serde(default = "default_generator")]
    pub generator: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub tag_vocabulary: TagVocabulary,
    #[serde(default)]
    pub reuse_cached_output: bool,
    #[serde(default)]
    pub post_processor: PostProcessorConfig,
}

pub fn load_user_config(path: &Path) -> Result<UserConfig> {
    let file = File::open(path)
        .map_err(|err| format!("Could not open config file {}: {}", path.display(), err))?;
    Ok(serde_json::from_reader(file)?)
}
