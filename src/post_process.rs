use std::path::{Path, PathBuf};
use std::process::Command;

use log::info;
use serde::Deserialize;

use crate::errors::Result;

/// Step run on the finished XML file, e.g. re-encoding it into a binary format.
pub trait PostProcessor {
    fn name(&self) -> &str;

    /// Returns the path of the produced artifact.
    fn encode(&self, xml_path: &Path) -> Result<PathBuf>;
}

/// Converts the XML into PBF with `osmium cat`.
pub struct OsmiumPbfEncoder {
    binary: String,
    overwrite: bool,
}

impl OsmiumPbfEncoder {
    pub fn new(binary: &str, overwrite: bool) -> Self {
        OsmiumPbfEncoder {
            binary: binary.to_string(),
            overwrite,
        }
    }

    pub fn output_path(xml_path: &Path) -> PathBuf {
        xml_path.with_extension("pbf")
    }

    fn command(&self, xml_path: &Path, pbf_path: &Path) -> Command {
        let mut command = Command::new(&self.binary);
        command.arg("cat").arg(xml_path).arg("-o").arg(pbf_path);
        if self.overwrite {
            command.arg("--overwrite");
        }
        command
    }
}

impl PostProcessor for OsmiumPbfEncoder {
    fn name(&self) -> &str {
        "osmium_pbf"
    }

    fn encode(&self, xml_path: &Path) -> Result<PathBuf> {
        let pbf_path = Self::output_path(xml_path);
        let status = self.command(xml_path, &pbf_path)
            .status()
            .map_err(|err| format!("Could not run {}: {}", self.binary, err))?;
        if !status.success() {
            return Err(format!("{} exited with {}", self.binary, status).into());
        }
        let pbf_path_str = pbf_path.display().to_string();
        info!(path = pbf_path_str.as_str(); "Wrote PBF file");
        Ok(pbf_path)
    }
}

pub struct NoPostProcessor;

impl PostProcessor for NoPostProcessor {
    fn name(&self) -> &str {
        "none"
    }

    fn encode(&self, xml_path: &Path) -> Result<PathBuf> {
        Ok(xml_path.to_path_buf())
    }
}

fn default_osmium_binary() -> String {
    "osmium".to_string()
}

fn default_overwrite() -> bool {
    true
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PostProcessorConfig {
    Osmium {
        #[serde(default = "default_osmium_binary")]
        binary: String,
        #[serde(default = "default_overwrite")]
        overwrite: bool,
    },
    None,
}

impl Default for PostProcessorConfig {
    fn default() -> Self {
        PostProcessorConfig::Osmium {
            binary: default_osmium_binary(),
            overwrite: default_overwrite(),
        }
    }
}

impl PostProcessorConfig {
    pub fn build(&self) -> Box<dyn PostProcessor> {
        match self {
            PostProcessorConfig::Osmium { binary, overwrite } => Box::new(OsmiumPbfEncoder::new(binary, *overwrite)),
            PostProcessorConfig::None => Box::new(NoPostProcessor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pbf_path_replaces_extension() {
        assert_eq!(
            OsmiumPbfEncoder::output_path(Path::new("data/network.osm")),
            PathBuf::from("data/network.pbf"),
        );
    }

    #[test]
    fn command_line_matches_osmium_cat() {
        let encoder = OsmiumPbfEncoder::new("osmium", true);
        let command = encoder.command(Path::new("network.osm"), Path::new("network.pbf"));
        let args: Vec<&str> = command.get_args().map(|arg| arg.to_str().unwrap()).collect();
        assert_eq!(command.get_program(), "osmium");
        assert_eq!(args, vec!["cat", "network.osm", "-o", "network.pbf", "--overwrite"]);

        let command = OsmiumPbfEncoder::new("osmium", false).command(Path::new("a.osm"), Path::new("a.pbf"));
        assert_eq!(command.get_args().count(), 4);
    }

    #[test]
    fn missing_binary_is_reported_as_error() {
        let encoder = OsmiumPbfEncoder::new("shp2osm-no-such-binary", false);
        let err = encoder.encode(Path::new("network.osm")).unwrap_err();
        assert!(err.message.contains("shp2osm-no-such-binary"));
    }

    #[test]
    fn config_defaults_to_osmium() {
        let config: PostProcessorConfig = serde_json::from_str(r#"{"kind": "osmium"}"#).unwrap();
        assert_eq!(config, PostProcessorConfig::default());
        let config: PostProcessorConfig = serde_json::from_str(r#"{"kind": "none"}"#).unwrap();
        assert_eq!(config.build().name(), "none");
    }
}
