use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::data::feature::FeatureRecord;
use crate::errors::Result;
use crate::etl::graph_builder::{BuildOutput, GraphBuilder, SkippedRecord};
use crate::etl::{ingest, write_osm, Etl};
use crate::post_process::PostProcessor;
use crate::UserConfig;

const ETL_NAME: &str = "shp_to_osm";

pub struct Input {
    pub nodes: Vec<FeatureRecord>,
    pub links: Vec<FeatureRecord>,
}

/// Converts the node and link layers into one OSM XML file, then hands it to the
/// post-processor.
pub struct ShpToOsmEtl<'a> {
    config: &'a UserConfig,
    post_processor: Box<dyn PostProcessor>,
    skipped: Vec<SkippedRecord>,
}

impl ShpToOsmEtl<'_> {
    pub fn new(config: &UserConfig) -> ShpToOsmEtl {
        ShpToOsmEtl {
            config,
            post_processor: config.post_processor.build(),
            skipped: Vec::new(),
        }
    }

    pub fn with_post_processor(config: &UserConfig, post_processor: Box<dyn PostProcessor>) -> ShpToOsmEtl {
        ShpToOsmEtl {
            config,
            post_processor,
            skipped: Vec::new(),
        }
    }

    pub fn output_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.config.output_file_name)
    }

    /// Records dropped by the last run.
    pub fn skipped(&self) -> &[SkippedRecord] {
        &self.skipped
    }
}

impl Etl for ShpToOsmEtl<'_> {
    type Input = Input;
    type Output = BuildOutput;

    fn etl_name(&self) -> &str {
        ETL_NAME
    }

    fn is_cached(&self, dir: &Path) -> Result<bool> {
        Ok(self.config.reuse_cached_output && self.output_path(dir).try_exists()?)
    }

    fn clean(&self, dir: &Path) -> Result<()> {
        let path = self.output_path(dir);
        if path.try_exists()? {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn extract(&mut self, _dir: &Path) -> Result<Self::Input> {
        let nodes = ingest::read_records(Path::new(&self.config.node_path))?;
        let links = ingest::read_records(Path::new(&self.config.link_path))?;
        Ok(Input {
            nodes,
            links,
        })
    }

    fn transform(&mut self, input: Self::Input) -> Result<Self::Output> {
        let builder = GraphBuilder::new(&self.config.generator, self.config.tag_vocabulary);
        let output = builder.build(&input.nodes, &input.links);
        info!(
            etl_name = ETL_NAME,
            explicit_nodes = output.explicit_nodes,
            synthetic_nodes = output.synthetic_nodes,
            ways = output.ways,
            skipped = output.skipped.len();
            "Built node/way graph"
        );
        Ok(output)
    }

    fn load(&mut self, dir: &Path, output: Self::Output) -> Result<()> {
        self.clean(dir)?;
        let path = self.output_path(dir);
        write_osm::write_osm_file(&path, &output.document)?;
        let path_str = path.display().to_string();
        info!(etl_name = ETL_NAME, path = path_str.as_str(); "Wrote OSM file");
        self.skipped = output.skipped;

        // The XML is the product of this run; re-encoding is best effort.
        if let Err(err) = self.post_processor.encode(&path) {
            warn!(etl_name = ETL_NAME, post_processor = self.post_processor.name(), err = err.message.as_str(); "Post-processing failed");
        }
        Ok(())
    }
}
