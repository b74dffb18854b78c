pub mod graph_builder;
pub mod ingest;
pub mod shp_to_osm;
pub mod write_osm;

use std::path::Path;
use log::{info, error};

use crate::errors::Result;


pub trait Etl {
    type Input;
    type Output;

    fn etl_name(&self) -> &str;

    fn is_cached(&self, dir: &Path) -> Result<bool>;
    fn clean(&self, dir: &Path) -> Result<()>;

    fn extract(&mut self, dir: &Path) -> Result<Self::Input>;
    fn transform(&mut self, input: Self::Input) -> Result<Self::Output>;
    fn load(&mut self, dir: &Path, output: Self::Output) -> Result<()>;

    fn log_stage<T>(&self, stage: &str, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            error!(etl_name = self.etl_name(), stage = stage, err = err.message.as_str(); "ETL stage failed");
        }
        result
    }

    /// Runs extract, transform and load unless a cached output can be used.
    /// Existing output is only touched by `load`.
    fn process(&mut self, dir: &Path) -> Result<()> {
        info!(etl_name = self.etl_name(); "Starting ETL process");
        if self.is_cached(dir)? {
            info!(etl_name = self.etl_name(); "Using cached value");
            return Ok(());
        }

        info!(etl_name = self.etl_name(); "Extracting");
        let extracted = self.extract(dir);
        let input = self.log_stage("extract", extracted)?;

        info!(etl_name = self.etl_name(); "Transforming");
        let transformed = self.transform(input);
        let output = self.log_stage("transform", transformed)?;

        info!(etl_name = self.etl_name(); "Loading");
        let loaded = self.load(dir, output);
        self.log_stage("load", loaded)?;

        info!(etl_name = self.etl_name(); "Process finished");
        Ok(())
    }
}
