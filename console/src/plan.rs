use std::path::PathBuf;

use clap::Args;
use log::info;
use slabread::prelude::*;

use crate::utils::{
    validate_input,
    SpecArgs,
};

#[derive(Args, Debug, Clone)]
pub(crate) struct PlanArgs {
    #[arg(required = true, help = "Path to raw array file")]
    file: PathBuf,

    #[clap(flatten)]
    spec: SpecArgs,
}

impl PlanArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        let file = RawArrayFile::open(validate_input(&self.file)?)?;
        info!("Opened {}", self.file.display());

        let reader = RegionReader::new(&file).with_config(ReadConfig::from_env());
        let plan = reader.plan(&self.spec.to_spec()?)?;
        println!("{}", plan);
        Ok(())
    }
}
