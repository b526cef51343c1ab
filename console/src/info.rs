use std::path::PathBuf;

use clap::Args;
use itertools::Itertools;
use slabread::prelude::*;

use crate::utils::validate_input;

#[derive(Args, Debug, Clone)]
pub(crate) struct InfoArgs {
    #[arg(required = true, help = "Path to raw array file")]
    file: PathBuf,
}

impl InfoArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        let file = RawArrayFile::open(validate_input(&self.file)?)?;
        let dims = file.dims()?;

        println!("file:         {}", file.path().display());
        println!("element type: {}", file.element_type());
        println!("rank:         {}", dims.len());
        println!("extents:      ({})", dims.iter().join(" x "));
        // Callers list axes in the opposite order.
        println!("caller axes:  ({})", dims.iter().rev().join(" x "));
        println!("elements:     {}", file.len());
        Ok(())
    }
}
