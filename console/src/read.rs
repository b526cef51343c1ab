use std::fmt::Display;
use std::path::PathBuf;

use clap::{
    Args,
    ValueEnum,
};
use itertools::Itertools;
use log::info;
use serde_json::json;
use slabread::prelude::*;

use crate::utils::{
    validate_input,
    CliElementType,
    SpecArgs,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

#[derive(Args, Debug, Clone)]
pub(crate) struct ReadArgs {
    #[arg(required = true, help = "Path to raw array file")]
    file: PathBuf,

    #[clap(flatten)]
    spec: SpecArgs,

    #[clap(long = "as", value_enum, default_value_t = CliElementType::I32, help = "Type to read values as")]
    as_type: CliElementType,

    #[clap(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl ReadArgs {
    pub fn run(&self) -> anyhow::Result<()> {
        let file = RawArrayFile::open(validate_input(&self.file)?)?;
        info!("Opened {}", self.file.display());

        match ElementType::from(self.as_type) {
            ElementType::U8 => self.read_as::<u8>(&file),
            ElementType::I16 => self.read_as::<i16>(&file),
            ElementType::I32 => self.read_as::<i32>(&file),
            ElementType::I64 => self.read_as::<i64>(&file),
            ElementType::F32 => self.read_as::<f32>(&file),
            ElementType::F64 => self.read_as::<f64>(&file),
        }
    }

    fn read_as<T: Element + Display + serde::Serialize>(
        &self,
        file: &RawArrayFile,
    ) -> anyhow::Result<()> {
        let reader = RegionReader::new(file).with_config(ReadConfig::from_env());
        let read = reader.read::<T>(&self.spec.to_spec()?)?;

        match self.format {
            OutputFormat::Text => {
                println!("shape: ({})", read.shape().iter().join(" x "));
                println!("hyperslabs: {}", read.num_hyperslabs());
                println!("{}", read.data());
            },
            OutputFormat::Json => {
                // Values in caller axis 0 fastest order.
                let values = read.data().t().iter().copied().collect_vec();
                let out = json!({
                    "shape": read.shape(),
                    "hyperslabs": read.num_hyperslabs(),
                    "order": "F",
                    "data": values,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            },
        }
        Ok(())
    }
}
