use std::path::PathBuf;

use clap::Args;
use log::info;
use slabread::prelude::*;

use crate::utils::{
    parse_dims,
    validate_output,
    CliElementType,
};

const CHUNK_SIZE: u64 = 1 << 16;

#[derive(Args, Debug, Clone)]
pub(crate) struct CreateArgs {
    #[arg(required = true, help = "Path to the new raw array file")]
    file: PathBuf,

    #[arg(
        short,
        long,
        required = true,
        help = "Comma-separated extents in storage order (innermost axis last)"
    )]
    dims: String,

    #[clap(short = 't', long, value_enum, default_value_t = CliElementType::I32)]
    dtype: CliElementType,
}

impl CreateArgs {
    /// Writes an array whose elements are their row-major linear index,
    /// wrapped to the range of the element type.
    pub fn run(&self) -> anyhow::Result<()> {
        let dims = parse_dims(&self.dims)?;
        let dtype = ElementType::from(self.dtype);
        let modulus = match dtype {
            ElementType::U8 => 1 << 8,
            ElementType::I16 => 1 << 15,
            ElementType::I32 => 1 << 31,
            ElementType::F32 => 1 << 24,
            _ => i64::MAX,
        };

        let mut writer = RawArrayWriter::create(validate_output(&self.file)?, &dims, dtype)?;
        let total: u64 = dims.iter().product();
        let mut written = 0u64;
        while written < total {
            let stop = (written + CHUNK_SIZE).min(total);
            let chunk = (written..stop)
                .map(|i| i as i64 % modulus)
                .collect::<Vec<_>>();
            writer.write_slice(&chunk)?;
            written = stop;
        }
        writer.finish()?;

        info!("Wrote {} elements of {} to {}", total, dtype, self.file.display());
        Ok(())
    }
}
