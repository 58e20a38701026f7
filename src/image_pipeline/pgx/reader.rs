use std::io::BufRead;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::pgx::types::DecodedGrid;

pub trait PgxReader {
    fn read_pgx(&self, source_name: &str, input: &mut dyn BufRead) -> Result<DecodedGrid>;
}
