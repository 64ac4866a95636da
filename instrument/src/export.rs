use std::collections::HashMap;
use std::fs::{self, File};
use std::path::Path;

use polars::prelude::*;

use crate::table::{Column, Recording, Table};

/// On-disk format for exported tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Parquet,
    Csv,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Format::Parquet => "parquet",
            Format::Csv => "csv",
        }
    }
}

impl Table {
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let columns: Vec<polars::prelude::Column> = self
            .columns()
            .map(|(name, col)| match col {
                Column::U64(v) => polars::prelude::Column::new(name.into(), v.as_slice()),
                Column::I64(v) => polars::prelude::Column::new(name.into(), v.as_slice()),
                Column::F64(v) => polars::prelude::Column::new(name.into(), v.as_slice()),
                Column::Bool(v) => polars::prelude::Column::new(name.into(), v.as_slice()),
                Column::Str(v) => polars::prelude::Column::new(name.into(), v.as_slice()),
            })
            .collect();
        DataFrame::new(columns)
    }
}

impl Recording {
    /// Every table as a DataFrame. Tables that fail to convert are skipped.
    pub fn to_dataframes(&self) -> HashMap<String, DataFrame> {
        self.tables
            .iter()
            .filter_map(|(name, table)| table.to_dataframe().ok().map(|df| (name.clone(), df)))
            .collect()
    }
}

/// Write each frame to `{dir}/{name}.{ext}`, creating `dir` if needed.
pub fn write_tables(
    dfs: &mut HashMap<String, DataFrame>,
    dir: &Path,
    format: Format,
) -> PolarsResult<()> {
    fs::create_dir_all(dir)?;
    for (name, df) in dfs.iter_mut() {
        let path = dir.join(format!("{}.{}", file_stem(name), format.extension()));
        let file = File::create(&path)?;
        match format {
            Format::Parquet => {
                ParquetWriter::new(file).finish(df)?;
            }
            Format::Csv => {
                CsvWriter::new(file).include_header(true).finish(df)?;
            }
        }
    }
    Ok(())
}

/// Targets like `city_core::engine` are not valid file names everywhere.
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}
