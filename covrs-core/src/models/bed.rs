use std::io::BufRead;
use std::path::Path;

use crate::errors::CoreError;
use crate::models::{GenomicInterval, Strand};
use crate::utils::get_dynamic_reader;

///
/// One record of a BED-like annotation file: an interval plus the optional
/// score of column 5 and the strand of column 6.
///
#[derive(Debug, Clone, PartialEq)]
pub struct BedRecord {
    pub interval: GenomicInterval,
    pub score: Option<f64>,
}

impl BedRecord {
    pub fn chrom(&self) -> &str {
        &self.interval.chrom
    }
}

///
/// Read every record of a BED-like file (plain or gzip'd).
///
/// `browser`/`track`/`#` lines and a leading non-numeric column header are
/// skipped, the same way region-set files are read elsewhere. Column 5 is
/// parsed into the score when present and numeric; column 6 into the strand.
///
/// # Arguments
/// - path: path to the bed file on disk
///
pub fn read_bed_records<P: AsRef<Path>>(path: P) -> Result<Vec<BedRecord>, CoreError> {
    let path = path.as_ref();
    let reader = get_dynamic_reader(path)
        .map_err(|_| CoreError::FileRead(path.display().to_string()))?;

    let mut records: Vec<BedRecord> = Vec::new();
    let mut first_line = true;

    for line in reader.lines() {
        let line = line?;

        if line.is_empty()
            || line.starts_with("browser")
            || line.starts_with("track")
            || line.starts_with('#')
        {
            continue;
        }

        let parts: Vec<&str> = line.split('\t').collect();

        if parts.len() < 3 {
            return Err(CoreError::RegionParse(line));
        }

        // Column headers like `chr start end` without a leading # show up in
        // the wild; detect them by a non-numeric start on the first line.
        if first_line {
            first_line = false;
            if parts[1].parse::<u64>().is_err() {
                continue;
            }
        }

        let start: u64 = parts[1]
            .parse()
            .map_err(|_| CoreError::RegionParse(line.clone()))?;
        let end: u64 = parts[2]
            .parse()
            .map_err(|_| CoreError::RegionParse(line.clone()))?;

        let score = parts.get(4).and_then(|s| s.parse::<f64>().ok());
        let strand = parts
            .get(5)
            .map(|s| Strand::from_symbol(s))
            .unwrap_or(Strand::Unstranded);

        records.push(BedRecord {
            interval: GenomicInterval::new(parts[0], start, end, strand),
            score,
        });
    }

    if records.is_empty() {
        return Err(CoreError::EmptyRegions(path.display().to_string()));
    }

    Ok(records)
}
