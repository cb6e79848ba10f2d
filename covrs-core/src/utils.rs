use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::errors::CoreError;
use crate::models::bed::read_bed_records;

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> Result<BufReader<Box<dyn Read>>, CoreError> {
    let is_gzipped = path.extension() == Some(OsStr::new("gz"));
    let file = File::open(path)?;
    let file: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(file)),
        false => Box::new(file),
    };

    Ok(BufReader::new(file))
}

///
/// Derive a genome-size mapping from a BED-like region file: for each
/// chromosome, the largest end coordinate seen, extended by `extend`
/// base pairs.
///
/// # Arguments
///
/// - path: path to the region file
/// - extend: extra length added to every chromosome (typically
///   `flank * resolution`, so flanked windows stay in bounds)
///
pub fn genome_size_from_bed<P: AsRef<Path>>(
    path: P,
    extend: u64,
) -> Result<HashMap<String, u64>, CoreError> {
    let records = read_bed_records(path)?;

    let mut gsize: HashMap<String, u64> = HashMap::new();
    for record in records {
        let length = gsize.entry(record.interval.chrom).or_insert(0);
        *length = (*length).max(record.interval.end + extend);
    }

    Ok(gsize)
}

///
/// Read a two-column `chrom.sizes` style file into a genome-size mapping.
///
pub fn read_chrom_sizes<P: AsRef<Path>>(path: P) -> Result<HashMap<String, u64>, CoreError> {
    let path = path.as_ref();
    let reader = get_dynamic_reader(path)?;

    let mut chrom_sizes: HashMap<String, u64> = HashMap::new();
    for line in reader.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split_whitespace();
        let chrom = fields
            .next()
            .ok_or_else(|| CoreError::RegionParse(line.clone()))?;
        let size = fields
            .next()
            .and_then(|s| s.parse::<u64>().ok())
            .ok_or_else(|| CoreError::RegionParse(line.clone()))?;

        chrom_sizes.insert(chrom.to_owned(), size);
    }

    Ok(chrom_sizes)
}

/// Strip every extension from a file name, so `sample.bed.gz` and
/// `sample.bam` both become `sample`. Used for default condition labels.
pub fn remove_all_extensions(path: &Path) -> String {
    let mut stem = path.file_stem().unwrap_or_default().to_string_lossy().to_string();

    let mut parent_path = path.with_file_name(stem.clone());
    while parent_path.extension().is_some() {
        parent_path = parent_path.with_extension("");
        stem = parent_path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
    }

    stem
}
