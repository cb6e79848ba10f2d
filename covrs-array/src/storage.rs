use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::path::Path;

use ndarray::Array3;
use ndarray_npy::{read_npy, write_npy};
use serde::{Deserialize, Serialize};

use crate::array::GenomicArray;
use crate::element::Element;
use crate::errors::StoreError;

/// Storage backend for a [`GenomicArray`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Storage {
    /// Plain in-memory arrays; the loader runs on every construction.
    #[default]
    NdArray,
    /// Arrays cached as one npy file per chromosome under a dataset
    /// directory, reused on re-open unless overwriting is requested.
    Npy,
}

/// What an npy cache directory claims to contain. Checked against the
/// requested array before the cache is trusted.
#[derive(Serialize, Deserialize, Debug)]
struct CacheManifest {
    dtype: String,
    stranded: bool,
    conditions: Vec<String>,
    chrom_lens: BTreeMap<String, u64>,
}

///
/// Build a [`GenomicArray`] and populate it exactly once via `loader`.
///
/// With [`Storage::Npy`] and `overwrite = false`, an existing cache whose
/// manifest matches the requested layout is loaded instead of running the
/// loader; a stale or mismatching cache is reported and rebuilt. With
/// `overwrite = true` the loader always runs and the cache is rewritten.
///
/// # Arguments
/// - genome_size: chromosome lengths in the store's coordinate unit
/// - conditions: ordered condition labels (the tensor's last axis)
/// - stranded: whether forward/reverse get separate layers
/// - storage: backend selection
/// - cache_dir: dataset directory for [`Storage::Npy`] (required there)
/// - overwrite: force re-ingestion even when a cache exists
/// - loader: population callback, invoked with the empty array
///
pub fn create_genomic_array<T, E, L>(
    genome_size: &HashMap<String, u64>,
    conditions: Vec<String>,
    stranded: bool,
    storage: Storage,
    cache_dir: Option<&Path>,
    overwrite: bool,
    loader: L,
) -> Result<GenomicArray<T>, E>
where
    T: Element,
    E: From<StoreError>,
    L: FnOnce(&mut GenomicArray<T>) -> Result<(), E>,
{
    match storage {
        Storage::NdArray => {
            let mut array = GenomicArray::zeros(genome_size, conditions, stranded);
            loader(&mut array)?;
            Ok(array)
        }
        Storage::Npy => {
            let dir = cache_dir.ok_or_else(|| E::from(StoreError::CacheDirRequired))?;

            if !overwrite && dir.join(MANIFEST_FILE).is_file() {
                match load_cached::<T>(dir, genome_size, &conditions, stranded) {
                    Ok(array) => return Ok(array),
                    Err(err) => {
                        eprintln!(
                            "Stale coverage cache at {}: {}. Rebuilding.",
                            dir.display(),
                            err
                        );
                    }
                }
            }

            let mut array = GenomicArray::zeros(genome_size, conditions, stranded);
            loader(&mut array)?;
            write_cache(dir, &array).map_err(E::from)?;
            Ok(array)
        }
    }
}

const MANIFEST_FILE: &str = "manifest.json";

fn track_file(dir: &Path, chrom: &str) -> std::path::PathBuf {
    dir.join(format!("{}.npy", chrom))
}

fn load_cached<T: Element>(
    dir: &Path,
    genome_size: &HashMap<String, u64>,
    conditions: &[String],
    stranded: bool,
) -> Result<GenomicArray<T>, StoreError> {
    let manifest_path = dir.join(MANIFEST_FILE);
    let manifest: CacheManifest = serde_json::from_reader(File::open(&manifest_path)?)?;

    let mismatch = |reason: &str| StoreError::ManifestMismatch {
        path: manifest_path.display().to_string(),
        reason: reason.to_string(),
    };

    if manifest.dtype != std::any::type_name::<T>() {
        return Err(mismatch("element type differs"));
    }
    if manifest.stranded != stranded {
        return Err(mismatch("strandedness differs"));
    }
    if manifest.conditions != conditions {
        return Err(mismatch("condition labels differ"));
    }
    let requested: BTreeMap<String, u64> = genome_size
        .iter()
        .map(|(c, &l)| (c.clone(), l))
        .collect();
    if manifest.chrom_lens != requested {
        return Err(mismatch("chromosome lengths differ"));
    }

    let mut tracks: HashMap<String, Array3<T>> = HashMap::new();
    for chrom in manifest.chrom_lens.keys() {
        let track: Array3<T> = read_npy(track_file(dir, chrom))
            .map_err(|e| StoreError::NpyRead(e.to_string()))?;
        tracks.insert(chrom.clone(), track);
    }

    Ok(GenomicArray::from_tracks(
        tracks,
        conditions.to_vec(),
        stranded,
    ))
}

fn write_cache<T: Element>(dir: &Path, array: &GenomicArray<T>) -> Result<(), StoreError> {
    std::fs::create_dir_all(dir)?;

    let mut chrom_lens = BTreeMap::new();
    for (chrom, track) in array.tracks() {
        write_npy(track_file(dir, chrom), track)
            .map_err(|e| StoreError::NpyWrite(e.to_string()))?;
        chrom_lens.insert(chrom.clone(), track.shape()[0] as u64);
    }

    let manifest = CacheManifest {
        dtype: std::any::type_name::<T>().to_string(),
        stranded: array.stranded(),
        conditions: array.conditions().to_vec(),
        chrom_lens,
    };
    serde_json::to_writer_pretty(File::create(dir.join(MANIFEST_FILE))?, &manifest)?;

    Ok(())
}
