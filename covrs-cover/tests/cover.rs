use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use rstest::*;
use tempfile::tempdir;

use covrs_array::Storage;
use covrs_cover::{BedConfig, Cover};

fn write_lines(path: &Path, lines: &[&str]) {
    let mut file = File::create(path).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
}

#[fixture]
fn workspace() -> (tempfile::TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let regions = dir.path().join("regions.bed");
    write_lines(&regions, &["chr1\t0\t1000"]);
    (dir, regions)
}

#[rstest]
fn test_bed_pipeline_strand_aware_retrieval() {
    let dir = tempdir().unwrap();

    // Same span tiled once per orientation.
    let regions = dir.path().join("regions.bed");
    write_lines(
        &regions,
        &[
            "chr1\t0\t600\tfwd\t0\t+",
            "chr1\t0\t600\trev\t0\t-",
        ],
    );

    let peaks = dir.path().join("peaks.bed");
    write_lines(&peaks, &["chr1\t0\t200"]);

    let mut config = BedConfig::new("peaks", vec![peaks], &regions);
    config.binsize = 600;
    config.stepsize = 600;
    config.resolution = 200;
    let cover: Cover<i32> = Cover::from_bed(config).unwrap();

    assert_eq!(cover.shape(), [2, 3, 1, 1]);
    let data = cover.fetch(..).unwrap();

    let forward: Vec<i32> = (0..3).map(|p| data[[0, p, 0, 0]]).collect();
    let reverse: Vec<i32> = (0..3).map(|p| data[[1, p, 0, 0]]).collect();
    assert_eq!(forward, vec![1, 0, 0]);
    assert_eq!(reverse, vec![0, 0, 1]);
}

#[rstest]
fn test_npy_cache_reused_until_overwritten(workspace: (tempfile::TempDir, PathBuf)) {
    let (dir, regions) = workspace;
    let peaks = dir.path().join("peaks.bed");
    write_lines(&peaks, &["chr1\t0\t400"]);

    let cache_root = dir.path().join("cache");
    let build = |overwrite: bool| -> Cover<i32> {
        let mut config = BedConfig::new("peaks", vec![peaks.clone()], &regions);
        config.storage = Storage::Npy;
        config.cache_dir = Some(cache_root.clone());
        config.overwrite = overwrite;
        Cover::from_bed(config).unwrap()
    };

    let flags = |cover: &Cover<i32>| -> Vec<i32> {
        let data = cover.fetch(..).unwrap();
        (0..5).map(|i| data[[i, 0, 0, 0]]).collect()
    };

    let cover = build(false);
    assert_eq!(flags(&cover), vec![1, 1, 0, 0, 0]);

    let dataset_dir = cache_root.join("peaks");
    assert!(dataset_dir.join("manifest.json").is_file());
    assert!(dataset_dir.join("chr1.npy").is_file());

    // New annotations are invisible while the cache is trusted.
    let mut file = OpenOptions::new().append(true).open(&peaks).unwrap();
    writeln!(file, "chr1\t800\t1000").unwrap();

    let cached = build(false);
    assert_eq!(flags(&cached), vec![1, 1, 0, 0, 0]);

    let rebuilt = build(true);
    assert_eq!(flags(&rebuilt), vec![1, 1, 0, 0, 1]);
}
