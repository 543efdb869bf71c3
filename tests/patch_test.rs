//! Patch-level runs: the edge file must be present before weeding starts, and
//! the weeded product survives a save/load cycle.

use std::fs;
use std::path::PathBuf;

use psweed::{CandidateSet, WeedConfig, WeedError, WeedProduct, WeedStage, EDGE_FILE_NAME};

/// Fresh scratch directory under the system temp dir.
fn patch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("psweed-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn sample_candidates() -> CandidateSet {
    let mut candidates = CandidateSet::new(
        vec![[120, 40], [121, 41], [200, 90], [260, 15]],
        vec![[10.0, 20.0], [10.5, 20.5], [99.0, 1.0], [99.0, 1.0]],
        vec![0.61, 0.74, 0.55, 0.58],
        vec![31.0, 30.5, 2.0, 2.5],
    );
    candidates.lonlat = vec![[24.70, 59.43], [24.71, 59.43], [24.80, 59.40], [24.85, 59.38]];
    candidates.k_ps = vec![0.01, 0.02, 0.03, 0.04];
    candidates
}

#[test]
fn test_missing_edge_file_aborts() {
    let dir = patch_dir("missing");
    let err = WeedStage::default()
        .run_for_patch(&dir, &sample_candidates())
        .unwrap_err();
    match err {
        WeedError::MissingInputFile { path } => assert_eq!(path, dir.join(EDGE_FILE_NAME)),
        other => panic!("expected MissingInputFile, got {:?}", other),
    }
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_run_for_patch_with_edge_file() {
    let dir = patch_dir("edges");
    fs::write(
        dir.join(EDGE_FILE_NAME),
        "3 1\n1 0 1 0\n2 1 2 0\n3 2 3 1\n# Generated by triangle\n",
    )
    .unwrap();

    let candidates = sample_candidates();
    let result = WeedStage::default().run_for_patch(&dir, &candidates).unwrap();
    assert_eq!(result.edge_count, Some(3));
    // 0 and 1 are neighbours (1 is better); 2 and 3 share a coordinate (3 is better).
    assert_eq!(result.kept_indices(), vec![1, 3]);

    let product = WeedProduct::new(&candidates, &result).unwrap();
    assert_eq!(product.kept_indices, vec![1, 3]);
    assert_eq!(product.lonlat, vec![[24.71, 59.43], [24.85, 59.38]]);
    assert_eq!(product.k_ps, vec![0.02, 0.04]);
    assert!(product.ph_res.is_empty());

    let path = dir.join("weed.rkyv");
    product.save_to_file(&path).unwrap();
    let loaded = WeedProduct::load_from_file(&path).unwrap();
    assert_eq!(loaded, product);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_custom_edge_file_name() {
    let dir = patch_dir("custom");
    fs::write(dir.join("weed.edge"), "0 1\n").unwrap();
    let stage = WeedStage::new(WeedConfig {
        edge_file_name: "weed.edge".to_string(),
        ..Default::default()
    });
    let result = stage.run_for_patch(&dir, &CandidateSet::empty()).unwrap();
    assert_eq!(result.edge_count, Some(0));
    assert!(result.selectable.is_empty());
    let _ = fs::remove_dir_all(&dir);
}
