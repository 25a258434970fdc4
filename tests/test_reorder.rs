use flate2::write::GzEncoder;
use flate2::Compression;
use ndarray::{Array, Array2, Array3, Axis};
use tempfile::TempDir;

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use fncmaps::{
    vec2mat, vec2mat_batch, FncError, IcnTable, NetworkLayout, NetworkReorderer, Vec2MatOptions, ICN_COUNT,
};

const NETWORK_LABELS: [&str; 6] = [
    "Visual network",
    "Cerebellar network",
    "Temporal network",
    "Subcortical network (SC)",
    "Sensorimotor network (SM)",
    "Higher Cognition network (HC)",
];

/// Synthetic ICN table content: component i gets rank ranks[i] and cycles through the networks.
fn icn_table_text(ranks: &[usize], delimiter: char) -> String {
    let mut text = format!("ICN_index{d}Label{d}new_order\n", d = delimiter);
    for (i, rank) in ranks.iter().enumerate() {
        text.push_str(&format!("{}{d}{}{d}{}\n", i + 1, NETWORK_LABELS[i % 6], rank, d = delimiter));
    }
    text
}

fn write_table(dir: &TempDir, name: &str, ranks: &[usize]) -> PathBuf {
    let path = dir.path().join(name);
    let delimiter = if name.contains(".tsv") { '\t' } else { ',' };
    let text = icn_table_text(ranks, delimiter);
    if name.ends_with(".gz") {
        let mut enc = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        enc.write_all(text.as_bytes()).unwrap();
        enc.finish().unwrap();
    } else {
        std::fs::write(&path, text).unwrap();
    }
    path
}

fn identity_ranks() -> Vec<usize> {
    (1..=ICN_COUNT).collect()
}

fn reversed_ranks() -> Vec<usize> {
    (1..=ICN_COUNT).rev().collect()
}

fn fnc_matrix() -> Array2<f64> {
    let vec = Array::linspace(-1.0, 1.0, ICN_COUNT * (ICN_COUNT - 1) / 2);
    vec2mat(vec.view(), &Vec2MatOptions::full()).unwrap()
}

fn reorderer_for(path: &Path) -> NetworkReorderer {
    NetworkReorderer::new(path)
}


#[test]
fn a_vector_of_5460_values_reorders_with_a_reversed_table() {
    let dir = TempDir::new().unwrap();
    let path = write_table(&dir, "ICNs_reversed.csv", &reversed_ranks());
    let mat = fnc_matrix();

    let ordered = reorderer_for(&path).reorder(mat.view()).unwrap();

    let mut expected = mat.clone();
    expected.invert_axis(Axis(0));
    expected.invert_axis(Axis(1));
    assert_eq!(expected, ordered);
}

#[test]
fn the_identity_table_leaves_the_matrix_unchanged() {
    let dir = TempDir::new().unwrap();
    let path = write_table(&dir, "ICNs_identity.csv", &identity_ranks());
    let mat = fnc_matrix();
    assert_eq!(mat, reorderer_for(&path).reorder(mat.view()).unwrap());
}

#[test]
fn tab_separated_and_gzipped_tables_can_be_read() {
    let dir = TempDir::new().unwrap();
    let csv = IcnTable::from_file(write_table(&dir, "ICNs.csv", &reversed_ranks())).unwrap();
    let tsv = IcnTable::from_file(write_table(&dir, "ICNs.tsv", &reversed_ranks())).unwrap();
    let tsv_gz = IcnTable::from_file(write_table(&dir, "ICNs.tsv.gz", &reversed_ranks())).unwrap();
    let csv_gz = IcnTable::from_file(write_table(&dir, "ICNs.csv.gz", &reversed_ranks())).unwrap();

    assert_eq!(ICN_COUNT, csv.len());
    assert_eq!(csv, tsv);
    assert_eq!(csv, tsv_gz);
    assert_eq!(csv, csv_gz);
    assert_eq!(105.0, csv.new_order[0]);
    assert_eq!("Visual network", csv.labels[6]);
}

#[test]
fn wrongly_sized_matrices_are_rejected_before_reading_the_table() {
    let reorderer = NetworkReorderer::new("/no/such/dir/ICNs_v2.csv");
    for n in &[104usize, 106] {
        let mat = Array2::<f64>::zeros((*n, *n));
        match reorderer.reorder(mat.view()) {
            Err(FncError::InvalidMatrixShape { rows, cols, expected }) => {
                assert_eq!((*n, *n, 105), (rows, cols, expected));
            }
            other => panic!("Expected InvalidMatrixShape, got {:?}", other),
        }
    }
}

#[test]
fn tables_with_the_wrong_number_of_components_are_rejected() {
    let dir = TempDir::new().unwrap();
    let ranks: Vec<usize> = (1..=104).collect();
    let path = write_table(&dir, "ICNs_short.csv", &ranks);
    let mat = fnc_matrix();
    assert!(matches!(reorderer_for(&path).reorder(mat.view()), Err(FncError::InvalidIcnTable(_))));
}

#[test]
fn batches_are_reordered_like_single_matrices() {
    let dir = TempDir::new().unwrap();
    let mut ranks = identity_ranks();
    ranks.swap(3, 70);
    ranks.swap(10, 11);
    let path = write_table(&dir, "ICNs_swapped.csv", &ranks);
    let reorderer = reorderer_for(&path);

    let len = ICN_COUNT * (ICN_COUNT - 1) / 2;
    let batch = Array2::from_shape_fn((3, len), |(p, k)| ((p + 1) * k) as f64 / len as f64);
    let mats: Array3<f64> = vec2mat_batch(batch.view(), &Vec2MatOptions::full()).unwrap();
    let ordered = reorderer.reorder_batch(&mats).unwrap();

    assert_eq!((3, ICN_COUNT, ICN_COUNT), ordered.dim());
    for p in 0..3 {
        let single = reorderer.reorder(mats.index_axis(Axis(0), p)).unwrap();
        assert_eq!(single, ordered.index_axis(Axis(0), p));
    }
    assert_eq!(mats[[0, 70, 0]], ordered[[0, 3, 0]]);
}

#[test]
fn batches_of_wrongly_sized_matrices_are_rejected_before_reading_the_table() {
    let reorderer = NetworkReorderer::new("/no/such/dir/ICNs_v2.csv");
    let mats = Array3::<f64>::zeros((2, 104, 104));
    match reorderer.reorder_batch(&mats) {
        Err(err @ FncError::InvalidMatrixShape { .. }) => {
            assert_eq!("Input matrix must be (105,105), got (104,104)", err.to_string());
        }
        other => panic!("Expected InvalidMatrixShape, got {:?}", other),
    }
}

#[test]
fn the_table_path_can_be_configured_from_the_environment() {
    let dir = TempDir::new().unwrap();
    let path = write_table(&dir, "ICNs_env.csv", &reversed_ranks());
    std::env::set_var("FNCMAPS_ICN_TABLE", &path);
    let reorderer = NetworkReorderer::from_env();
    std::env::remove_var("FNCMAPS_ICN_TABLE");

    assert_eq!(path.as_path(), reorderer.table_path());
    assert_eq!(ICN_COUNT, reorderer.load_table().unwrap().len());
}

#[test]
fn the_network_layout_covers_all_components() {
    let dir = TempDir::new().unwrap();
    let table = IcnTable::from_file(write_table(&dir, "ICNs_layout.csv", &identity_ranks())).unwrap();
    let layout = NetworkLayout::from_table(&table);

    assert_eq!(vec!["VI", "CB", "TM", "SC", "SM", "HC"], layout.abbreviations());
    assert_eq!(ICN_COUNT, layout.total_size());
    assert_eq!(vec![0, 18, 36, 54, 71, 88, 105], layout.boundaries());
    assert_eq!(9.0, layout.tick_positions()[0]);
    assert_eq!(vec![0, 6, 12], layout.groups[0].indices[..3].to_vec());
}
