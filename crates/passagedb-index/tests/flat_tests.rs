use passagedb_index::flat::{l2_normalize, FlatIndex};

fn unit(v: &[f32]) -> Vec<f32> {
    let mut v = v.to_vec();
    l2_normalize(&mut v).expect("normalize");
    v
}

#[test]
fn search_returns_top_k_descending() {
    let mut index = FlatIndex::new(2).expect("index");
    // scores against [1, 0]: 0.5, 0.9, 0.1, 0.7
    index
        .add(&[
            unit(&[0.5, 0.866]),
            unit(&[0.9, 0.436]),
            unit(&[0.1, 0.995]),
            unit(&[0.7, 0.714]),
        ])
        .expect("add");

    let hits = index.search(&[1.0, 0.0], 3).expect("search");
    assert_eq!(hits.len(), 3);
    let positions: Vec<usize> = hits.iter().map(|h| h.0).collect();
    assert_eq!(positions, vec![1, 3, 0]);
    assert!(hits[0].1 > hits[1].1 && hits[1].1 > hits[2].1);
}

#[test]
fn equal_scores_break_ties_by_lower_position() {
    let mut index = FlatIndex::new(2).expect("index");
    let same = unit(&[0.6, 0.8]);
    index.add(&[same.clone(), same.clone(), same]).expect("add");

    let hits = index.search(&[1.0, 0.0], 3).expect("search");
    let positions: Vec<usize> = hits.iter().map(|h| h.0).collect();
    assert_eq!(positions, vec![0, 1, 2]);
}

#[test]
fn k_larger_than_len_returns_all() {
    let mut index = FlatIndex::new(2).expect("index");
    index.add(&[unit(&[1.0, 0.0]), unit(&[0.0, 1.0])]).expect("add");
    let hits = index.search(&[1.0, 0.0], 10).expect("search");
    assert_eq!(hits.len(), 2);
}

#[test]
fn empty_index_returns_empty_not_error() {
    let index = FlatIndex::new(4).expect("index");
    let hits = index.search(&[1.0, 0.0, 0.0, 0.0], 5).expect("search");
    assert!(hits.is_empty());
}

#[test]
fn add_rejects_wrong_dimension() {
    let mut index = FlatIndex::new(3).expect("index");
    assert!(index.add(&[vec![1.0, 0.0]]).is_err());
    assert_eq!(index.len(), 0, "rejected batch leaves no partial rows");
}

#[test]
fn search_rejects_wrong_dimension() {
    let mut index = FlatIndex::new(3).expect("index");
    index.add(&[unit(&[1.0, 0.0, 0.0])]).expect("add");
    assert!(index.search(&[1.0, 0.0], 1).is_err());
}

#[test]
fn vector_accessor_is_position_aligned() {
    let mut index = FlatIndex::new(2).expect("index");
    let a = unit(&[1.0, 0.0]);
    let b = unit(&[0.0, 1.0]);
    index.add(&[a.clone(), b.clone()]).expect("add");
    assert_eq!(index.vector(0), Some(a.as_slice()));
    assert_eq!(index.vector(1), Some(b.as_slice()));
    assert_eq!(index.vector(2), None);
}

#[test]
fn l2_normalize_produces_unit_vectors() {
    let mut v = vec![3.0, 4.0];
    l2_normalize(&mut v).expect("normalize");
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-6);
    assert!((v[0] - 0.6).abs() < 1e-6 && (v[1] - 0.8).abs() < 1e-6);
}

#[test]
fn zero_dimension_index_is_rejected() {
    assert!(FlatIndex::new(0).is_err());
}

#[test]
fn l2_normalize_rejects_zero_norm() {
    let mut v = vec![0.0f32; 8];
    assert!(l2_normalize(&mut v).is_err());
}
