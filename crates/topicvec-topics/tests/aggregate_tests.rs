use std::collections::BTreeMap;

use topicvec_core::types::Point2;
use topicvec_core::vector::l2_norm;
use topicvec_core::Error;
use topicvec_topics::aggregate;
use topicvec_topics::select::{filter_min_x, rank_topics, representative_members};

fn points(xy: &[(f64, f64)]) -> Vec<Point2> {
    xy.iter().map(|&(x, y)| Point2::new(x, y)).collect()
}

#[test]
fn position_is_coordinate_wise_median() {
    let coords = points(&[(0.0, 10.0), (1.0, 20.0), (100.0, -5.0), (2.0, 30.0)]);
    let emb = vec![vec![1.0, 0.0]; 4];
    let agg = aggregate(7, &[0, 1, 2], &coords, &emb).expect("aggregate");
    assert_eq!(agg.position, Point2::new(1.0, 10.0));
    assert_eq!(agg.size, 3);

    let even = aggregate(7, &[0, 1, 2, 3], &coords, &emb).expect("aggregate");
    assert_eq!(even.position, Point2::new(1.5, 15.0));
}

#[test]
fn vector_is_unit_mean_direction() {
    let coords = points(&[(0.0, 0.0); 3]);
    let emb = vec![vec![3.0, 0.0, 0.0], vec![0.0, 4.0, 0.0], vec![3.0, 4.0, 0.0]];
    let agg = aggregate(1, &[0, 1, 2], &coords, &emb).expect("aggregate");
    // mean (2, 8/3, 0) has norm 10/3
    assert!((l2_norm(&agg.vector) - 1.0).abs() < 1e-12);
    assert!((agg.vector[0] - 0.6).abs() < 1e-12);
    assert!((agg.vector[1] - 0.8).abs() < 1e-12);
    assert_eq!(agg.vector[2], 0.0);
}

#[test]
fn opposite_members_are_degenerate() {
    let coords = points(&[(0.0, 0.0), (1.0, 1.0)]);
    let emb = vec![vec![1.0, -2.0], vec![-1.0, 2.0]];
    let err = aggregate(4, &[0, 1], &coords, &emb).unwrap_err();
    assert!(matches!(err, Error::DegenerateVector(ref label) if label.contains('4')));
}

#[test]
fn single_member_passes_through() {
    let coords = points(&[(5.0, -2.5)]);
    let emb = vec![vec![0.0, 2.0, 0.0]];
    let agg = aggregate(0, &[0], &coords, &emb).expect("aggregate");
    assert_eq!(agg.position, Point2::new(5.0, -2.5));
    assert_eq!(agg.vector, vec![0.0, 1.0, 0.0]);
}

#[test]
fn empty_and_out_of_range_members_are_rejected() {
    let coords = points(&[(0.0, 0.0)]);
    let emb = vec![vec![1.0]];
    assert!(matches!(aggregate(2, &[], &coords, &emb), Err(Error::EmptyTopic(2))));
    assert!(matches!(aggregate(2, &[0, 3], &coords, &emb), Err(Error::MalformedRecord { .. })));
}

#[test]
fn ragged_embeddings_are_a_dimension_mismatch() {
    let coords = points(&[(0.0, 0.0), (0.0, 0.0)]);
    let emb = vec![vec![1.0, 0.0], vec![1.0]];
    assert!(matches!(aggregate(0, &[0, 1], &coords, &emb), Err(Error::DimensionMismatch { expected: 2, actual: 1 })));
}

#[test]
fn rank_topics_orders_by_size_and_drops_small() {
    let mut members = BTreeMap::new();
    members.insert(0, vec![0, 1]);
    members.insert(1, vec![2, 3, 4]);
    members.insert(2, vec![5, 6, 7]);
    members.insert(3, vec![8]);
    let ranked = rank_topics(members, 2, 10);
    let ids: Vec<i64> = ranked.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, vec![1, 2, 0]);

    let mut members = BTreeMap::new();
    members.insert(5, vec![0, 1, 2]);
    members.insert(6, vec![3, 4]);
    assert_eq!(rank_topics(members, 1, 1).len(), 1);
}

#[test]
fn min_x_cut_drops_left_members() {
    let coords = points(&[(-50.0, 0.0), (-40.0, 0.0), (3.0, 1.0)]);
    assert_eq!(filter_min_x(&[0, 1, 2], &coords, -40.0), vec![1, 2]);
}

#[test]
fn representatives_are_closest_to_centroid() {
    let vectors = vec![vec![1.0, 0.0], vec![0.9, 0.1], vec![0.0, 1.0], vec![1.0, 0.05]];
    let picked = representative_members(0, &[0, 1, 2, 3], &vectors, 2).expect("representatives");
    assert_eq!(picked.len(), 2);
    assert!(!picked.contains(&2));

    let all = representative_members(0, &[0, 2], &vectors, 5).expect("representatives");
    assert_eq!(all, vec![0, 2]);
}
