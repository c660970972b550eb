use folio::domain::Embedding;

#[test]
fn given_identical_vectors_when_computing_cosine_then_returns_one() {
    let a = Embedding::new(vec![1.0, 2.0, 3.0]);

    assert!((a.cosine_similarity(&a) - 1.0).abs() < 1e-6);
}

#[test]
fn given_orthogonal_vectors_when_computing_cosine_then_returns_zero() {
    let a = Embedding::new(vec![1.0, 0.0]);
    let b = Embedding::new(vec![0.0, 1.0]);

    assert_eq!(a.cosine_similarity(&b), 0.0);
}

#[test]
fn given_zero_vector_when_computing_cosine_then_returns_zero() {
    let a = Embedding::new(vec![0.0, 0.0]);
    let b = Embedding::new(vec![1.0, 1.0]);

    assert_eq!(a.cosine_similarity(&b), 0.0);
}

#[test]
fn given_mismatched_dimensions_when_comparing_then_never_matches() {
    let a = Embedding::new(vec![1.0, 0.0]);
    let b = Embedding::new(vec![1.0, 0.0, 0.0]);

    assert_eq!(a.cosine_similarity(&b), 0.0);
    assert_eq!(a.euclidean_distance(&b), f32::INFINITY);
}

#[test]
fn given_three_four_five_triangle_when_computing_euclidean_then_returns_five() {
    let a = Embedding::new(vec![0.0, 0.0]);
    let b = Embedding::new(vec![3.0, 4.0]);

    assert_eq!(a.euclidean_distance(&b), 5.0);
    assert_eq!(b.dimensions(), 2);
}
