use docqa_embed::fake::FakeEmbedder;
use docqa_embed::{Embedder, EMBEDDING_DIM};

#[test]
fn fake_embedder_is_deterministic() {
    let embedder = FakeEmbedder::new(EMBEDDING_DIM);
    let a = embedder.embed_batch(&["the machine learning stack".to_string()]).unwrap();
    let b = embedder.embed_batch(&["the machine learning stack".to_string()]).unwrap();
    assert_eq!(a, b);
}

#[test]
fn fake_embeddings_have_the_declared_dimension() {
    let embedder = FakeEmbedder::new(EMBEDDING_DIM);
    assert_eq!(embedder.dim(), EMBEDDING_DIM);
    let vecs = embedder
        .embed_batch(&["alpha".to_string(), "beta gamma".to_string()])
        .unwrap();
    assert_eq!(vecs.len(), 2);
    assert!(vecs.iter().all(|v| v.len() == EMBEDDING_DIM));
}

#[test]
fn fake_embeddings_are_unit_length() {
    let embedder = FakeEmbedder::new(EMBEDDING_DIM);
    let vecs = embedder
        .embed_batch(&["vector search over documentation chunks".to_string()])
        .unwrap();
    let norm: f32 = vecs[0].iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-4, "norm was {norm}");
}

#[test]
fn different_texts_embed_differently() {
    let embedder = FakeEmbedder::new(EMBEDDING_DIM);
    let vecs = embedder
        .embed_batch(&["deployment pipeline".to_string(), "team structure".to_string()])
        .unwrap();
    assert_ne!(vecs[0], vecs[1]);
}
