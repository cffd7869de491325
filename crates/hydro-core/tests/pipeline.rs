//! End-to-end pipeline tests
//!
//! Exercise the full ingest and retrieve flows against the in-memory
//! backend: split, transform, persist, dehydrate, hydrate, undo the
//! transforms in reverse order, merge.

use hydro_core::storage::{ChunkStore, FileStore};
use hydro_core::{
    compress_chunk, decompress_chunk, decrypt_chunk, encrypt_chunk, merge_file, sign_chunk,
    verify_chunk_with_keyring, Chunk, ChunkedFile, CompressionAlgorithm, CoreError,
    EncryptionAlgorithm, FileStatus, Hydrator, Splitter, SplitterConfig,
};
use hydro_crypto::{CipherKey, Keyring, SigningKeyPair};
use hydro_store::MemoryStore;
use uuid::Uuid;

fn split(data: &[u8], chunk_size: usize) -> ChunkedFile {
    Splitter::with_config(SplitterConfig::with_chunk_size(chunk_size).unwrap())
        .split("pipeline.bin", data)
}

async fn persist_chunks(store: &MemoryStore, file: &ChunkedFile) {
    for chunk in &file.chunks {
        store.save_chunk(chunk).await.unwrap();
    }
}

#[tokio::test]
async fn full_pipeline_roundtrip() {
    let data: Vec<u8> = (0..=255u8).cycle().take(50_000).collect();
    let store = MemoryStore::new();
    let keypair = SigningKeyPair::generate();
    let signer_id = Uuid::new_v4();
    let key = CipherKey::generate();
    let peer_id = Uuid::new_v4();

    let keyring = Keyring::new();
    keyring.add(signer_id, keypair.verifying_key());

    // Ingest: split, then sign -> compress -> encrypt each chunk
    let file = split(&data, 4096);
    let mut transformed = file.clone();
    transformed.chunks = file
        .chunks
        .iter()
        .map(|chunk| {
            let chunk = chunk.as_completed().unwrap();
            let signed = sign_chunk(chunk, &keypair, signer_id).unwrap();
            let compressed = compress_chunk(&signed, CompressionAlgorithm::Gzip).unwrap();
            let encrypted =
                encrypt_chunk(&compressed, &key, peer_id, EncryptionAlgorithm::Aes256Gcm).unwrap();
            Chunk::from(encrypted)
        })
        .collect();

    persist_chunks(&store, &transformed).await;
    store.save_file(&transformed.dehydrate()).await.unwrap();

    // Retrieve: hydrate, then decrypt -> decompress -> verify, then merge
    let dry = store.get_file(file.id).await.unwrap();
    assert_eq!(dry.status, FileStatus::Dry);

    let hydrated = Hydrator::new(&store).hydrate(&dry).await.unwrap();
    assert_eq!(hydrated.status, FileStatus::Hydrated);

    let mut restored = hydrated.clone();
    restored.chunks = hydrated
        .chunks
        .iter()
        .map(|chunk| {
            let chunk = chunk.as_completed().unwrap();
            let decrypted = decrypt_chunk(chunk, &key).unwrap();
            let decompressed = decompress_chunk(&decrypted).unwrap();
            assert!(verify_chunk_with_keyring(&decompressed, &keyring).unwrap());
            Chunk::from(decompressed)
        })
        .collect();

    let merged = merge_file(&restored).unwrap();
    assert_eq!(merged.data.as_ref(), data.as_slice());
    assert_eq!(merged.filename, "pipeline.bin");
}

#[tokio::test]
async fn hydration_classifies_missing_chunk_as_partial() {
    let store = MemoryStore::new();
    let file = split(&[1u8; 1024], 256);
    persist_chunks(&store, &file).await;

    let missing_id = file.chunks[2].id();
    store.delete_chunk(missing_id).await.unwrap();

    let hydrated = Hydrator::new(&store).hydrate(&file.dehydrate()).await.unwrap();
    assert_eq!(hydrated.status, FileStatus::Partial);
    assert_eq!(hydrated.chunks[2], Chunk::Dry(missing_id));

    // A partial file must never merge
    let err = merge_file(&hydrated).unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));
}

#[test]
fn merge_guard_rejects_dry_file() {
    let dry = split(&[1u8; 1024], 256).dehydrate();
    assert!(matches!(
        merge_file(&dry).unwrap_err(),
        CoreError::Validation(_)
    ));
}

#[test]
fn split_1024_bytes_into_four_256_byte_chunks() {
    let file = split(&[0u8; 1024], 256);
    assert_eq!(file.chunks.len(), 4);
    assert!(file
        .chunks
        .iter()
        .all(|c| c.as_completed().unwrap().size == 256));
}

#[test]
fn zero_byte_input_produces_no_chunks() {
    let file = split(&[], 256);
    assert_eq!(file.chunks.len(), 0);
    assert_eq!(file.status, FileStatus::Hydrated);
}

#[test]
fn input_smaller_than_chunk_size_yields_single_chunk() {
    let file = split(&[0u8; 128], 256);
    assert_eq!(file.chunks.len(), 1);
    assert_eq!(file.chunks[0].as_completed().unwrap().size, 128);
}

#[test]
fn gzip_roundtrip_preserves_merged_bytes() {
    let data: Vec<u8> = (0..2048u32).map(|i| (i % 251) as u8).collect();
    let file = split(&data, 512);

    let restored: Vec<Chunk> = file
        .chunks
        .iter()
        .map(|c| {
            let compressed =
                compress_chunk(c.as_completed().unwrap(), CompressionAlgorithm::Gzip).unwrap();
            Chunk::from(decompress_chunk(&compressed).unwrap())
        })
        .collect();

    let mut file = file;
    file.chunks = restored;
    assert_eq!(merge_file(&file).unwrap().data.as_ref(), data.as_slice());
}

#[test]
fn cross_key_verification_fails() {
    let keypair_a = SigningKeyPair::generate();
    let keypair_b = SigningKeyPair::generate();
    let file = split(b"sign me", 256);

    let signed = sign_chunk(
        file.chunks[0].as_completed().unwrap(),
        &keypair_a,
        Uuid::new_v4(),
    )
    .unwrap();

    assert!(hydro_core::verify_chunk(&signed, &keypair_a.verifying_key()).unwrap());
    assert!(!hydro_core::verify_chunk(&signed, &keypair_b.verifying_key()).unwrap());
}
