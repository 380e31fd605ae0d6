use textspan::{read_text_async, OwnershipPolicy, ReaderConfig, TextReader};

#[path = "integration/mod.rs"]
mod test_utils;
use test_utils::{collect_bytes, fixtures, strings, TestFixture};

#[tokio::test]
async fn test_mapped_and_heap_loads_agree() {
    let fixture = TestFixture::new();
    let path = fixture.create_file("headers.txt", fixtures::HEADERS);

    let heap = read_text_async(&path).await.expect("heap load");
    let mapped_reader = TextReader::new(ReaderConfig { use_mmap: true, ..Default::default() });
    let (mapped, stats) = mapped_reader.load(&path).await.expect("mapped load");

    assert_eq!(heap.policy(), OwnershipPolicy::OwnedDefault);
    assert_eq!(mapped.policy(), OwnershipPolicy::Mapped);
    assert!(heap.equals(&mapped));
    assert_eq!(stats.bytes_read, fixtures::HEADERS.len() as u64);

    assert_eq!(
        collect_bytes(mapped.lines(false)),
        strings(fixtures::HEADERS_LINES)
    );
}

#[tokio::test]
async fn test_loaded_buffer_outlives_file() {
    let fixture = TestFixture::new();
    let path = fixture.create_file("gone.txt", b"still here");

    let reader = TextReader::new(ReaderConfig { use_mmap: true, ..Default::default() });
    let (text, _) = reader.load(&path).await.unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(text.as_bytes(), b"still here");
}
