#![cfg(any(feature = "zlib", feature = "zlib-static"))]

mod common;

use common::sample;
use compu_stream::oneshot::{self, Mode};
use compu_stream::{Collector, Engine, Error, Flush, Interface, StreamOptions, ZlibMode, ZlibOptions, ZlibStrategy};

const PAIRS: [(Mode, Mode); 5] = [
    (Mode::Deflate, Mode::Inflate),
    (Mode::Gzip, Mode::Gunzip),
    (Mode::DeflateRaw, Mode::InflateRaw),
    (Mode::Deflate, Mode::Unzip),
    (Mode::Gzip, Mode::Unzip),
];

fn stream(mode: ZlibMode, options: &ZlibOptions, data: &[u8], split: usize, chunk_size: usize) -> Vec<u8> {
    let handle = Interface::zlib(mode, options).expect("to create handle");
    let mut engine = Engine::new(handle, Collector::new(), StreamOptions::new().chunk_size(chunk_size));

    for chunk in data.chunks(split) {
        engine.write(chunk.to_vec(), None).expect("to write");
    }
    engine.end(None).expect("to end");
    engine.run();

    assert_eq!(engine.error(), None);
    assert!(engine.is_finished());
    assert!(engine.sink().is_ended());
    assert_eq!(engine.bytes_written(), data.len() as u64);
    engine.into_sink().into_bytes().to_vec()
}

#[test]
fn should_round_trip_all_modes() {
    for len in [0, 1, 100, 70_000] {
        let data = sample(len);
        for (idx, (compress, decompress)) in PAIRS.iter().enumerate() {
            println!("{idx}: len={len}");

            let compressed = oneshot::convert_sync(*compress, &data).expect("to compress");
            let decompressed = oneshot::convert_sync(*decompress, &compressed).expect("to decompress");
            assert_eq!(decompressed, data);

            let compressed = oneshot::convert(*compress, data.clone()).expect("to compress");
            let decompressed = oneshot::convert(*decompress, compressed).expect("to decompress");
            assert_eq!(decompressed, data);
        }
    }
}

#[test]
fn should_not_depend_on_input_chunking() {
    let data = sample(5_000);
    let options = ZlibOptions::new();

    let whole = stream(ZlibMode::Gzip, &options, &data, data.len(), 16 * 1024);
    let bytewise = stream(ZlibMode::Gzip, &options, &data, 1, 64);
    assert_eq!(whole, bytewise);
    assert_eq!(oneshot::convert_sync(Mode::Gunzip, &whole).expect("to decompress"), data);
    assert_eq!(oneshot::convert_sync(Mode::Gunzip, &bytewise).expect("to decompress"), data);

    let decompressed = stream(ZlibMode::Gunzip, &options, &whole, 1, 64);
    assert_eq!(decompressed, data);
    let decompressed = stream(ZlibMode::Gunzip, &options, &bytewise, 7, 64);
    assert_eq!(decompressed, data);
}

#[test]
fn should_produce_same_bytes_sync_and_async() {
    let data = sample(70_000);

    for (mode, zlib_mode) in [(Mode::Deflate, ZlibMode::Deflate), (Mode::Gzip, ZlibMode::Gzip), (Mode::DeflateRaw, ZlibMode::DeflateRaw)] {
        println!("{:?}", mode);
        let sync = oneshot::convert_sync(mode, &data).expect("to compress");
        let not_sync = oneshot::convert(mode, data.clone()).expect("to compress");
        assert_eq!(sync, not_sync);

        let bytewise = stream(zlib_mode, &ZlibOptions::new(), &data, 1, 64);
        assert_eq!(sync, bytewise);
    }
}

#[test]
fn should_accept_smallest_window_in_every_mode() {
    let data = sample(5_000);
    let options = ZlibOptions::new().window_bits(8);

    for (compress, decompress) in [(ZlibMode::Deflate, Mode::Inflate), (ZlibMode::Gzip, Mode::Gunzip), (ZlibMode::DeflateRaw, Mode::InflateRaw)] {
        println!("{:?}", compress);
        let handle = Interface::zlib(compress, &options).expect("to create handle");
        let compressed = oneshot::convert_sync_with(handle, &data, StreamOptions::new()).expect("to compress");
        let decompressed = oneshot::convert_sync(decompress, &compressed).expect("to decompress");
        assert_eq!(decompressed, data);
    }

    for mode in [ZlibMode::Inflate, ZlibMode::Gunzip, ZlibMode::InflateRaw, ZlibMode::Unzip] {
        assert!(Interface::zlib(mode, &options).is_ok());
    }
}

#[test]
fn should_deliver_output_in_bounded_segments() {
    let data = vec![b'z'; 100_000];
    let compressed = oneshot::convert_sync(Mode::Deflate, &data).expect("to compress");

    let handle = Interface::zlib(ZlibMode::Inflate, &ZlibOptions::new()).expect("to create handle");
    let mut engine = Engine::new(handle, Collector::new(), StreamOptions::new().chunk_size(1024));
    engine.write(compressed, None).expect("to write");
    engine.end(None).expect("to end");
    engine.run();

    let segments = engine.sink().segments();
    assert!(segments.len() >= 90);
    assert!(segments.iter().all(|segment| segment.len() <= 1024));
    assert_eq!(engine.into_sink().into_bytes(), data);
}

#[test]
fn should_resume_inflate_under_backpressure() {
    let data = sample(50_000);
    let compressed = oneshot::convert_sync(Mode::Deflate, &data).expect("to compress");

    let handle = Interface::zlib(ZlibMode::Inflate, &ZlibOptions::new()).expect("to create handle");
    let sink = Collector::new().high_water_mark(4096);
    let mut engine = Engine::new(handle, sink, StreamOptions::new().chunk_size(1024));
    engine.write(compressed, None).expect("to write");
    engine.end(None).expect("to end");

    let mut decompressed = Vec::new();
    let mut pauses = 0;
    loop {
        engine.run();
        for segment in engine.sink_mut().take() {
            decompressed.extend_from_slice(&segment);
        }
        if engine.is_finished() {
            break;
        }
        pauses += 1;
        engine.resume();
    }

    assert!(pauses >= 10);
    assert_eq!(decompressed, data);
}

#[test]
fn should_limit_output_length() {
    let data = vec![0u8; 10_000];
    let compressed = oneshot::convert_sync(Mode::Deflate, &data).expect("to compress");
    let options = StreamOptions::new().max_output_length(1000).chunk_size(256);

    let handle = Interface::zlib(ZlibMode::Inflate, &ZlibOptions::new()).expect("to create handle");
    let result = oneshot::convert_sync_with(handle, &compressed, options);
    assert_eq!(result, Err(Error::OutputTooLarge { max: 1000 }));

    let handle = Interface::zlib(ZlibMode::Inflate, &ZlibOptions::new()).expect("to create handle");
    let result = oneshot::convert_with(handle, compressed, options);
    assert_eq!(result, Err(Error::OutputTooLarge { max: 1000 }));
}

#[test]
fn should_decode_concatenated_gzip_members() {
    let first = oneshot::convert_sync(Mode::Gzip, b"first member, ").expect("to compress");
    let second = oneshot::convert_sync(Mode::Gzip, b"second member").expect("to compress");

    let mut joined = first.to_vec();
    joined.extend_from_slice(&second);
    let decompressed = oneshot::convert_sync(Mode::Gunzip, &joined).expect("to decompress");
    assert_eq!(decompressed, &b"first member, second member"[..]);

    let decompressed = stream(ZlibMode::Gunzip, &ZlibOptions::new(), &joined, 5, 64);
    assert_eq!(decompressed, b"first member, second member");

    let mut padded = first.to_vec();
    padded.extend_from_slice(&[0u8; 16]);
    let decompressed = oneshot::convert_sync(Mode::Gunzip, &padded).expect("to decompress");
    assert_eq!(decompressed, &b"first member, "[..]);
}

#[test]
fn should_fail_on_truncated_input() {
    let data = sample(10_000);
    let compressed = oneshot::convert_sync(Mode::Gzip, &data).expect("to compress");
    let truncated = &compressed[..compressed.len() / 2];

    match oneshot::convert_sync(Mode::Gunzip, truncated) {
        Err(Error::Codec(error)) => {
            assert_eq!(error.code, "Z_BUF_ERROR");
            assert_eq!(error.message, "unexpected end of file");
        },
        other => panic!("Unexpected result: {:?}", other),
    }

    match oneshot::convert(Mode::Gunzip, truncated.to_vec()) {
        Err(Error::Codec(error)) => assert_eq!(error.message, "unexpected end of file"),
        other => panic!("Unexpected result: {:?}", other),
    }
}

#[test]
fn should_fail_on_corrupted_input() {
    let handle = Interface::zlib(ZlibMode::Inflate, &ZlibOptions::new()).expect("to create handle");
    let mut engine = Engine::new(handle, Collector::new(), StreamOptions::new());
    let errors = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    {
        let errors = errors.clone();
        engine.set_error_handler(move |error| errors.borrow_mut().push(*error));
    }

    engine.write(&b"definitely not a zlib stream"[..], None).expect("to write");
    engine.run();

    match engine.error() {
        Some(Error::Codec(error)) => assert_eq!(error.code, "Z_DATA_ERROR"),
        other => panic!("Unexpected error: {:?}", other),
    }
    assert_eq!(errors.borrow().len(), 1);
    assert!(engine.is_destroyed());
    assert!(engine.is_closed());
    assert!(!engine.sink().is_ended());
}

#[test]
fn should_use_preset_dictionary() {
    let dictionary = b"Alice was beginning to get very tired".to_vec();
    let data = sample(2_000);
    let options = ZlibOptions::new().dictionary(dictionary.clone());

    for (compress, decompress) in [(ZlibMode::Deflate, ZlibMode::Inflate), (ZlibMode::DeflateRaw, ZlibMode::InflateRaw), (ZlibMode::Deflate, ZlibMode::Unzip)] {
        let handle = Interface::zlib(compress, &options).expect("to create handle");
        let compressed = oneshot::convert_sync_with(handle, &data, StreamOptions::new()).expect("to compress");

        let handle = Interface::zlib(decompress, &options).expect("to create handle");
        let decompressed = oneshot::convert_sync_with(handle, &compressed, StreamOptions::new()).expect("to decompress");
        assert_eq!(decompressed, data);
    }

    let handle = Interface::zlib(ZlibMode::Deflate, &options).expect("to create handle");
    let compressed = oneshot::convert_sync_with(handle, &data, StreamOptions::new()).expect("to compress");

    match oneshot::convert_sync(Mode::Inflate, &compressed) {
        Err(Error::Codec(error)) => {
            assert_eq!(error.code, "Z_NEED_DICT");
            assert_eq!(error.message, "Missing dictionary");
        },
        other => panic!("Unexpected result: {:?}", other),
    }

    let wrong = ZlibOptions::new().dictionary(&b"something else entirely"[..]);
    let handle = Interface::zlib(ZlibMode::Inflate, &wrong).expect("to create handle");
    match oneshot::convert_sync_with(handle, &compressed, StreamOptions::new()) {
        Err(Error::Codec(error)) => {
            assert_eq!(error.code, "Z_NEED_DICT");
            assert_eq!(error.message, "Bad dictionary");
        },
        other => panic!("Unexpected result: {:?}", other),
    }
}

#[test]
fn should_emit_decodable_prefix_on_sync_flush() {
    let data = sample(3_000);
    let handle = Interface::zlib(ZlibMode::Deflate, &ZlibOptions::new()).expect("to create handle");
    let mut engine = Engine::new(handle, Collector::new(), StreamOptions::new());

    engine.write(data.clone(), None).expect("to write");
    engine.flush(Some(Flush::Sync), None).expect("to flush");
    engine.run();
    assert!(!engine.is_finished());

    let prefix = engine.sink_mut().take().concat();
    let handle = Interface::zlib(ZlibMode::Inflate, &ZlibOptions::new()).expect("to create handle");
    let mut inflater = Engine::new(handle, Collector::new(), StreamOptions::new());
    let decompressed = inflater.drain_sync(&prefix, Flush::Sync).expect("to decompress");
    assert_eq!(decompressed, data);
}

#[test]
fn should_change_params_mid_stream() {
    let first = vec![b'a'; 20_000];
    let second = sample(20_000);
    let options = ZlibOptions::new().level(1);

    let handle = Interface::zlib(ZlibMode::Deflate, &options).expect("to create handle");
    let mut engine = Engine::new(handle, Collector::new(), StreamOptions::new());
    assert_eq!(engine.params().map(|params| params.level), Some(1));

    let applied = std::rc::Rc::new(std::cell::Cell::new(false));
    let callback = {
        let applied = applied.clone();
        Box::new(move |result: Result<(), Error>| {
            assert_eq!(result, Ok(()));
            applied.set(true);
        })
    };

    engine.write(first.clone(), None).expect("to write");
    engine.update_params(9, ZlibStrategy::Filtered, Some(callback)).expect("to update params");
    engine.write(second.clone(), None).expect("to write");
    engine.end(None).expect("to end");
    engine.run();

    assert!(applied.get());
    assert!(engine.is_finished());
    let params = engine.params().expect("to have params");
    assert_eq!(params.level, 9);
    assert_eq!(params.strategy, ZlibStrategy::Filtered);

    let compressed = engine.into_sink().into_bytes();
    let decompressed = oneshot::convert_sync(Mode::Inflate, &compressed).expect("to decompress");
    let mut expected = first;
    expected.extend_from_slice(&second);
    assert_eq!(decompressed, expected);
}

#[test]
fn should_accept_params_for_inflate() {
    let handle = Interface::zlib(ZlibMode::Inflate, &ZlibOptions::new()).expect("to create handle");
    let mut engine = Engine::new(handle, Collector::new(), StreamOptions::new());

    engine.update_params(3, ZlibStrategy::Default, None).expect("to update params");
    engine.run();
    assert_eq!(engine.params().map(|params| params.level), Some(3));
    assert_eq!(engine.error(), None);
}

#[test]
fn should_reset_handle() {
    let data = sample(1_000);
    let mut handle = Interface::zlib(ZlibMode::Gzip, &ZlibOptions::new()).expect("to create handle");

    let mut output = vec![0u8; 4096];
    let state = handle.write(Flush::None, &data[..500], &mut output).expect("to write");
    assert_eq!(state.avail_in, 0);
    assert!(handle.reset());

    let compressed = oneshot::convert_sync_with(handle, &data, StreamOptions::new()).expect("to compress");
    let decompressed = oneshot::convert_sync(Mode::Gunzip, &compressed).expect("to decompress");
    assert_eq!(decompressed, data);
}

#[test]
fn should_map_zlib_flush_values() {
    for (value, flush) in [(0, Flush::None), (1, Flush::Partial), (2, Flush::Sync), (3, Flush::Full), (4, Flush::Finish), (5, Flush::Block)] {
        assert_eq!(Flush::from_zlib(value), Some(flush));
    }
    assert_eq!(Flush::from_zlib(6), None);
}

mod props {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn round_trip_with_arbitrary_chunking(data in proptest::collection::vec(any::<u8>(), 0..8192), split in 1usize..2048, chunk_size in 64usize..4096, level in 0i8..=9) {
            let options = ZlibOptions::new().level(level);
            let compressed = stream(ZlibMode::Deflate, &options, &data, split, chunk_size);
            let decompressed = stream(ZlibMode::Inflate, &options, &compressed, split, chunk_size);
            prop_assert_eq!(decompressed, data);
        }
    }
}
