//! End-to-end behaviour of the header pipeline on fixed inputs.

use haagenti_fse::{
    compress_header, read_normalized_counts, Error, FseConfig, FseContext, Normalization,
    MAX_TABLE_LOG, MIN_TABLE_LOG,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Table slots used by a distribution, counting `-1` as one.
fn slot_sum(norm: &[i16]) -> u32 {
    norm.iter().map(|&n| n.unsigned_abs() as u32).sum()
}

fn assert_well_formed(ctx: &FseContext) {
    let table_log = ctx.actual_table_log();
    assert!((MIN_TABLE_LOG..=MAX_TABLE_LOG).contains(&table_log));
    assert_eq!(slot_sum(ctx.norm()), 1 << table_log);
    for (symbol, (&count, &norm)) in ctx.counts().iter().zip(ctx.norm()).enumerate() {
        assert_eq!(count == 0, norm == 0, "symbol {}", symbol);
    }
}

fn english_text(len: usize) -> Vec<u8> {
    b"It was the best of times, it was the worst of times, it was the age of wisdom. "
        .iter()
        .copied()
        .cycle()
        .take(len)
        .collect()
}

/// 200 singletons, then 56 heavy symbols of near-equal weight.
fn skewed_wide_input() -> Vec<u8> {
    let mut input: Vec<u8> = (0..200u8).collect();
    for symbol in 200..=255u8 {
        let repeat = if symbol < 240 { 711 } else { 710 };
        input.extend(std::iter::repeat(symbol).take(repeat));
    }
    input
}

#[test]
fn test_distribution_sums_to_table_size() {
    let inputs = [
        english_text(50),
        english_text(1000),
        english_text(100_000),
        b"aaaabbbccd".to_vec(),
        (0..5000u32).map(|i| (i * i % 61) as u8).collect(),
    ];
    let mut ctx = FseContext::default();
    for input in &inputs {
        assert!(ctx.compress(input).unwrap().is_some());
        assert_well_formed(&ctx);
    }
}

#[test]
fn test_tiny_inputs_are_not_errors() {
    for input in [&[][..], &[0u8][..], &[0xFF][..]] {
        assert!(compress_header(input, FseConfig::default())
            .unwrap()
            .is_none());
    }
}

#[test]
fn test_repeated_byte_is_detected() {
    let input = vec![0x41u8; 300];
    let mut ctx = FseContext::default();
    ctx.prepare(input.len()).unwrap();
    let histogram = ctx.count_simple(&input);

    assert_eq!(histogram.max_count, input.len());
    assert_eq!(histogram.distinct, 1);
    assert_eq!(histogram.symbol_len, 0x42);
    assert!(histogram.is_single_symbol(input.len()));
}

#[test]
fn test_uniform_bytes_are_incompressible() {
    // Every byte value 3 or 4 times, shuffled: the top count stays below
    // 1000 / 128.
    let mut input: Vec<u8> = (0..1000u32).map(|i| i as u8).collect();
    input.shuffle(&mut StdRng::seed_from_u64(0x5EED));

    let mut ctx = FseContext::default();
    assert!(ctx.compress(&input).unwrap().is_none());
    assert_eq!(ctx.symbol_len(), 256);
}

#[test]
fn test_dominant_symbol_with_rare_neighbours() {
    let mut input = vec![b'a'; 9991];
    input.extend_from_slice(b"012345678");
    assert_eq!(input.len(), 10_000);

    let mut ctx = FseContext::default();
    assert!(ctx.compress(&input).unwrap().is_some());
    assert_well_formed(&ctx);
    assert_eq!(ctx.actual_table_log(), MAX_TABLE_LOG);
    for &symbol in b"012345678" {
        assert_eq!(ctx.norm()[symbol as usize], -1);
    }
}

#[test]
fn test_skewed_input_routes_through_fallback() {
    let input = skewed_wide_input();
    assert_eq!(input.len(), 40_000);

    let mut ctx = FseContext::default();
    let header = ctx.compress(&input).unwrap().unwrap().to_vec();
    assert_eq!(ctx.normalization(), Some(Normalization::Fallback));
    assert_well_formed(&ctx);
    assert!(ctx.norm()[..200].iter().all(|&n| n == -1));

    let (decoded, _) = read_normalized_counts(&header, 255).unwrap();
    assert_eq!(decoded.norm, ctx.norm());
}

#[test]
fn test_header_roundtrip_fixture() {
    let config = FseConfig::new().with_table_log(6);
    let mut ctx = FseContext::new(config);
    let header = ctx.compress(b"aaaabbbccd").unwrap().unwrap().to_vec();

    // The 101-symbol range forces the table log up from the requested 6.
    assert_eq!(ctx.actual_table_log(), 9);
    assert_eq!(ctx.symbol_len(), b'd' as usize + 1);
    assert_well_formed(&ctx);

    let (decoded, consumed) = read_normalized_counts(&header, 255).unwrap();
    assert_eq!(consumed, header.len());
    assert_eq!(decoded.table_log, 9);
    assert_eq!(decoded.norm, ctx.norm());
    assert_eq!(decoded.table_size(), 512);
}

#[test]
fn test_reuse_after_unrelated_call_is_idempotent() {
    let input = english_text(4096);
    let expected = compress_header(&input, FseConfig::default())
        .unwrap()
        .unwrap();

    let mut ctx = FseContext::default();
    let unrelated: Vec<u8> = (0..20_000u32).map(|i| (i % 97 + i % 13) as u8).collect();
    assert!(ctx.compress(&unrelated).unwrap().is_some());

    let first = ctx.compress(&input).unwrap().unwrap().to_vec();
    let second = ctx.compress(&input).unwrap().unwrap().to_vec();
    assert_eq!(first, expected);
    assert_eq!(second, expected);
}

#[test]
fn test_reuse_after_early_exit() {
    let input = b"abracadabra".repeat(30);
    let expected = compress_header(&input, FseConfig::default()).unwrap();

    let mut ctx = FseContext::default();
    let all_distinct: Vec<u8> = (0..=255).collect();
    assert!(ctx.compress(&all_distinct).unwrap().is_none());
    assert_eq!(ctx.compress(&input).unwrap().map(<[u8]>::to_vec), expected);
}

#[test]
fn test_errors_surface_to_caller() {
    let config = FseConfig::new().with_max_symbol_value(b'c');
    let err = compress_header(b"abcdabcdabcd", config).unwrap_err();
    assert!(matches!(err, Error::SymbolOutOfRange { symbol, .. } if symbol == b'd' as usize));
    assert!(!err.is_recoverable());
}
