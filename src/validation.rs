/// Validation tests across the whole codec.
///
/// These tests verify:
/// 1. **Round-trip correctness** for every decode strategy and the container
/// 2. **Canonical properties** - prefix-free codes, ordering within a length
/// 3. **Header invariants** - size and layout for real inputs
/// 4. **Corruption handling** - truncated headers, flipped payload bits
/// 5. **Edge cases** - single symbol, all 256 byte values, skewed inputs
#[cfg(test)]
mod tests {
    use crate::alphabet::Alphabet;
    use crate::canonical;
    use crate::codec::{self, CodecOptions, DecodeStrategy, EncodedMessage};
    use crate::container;
    use crate::frequency;
    use crate::tree;
    use crate::{BitBuffer, HuffError};

    // ---------------------------------------------------------------
    // Helper: generate diverse test vectors
    // ---------------------------------------------------------------

    const KNOWN_VECTOR: &[u8] = b"aabbccddbbeaebdddfffdbffddabbbbbcdefaabbcccccaabbddfffdcecc";

    fn data_all_zeros(n: usize) -> Vec<u8> {
        vec![0u8; n]
    }

    /// Every byte value once (uniform distribution, 8 bits entropy).
    fn data_uniform() -> Vec<u8> {
        (0..=255u8).collect()
    }

    /// 90% one byte, 10% another.
    fn data_skewed(n: usize) -> Vec<u8> {
        (0..n).map(|i| if i % 10 == 0 { 1 } else { 0 }).collect()
    }

    fn data_repeating_text() -> Vec<u8> {
        b"the quick brown fox jumps over the lazy dog. ".repeat(100)
    }

    fn data_sawtooth(n: usize) -> Vec<u8> {
        (0..n).map(|i| (i % 256) as u8).collect()
    }

    /// Fibonacci-weighted symbols produce the deepest possible trees.
    fn data_fibonacci(symbols: usize) -> Vec<u8> {
        let (mut a, mut b) = (1usize, 1usize);
        let mut v = Vec::new();
        for s in 0..symbols {
            v.extend(std::iter::repeat(s as u8).take(a));
            let next = a + b;
            a = b;
            b = next;
        }
        v
    }

    fn all_options() -> Vec<CodecOptions> {
        let mut options: Vec<CodecOptions> = [
            DecodeStrategy::Auto,
            DecodeStrategy::Array,
            DecodeStrategy::Tree,
            DecodeStrategy::Linear,
        ]
        .into_iter()
        .map(|decode_strategy| CodecOptions {
            decode_strategy,
            ..CodecOptions::default()
        })
        .collect();
        options.push(CodecOptions {
            presize_payload: false,
            max_array_bits: 0,
            ..CodecOptions::default()
        });
        options
    }

    // ---------------------------------------------------------------
    // 1. Round-trip validation
    // ---------------------------------------------------------------

    macro_rules! round_trip_test {
        ($name:ident, $data:expr) => {
            mod $name {
                use super::*;

                #[test]
                fn every_strategy() {
                    let input: Vec<u8> = $data;
                    for options in all_options() {
                        let encoded = codec::encode_with_options(&input, &options).unwrap();
                        let decoded = codec::decode_with_options(&encoded, &options).unwrap();
                        assert_eq!(decoded, input, "round-trip failed with {:?}", options);
                    }
                }

                #[test]
                fn container() {
                    let input: Vec<u8> = $data;
                    let framed = container::compress(&input).unwrap();
                    assert_eq!(container::decompress(&framed).unwrap(), input);
                }

                #[test]
                fn header_size() {
                    let input: Vec<u8> = $data;
                    let encoded = codec::encode(&input).unwrap();
                    if input.is_empty() {
                        assert!(encoded.is_empty());
                        return;
                    }
                    let header = encoded.header.as_bytes();
                    let distinct = frequency::get_frequency(&input).used as usize;
                    assert_eq!(header.len(), 1 + header[0] as usize + distinct);
                }
            }
        };
    }

    round_trip_test!(empty, Vec::new());
    round_trip_test!(single_byte, vec![42]);
    round_trip_test!(known_vector, KNOWN_VECTOR.to_vec());
    round_trip_test!(all_zeros, data_all_zeros(1000));
    round_trip_test!(uniform, data_uniform());
    round_trip_test!(skewed, data_skewed(5000));
    round_trip_test!(repeating_text, data_repeating_text());
    round_trip_test!(sawtooth, data_sawtooth(4096));
    round_trip_test!(fibonacci, data_fibonacci(20));

    // ---------------------------------------------------------------
    // 2. Canonical properties
    // ---------------------------------------------------------------

    fn canonical_alphabet(input: &[u8]) -> Alphabet {
        let mut alphabet = Alphabet::from_bytes(input).unwrap();
        tree::generate_codes(&mut alphabet).unwrap();
        canonical::canonicalize(&mut alphabet).unwrap();
        alphabet
    }

    fn assert_canonical(alphabet: &Alphabet) {
        let entries = alphabet.entries();
        for (i, a) in entries.iter().enumerate() {
            for (j, b) in entries.iter().enumerate() {
                if i == j {
                    continue;
                }
                assert!(
                    !a.code.is_prefix_of(&b.code),
                    "{} is a prefix of {}",
                    a.code,
                    b.code
                );
                if a.code.len() == b.code.len() && a.symbol < b.symbol {
                    assert!(
                        a.code.to_binary_string() < b.code.to_binary_string(),
                        "{:#04x}={} should sort before {:#04x}={}",
                        a.symbol,
                        a.code,
                        b.symbol,
                        b.code
                    );
                }
            }
        }
    }

    #[test]
    fn canonical_codes_are_prefix_free_and_ordered() {
        for input in [
            KNOWN_VECTOR.to_vec(),
            data_uniform(),
            data_repeating_text(),
            data_fibonacci(12),
            data_skewed(777),
        ] {
            assert_canonical(&canonical_alphabet(&input));
        }
    }

    #[test]
    fn canonical_preserves_code_lengths() {
        let mut alphabet = Alphabet::from_bytes(&data_repeating_text()).unwrap();
        tree::generate_codes(&mut alphabet).unwrap();
        let mut lengths: Vec<(u8, usize)> =
            alphabet.iter().map(|e| (e.symbol, e.code.len())).collect();
        canonical::canonicalize(&mut alphabet).unwrap();
        let mut after: Vec<(u8, usize)> =
            alphabet.iter().map(|e| (e.symbol, e.code.len())).collect();
        lengths.sort();
        after.sort();
        assert_eq!(lengths, after);
    }

    #[test]
    fn deep_tree_uses_trie_decoder() {
        // 40 Fibonacci-weighted symbols need codes longer than the
        // default array limit.
        let mut alphabet = Alphabet::new();
        let mut freq = frequency::FrequencyTable::new();
        let (mut a, mut b) = (1u64, 1u64);
        for s in 0..40usize {
            freq.byte[s] = a;
            let next = a + b;
            a = b;
            b = next;
        }
        freq.used = 40;
        freq.total = freq.byte.iter().sum();
        alphabet.populate_from_frequencies(&freq).unwrap();
        tree::generate_codes(&mut alphabet).unwrap();
        canonical::canonicalize(&mut alphabet).unwrap();
        assert_eq!(alphabet.max_code_len(), 39);
        assert_canonical(&alphabet);

        let options = CodecOptions::default();
        assert_eq!(options.resolve_strategy(39), DecodeStrategy::Tree);

        let header = canonical::serialize_header(&alphabet).unwrap();
        let message_symbols: Vec<u8> = (0..40u8).rev().collect();
        let payload = codec::encode_payload(&message_symbols, &alphabet, &options).unwrap();
        let message = EncodedMessage { header, payload };
        for strategy in [DecodeStrategy::Auto, DecodeStrategy::Tree, DecodeStrategy::Linear] {
            let options = CodecOptions {
                decode_strategy: strategy,
                ..CodecOptions::default()
            };
            assert_eq!(
                codec::decode_with_options(&message, &options).unwrap(),
                message_symbols
            );
        }
    }

    // ---------------------------------------------------------------
    // 3. Corruption handling
    // ---------------------------------------------------------------

    #[test]
    fn truncated_header_is_rejected() {
        let encoded = codec::encode(KNOWN_VECTOR).unwrap();
        let bytes = encoded.header.as_bytes();
        for cut in 1..bytes.len() {
            let message = EncodedMessage {
                header: BitBuffer::from_byte_vec(bytes[..cut].to_vec()),
                payload: encoded.payload.clone(),
            };
            let err = codec::decode(&message).unwrap_err();
            assert!(
                matches!(err, HuffError::HeaderTruncated { .. } | HuffError::CorruptHeader),
                "cut at {}: {:?}",
                cut,
                err
            );
        }
    }

    #[test]
    fn flipped_payload_bits_never_panic() {
        let input = data_repeating_text();
        let encoded = codec::encode(&input).unwrap();
        for options in all_options() {
            for flip in (0..encoded.payload.len()).step_by(97) {
                let payload: BitBuffer = encoded
                    .payload
                    .iter()
                    .enumerate()
                    .map(|(i, bit)| if i == flip { !bit } else { bit })
                    .collect();
                let message = EncodedMessage {
                    header: encoded.header.clone(),
                    payload,
                };
                match codec::decode_with_options(&message, &options) {
                    Ok(decoded) => assert_ne!(decoded, input),
                    Err(err) => assert_eq!(err, HuffError::CorruptHeader),
                }
            }
        }
    }

    #[test]
    fn unreachable_code_is_corrupt() {
        // A single-symbol code is "0"; any 1 bit cannot be resolved.
        let encoded = codec::encode(b"zzzz").unwrap();
        let message = EncodedMessage {
            header: encoded.header.clone(),
            payload: [false, true, false].into_iter().collect(),
        };
        for options in all_options() {
            assert_eq!(
                codec::decode_with_options(&message, &options),
                Err(HuffError::CorruptHeader)
            );
        }
    }

    #[test]
    fn alphabet_build_is_guarded() {
        let mut alphabet = Alphabet::new();
        alphabet.populate(KNOWN_VECTOR).unwrap();
        assert_eq!(
            alphabet.populate(KNOWN_VECTOR),
            Err(HuffError::AlphabetAlreadyPopulated)
        );
    }

    #[test]
    fn compression_ratio_on_skewed_data() {
        let mut input = vec![b'a'; 1000];
        input.extend(vec![b'b'; 10]);
        input.extend(vec![b'c'; 5]);
        let encoded = codec::encode(&input).unwrap();
        assert!(
            encoded.compressed_len() < input.len() / 4,
            "compressed {} bytes, input {} bytes",
            encoded.compressed_len(),
            input.len()
        );
    }
}
