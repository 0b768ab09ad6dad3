#[cfg(test)]
mod tests {
    use bitframe_core::checksum::ChecksumAlg;
    use bitframe_core::protected::{
        corrupted_indices, decode_block, decode_sequence, encode_block, protect, protect_to_bytes,
        reassemble, unprotect, BlockError, ProtectedBlock,
    };
    use proptest::prelude::*;

    fn sample_payload(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i * 31 % 251) as u8).collect()
    }

// # Construction

    #[test]
    fn validates_after_construction_for_every_tag() {
        for alg in ChecksumAlg::ALL {
            let block = ProtectedBlock::new(alg, sample_payload(1000)).unwrap();
            assert!(block.validate(), "{}", alg);
            assert_eq!(block.code().len(), alg.code_len());

            let empty = ProtectedBlock::new(alg, Vec::<u8>::new()).unwrap();
            assert!(empty.validate(), "{}", alg);
        }
    }

    #[test]
    fn payload_cap_is_32k() {
        assert!(ProtectedBlock::new(ChecksumAlg::CheckSum8, vec![0u8; 32 * 1024]).is_ok());
        assert_eq!(
            ProtectedBlock::new(ChecksumAlg::CheckSum8, vec![0u8; 32 * 1024 + 1]),
            Err(BlockError::PayloadTooLarge { len: 32 * 1024 + 1, max: 32 * 1024 })
        );
    }

// # Wire form

    #[test]
    fn encode_layout() {
        let block = ProtectedBlock::new(ChecksumAlg::CheckSum8, &b"abc"[..]).unwrap();
        let wire = block.encode().unwrap();
        assert_eq!(wire, vec![0x01, 0x03, 0x00, b'a', b'b', b'c', 0x26]);
        assert_eq!(wire.len(), block.encoded_len());
        assert_eq!(block.serialize().unwrap(), wire);
        assert_eq!(block.summary(), "ProtectedBlock { alg: checksum8, len: 3, code: 0x26 }");
    }

    #[test]
    fn encode_decode_roundtrip() {
        for alg in ChecksumAlg::ALL {
            let block = ProtectedBlock::new(alg, sample_payload(300)).unwrap();
            let wire = encode_block(&block).unwrap();
            let decoded = ProtectedBlock::decode(&wire).unwrap();
            assert_eq!(decoded, block);
            assert!(decoded.validate());
        }
    }

    #[test]
    fn single_byte_flip_fails_validation() {
        for alg in ChecksumAlg::ALL.into_iter().filter(|a| *a != ChecksumAlg::None) {
            let block = ProtectedBlock::new(alg, sample_payload(257)).unwrap();
            for pos in [0usize, 1, 128, 256] {
                let mut wire = block.encode().unwrap();
                wire[3 + pos] ^= 0x01;
                let decoded = ProtectedBlock::deserialize(&wire).unwrap();
                assert!(!decoded.validate(), "{} at {}", alg, pos);
            }
        }
    }

    #[test]
    fn none_tag_never_detects() {
        let block = ProtectedBlock::new(ChecksumAlg::None, &b"data"[..]).unwrap();
        let mut wire = block.encode().unwrap();
        wire[3] ^= 0xFF;
        assert!(decode_block(&wire).unwrap().validate());
    }

    #[test]
    fn decode_rejects_malformed() {
        assert!(matches!(
            decode_block(&[0x06, 0x00]),
            Err(BlockError::Truncated { have: 2, need: 3 })
        ));
        assert!(matches!(
            decode_block(&[0x09, 0x00, 0x00]),
            Err(BlockError::UnknownAlgorithm(_))
        ));
        // claims 4 payload bytes + 4 code bytes, has 5
        assert!(matches!(
            decode_block(&[0x06, 0x04, 0x00, 1, 2, 3, 4, 5]),
            Err(BlockError::Truncated { have: 8, need: 11 })
        ));

        let mut wire = ProtectedBlock::new(ChecksumAlg::CheckSum16, &b"x"[..])
            .unwrap()
            .encode()
            .unwrap();
        wire.push(0);
        assert!(matches!(
            decode_block(&wire),
            Err(BlockError::LengthMismatch { expected: 6, actual: 7 })
        ));
    }

    #[test]
    fn decode_accepts_payloads_past_construction_cap() {
        let len = 40_000usize;
        let mut wire = vec![0x00];
        wire.extend_from_slice(&(len as u16).to_le_bytes());
        wire.extend(std::iter::repeat(7u8).take(len));

        let block = decode_block(&wire).unwrap();
        assert_eq!(block.payload().len(), len);
        assert!(block.validate());
    }

// # Chunking

    #[test]
    fn protect_splits_into_max_sized_blocks() {
        let payload = sample_payload(100_000);
        let blocks = protect(&payload, ChecksumAlg::Fletcher32, 32 * 1024).unwrap();
        let sizes: Vec<usize> = blocks.iter().map(|b| b.payload().len()).collect();
        assert_eq!(sizes, vec![32_768, 32_768, 32_768, 1_696]);
        assert!(blocks.iter().all(ProtectedBlock::validate));
    }

    #[test]
    fn protect_rejects_bad_chunk_sizes() {
        assert_eq!(
            protect(b"abc", ChecksumAlg::CheckSum8, 0),
            Err(BlockError::InvalidChunkSize { size: 0 })
        );
        assert_eq!(
            protect(b"abc", ChecksumAlg::CheckSum8, 32 * 1024 + 1),
            Err(BlockError::InvalidChunkSize { size: 32 * 1024 + 1 })
        );
    }

    #[test]
    fn protect_empty_payload_yields_nothing() {
        assert!(protect(&[], ChecksumAlg::CheckSum8, 16).unwrap().is_empty());
        assert!(protect_to_bytes(&[], ChecksumAlg::CheckSum8, 16).unwrap().is_empty());
        assert!(unprotect(&[]).unwrap().is_empty());
    }

    #[test]
    fn protect_serialize_decode_sequence_preserves_chunks() {
        let payload = sample_payload(10_000);
        let blocks = protect(&payload, ChecksumAlg::CheckSum32, 999).unwrap();
        let wire = protect_to_bytes(&payload, ChecksumAlg::CheckSum32, 999).unwrap();

        let decoded = decode_sequence(&wire).unwrap();
        assert_eq!(decoded.len(), blocks.len());
        for (a, b) in decoded.iter().zip(&blocks) {
            assert_eq!(a.payload(), b.payload());
        }
        assert_eq!(ProtectedBlock::deserialize_sequence(&wire).unwrap(), decoded);
        assert_eq!(&unprotect(&wire).unwrap()[..], &payload[..]);
    }

    #[test]
    fn decode_sequence_rejects_truncated_tail() {
        let wire = protect_to_bytes(&sample_payload(50), ChecksumAlg::Fletcher16, 20).unwrap();
        assert!(matches!(
            decode_sequence(&wire[..wire.len() - 1]),
            Err(BlockError::Truncated { .. })
        ));
    }

    #[test]
    fn corruption_is_located() {
        let payload = sample_payload(3000);
        let mut wire = protect_to_bytes(&payload, ChecksumAlg::CheckSum32, 1000).unwrap();
        // each block: 3 header + 1000 payload + 4 code
        wire[1007 + 3 + 10] ^= 0x01;

        let blocks = decode_sequence(&wire).unwrap();
        assert_eq!(corrupted_indices(&blocks), vec![1]);
        assert_eq!(reassemble(&blocks), Err(BlockError::IntegrityFailure { index: 1 }));
        assert_eq!(unprotect(&wire), Err(BlockError::IntegrityFailure { index: 1 }));

        let clean = protect(&payload, ChecksumAlg::CheckSum32, 1000).unwrap();
        assert!(corrupted_indices(&clean).is_empty());
        assert_eq!(&reassemble(&clean).unwrap()[..], &payload[..]);
    }

    proptest! {
        #[test]
        fn prop_unprotect_inverts_protect(
            payload in proptest::collection::vec(any::<u8>(), 0..5_000),
            chunk in 1usize..2_000,
            tag in 0u8..7,
        ) {
            let alg = ChecksumAlg::from_u8(tag).unwrap();
            let wire = protect_to_bytes(&payload, alg, chunk).unwrap();
            prop_assert_eq!(&unprotect(&wire).unwrap()[..], &payload[..]);
        }
    }
}
