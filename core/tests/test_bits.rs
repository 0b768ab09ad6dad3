// Covers `BitContainer`:
// * element access and bounds
// * packed (LSB-first) vs typed (MSB-first) appends
// * removal and trimming
// * the `count + words` wire form

#[cfg(test)]
mod tests {
    use bitframe_core::bits::{decode_bits, encode_bits, BitContainer, BitsError};
    use proptest::prelude::*;

    fn bits_of(s: &str) -> Vec<bool> {
        s.chars().filter(|c| *c != '_').map(|c| c == '1').collect()
    }

// # Construction and access

    #[test]
    fn with_capacity_rounds_to_words() {
        let bits = BitContainer::with_capacity(5);
        assert_eq!(bits.len(), 0);
        assert_eq!(bits.capacity(), 32);
        assert!(bits.is_empty());
    }

    #[test]
    fn add_grows_by_whole_words() {
        let mut bits = BitContainer::new();
        for _ in 0..33 {
            bits.add(true);
        }
        assert_eq!(bits.len(), 33);
        assert_eq!(bits.capacity(), 64);
    }

    #[test]
    fn get_and_set_are_bounds_checked() {
        let mut bits = BitContainer::from_bools(&bits_of("101"));
        assert_eq!(bits.get(0), Ok(true));
        assert_eq!(bits.get(1), Ok(false));
        assert_eq!(bits.get(3), Err(BitsError::OutOfRange { index: 3, len: 3 }));
        assert!(matches!(bits.set(3, true), Err(BitsError::OutOfRange { .. })));
    }

    #[test]
    fn set_false_clears_regardless_of_previous_value() {
        let mut bits = BitContainer::from_bools(&[false, true]);
        bits.set(0, false).unwrap();
        bits.set(1, false).unwrap();
        bits.set(1, false).unwrap();
        assert_eq!(bits.iter().collect::<Vec<_>>(), vec![false, false]);

        bits.set(0, true).unwrap();
        bits.set(0, true).unwrap();
        assert_eq!(bits.get(0), Ok(true));
    }

    #[test]
    fn fast_access_ignores_count_within_capacity() {
        let mut bits = BitContainer::with_capacity(32);
        bits.fast_set(31, true);
        assert!(bits.fast_get(31));
        assert_eq!(bits.len(), 0);
    }

    #[test]
    #[should_panic]
    fn fast_get_past_capacity_panics() {
        let bits = BitContainer::with_capacity(32);
        let _ = bits.fast_get(32);
    }

    #[test]
    fn from_bytes_is_lsb_first() {
        let bits = BitContainer::from_bytes(&[0b0000_0101, 0x80]);
        assert_eq!(bits.len(), 16);
        assert_eq!(
            bits.iter().collect::<Vec<_>>(),
            bits_of("1010_0000_0000_0001")
        );
    }

    #[test]
    fn from_words_takes_every_bit() {
        let bits = BitContainer::from_words(&[0x8000_0001, 0x0000_0002]);
        assert_eq!(bits.len(), 64);
        assert!(bits.get(0).unwrap());
        assert!(bits.get(31).unwrap());
        assert!(bits.get(33).unwrap());
        assert_eq!(bits.iter().filter(|b| *b).count(), 3);
    }

    #[test]
    fn collect_and_extend() {
        let mut bits: BitContainer = bits_of("110").into_iter().collect();
        bits.extend([true, false]);
        assert_eq!(bits, BitContainer::from_bools(&bits_of("11010")));
    }

// # Packed appends

    #[test]
    fn add_range_appends_after_existing_bits() {
        let mut bits = BitContainer::from_bools(&[true]);
        bits.add_range(&bits_of("0011"));
        assert_eq!(bits.iter().collect::<Vec<_>>(), bits_of("10011"));
    }

    #[test]
    fn add_packed_bytes_takes_count_bits_lsb_first() {
        let mut bits = BitContainer::new();
        bits.add_packed_bytes(&[0b0000_0110, 0xFF], 10).unwrap();
        assert_eq!(bits.len(), 10);
        assert_eq!(bits.iter().collect::<Vec<_>>(), bits_of("0110_0000_11"));
    }

    #[test]
    fn add_packed_words_takes_count_bits_lsb_first() {
        let mut bits = BitContainer::from_bools(&[false]);
        bits.add_packed_words(&[0b1011], 4).unwrap();
        assert_eq!(bits.iter().collect::<Vec<_>>(), bits_of("0_1101"));
    }

    #[test]
    fn packed_count_past_source_is_rejected() {
        let mut bits = BitContainer::new();
        assert!(matches!(
            bits.add_packed_bytes(&[0u8; 2], 17),
            Err(BitsError::OutOfRange { index: 17, len: 16 })
        ));
        assert!(matches!(
            bits.add_packed_words(&[0u32], 33),
            Err(BitsError::OutOfRange { index: 33, len: 32 })
        ));
        assert!(bits.is_empty());
    }

    #[test]
    fn packed_count_zero_is_noop() {
        let mut bits = BitContainer::from_bools(&[true]);
        bits.add_packed_bytes(&[0xFF], 0).unwrap();
        bits.add_packed_words(&[], 0).unwrap();
        assert_eq!(bits.len(), 1);
    }

// # Typed appends / reads

    #[test]
    fn typed_append_is_msb_first() {
        let mut bits = BitContainer::new();
        bits.add_u8(0b1000_0001);
        bits.add_u16(0x8000);
        assert_eq!(bits.len(), 24);
        assert_eq!(
            bits.iter().collect::<Vec<_>>(),
            bits_of("1000_0001_1000_0000_0000_0000")
        );
    }

    #[test]
    fn typed_round_trip_every_width() {
        let mut bits = BitContainer::new();
        bits.add_u8(0xA5);
        bits.add_i8(-3);
        bits.add_u16(0xBEEF);
        bits.add_i16(i16::MIN);
        bits.add_u32(0xDEAD_BEEF);
        bits.add_i32(-123_456);
        bits.add_u64(u64::MAX - 7);
        bits.add_i64(i64::MIN + 1);

        assert_eq!(bits.get_u8(0).unwrap(), 0xA5);
        assert_eq!(bits.get_i8(8).unwrap(), -3);
        assert_eq!(bits.get_u16(16).unwrap(), 0xBEEF);
        assert_eq!(bits.get_i16(32).unwrap(), i16::MIN);
        assert_eq!(bits.get_u32(48).unwrap(), 0xDEAD_BEEF);
        assert_eq!(bits.get_i32(80).unwrap(), -123_456);
        assert_eq!(bits.get_u64(112).unwrap(), u64::MAX - 7);
        assert_eq!(bits.get_i64(176).unwrap(), i64::MIN + 1);
    }

    #[test]
    fn pinned_unaligned_u8_read() {
        let mut bits = BitContainer::with_capacity(5);
        for b in bits_of("1101_1111_1") {
            bits.add(b);
        }
        assert_eq!(bits.len(), 9);
        assert_eq!(bits.get_u8(1).unwrap(), 0b1011_1111);
        assert_eq!(bits.get_u8(1).unwrap(), 0xBF);
    }

    #[test]
    fn partial_read_zero_pads_high_bits() {
        let bits = BitContainer::from_bools(&bits_of("101"));
        assert_eq!(bits.get_u8(0).unwrap(), 0b101);
        assert_eq!(bits.get_u8(1).unwrap(), 0b01);
        assert_eq!(bits.get_u32(2).unwrap(), 1);
        assert!(matches!(bits.get_u8(3), Err(BitsError::OutOfRange { .. })));
    }

// # Removal

    #[test]
    fn pop_returns_last_bit() {
        let mut bits = BitContainer::from_bools(&bits_of("10"));
        assert_eq!(bits.pop(), Ok(false));
        assert_eq!(bits.pop(), Ok(true));
        assert!(matches!(bits.pop(), Err(BitsError::InvalidOperation(_))));
    }

    #[test]
    fn pop_n_and_trim() {
        let mut bits: BitContainer = std::iter::repeat(true).take(70).collect();
        assert!(bits.pop_n(71).is_err());
        bits.pop_and_trim(40).unwrap();
        assert_eq!(bits.len(), 30);
        assert_eq!(bits.capacity(), 32);
    }

    #[test]
    fn truncate_rules() {
        let mut bits: BitContainer = std::iter::repeat(true).take(40).collect();
        assert!(matches!(bits.truncate(41), Err(BitsError::OutOfRange { .. })));
        bits.truncate(33).unwrap();
        assert_eq!(bits.len(), 33);
        assert_eq!(bits.capacity(), 64);
        bits.truncate_and_trim(32).unwrap();
        assert_eq!(bits.capacity(), 32);
    }

    #[test]
    fn clear_keeps_storage_unless_trimmed() {
        let mut bits: BitContainer = std::iter::repeat(false).take(64).collect();
        bits.clear();
        assert!(bits.is_empty());
        assert_eq!(bits.capacity(), 64);
        bits.clear_and_trim();
        assert_eq!(bits.capacity(), 0);
    }

    #[test]
    fn set_min_capacity_only_grows() {
        let mut bits = BitContainer::with_capacity(64);
        bits.set_min_capacity(10);
        assert_eq!(bits.capacity(), 64);
        bits.set_min_capacity(65);
        assert_eq!(bits.capacity(), 96);
    }

// # Wire form

    #[test]
    fn serialize_layout() {
        let bits: BitContainer = std::iter::repeat(true).take(9).collect();
        let wire = bits.serialize().unwrap();
        assert_eq!(wire, vec![9, 0, 0, 0, 0xFF, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn serialize_zeroes_stale_bits() {
        let mut bits: BitContainer = std::iter::repeat(true).take(40).collect();
        bits.truncate(33).unwrap();
        let wire = encode_bits(&bits).unwrap();
        assert_eq!(wire.len(), 4 + 8);
        assert_eq!(&wire[8..12], &[0x01, 0, 0, 0]);
    }

    #[test]
    fn empty_round_trip() {
        let wire = BitContainer::new().serialize().unwrap();
        assert_eq!(wire, vec![0, 0, 0, 0]);
        assert_eq!(BitContainer::deserialize(&wire).unwrap(), BitContainer::new());
    }

    #[test]
    fn deserialize_rejects_malformed() {
        assert!(matches!(
            decode_bits(&[1, 0]),
            Err(BitsError::Truncated { have: 2, need: 4 })
        ));
        assert!(matches!(
            decode_bits(&(-1i32).to_le_bytes()),
            Err(BitsError::NegativeCount(-1))
        ));
        // 33 bits need two words
        let mut short = 33i32.to_le_bytes().to_vec();
        short.extend_from_slice(&[0; 4]);
        assert!(matches!(decode_bits(&short), Err(BitsError::Truncated { .. })));

        let mut long = 1i32.to_le_bytes().to_vec();
        long.extend_from_slice(&[0; 8]);
        assert!(matches!(
            decode_bits(&long),
            Err(BitsError::LengthMismatch { expected: 8, actual: 12 })
        ));
    }

    proptest! {
        #[test]
        fn prop_serialize_round_trip(seq in proptest::collection::vec(any::<bool>(), 0..=10_000)) {
            let bits = BitContainer::from_bools(&seq);
            let wire = bits.serialize().unwrap();
            let back = BitContainer::deserialize(&wire).unwrap();
            prop_assert_eq!(back.len(), seq.len());
            prop_assert_eq!(back.iter().collect::<Vec<_>>(), seq);
        }

        #[test]
        fn prop_typed_u32_round_trip(prefix in 0usize..40, v in any::<u32>()) {
            let mut bits: BitContainer = std::iter::repeat(false).take(prefix).collect();
            bits.add_u32(v);
            prop_assert_eq!(bits.get_u32(prefix).unwrap(), v);
        }
    }
}
