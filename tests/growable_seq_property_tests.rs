//! Property-based testing for GrowableSeq
//!
//! Each property is checked against random operation sequences and, where
//! useful, against `std::vec::Vec` as a model.

use memlab::{GrowableSeq, GrowthPolicy, MemlabError};
use proptest::prelude::*;

// =============================================================================
// PROPERTY TEST GENERATORS
// =============================================================================

#[derive(Debug, Clone)]
enum SeqOp {
    Push(i32),
    Pop,
    InsertAt(usize, i32),
    Remove(usize),
    Reserve(usize),
    Resize(usize),
    Truncate(usize),
    ShrinkToFit,
    Clear,
}

fn seq_ops_strategy() -> impl Strategy<Value = Vec<SeqOp>> {
    prop::collection::vec(
        prop_oneof![
            4 => any::<i32>().prop_map(SeqOp::Push),
            1 => Just(SeqOp::Pop),
            2 => (0usize..64, any::<i32>()).prop_map(|(i, v)| SeqOp::InsertAt(i, v)),
            1 => (0usize..64).prop_map(SeqOp::Remove),
            1 => (0usize..256).prop_map(SeqOp::Reserve),
            1 => (0usize..128).prop_map(SeqOp::Resize),
            1 => (0usize..64).prop_map(SeqOp::Truncate),
            1 => Just(SeqOp::ShrinkToFit),
            1 => Just(SeqOp::Clear),
        ],
        0..300,
    )
}

fn policy_strategy() -> impl Strategy<Value = GrowthPolicy> {
    (1.5f64..=4.0, 1usize..16).prop_map(|(factor, min)| GrowthPolicy::new(factor, min).unwrap())
}

// =============================================================================
// GROWTH PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn prop_capacity_never_decreases_under_push(
        elements in prop::collection::vec(any::<i32>(), 0..2000),
        policy in policy_strategy(),
    ) {
        let mut seq = GrowableSeq::with_policy(policy);
        let mut prev_cap = seq.capacity();

        for (i, &elem) in elements.iter().enumerate() {
            seq.push(elem).unwrap();
            prop_assert!(seq.capacity() >= prev_cap);
            prop_assert!(seq.len() <= seq.capacity());
            prop_assert_eq!(seq.len(), i + 1);
            prev_cap = seq.capacity();
        }

        prop_assert_eq!(seq.as_slice(), elements.as_slice());
    }

    #[test]
    fn prop_reallocations_logarithmic(n in 1usize..20_000, policy in policy_strategy()) {
        let mut seq = GrowableSeq::with_policy(policy);
        for i in 0..n {
            seq.push(i).unwrap();
        }

        let bound = ((n as f64).ln() / policy.factor().ln()).ceil() as usize + 2;
        prop_assert!(
            seq.reallocations() <= bound,
            "{} reallocations for {} pushes (factor {}), bound {}",
            seq.reallocations(), n, policy.factor(), bound
        );
    }

    #[test]
    fn prop_reserve_exact_and_never_shrinks(
        initial in 0usize..100,
        requests in prop::collection::vec(0usize..500, 1..20),
    ) {
        let mut seq: GrowableSeq<u16> = GrowableSeq::new();
        seq.resize(initial).unwrap();

        for n in requests {
            let before_cap = seq.capacity();
            let before_len = seq.len();
            seq.reserve(n).unwrap();

            prop_assert_eq!(seq.len(), before_len);
            prop_assert_eq!(seq.capacity(), before_cap.max(n));
        }
    }

    #[test]
    fn prop_resize_fills_with_default(sizes in prop::collection::vec(0usize..300, 1..10)) {
        let mut seq: GrowableSeq<i64> = GrowableSeq::new();
        let mut model: Vec<i64> = Vec::new();

        for (round, n) in sizes.into_iter().enumerate() {
            for x in seq.as_mut_slice() {
                *x = round as i64 + 1;
            }
            for x in model.iter_mut() {
                *x = round as i64 + 1;
            }

            seq.resize(n).unwrap();
            model.resize(n, 0);

            prop_assert_eq!(seq.len(), n);
            prop_assert!(seq.capacity() >= n);
            prop_assert_eq!(seq.as_slice(), model.as_slice());
        }
    }

    #[test]
    fn prop_matches_vec_model(ops in seq_ops_strategy()) {
        let mut seq = GrowableSeq::new();
        let mut model: Vec<i32> = Vec::new();

        for op in ops {
            match op {
                SeqOp::Push(v) => {
                    seq.push(v).unwrap();
                    model.push(v);
                }
                SeqOp::Pop => prop_assert_eq!(seq.pop(), model.pop()),
                SeqOp::InsertAt(i, v) => {
                    let result = seq.insert_at(i, v);
                    if i <= model.len() {
                        prop_assert!(result.is_ok());
                        model.insert(i, v);
                    } else {
                        let is_out_of_bounds = matches!(result, Err(MemlabError::OutOfBounds { .. }));
                        prop_assert!(is_out_of_bounds);
                    }
                }
                SeqOp::Remove(i) => {
                    let result = seq.remove(i);
                    if i < model.len() {
                        prop_assert_eq!(result.unwrap(), model.remove(i));
                    } else {
                        prop_assert!(result.is_err());
                    }
                }
                SeqOp::Reserve(n) => seq.reserve(n).unwrap(),
                SeqOp::Resize(n) => {
                    seq.resize(n).unwrap();
                    model.resize(n, 0);
                }
                SeqOp::Truncate(n) => {
                    seq.truncate(n);
                    model.truncate(n);
                }
                SeqOp::ShrinkToFit => {
                    seq.shrink_to_fit().unwrap();
                    prop_assert_eq!(seq.capacity(), seq.len());
                }
                SeqOp::Clear => {
                    seq.clear();
                    model.clear();
                }
            }

            prop_assert!(seq.len() <= seq.capacity());
            prop_assert_eq!(seq.as_slice(), model.as_slice());
        }
    }
}

// =============================================================================
// HANDLE PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn prop_relocation_stales_every_handle(ops in seq_ops_strategy()) {
        let mut seq = GrowableSeq::new();
        seq.push(0).unwrap();

        for op in ops {
            let handles: Vec<_> = (0..seq.len()).map(|i| seq.handle(i).unwrap()).collect();
            let address = seq.data_address();
            let reallocations = seq.reallocations();

            match op {
                SeqOp::Push(v) => { seq.push(v).unwrap(); }
                SeqOp::InsertAt(i, v) => { let _ = seq.insert_at(i % (seq.len() + 1), v); }
                SeqOp::Reserve(n) => seq.reserve(n).unwrap(),
                SeqOp::Resize(n) => seq.resize(n).unwrap(),
                SeqOp::ShrinkToFit => seq.shrink_to_fit().unwrap(),
                _ => continue,
            }

            if seq.reallocations() != reallocations || seq.data_address() != address {
                for h in &handles {
                    prop_assert!(!seq.is_valid(h));
                    prop_assert!(seq.resolve(h).is_err());
                }
            }
        }
    }

    #[test]
    fn prop_valid_handles_resolve_to_original_value(
        len in 1usize..100,
        spare in 1usize..20,
        probe in 0usize..100,
        insert in 0usize..120,
    ) {
        let probe = probe % len;
        let insert = insert % (len + 1);

        let mut seq = GrowableSeq::with_capacity(len + spare).unwrap();
        for i in 0..len {
            seq.push(i as u32).unwrap();
        }

        let handle = seq.handle(probe).unwrap();
        seq.insert_at(insert, u32::MAX).unwrap();

        // No reallocation: exactly the shifted slots are stale.
        prop_assert_eq!(seq.is_valid(&handle), probe < insert);
        if let Ok(value) = seq.resolve(&handle) {
            prop_assert_eq!(*value, probe as u32);
        }
    }
}
