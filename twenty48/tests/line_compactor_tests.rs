use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use twenty48::line::compact_and_merge;

fn double(v: u32) -> u32 {
    v * 2
}

fn random_line(rng: &mut StdRng, len: usize) -> Vec<Option<u32>> {
    (0..len)
        .map(|_| rng.gen_bool(0.7).then(|| 1u32 << rng.gen_range(1..4)))
        .collect()
}

#[test]
fn listed_examples_hold_for_doubling() {
    let (a, b) = (2u32, 8u32);
    assert_eq!(compact_and_merge([Some(a), Some(a), Some(b)], double), vec![2 * a, b]);
    assert_eq!(compact_and_merge([Some(a), None], double), vec![a]);
    assert_eq!(compact_and_merge([Some(b), None, Some(a), Some(a)], double), vec![b, 2 * a]);
    assert_eq!(compact_and_merge([Some(a), Some(a), None, Some(a)], double), vec![2 * a, a]);
    assert_eq!(compact_and_merge([Some(a), None, Some(a), Some(a)], double), vec![2 * a, a]);
}

#[test]
fn lines_without_gaps_or_equal_neighbours_are_unchanged() {
    let mut rng = StdRng::seed_from_u64(1);
    for len in 0..8 {
        for _ in 0..50 {
            let mut line: Vec<u32> = Vec::with_capacity(len);
            while line.len() < len {
                let v = 1u32 << rng.gen_range(1..6);
                if line.last() != Some(&v) {
                    line.push(v);
                }
            }
            let merged = compact_and_merge(line.iter().copied().map(Some), double);
            assert_eq!(merged, line);
        }
    }
}

#[test]
fn output_is_dense_shorter_and_sum_preserving() {
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..500 {
        let len = rng.gen_range(0..7);
        let line = random_line(&mut rng, len);
        let present = line.iter().flatten().count();
        let merged = compact_and_merge(line.iter().copied(), double);

        assert!(merged.len() <= present);
        assert!(merged.len() * 2 >= present);
        assert_eq!(
            merged.iter().sum::<u32>(),
            line.iter().flatten().sum::<u32>(),
            "{line:?} -> {merged:?}"
        );
    }
}

#[test]
fn compaction_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..100 {
        let line = random_line(&mut rng, 6);
        assert_eq!(
            compact_and_merge(line.iter().copied(), double),
            compact_and_merge(line.iter().copied(), double)
        );
    }
}

#[test]
fn merge_function_is_caller_supplied() {
    let words = [Some("ab"), Some("ab"), None, Some("c")];
    let merged = compact_and_merge(words, |w| if w == "ab" { "AB" } else { w });
    assert_eq!(merged, vec!["AB", "c"]);
}
