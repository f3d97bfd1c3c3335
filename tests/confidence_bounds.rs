// tests/confidence_bounds.rs
use industry_radar::scoring::{CONFIDENCE_CEILING, CONFIDENCE_FLOOR};
use industry_radar::{score, CollectedItem, SourceKind};
use rand::{rngs::StdRng, Rng, SeedableRng};

const KINDS: [SourceKind; 3] = [SourceKind::Official, SourceKind::Media, SourceKind::Rumor];

fn random_item(rng: &mut StdRng) -> CollectedItem {
    let mut it = CollectedItem::new("t", "c", KINDS[rng.random_range(0..3)]);
    if rng.random_bool(0.5) {
        it = it.with_url("https://example.com/a");
    }
    if rng.random_bool(0.5) {
        it = it.published("2025-06-01");
    }
    it
}

#[test]
fn confidence_always_within_bounds() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..500 {
        let n = rng.random_range(0..6);
        let items: Vec<CollectedItem> = (0..n).map(|_| random_item(&mut rng)).collect();
        let refs: Vec<&CollectedItem> = items.iter().collect();

        let external = match rng.random_range(0..4) {
            0 => None,
            1 => Some(rng.random_range(-5.0..5.0)),
            2 => Some(f64::NAN),
            _ => Some(rng.random::<f64>()),
        };
        let primary = if rng.random_bool(0.8) {
            Some(KINDS[rng.random_range(0..3)])
        } else {
            None
        };

        let c = score(external, primary, &refs);
        assert!(
            (CONFIDENCE_FLOOR..=CONFIDENCE_CEILING).contains(&c),
            "external={external:?} primary={primary:?} n={n} -> {c}"
        );
    }
}

#[test]
fn extremes_land_on_the_bounds() {
    assert_eq!(score(Some(-100.0), None, &[]), CONFIDENCE_FLOOR);
    assert_eq!(score(None, None, &[]), CONFIDENCE_FLOOR);

    let items: Vec<CollectedItem> = KINDS
        .iter()
        .map(|k| {
            CollectedItem::new("t", "c", *k)
                .with_url("https://example.com")
                .published("2025-01-01")
        })
        .collect();
    let refs: Vec<&CollectedItem> = items.iter().collect();
    assert_eq!(score(Some(100.0), Some(SourceKind::Official), &refs), CONFIDENCE_CEILING);
}

#[test]
fn stronger_source_never_scores_lower() {
    let items = [CollectedItem::new("t", "c", SourceKind::Media).with_url("u")];
    let refs: Vec<&CollectedItem> = items.iter().collect();
    let official = score(Some(0.5), Some(SourceKind::Official), &refs);
    let media = score(Some(0.5), Some(SourceKind::Media), &refs);
    let rumor = score(Some(0.5), Some(SourceKind::Rumor), &refs);
    assert!(official >= media && media >= rumor);
}
