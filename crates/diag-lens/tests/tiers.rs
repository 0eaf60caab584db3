use diag_lens::{PanelView, SeverityTally, TierThresholds, VisualTier};
use rstest::rstest;

#[rstest]
#[case(0, VisualTier::Resting)]
#[case(1, VisualTier::Uneasy)]
#[case(4, VisualTier::Uneasy)]
#[case(5, VisualTier::Distressed)]
#[case(9, VisualTier::Distressed)]
#[case(10, VisualTier::Critical)]
#[case(1_000, VisualTier::Critical)]
fn test_default_tier_boundaries(#[case] count: usize, #[case] expected: VisualTier) {
    assert_eq!(
        VisualTier::for_count(count, &TierThresholds::default()),
        expected
    );
}

#[rstest]
#[case(0, 10, VisualTier::Resting, VisualTier::Critical)]
#[case(4, 5, VisualTier::Uneasy, VisualTier::Distressed)]
#[case(9, 0, VisualTier::Distressed, VisualTier::Resting)]
#[case(10, 1, VisualTier::Critical, VisualTier::Uneasy)]
fn test_error_and_warning_tiers_are_independent(
    #[case] errors: usize,
    #[case] warnings: usize,
    #[case] error_tier: VisualTier,
    #[case] warning_tier: VisualTier,
) {
    let view = PanelView::measured(
        SeverityTally::new(errors, warnings),
        &TierThresholds::default(),
    );
    assert_eq!(view.error_tier, error_tier);
    assert_eq!(view.warning_tier, warning_tier);
    assert!(view.enabled);
}

#[test]
fn test_tier_index_roundtrip() {
    for (idx, tier) in VisualTier::ALL.iter().enumerate() {
        assert_eq!(tier.index(), idx);
        assert_eq!(VisualTier::from_index(idx), Some(*tier));
    }
    assert_eq!(VisualTier::from_index(4), None);
}

#[test]
fn test_custom_thresholds() {
    let thresholds = TierThresholds {
        uneasy: 2,
        distressed: 3,
        critical: 4,
    };
    assert_eq!(VisualTier::for_count(1, &thresholds), VisualTier::Resting);
    assert_eq!(VisualTier::for_count(2, &thresholds), VisualTier::Uneasy);
    assert_eq!(VisualTier::for_count(3, &thresholds), VisualTier::Distressed);
    assert_eq!(VisualTier::for_count(4, &thresholds), VisualTier::Critical);
}

#[test]
fn test_labels() {
    let view = PanelView::measured(SeverityTally::new(0, 0), &TierThresholds::default());
    assert_eq!(view.error_label(), "0 errors");
    assert_eq!(view.warning_label(), "0 warnings");
    assert_eq!(view.error_tier, VisualTier::Resting);
    assert_eq!(view.warning_tier, VisualTier::Resting);

    let view = PanelView::measured(SeverityTally::new(12, 1), &TierThresholds::default());
    assert_eq!(view.error_label(), "12 errors");
    assert_eq!(view.warning_label(), "1 warnings");
}
