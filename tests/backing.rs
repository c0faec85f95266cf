use realms_viz::shader::viewport::{clamp_pixel_ratio, BackingSize, BackingTracker};

#[test]
fn pixel_ratio_is_clamped_to_one_and_two() {
    for (raw, expected) in [(0.5, 1.0), (1.0, 1.0), (1.5, 1.5), (3.0, 2.0), (f64::NAN, 1.0), (0.0, 1.0)] {
        assert_eq!(clamp_pixel_ratio(raw), expected, "raw={raw}");
    }
}

#[test]
fn backing_size_floors_and_never_collapses() {
    assert_eq!(
        BackingSize::from_css(100.7, 50.2, 1.5),
        BackingSize { width: 151, height: 75 }
    );
    assert_eq!(BackingSize::from_css(0.0, 0.0, 2.0), BackingSize { width: 1, height: 1 });
    assert_eq!(BackingSize::from_css(-20.0, 10.0, 1.0), BackingSize { width: 1, height: 10 });
}

#[test]
fn tracker_reports_only_changes() {
    let mut tracker = BackingTracker::default();
    assert!(tracker.current().is_none());
    assert_eq!(
        tracker.sync(400.0, 300.0, 1.0),
        Some(BackingSize { width: 400, height: 300 })
    );
    assert_eq!(tracker.sync(400.0, 300.0, 1.0), None);
    // same device size through a different css/dpr pair
    assert_eq!(tracker.sync(200.0, 150.0, 2.0), None);
    assert_eq!(
        tracker.sync(200.0, 150.0, 3.0),
        None,
        "ratio above 2 clamps to the size already applied"
    );
    assert!(tracker.sync(201.0, 150.0, 2.0).is_some());
}
