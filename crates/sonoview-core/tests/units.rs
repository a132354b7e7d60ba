use sonoview_core::{format_angle, UnitScale};

#[test]
fn test_spacing_change_changes_labels() {
    let raw = UnitScale::pixels();
    let calibrated = UnitScale::new(Some(0.2));

    assert_eq!(raw.format_length(50.0), "50.0 px");
    assert_eq!(calibrated.format_length(50.0), "10.00 mm");

    // 2500 px² * 0.04 = 100 mm² = 1 cm²
    assert_eq!(raw.format_area(2500.0), "2500 px²");
    assert_eq!(calibrated.format_area(2500.0), "1.00 cm²");
}

#[test]
fn test_display() {
    assert_eq!(UnitScale::pixels().to_string(), "uncalibrated");
    assert_eq!(UnitScale::new(Some(0.5)).to_string(), "0.5 mm/px");
}

#[test]
fn test_angle_is_unit_independent() {
    assert_eq!(format_angle(180.0), "180.0°");
}
