use super::TimeWindow;
use chrono::NaiveTime;

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[test]
fn test_window_is_ordered() {
    assert!(TimeWindow::new(t(9, 0), t(17, 0)).is_ordered());
    assert!(!TimeWindow::new(t(17, 0), t(9, 0)).is_ordered());
    assert!(!TimeWindow::new(t(9, 0), t(9, 0)).is_ordered());
}

#[test]
fn test_contains_is_half_open() {
    let window = TimeWindow::new(t(18, 0), t(22, 0));
    assert!(window.contains(t(18, 0)));
    assert!(window.contains(t(21, 59)));
    assert!(!window.contains(t(22, 0)));
    assert!(!window.contains(t(17, 59)));
}

#[test]
fn test_overlaps_partial() {
    let a = TimeWindow::new(t(18, 0), t(19, 30));
    let b = TimeWindow::new(t(19, 0), t(20, 0));
    assert!(a.overlaps(&b));
    assert!(b.overlaps(&a));
}

#[test]
fn test_overlaps_contained() {
    let outer = TimeWindow::new(t(12, 0), t(15, 0));
    let inner = TimeWindow::new(t(13, 0), t(14, 0));
    assert!(outer.overlaps(&inner));
    assert!(inner.overlaps(&outer));
}

#[test]
fn test_adjacent_windows_do_not_overlap() {
    let a = TimeWindow::new(t(18, 0), t(19, 30));
    let b = TimeWindow::new(t(19, 30), t(21, 0));
    assert!(!a.overlaps(&b));
    assert!(!b.overlaps(&a));
}

#[test]
fn test_disjoint_windows_do_not_overlap() {
    let a = TimeWindow::new(t(9, 0), t(10, 0));
    let b = TimeWindow::new(t(14, 0), t(15, 0));
    assert!(!a.overlaps(&b));
}

#[test]
fn test_duration_minutes() {
    assert_eq!(TimeWindow::new(t(18, 0), t(19, 30)).duration_minutes(), 90);
    assert_eq!(TimeWindow::new(t(12, 0), t(12, 0)).duration_minutes(), 0);
}

#[test]
fn test_display_format() {
    let window = TimeWindow::new(t(9, 5), t(17, 30));
    assert_eq!(window.to_string(), "09:05-17:30");
}
