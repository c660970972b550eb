use std::collections::BTreeSet;

use folio::domain::{ValidationError, WindowManager};

fn visited_windows(total_pages: u32, window_size: u32, overlap: u32) -> Vec<(u32, u32)> {
    let mut manager = WindowManager::new(total_pages, window_size).unwrap();
    let mut windows = Vec::new();
    loop {
        let info = manager.window_info();
        windows.push((info.window_start, info.window_end));
        if !manager.advance(overlap).unwrap() {
            break;
        }
    }
    windows
}

#[test]
fn given_45_pages_with_window_20_and_overlap_2_when_advancing_then_three_windows_cover_document() {
    let windows = visited_windows(45, 20, 2);

    assert_eq!(windows, vec![(1, 20), (19, 38), (37, 45)]);
}

#[test]
fn given_any_valid_overlap_when_advancing_to_end_then_every_page_is_covered_in_order() {
    for total_pages in 1..=60 {
        for window_size in 1..=12 {
            for overlap in 0..window_size {
                let windows = visited_windows(total_pages, window_size, overlap);

                let starts: Vec<u32> = windows.iter().map(|w| w.0).collect();
                assert!(
                    starts.windows(2).all(|p| p[0] <= p[1]),
                    "starts decreased for total={total_pages} size={window_size} overlap={overlap}"
                );

                let covered: BTreeSet<u32> =
                    windows.iter().flat_map(|&(s, e)| s..=e).collect();
                let expected: BTreeSet<u32> = (1..=total_pages).collect();
                assert_eq!(
                    covered, expected,
                    "gap for total={total_pages} size={window_size} overlap={overlap}"
                );
            }
        }
    }
}

#[test]
fn given_consecutive_windows_when_not_clamped_then_they_share_exactly_overlap_pages() {
    let windows = visited_windows(100, 10, 3);

    for pair in windows.windows(2) {
        let (_, prev_end) = pair[0];
        let (next_start, _) = pair[1];
        assert_eq!(prev_end + 1 - next_start, 3);
    }
}

#[test]
fn given_document_smaller_than_window_when_advancing_then_returns_false_without_moving() {
    let mut manager = WindowManager::new(7, 20).unwrap();

    assert!(!manager.advance(2).unwrap());
    assert_eq!(manager.current_start(), 1);
    assert_eq!(manager.current_window_pages(), (1..=7).collect::<Vec<_>>());
}

#[test]
fn given_overlap_equal_to_window_size_when_advancing_then_rejects() {
    let mut manager = WindowManager::new(50, 10).unwrap();

    let result = manager.advance(10);

    assert_eq!(
        result,
        Err(ValidationError::OverlapNotBelowWindowSize {
            overlap: 10,
            window_size: 10
        })
    );
    assert_eq!(manager.current_start(), 1);
}

#[test]
fn given_zero_pages_or_zero_window_when_constructing_then_rejects() {
    assert_eq!(
        WindowManager::new(0, 20),
        Err(ValidationError::EmptyDocument)
    );
    assert_eq!(
        WindowManager::new(10, 0),
        Err(ValidationError::ZeroWindowSize)
    );
}

#[test]
fn given_window_at_first_page_when_retreating_then_returns_false() {
    let mut manager = WindowManager::new(45, 20).unwrap();

    assert!(!manager.retreat(2).unwrap());
    assert_eq!(manager.current_start(), 1);
}

#[test]
fn given_advanced_window_when_retreating_then_moves_back_and_clamps_at_one() {
    let mut manager = WindowManager::new(45, 20).unwrap();
    manager.advance(2).unwrap();
    manager.advance(2).unwrap();
    assert_eq!(manager.current_start(), 37);

    assert!(manager.retreat(2).unwrap());
    assert_eq!(manager.current_start(), 19);

    assert!(manager.retreat(2).unwrap());
    assert_eq!(manager.current_start(), 1);
}

#[test]
fn given_start_page_when_seeking_then_only_pages_inside_document_are_accepted() {
    let mut manager = WindowManager::new(30, 10).unwrap();

    assert!(manager.seek(25));
    assert_eq!(manager.current_window_pages(), (25..=30).collect::<Vec<_>>());

    assert!(!manager.seek(0));
    assert!(!manager.seek(31));
    assert_eq!(manager.current_start(), 25);
}

#[test]
fn given_middle_window_when_reading_info_then_reports_neighbours_and_actual_size() {
    let mut manager = WindowManager::new(45, 20).unwrap();
    manager.advance(2).unwrap();

    let info = manager.window_info();
    assert_eq!(info.total_pages, 45);
    assert_eq!(info.window_start, 19);
    assert_eq!(info.window_end, 38);
    assert_eq!(info.window_size, 20);
    assert!(info.has_previous);
    assert!(info.has_next);

    manager.advance(2).unwrap();
    let tail = manager.window_info();
    assert_eq!(tail.window_size, 9);
    assert!(!tail.has_next);
    assert_eq!(tail.range_label(), "37-45");
}

#[test]
fn given_moved_window_when_resetting_then_starts_at_first_page() {
    let mut manager = WindowManager::new(45, 20).unwrap();
    manager.seek(30);

    manager.reset();

    assert_eq!(manager.current_start(), 1);
}

#[test]
fn given_window_size_near_u32_max_when_advancing_then_stops_without_overflow() {
    let mut manager = WindowManager::new(10, u32::MAX).unwrap();

    assert!(!manager.advance(2).unwrap());
    let info = manager.window_info();
    assert_eq!((info.window_start, info.window_end, info.window_size), (1, 10, 10));
    assert!(!info.has_next);
}

#[test]
fn given_window_at_end_of_largest_document_when_advancing_then_stops_without_overflow() {
    let mut manager = WindowManager::new(u32::MAX, 10).unwrap();
    assert!(manager.seek(u32::MAX - 3));

    assert!(!manager.advance(2).unwrap());
    assert_eq!(manager.window_info().window_end, u32::MAX);
    assert_eq!(manager.current_window_pages().len(), 4);
}
