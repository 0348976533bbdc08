use super::*;

fn place(rank: u32, name: &str, place_id: Option<&str>) -> PlaceResult {
    PlaceResult {
        rank,
        name: name.to_string(),
        place_id: place_id.map(ToString::to_string),
        rating: None,
        review_count: None,
        address: None,
        url: None,
    }
}

// ---------------------------------------------------------------------------
// match_target
// ---------------------------------------------------------------------------

#[test]
fn place_id_match_fixes_the_rank() {
    let results = vec![
        place(1, "喫茶ロマン", Some("ChIJ999")),
        place(2, "山田歯科医院", Some("ChIJ123")),
        place(3, "カフェみどり", Some("ChIJ555")),
    ];
    assert_eq!(match_target(&results, Some("ChIJ123"), None), Some(2));
}

#[test]
fn absent_target_yields_no_rank() {
    let results = vec![
        place(1, "喫茶ロマン", Some("ChIJ999")),
        place(2, "カフェみどり", Some("ChIJ555")),
    ];
    assert_eq!(match_target(&results, Some("ChIJ123"), None), None);
    assert_eq!(match_target(&results, None, Some("山田歯科医院")), None);
}

#[test]
fn name_fallback_when_row_id_is_missing() {
    let results = vec![
        place(1, "喫茶ロマン", None),
        place(2, "山田歯科医院 渋谷", None),
    ];
    assert_eq!(
        match_target(&results, Some("ChIJ123"), Some("山田歯科医院")),
        Some(2)
    );
}

#[test]
fn first_matching_row_wins() {
    let results = vec![
        place(1, "山田歯科医院 本院", None),
        place(2, "山田歯科医院", Some("ChIJ123")),
    ];
    assert_eq!(
        match_target(&results, Some("ChIJ123"), Some("山田歯科医院")),
        Some(1)
    );
}

#[test]
fn no_criteria_never_matches() {
    let results = vec![place(1, "喫茶ロマン", Some("ChIJ999"))];
    assert_eq!(match_target(&results, None, None), None);
}

// ---------------------------------------------------------------------------
// names_match
// ---------------------------------------------------------------------------

#[test]
fn names_match_is_bidirectional_substring() {
    assert!(names_match("山田歯科医院 渋谷駅前", "山田歯科医院"));
    assert!(names_match("山田歯科", "山田歯科医院"));
    assert!(!names_match("佐藤整形外科", "山田歯科医院"));
}

#[test]
fn names_match_ignores_case_and_whitespace() {
    assert!(names_match("Cafe Midori Tokyo", "cafemidori"));
    assert!(names_match("CAFE MIDORI", "Cafe  Midori"));
    assert!(!names_match("", "anything"));
    assert!(!names_match("anything", "   "));
}

// ---------------------------------------------------------------------------
// row_to_place
// ---------------------------------------------------------------------------

#[test]
fn row_without_a_name_is_skipped() {
    let capture = RowCapture {
        name: None,
        href: Some("/maps/place/x".to_string()),
        rating_label: Some("4.3 つ星".to_string()),
        count_text: None,
        address: None,
    };
    assert!(row_to_place(&capture, 1).is_none());

    let blank = RowCapture {
        name: Some("   ".to_string()),
        href: None,
        rating_label: None,
        count_text: None,
        address: None,
    };
    assert!(row_to_place(&blank, 1).is_none());
}

#[test]
fn full_row_parses_every_field() {
    let capture = RowCapture {
        name: Some("山田歯科医院".to_string()),
        href: Some(
            "/maps/place/%E5%B1%B1%E7%94%B0/data=!4m5!3m4!1s0x6018f:0x42ab!19sChIJ123"
                .to_string(),
        ),
        rating_label: Some("4.3 つ星 862 件のクチコミ".to_string()),
        count_text: Some("irrelevant".to_string()),
        address: Some(" 東京都渋谷区1-2-3 ".to_string()),
    };
    let result = row_to_place(&capture, 4).unwrap();
    assert_eq!(result.rank, 4);
    assert_eq!(result.name, "山田歯科医院");
    assert_eq!(result.place_id.as_deref(), Some("0x6018f:0x42ab"));
    assert_eq!(result.rating, Some(4.3));
    assert_eq!(result.review_count, Some(862));
    assert_eq!(result.address.as_deref(), Some("東京都渋谷区1-2-3"));
    assert!(result.url.unwrap().starts_with("https://www.google.com/"));
}

#[test]
fn count_text_is_the_fallback_for_review_count() {
    let capture = RowCapture {
        name: Some("カフェみどり".to_string()),
        href: None,
        rating_label: Some("4.8 つ星".to_string()),
        count_text: Some("カフェみどり 4.8 (321) 東京都".to_string()),
        address: None,
    };
    let result = row_to_place(&capture, 1).unwrap();
    assert_eq!(result.rating, Some(4.8));
    assert_eq!(result.review_count, Some(321));
    assert_eq!(result.place_id, None);
}

#[test]
fn absolute_hrefs_pass_through_unchanged() {
    assert_eq!(
        absolutize("https://www.google.com/maps/place/x"),
        "https://www.google.com/maps/place/x"
    );
    assert_eq!(
        absolutize("/maps/place/x"),
        "https://www.google.com/maps/place/x"
    );
}
