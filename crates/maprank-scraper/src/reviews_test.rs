use super::*;

fn review(id: &str, author: &str) -> Review {
    Review {
        id: id.to_string(),
        rating: 5,
        text: String::new(),
        author_name: author.to_string(),
        published_at: None,
        relative_time: "3日前".to_string(),
    }
}

// ---------------------------------------------------------------------------
// detect_new_reviews
// ---------------------------------------------------------------------------

#[test]
fn unseen_reviews_come_back_in_rendered_order() {
    let current = vec![
        review("aaa", "田中太郎"),
        review("bbb", "佐藤花子"),
        review("ccc", "鈴木一郎"),
    ];
    let previous = vec!["bbb".to_string()];
    let fresh = detect_new_reviews(&current, &previous);
    let ids: Vec<&str> = fresh.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["aaa", "ccc"]);
}

#[test]
fn all_known_yields_empty() {
    let current = vec![review("aaa", "田中太郎"), review("bbb", "佐藤花子")];
    let previous = vec!["aaa".to_string(), "bbb".to_string(), "zzz".to_string()];
    assert!(detect_new_reviews(&current, &previous).is_empty());
}

#[test]
fn empty_history_returns_everything() {
    let current = vec![review("aaa", "田中太郎")];
    assert_eq!(detect_new_reviews(&current, &[]).len(), 1);
}

// ---------------------------------------------------------------------------
// capture_to_review
// ---------------------------------------------------------------------------

#[test]
fn full_card_converts_with_derived_id_and_timestamp() {
    let capture = ReviewCapture {
        author: Some("田中太郎".to_string()),
        rating_label: Some("5 つ星".to_string()),
        relative_time: Some("3日前".to_string()),
        text: Some("とても良いお店でした。".to_string()),
    };
    let review = capture_to_review(&capture).unwrap();
    assert_eq!(review.rating, 5);
    assert_eq!(review.author_name, "田中太郎");
    assert_eq!(review.relative_time, "3日前");
    assert_eq!(review.text, "とても良いお店でした。");
    assert_eq!(review.id, generate_review_id("田中太郎", "3日前", 5));
    assert!(review.published_at.is_some());
}

#[test]
fn unreadable_rating_drops_the_card() {
    let capture = ReviewCapture {
        author: Some("田中太郎".to_string()),
        rating_label: None,
        relative_time: Some("3日前".to_string()),
        text: Some("text".to_string()),
    };
    assert!(capture_to_review(&capture).is_none());

    let junk = ReviewCapture {
        author: Some("田中太郎".to_string()),
        rating_label: Some("stars: none".to_string()),
        relative_time: None,
        text: None,
    };
    assert!(capture_to_review(&junk).is_none());
}

#[test]
fn missing_author_gets_the_placeholder() {
    let capture = ReviewCapture {
        author: None,
        rating_label: Some("4 つ星".to_string()),
        relative_time: Some("1週間前".to_string()),
        text: None,
    };
    let review = capture_to_review(&capture).unwrap();
    assert_eq!(review.author_name, "Anonymous");
    assert_eq!(review.id, generate_review_id("Anonymous", "1週間前", 4));
    assert!(review.text.is_empty());
}

#[test]
fn unmatched_relative_time_leaves_timestamp_unset() {
    let capture = ReviewCapture {
        author: Some("Alice".to_string()),
        rating_label: Some("3 stars".to_string()),
        relative_time: Some("recently".to_string()),
        text: None,
    };
    let review = capture_to_review(&capture).unwrap();
    assert_eq!(review.published_at, None);
    assert_eq!(review.relative_time, "recently");
}
