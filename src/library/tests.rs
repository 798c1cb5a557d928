use super::{Track, TrackList};

fn t(title: &str) -> Track {
    Track::new(title, format!("/music/{title}.mp3"))
}

fn list_of(tracks: Vec<Track>) -> TrackList {
    let mut list = TrackList::default();
    list.replace(tracks);
    list
}

fn titles(list: &TrackList) -> Vec<String> {
    list.iter().map(|t| t.title.clone()).collect()
}

#[test]
fn empty_query_shows_full_snapshot() {
    let mut list = list_of(vec![t("Alpha"), t("Beta"), t("Gamma")]);
    list.apply_filter("");
    assert_eq!(list.len(), 3);
    assert!(!list.is_filtered());
}

#[test]
fn spaces_in_the_query_are_matched_literally() {
    let mut list = list_of(vec![t("Lovely"), t("Love Song"), t("Alpha")]);
    list.apply_filter("love ");
    assert_eq!(titles(&list), vec!["Love Song"]);

    list.apply_filter("   ");
    assert!(list.is_filtered());
    assert!(list.is_empty());
}

#[test]
fn filter_is_case_insensitive_substring() {
    let mut list = list_of(vec![t("Alpha"), t("Beta"), t("Gamma"), t("Delta")]);
    list.apply_filter("ET");
    assert_eq!(titles(&list), vec!["Beta", "Delta"]);

    // Substring, not subsequence.
    list.apply_filter("aa");
    assert!(list.is_empty());
}

#[test]
fn filter_matches_non_ascii_titles() {
    let mut list = list_of(vec![t("Émile"), t("Über Alles")]);
    list.apply_filter("über");
    assert_eq!(titles(&list), vec!["Über Alles"]);
}

#[test]
fn no_match_yields_empty_view() {
    let mut list = list_of(vec![t("Alpha")]);
    list.apply_filter("zzz");
    assert!(list.is_empty());
    assert_eq!(list.get(0), None);
    assert_eq!(list.snapshot().len(), 1);
}

#[test]
fn widening_query_derives_from_snapshot() {
    let mut list = list_of(vec![t("Alpha"), t("Alpine"), t("Beta")]);
    list.apply_filter("alph");
    assert_eq!(titles(&list), vec!["Alpha"]);

    list.apply_filter("al");
    assert_eq!(titles(&list), vec!["Alpha", "Alpine"]);
}

#[test]
fn remove_visible_removes_exactly_the_shown_entry() {
    let dup_a = Track::new("Same", "/music/a.mp3");
    let dup_b = Track::new("Same", "/music/b.mp3");
    let mut list = list_of(vec![dup_a.clone(), dup_b.clone(), t("Other")]);

    list.apply_filter("same");
    let removed = list.remove_visible(1).unwrap();
    assert_eq!(removed, dup_b);
    assert_eq!(list.snapshot(), &[dup_a, t("Other")]);
    assert_eq!(list.len(), 1);

    assert_eq!(list.remove_visible(5), None);
}

#[test]
fn replace_keeps_query() {
    let mut list = list_of(vec![t("Alpha")]);
    list.apply_filter("be");
    assert!(list.is_empty());

    list.replace(vec![t("Beta"), t("Alpha")]);
    assert_eq!(titles(&list), vec!["Beta"]);
    assert_eq!(list.query(), "be");
}
