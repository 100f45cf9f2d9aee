/// Integration tests for the three table parsers and the dashboard
/// aggregates built on top of them.
///
/// Each parser has its own unit tests; these cover the behaviour of pasted
/// tables end to end, through `analysis::analyze`.
use supportlens::analysis::{self, Aggregates, Dashboard, NOT_AVAILABLE, RawInputs};
use supportlens::error::InputError;
use supportlens::parse::{self, CategoryCount, TopicRecord};

const KEYWORDS: &str = "Category\tKeyword\n\
GIT/VC\tpush\n\
GIT/VC\tgit push\n\
Authentication & Access\tAccess Token\n\
Authentication & Access\ttoken\n\
Programming & Development\tpip\n\
Programming & Development\tpython\n\
GIT/VC\tclone";

const TRENDING: &str = "Term\tSearches\tCTR\n\
push\t79\t59.50%\n\
pip\t50\t58%\n\
Function Overview\t49\t36.80%";

const TOPICS: &str = "Topic\tViews\n\
I can't push\t266\n\
Projects: Collaboration with Version Control\t251\n\
403 error occurs when pushing\t190";

fn inputs(keywords: &str, trending: &str, topics: &str) -> RawInputs {
    RawInputs {
        keywords: keywords.to_string(),
        trending: trending.to_string(),
        topics: topics.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Category counting
// ---------------------------------------------------------------------------

#[test]
fn category_counts_sum_to_non_empty_rows() {
    let counts = parse::count_categories(KEYWORDS);
    let total: u64 = counts.iter().map(|c| c.value).sum();
    assert_eq!(total, 7);
}

#[test]
fn category_counts_keep_first_seen_order() {
    let counts = parse::count_categories("Category\nA\nB\nA");
    assert_eq!(
        counts,
        vec![
            CategoryCount {
                name: "A".to_string(),
                value: 2
            },
            CategoryCount {
                name: "B".to_string(),
                value: 1
            },
        ]
    );
}

#[test]
fn rows_without_category_are_not_counted() {
    let counts = parse::count_categories("Category\tKeyword\n\tpush\nA\tx\n\n");
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].value, 1);
}

// ---------------------------------------------------------------------------
// Trending and topics
// ---------------------------------------------------------------------------

#[test]
fn percent_ctr_keeps_numeric_prefix() {
    let records = parse::normalize_trending("Term\tSearches\tCTR\npush\t79\t59.50%");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].term, "push");
    assert_eq!(records[0].searches, 79);
    assert_eq!(records[0].ctr, 59.5);
}

#[test]
fn unparseable_searches_become_zero() {
    let records = parse::normalize_trending("Term\tSearches\tCTR\npush\tabc\tn/a");
    assert_eq!(records[0].searches, 0);
    assert_eq!(records[0].ctr, 0.0);
}

#[test]
fn topics_keep_pasted_order_and_sum() {
    let records = parse::normalize_topics("Topic\tViews\nFoo\t10\nBar\t20");
    assert_eq!(
        records,
        vec![
            TopicRecord {
                topic: "Foo".to_string(),
                views: 10
            },
            TopicRecord {
                topic: "Bar".to_string(),
                views: 20
            },
        ]
    );
    let dataset = analysis::analyze(&inputs("", "", "Topic\tViews\nFoo\t10\nBar\t20")).unwrap();
    assert_eq!(Aggregates::from_dataset(&dataset).total_topic_views, 30);
}

#[test]
fn crlf_pastes_parse_like_lf() {
    let lf = parse::normalize_topics("Topic\tViews\nFoo\t10\nBar\t20");
    let crlf = parse::normalize_topics("Topic\tViews\r\nFoo\t10\r\nBar\t20");
    assert_eq!(lf, crlf);
}

// ---------------------------------------------------------------------------
// analyze + aggregates
// ---------------------------------------------------------------------------

#[test]
fn all_inputs_empty_is_an_input_error() {
    assert_eq!(
        analysis::analyze(&RawInputs::default()).unwrap_err(),
        InputError::NoData
    );
}

#[test]
fn header_only_tables_are_no_data() {
    let result = analysis::analyze(&inputs("Category\tKeyword", "", "Topic\tViews"));
    assert!(result.is_err());
}

#[test]
fn only_topics_populated_still_analyzes() {
    let dataset = analysis::analyze(&inputs("", "", TOPICS)).unwrap();
    assert!(dataset.categories.is_empty());
    assert!(dataset.trending.is_empty());
    assert_eq!(dataset.topics.len(), 3);

    let agg = Aggregates::from_dataset(&dataset);
    assert_eq!(agg.top_category, NOT_AVAILABLE);
    assert_eq!(agg.total_searches, 0);
    assert_eq!(agg.total_topic_views, 707);
}

#[test]
fn top_category_prefers_first_maximum() {
    let keywords = "Category\nA\nA\nA\nB\nB\nB\nB\nB\nC\nC\nC\nC\nC";
    let dataset = analysis::analyze(&inputs(keywords, "", "")).unwrap();
    assert_eq!(Aggregates::from_dataset(&dataset).top_category, "B");
}

#[test]
fn full_paste_builds_dashboard() {
    let dataset = analysis::analyze(&inputs(KEYWORDS, TRENDING, TOPICS)).unwrap();
    let dashboard = Dashboard::build(&dataset);

    assert_eq!(dashboard.aggregates.top_category, "GIT/VC");
    assert_eq!(dashboard.aggregates.total_searches, 178);
    assert_eq!(dashboard.aggregates.total_topic_views, 707);

    let slices = &dashboard.category_slices;
    assert_eq!(slices.len(), 3);
    assert_eq!(slices[0].percent_label(), "42.86%");
    assert_eq!(slices[0].color, "#6366F1");
    assert_eq!(slices[1].color, "#818CF8");
}
