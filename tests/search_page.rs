// tests/search_page.rs
mod common;

use ccgp_scrape::specs::record::SkipReason;
use ccgp_scrape::specs::search_page::SearchPageParser;

use common::*;

#[test]
fn total_is_read_from_the_count_span() {
    let p = SearchPageParser::new().unwrap();
    assert_eq!(p.parse_total(&page_html(Some("1234"), "")), 1234);
    assert_eq!(p.parse_total(&page_html(Some(" 45 "), "")), 45);
}

#[test]
fn non_numeric_or_missing_total_is_zero() {
    let p = SearchPageParser::new().unwrap();
    assert_eq!(p.parse_total(&page_html(Some("很多"), "")), 0);
    assert_eq!(p.parse_total(&page_html(None, "")), 0);
    assert_eq!(p.parse_total("<html><body>blocked</body></html>"), 0);
}

#[test]
fn fragments_follow_page_order_and_strip_layout_whitespace() {
    let p = SearchPageParser::new().unwrap();
    let html = listing(3, 1..4);
    let frags: Vec<_> = p.parse_fragments(&html).into_iter().map(Result::unwrap).collect();

    assert_eq!(frags.len(), 3);
    assert_eq!(frags[0].title, "项目1采购公告");
    assert_eq!(frags[2].href, "http://www.ccgp.gov.cn/cggg/dfgg/3.htm");
    assert_eq!(frags[1].summary, "项目2概况");
    assert_eq!(frags[0].meta, "2024.05.1710:32:11|采购人：采购单位1|代理机构：代理公司1|广西");
}

#[test]
fn title_includes_highlight_markup_text() {
    let p = SearchPageParser::new().unwrap();
    let li = "<li><a href=\"u\">关于<font color=\"red\">公告</font>的通知</a><p>s</p><span>m</span></li>";
    let frags = p.parse_fragments(&page_html(Some("1"), li));
    assert_eq!(frags[0].as_ref().unwrap().title, "关于公告的通知");
}

#[test]
fn metadata_keeps_nested_text_and_non_ascii_spaces() {
    let p = SearchPageParser::new().unwrap();
    let li = "<li><a href=\"u\">t</a><p>s</p><span>2024.05.17 | <strong>中标公告</strong> |\u{3000}广西</span></li>";
    let frags = p.parse_fragments(&page_html(Some("1"), li));
    assert_eq!(frags[0].as_ref().unwrap().meta, "2024.05.17|中标公告|\u{3000}广西");
}

#[test]
fn incomplete_items_are_reported_individually() {
    let p = SearchPageParser::new().unwrap();
    let items = [
        "<li><p>s</p><span>m</span></li>",
        "<li><a href=\"u\">t</a><span>m</span></li>",
        "<li><a href=\"u\">t</a><p>s</p></li>",
        "<li><a>t</a><p>s</p><span>m</span></li>",
    ]
    .concat();

    let frags = p.parse_fragments(&page_html(Some("4"), &items));

    assert_eq!(frags[0], Err(SkipReason::MissingAnchor));
    assert_eq!(frags[1], Err(SkipReason::MissingSummary));
    assert_eq!(frags[2], Err(SkipReason::MissingMeta));
    assert_eq!(frags[3].as_ref().unwrap().href, "");
}
