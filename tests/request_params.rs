// tests/request_params.rs
use chrono::NaiveDate;

use ccgp_scrape::config::codes::TimeType;
use ccgp_scrape::core::net::{ RequestBuilder, USER_AGENTS };
use ccgp_scrape::engine::types::SearchFilter;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn params_carry_exactly_the_documented_keys_in_order() {
    let f = SearchFilter::builder(d(2024, 1, 2), d(2024, 3, 4)).build().unwrap();
    let keys: Vec<&str> = RequestBuilder::params(&f, 1).iter().map(|(k, _)| *k).collect();
    assert_eq!(
        keys,
        vec![
            "searchtype", "page_index", "bidSort", "buyerName", "projectId", "pinMu",
            "bidType", "dbselect", "kw", "start_time", "end_time", "timeType",
            "displayZone", "zoneId", "pppStatus", "agentName",
        ]
    );
}

#[test]
fn params_reflect_the_filter_and_page() {
    let f = SearchFilter::builder(d(2024, 1, 2), d(2024, 3, 4))
        .keyword("  医疗设备 ")
        .buyer("某某医院")
        .agent("某某代理")
        .bid_type(7)
        .zone("11")
        .build()
        .unwrap();

    let params = RequestBuilder::params(&f, 3);
    let get = |k: &str| params.iter().find(|(key, _)| *key == k).map(|(_, v)| v.as_str()).unwrap();

    assert_eq!(get("page_index"), "3");
    assert_eq!(get("kw"), "医疗设备");
    assert_eq!(get("buyerName"), "某某医院");
    assert_eq!(get("agentName"), "某某代理");
    assert_eq!(get("bidType"), "7");
    assert_eq!(get("zoneId"), "11");
    assert_eq!(get("start_time"), "2024:01:02");
    assert_eq!(get("end_time"), "2024:03:04");
    assert_eq!(get("timeType"), TimeType::Custom.code().to_string());
    assert_eq!(get("searchtype"), "1");
    assert_eq!(get("dbselect"), "bidx");
    assert_eq!(get("projectId"), "");
    assert_eq!(get("displayZone"), "");
}

#[test]
fn params_are_pure() {
    let f = SearchFilter::builder(d(2024, 1, 2), d(2024, 1, 2)).build().unwrap();
    assert_eq!(RequestBuilder::params(&f, 2), RequestBuilder::params(&f, 2));
}

#[test]
fn headers_use_the_injected_agent() {
    let rb = RequestBuilder::with_agent_picker(|pool| pool[1]);
    for _ in 0..5 {
        assert_eq!(rb.headers(None).get("User-Agent"), Some(USER_AGENTS[1]));
    }
    let h = rb.headers(None);
    assert_eq!(h.get("Accept-Encoding"), Some("gzip, deflate"));
    assert_eq!(h.get("Accept-Language"), Some("zh-CN,zh;q=0.9"));
    assert_eq!(h.get("Upgrade-Insecure-Requests"), Some("1"));
}
