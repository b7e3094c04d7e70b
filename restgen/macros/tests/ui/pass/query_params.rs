use restgen_macros::QueryParams;

#[derive(QueryParams, Default)]
pub struct IssueFilter {
    #[alias("q")]
    pub query: Option<String>,
    pub per_page: u32,
}

fn main() {
    let filter = IssueFilter::default();
    assert!(filter.query.is_none());
    assert_eq!(filter.per_page, 0);
}
