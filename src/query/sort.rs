/// Sort keys accepted by the item listing endpoint.
///
/// Unknown or absent keys fall back to `Latest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Latest,
    Oldest,
    NameAsc,
    NameDesc,
}

impl SortKey {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("latest") => SortKey::Latest,
            Some("oldest") => SortKey::Oldest,
            Some("a-z") => SortKey::NameAsc,
            Some("z-a") => SortKey::NameDesc,
            _ => SortKey::Latest,
        }
    }

    pub fn order_sql(&self) -> &'static str {
        match self {
            SortKey::Latest => "ORDER BY \"created_at\" DESC",
            SortKey::Oldest => "ORDER BY \"created_at\" ASC",
            SortKey::NameAsc => "ORDER BY \"name\" ASC",
            SortKey::NameDesc => "ORDER BY \"name\" DESC",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_the_four_documented_keys() {
        assert_eq!(SortKey::parse(Some("latest")), SortKey::Latest);
        assert_eq!(SortKey::parse(Some("oldest")), SortKey::Oldest);
        assert_eq!(SortKey::parse(Some("a-z")), SortKey::NameAsc);
        assert_eq!(SortKey::parse(Some("z-a")), SortKey::NameDesc);
    }

    #[test]
    fn unknown_or_absent_falls_back_to_latest() {
        assert_eq!(SortKey::parse(None), SortKey::Latest);
        assert_eq!(SortKey::parse(Some("newest")), SortKey::Latest);
        assert_eq!(SortKey::parse(Some("")), SortKey::Latest);
    }

    #[test]
    fn name_orders_are_exact_mirrors() {
        assert_eq!(SortKey::NameAsc.order_sql(), "ORDER BY \"name\" ASC");
        assert_eq!(SortKey::NameDesc.order_sql(), "ORDER BY \"name\" DESC");
    }
}
