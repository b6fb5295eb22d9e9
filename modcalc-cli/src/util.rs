use anyhow::{Context, Result};

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse a comma-separated list of affix ids. Range checks are left to the
/// engine, which drops ids outside the pool.
pub fn parse_id_list(s: &str) -> Result<Vec<i64>> {
    split_csv(s)
        .iter()
        .map(|token| {
            token
                .parse::<i64>()
                .with_context(|| format!("invalid affix id: {token}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" 1, ,2,  10 ");
        assert_eq!(parts, vec!["1", "2", "10"]);
    }

    #[test]
    fn parse_id_list_keeps_out_of_pool_ids() {
        assert_eq!(parse_id_list("1,2,42,-3").unwrap(), vec![1, 2, 42, -3]);
    }

    #[test]
    fn parse_id_list_rejects_words() {
        let err = parse_id_list("1,two").unwrap_err();
        assert!(err.to_string().contains("invalid affix id: two"));
    }
}
