//! Cascading option lists for choosing a dataset by its path fields.

/// Options for each selector level. Level 0 lists every distinct first field;
/// level `i` lists the `i`-th fields of datasets whose first `i` fields equal
/// the current selection. Values keep first-seen order.
pub fn dataset_options<S: AsRef<str>>(available: &[Vec<S>], selected: &[S]) -> Vec<Vec<String>> {
    let mut options: Vec<Vec<String>> = Vec::with_capacity(selected.len().max(1));
    options.push(distinct(available.iter().filter_map(|path| path.first())));

    for idx in 1..selected.len() {
        let level = available
            .iter()
            .filter(|path| prefix_matches(path, selected, idx))
            .filter_map(|path| path.get(idx));
        options.push(distinct(level));
    }
    options
}

fn prefix_matches<S: AsRef<str>>(path: &[S], selected: &[S], up_to: usize) -> bool {
    path.len() >= up_to
        && path[..up_to]
            .iter()
            .zip(selected)
            .all(|(a, b)| a.as_ref() == b.as_ref())
}

fn distinct<'a, S: AsRef<str> + 'a>(values: impl Iterator<Item = &'a S>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in values {
        if !out.iter().any(|o| o == v.as_ref()) {
            out.push(v.as_ref().to_string());
        }
    }
    out
}

/// Caption shown while the list of available datasets is still unknown
pub fn bare_data_path(source: Option<&str>, fields: Option<&[String]>) -> String {
    format!(
        "Source: {}\nDatapath: {}",
        source.unwrap_or("unknown"),
        fields.map(|f| f.join("/")).unwrap_or_else(|| "unknown".to_string())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn available() -> Vec<Vec<&'static str>> {
        vec![
            vec!["flu", "h3n2", "ha", "3y"],
            vec!["flu", "h3n2", "na", "3y"],
            vec!["flu", "h1n1pdm", "ha", "2y"],
            vec!["zika"],
            vec!["ebola"],
        ]
    }

    #[test]
    fn test_first_level_lists_all_roots() {
        let opts = dataset_options(&available(), &["zika"]);
        assert_eq!(opts, vec![vec!["flu", "zika", "ebola"]]);
    }

    #[test]
    fn test_levels_follow_selected_prefix() {
        let opts = dataset_options(&available(), &["flu", "h3n2", "ha", "3y"]);
        assert_eq!(opts.len(), 4);
        assert_eq!(opts[1], vec!["h3n2", "h1n1pdm"]);
        assert_eq!(opts[2], vec!["ha", "na"]);
        assert_eq!(opts[3], vec!["3y"]);
    }

    #[test]
    fn test_bare_data_path() {
        let fields = vec!["flu".to_string(), "h3n2".to_string()];
        assert_eq!(bare_data_path(Some("live"), Some(&fields)), "Source: live\nDatapath: flu/h3n2");
        assert_eq!(bare_data_path(None, None), "Source: unknown\nDatapath: unknown");
    }
}
