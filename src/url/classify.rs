use url::Url;

/// File suffixes recognized as directly downloadable data resources
///
/// Archive, tabular, geospatial, and raster formats commonly used for
/// published datasets. Matched case-insensitively against the URL path
/// only (query string and fragment excluded).
const DATA_FILE_SUFFIXES: &[&str] = &[
    ".zip", ".7z", ".rar", ".csv", ".xlsx", ".xls", ".geojson", ".json", ".gpkg", ".tif",
    ".tiff", ".kmz", ".kml", ".parquet",
];

/// Returns true if the URL is hosted on a Google Drive family domain
///
/// These links cannot be fetched with a plain HTTP stream (they sit
/// behind interstitial confirmation pages) and are routed to the gdown
/// retrieval strategy instead.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use harvestman::url::is_gdrive_url;
///
/// let url = Url::parse("https://drive.google.com/file/d/abc123/view").unwrap();
/// assert!(is_gdrive_url(&url));
///
/// let url = Url::parse("https://example.com/data.zip").unwrap();
/// assert!(!is_gdrive_url(&url));
/// ```
pub fn is_gdrive_url(url: &Url) -> bool {
    let host = match url.host_str() {
        Some(h) => h.to_lowercase(),
        None => return false,
    };

    if host == "drive.google.com" {
        return true;
    }

    // Direct-download endpoint on docs.google.com
    if host == "docs.google.com" && url.path().starts_with("/uc") {
        return true;
    }

    host == "googleusercontent.com" || host.ends_with(".googleusercontent.com")
}

/// Returns true if the URL path ends with a recognized data-file suffix
///
/// The comparison ignores the query string and fragment and is
/// case-insensitive, so `https://h/DATA.ZIP?dl=1` matches.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use harvestman::url::is_data_file_url;
///
/// let url = Url::parse("https://example.com/gdw_v1.zip?download=1").unwrap();
/// assert!(is_data_file_url(&url));
///
/// let url = Url::parse("https://example.com/about").unwrap();
/// assert!(!is_data_file_url(&url));
/// ```
pub fn is_data_file_url(url: &Url) -> bool {
    let path = url.path().to_lowercase();
    DATA_FILE_SUFFIXES
        .iter()
        .any(|suffix| path.ends_with(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_gdrive_main_host() {
        assert!(is_gdrive_url(&parse(
            "https://drive.google.com/file/d/1AbC/view?usp=sharing"
        )));
    }

    #[test]
    fn test_gdrive_docs_uc_endpoint() {
        assert!(is_gdrive_url(&parse(
            "https://docs.google.com/uc?id=1AbC&export=download"
        )));
    }

    #[test]
    fn test_docs_non_uc_path_is_not_gdrive() {
        assert!(!is_gdrive_url(&parse(
            "https://docs.google.com/document/d/1AbC/edit"
        )));
    }

    #[test]
    fn test_googleusercontent_host() {
        assert!(is_gdrive_url(&parse(
            "https://doc-00-bc-docs.googleusercontent.com/docs/securesc/abc"
        )));
        assert!(is_gdrive_url(&parse("https://googleusercontent.com/x")));
    }

    #[test]
    fn test_lookalike_host_is_not_gdrive() {
        assert!(!is_gdrive_url(&parse(
            "https://notgoogleusercontent.com/file.zip"
        )));
        assert!(!is_gdrive_url(&parse("https://drive.google.com.evil.com/x")));
    }

    #[test]
    fn test_plain_host_is_not_gdrive() {
        assert!(!is_gdrive_url(&parse("https://example.com/data.zip")));
    }

    #[test]
    fn test_data_file_suffixes() {
        for suffix in DATA_FILE_SUFFIXES {
            let url = parse(&format!("https://example.com/dataset{}", suffix));
            assert!(is_data_file_url(&url), "expected match for {}", suffix);
        }
    }

    #[test]
    fn test_suffix_match_is_case_insensitive() {
        assert!(is_data_file_url(&parse("https://example.com/DATA.ZIP")));
        assert!(is_data_file_url(&parse("https://example.com/Data.GeoJSON")));
    }

    #[test]
    fn test_query_string_ignored() {
        assert!(is_data_file_url(&parse(
            "https://example.com/data.csv?download=1&v=2"
        )));
        // A suffix appearing only in the query must not match
        assert!(!is_data_file_url(&parse(
            "https://example.com/download?file=data.csv"
        )));
    }

    #[test]
    fn test_fragment_ignored() {
        assert!(is_data_file_url(&parse("https://example.com/data.zip#latest")));
    }

    #[test]
    fn test_plain_page_is_not_data_file() {
        assert!(!is_data_file_url(&parse("https://example.com/about")));
        assert!(!is_data_file_url(&parse("https://example.com/")));
    }

    #[test]
    fn test_suffix_must_terminate_path() {
        assert!(!is_data_file_url(&parse(
            "https://example.com/data.zip.html"
        )));
    }
}
