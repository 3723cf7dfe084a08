use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Fields returned by default when the caller does not pass `fields`.
pub const DEFAULT_FIELDS: &str = "id,imgUrl,imgMimeType,imgHeight,imgWidth,imgCrawlTimestamp,imgTitle,imgAlt,imgCaption,pageUrl,pageCrawlTimestamp,pageTitle,collection";

/// Optional extra fields advertised through `linkToMoreFields`.
pub const MORE_FIELDS: &str = "pageHost,matchingImages,safe";

/// Bidirectional dictionary between the public field vocabulary and the
/// backend's. Only names that differ between the two have entries; both
/// directions fall back to identity.
pub struct FieldMap {
    to_backend: HashMap<&'static str, &'static str>,
    to_public: HashMap<&'static str, &'static str>,
}

impl FieldMap {
    /// Builds the map and its inverse. Panics if the forward map is not
    /// injective, since inversion would silently lose an entry.
    fn new(entries: &[(&'static str, &'static str)]) -> Self {
        let to_backend: HashMap<_, _> = entries.iter().copied().collect();
        let to_public: HashMap<_, _> = entries
            .iter()
            .map(|&(public, backend)| (backend, public))
            .collect();
        assert_eq!(
            to_backend.len(),
            to_public.len(),
            "public field map is not injective"
        );
        Self {
            to_backend,
            to_public,
        }
    }

    pub fn to_backend<'a>(&self, field: &'a str) -> &'a str {
        self.to_backend.get(field).copied().unwrap_or(field)
    }

    pub fn to_public<'a>(&self, field: &'a str) -> &'a str {
        self.to_public.get(field).copied().unwrap_or(field)
    }
}

pub static FIELD_MAP: Lazy<FieldMap> = Lazy::new(|| {
    FieldMap::new(&[
        ("imgSrc", "imgUrl"),
        ("pageURL", "pageUrl"),
        ("imgTstamp", "imgCrawlTimestamp"),
        ("pageTstamp", "pageCrawlTimestamp"),
        ("pageImages", "imagesInOriginalPage"),
        ("imgThumbnailBase64", "imgSrcBase64"),
        ("imgDigest", "id"),
    ])
});

/// Forces the map to be built (and validated) during startup instead of
/// on the first request.
pub fn init() {
    Lazy::force(&FIELD_MAP);
}
