//! Header names, relation types and well-known endpoints.

/// Header names consumed or produced by the client.
pub mod headers {
    pub const ACCEPT_DATETIME: &str = "Accept-Datetime";
    pub const MEMENTO_DATETIME: &str = "Memento-Datetime";
    pub const LINK: &str = "Link";
    pub const VARY: &str = "Vary";
    pub const LOCATION: &str = "Location";
    pub const CONTENT_LOCATION: &str = "Content-Location";
    pub const CONTENT_TYPE: &str = "Content-Type";
}

/// Link relation types defined by RFC 7089.
pub mod rels {
    pub const ORIGINAL: &str = "original";
    pub const TIMEGATE: &str = "timegate";
    pub const TIMEMAP: &str = "timemap";
    pub const MEMENTO: &str = "memento";
    pub const PREV: &str = "prev";
    pub const NEXT: &str = "next";
    pub const FIRST: &str = "first";
    pub const LAST: &str = "last";
}

/// Public Memento aggregator endpoints.
pub mod defaults {
    pub const TIMEGATE_BASE_URI: &str = "http://timetravel.mementoweb.org/timegate/";
    pub const TIMEMAP_BASE_URI: &str = "http://timetravel.mementoweb.org/timemap/link/";
    pub const ARCHIVE_REGISTRY_URI: &str =
        "http://labs.mementoweb.org/aggregator_config/archivelist.xml";
    pub const MAX_REDIRECTS: u32 = 50;
}
