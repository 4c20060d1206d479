use clap::ValueEnum;
use listview_records::CollectionKind;
use listview_search::{OrderingRule, PageMode};

#[derive(Copy, Clone, Debug, ValueEnum)]
pub(crate) enum KindFlag {
    Opportunities,
    Members,
    Courses,
    Generic,
}

impl KindFlag {
    pub(crate) const fn as_domain(self) -> CollectionKind {
        match self {
            KindFlag::Opportunities => CollectionKind::Opportunities,
            KindFlag::Members => CollectionKind::Members,
            KindFlag::Courses => CollectionKind::Courses,
            KindFlag::Generic => CollectionKind::Generic,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub(crate) enum PageModeFlag {
    /// "Load more": each page extends the list
    Cumulative,
    /// Numbered pages
    Discrete,
}

impl PageModeFlag {
    pub(crate) const fn as_domain(self) -> PageMode {
        match self {
            PageModeFlag::Cumulative => PageMode::Cumulative,
            PageModeFlag::Discrete => PageMode::Discrete,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub(crate) enum OrderingFlag {
    Newest,
    Source,
}

impl OrderingFlag {
    pub(crate) const fn as_domain(self) -> OrderingRule {
        match self {
            OrderingFlag::Newest => OrderingRule::DatePostedDesc,
            OrderingFlag::Source => OrderingRule::Insertion,
        }
    }
}
