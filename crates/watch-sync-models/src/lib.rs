pub mod media;
pub mod media_ids;
pub mod normalized;
pub mod watch_history;

pub use media::{
    CastMember, EpisodeDetail, MovieDetail, PeopleListing, Person, RecordKind, SeasonListing,
    ShowDetail, ShowSearchResult,
};
pub use media_ids::{ExternalId, MediaIds};
pub use normalized::{HistoryDocument, NormalizedRecord, ShowRef};
pub use watch_history::RawRecord;
