//! Metadata resolvers run on each freshly fetched record, in order:
//! season, show metadata, poster, cast. All of them fail soft.

pub mod cast;
pub mod enrich;
pub mod poster;
pub mod season;

pub use cast::resolve_cast;
pub use enrich::{enrich_episode, resolve_show_id};
pub use poster::PosterResolver;
pub use season::{resolve_season, SeasonStrategy, SEASON_CHAIN};
