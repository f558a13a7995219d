pub mod enrich;
pub mod fetch;
pub mod filter;
pub mod rankings;
pub mod state;
pub mod team_rating;
