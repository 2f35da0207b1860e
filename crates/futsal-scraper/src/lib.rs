//! HTTP collaborators of the search pipeline: the IamGround reservation
//! listing and the Kakao Local keyword geocoder.

pub mod client;
pub mod error;
pub mod geocode;
pub mod normalize;
pub mod pagination;
pub mod types;

pub use client::ReservationClient;
pub use error::{GeocodeError, ScraperError};
pub use geocode::KakaoGeocoder;
pub use normalize::{normalize_venue, NormalizedVenue};
pub use pagination::PageScan;
pub use types::{KakaoDocument, KakaoKeywordResponse, RawReservation, RawVenue, VenueListResponse};
