pub mod addon;
pub mod occurrence;
pub mod order;
pub mod prices;
pub mod quote;
pub mod seat;
pub mod user;

pub use addon::{Addon, AddonSelection};
pub use occurrence::Occurrence;
pub use order::{BuyerDetails, CheckoutData, HolderDetails, OrderRecord, SeatSelection, Ticket};
pub use prices::PriceMatrix;
pub use quote::{BuyerCategory, Quote, QuoteLine, TicketType};
pub use seat::{Seat, SeatMap, SeatStatus, SeatZone};
pub use user::{AuthState, User};
